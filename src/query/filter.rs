//! Search-term and facet filtering over entity collections.
//!
//! A filter is a free-text term plus zero or more facet selections. The term
//! matches case-insensitively as a substring of any searchable field; each
//! facet either imposes no constraint (its own sentinel option, e.g.
//! "All Industries") or requires exact string equality on one field. All
//! active constraints are combined with AND, and the relative order of
//! matching rows is preserved.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::{PersonWithCompany, TaskWithRelations, company};

/// A case-insensitive substring search term.
///
/// An empty term matches every row. Whitespace is significant: the term is
/// lowercased but never trimmed, so " ac" only matches fields containing
/// that exact substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the term matches the given field. Absent fields never match
    /// a non-empty term.
    pub fn matches(&self, field: Option<&str>) -> bool {
        if self.0.is_empty() {
            return true;
        }
        field.is_some_and(|value| value.to_lowercase().contains(&self.0))
    }

    /// Whether the term matches at least one of the given fields.
    pub fn matches_any<'a>(&self, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
        if self.0.is_empty() {
            return true;
        }
        fields.into_iter().any(|field| self.matches(field))
    }
}

impl Default for SearchTerm {
    fn default() -> Self {
        Self(String::new())
    }
}

/// A single facet constraint: either unconstrained, or exact equality
/// against one string field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FacetSelection {
    #[default]
    All,
    Value(String),
}

impl FacetSelection {
    /// Parses a raw selection against the facet's own sentinel option
    /// ("All Industries", "All Companies", ...). Absent and empty values
    /// also mean unconstrained; anything else is a real value, so a row
    /// genuinely named "All Seasons" stays selectable.
    pub fn from_raw(raw: Option<&str>, sentinel: &str) -> Self {
        match raw.map(str::trim) {
            None | Some("") => FacetSelection::All,
            Some(value) if value == sentinel => FacetSelection::All,
            Some(value) => FacetSelection::Value(value.to_string()),
        }
    }

    /// Whether the given field satisfies this facet. Equality is exact,
    /// never substring; an absent field never equals a selected value.
    pub fn accepts(&self, field: Option<&str>) -> bool {
        match self {
            FacetSelection::All => true,
            FacetSelection::Value(selected) => field == Some(selected.as_str()),
        }
    }
}

/// Raw filter query parameters shared by the list endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct FilterParams {
    /// Free-text search term
    pub term: Option<String>,
    /// Industry facet (companies)
    pub industry: Option<String>,
    /// Company-name facet (people, tasks)
    pub company: Option<String>,
    /// Department facet (people)
    pub department: Option<String>,
    /// Status facet (tasks)
    pub status: Option<String>,
    /// Priority facet (tasks)
    pub priority: Option<String>,
}

/// Filter over the company collection: term against name or description,
/// plus an industry-name facet.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    pub term: SearchTerm,
    pub industry: FacetSelection,
}

impl CompanyFilter {
    pub fn from_params(params: &FilterParams) -> Self {
        Self {
            term: SearchTerm::new(params.term.as_deref().unwrap_or_default()),
            industry: FacetSelection::from_raw(params.industry.as_deref(), "All Industries"),
        }
    }

    pub fn matches(&self, company: &company::Model) -> bool {
        self.term
            .matches_any([Some(company.name.as_str()), company.description.as_deref()])
            && self.industry.accepts(Some(company.industry.as_str()))
    }

    /// Retains matching rows in their original order.
    pub fn apply(&self, mut companies: Vec<company::Model>) -> Vec<company::Model> {
        companies.retain(|company| self.matches(company));
        companies
    }
}

/// Filter over the people collection: term against name, position, or the
/// joined company name; company and department facets.
///
/// The company facet compares by company *name*, so two companies sharing a
/// name are indistinguishable here.
#[derive(Debug, Clone, Default)]
pub struct PersonFilter {
    pub term: SearchTerm,
    pub company: FacetSelection,
    pub department: FacetSelection,
}

impl PersonFilter {
    pub fn from_params(params: &FilterParams) -> Self {
        Self {
            term: SearchTerm::new(params.term.as_deref().unwrap_or_default()),
            company: FacetSelection::from_raw(params.company.as_deref(), "All Companies"),
            department: FacetSelection::from_raw(params.department.as_deref(), "All Departments"),
        }
    }

    pub fn matches(&self, person: &PersonWithCompany) -> bool {
        self.term.matches_any([
            Some(person.person.name.as_str()),
            person.person.position.as_deref(),
            person.company_name(),
        ]) && self.company.accepts(person.company_name())
            && self
                .department
                .accepts(person.person.department.as_deref())
    }

    pub fn apply(&self, mut people: Vec<PersonWithCompany>) -> Vec<PersonWithCompany> {
        people.retain(|person| self.matches(person));
        people
    }
}

/// Filter over the task collection: term against title or description;
/// status, priority, and company-name facets.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub term: SearchTerm,
    pub status: FacetSelection,
    pub priority: FacetSelection,
    pub company: FacetSelection,
}

impl TaskFilter {
    pub fn from_params(params: &FilterParams) -> Self {
        Self {
            term: SearchTerm::new(params.term.as_deref().unwrap_or_default()),
            // The task page's status/priority dropdowns offer a bare "All".
            status: FacetSelection::from_raw(params.status.as_deref(), "All"),
            priority: FacetSelection::from_raw(params.priority.as_deref(), "All"),
            company: FacetSelection::from_raw(params.company.as_deref(), "All Companies"),
        }
    }

    pub fn matches(&self, task: &TaskWithRelations) -> bool {
        self.term.matches_any([
            Some(task.task.title.as_str()),
            task.task.description.as_deref(),
        ]) && self.status.accepts(Some(task.task.status.as_str()))
            && self.priority.accepts(Some(task.task.priority.as_str()))
            && self.company.accepts(task.company_name())
    }

    pub fn apply(&self, mut tasks: Vec<TaskWithRelations>) -> Vec<TaskWithRelations> {
        tasks.retain(|task| self.matches(task));
        tasks
    }
}
