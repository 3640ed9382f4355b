//! Dashboard chart aggregation.
//!
//! Counts companies per industry and tasks per status for the dashboard
//! charts, recomputed from the fetched collections on every request.
//! Zero-count categories are dropped rather than rendered as empty slices.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{TaskStatus, company, industry, task};

/// How many rows the recent-items widgets show.
pub const RECENT_LIMIT: usize = 4;

/// One chart slice: a category name and its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}

/// Counts companies per industry, in the industry collection's order.
///
/// The comparison key is the industry *name*, matching the denormalized
/// `industry` column on companies. Industries with no companies are omitted.
pub fn companies_by_industry(
    industries: &[industry::Model],
    companies: &[company::Model],
) -> Vec<CategoryCount> {
    industries
        .iter()
        .filter_map(|industry| {
            let count = companies
                .iter()
                .filter(|company| company.industry == industry.name)
                .count() as u64;
            (count > 0).then(|| CategoryCount {
                name: industry.name.clone(),
                count,
            })
        })
        .collect()
}

/// Counts tasks per status over the fixed status vocabulary, in chart
/// order. Statuses with no tasks are omitted.
pub fn tasks_by_status(tasks: &[task::Model]) -> Vec<CategoryCount> {
    TaskStatus::ALL
        .iter()
        .filter_map(|status| {
            let count = tasks
                .iter()
                .filter(|task| task.status == status.as_str())
                .count() as u64;
            (count > 0).then(|| CategoryCount {
                name: status.as_str().to_string(),
                count,
            })
        })
        .collect()
}

/// Whether a task is overdue at `now`: a due date in the past and a status
/// other than `Completed`. Tasks without a due date are never overdue.
pub fn is_overdue(task: &task::Model, now: DateTime<Utc>) -> bool {
    task.due_date
        .is_some_and(|due| due < now && task.status != TaskStatus::Completed.as_str())
}

/// Truncates an already-sorted collection to the recent-items widget size.
pub fn recent<T>(mut rows: Vec<T>) -> Vec<T> {
    rows.truncate(RECENT_LIMIT);
    rows
}
