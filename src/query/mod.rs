//! # Query Layer
//!
//! Pure filtering and aggregation over fetched collections. Everything in
//! this module is synchronous and side-effect free: handlers fetch rows
//! through the repositories, then derive filtered views and chart data here.
//! Filters preserve input order and never reorder or duplicate rows.

pub mod dashboard;
pub mod filter;

pub use dashboard::{CategoryCount, companies_by_industry, is_overdue, recent, tasks_by_status};
pub use filter::{CompanyFilter, FacetSelection, PersonFilter, SearchTerm, TaskFilter};
