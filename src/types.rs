use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One row as it comes out of the loader, every cell still raw text.
///
/// All fields are optional: the `Cancelled` column may be absent entirely,
/// and empty cells deserialize to `None`.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Route")]
    pub route: Option<String>,
    #[serde(rename = "Cancelled")]
    pub cancelled: Option<String>,
    #[serde(rename = "Revenue")]
    pub revenue: Option<String>,
    #[serde(rename = "ASP")]
    pub asp: Option<String>,
    #[serde(rename = "Occupancy")]
    pub occupancy: Option<String>,
}

/// A schedule that survived filtering, with all metrics parsed to numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    pub route: String,
    pub revenue: f64,
    pub asp: f64,
    pub occupancy: f64,
}

/// Counters describing what the cleaning pass did to the raw table.
#[derive(Debug, Clone, Default)]
pub struct CleanStats {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub cancelled_rows: usize,
    pub summary_rows: usize,
    /// Schedules reporting occupancy above 100%; kept as-is but worth a
    /// warning, since upstream data is the only place that can produce them.
    pub over_capacity_rows: usize,
}

/// Everything the engine needs for one report run. Built fresh per
/// invocation by the front end and never mutated afterwards.
#[derive(Debug)]
pub struct ReportInput {
    pub title: String,
    pub doj: NaiveDate,
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopRoute {
    pub route: String,
    pub revenue: f64,
    pub occupancy: f64,
    pub asp: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Aggregates {
    pub total_revenue: f64,
    pub avg_occupancy: f64,
    pub avg_asp: f64,
    pub top_route: TopRoute,
    pub high_occupancy_count: usize,
    pub full_occupancy_count: usize,
}

/// Snapshot written to `summary.json` next to the narrative report.
#[derive(Debug, Serialize)]
pub struct ReportSummary<'a> {
    pub title: &'a str,
    pub doj: NaiveDate,
    pub schedules: usize,
    #[serde(flatten)]
    pub aggregates: &'a Aggregates,
}

/// Row shape for the console preview of the cleaned table.
#[derive(Debug, Clone, Tabled)]
pub struct SchedulePreviewRow {
    #[tabled(rename = "Route")]
    pub route: String,
    #[tabled(rename = "Revenue")]
    pub revenue: String,
    #[tabled(rename = "ASP")]
    pub asp: String,
    #[tabled(rename = "Occupancy")]
    pub occupancy: String,
}
