// The report engine: filtering, aggregation and the narrative template.
//
// Everything here is pure with respect to its inputs. Printing and file
// writing live in `output`, prompting in `main`, so any number of thin
// front ends can drive the same pipeline.
use crate::errors::ReportError;
use crate::types::{
    Aggregates, CleanStats, RawRow, ReportInput, ReportSummary, ScheduleRow, TopRoute,
};
use crate::util::{average, format_money, parse_money, parse_percent};
use chrono::NaiveDate;

/// Marker value in the `Cancelled` column for schedules that did not run.
const CANCELLED_MARKER: &str = "Cancelled";
/// Synthetic totals row appended by the upstream export.
const SUMMARY_ROUTE: &str = "Grand Total";

const HIGH_OCCUPANCY_THRESHOLD: f64 = 90.0;
const FULL_OCCUPANCY_THRESHOLD: f64 = 100.0;

/// The finished report for one journey date.
#[derive(Debug)]
pub struct Report {
    pub title: String,
    pub doj: NaiveDate,
    pub schedules: Vec<ScheduleRow>,
    pub stats: CleanStats,
    pub aggregates: Aggregates,
    pub lines: Vec<String>,
}

impl Report {
    /// The narrative as one newline-joined string.
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn summary(&self) -> ReportSummary<'_> {
        ReportSummary {
            title: &self.title,
            doj: self.doj,
            schedules: self.schedules.len(),
            aggregates: &self.aggregates,
        }
    }
}

/// Run the full pipeline over one uploaded table.
pub fn generate_report(input: ReportInput) -> Result<Report, ReportError> {
    if input.title.trim().is_empty() {
        return Err(ReportError::MissingInput(
            "report title must not be empty".to_string(),
        ));
    }
    let (schedules, stats) = clean(input.rows)?;
    let aggregates = aggregate(&schedules)?;
    let lines = render_insights(&aggregates, &input.title, input.doj);
    Ok(Report {
        title: input.title,
        doj: input.doj,
        schedules,
        stats,
        aggregates,
        lines,
    })
}

/// Drop cancelled schedules and the synthetic totals row, then parse the
/// currency and percentage columns.
///
/// An empty result is not an error here; `aggregate` decides whether an
/// empty table is acceptable.
pub fn clean(rows: Vec<RawRow>) -> Result<(Vec<ScheduleRow>, CleanStats), ReportError> {
    let mut stats = CleanStats {
        total_rows: rows.len(),
        ..CleanStats::default()
    };
    let mut out = Vec::new();

    for (idx, row) in rows.into_iter().enumerate() {
        let row_no = idx + 1;
        if row.cancelled.as_deref().map(str::trim) == Some(CANCELLED_MARKER) {
            stats.cancelled_rows += 1;
            continue;
        }
        let route = row
            .route
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or("Unknown")
            .to_string();
        if route == SUMMARY_ROUTE {
            stats.summary_rows += 1;
            continue;
        }

        let revenue = parse_field(row.revenue.as_deref(), "Revenue", row_no, parse_money)?;
        let asp = parse_field(row.asp.as_deref(), "ASP", row_no, parse_money)?;
        let occupancy = parse_field(row.occupancy.as_deref(), "Occupancy", row_no, parse_percent)?;
        if occupancy > FULL_OCCUPANCY_THRESHOLD {
            stats.over_capacity_rows += 1;
        }

        out.push(ScheduleRow {
            route,
            revenue,
            asp,
            occupancy,
        });
    }

    stats.kept_rows = out.len();
    Ok((out, stats))
}

fn parse_field(
    value: Option<&str>,
    column: &'static str,
    row: usize,
    parse: fn(&str) -> Option<f64>,
) -> Result<f64, ReportError> {
    let raw = value.unwrap_or("");
    parse(raw).ok_or_else(|| ReportError::DataFormat {
        column,
        row,
        value: raw.to_string(),
    })
}

/// Compute the metrics that feed the narrative.
///
/// Errors on an empty table up front; mean and max are undefined there,
/// and the caller gets a typed error instead of NaN in the output.
pub fn aggregate(schedules: &[ScheduleRow]) -> Result<Aggregates, ReportError> {
    if schedules.is_empty() {
        return Err(ReportError::EmptyDataset);
    }

    let occupancies: Vec<f64> = schedules.iter().map(|s| s.occupancy).collect();
    let asps: Vec<f64> = schedules.iter().map(|s| s.asp).collect();

    // Strict comparison keeps the first row on revenue ties.
    let mut top = &schedules[0];
    for s in &schedules[1..] {
        if s.revenue > top.revenue {
            top = s;
        }
    }

    Ok(Aggregates {
        total_revenue: schedules.iter().map(|s| s.revenue).sum(),
        avg_occupancy: average(&occupancies),
        avg_asp: average(&asps),
        top_route: TopRoute {
            route: top.route.clone(),
            revenue: top.revenue,
            occupancy: top.occupancy,
            asp: top.asp,
        },
        high_occupancy_count: occupancies
            .iter()
            .filter(|o| **o >= HIGH_OCCUPANCY_THRESHOLD)
            .count(),
        full_occupancy_count: occupancies
            .iter()
            .filter(|o| **o >= FULL_OCCUPANCY_THRESHOLD)
            .count(),
    })
}

/// Render the fixed six-line narrative.
///
/// Weekday and date derive solely from the supplied journey date, so the
/// same input always renders the same lines.
pub fn render_insights(agg: &Aggregates, title: &str, doj: NaiveDate) -> Vec<String> {
    vec![
        "Hi Team,".to_string(),
        format!(
            "Please find DP Performance report of {} for DOJ: - {} ({}): -",
            title,
            doj.format("%d-%m-%Y"),
            doj.format("%A")
        ),
        "Insights:".to_string(),
        format!(
            "1) Overall revenue generated ₹{} with an average occupancy of {:.0}% and average ASP of ₹{}.",
            format_money(agg.total_revenue),
            agg.avg_occupancy,
            format_money(agg.avg_asp)
        ),
        format!(
            "2) Highest performing service is {} with overall revenue of ₹{}, occupancy of {}% and ASP of ₹{}.",
            agg.top_route.route,
            format_money(agg.top_route.revenue),
            agg.top_route.occupancy,
            format_money(agg.top_route.asp)
        ),
        format!(
            "3) Total {} schedules have achieved more than 90% Occupancy, in which {} schedules have achieved 100% Occupancy.",
            agg.high_occupancy_count, agg.full_occupancy_count
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(route: &str, cancelled: &str, revenue: &str, asp: &str, occupancy: &str) -> RawRow {
        let opt = |s: &str| {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };
        RawRow {
            route: opt(route),
            cancelled: opt(cancelled),
            revenue: opt(revenue),
            asp: opt(asp),
            occupancy: opt(occupancy),
        }
    }

    fn doj() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_clean_filters_cancelled_and_totals_rows() {
        let rows = vec![
            raw("A", "", "₹1,000", "₹500", "95%"),
            raw("B", "Cancelled", "₹2,000", "₹600", "80%"),
            raw("Grand Total", "", "₹3,000", "₹550", "88%"),
        ];
        let (schedules, stats) = clean(rows).unwrap();
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].route, "A");
        assert_eq!(stats.total_rows, 3);
        assert_eq!(stats.kept_rows, 1);
        assert_eq!(stats.cancelled_rows, 1);
        assert_eq!(stats.summary_rows, 1);
    }

    #[test]
    fn test_clean_parses_currency_and_percent_cells() {
        let rows = vec![raw("A", "", "₹12,345", "₹1,234", "93%")];
        let (schedules, _) = clean(rows).unwrap();
        assert_eq!(schedules[0].revenue, 12345.0);
        assert_eq!(schedules[0].asp, 1234.0);
        assert_eq!(schedules[0].occupancy, 93.0);
    }

    #[test]
    fn test_clean_counts_over_capacity_rows() {
        let rows = vec![
            raw("A", "", "₹1,000", "₹500", "103%"),
            raw("B", "", "₹2,000", "₹600", "100%"),
        ];
        let (schedules, stats) = clean(rows).unwrap();
        // Above 100% is kept, not clamped.
        assert_eq!(schedules[0].occupancy, 103.0);
        assert_eq!(stats.over_capacity_rows, 1);
    }

    #[test]
    fn test_malformed_revenue_cell_names_the_column() {
        let rows = vec![raw("A", "", "N/A", "₹500", "95%")];
        let err = clean(rows).unwrap_err();
        match err {
            ReportError::DataFormat { column, row, value } => {
                assert_eq!(column, "Revenue");
                assert_eq!(row, 1);
                assert_eq!(value, "N/A");
            }
            other => panic!("expected DataFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_cell_is_a_format_error() {
        let rows = vec![raw("A", "", "₹1,000", "", "95%")];
        let err = clean(rows).unwrap_err();
        assert!(matches!(
            err,
            ReportError::DataFormat { column: "ASP", .. }
        ));
    }

    #[test]
    fn test_aggregate_empty_table_is_a_typed_error() {
        let err = aggregate(&[]).unwrap_err();
        assert!(matches!(err, ReportError::EmptyDataset));
    }

    #[test]
    fn test_all_rows_filtered_yields_empty_dataset() {
        let rows = vec![
            raw("A", "Cancelled", "₹1,000", "₹500", "95%"),
            raw("Grand Total", "", "₹1,000", "₹500", "95%"),
        ];
        let err = generate_report(ReportInput {
            title: "Test".to_string(),
            doj: doj(),
            rows,
        })
        .unwrap_err();
        assert!(matches!(err, ReportError::EmptyDataset));
    }

    #[test]
    fn test_top_route_tie_keeps_first_row() {
        let schedules = vec![
            ScheduleRow {
                route: "First".to_string(),
                revenue: 2000.0,
                asp: 500.0,
                occupancy: 90.0,
            },
            ScheduleRow {
                route: "Second".to_string(),
                revenue: 2000.0,
                asp: 600.0,
                occupancy: 95.0,
            },
        ];
        let agg = aggregate(&schedules).unwrap();
        assert_eq!(agg.top_route.route, "First");
    }

    #[test]
    fn test_full_occupancy_is_counted_within_high() {
        let schedules = vec![
            ScheduleRow {
                route: "A".to_string(),
                revenue: 1000.0,
                asp: 500.0,
                occupancy: 92.0,
            },
            ScheduleRow {
                route: "B".to_string(),
                revenue: 1000.0,
                asp: 500.0,
                occupancy: 100.0,
            },
            ScheduleRow {
                route: "C".to_string(),
                revenue: 1000.0,
                asp: 500.0,
                occupancy: 85.0,
            },
        ];
        let agg = aggregate(&schedules).unwrap();
        assert_eq!(agg.high_occupancy_count, 2);
        assert_eq!(agg.full_occupancy_count, 1);
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let err = generate_report(ReportInput {
            title: "  ".to_string(),
            doj: doj(),
            rows: vec![raw("A", "", "₹1,000", "₹500", "95%")],
        })
        .unwrap_err();
        assert!(matches!(err, ReportError::MissingInput(_)));
    }

    #[test]
    fn test_end_to_end_report_matches_template() {
        let rows = vec![
            raw("A", "", "₹1,000", "₹500", "95%"),
            raw("B", "", "₹2,000", "₹600", "80%"),
        ];
        let report = generate_report(ReportInput {
            title: "Test".to_string(),
            doj: doj(),
            rows,
        })
        .unwrap();

        assert_eq!(report.aggregates.total_revenue, 3000.0);
        assert_eq!(report.aggregates.avg_occupancy, 87.5);
        assert_eq!(report.aggregates.avg_asp, 550.0);
        assert_eq!(report.aggregates.top_route.route, "B");
        assert_eq!(report.aggregates.high_occupancy_count, 1);
        assert_eq!(report.aggregates.full_occupancy_count, 0);

        assert_eq!(report.lines.len(), 6);
        assert_eq!(report.lines[0], "Hi Team,");
        assert_eq!(
            report.lines[1],
            "Please find DP Performance report of Test for DOJ: - 15-01-2024 (Monday): -"
        );
        assert_eq!(report.lines[2], "Insights:");
        assert_eq!(
            report.lines[3],
            "1) Overall revenue generated ₹3,000 with an average occupancy of 88% and average ASP of ₹550."
        );
        assert_eq!(
            report.lines[4],
            "2) Highest performing service is B with overall revenue of ₹2,000, occupancy of 80% and ASP of ₹600."
        );
        assert_eq!(
            report.lines[5],
            "3) Total 1 schedules have achieved more than 90% Occupancy, in which 0 schedules have achieved 100% Occupancy."
        );
        assert_eq!(report.to_text(), report.lines.join("\n"));
    }

    #[test]
    fn test_same_input_renders_identical_lines() {
        let build = || {
            generate_report(ReportInput {
                title: "Weekly".to_string(),
                doj: doj(),
                rows: vec![
                    raw("A", "", "₹1,000", "₹500", "95%"),
                    raw("B", "", "₹2,000", "₹600", "80%"),
                ],
            })
            .unwrap()
        };
        assert_eq!(build().lines, build().lines);
    }
}
