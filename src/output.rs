use crate::errors::ReportError;
use crate::reports::Report;
use crate::types::{SchedulePreviewRow, ScheduleRow};
use crate::util::format_money;
use serde::Serialize;
use tabled::{settings::Style, Table};

/// Print the narrative as the bulleted list the team pastes into chat.
pub fn print_insights(report: &Report) {
    for line in &report.lines {
        println!("- {}", line);
    }
}

/// Markdown preview of the first `max_rows` cleaned schedules.
pub fn preview_schedules(schedules: &[ScheduleRow], max_rows: usize) {
    let rows: Vec<SchedulePreviewRow> = schedules.iter().take(max_rows).map(preview_row).collect();
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(rows).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

fn preview_row(s: &ScheduleRow) -> SchedulePreviewRow {
    SchedulePreviewRow {
        route: s.route.clone(),
        revenue: format!("₹{}", format_money(s.revenue)),
        asp: format!("₹{}", format_money(s.asp)),
        occupancy: format!("{}%", s.occupancy),
    }
}

/// Write the newline-joined narrative to `path`.
pub fn write_text(path: &str, report: &Report) -> Result<(), ReportError> {
    std::fs::write(path, report.to_text())?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), ReportError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}
