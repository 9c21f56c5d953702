// Entry point and interactive CLI flow.
//
// The terminal front end mirrors the original submission form: ask for a
// report title, a journey date and a schedule file, then print the
// generated insights. All report logic lives in `reports`; this file only
// prompts, prints and saves.
mod errors;
mod loader;
mod output;
mod reports;
mod types;
mod util;

use chrono::NaiveDate;
use std::env;
use std::io::{self, Write};
use types::ReportInput;

const REPORT_FILE: &str = "report.txt";
const SUMMARY_FILE: &str = "summary.json";
const PREVIEW_ROWS: usize = 5;

/// Read a single line of input after printing `prompt`.
fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Keep asking until the user types a parseable journey date.
fn prompt_doj() -> NaiveDate {
    loop {
        match util::parse_date(&read_line("Date of Journey (DD-MM-YYYY): ")) {
            Some(d) => return d,
            None => println!("Invalid date. Please use DD-MM-YYYY."),
        }
    }
}

fn prompt_yes_no(prompt: &str) -> bool {
    loop {
        let resp = read_line(prompt).to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// One full prompt-generate-print round.
///
/// Errors are printed and the caller returns to the menu; nothing in here
/// exits the process. Every round builds its input from scratch, so runs
/// are independent of each other.
fn run_once(default_path: Option<&str>) {
    let title = read_line("Report title: ");
    let doj = prompt_doj();
    let path = match default_path {
        Some(p) => p.to_string(),
        None => read_line("Path to CSV or Excel file: "),
    };

    let rows = match loader::load_table(&path) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
            return;
        }
    };

    let report = match reports::generate_report(ReportInput { title, doj, rows }) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Could not generate report: {}\n", e);
            return;
        }
    };

    let stats = &report.stats;
    println!(
        "\nProcessing dataset... ({} rows loaded, {} kept after filtering)",
        stats.total_rows, stats.kept_rows
    );
    if stats.cancelled_rows > 0 || stats.summary_rows > 0 {
        println!(
            "Note: removed {} cancelled schedules and {} summary rows.",
            stats.cancelled_rows, stats.summary_rows
        );
    }
    if stats.over_capacity_rows > 0 {
        println!(
            "Warning: {} schedules report occupancy above 100%.",
            stats.over_capacity_rows
        );
    }
    println!();

    output::preview_schedules(&report.schedules, PREVIEW_ROWS);
    output::print_insights(&report);
    println!();

    if prompt_yes_no("Save report to report.txt and summary.json (Y/N): ") {
        if let Err(e) = output::write_text(REPORT_FILE, &report) {
            eprintln!("Write error: {}", e);
        }
        if let Err(e) = output::write_json(SUMMARY_FILE, &report.summary()) {
            eprintln!("Write error: {}", e);
        }
        println!("Saved {} and {}.\n", REPORT_FILE, SUMMARY_FILE);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let default_path = args.get(1).map(|s| s.as_str());
    loop {
        run_once(default_path);
        if !prompt_yes_no("Generate another report (Y/N): ") {
            println!("Exiting the program.");
            break;
        }
    }
}
