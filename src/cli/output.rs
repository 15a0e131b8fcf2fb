//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use chrono::NaiveDateTime;
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{Record, RecordSet};

/// Shown instead of a password when passwords are hidden.
const MASK: &str = "**********";

/// Shown for a field that has no value.
const NOT_SET: &str = "[NOT SET]";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print all records as a table (ID, Name, Email, Mobile, Username,
/// Password, Updated).  Passwords are masked unless `show_passwords`.
pub fn print_records_table(records: &RecordSet, show_passwords: bool) {
    if records.is_empty() {
        info("No records in this vault yet.");
        tip("Run `passvault add --name <NAME>` to add your first record.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "ID", "Name", "Email", "Mobile", "Username", "Password", "Updated",
    ]);

    for r in records {
        let password = if show_passwords { r.password.as_str() } else { MASK };
        table.add_row(vec![
            r.id.to_string(),
            r.name.clone(),
            r.email.clone(),
            r.mobile.clone(),
            r.username.clone(),
            password.to_string(),
            r.update_time
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        ]);
    }

    println!("{table}");
}

/// Print every field of one record, one per line.
pub fn print_record_details(record: &Record) {
    let rows = [
        ("ID", record.id.to_string()),
        ("Name", or_not_set(&record.name)),
        ("Email", or_not_set(&record.email)),
        ("Mobile", or_not_set(&record.mobile)),
        ("Username", or_not_set(&record.username)),
        ("Password", or_not_set(&record.password)),
        ("Insert Time", timestamp(record.insert_time)),
        ("Update Time", timestamp(record.update_time)),
        ("Description", or_not_set(&record.description)),
    ];

    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
        println!("{}: {value}", style(format!("{label:<width$}")).green().bold());
    }
}

fn or_not_set(value: &str) -> String {
    if value.is_empty() {
        NOT_SET.to_string()
    } else {
        value.to_string()
    }
}

fn timestamp(value: Option<NaiveDateTime>) -> String {
    value
        .map(|t| t.format(crate::vault::record::TIMESTAMP_FORMAT).to_string())
        .unwrap_or_else(|| NOT_SET.to_string())
}
