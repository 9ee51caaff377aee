//! Terminal rendering of run diagnostics.

use bus_model::ErrorRecord;
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use crate::commands::CommandOutcome;

pub fn print_summary(outcome: &CommandOutcome) {
    if let Some(text) = &outcome.stdout {
        println!("{text}");
    }
    if let Some(table) = diagnostics_table(&outcome.report.errors, &outcome.report.warnings) {
        eprintln!("{table}");
    }
    eprintln!("{}", status_line(outcome));
    if let Some(path) = &outcome.written {
        eprintln!("Output: {}", path.display());
    }
}

/// One line with the operation and its counts.
pub fn status_line(outcome: &CommandOutcome) -> String {
    let report = &outcome.report;
    let emitted = outcome.written.is_some() || outcome.stdout.is_some();
    let verdict = match (report.has_errors(), emitted) {
        (false, _) => "ok",
        (true, true) => "completed with errors",
        (true, false) => "output withheld",
    };
    format!(
        "{}: {} error(s), {} warning(s), warnings={} - {verdict}",
        outcome.operation,
        report.error_count(),
        report.warning_count(),
        report.warn_mode.as_str(),
    )
}

/// Errors first, then warnings; `None` when there is nothing to show.
pub fn diagnostics_table(errors: &[ErrorRecord], warnings: &[ErrorRecord]) -> Option<Table> {
    if errors.is_empty() && warnings.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Subject"),
        header_cell("Message"),
        header_cell("Help"),
    ]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(0) {
        column.set_cell_alignment(CellAlignment::Center);
    }
    for (label, color, records) in [("ERROR", Color::Red, errors), ("WARN", Color::Yellow, warnings)] {
        for record in records {
            table.add_row(vec![
                Cell::new(label).fg(color).add_attribute(Attribute::Bold),
                subject_cell(&record.subject),
                Cell::new(&record.message),
                help_cell(&record.help),
            ]);
        }
    }
    Some(table)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    table.set_constraints(vec![
        ColumnConstraint::UpperBoundary(Width::Fixed(9)),
        ColumnConstraint::UpperBoundary(Width::Fixed(20)),
        ColumnConstraint::UpperBoundary(Width::Percentage(40)),
        ColumnConstraint::UpperBoundary(Width::Percentage(45)),
    ]);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn subject_cell(subject: &str) -> Cell {
    if subject.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(subject).fg(Color::Blue)
    }
}

fn help_cell(help: &str) -> Cell {
    if help.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(help)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bus_model::WarnMode;
    use bus_validate::RunReport;

    fn outcome(errors: Vec<ErrorRecord>) -> CommandOutcome {
        CommandOutcome {
            operation: "validate",
            report: RunReport {
                errors,
                warnings: Vec::new(),
                warn_mode: WarnMode::Strict,
            },
            written: None,
            stdout: None,
        }
    }

    #[test]
    fn status_line_reports_counts() {
        let clean = outcome(Vec::new());
        assert_eq!(
            status_line(&clean),
            "validate: 0 error(s), 0 warning(s), warnings=strict - ok"
        );
        let failed = outcome(vec![ErrorRecord::new("EAMENA-1", "Invalid geometry.", "")]);
        assert!(status_line(&failed).ends_with("output withheld"));
    }

    #[test]
    fn empty_diagnostics_render_nothing() {
        assert!(diagnostics_table(&[], &[]).is_none());
        let errors = [ErrorRecord::new("", "Need an input file; use --source", "")];
        let table = diagnostics_table(&errors, &[]).expect("table");
        assert_eq!(table.row_count(), 1);
    }
}
