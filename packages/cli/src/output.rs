//! Plain-text rendering of reports for the terminal.

use incident_panel_analytics_models::DashboardReport;
use incident_panel_dataset::{LoadReport, ReferenceStatus};
use incident_panel_filter_models::{CascadeOptions, DateRange};
use incident_panel_incident_models::EnrichedIncident;

/// Shown instead of tables when the filters leave nothing.
pub const NO_DATA_MESSAGE: &str = "No data for the selected filters.";

/// Rows shown in the per-camera table before truncating.
const CAMERA_TABLE_ROWS: usize = 25;

pub fn print_load_report(report: &LoadReport) {
    println!("Incident rows read:    {}", report.rows_read);
    println!("Incidents kept:        {}", report.incidents_kept);
    println!("Excluded (bad date):   {}", report.rows_excluded);
    match &report.reference {
        ReferenceStatus::Loaded {
            cameras,
            duplicates_discarded,
            blank_codes,
        } => {
            println!(
                "Camera catalog:        {cameras} cameras \
                 ({duplicates_discarded} duplicate codes, {blank_codes} blank codes skipped)"
            );
            println!("Matched to a camera:   {}", report.matched);
            println!("Unmatched:             {}", report.unmatched);
        }
        ReferenceStatus::Unavailable { reason } => {
            println!("Camera catalog:        unavailable ({reason})");
            println!("Region and neighborhood filters are disabled.");
        }
    }
}

pub fn print_options(options: &CascadeOptions) {
    if let Some(bounds) = options.date_bounds {
        println!("Date range: {} .. {}", bounds.min, bounds.max);
    }
    if let Some(range) = options.applied_range {
        println!("Applied:    {} .. {}", range.start, range.end);
    }
    for stage in &options.stages {
        println!();
        if !stage.available {
            println!("{}: unavailable (camera catalog not loaded)", stage.stage.label());
            continue;
        }
        println!("{} ({}):", stage.stage.label(), stage.values.len());
        for choice in stage.choices() {
            println!("  {choice}");
        }
    }
}

pub fn print_dashboard(report: &DashboardReport, range: Option<&DateRange>) {
    if let Some(range) = range {
        println!("Period: {} .. {}", range.start, range.end);
    }

    if report.summary.is_empty {
        println!("{NO_DATA_MESSAGE}");
        return;
    }

    println!("Total occurrences: {}", report.summary.total);
    println!("Distinct cameras:  {}", report.summary.distinct_cameras);

    println!();
    println!(
        "{:<16} {:<32} {:<20} {:<20} {:>6}",
        "Camera", "Name", "Region", "Neighborhood", "Count"
    );
    for row in report.cameras.iter().take(CAMERA_TABLE_ROWS) {
        println!(
            "{:<16} {:<32} {:<20} {:<20} {:>6}",
            if row.code.is_empty() { "(none)" } else { row.code.as_str() },
            row.display_name.as_deref().unwrap_or("-"),
            row.region.as_deref().unwrap_or("-"),
            row.neighborhood.as_deref().unwrap_or("-"),
            row.count
        );
    }
    if report.cameras.len() > CAMERA_TABLE_ROWS {
        println!("... {} more cameras", report.cameras.len() - CAMERA_TABLE_ROWS);
    }

    println!();
    println!("Incident types:");
    for entry in &report.incident_types {
        println!("  {:<40} {:>6}", entry.category, entry.count);
    }

    println!();
    println!("Top problems:");
    for entry in &report.top_problems {
        println!("  {:<40} {:>6}", entry.category, entry.count);
    }

    println!();
    println!("By hour:");
    for entry in &report.hourly {
        println!("  {:02}h  {:<36} {:>6}", entry.hour, entry.incident_type, entry.count);
    }
}

pub fn print_incidents(rows: &[&EnrichedIncident], total: usize, offset: usize) {
    if total == 0 {
        println!("{NO_DATA_MESSAGE}");
        return;
    }

    if rows.is_empty() {
        println!("{}", empty_page_message(offset, total));
        return;
    }

    for row in rows {
        println!(
            "{}  {:<8} {:<16} {:<24} {}",
            row.occurred_at().format("%d/%m/%Y %H:%M:%S"),
            row.incident.secretariat,
            row.canonical_camera_id(),
            row.incident.incident_type.as_deref().unwrap_or("-"),
            row.incident.problem_category.as_deref().unwrap_or("-"),
        );
    }
    println!("{}", page_footer(offset, rows.len(), total));
}

fn empty_page_message(offset: usize, total: usize) -> String {
    format!("No rows at offset {offset} (total {total})")
}

fn page_footer(offset: usize, shown: usize, total: usize) -> String {
    format!(
        "Showing {}-{} of {total}",
        (offset + 1).min(total),
        (offset + shown).min(total)
    )
}
