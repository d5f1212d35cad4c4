use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::calendar::{build_calendar, CalendarDay};
use crate::config;
use crate::store::DocumentStore;
use crate::web::calendar::CalendarResponse;

/// Print the weekly calendar straight from the configured store.
pub fn run_calendar(config_path: &Path, json: bool) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    let store = DocumentStore::from_config(&cfg.store).context("Failed to open store")?;

    let calendar = build_calendar(&store).context("Failed to build calendar")?;
    info!(
        "Built calendar with {} slots",
        calendar.iter().map(|d| d.activities.len()).sum::<usize>()
    );

    if json {
        let resp = CalendarResponse { calendar };
        println!("{}", serde_json::to_string_pretty(&resp)?);
    } else {
        print!("{}", render_calendar(&calendar));
    }
    Ok(())
}

fn render_calendar(calendar: &[CalendarDay]) -> String {
    let mut out = String::new();
    for day in calendar {
        let _ = writeln!(out, "{}:", day.day);
        if day.activities.is_empty() {
            let _ = writeln!(out, "  (no classes)");
        }
        for slot in &day.activities {
            let _ = writeln!(out, "  {}  {} — {}", slot.hour, slot.name, slot.trainer);
        }
    }
    out
}
