//! Plain-text output for the `dex` command.

use crate::app::session::CatalogView;
use crate::types::CreatureDetails;
use std::fmt::Write;

/// `"mr-mime"` -> `"Mr-mime"`
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn display_types(types: &[String]) -> String {
    types.iter().map(|t| capitalize(t)).collect::<Vec<_>>().join(", ")
}

pub fn render_view(view: &CatalogView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>6}  {:<24} {:<22} {:>5}", "Dex", "Name", "Types", "Total");
    for row in &view.rows {
        let _ = writeln!(
            out,
            "{:>6}  {:<24} {:<22} {:>5}",
            row.id,
            capitalize(&row.name),
            display_types(&row.types),
            row.total_stats
        );
    }
    if view.rows.is_empty() {
        let _ = writeln!(out, "  (no results)");
    }
    let _ = writeln!(
        out,
        "Page {} of {} · Total {} · ?{}",
        view.page, view.page_count, view.total, view.query
    );
    out
}

pub fn render_details(details: &CreatureDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", details.name.to_uppercase(), details.id);
    for line in &details.description {
        let _ = writeln!(out, "  {}", line);
    }
    let _ = writeln!(out, "Height:        {} m", details.height_metres());
    let _ = writeln!(out, "Weight:        {} kg", details.weight_kilograms());
    let _ = writeln!(out, "Color:         {}", details.color);
    match details.hatch_counter {
        Some(counter) => {
            let _ = writeln!(out, "Hatch counter: {}", counter);
        }
        None => {
            let _ = writeln!(out, "Hatch counter: no data");
        }
    }
    let _ = writeln!(out, "Capture rate:  {}", details.capture_rate);
    let _ = writeln!(out, "Types:         {}", display_types(&details.types));
    if let Some(sprite) = &details.sprite {
        let _ = writeln!(out, "Artwork:       {}", sprite);
    }
    let _ = writeln!(out, "Stats:");
    for stat in &details.stats {
        let _ = writeln!(out, "  {:<16} {:>4}", stat.name, stat.base_stat);
    }
    let _ = writeln!(out, "Total stats:   {}", details.total_stats);
    out
}
