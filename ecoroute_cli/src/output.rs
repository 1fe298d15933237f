use std::{fs::File, io::BufWriter, path::Path, time::Duration};

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use ecoroute_optimizer::{
    problem::time_window::format_clock_minutes,
    solution::{geojson::solution_feature_collection, route::RoutingSolution},
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

pub fn spinner(message: &str) -> Result<ProgressBar, anyhow::Error> {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} ({elapsed})")?);
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(120));

    Ok(bar)
}

fn create_parent_dir(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), anyhow::Error> {
    create_parent_dir(path)?;
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    info!(path = %path.display(), "Wrote JSON");

    Ok(())
}

pub fn write_geojson(path: &Path, solution: &RoutingSolution) -> Result<(), anyhow::Error> {
    let collection = solution_feature_collection(solution);
    create_parent_dir(path)?;
    std::fs::write(path, collection.to_string())?;
    info!(path = %path.display(), features = collection.features.len(), "Wrote GeoJSON");

    Ok(())
}

pub fn summary_table(solution: &RoutingSolution) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["vehicle", "stops", "load (kg)", "distance (km)", "back at"]);

    for route in &solution.routes {
        table.add_row(vec![
            route.vehicle_id.clone(),
            route.stops.len().saturating_sub(1).to_string(),
            format!("{:.2}", route.load_kg()),
            format!("{:.2}", route.distance_km),
            format_clock_minutes(route.return_minute),
        ]);
    }

    table
}

pub fn print_summary(solution: &RoutingSolution) {
    println!("status: {}", solution.status);
    if !solution.is_solved() {
        return;
    }

    println!("{}", summary_table(solution));

    if let Some(objective) = &solution.objective {
        println!(
            "objective: {} (arcs {}, lateness {}, drops {}), {} minutes late",
            objective.total,
            objective.arc_cost,
            objective.lateness_penalty,
            objective.drop_penalty,
            objective.late_minutes
        );
    }

    if !solution.dropped_orders.is_empty() {
        println!("dropped: {}", solution.dropped_orders.join(", "));
    }
}
