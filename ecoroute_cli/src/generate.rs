use std::path::{Path, PathBuf};

use clap::Subcommand;
use ecoroute_optimizer::problem::{
    order::{DEPOT_LAT, DEPOT_LON},
    priority::Priority,
    time_window::format_clock_minutes,
};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::info;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    JsonSchema {
        /// Output file for the request schema
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
    /// Random orders and vehicles CSV files around the depot
    Instance {
        /// Output folder for orders.csv and vehicles.csv
        #[arg(long, short = 'o')]
        out: PathBuf,

        #[arg(long, default_value_t = 50)]
        orders: usize,

        #[arg(long, default_value_t = 5)]
        vehicles: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::JsonSchema { out } => {
            let schema = ecoroute_optimizer::json::schema::generate_json_schema()?;

            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(out, schema)?;
        }
        GenerateSubcommands::Instance {
            out,
            orders,
            vehicles,
            seed,
        } => {
            std::fs::create_dir_all(&out)?;
            let mut rng = SmallRng::seed_from_u64(seed);

            write_orders(&out.join("orders.csv"), orders, &mut rng)?;
            write_vehicles(&out.join("vehicles.csv"), vehicles, &mut rng)?;
            info!(orders, vehicles, folder = %out.display(), "Generated instance");
        }
    }

    Ok(())
}

fn write_orders(path: &Path, count: usize, rng: &mut SmallRng) -> Result<(), anyhow::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "OrderID",
        "Weight(kg)",
        "Priority",
        "WindowStart",
        "WindowEnd",
        "lat",
        "lon",
    ])?;

    for index in 0..count {
        let priority = Priority::ALL[rng.random_range(0..Priority::ALL.len())];
        let (start, end) = if rng.random_bool(0.5) {
            let start = rng.random_range(8 * 60..15 * 60);
            let end = start + rng.random_range(30..180);
            (format_clock_minutes(start), format_clock_minutes(end))
        } else {
            (String::new(), String::new())
        };

        writer.write_record([
            format!("order_{index}"),
            format!("{:.2}", rng.random_range(0.5..25.0)),
            priority.as_str().to_owned(),
            start,
            end,
            format!("{:.6}", DEPOT_LAT + rng.random_range(-0.08..0.08)),
            format!("{:.6}", DEPOT_LON + rng.random_range(-0.12..0.12)),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_vehicles(path: &Path, count: usize, rng: &mut SmallRng) -> Result<(), anyhow::Error> {
    const FLEET: [(&str, &str, f64, f64); 3] = [
        ("cargo_bike", "electric", 80.0, 0.0),
        ("van", "diesel", 600.0, 180.0),
        ("hybrid_van", "hybrid", 500.0, 110.0),
    ];

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "vehicle_id",
        "max_capacity_kg",
        "emission_g_co2_per_km",
        "type",
        "fuel_type",
    ])?;

    for index in 0..count {
        let (kind, fuel_type, capacity, emission_factor) = FLEET[rng.random_range(0..FLEET.len())];
        writer.write_record([
            format!("vehicle_{index}"),
            format!("{capacity:.0}"),
            format!("{emission_factor:.0}"),
            kind.to_owned(),
            fuel_type.to_owned(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use ecoroute_optimizer::parsers::{
        orders_csv::parse_orders_from_path, vehicles_csv::parse_vehicles_from_path,
    };

    use super::*;

    #[test]
    fn test_generated_instance_parses() {
        let folder = tempfile::tempdir().unwrap();

        run(GenerateSubcommands::Instance {
            out: folder.path().to_path_buf(),
            orders: 20,
            vehicles: 3,
            seed: 7,
        })
        .unwrap();

        let orders = parse_orders_from_path(&folder.path().join("orders.csv")).unwrap();
        let vehicles = parse_vehicles_from_path(&folder.path().join("vehicles.csv")).unwrap();

        assert_eq!(orders.len(), 20);
        assert_eq!(vehicles.len(), 3);
    }
}
