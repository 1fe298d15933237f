use std::path::PathBuf;

use clap::{Args, ValueEnum};
use ecoroute_matrix_providers::{
    cache::FolderMatricesCache, distance_matrix::DistanceMatrix,
    distance_matrix_client::DistanceMatrixClient,
    distance_matrix_provider::DistanceMatrixProvider,
};
use ecoroute_optimizer::{
    engine::cheapest_arc::CheapestArcEngine,
    parsers::{orders_csv::parse_orders_from_path, vehicles_csv::parse_vehicles_from_path},
    problem::kmh::Kmh,
    solver::{solve::Solver, solve_params::SolveParams},
};
use tracing::info;

use crate::{output, parsers};

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum Preset {
    #[default]
    Default,
    LowCarbon,
    EvPriority,
}

/// Options shared by every command that runs the solver.
#[derive(Args)]
pub struct SolverArgs {
    /// Time budget for the search (e.g., "10s", "PT1M", "30")
    #[arg(short, long, value_parser = parsers::parse_duration)]
    pub timeout: Option<jiff::SignedDuration>,

    /// Folder where derived distance matrices are cached
    #[arg(long, env = "ECOROUTE_CACHE_FOLDER")]
    pub cache_folder: Option<PathBuf>,

    /// Where to write the solution as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Where to write the routes as GeoJSON
    #[arg(long)]
    pub geojson: Option<PathBuf>,
}

impl SolverArgs {
    pub fn client(&self) -> DistanceMatrixClient<Option<FolderMatricesCache>> {
        DistanceMatrixClient::new(self.cache_folder.clone().map(FolderMatricesCache::new))
    }
}

#[derive(Args)]
pub struct SolveArgs {
    /// Orders CSV
    #[arg(short, long)]
    orders: PathBuf,

    /// Vehicles CSV
    #[arg(short, long)]
    vehicles: PathBuf,

    #[arg(long, value_enum, default_value_t = Preset::Default)]
    preset: Preset,

    /// Precomputed distance matrix as JSON, depot first
    #[arg(long)]
    distance_matrix: Option<PathBuf>,

    /// Treat window ends as hard bounds
    #[arg(long)]
    no_late: bool,

    /// Every order must be routed
    #[arg(long)]
    no_dropping: bool,

    #[arg(long)]
    w_distance: Option<f64>,

    #[arg(long)]
    w_emissions: Option<f64>,

    #[arg(long)]
    w_on_time: Option<f64>,

    /// Travel speed in km/h
    #[arg(long)]
    speed: Option<f64>,

    /// Where to persist the route stops as CSV
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    solver: SolverArgs,
}

impl SolveArgs {
    fn params(&self) -> SolveParams {
        let mut params = match self.preset {
            Preset::Default => SolveParams::default(),
            Preset::LowCarbon => SolveParams::low_carbon(),
            Preset::EvPriority => SolveParams::ev_priority(),
        };

        params.allow_late_deliveries = !self.no_late;
        params.allow_dropping_orders = !self.no_dropping;
        params.output_path = self.out.clone();

        if let Some(timeout) = self.solver.timeout {
            params.time_limit = timeout;
        }
        if let Some(w_distance) = self.w_distance {
            params.w_distance = w_distance;
        }
        if let Some(w_emissions) = self.w_emissions {
            params.w_emissions = w_emissions;
        }
        if let Some(w_on_time) = self.w_on_time {
            params.w_on_time = w_on_time;
        }
        if let Some(speed) = self.speed {
            params.speed = Kmh::new(speed);
        }

        params
    }
}

pub fn run(args: SolveArgs) -> anyhow::Result<()> {
    let orders = parse_orders_from_path(&args.orders)?;
    let vehicles = parse_vehicles_from_path(&args.vehicles)?;

    let provider = match &args.distance_matrix {
        Some(path) => DistanceMatrixProvider::Precomputed {
            matrix: DistanceMatrix::from_json_file(path)?,
        },
        None => DistanceMatrixProvider::AsTheCrowFlies,
    };

    info!(
        orders = orders.len(),
        vehicles = vehicles.len(),
        "Solving {}",
        args.orders.display()
    );

    let solver = Solver::with_engine(CheapestArcEngine, args.solver.client(), args.params());

    let bar = output::spinner("solving")?;
    let result = solver.solve(orders, vehicles, provider);
    bar.finish_and_clear();
    let solution = result?;

    output::print_summary(&solution);

    if let Some(path) = &args.solver.json {
        output::write_json(path, &solution)?;
    }
    if let Some(path) = &args.solver.geojson {
        output::write_geojson(path, &solution)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: SolveArgs,
    }

    #[test]
    fn test_params_from_flags() {
        let cli = TestCli::parse_from([
            "ecoroute",
            "--orders",
            "orders.csv",
            "--vehicles",
            "vehicles.csv",
            "--preset",
            "low-carbon",
            "--no-late",
            "--timeout",
            "3s",
            "--speed",
            "40",
        ]);

        let params = cli.args.params();

        assert!(!params.allow_late_deliveries);
        assert!(params.allow_dropping_orders);
        assert_eq!(params.w_emissions, SolveParams::low_carbon().w_emissions);
        assert_eq!(params.time_limit, jiff::SignedDuration::from_secs(3));
        assert_eq!(params.speed, Kmh::new(40.0));
    }
}
