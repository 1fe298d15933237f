use std::{fs::File, io::BufReader, path::PathBuf};

use clap::Args;
use ecoroute_optimizer::{
    engine::cheapest_arc::CheapestArcEngine, json::types::JsonRoutingRequest,
    solver::solve::Solver,
};
use tracing::info;

use crate::{output, solve::SolverArgs};

#[derive(Args)]
pub struct SolveJsonArgs {
    /// The JSON request to solve
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Where to persist the route stops as CSV
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    solver: SolverArgs,
}

pub fn run(args: SolveJsonArgs) -> anyhow::Result<()> {
    let file = File::open(&args.input)?;
    let request: JsonRoutingRequest = serde_json::from_reader(BufReader::new(file))?;
    let mut parts = request.into_parts()?;

    if let Some(timeout) = args.solver.timeout {
        parts.params.time_limit = timeout;
    }
    if args.out.is_some() {
        parts.params.output_path = args.out.clone();
    }

    info!(
        orders = parts.orders.len(),
        vehicles = parts.vehicles.len(),
        "Solving {}",
        args.input.display()
    );

    let solver = Solver::with_engine(CheapestArcEngine, args.solver.client(), parts.params);

    let bar = output::spinner("solving")?;
    let result = solver.solve(parts.orders, parts.vehicles, parts.provider);
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
