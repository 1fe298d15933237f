use std::path::PathBuf;

use clap::Args;
use ecoroute_optimizer::solution::{
    csv_output::read_route_locations_from_path, geojson::routes_feature_collection,
};
use tracing::{info, warn};

#[derive(Args)]
pub struct RenderArgs {
    /// Route stops CSV written by `solve --out`
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// GeoJSON output, printed to stdout when omitted
    #[arg(short = 'o', long)]
    out: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let routes = read_route_locations_from_path(&args.input)?;
    if routes.is_empty() {
        warn!(path = %args.input.display(), "No routes to render");
    }

    let collection = routes_feature_collection(
        routes
            .iter()
            .map(|(vehicle_id, locations)| (vehicle_id.as_str(), locations.as_slice())),
    );

    match args.out {
        Some(path) => {
            std::fs::write(&path, collection.to_string())?;
            info!(
                path = %path.display(),
                features = collection.features.len(),
                "Wrote GeoJSON"
            );
        }
        None => println!("{collection}"),
    }

    Ok(())
}
