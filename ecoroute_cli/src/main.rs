use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{
    generate::GenerateSubcommands, render::RenderArgs, solve::SolveArgs,
    solve_json::SolveJsonArgs,
};

mod generate;
mod output;
mod parsers;
mod render;
mod solve;
mod solve_json;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Routes orders and vehicles read from CSV files
    Solve {
        #[command(flatten)]
        args: SolveArgs,
    },
    /// Routes a JSON request
    SolveJson {
        #[command(flatten)]
        args: SolveJsonArgs,
    },
    /// Renders a persisted route CSV as GeoJSON
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Solve { args }) => solve::run(args)?,
        Some(Commands::SolveJson { args }) => solve_json::run(args)?,
        Some(Commands::Render { args }) => render::run(args)?,
        Some(Commands::Generate { commands }) => generate::run(commands)?,
        None => {}
    }

    Ok(())
}
