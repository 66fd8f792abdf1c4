//! vinadock — receptor/ligand docking from the command line.

mod args;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vinadock_common::Config;
use vinadock_molecules::scoring::PoseSummary;
use vinadock_molecules::{DockingPipeline, DockingResult, Molecule, SearchBox};

#[derive(Serialize)]
struct Report<'a> {
    receptor: &'a Path,
    ligand: &'a Path,
    search_box: Option<SearchBox>,
    poses: Vec<PoseSummary>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vinadock=info,vinadock_molecules=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = args::Args::parse();
    info!("vinadock {}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Could not load config {}", path.display()))?,
        None => Config::load().context("Could not load vinadock.toml")?,
    };
    let options = args.dock_options(&config);

    let receptor = Molecule::read_pdb(&args.receptor)
        .await
        .with_context(|| format!("Could not read receptor {}", args.receptor.display()))?;
    let ligand = Molecule::read_pdb(&args.ligand)
        .await
        .with_context(|| format!("Could not read ligand {}", args.ligand.display()))?;

    let result = DockingPipeline::new(options).run(&receptor, &ligand).await?;

    if let Some(dir) = &args.out_dir {
        write_poses(&result, dir).await?;
    }

    let report = Report {
        receptor: &args.receptor,
        ligand: &args.ligand,
        search_box: result.search_box,
        poses: result.summary(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn write_poses(result: &DockingResult, dir: &Path) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    for (rank, pose) in result.poses.iter().enumerate() {
        let path = dir.join(format!("pose_{}.pdb", rank));
        pose.write_pdb(&path)
            .await
            .with_context(|| format!("Could not write {}", path.display()))?;
    }
    info!("Wrote {} poses to {}", result.len(), dir.display());
    Ok(())
}
