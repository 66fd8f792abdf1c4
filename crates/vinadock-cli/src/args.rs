//! Command-line arguments and their merge with vinadock.toml.

use clap::Parser;
use std::path::PathBuf;

use vinadock_common::Config;
use vinadock_molecules::DockOptions;

#[derive(Debug, Parser)]
#[command(name = "vinadock", version, about = "Dock a ligand into a receptor with Open Babel and AutoDock Vina")]
pub struct Args {
    /// Receptor structure (PDB, single model)
    pub receptor: PathBuf,

    /// Ligand structure (PDB, single model)
    pub ligand: PathBuf,

    /// Search box center in Angstrom; derived from the receptor when omitted
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    pub center: Option<Vec<f64>>,

    /// Search box edge lengths in Angstrom; derived from the receptor when omitted
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    pub extent: Option<Vec<f64>>,

    /// Maximum number of poses to request
    #[arg(long)]
    pub num_poses: Option<u32>,

    #[arg(long)]
    pub exhaustiveness: Option<u32>,

    /// Open Babel executable name or path
    #[arg(long)]
    pub converter: Option<String>,

    /// AutoDock Vina executable name or path
    #[arg(long)]
    pub engine: Option<String>,

    /// Write each pose to <DIR>/pose_<rank>.pdb
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Keep the scratch directory with all intermediate files
    #[arg(long)]
    pub keep_workdir: bool,

    /// Config file (overrides VINADOCK_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Command-line values win over the config file.
    pub fn dock_options(&self, config: &Config) -> DockOptions {
        let mut opts = DockOptions::from_config(config);
        opts.center = self.center.as_deref().and_then(to_vec3);
        opts.extent = self.extent.as_deref().and_then(to_vec3);
        if let Some(n) = self.num_poses {
            opts.num_poses = n;
        }
        if self.exhaustiveness.is_some() {
            opts.exhaustiveness = self.exhaustiveness;
        }
        if let Some(converter) = &self.converter {
            opts.converter = Some(converter.clone());
        }
        if let Some(engine) = &self.engine {
            opts.engine = Some(engine.clone());
        }
        opts.keep_workdir |= self.keep_workdir;
        opts
    }
}

fn to_vec3(values: &[f64]) -> Option<[f64; 3]> {
    values.try_into().ok()
}
