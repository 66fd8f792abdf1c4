//! Molecular docking using AutoDock Vina.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::runner::{CommandRunner, Invocation, ToolKind, ToolOutcome};
use crate::search_box::SearchBox;
use vinadock_common::Result;

/// Configuration for a docking run.
#[derive(Debug, Clone)]
pub struct DockingConfig {
    pub receptor: PathBuf,
    pub ligand: PathBuf,
    pub out: PathBuf,
    pub search_box: SearchBox,
    /// Upper bound on returned poses; Vina caps this itself.
    pub num_modes: u32,
    pub exhaustiveness: Option<u32>,
}

/// Wrapper for AutoDock Vina execution.
pub struct VinaRunner<'a> {
    executable_path: PathBuf,
    working_dir: Option<PathBuf>,
    runner: &'a dyn CommandRunner,
}

impl<'a> VinaRunner<'a> {
    /// Create a new VinaRunner.
    pub fn new<P: AsRef<Path>>(executable_path: P, runner: &'a dyn CommandRunner) -> Self {
        Self {
            executable_path: executable_path.as_ref().to_path_buf(),
            working_dir: None,
            runner,
        }
    }

    /// Run the tool from `dir` instead of the caller's working directory.
    pub fn with_working_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn command(&self) -> Invocation {
        let inv = Invocation::new(ToolKind::DockingEngine, &self.executable_path);
        match &self.working_dir {
            Some(dir) => inv.current_dir(dir),
            None => inv,
        }
    }

    pub fn invocation(&self, config: &DockingConfig) -> Invocation {
        let [cx, cy, cz] = config.search_box.center;
        let [sx, sy, sz] = config.search_box.extent;

        let inv = self.command()
            .arg("--receptor")
            .arg(&config.receptor)
            .arg("--ligand")
            .arg(&config.ligand)
            .arg("--out")
            .arg(&config.out)
            .arg("--center_x")
            .arg(cx.to_string())
            .arg("--center_y")
            .arg(cy.to_string())
            .arg("--center_z")
            .arg(cz.to_string())
            .arg("--size_x")
            .arg(sx.to_string())
            .arg("--size_y")
            .arg(sy.to_string())
            .arg("--size_z")
            .arg(sz.to_string())
            .arg("--num_modes")
            .arg(config.num_modes.to_string());

        match config.exhaustiveness {
            Some(n) => inv.arg("--exhaustiveness").arg(n.to_string()),
            None => inv,
        }
    }

    /// Run AutoDock Vina with the given configuration.
    pub async fn run(&self, config: &DockingConfig) -> Result<ToolOutcome> {
        info!("Running AutoDock Vina on {:?}", config.ligand);

        let outcome = self.runner.run(&self.invocation(config)).await?;

        debug!("AutoDock Vina finished ({:?}). Output in {:?}", outcome.code, config.out);
        Ok(outcome)
    }
}
