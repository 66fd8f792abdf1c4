//! Orchestrator for a docking run: staging, conversion, Vina, pose parsing.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::babel::{BabelRunner, Preparation};
use crate::docking::{DockingConfig, VinaRunner};
use crate::molecule::Molecule;
use crate::poses::{collect_pose_files, load_poses};
use crate::runner::{CommandRunner, ProcessRunner};
use crate::scoring::DockingResult;
use crate::search_box::{SearchBox, DEFAULT_BUFFER};
use crate::staging::{export_structure, WorkDir, POSE_PREFIX};
use crate::tools::ToolPaths;
use vinadock_common::{Config, DockError, Result, Side};

/// Caller-facing knobs of a docking call.
#[derive(Debug, Clone)]
pub struct DockOptions {
    /// Box center; derived from the receptor when unset.
    pub center: Option<[f64; 3]>,
    /// Box edge lengths; derived from the receptor when unset.
    pub extent: Option<[f64; 3]>,
    pub num_poses: u32,
    pub exhaustiveness: Option<u32>,
    /// Converter executable name or path (default `obabel`).
    pub converter: Option<String>,
    /// Docking engine executable name or path (default `{platform}-vina`).
    pub engine: Option<String>,
    pub buffer: f64,
    pub keep_workdir: bool,
    pub tool_timeout: Option<Duration>,
    /// Parent of the scratch directory; the system temp dir when unset.
    pub scratch_root: Option<PathBuf>,
}

impl Default for DockOptions {
    fn default() -> Self {
        Self {
            center: None,
            extent: None,
            num_poses: 20,
            exhaustiveness: None,
            converter: None,
            engine: None,
            buffer: DEFAULT_BUFFER,
            keep_workdir: false,
            tool_timeout: None,
            scratch_root: None,
        }
    }
}

impl DockOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            num_poses: config.docking.num_poses,
            exhaustiveness: config.docking.exhaustiveness,
            converter: Some(config.tools.converter.clone()),
            engine: config.tools.engine.clone(),
            buffer: config.docking.buffer,
            keep_workdir: config.docking.keep_workdir,
            tool_timeout: config.docking.tool_timeout_secs.map(Duration::from_secs),
            scratch_root: config.docking.scratch_dir.clone(),
            ..Default::default()
        }
    }

    pub fn with_box(mut self, center: [f64; 3], extent: [f64; 3]) -> Self {
        self.center = Some(center);
        self.extent = Some(extent);
        self
    }

    pub fn with_num_poses(mut self, num_poses: u32) -> Self {
        self.num_poses = num_poses;
        self
    }
}

pub struct DockingPipeline {
    options: DockOptions,
    runner: Arc<dyn CommandRunner>,
}

impl DockingPipeline {
    pub fn new(options: DockOptions) -> Self {
        let runner = ProcessRunner::new().with_timeout(options.tool_timeout);
        Self::with_runner(options, Arc::new(runner))
    }

    /// Use a custom [`CommandRunner`] in place of real child processes.
    pub fn with_runner(options: DockOptions, runner: Arc<dyn CommandRunner>) -> Self {
        Self { options, runner }
    }

    pub fn options(&self) -> &DockOptions {
        &self.options
    }

    /// Dock `ligand` against `receptor`, returning poses best-first with their scores.
    pub async fn run(&self, receptor: &Molecule, ligand: &Molecule) -> Result<DockingResult> {
        let opts = &self.options;
        check_single_frame(receptor, Side::Receptor)?;
        check_single_frame(ligand, Side::Ligand)?;

        let search_box = SearchBox::resolve(receptor, opts.center, opts.extent, opts.buffer)?;
        info!(
            "Docking {} ligand atoms against {} receptor atoms, box center {:?} extent {:?}",
            ligand.num_atoms(),
            receptor.num_atoms(),
            search_box.center,
            search_box.extent
        );

        let tools = ToolPaths::locate(opts.converter.as_deref(), opts.engine.as_deref())?;

        let mut work = WorkDir::create_in(opts.scratch_root.as_deref())?;
        let result = self
            .dock_in(&work, &tools, search_box, receptor, ligand)
            .await
            .map(|result| DockingResult { search_box: Some(search_box), ..result });
        if opts.keep_workdir {
            work.persist();
        }
        result
    }

    async fn dock_in(
        &self,
        work: &WorkDir,
        tools: &ToolPaths,
        search_box: SearchBox,
        receptor: &Molecule,
        ligand: &Molecule,
    ) -> Result<DockingResult> {
        export_structure(receptor, &work.protein_pdb(), "receptor").await?;
        export_structure(ligand, &work.ligand_pdb(), "ligand").await?;

        let babel = BabelRunner::new(&tools.converter, self.runner.as_ref()).with_working_dir(work.path());
        let protein = babel
            .to_pdbqt(&work.protein_pdb(), &work.protein_pdbqt(), Preparation::Receptor)
            .await?;
        let lig = babel
            .to_pdbqt(&work.ligand_pdb(), &work.ligand_pdbqt(), Preparation::Ligand)
            .await?;

        if !work.ligand_pdbqt().is_file() {
            return Err(DockError::ConversionFailed {
                side: Side::Ligand,
                status: lig.code,
                stderr: lig.stderr,
            });
        }
        if !work.protein_pdbqt().is_file() {
            return Err(DockError::ConversionFailed {
                side: Side::Receptor,
                status: protein.code,
                stderr: protein.stderr,
            });
        }

        let vina = VinaRunner::new(&tools.engine, self.runner.as_ref()).with_working_dir(work.path());
        let config = DockingConfig {
            receptor: work.protein_pdbqt(),
            ligand: work.ligand_pdbqt(),
            out: work.output_pdbqt(),
            search_box,
            num_modes: self.options.num_poses,
            exhaustiveness: self.options.exhaustiveness,
        };
        let docked = vina.run(&config).await?;
        if !config.out.is_file() {
            return Err(DockError::DockingFailed {
                status: docked.code,
                stderr: docked.stderr,
            });
        }

        let split = babel.split_poses(&config.out, &work.pose_template()).await?;
        let files = collect_pose_files(work.path(), POSE_PREFIX).await?;
        if files.is_empty() {
            warn!("No pose files were produced ({:?}): {}", split.code, split.stderr);
        }

        load_poses(&files).await
    }
}

fn check_single_frame(molecule: &Molecule, side: Side) -> Result<()> {
    match molecule.num_frames() {
        1 => Ok(()),
        frames => Err(DockError::MultiFrame { side, frames }),
    }
}

/// Dock with real `obabel` / Vina processes.
pub async fn dock(receptor: &Molecule, ligand: &Molecule, options: DockOptions) -> Result<DockingResult> {
    DockingPipeline::new(options).run(receptor, ligand).await
}
