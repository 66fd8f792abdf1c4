//! Structure format conversion using Open Babel.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::runner::{CommandRunner, Invocation, ToolKind, ToolOutcome};
use vinadock_common::Result;

/// How an input PDB is prepared for docking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preparation {
    /// Rigid receptor: keep the original atom records (`-xr`).
    Receptor,
    /// Flexible ligand: strip and re-add polar hydrogens, Gasteiger charges.
    Ligand,
}

/// Wrapper for Open Babel execution.
pub struct BabelRunner<'a> {
    executable_path: PathBuf,
    working_dir: Option<PathBuf>,
    runner: &'a dyn CommandRunner,
}

impl<'a> BabelRunner<'a> {
    /// Create a new BabelRunner.
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
        let inv = Invocation::new(ToolKind::Converter, &self.executable_path);
        match &self.working_dir {
            Some(dir) => inv.current_dir(dir),
            None => inv,
        }
    }

    pub fn to_pdbqt_invocation(&self, input: &Path, output: &Path, prep: Preparation) -> Invocation {
        let inv = self.command()
            .arg("-i")
            .arg("pdb")
            .arg(input)
            .arg("-o")
            .arg("pdbqt")
            .arg("-O")
            .arg(output);
        match prep {
            Preparation::Receptor => inv.arg("-xr"),
            Preparation::Ligand => inv
                .arg("-xn")
                .arg("-xh")
                .arg("--partialcharge")
                .arg("gasteiger"),
        }
    }

    /// Convert a PDB file to PDBQT.
    pub async fn to_pdbqt(&self, input: &Path, output: &Path, prep: Preparation) -> Result<ToolOutcome> {
        info!("Converting {:?} to PDBQT ({:?})", input, prep);
        let inv = self.to_pdbqt_invocation(input, output, prep);
        self.runner.run(&inv).await
    }

    pub fn split_poses_invocation(&self, bulk: &Path, template: &Path) -> Invocation {
        self.command()
            .arg("-m")
            .arg("-i")
            .arg("pdbqt")
            .arg(bulk)
            .arg("-o")
            .arg("pdb")
            .arg("-O")
            .arg(template)
            .arg("-xhn")
    }

    /// Split a multi-pose PDBQT into numbered PDB files named after `template`.
    pub async fn split_poses(&self, bulk: &Path, template: &Path) -> Result<ToolOutcome> {
        info!("Splitting docking output {:?} into per-pose files", bulk);
        let inv = self.split_poses_invocation(bulk, template);
        self.runner.run(&inv).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ProcessRunner;

    #[test]
    fn test_receptor_arguments() {
        let runner = ProcessRunner::new();
        let babel = BabelRunner::new("/usr/bin/obabel", &runner);
        let inv = babel.to_pdbqt_invocation(Path::new("p.pdb"), Path::new("p.pdbqt"), Preparation::Receptor);
        assert_eq!(inv.tool, ToolKind::Converter);
        assert_eq!(
            inv.args_lossy(),
            ["-i", "pdb", "p.pdb", "-o", "pdbqt", "-O", "p.pdbqt", "-xr"]
        );
    }

    #[test]
    fn test_ligand_arguments() {
        let runner = ProcessRunner::new();
        let babel = BabelRunner::new("obabel", &runner);
        let inv = babel.to_pdbqt_invocation(Path::new("l.pdb"), Path::new("l.pdbqt"), Preparation::Ligand);
        assert_eq!(
            inv.args_lossy(),
            ["-i", "pdb", "l.pdb", "-o", "pdbqt", "-O", "l.pdbqt", "-xn", "-xh", "--partialcharge", "gasteiger"]
        );
    }

    #[test]
    fn test_split_arguments() {
        let runner = ProcessRunner::new();
        let babel = BabelRunner::new("obabel", &runner);
        let inv = babel.split_poses_invocation(Path::new("out.pdbqt"), Path::new("pose_.pdb"));
        assert_eq!(
            inv.args_lossy(),
            ["-m", "-i", "pdbqt", "out.pdbqt", "-o", "pdb", "-O", "pose_.pdb", "-xhn"]
        );
        assert!(inv.cwd.is_none());
    }

    #[test]
    fn test_working_dir_applies_to_every_command() {
        let runner = ProcessRunner::new();
        let babel = BabelRunner::new("obabel", &runner).with_working_dir("/scratch/run");
        let convert = babel.to_pdbqt_invocation(Path::new("l.pdb"), Path::new("l.pdbqt"), Preparation::Ligand);
        let split = babel.split_poses_invocation(Path::new("out.pdbqt"), Path::new("pose_.pdb"));
        assert_eq!(convert.cwd.as_deref(), Some(Path::new("/scratch/run")));
        assert_eq!(split.cwd.as_deref(), Some(Path::new("/scratch/run")));
    }
}
