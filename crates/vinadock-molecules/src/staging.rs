//! Per-call scratch directory and structure export for the converter.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::fs;
use tracing::{debug, info};

use crate::molecule::Molecule;
use vinadock_common::{DockError, Result};

/// Name stem of the per-pose files the converter splits the engine output into.
pub const POSE_PREFIX: &str = "pose_";

/// Scratch directory owning every intermediate file of one docking call.
/// Dropping it removes the directory unless it was persisted.
pub struct WorkDir {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl WorkDir {
    /// Create under the system temp directory.
    pub fn create() -> Result<Self> {
        Self::create_in(None)
    }

    /// Create under `root`, or the system temp directory when `None`.
    pub fn create_in(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("vinadock-");
        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        let path = dir.path().to_path_buf();
        debug!("Created working directory {}", path.display());
        Ok(Self { dir: Some(dir), path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn protein_pdb(&self) -> PathBuf { self.path.join("protein.pdb") }
    pub fn ligand_pdb(&self) -> PathBuf { self.path.join("ligand.pdb") }
    pub fn protein_pdbqt(&self) -> PathBuf { self.path.join("protein.pdbqt") }
    pub fn ligand_pdbqt(&self) -> PathBuf { self.path.join("ligand.pdbqt") }
    pub fn output_pdbqt(&self) -> PathBuf { self.path.join("output.pdbqt") }

    /// Target handed to the splitting converter; it writes `pose_1.pdb`, `pose_2.pdb`, ...
    pub fn pose_template(&self) -> PathBuf {
        self.path.join(format!("{}.pdb", POSE_PREFIX))
    }

    /// Keep the directory on disk after this value is dropped.
    pub fn persist(&mut self) -> PathBuf {
        if let Some(dir) = self.dir.take() {
            let path = dir.keep();
            info!("Keeping working directory {}", path.display());
        }
        self.path.clone()
    }
}

/// Writes `molecule` as PDB and strips the trailing terminator record,
/// which the converter refuses.
pub async fn export_structure(molecule: &Molecule, path: &Path, label: &str) -> Result<()> {
    if molecule.num_atoms() == 0 {
        return Err(DockError::EmptyStructure(label.to_string()));
    }

    molecule.write_pdb(path).await?;
    let text = fs::read_to_string(path).await?;
    let trimmed = strip_terminator(&text)
        .ok_or_else(|| DockError::EmptyStructure(label.to_string()))?;
    fs::write(path, trimmed).await?;

    debug!("Staged {} structure at {}", label, path.display());
    Ok(())
}

/// Drops the last line. `None` if nothing would be left.
fn strip_terminator(text: &str) -> Option<String> {
    let mut lines: Vec<&str> = text.lines().collect();
    lines.pop()?;
    if lines.is_empty() {
        return None;
    }
    let mut out = lines.join("\n");
    out.push('\n');
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::Atom;

    #[test]
    fn test_strip_terminator() {
        assert_eq!(strip_terminator("ATOM 1\nATOM 2\nEND\n").as_deref(), Some("ATOM 1\nATOM 2\n"));
        assert_eq!(strip_terminator("ATOM 1\nEND").as_deref(), Some("ATOM 1\n"));
        assert_eq!(strip_terminator("END\n"), None);
        assert_eq!(strip_terminator(""), None);
    }

    #[tokio::test]
    async fn test_export_drops_end_record() {
        let work = WorkDir::create().unwrap();
        let mol = Molecule::new(vec![Atom::new(1, "C1", "LIG", "C")], vec![[1.0, 2.0, 3.0]]).unwrap();
        export_structure(&mol, &work.ligand_pdb(), "ligand").await.unwrap();

        let text = std::fs::read_to_string(work.ligand_pdb()).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("ATOM"));
        assert!(!text.contains("END"));
    }

    #[tokio::test]
    async fn test_export_rejects_empty_structure() {
        let work = WorkDir::create().unwrap();
        let empty = Molecule::new(vec![], vec![]).unwrap();
        let err = export_structure(&empty, &work.protein_pdb(), "receptor").await.unwrap_err();
        assert!(matches!(err, DockError::EmptyStructure(_)));
        assert!(!work.protein_pdb().exists());
    }

    #[test]
    fn test_workdir_removed_on_drop() {
        let work = WorkDir::create().unwrap();
        let path = work.path().to_path_buf();
        std::fs::write(work.pose_template(), "x").unwrap();
        drop(work);
        assert!(!path.exists());
    }

    #[test]
    fn test_workdir_created_under_root() {
        let root = tempfile::tempdir().unwrap();
        let work = WorkDir::create_in(Some(root.path())).unwrap();
        assert_eq!(work.path().parent(), Some(root.path()));
        let name = work.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("vinadock-"));
        drop(work);
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_persisted_workdir_survives_drop() {
        let mut work = WorkDir::create().unwrap();
        let path = work.persist();
        drop(work);
        assert!(path.exists());
        std::fs::remove_dir_all(path).unwrap();
    }
}
