use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which input structure an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Receptor,
    Ligand,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Receptor => f.write_str("Protein"),
            Side::Ligand => f.write_str("Ligand"),
        }
    }
}

/// Renders an exit code the way the error messages report it.
pub fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[derive(Debug, Error)]
pub enum DockError {
    #[error("Protein and ligand molecules should be single frames ({side} has {frames} frames)")]
    MultiFrame { side: Side, frames: usize },

    #[error("Could not find {tool} ('{name}'), or no execute permissions are given")]
    ToolNotFound { tool: &'static str, name: String },

    #[error("{side} could not be converted to PDBQT ({}): {stderr}", describe_status(.status))]
    ConversionFailed {
        side: Side,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Docking engine produced no output ({}): {stderr}", describe_status(.status))]
    DockingFailed { status: Option<i32>, stderr: String },

    #[error("Could not parse vina output correctly {}", .path.display())]
    ScoreParse { path: PathBuf },

    #[error("Structure has no atoms: {0}")]
    EmptyStructure(String),

    #[error("PDB parse error at line {line}: {message}")]
    Pdb { line: usize, message: String },

    #[error("{tool} did not finish within {secs}s")]
    Timeout { tool: &'static str, secs: u64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DockError>;
