//! vinadock molecules - docking of a ligand into a receptor with external tools.
//!
//! A docking call runs these stages in order:
//! 1. Deriving a search box from the receptor when none is given
//! 2. Resolving the Open Babel and AutoDock Vina executables
//! 3. Staging both structures as PDB in a scratch directory
//! 4. Converting them to PDBQT (Open Babel)
//! 5. Docking (AutoDock Vina)
//! 6. Splitting the output into per-pose files and parsing their scores

pub mod molecule;
pub mod search_box;
pub mod staging;
pub mod tools;
pub mod runner;
pub mod babel;
pub mod docking;
pub mod poses;
pub mod scoring;
pub mod pipeline;

pub use molecule::{Atom, Molecule};
pub use pipeline::{dock, DockOptions, DockingPipeline};
pub use scoring::{DockingResult, ScoreTriple};
pub use search_box::SearchBox;

pub type Result<T> = vinadock_common::Result<T>;
