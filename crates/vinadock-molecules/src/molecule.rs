//! In-memory molecular structures and PDB atom-record I/O.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use tokio::fs;
use tracing::debug;

use vinadock_common::{DockError, Result};

/// One atom record. Coordinates live in the owning [`Molecule`]'s frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub hetero: bool,
    pub serial: u32,
    pub name: String,
    pub resname: String,
    pub chain: String,
    pub resid: i32,
    pub element: String,
}

impl Atom {
    pub fn new(serial: u32, name: &str, resname: &str, element: &str) -> Self {
        Self {
            hetero: false,
            serial,
            name: name.to_string(),
            resname: resname.to_string(),
            chain: String::new(),
            resid: 1,
            element: element.to_string(),
        }
    }
}

/// A set of atoms with one or more coordinate frames (`frames[frame][atom]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    frames: Vec<Vec<[f64; 3]>>,
    /// Display label, e.g. `Pose 0` for docking results.
    pub view_name: Option<String>,
}

impl Molecule {
    /// Single-frame molecule.
    pub fn new(atoms: Vec<Atom>, coords: Vec<[f64; 3]>) -> Result<Self> {
        Self::from_frames(atoms, vec![coords])
    }

    pub fn from_frames(atoms: Vec<Atom>, frames: Vec<Vec<[f64; 3]>>) -> Result<Self> {
        if let Some((i, frame)) = frames.iter().enumerate().find(|(_, f)| f.len() != atoms.len()) {
            return Err(DockError::Pdb {
                line: 0,
                message: format!(
                    "frame {} has {} coordinates for {} atoms",
                    i,
                    frame.len(),
                    atoms.len()
                ),
            });
        }
        Ok(Self { atoms, frames, view_name: None })
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Coordinates of the first frame.
    pub fn coords(&self) -> &[[f64; 3]] {
        self.frames.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn frame(&self, index: usize) -> Option<&[[f64; 3]]> {
        self.frames.get(index).map(Vec::as_slice)
    }

    /// Per-axis minimum and maximum over the first frame, `None` without atoms.
    /// A NaN coordinate makes both bounds of its axis NaN.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        let coords = self.coords();
        let first = *coords.first()?;
        Some(coords.iter().fold((first, first), |(mut lo, mut hi), c| {
            for axis in 0..3 {
                lo[axis] = nan_min(lo[axis], c[axis]);
                hi[axis] = nan_max(hi[axis], c[axis]);
            }
            (lo, hi)
        }))
    }

    pub fn from_pdb_str(text: &str) -> Result<Self> {
        let mut atoms = Vec::new();
        let mut frames: Vec<Vec<[f64; 3]>> = Vec::new();
        let mut current: Vec<[f64; 3]> = Vec::new();
        let mut in_model = false;

        for (idx, line) in text.lines().enumerate() {
            let lineno = idx + 1;
            let record = field(line, 0, 6);
            match record {
                "MODEL" => {
                    in_model = true;
                    current.clear();
                }
                "ENDMDL" => {
                    finish_frame(&mut frames, &mut current, atoms.len(), lineno)?;
                    in_model = false;
                }
                "ATOM" | "HETATM" => {
                    let xyz = parse_xyz(line, lineno)?;
                    if frames.is_empty() {
                        atoms.push(parse_atom(line, record == "HETATM", lineno)?);
                    }
                    current.push(xyz);
                }
                _ => {}
            }
        }

        if !current.is_empty() || (!in_model && frames.is_empty()) {
            finish_frame(&mut frames, &mut current, atoms.len(), text.lines().count())?;
        }

        debug!("Parsed PDB with {} atoms in {} frame(s)", atoms.len(), frames.len());
        Ok(Self { atoms, frames, view_name: None })
    }

    pub async fn read_pdb<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref()).await?;
        Self::from_pdb_str(&text)
    }

    /// Serializes the first frame as ATOM/HETATM records followed by an `END` line.
    pub fn to_pdb_string(&self) -> String {
        let mut out = String::new();
        for (atom, xyz) in self.atoms.iter().zip(self.coords()) {
            let record = if atom.hetero { "HETATM" } else { "ATOM" };
            let _ = writeln!(
                out,
                "{:<6}{:>5} {}{:>4} {:1}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                record,
                atom.serial % 100_000,
                pdb_atom_name(&atom.name),
                truncate(&atom.resname, 3),
                truncate(&atom.chain, 1),
                atom.resid,
                xyz[0],
                xyz[1],
                xyz[2],
                1.0,
                0.0,
                truncate(&atom.element, 2),
            );
        }
        out.push_str("END\n");
        out
    }

    pub async fn write_pdb<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path.as_ref(), self.to_pdb_string()).await?;
        Ok(())
    }
}

fn finish_frame(
    frames: &mut Vec<Vec<[f64; 3]>>,
    current: &mut Vec<[f64; 3]>,
    natoms: usize,
    lineno: usize,
) -> Result<()> {
    if current.len() != natoms {
        return Err(DockError::Pdb {
            line: lineno,
            message: format!("model has {} atoms, expected {}", current.len(), natoms),
        });
    }
    frames.push(std::mem::take(current));
    Ok(())
}

/// Fixed-column field, tolerant of short lines.
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.min(b) }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) }
}

fn field(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("").trim()
}

fn parse_xyz(line: &str, lineno: usize) -> Result<[f64; 3]> {
    let mut xyz = [0.0; 3];
    for (axis, (start, end)) in [(30, 38), (38, 46), (46, 54)].into_iter().enumerate() {
        let raw = field(line, start, end);
        xyz[axis] = raw.parse().map_err(|_| DockError::Pdb {
            line: lineno,
            message: format!("invalid coordinate '{}'", raw),
        })?;
    }
    Ok(xyz)
}

fn parse_atom(line: &str, hetero: bool, lineno: usize) -> Result<Atom> {
    let name = field(line, 12, 16).to_string();
    let serial = field(line, 6, 11).parse().unwrap_or(0);
    let resid = field(line, 22, 26);
    let resid = if resid.is_empty() {
        0
    } else {
        resid.parse().map_err(|_| DockError::Pdb {
            line: lineno,
            message: format!("invalid residue number '{}'", resid),
        })?
    };
    let mut element = field(line, 76, 78).to_string();
    if element.is_empty() {
        element = name
            .chars()
            .find(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_string())
            .unwrap_or_default();
    }
    Ok(Atom {
        hetero,
        serial,
        name,
        resname: field(line, 17, 20).to_string(),
        chain: field(line, 21, 22).to_string(),
        resid,
        element,
    })
}

/// Four-column atom name; names shorter than four start in column 14.
fn pdb_atom_name(name: &str) -> String {
    if name.len() >= 4 {
        truncate(name, 4).to_string()
    } else {
        format!(" {:<3}", name)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
