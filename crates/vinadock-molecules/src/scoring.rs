//! Docking scores and the assembled result of a docking call.

use serde::{Deserialize, Serialize};

use crate::molecule::Molecule;
use crate::search_box::SearchBox;

/// Vina's per-pose annotation: affinity (kcal/mol) and RMSD bounds to the best pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTriple {
    pub affinity: f64,
    pub rmsd_lb: f64,
    pub rmsd_ub: f64,
}

impl ScoreTriple {
    pub fn as_array(&self) -> [f64; 3] {
        [self.affinity, self.rmsd_lb, self.rmsd_ub]
    }
}

/// Poses and their scores, positionally paired, in the engine's ranking order.
#[derive(Debug, Clone, Default)]
pub struct DockingResult {
    pub poses: Vec<Molecule>,
    pub scores: Vec<ScoreTriple>,
    /// Box the engine searched, as supplied or derived from the receptor.
    pub search_box: Option<SearchBox>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseSummary {
    pub rank: usize,
    pub name: String,
    pub atoms: usize,
    #[serde(flatten)]
    pub score: ScoreTriple,
}

impl DockingResult {
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Scores as an N×3 array of `[kcal/mol, rmsd lb, rmsd ub]`.
    pub fn scores_matrix(&self) -> Vec<[f64; 3]> {
        self.scores.iter().map(ScoreTriple::as_array).collect()
    }

    /// Top-ranked pose.
    pub fn best(&self) -> Option<(&Molecule, &ScoreTriple)> {
        self.poses.first().zip(self.scores.first())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Molecule, &ScoreTriple)> {
        self.poses.iter().zip(self.scores.iter())
    }

    pub fn summary(&self) -> Vec<PoseSummary> {
        self.iter()
            .enumerate()
            .map(|(rank, (pose, score))| PoseSummary {
                rank,
                name: pose.view_name.clone().unwrap_or_else(|| format!("Pose {}", rank)),
                atoms: pose.num_atoms(),
                score: *score,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::Atom;

    fn pose(name: &str) -> Molecule {
        let mut m = Molecule::new(vec![Atom::new(1, "C1", "LIG", "C")], vec![[0.0; 3]]).unwrap();
        m.view_name = Some(name.to_string());
        m
    }

    #[test]
    fn test_matrix_and_best() {
        let result = DockingResult {
            poses: vec![pose("Pose 0"), pose("Pose 1")],
            scores: vec![
                ScoreTriple { affinity: -8.1, rmsd_lb: 0.0, rmsd_ub: 0.0 },
                ScoreTriple { affinity: -7.4, rmsd_lb: 1.9, rmsd_ub: 3.2 },
            ],
            search_box: None,
        };
        assert_eq!(result.len(), 2);
        assert_eq!(result.scores_matrix(), vec![[-8.1, 0.0, 0.0], [-7.4, 1.9, 3.2]]);
        let (best, score) = result.best().unwrap();
        assert_eq!(best.view_name.as_deref(), Some("Pose 0"));
        assert_eq!(score.affinity, -8.1);
    }

    #[test]
    fn test_summary_serializes_flat() {
        let result = DockingResult {
            poses: vec![pose("Pose 0")],
            scores: vec![ScoreTriple { affinity: -6.0, rmsd_lb: 0.0, rmsd_ub: 0.0 }],
            search_box: None,
        };
        let json = serde_json::to_value(result.summary()).unwrap();
        assert_eq!(json[0]["rank"], 0);
        assert_eq!(json[0]["name"], "Pose 0");
        assert_eq!(json[0]["affinity"], -6.0);
    }

    #[test]
    fn test_empty_result() {
        let result = DockingResult::default();
        assert!(result.is_empty());
        assert!(result.best().is_none());
        assert!(result.scores_matrix().is_empty());
    }
}
