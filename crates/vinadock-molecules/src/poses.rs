//! Collection and parsing of the per-pose files produced after docking.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::molecule::Molecule;
use crate::scoring::{DockingResult, ScoreTriple};
use vinadock_common::{DockError, Result};

/// Annotation line Vina writes at the top of every pose.
pub const RESULT_MARKER: &str = "REMARK VINA RESULT:";

/// Files in `dir` named `{prefix}*.pdb`, in natural order (`pose_2` before `pose_10`).
pub async fn collect_pose_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(prefix) && name.ends_with(".pdb") && entry.file_type().await?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    debug!("Found {} pose files in {}", files.len(), dir.display());
    Ok(files)
}

/// Scores from the first result annotation in `text`.
pub fn parse_score_text(text: &str) -> Option<ScoreTriple> {
    let line = text.lines().find(|l| l.starts_with(RESULT_MARKER))?;
    let pieces: Vec<&str> = line.split_whitespace().collect();
    let field = |i: usize| pieces.get(i).and_then(|p| p.parse::<f64>().ok());
    Some(ScoreTriple {
        affinity: field(3)?,
        rmsd_lb: field(4)?,
        rmsd_ub: field(5)?,
    })
}

pub async fn parse_scoring(path: &Path) -> Result<ScoreTriple> {
    let text = fs::read_to_string(path).await?;
    parse_score_text(&text).ok_or_else(|| DockError::ScoreParse { path: path.to_path_buf() })
}

/// Scores and loads every file in order, labelling pose `i` as `Pose {i}`.
/// The first file without a score aborts the whole load.
pub async fn load_poses(files: &[PathBuf]) -> Result<DockingResult> {
    let mut result = DockingResult::default();
    for (i, file) in files.iter().enumerate() {
        let score = parse_scoring(file).await?;
        let mut pose = Molecule::read_pdb(file).await?;
        pose.view_name = Some(format!("Pose {}", i));
        debug!("Pose {}: {:.2} kcal/mol from {}", i, score.affinity, file.display());
        result.scores.push(score);
        result.poses.push(pose);
    }
    info!("Loaded {} docking poses", result.len());
    Ok(result)
}

/// Numeric-aware string ordering: digit runs compare by value.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = Chunks(a);
    let mut b = Chunks(b);
    loop {
        match (a.next(), b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (is_digits(x), is_digits(y)) {
                    (true, true) => cmp_digits(x, y),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn is_digits(s: &str) -> bool {
    s.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

fn cmp_digits(x: &str, y: &str) -> Ordering {
    let xs = x.trim_start_matches('0');
    let ys = y.trim_start_matches('0');
    xs.len()
        .cmp(&ys.len())
        .then_with(|| xs.cmp(ys))
        .then_with(|| x.len().cmp(&y.len()))
}

/// Splits a string into alternating digit and non-digit runs.
struct Chunks<'a>(&'a str);

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.0.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = self
            .0
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digit)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        let (chunk, rest) = self.0.split_at(end);
        self.0 = rest;
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose_text(kcal: &str) -> String {
        format!(
            "MODEL 1\nREMARK VINA RESULT:    {}      1.250      2.500\n\
             ATOM      1  C1  LIG A   1       0.000   0.000   0.000  1.00  0.00           C\nEND\n",
            kcal
        )
    }

    #[test]
    fn test_natural_order() {
        let mut names = vec!["pose_10.pdb", "pose_2.pdb", "pose_1.pdb", "pose_02.pdb", "pose_.pdb"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, ["pose_.pdb", "pose_1.pdb", "pose_2.pdb", "pose_02.pdb", "pose_10.pdb"]);
    }

    #[test]
    fn test_parse_score_text() {
        let score = parse_score_text(&pose_text("-7.3")).unwrap();
        assert_eq!(score, ScoreTriple { affinity: -7.3, rmsd_lb: 1.25, rmsd_ub: 2.5 });
    }

    #[test]
    fn test_only_first_marker_counts() {
        let text = format!("{}REMARK VINA RESULT: -1.0 9.0 9.0\n", pose_text("-9.9"));
        assert_eq!(parse_score_text(&text).unwrap().affinity, -9.9);
    }

    #[test]
    fn test_incomplete_marker_is_rejected() {
        assert!(parse_score_text("REMARK VINA RESULT: -7.3 0.0\n").is_none());
        assert!(parse_score_text("REMARK VINA RESULT: abc 0.0 0.0\n").is_none());
        assert!(parse_score_text("ATOM\n").is_none());
    }

    #[tokio::test]
    async fn test_collect_and_load_in_natural_order() {
        let dir = tempfile::tempdir().unwrap();
        for (n, kcal) in [(10, "-5.0"), (1, "-9.0"), (2, "-8.0")] {
            std::fs::write(dir.path().join(format!("pose_{}.pdb", n)), pose_text(kcal)).unwrap();
        }
        std::fs::write(dir.path().join("protein.pdb"), "ATOM\n").unwrap();
        std::fs::write(dir.path().join("pose_.pdbqt"), "x").unwrap();

        let files = collect_pose_files(dir.path(), "pose_").await.unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["pose_1.pdb", "pose_2.pdb", "pose_10.pdb"]);

        let result = load_poses(&files).await.unwrap();
        let kcal: Vec<f64> = result.scores.iter().map(|s| s.affinity).collect();
        assert_eq!(kcal, [-9.0, -8.0, -5.0]);
        let labels: Vec<_> = result.poses.iter().map(|p| p.view_name.clone().unwrap()).collect();
        assert_eq!(labels, ["Pose 0", "Pose 1", "Pose 2"]);
    }

    #[tokio::test]
    async fn test_missing_marker_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("pose_1.pdb");
        let bad = dir.path().join("pose_2.pdb");
        std::fs::write(&good, pose_text("-9.0")).unwrap();
        std::fs::write(&bad, "ATOM      1  C1  LIG A   1       0.000   0.000   0.000\nEND\n").unwrap();

        let err = load_poses(&[good, bad.clone()]).await.unwrap_err();
        match err {
            DockError::ScoreParse { path } => assert_eq!(path, bad),
            other => panic!("unexpected error: {other}"),
        }
    }
}
