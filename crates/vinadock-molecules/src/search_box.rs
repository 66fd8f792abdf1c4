//! Docking search volume.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::molecule::Molecule;
use vinadock_common::{DockError, Result};

/// Angstrom margin used for whole-receptor docking.
pub const DEFAULT_BUFFER: f64 = 10.0;

/// Axis-aligned box handed to the docking engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchBox {
    pub center: [f64; 3],
    pub extent: [f64; 3],
}

impl SearchBox {
    /// Fills in whichever of `center` / `extent` the caller left unset from the
    /// receptor's coordinate bounds. The two are derived independently.
    ///
    /// `center = (buffer + (max + min)) / 2`, `extent = (max - min) + buffer`.
    pub fn resolve(
        receptor: &Molecule,
        center: Option<[f64; 3]>,
        extent: Option<[f64; 3]>,
        buffer: f64,
    ) -> Result<Self> {
        if let (Some(center), Some(extent)) = (center, extent) {
            return Ok(Self { center, extent });
        }

        let (min, max) = receptor
            .bounds()
            .ok_or_else(|| DockError::EmptyStructure("receptor".to_string()))?;

        let center = center.unwrap_or_else(|| {
            std::array::from_fn(|axis| (buffer + (max[axis] + min[axis])) / 2.0)
        });
        let extent = extent.unwrap_or_else(|| {
            std::array::from_fn(|axis| (max[axis] - min[axis]) + buffer)
        });

        debug!(?center, ?extent, "Derived search box from receptor bounds");
        Ok(Self { center, extent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::Atom;

    fn receptor() -> Molecule {
        let atoms = (1..=3).map(|i| Atom::new(i, "CA", "ALA", "C")).collect();
        Molecule::new(
            atoms,
            vec![[0.0, -4.0, 2.0], [10.0, 6.0, 3.0], [4.0, 0.0, 12.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_derived_box_uses_buffer_formula() {
        let b = SearchBox::resolve(&receptor(), None, None, DEFAULT_BUFFER).unwrap();
        // min = (0, -4, 2), max = (10, 6, 12)
        assert_eq!(b.center, [10.0, 6.0, 12.0]);
        assert_eq!(b.extent, [20.0, 20.0, 20.0]);
    }

    #[test]
    fn test_supplied_box_is_untouched() {
        let b = SearchBox::resolve(
            &receptor(),
            Some([10.0, 5.0, 12.0]),
            Some([15.0, 15.0, 15.0]),
            DEFAULT_BUFFER,
        )
        .unwrap();
        assert_eq!(b.center, [10.0, 5.0, 12.0]);
        assert_eq!(b.extent, [15.0, 15.0, 15.0]);
    }

    #[test]
    fn test_center_and_extent_derived_independently() {
        let b = SearchBox::resolve(&receptor(), Some([1.0, 2.0, 3.0]), None, DEFAULT_BUFFER).unwrap();
        assert_eq!(b.center, [1.0, 2.0, 3.0]);
        assert_eq!(b.extent, [20.0, 20.0, 20.0]);

        let b = SearchBox::resolve(&receptor(), None, Some([8.0, 8.0, 8.0]), 0.0).unwrap();
        assert_eq!(b.center, [5.0, 1.0, 7.0]);
        assert_eq!(b.extent, [8.0, 8.0, 8.0]);
    }

    #[test]
    fn test_supplied_box_needs_no_atoms() {
        let empty = Molecule::new(vec![], vec![]).unwrap();
        assert!(SearchBox::resolve(&empty, Some([0.0; 3]), Some([1.0; 3]), 10.0).is_ok());
        assert!(matches!(
            SearchBox::resolve(&empty, None, Some([1.0; 3]), 10.0),
            Err(DockError::EmptyStructure(_))
        ));
    }
}
