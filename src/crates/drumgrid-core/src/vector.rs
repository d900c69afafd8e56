use serde::{Deserialize, Serialize};

use crate::grid::Grid;

/// Per-step onset density normalized to [0, 1]
///
/// The densest step is exactly 1.0 unless every step is silent, in which
/// case the vector is all zeros.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RhythmVector(Vec<f64>);

impl RhythmVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of the values zero-padded up to `len`; longer vectors are kept whole
    pub fn padded(&self, len: usize) -> Vec<f64> {
        let mut values = self.0.clone();
        if values.len() < len {
            values.resize(len, 0.0);
        }
        values
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl From<Vec<f64>> for RhythmVector {
    fn from(values: Vec<f64>) -> Self {
        RhythmVector(values)
    }
}

/// Reduce a grid to its normalized onset-density vector
pub fn grid_to_vector(grid: &Grid) -> RhythmVector {
    let counts = grid.onset_counts();
    // Floor of 1 keeps a silent grid at zero instead of dividing by zero
    let max = counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    RhythmVector(counts.into_iter().map(|count| count as f64 / max).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_by_four_example() {
        let grid = Grid::from_rows(vec![
            vec![true, false, true, false],
            vec![false, true, false, false],
        ])
        .unwrap();
        assert_eq!(grid_to_vector(&grid).as_slice(), &[1.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_density_is_relative_to_busiest_step() {
        let grid = Grid::from_rows(vec![
            vec![true, false, true, false],
            vec![true, false, false, false],
            vec![true, true, false, false],
            vec![true, false, true, false],
        ])
        .unwrap();
        assert_eq!(grid_to_vector(&grid).as_slice(), &[1.0, 0.25, 0.5, 0.0]);
    }

    #[test]
    fn test_zero_steps_gives_empty_vector() {
        let grid = Grid::new(11, 0);
        assert!(grid_to_vector(&grid).is_empty());
    }

    #[test]
    fn test_no_instruments_gives_zeros() {
        let grid = Grid::from_rows_with_steps(Vec::new(), 4).unwrap();
        assert_eq!(grid_to_vector(&grid).as_slice(), &[0.0; 4]);
    }

    #[test]
    fn test_padded() {
        let vector = RhythmVector::from(vec![1.0, 0.5]);
        assert_eq!(vector.padded(4), vec![1.0, 0.5, 0.0, 0.0]);
        assert_eq!(vector.padded(1), vec![1.0, 0.5]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let vector = RhythmVector::from(vec![1.0, 0.5]);
        assert_eq!(serde_json::to_string(&vector).unwrap(), "[1.0,0.5]");
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (0usize..12, 0usize..33).prop_flat_map(|(instruments, steps)| {
            proptest::collection::vec(
                proptest::collection::vec(any::<bool>(), steps),
                instruments,
            )
            .prop_map(move |rows| Grid::from_rows_with_steps(rows, steps).unwrap())
        })
    }

    proptest! {
        #[test]
        fn prop_length_matches_steps(grid in arb_grid()) {
            prop_assert_eq!(grid_to_vector(&grid).len(), grid.steps());
        }

        #[test]
        fn prop_max_is_one_when_any_cell_active(grid in arb_grid()) {
            prop_assume!(!grid.is_silent());
            let vector = grid_to_vector(&grid);
            let max = vector.as_slice().iter().copied().fold(0.0, f64::max);
            prop_assert_eq!(max, 1.0);
        }

        #[test]
        fn prop_silent_grid_is_all_zero(instruments in 0usize..12, steps in 0usize..33) {
            let vector = grid_to_vector(&Grid::new(instruments, steps));
            prop_assert!(vector.as_slice().iter().all(|&v| v == 0.0));
        }

        #[test]
        fn prop_values_within_unit_range(grid in arb_grid()) {
            let vector = grid_to_vector(&grid);
            prop_assert!(vector.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }
}
