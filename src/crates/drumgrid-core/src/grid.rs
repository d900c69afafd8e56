use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Instrument rows of boolean step cells
///
/// Every row holds exactly `steps` cells. A cell is `true` when its
/// instrument sounds on that step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct Grid {
    steps: usize,
    rows: Vec<Vec<bool>>,
}

impl Grid {
    /// Create an all-silent grid
    pub fn new(instruments: usize, steps: usize) -> Self {
        Grid {
            steps,
            rows: vec![vec![false; steps]; instruments],
        }
    }

    /// Build a grid from explicit rows; the first row fixes the step count
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self> {
        let steps = rows.first().map_or(0, Vec::len);
        Self::from_rows_with_steps(rows, steps)
    }

    /// Build a grid whose rows must all have `steps` cells
    ///
    /// Unlike [`Grid::from_rows`] this keeps the step count meaningful when
    /// there are no rows at all.
    pub fn from_rows_with_steps(rows: Vec<Vec<bool>>, steps: usize) -> Result<Self> {
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != steps) {
            return Err(GridError::RaggedRow {
                row,
                expected: steps,
                found: cells.len(),
            });
        }
        Ok(Grid { steps, rows })
    }

    pub fn instruments(&self) -> usize {
        self.rows.len()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    pub fn row(&self, instrument: usize) -> Option<&[bool]> {
        self.rows.get(instrument).map(Vec::as_slice)
    }

    /// Whether `instrument` sounds on `step`; out-of-range cells are silent
    pub fn is_active(&self, instrument: usize, step: usize) -> bool {
        self.rows
            .get(instrument)
            .and_then(|row| row.get(step))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, instrument: usize, step: usize, active: bool) -> Result<()> {
        let cell = self.cell_mut(instrument, step)?;
        *cell = active;
        Ok(())
    }

    /// Flip a cell and return its new state
    pub fn toggle(&mut self, instrument: usize, step: usize) -> Result<bool> {
        let cell = self.cell_mut(instrument, step)?;
        *cell = !*cell;
        Ok(*cell)
    }

    /// Change the loop length, keeping every cell that still fits
    ///
    /// Growing pads each row with silent steps, shrinking truncates.
    pub fn resize(&mut self, steps: usize) {
        for row in &mut self.rows {
            row.resize(steps, false);
        }
        self.steps = steps;
    }

    /// Silence every cell
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.iter_mut().for_each(|cell| *cell = false);
        }
    }

    /// Number of active instruments on each step
    pub fn onset_counts(&self) -> Vec<usize> {
        (0..self.steps)
            .map(|step| self.rows.iter().filter(|row| row[step]).count())
            .collect()
    }

    /// All active cells as `(instrument, step)`, row by row
    pub fn active_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(instrument, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, &active)| active)
                .map(move |(step, _)| (instrument, step))
        })
    }

    pub fn is_silent(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|&cell| !cell))
    }

    fn cell_mut(&mut self, instrument: usize, step: usize) -> Result<&mut bool> {
        let instruments = self.rows.len();
        let steps = self.steps;
        self.rows
            .get_mut(instrument)
            .and_then(|row| row.get_mut(step))
            .ok_or(GridError::CellOutOfRange {
                instrument,
                step,
                instruments,
                steps,
            })
    }
}

impl TryFrom<Vec<Vec<bool>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self> {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<bool>> {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_silent() {
        let grid = Grid::new(11, 8);
        assert_eq!(grid.instruments(), 11);
        assert_eq!(grid.steps(), 8);
        assert!(grid.is_silent());
        assert_eq!(grid.onset_counts(), vec![0; 8]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Grid::from_rows(vec![vec![true, false], vec![true]]).unwrap_err();
        assert_eq!(
            err,
            GridError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_empty_rows_keep_step_count() {
        let grid = Grid::from_rows_with_steps(Vec::new(), 16).unwrap();
        assert_eq!(grid.instruments(), 0);
        assert_eq!(grid.steps(), 16);
        assert_eq!(grid.onset_counts(), vec![0; 16]);
    }

    #[test]
    fn test_toggle_and_set() {
        let mut grid = Grid::new(2, 4);
        assert!(grid.toggle(1, 3).unwrap());
        assert!(grid.is_active(1, 3));
        assert!(!grid.toggle(1, 3).unwrap());
        grid.set(0, 0, true).unwrap();
        assert!(grid.is_active(0, 0));
        assert!(matches!(
            grid.set(2, 0, true),
            Err(GridError::CellOutOfRange { instrument: 2, .. })
        ));
        assert!(grid.toggle(0, 4).is_err());
    }

    #[test]
    fn test_resize_keeps_cells() {
        let mut grid = Grid::from_rows(vec![
            vec![true, false, false, false, true, false, false, true],
            vec![false, false, true, false, false, false, true, false],
        ])
        .unwrap();

        grid.resize(16);
        assert_eq!(grid.steps(), 16);
        assert!(grid.is_active(0, 7));
        assert!(grid.is_active(1, 6));
        assert!(!grid.is_active(0, 15));

        grid.resize(4);
        assert_eq!(grid.row(0).unwrap(), &[true, false, false, false]);
        assert_eq!(grid.row(1).unwrap(), &[false, false, true, false]);
    }

    #[test]
    fn test_active_cells_order() {
        let grid = Grid::from_rows(vec![vec![false, true], vec![true, true]]).unwrap();
        let cells: Vec<_> = grid.active_cells().collect();
        assert_eq!(cells, vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_clear() {
        let mut grid = Grid::from_rows(vec![vec![true, true], vec![false, true]]).unwrap();
        grid.clear();
        assert!(grid.is_silent());
        assert_eq!(grid.steps(), 2);
    }

    #[test]
    fn test_serde_validates_rows() {
        let grid: Grid = serde_json::from_str("[[true,false],[false,false]]").unwrap();
        assert!(grid.is_active(0, 0));
        assert!(serde_json::from_str::<Grid>("[[true,false],[false]]").is_err());
        assert_eq!(
            serde_json::to_string(&grid).unwrap(),
            "[[true,false],[false,false]]"
        );
    }
}
