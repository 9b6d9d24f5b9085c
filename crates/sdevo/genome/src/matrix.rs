//! Square coefficient matrices with absent cells.

use serde::{Deserialize, Serialize};

use crate::error::GenomeError;

/// An N×N matrix of influence weights. `None` marks an absent cell: the
/// source row does not influence the destination column at all, which is
/// different from a present weight of `0.0`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Option<f64>>>", into = "Vec<Vec<Option<f64>>>")]
pub struct CoefficientMatrix {
    size: usize,
    cells: Vec<Option<f64>>,
}

impl CoefficientMatrix {
    /// A matrix with every cell absent.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Build from dense rows, treating `NaN` as absent.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, GenomeError> {
        Self::from_cells(
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|v| if v.is_nan() { None } else { Some(v) })
                        .collect()
                })
                .collect(),
        )
    }

    pub fn from_cells(rows: Vec<Vec<Option<f64>>>) -> Result<Self, GenomeError> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(GenomeError::Shape(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    size
                )));
            }
            cells.extend(row.into_iter().map(|c| c.filter(|v| !v.is_nan())));
        }
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The cell at `(row, col)`, or `None` when absent or out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.size && col < self.size {
            self.cells[row * self.size + col]
        } else {
            None
        }
    }

    /// Overwrite a cell. `NaN` is stored as absent.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of range.
    pub fn set(&mut self, row: usize, col: usize, value: Option<f64>) {
        assert!(
            row < self.size && col < self.size,
            "cell ({row}, {col}) outside {0}x{0} matrix",
            self.size
        );
        self.cells[row * self.size + col] = value.filter(|v| !v.is_nan());
    }

    pub fn row(&self, row: usize) -> &[Option<f64>] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<f64>]> {
        // chunks(0) panics, so an empty matrix yields no rows explicitly.
        self.cells.chunks(self.size.max(1)).take(self.size)
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        (0..self.size).map(move |row| self.get(row, col))
    }

    /// Number of present cells in a column.
    pub fn present_in_column(&self, col: usize) -> usize {
        self.column(col).filter(Option::is_some).count()
    }

    pub fn present_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Scale each row so its present cells sum to one. Rows whose present
    /// cells sum to zero, and absent cells, are left untouched.
    pub fn normalize_rows(&mut self) {
        for row in 0..self.size {
            let span = row * self.size..(row + 1) * self.size;
            let sum: f64 = self.cells[span.clone()].iter().flatten().sum();
            if sum != 0.0 {
                for cell in self.cells[span].iter_mut().flatten() {
                    *cell /= sum;
                }
            }
        }
    }

    /// Largest present value in a row, floored at zero.
    pub fn row_max(&self, row: usize) -> f64 {
        self.row(row).iter().flatten().fold(0.0, |acc, v| acc.max(*v))
    }

    pub fn to_cells(&self) -> Vec<Vec<Option<f64>>> {
        self.rows().map(|row| row.to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<Option<f64>>>> for CoefficientMatrix {
    type Error = GenomeError;

    fn try_from(rows: Vec<Vec<Option<f64>>>) -> Result<Self, Self::Error> {
        Self::from_cells(rows)
    }
}

impl From<CoefficientMatrix> for Vec<Vec<Option<f64>>> {
    fn from(matrix: CoefficientMatrix) -> Self {
        matrix.to_cells()
    }
}
