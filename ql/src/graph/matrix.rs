use std::fmt::Debug;

use num_traits::Num;

use crate::prelude::{QlError, Result};

/// Row-major `dim x dim` matrix
#[derive(Clone, Debug, PartialEq)]
pub struct SquareMatrix<T> {
    dim: usize,
    values: Vec<T>,
}

impl<T> SquareMatrix<T>
where
    T: Num + Copy + Debug,
{
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            values: vec![T::zero(); dim * dim],
        }
    }

    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let dim = rows.len();
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != dim) {
            return Err(QlError::Configuration(format!(
                "matrix is not square: row {} has {} columns, expected {}",
                r,
                row.len(),
                dim
            )));
        }
        Ok(Self {
            dim,
            values: rows.into_iter().flatten().collect(),
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, row: usize, col: usize) -> T {
        self.values[self.idx(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let i = self.idx(row, col);
        self.values[i] = value
    }

    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.dim, "row {} out of range 0..{}", row, self.dim);
        &self.values[row * self.dim..(row + 1) * self.dim]
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    fn idx(&self, row: usize, col: usize) -> usize {
        assert!(row < self.dim && col < self.dim, "({}, {}) out of range 0..{}", row, col, self.dim);
        row * self.dim + col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let m = SquareMatrix::<f32>::zeros(3);
        assert_eq!(m.dim(), 3);
        assert!(m.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_rows_row_major() {
        let m = SquareMatrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(m.get(0, 1), 2);
        assert_eq!(m.get(1, 0), 3);
        assert_eq!(m.row(1), &[3, 4]);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let result = SquareMatrix::from_rows(vec![vec![1, 2], vec![3]]);
        assert!(matches!(result, Err(QlError::Configuration(_))));
        let result = SquareMatrix::from_rows(vec![vec![1, 2, 3], vec![3, 4, 5]]);
        assert!(matches!(result, Err(QlError::Configuration(_))));
    }

    #[test]
    fn test_set() {
        let mut m = SquareMatrix::<f32>::zeros(2);
        m.set(1, 1, 7.5);
        assert_eq!(m.get(1, 1), 7.5);
        assert_eq!(m.get(0, 0), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range() {
        SquareMatrix::<f32>::zeros(2).get(2, 0);
    }
}
