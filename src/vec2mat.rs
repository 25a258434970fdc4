//! Reconstruction of square correlation matrices from flattened correlation vectors.
//!
//! A correlation vector of length N = n*(n-1)/2 holds the strictly-lower triangle of an n x n
//! matrix in column-major order: column 0 from row 1 downwards, then column 1 from row 2
//! downwards, and so on. This is the linear indexing used by MATLAB-based FNC pipelines, and
//! vectors produced by such pipelines can be converted here without any reordering.

use log::debug;
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2};

use crate::error::{FncError, Result};
use crate::util::num_lower_cells;


/// Whether the upper triangle is populated as a mirror of the lower triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    /// Only cells with row > col carry data.
    LowerOnly,
    /// The lower triangle is mirrored into the upper one, yielding a symmetric matrix.
    Full,
}

/// The value of all cells that are not populated from the vector, including the diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPolicy {
    Zero,
    NaN,
}

impl FillPolicy {
    pub fn value(&self) -> f64 {
        match self {
            FillPolicy::Zero => 0.0,
            FillPolicy::NaN => f64::NAN,
        }
    }
}

/// Settings for [`vec2mat`] and [`vec2mat_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vec2MatOptions {
    pub symmetry: Symmetry,
    pub fill: FillPolicy,
}

impl Default for Vec2MatOptions {
    fn default() -> Vec2MatOptions {
        Vec2MatOptions {
            symmetry: Symmetry::Full,
            fill: FillPolicy::Zero,
        }
    }
}

impl Vec2MatOptions {
    /// Symmetric matrix, zero diagonal.
    pub fn full() -> Vec2MatOptions {
        Vec2MatOptions::default()
    }

    /// Lower triangle only, zeros elsewhere.
    pub fn lower_only() -> Vec2MatOptions {
        Vec2MatOptions::default().with_symmetry(Symmetry::LowerOnly)
    }

    pub fn with_symmetry(mut self, symmetry: Symmetry) -> Vec2MatOptions {
        self.symmetry = symmetry;
        self
    }

    pub fn with_fill(mut self, fill: FillPolicy) -> Vec2MatOptions {
        self.fill = fill;
        self
    }
}


/// Compute the matrix dimension n for a correlation vector of length `len`.
///
/// Uses `n = round(0.5 + sqrt(1 + 8 * len) / 2)` and checks that `len` really is `n*(n-1)/2`.
///
/// # Errors
///
/// [`FncError::InvalidVectorLength`] if `len` is zero or not a triangular number.
///
/// # Examples
///
/// ```
/// assert_eq!(105, fncmaps::matrix_dim(5460).unwrap());
/// assert!(fncmaps::matrix_dim(5).is_err());
/// ```
pub fn matrix_dim(len: usize) -> Result<usize> {
    let disc = len.checked_mul(8)
        .and_then(|v| v.checked_add(1))
        .ok_or(FncError::InvalidVectorLength { len })?;
    let n = (0.5 + (disc as f64).sqrt() / 2.0).round() as usize;
    if len == 0 || num_lower_cells(n) != len {
        return Err(FncError::InvalidVectorLength { len });
    }
    Ok(n)
}


/// Fill the strictly-lower triangle of `mat` from `vec` in column-major order.
fn fill_lower(mat: &mut Array2<f64>, vec: &ArrayView1<f64>) {
    let n = mat.nrows();
    let mut values = vec.iter();
    for col in 0..n {
        for row in (col + 1)..n {
            if let Some(v) = values.next() {
                mat[[row, col]] = *v;
            }
        }
    }
}


/// Copy the strictly-lower triangle into the upper triangle. The diagonal is left untouched.
fn mirror_lower(mat: &mut Array2<f64>) {
    let n = mat.nrows();
    for col in 0..n {
        for row in (col + 1)..n {
            mat[[col, row]] = mat[[row, col]];
        }
    }
}


/// Convert a correlation vector into a square correlation matrix.
///
/// The vector elements are assigned to the strictly-lower triangle, walking columns
/// outer and rows inner. With [`Symmetry::Full`], the result is symmetric. Cells not
/// populated from the vector (always including the diagonal) hold the [`FillPolicy`] value.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use fncmaps::{vec2mat, Vec2MatOptions};
///
/// let mat = vec2mat(array![1.0, 2.0, 3.0].view(), &Vec2MatOptions::lower_only()).unwrap();
/// assert_eq!(mat, array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 3.0, 0.0]]);
/// ```
pub fn vec2mat(vec: ArrayView1<f64>, options: &Vec2MatOptions) -> Result<Array2<f64>> {
    let n = matrix_dim(vec.len())?;
    debug!("Reconstructing {}x{} matrix from vector of length {}.", n, n, vec.len());

    let mut mat = Array2::from_elem((n, n), options.fill.value());
    fill_lower(&mut mat, &vec);
    if options.symmetry == Symmetry::Full {
        mirror_lower(&mut mat);
    }
    Ok(mat)
}


/// Convert a batch of correlation vectors, one per row of `batch`, into a stack of matrices.
///
/// The result has shape `(p, n, n)` for a batch of shape `(p, n*(n-1)/2)`, and entry `i` equals
/// `vec2mat(batch.row(i), options)`.
pub fn vec2mat_batch(batch: ArrayView2<f64>, options: &Vec2MatOptions) -> Result<Array3<f64>> {
    let (p, len) = batch.dim();
    let n = matrix_dim(len)?;
    debug!("Reconstructing {} matrices of size {}x{}.", p, n, n);

    let mut mats = Array3::from_elem((p, n, n), options.fill.value());
    for (row, mut target) in batch.outer_iter().zip(mats.outer_iter_mut()) {
        target.assign(&vec2mat(row, options)?);
    }
    Ok(mats)
}


/// Extract the strictly-lower triangle of a square matrix as a correlation vector.
///
/// This is the inverse of [`vec2mat`]: the cells are read in the same column-major order.
pub fn mat2vec(mat: ArrayView2<f64>) -> Result<Array1<f64>> {
    let (rows, cols) = mat.dim();
    if rows != cols {
        return Err(FncError::NotSquare { rows, cols });
    }
    let mut vec: Vec<f64> = Vec::with_capacity(num_lower_cells(rows));
    for col in 0..cols {
        for row in (col + 1)..rows {
            vec.push(mat[[row, col]]);
        }
    }
    Ok(Array1::from(vec))
}
