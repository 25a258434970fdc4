//! Reordering of 105x105 FNC matrices into the network-grouped display order of the ICN atlas.

use log::debug;
use ndarray::{Array2, Array3, ArrayView2, Axis};

use std::cmp::Ordering;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{FncError, Result};
use crate::icn_table::{IcnTable, NetworkLayout};

/// The number of components of the ICN atlas, and thus the required matrix size.
pub const ICN_COUNT: usize = 105;

/// Location of the ICN atlas table used by [`NetworkReorderer::default`].
pub const DEFAULT_ICN_TABLE_PATH: &str = "resources/icn/ICNs_v2.csv";

/// Environment variable consulted by [`NetworkReorderer::from_env`].
pub const ICN_TABLE_ENV_VAR: &str = "FNCMAPS_ICN_TABLE";


fn check_shape(rows: usize, cols: usize) -> Result<()> {
    if rows != ICN_COUNT || cols != ICN_COUNT {
        return Err(FncError::InvalidMatrixShape { rows, cols, expected: ICN_COUNT });
    }
    Ok(())
}


/// Compute the permutation that sorts the atlas components by their `new_order` rank.
///
/// Entry `k` of the result is the 0-based index of the component with the `k`-th smallest rank.
/// Components with equal ranks keep their table order.
///
/// # Errors
///
/// [`FncError::InvalidIcnTable`] if the table does not have [`ICN_COUNT`] rows or contains non-finite ranks.
pub fn network_order_permutation(table: &IcnTable) -> Result<Vec<usize>> {
    if table.len() != ICN_COUNT {
        return Err(FncError::InvalidIcnTable(format!(
            "expected {} components, found {}", ICN_COUNT, table.len()
        )));
    }
    if let Some(pos) = table.new_order.iter().position(|r| !r.is_finite()) {
        return Err(FncError::InvalidIcnTable(format!(
            "rank of component {} is not a finite number", pos + 1
        )));
    }
    let mut perm: Vec<usize> = (0..table.len()).collect();
    perm.sort_by(|&a, &b| {
        table.new_order[a]
            .partial_cmp(&table.new_order[b])
            .unwrap_or(Ordering::Equal)
    });
    Ok(perm)
}


/// Reorder a 105x105 matrix with an already loaded ICN table.
///
/// Rows and columns are both permuted: `out[[i, j]] == matrix[[p[i], p[j]]]`, where `p` is
/// the [`network_order_permutation`] of the table.
pub fn reorder_with_table(matrix: ArrayView2<f64>, table: &IcnTable) -> Result<Array2<f64>> {
    let (rows, cols) = matrix.dim();
    check_shape(rows, cols)?;

    let perm = network_order_permutation(table)?;
    let ordered = matrix.select(Axis(0), &perm).select(Axis(1), &perm);

    let (rows, cols) = ordered.dim();
    check_shape(rows, cols)?;
    Ok(ordered)
}


/// Keep only the cells between components of the layout's networks and make the result symmetric.
///
/// Every cell whose row or column component is not part of any network is set to 0. The upper
/// triangle (including the diagonal) of the masked matrix is then mirrored into the lower one,
/// so `out[[i, j]] == out[[j, i]] == masked[[min(i, j), max(i, j)]]`.
///
/// # Errors
///
/// * [`FncError::NotSquare`] if the matrix is not square.
/// * [`FncError::InvalidIcnTable`] if the layout refers to a component outside the matrix.
pub fn organize_ordered_map(matrix: ArrayView2<f64>, layout: &NetworkLayout) -> Result<Array2<f64>> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(FncError::NotSquare { rows, cols });
    }
    let indices = layout.all_indices();
    if let Some(idx) = indices.iter().find(|idx| **idx >= rows) {
        return Err(FncError::InvalidIcnTable(format!(
            "component {} is outside of the {}x{} matrix", idx + 1, rows, cols
        )));
    }

    let mut organized = Array2::<f64>::zeros((rows, cols));
    for &i in indices.iter() {
        for &j in indices.iter() {
            organized[[i, j]] = matrix[[i, j]];
        }
    }
    for i in 0..rows {
        for j in 0..i {
            organized[[i, j]] = organized[[j, i]];
        }
    }
    Ok(organized)
}


/// Reorders FNC matrices by the network order of an ICN table read from a file.
///
/// The table is read anew on every call, so changes to the file are picked up.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkReorderer {
    table_path: PathBuf,
}

impl Default for NetworkReorderer {
    fn default() -> NetworkReorderer {
        NetworkReorderer::new(DEFAULT_ICN_TABLE_PATH)
    }
}

impl NetworkReorderer {

    /// Create a reorderer reading the ICN table from the given path.
    pub fn new<P: AsRef<Path>>(table_path: P) -> NetworkReorderer {
        NetworkReorderer { table_path: table_path.as_ref().to_path_buf() }
    }


    /// Create a reorderer reading the ICN table from the path given in the environment variable
    /// `FNCMAPS_ICN_TABLE`, falling back to [`DEFAULT_ICN_TABLE_PATH`] if it is not set.
    pub fn from_env() -> NetworkReorderer {
        match env::var_os(ICN_TABLE_ENV_VAR) {
            Some(path) => NetworkReorderer::new(path),
            None => NetworkReorderer::default(),
        }
    }


    pub fn table_path(&self) -> &Path {
        &self.table_path
    }


    /// Read the ICN table.
    pub fn load_table(&self) -> Result<IcnTable> {
        IcnTable::from_file(&self.table_path)
    }


    /// Reorder a 105x105 matrix into network order.
    ///
    /// # Errors
    ///
    /// * [`FncError::InvalidMatrixShape`] if the matrix is not 105x105. The shape is checked before the table is read.
    /// * [`FncError::Io`], [`FncError::Csv`], [`FncError::MissingColumn`] or [`FncError::InvalidIcnTable`] if the table cannot be loaded.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// let fnc = ndarray::Array2::<f64>::zeros((105, 105));
    /// let reorderer = fncmaps::NetworkReorderer::new("/path/to/ICNs_v2.csv");
    /// let ordered = reorderer.reorder(fnc.view()).unwrap();
    /// assert_eq!((105, 105), ordered.dim());
    /// ```
    pub fn reorder(&self, matrix: ArrayView2<f64>) -> Result<Array2<f64>> {
        let (rows, cols) = matrix.dim();
        check_shape(rows, cols)?;
        let table = self.load_table()?;
        reorder_with_table(matrix, &table)
    }


    /// Reorder a stack of 105x105 matrices, reading the table only once.
    pub fn reorder_batch(&self, matrices: &Array3<f64>) -> Result<Array3<f64>> {
        let (p, rows, cols) = matrices.dim();
        check_shape(rows, cols)?;
        let table = self.load_table()?;
        debug!("Reordering {} matrices.", p);

        let mut ordered = Array3::zeros((p, rows, cols));
        for (src, mut target) in matrices.outer_iter().zip(ordered.outer_iter_mut()) {
            target.assign(&reorder_with_table(src, &table)?);
        }
        Ok(ordered)
    }
}
