//! Utility functions used in all other fncmaps modules.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::bufread::GzDecoder;

use crate::error::Result;

/// Check whether the file extension ends with ".gz".
pub fn is_gz_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}


/// Check whether the file is tab-separated, judging by a ".tsv" or ".tsv.gz" ending.
pub fn is_tsv_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| {
            let name = a.to_string_lossy().to_lowercase();
            name.ends_with(".tsv") || name.ends_with(".tsv.gz")
        })
        .unwrap_or(false)
}


/// Open a file for reading. If the file's name ends with ".gz", the returned reader decodes GZip on the fly.
pub fn open_maybe_gz<P: AsRef<Path>>(path: P) -> Result<Box<dyn Read>> {
    let gz = is_gz_file(&path);
    let file = BufReader::new(File::open(path)?);
    if gz {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}


/// Number of strictly-lower triangle cells of an n x n matrix, i.e., n*(n-1)/2.
pub fn num_lower_cells(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}
