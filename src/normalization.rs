//! Scaling of FNC data into the range [-1, 1].

use ndarray::{Array, ArrayBase, Data, Dimension};
use ndarray_stats::{QuantileExt, SummaryStatisticsExt};

use crate::error::{FncError, Result};


/// Normalize data to the range [-1, 1].
///
/// The data is first z-scored (using the population standard deviation) and then min-max
/// scaled, so that the smallest value maps to -1 and the largest to 1.
///
/// # Errors
///
/// [`FncError::DegenerateInput`] if the data is empty, constant, or contains NaN.
pub fn normalize<S, D>(data: &ArrayBase<S, D>) -> Result<Array<f64, D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mean = data.mean()
        .ok_or_else(|| FncError::DegenerateInput(String::from("cannot normalize empty data")))?;
    let variance = data.central_moment(2)
        .map_err(|_| FncError::DegenerateInput(String::from("cannot normalize empty data")))?;
    let std = variance.sqrt();
    if !std.is_finite() || std == 0.0 {
        return Err(FncError::DegenerateInput(format!("standard deviation is {}", std)));
    }

    let zscored = data.mapv(|x| (x - mean) / std);
    let (min, max) = match (zscored.min(), zscored.max()) {
        (Ok(min), Ok(max)) => (*min, *max),
        _ => return Err(FncError::DegenerateInput(String::from("data contains NaN"))),
    };
    Ok(zscored.mapv(|z| 2.0 * (z - min) / (max - min) - 1.0))
}
