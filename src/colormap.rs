//! Mapping of connectivity values to heatmap colors.

use ndarray::{ArrayBase, Data, Dimension};
use ndarray_stats::QuantileExt;

// Control points (position, intensity) of the piecewise linear 'jet' colormap, per channel.
const JET_RED: [(f64, f64); 5] = [(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)];
const JET_GREEN: [(f64, f64); 6] = [(0.0, 0.0), (0.125, 0.0), (0.375, 1.0), (0.64, 1.0), (0.91, 0.0), (1.0, 0.0)];
const JET_BLUE: [(f64, f64); 5] = [(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)];


fn interpolate(points: &[(f64, f64)], t: f64) -> f64 {
    for win in points.windows(2) {
        let (x0, y0) = win[0];
        let (x1, y1) = win[1];
        if t <= x1 {
            return y0 + (t - x0) / (x1 - x0) * (y1 - y0);
        }
    }
    points[points.len() - 1].1
}


/// Map a value in [0, 1] to an RGB color of the 'jet' colormap (dark blue, cyan, yellow, dark red).
/// Values outside [0, 1] are clamped.
pub fn jet(t: f64) -> [u8; 3] {
    let t = t.max(0.0).min(1.0);
    let channel = |points: &[(f64, f64)]| (interpolate(points, t) * 255.0).round() as u8;
    [channel(&JET_RED), channel(&JET_GREEN), channel(&JET_BLUE)]
}


/// The value range mapped onto the colormap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ColorRange {
    fn default() -> ColorRange {
        ColorRange { min: -1.0, max: 1.0 }
    }
}

impl ColorRange {
    pub fn new(min: f64, max: f64) -> ColorRange {
        ColorRange { min, max }
    }


    /// The range `(-m, m)` where `m` is the largest absolute value in the data, ignoring NaN.
    ///
    /// Falls back to the default range (-1, 1) if the data has no finite, non-zero values.
    pub fn symmetric_for<S, D>(data: &ArrayBase<S, D>) -> ColorRange
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        if data.is_empty() {
            return ColorRange::default();
        }
        let max_abs = *data.mapv(f64::abs).max_skipnan();
        if max_abs.is_finite() && max_abs > 0.0 {
            ColorRange::new(-max_abs, max_abs)
        } else {
            ColorRange::default()
        }
    }


    /// The symmetric range covering all given data sets.
    pub fn symmetric_for_all<'a, S, D, I>(data: I) -> ColorRange
    where
        S: Data<Elem = f64> + 'a,
        D: Dimension + 'a,
        I: IntoIterator<Item = &'a ArrayBase<S, D>>,
    {
        let max = data.into_iter()
            .map(|d| ColorRange::symmetric_for(d).max)
            .fold(0.0f64, f64::max);
        if max > 0.0 { ColorRange::new(-max, max) } else { ColorRange::default() }
    }


    /// Position of the value within the range, clamped to [0, 1]. NaN stays NaN.
    pub fn normalize(&self, value: f64) -> f64 {
        if value.is_nan() {
            return value;
        }
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.5;
        }
        ((value - self.min) / span).max(0.0).min(1.0)
    }


    /// The jet color of the value, or `None` for NaN.
    pub fn color(&self, value: f64) -> Option<[u8; 3]> {
        let t = self.normalize(value);
        if t.is_nan() { None } else { Some(jet(t)) }
    }
}
