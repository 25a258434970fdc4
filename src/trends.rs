//! Group statistics for comparing FNC values between two cohorts over time windows.
//!
//! The inputs are matrices of shape (subjects, windows), one per cohort, holding the
//! connectivity of one component pair for each subject and time window.

use ndarray::{Array1, ArrayView2, Axis};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::{FncError, Result};


/// Per-window descriptive statistics and t-test results for two cohorts.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendStats {
    pub mean_a: Array1<f64>,
    pub mean_b: Array1<f64>,
    /// Standard error of the mean.
    pub sem_a: Array1<f64>,
    pub sem_b: Array1<f64>,
    pub t_stats: Array1<f64>,
    /// Two-sided p values.
    pub p_values: Array1<f64>,
}

impl TrendStats {
    pub fn num_windows(&self) -> usize {
        self.t_stats.len()
    }
}


/// Compute per-window means, standard errors and independent two-sample t-tests.
///
/// The t-test assumes equal variances (pooled variance, `n_a + n_b - 2` degrees of freedom).
/// Windows in which both cohorts have zero variance get a NaN t statistic and p value if the
/// means are equal, and an infinite t statistic with p value 0 otherwise.
///
/// # Errors
///
/// * [`FncError::WindowCountMismatch`] if the cohorts differ in their number of windows.
/// * [`FncError::DegenerateInput`] if a cohort has fewer than 2 subjects.
pub fn fnc_trend_stats(cohort_a: ArrayView2<f64>, cohort_b: ArrayView2<f64>) -> Result<TrendStats> {
    let (na, wa) = cohort_a.dim();
    let (nb, wb) = cohort_b.dim();
    if wa != wb {
        return Err(FncError::WindowCountMismatch { a: wa, b: wb });
    }
    if na < 2 || nb < 2 {
        return Err(FncError::DegenerateInput(format!(
            "each cohort needs at least 2 subjects, got {} and {}", na, nb
        )));
    }

    let (mean_a, var_a) = column_mean_var(&cohort_a)?;
    let (mean_b, var_b) = column_mean_var(&cohort_b)?;
    let sem_a = var_a.mapv(|v| (v / na as f64).sqrt());
    let sem_b = var_b.mapv(|v| (v / nb as f64).sqrt());

    let df = (na + nb - 2) as f64;
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| FncError::DegenerateInput(e.to_string()))?;

    let mut t_stats = Array1::zeros(wa);
    let mut p_values = Array1::zeros(wa);
    for w in 0..wa {
        let pooled = ((na - 1) as f64 * var_a[w] + (nb - 1) as f64 * var_b[w]) / df;
        let t = (mean_a[w] - mean_b[w]) / (pooled * (1.0 / na as f64 + 1.0 / nb as f64)).sqrt();
        t_stats[w] = t;
        p_values[w] = two_sided_p(&dist, t);
    }

    Ok(TrendStats { mean_a, mean_b, sem_a, sem_b, t_stats, p_values })
}


/// Column means and sample variances (ddof 1).
fn column_mean_var(data: &ArrayView2<f64>) -> Result<(Array1<f64>, Array1<f64>)> {
    let mean = data.mean_axis(Axis(0))
        .ok_or_else(|| FncError::DegenerateInput(String::from("cohort has no subjects")))?;
    let var = data.var_axis(Axis(0), 1.0);
    Ok((mean, var))
}


fn two_sided_p(dist: &StudentsT, t: f64) -> f64 {
    if t.is_nan() {
        f64::NAN
    } else if t.is_infinite() {
        0.0
    } else {
        (2.0 * dist.cdf(-t.abs())).min(1.0)
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    #[test]
    fn means_and_standard_errors_are_computed_per_window() {
        let a = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0], [5.0, 50.0]];
        let b = array![[2.0, 0.0], [3.0, 0.0], [4.0, 1.0], [5.0, 1.0], [6.0, 1.0]];
        let stats = fnc_trend_stats(a.view(), b.view()).unwrap();

        assert_eq!(2, stats.num_windows());
        assert_abs_diff_eq!(stats.mean_a, array![3.0, 30.0], epsilon = 1e-12);
        assert_abs_diff_eq!(stats.mean_b, array![4.0, 0.6], epsilon = 1e-12);
        assert_abs_diff_eq!(stats.sem_a[0], 2.5f64.sqrt() / 5f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(stats.sem_a[1], 250f64.sqrt() / 5f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn the_t_test_matches_reference_values() {
        let a = array![[1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0], [5.0, 5.0]];
        let b = array![[2.0, 6.0], [3.0, 7.0], [4.0, 8.0], [5.0, 9.0], [6.0, 10.0]];
        let stats = fnc_trend_stats(a.view(), b.view()).unwrap();

        assert_abs_diff_eq!(stats.t_stats[0], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.p_values[0], 0.346_593_5, epsilon = 1e-6);
        assert_abs_diff_eq!(stats.t_stats[1], -5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.p_values[1], 0.001_052_8, epsilon = 1e-6);
    }

    #[test]
    fn swapping_the_cohorts_flips_the_sign_of_t() {
        let a = array![[0.1, 0.5], [0.3, 0.2], [0.2, 0.9]];
        let b = array![[0.4, 0.1], [0.6, 0.0], [0.5, 0.3], [0.7, 0.2]];
        let ab = fnc_trend_stats(a.view(), b.view()).unwrap();
        let ba = fnc_trend_stats(b.view(), a.view()).unwrap();
        assert_abs_diff_eq!(ab.t_stats, -&ba.t_stats, epsilon = 1e-12);
        assert_abs_diff_eq!(ab.p_values, ba.p_values, epsilon = 1e-12);
    }

    #[test]
    fn constant_windows_yield_nan_or_infinite_t() {
        let a = array![[1.0, 1.0], [1.0, 1.0]];
        let b = array![[1.0, 2.0], [1.0, 2.0]];
        let stats = fnc_trend_stats(a.view(), b.view()).unwrap();
        assert!(stats.t_stats[0].is_nan());
        assert!(stats.p_values[0].is_nan());
        assert!(stats.t_stats[1].is_infinite());
        assert_eq!(0.0, stats.p_values[1]);
    }

    #[test]
    fn invalid_cohorts_are_rejected() {
        let a = Array2::<f64>::zeros((5, 3));
        let b = Array2::<f64>::zeros((5, 4));
        assert!(matches!(
            fnc_trend_stats(a.view(), b.view()),
            Err(FncError::WindowCountMismatch { a: 3, b: 4 })
        ));
        let single = Array2::<f64>::zeros((1, 3));
        assert!(matches!(
            fnc_trend_stats(single.view(), a.view()),
            Err(FncError::DegenerateInput(_))
        ));
    }
}
