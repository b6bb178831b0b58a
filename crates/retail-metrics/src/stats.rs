//! Scalar statistics kernels and rounding helpers.
//!
//! These back the cross-sectional metrics (volatility, macro correlation)
//! and all rounding in the crate. Undefined results are `None`, never NaN:
//! callers write them out as nulls.

use crate::Result;
use polars::prelude::*;

/// Round to `decimals` decimal places, half away from zero (SQL `ROUND`).
pub fn round_to(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor).round() / factor
}

/// Round to 2 decimal places.
pub fn round2(x: f64) -> f64 {
    round_to(x, 2)
}

/// Round to 3 decimal places.
pub fn round3(x: f64) -> f64 {
    round_to(x, 3)
}

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Sample standard deviation (ddof = 1).
///
/// `None` when fewer than two observations; a constant series with two or
/// more observations yields `Some(0.0)`.
pub fn sample_std(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    let m = mean(xs)?;
    let ss: f64 = xs.iter().map(|x| (x - m) * (x - m)).sum();
    Some((ss / (xs.len() - 1) as f64).sqrt())
}

/// Pearson correlation coefficient between two equal-length series.
///
/// `None` when fewer than two points or when either series is constant
/// (zero variance). The result is clamped to `[-1, 1]` so floating-point
/// noise never escapes the mathematical range.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let mx = mean(xs)?;
    let my = mean(ys)?;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Round a float column in place to `decimals` places, preserving nulls.
pub(crate) fn round_column(df: &mut DataFrame, name: &str, decimals: i32) -> Result<()> {
    let rounded = df
        .column(name)?
        .f64()?
        .apply_values(|v| round_to(v, decimals));
    df.with_column(rounded.into_series().with_name(name.into()))?;
    Ok(())
}
