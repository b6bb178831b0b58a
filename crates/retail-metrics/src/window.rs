//! Partitioned ordered window operations.
//!
//! The engine behind every time-ordered metric: lag deltas, sliding-frame
//! moving averages, competitive ranks, running cumulative shares and
//! quantile buckets. SQL engines differ subtly on tie and frame-edge
//! handling, so the semantics here are explicit rather than delegated to
//! built-in window expressions:
//!
//! - Sorting is always stable: rows with equal keys keep their input order.
//! - A value that is undefined for a row (no prior value, zero denominator)
//!   is a null in the output column, never an error and never 0.
//! - Every function returns a new frame, sorted by the partition and order
//!   keys it was given, with the output column(s) appended.

use crate::stats::round2;
use crate::{MetricsError, Result};
use derive_more::Display;
use polars::prelude::*;

/// Sort direction for an order key.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Smallest key first
    Ascending,
    /// Largest key first
    Descending,
}

impl Direction {
    const fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }
}

/// Percentage change against the value `k` positions earlier in the
/// partition: `(v[i] - v[i-k]) / v[i-k] * 100`, rounded to 2 decimals.
///
/// The first `k` rows of each partition have no prior value and produce
/// nulls, as does any row whose prior value is exactly 0.
pub fn lag_delta(
    df: &DataFrame,
    partition_by: &[&str],
    order_by: &[&str],
    value_col: &str,
    k: usize,
    out_col: &str,
) -> Result<DataFrame> {
    if k == 0 {
        return Err(MetricsError::InvalidInput(
            "lag offset must be at least 1".to_string(),
        ));
    }
    let mut sorted = sort_for_window(df, partition_by, order_by)?;
    let values = numeric_values(&sorted, value_col)?;
    let mut out: Vec<Option<f64>> = vec![None; values.len()];
    for (start, end) in partition_bounds(&sorted, partition_by)? {
        for i in (start + k)..end {
            if let (Some(current), Some(prior)) = (values[i], values[i - k]) {
                if prior != 0.0 {
                    out[i] = Some(round2((current - prior) / prior * 100.0));
                }
            }
        }
    }
    sorted.with_column(Series::new(out_col.into(), out))?;
    Ok(sorted)
}

/// Moving average over the frame `max(0, i - window_size + 1)..=i` within
/// each partition, rounded to 2 decimals.
///
/// Leading partial windows are permitted: the first row averages only
/// itself, the second averages two rows, and so on.
pub fn moving_average(
    df: &DataFrame,
    partition_by: &[&str],
    order_by: &[&str],
    value_col: &str,
    window_size: usize,
    out_col: &str,
) -> Result<DataFrame> {
    if window_size == 0 {
        return Err(MetricsError::InvalidInput(
            "window size must be at least 1".to_string(),
        ));
    }
    let mut sorted = sort_for_window(df, partition_by, order_by)?;
    let values = numeric_values(&sorted, value_col)?;
    let mut out: Vec<Option<f64>> = vec![None; values.len()];
    for (start, end) in partition_bounds(&sorted, partition_by)? {
        for i in start..end {
            let lo = i.saturating_sub(window_size - 1).max(start);
            let frame: Vec<f64> = values[lo..=i].iter().flatten().copied().collect();
            if !frame.is_empty() {
                out[i] = Some(round2(frame.iter().sum::<f64>() / frame.len() as f64));
            }
        }
    }
    sorted.with_column(Series::new(out_col.into(), out))?;
    Ok(sorted)
}

/// Competitive rank (`RANK`) of each row within its partition.
///
/// Rows with equal order keys share a rank; the rank after a tie-group of
/// size `t` jumps by `t` (two rows tied at rank 1 are followed by rank 3).
pub fn rank(
    df: &DataFrame,
    partition_by: &[&str],
    order_col: &str,
    direction: Direction,
    out_col: &str,
) -> Result<DataFrame> {
    let by: Vec<&str> = partition_by.iter().copied().chain([order_col]).collect();
    let mut descending = vec![false; partition_by.len()];
    descending.push(direction.is_descending());
    let mut sorted = stable_sort(df, &by, &descending)?;
    let keys = numeric_values(&sorted, order_col)?;
    let mut ranks = vec![0u32; keys.len()];
    for (start, end) in partition_bounds(&sorted, partition_by)? {
        for i in start..end {
            ranks[i] = if i > start && keys[i] == keys[i - 1] {
                ranks[i - 1]
            } else {
                (i - start + 1) as u32
            };
        }
    }
    sorted.with_column(Series::new(out_col.into(), ranks))?;
    Ok(sorted)
}

/// Running total and cumulative share over the whole frame.
///
/// Rows are reordered by `order_col` in the given direction (stable on
/// ties); `total_col` receives the prefix sum of `value_col` and
/// `share_col` the prefix sum as a percentage of the grand total, rounded
/// to 2 decimals. The last row's share is 100.00. Shares are null when the
/// grand total is 0.
pub fn running_total_share(
    df: &DataFrame,
    order_col: &str,
    direction: Direction,
    value_col: &str,
    total_col: &str,
    share_col: &str,
) -> Result<DataFrame> {
    let mut sorted = stable_sort(df, &[order_col], &[direction.is_descending()])?;
    let values = numeric_values(&sorted, value_col)?;
    let grand_total: f64 = values.iter().flatten().sum();
    let mut running = 0.0;
    let mut totals = Vec::with_capacity(values.len());
    let mut shares: Vec<Option<f64>> = Vec::with_capacity(values.len());
    for value in &values {
        if let Some(value) = value {
            running += value;
        }
        totals.push(running);
        shares.push((grand_total != 0.0).then(|| round2(100.0 * running / grand_total)));
    }
    sorted.with_column(Series::new(total_col.into(), totals))?;
    sorted.with_column(Series::new(share_col.into(), shares))?;
    Ok(sorted)
}

/// `NTILE`-style quantile bucketing over the whole frame.
///
/// Rows are sorted ascending by `order_col` (stable on ties) and split into
/// `num_buckets` contiguous buckets whose sizes differ by at most one, with
/// the larger buckets first. Bucket 1 holds the smallest keys.
pub fn quantile_bucket(
    df: &DataFrame,
    order_col: &str,
    num_buckets: usize,
    out_col: &str,
) -> Result<DataFrame> {
    if num_buckets == 0 {
        return Err(MetricsError::InvalidInput(
            "number of buckets must be at least 1".to_string(),
        ));
    }
    let mut sorted = stable_sort(df, &[order_col], &[false])?;
    let n = sorted.height();
    let base = n / num_buckets;
    let remainder = n % num_buckets;
    let mut buckets: Vec<u32> = Vec::with_capacity(n);
    for bucket in 0..num_buckets {
        let size = base + usize::from(bucket < remainder);
        buckets.extend(std::iter::repeat_n((bucket + 1) as u32, size));
    }
    sorted.with_column(Series::new(out_col.into(), buckets))?;
    Ok(sorted)
}

/// Stable multi-column sort; nulls last.
pub(crate) fn stable_sort(df: &DataFrame, by: &[&str], descending: &[bool]) -> Result<DataFrame> {
    Ok(df.sort(
        by.to_vec(),
        SortMultipleOptions::default()
            .with_order_descending_multi(descending.to_vec())
            .with_nulls_last(true)
            .with_maintain_order(true),
    )?)
}

fn sort_for_window(df: &DataFrame, partition_by: &[&str], order_by: &[&str]) -> Result<DataFrame> {
    let by: Vec<&str> = partition_by.iter().chain(order_by).copied().collect();
    let descending = vec![false; by.len()];
    stable_sort(df, &by, &descending)
}

/// Half-open `(start, end)` row ranges of each partition in a frame already
/// sorted by the partition keys. An empty `partition_by` yields one range
/// covering the whole frame.
pub(crate) fn partition_bounds(
    df: &DataFrame,
    partition_by: &[&str],
) -> Result<Vec<(usize, usize)>> {
    let n = df.height();
    if n == 0 {
        return Ok(Vec::new());
    }
    if partition_by.is_empty() {
        return Ok(vec![(0, n)]);
    }
    let keys = partition_by
        .iter()
        .map(|name| df.column(name))
        .collect::<PolarsResult<Vec<_>>>()?;
    let mut bounds = Vec::new();
    let mut start = 0;
    for i in 1..n {
        let mut boundary = false;
        for key in &keys {
            if key.get(i)? != key.get(i - 1)? {
                boundary = true;
                break;
            }
        }
        if boundary {
            bounds.push((start, i));
            start = i;
        }
    }
    bounds.push((start, n));
    Ok(bounds)
}

/// Materialize a column as `f64` values.
fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let casted = df.column(name)?.cast(&DataType::Float64)?;
    let values = casted.f64()?.into_iter().collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn monthly(stores: &[i64], months: &[i32], sales: &[f64]) -> DataFrame {
        df![
            "store" => stores,
            "year" => vec![2010i32; stores.len()],
            "month" => months,
            "total_sales" => sales,
        ]
        .unwrap()
    }

    fn f64_col(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn test_lag_delta_first_rows_null_per_partition() {
        let df = monthly(
            &[1, 1, 1, 2, 2, 2],
            &[1, 2, 3, 1, 2, 3],
            &[100.0, 110.0, 121.0, 200.0, 180.0, 162.0],
        );
        let out = lag_delta(&df, &["store"], &["year", "month"], "total_sales", 1, "pct").unwrap();
        assert_eq!(
            f64_col(&out, "pct"),
            vec![
                None,
                Some(10.0),
                Some(10.0),
                None,
                Some(-10.0),
                Some(-10.0)
            ]
        );
    }

    #[test]
    fn test_lag_delta_zero_prior_is_null() {
        let df = monthly(&[1, 1, 1], &[1, 2, 3], &[0.0, 50.0, 100.0]);
        let out = lag_delta(&df, &["store"], &["year", "month"], "total_sales", 1, "pct").unwrap();
        // prior of 0 must not raise or produce infinity
        assert_eq!(f64_col(&out, "pct"), vec![None, None, Some(100.0)]);
    }

    #[test]
    fn test_lag_delta_zero_offset_rejected() {
        let df = monthly(&[1], &[1], &[100.0]);
        let err =
            lag_delta(&df, &["store"], &["month"], "total_sales", 0, "pct").unwrap_err();
        assert!(matches!(err, MetricsError::InvalidInput(_)));
    }

    #[test]
    fn test_moving_average_partial_leading_windows() {
        let df = monthly(&[1, 1, 1, 1], &[1, 2, 3, 4], &[100.0, 110.0, 121.0, 130.0]);
        let out =
            moving_average(&df, &["store"], &["year", "month"], "total_sales", 3, "ma").unwrap();
        // window sizes 1, 2, 3, 3
        assert_eq!(
            f64_col(&out, "ma"),
            vec![Some(100.0), Some(105.0), Some(110.33), Some(120.33)]
        );
    }

    #[test]
    fn test_rank_ties_skip_values() {
        let df = df![
            "year" => [2010i32, 2010, 2010, 2010, 2011],
            "yearly_sales" => [500.0, 500.0, 300.0, 700.0, 100.0],
        ]
        .unwrap();
        let out = rank(&df, &["year"], "yearly_sales", Direction::Descending, "r").unwrap();
        let ranks: Vec<Option<u32>> = out.column("r").unwrap().u32().unwrap().into_iter().collect();
        // 2010: 700 -> 1, 500/500 -> 2, 2; 300 -> 4 (tie of size 2 skips 3)
        assert_eq!(
            ranks,
            vec![Some(1), Some(2), Some(2), Some(4), Some(1)]
        );
    }

    #[test]
    fn test_rank_stable_on_ties() {
        let df = df![
            "year" => [2010i32, 2010],
            "store" => [7i64, 3],
            "yearly_sales" => [500.0, 500.0],
        ]
        .unwrap();
        let out = rank(&df, &["year"], "yearly_sales", Direction::Descending, "r").unwrap();
        let stores: Vec<Option<i64>> =
            out.column("store").unwrap().i64().unwrap().into_iter().collect();
        // input order preserved among tied rows
        assert_eq!(stores, vec![Some(7), Some(3)]);
    }

    #[test]
    fn test_running_total_share_reaches_hundred() {
        let df = df![
            "store" => [1i64, 2, 3],
            "total_sales" => [800.0, 150.0, 50.0],
        ]
        .unwrap();
        let out = running_total_share(
            &df,
            "total_sales",
            Direction::Descending,
            "total_sales",
            "running_total",
            "cumulative_pct",
        )
        .unwrap();
        assert_eq!(
            f64_col(&out, "cumulative_pct"),
            vec![Some(80.0), Some(95.0), Some(100.0)]
        );
        assert_eq!(
            f64_col(&out, "running_total"),
            vec![Some(800.0), Some(950.0), Some(1000.0)]
        );
    }

    #[test]
    fn test_running_total_share_zero_grand_total() {
        let df = df![
            "store" => [1i64, 2],
            "total_sales" => [0.0, 0.0],
        ]
        .unwrap();
        let out = running_total_share(
            &df,
            "total_sales",
            Direction::Descending,
            "total_sales",
            "running_total",
            "cumulative_pct",
        )
        .unwrap();
        assert_eq!(f64_col(&out, "cumulative_pct"), vec![None, None]);
    }

    #[rstest]
    #[case(8, vec![2, 2, 2, 2])]
    #[case(9, vec![3, 2, 2, 2])]
    #[case(11, vec![3, 3, 3, 2])]
    #[case(3, vec![1, 1, 1, 0])]
    fn test_quantile_bucket_sizes(#[case] n: usize, #[case] expected_sizes: Vec<usize>) {
        let df = df![
            "store" => (0..n as i64).collect::<Vec<_>>(),
            "avg_unemployment" => (0..n).map(|i| i as f64).collect::<Vec<_>>(),
        ]
        .unwrap();
        let out = quantile_bucket(&df, "avg_unemployment", 4, "quartile").unwrap();
        let buckets: Vec<u32> = out
            .column("quartile")
            .unwrap()
            .u32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        for q in 1..=4u32 {
            let size = buckets.iter().filter(|b| **b == q).count();
            assert_eq!(size, expected_sizes[q as usize - 1]);
        }
        // assignment is non-decreasing in order-key
        assert!(buckets.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_quantile_bucket_smallest_keys_in_bucket_one() {
        let df = df![
            "store" => [1i64, 2, 3, 4],
            "avg_unemployment" => [9.0, 3.0, 7.0, 5.0],
        ]
        .unwrap();
        let out = quantile_bucket(&df, "avg_unemployment", 2, "half").unwrap();
        let stores: Vec<Option<i64>> =
            out.column("store").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(stores, vec![Some(2), Some(4), Some(3), Some(1)]);
        let halves: Vec<Option<u32>> =
            out.column("half").unwrap().u32().unwrap().into_iter().collect();
        assert_eq!(halves, vec![Some(1), Some(1), Some(2), Some(2)]);
    }
}
