/// Width of the comparison window at each end of a series
pub const TREND_WINDOW: usize = 7;

/// Percent change between the start and the end of a daily series.
///
/// Sums the first `min(7, n)` values and the last `min(7, n)` values and
/// returns `round((last - first) / first * 100)`. The two windows overlap when
/// the series is shorter than fourteen days.
///
/// Returns `0` for an empty series or when the first window sums to zero,
/// whatever the last window holds.
///
/// Halves round toward positive infinity, so `-2.5` becomes `-2`.
pub fn percent_change(values: &[f64]) -> i64 {
    let n = values.len();
    if n == 0 {
        return 0;
    }

    let window = n.min(TREND_WINDOW);
    let first: f64 = values[..window].iter().sum();
    let last: f64 = values[n - window..].iter().sum();

    if first == 0.0 {
        return 0;
    }

    ((last - first) / first * 100.0 + 0.5).floor() as i64
}
