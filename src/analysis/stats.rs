/// Agreement statistics between an upstream release and a downstream gauge.
///
/// Operates on an aligned, gap-free pair (callers drop NaN rows first) and
/// produces the fixed metric set: Correlation, Mean Error, RMSE, R Squared,
/// and Nash–Sutcliffe Efficiency. A metric that is mathematically undefined
/// for the given pair (zero-length input, zero variance, zero NSE
/// denominator) is reported as `None` rather than aborting the report.

use crate::model::{AlignedPair, CompareError, StatisticReport, StatisticRow};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Which side of the pair is the "observed" truth for NSE. The simulated /
/// predicted side is always the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NseReference {
    Upstream,
    Downstream,
}

#[derive(Debug, Clone, Copy)]
pub struct StatsOptions {
    /// Include the Mean Error row. ME is upstream minus downstream.
    pub include_mean_error: bool,
    pub nse_reference: NseReference,
}

impl Default for StatsOptions {
    fn default() -> Self {
        StatsOptions { include_mean_error: true, nse_reference: NseReference::Upstream }
    }
}

// ---------------------------------------------------------------------------
// Report computation
// ---------------------------------------------------------------------------

/// Computes the agreement report over an aligned pair.
///
/// Values are full precision; round at display time via
/// [`StatisticReport::rounded`]. Row order is fixed: Correlation,
/// [Mean Error], RMSE, R Squared, NSE.
///
/// # Errors
/// `CompareError::LengthMismatch` if the two value vectors differ in
/// length. Alignment guarantees equal lengths, so this only fires on an
/// internal invariant violation — it must never be computed over
/// mismatched sequences.
pub fn flow_stats(
    pair: &AlignedPair,
    options: &StatsOptions,
) -> Result<StatisticReport, CompareError> {
    let x = &pair.upstream;
    let y = &pair.downstream;
    if x.len() != y.len() {
        return Err(CompareError::LengthMismatch { left: x.len(), right: y.len() });
    }

    let (observed, simulated) = match options.nse_reference {
        NseReference::Upstream => (x.as_slice(), y.as_slice()),
        NseReference::Downstream => (y.as_slice(), x.as_slice()),
    };

    let mut rows = vec![StatisticRow { name: "Correlation", value: pearson(x, y) }];
    if options.include_mean_error {
        rows.push(StatisticRow { name: "ME", value: mean_error(x, y) });
    }
    rows.push(StatisticRow { name: "RMSE", value: rmse(x, y) });
    // For a simple linear fit of y on x, the regression R² equals the
    // squared Pearson coefficient.
    rows.push(StatisticRow { name: "R Squared", value: pearson(x, y).map(|r| r * r) });
    rows.push(StatisticRow { name: "NSE", value: nash_sutcliffe(observed, simulated) });

    Ok(StatisticReport { rows })
}

// ---------------------------------------------------------------------------
// Individual metrics
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean Error = mean(x − y), upstream minus downstream.
pub fn mean_error(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.is_empty() {
        return None;
    }
    let sum: f64 = x.iter().zip(y).map(|(a, b)| a - b).sum();
    finite(sum / x.len() as f64)
}

/// RMSE = sqrt(mean((x − y)²)).
pub fn rmse(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.is_empty() {
        return None;
    }
    let sum_sq: f64 = x.iter().zip(y).map(|(a, b)| (a - b) * (a - b)).sum();
    finite((sum_sq / x.len() as f64).sqrt())
}

/// Pearson correlation coefficient. Undefined (None) when either series
/// has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n == 0 {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mx;
        let dy = y[i] - my;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    finite(cov / (var_x * var_y).sqrt())
}

/// NSE = 1 − Σ(obs − sim)² / Σ(obs − mean(obs))².
///
/// Undefined (None) for a constant observed series, whose denominator is
/// zero. Requires equal lengths; the public entry point enforces this
/// before calling.
pub fn nash_sutcliffe(observed: &[f64], simulated: &[f64]) -> Option<f64> {
    if observed.is_empty() || observed.len() != simulated.len() {
        return None;
    }
    let mean_obs = mean(observed)?;
    let numerator: f64 = observed
        .iter()
        .zip(simulated)
        .map(|(o, s)| (o - s) * (o - s))
        .sum();
    let denominator: f64 = observed.iter().map(|o| (o - mean_obs) * (o - mean_obs)).sum();
    if denominator == 0.0 {
        return None;
    }
    finite(1.0 - numerator / denominator)
}

fn finite(v: f64) -> Option<f64> {
    if v.is_finite() { Some(v) } else { None }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
