//! Numerically stable primitives for log-domain probability math.

/// Natural log of a probability, mapping an exact zero to `-inf`.
///
/// Negative or NaN inputs yield NaN; callers validate probabilities before
/// converting them.
pub fn ln_prob(p: f64) -> f64 {
    if p.is_nan() || p < 0.0 {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    p.ln()
}

/// Stable log(sum(exp(values))).
///
/// Computed as `m + ln(sum(exp(v - m)))` with `m = max(values)`.
/// Returns NEG_INFINITY for empty input or all -inf inputs; the `-inf - -inf`
/// subtraction is never evaluated.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NEG_INFINITY;
    }
    if values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if max == f64::INFINITY {
        return f64::INFINITY;
    }
    let mut sum = 0.0;
    for v in values {
        sum += (*v - max).exp();
    }
    max + sum.ln()
}

/// Stable log(exp(a) + exp(b)).
pub fn log_add_exp(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    if a == f64::INFINITY || b == f64::INFINITY {
        return f64::INFINITY;
    }
    let m = a.max(b);
    let diff = (a - b).abs();
    m + (-diff).exp().ln_1p()
}

/// Shift log-weights so that they exponentiate to a distribution summing to 1.
///
/// If every weight is -inf there is no mass to normalize and the input is
/// returned unchanged (all -inf).
pub fn normalize_log_probs(log_weights: &[f64]) -> Vec<f64> {
    let total = log_sum_exp(log_weights);
    if !total.is_finite() {
        return log_weights.to_vec();
    }
    log_weights.iter().map(|w| w - total).collect()
}
