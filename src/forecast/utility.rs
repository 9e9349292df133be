/// Average of the day offsets, daily totals or residuals; 0.0 when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population spread around `mean`. The projection band is this, taken over
/// the fit residuals, scaled by a normal quantile. 0.0 when empty.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    match values.len() {
        0 => 0.0,
        n => {
            let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
            (sum_sq / n as f64).sqrt()
        }
    }
}

/// Standard normal quantile (inverse CDF) for `p` in (0, 1).
///
/// Abramowitz & Stegun 26.2.23; absolute error below 4.5e-4.
pub fn normal_quantile(p: f64) -> f64 {
    const C: [f64; 3] = [2.515517, 0.802853, 0.010328];
    const D: [f64; 3] = [1.432788, 0.189269, 0.001308];

    let tail = |q: f64| {
        let t = (-2.0 * q.ln()).sqrt();
        t - (C[0] + C[1] * t + C[2] * t * t) / (1.0 + D[0] * t + D[1] * t * t + D[2] * t * t * t)
    };

    if p < 0.5 { -tail(p) } else { tail(1.0 - p) }
}
