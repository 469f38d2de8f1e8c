//! Savitzky-Golay smoothing.
//!
//! Convolution weights are built from Gram polynomials, which gives the
//! least-squares fit for every evaluation point of a window at once. Interior
//! samples use the centre row; the first and last `half` samples are
//! evaluated on the polynomial fitted to the outermost full window, so the
//! output keeps the input length without truncating the fit.

use crate::error::FilterError;

/// Smooth `signal` with a `window`-point, degree-`order` Savitzky-Golay filter.
///
/// `window` must be odd and at least 3, `order` in `1..window`, and the
/// signal at least `window` samples long.
pub fn smooth(signal: &[f64], window: usize, order: usize) -> Result<Vec<f64>, FilterError> {
    if window < 3 || window % 2 == 0 || order < 1 || order >= window {
        return Err(FilterError::InvalidParameters { window, order });
    }
    let n = signal.len();
    if window > n {
        return Err(FilterError::WindowTooLarge { window, len: n });
    }

    let half = window / 2;
    let weights = convolution_weights(window, order);
    let mut out = vec![0.0f64; n];

    let centre = &weights[half];
    for i in half..n - half {
        out[i] = dot(centre, &signal[i - half..=i + half]);
    }

    let head = &signal[..window];
    let tail = &signal[n - window..];
    for t in 0..half {
        out[t] = dot(&weights[t], head);
        out[n - half + t] = dot(&weights[half + 1 + t], tail);
    }

    Ok(out)
}

fn dot(weights: &[f64], samples: &[f64]) -> f64 {
    weights.iter().zip(samples).map(|(w, y)| w * y).sum()
}

/// `w[t][j]`: contribution of window sample `j` to the fitted value at window position `t`.
fn convolution_weights(window: usize, order: usize) -> Vec<Vec<f64>> {
    let half = (window / 2) as i64;
    let two_m = 2 * half;

    let gram: Vec<Vec<f64>> = (0..window as i64)
        .map(|idx| gram_polynomials(idx - half, half, order))
        .collect();

    let coef: Vec<f64> = (0..=order as i64)
        .map(|k| (2 * k + 1) as f64 * gen_fact(two_m, k) / gen_fact(two_m + k + 1, k + 1))
        .collect();

    (0..window)
        .map(|t| {
            (0..window)
                .map(|j| {
                    coef.iter()
                        .enumerate()
                        .map(|(k, c)| c * gram[j][k] * gram[t][k])
                        .sum()
                })
                .collect()
        })
        .collect()
}

/// Gram polynomials `P_0..=P_order` over the points `-m..=m`, evaluated at `i`.
fn gram_polynomials(i: i64, m: i64, order: usize) -> Vec<f64> {
    let mut p = vec![0.0f64; order + 1];
    p[0] = 1.0;
    for k in 1..=order {
        let kf = k as f64;
        let denom = kf * (2 * m - k as i64 + 1) as f64;
        let a = (4.0 * kf - 2.0) / denom;
        let b = (kf - 1.0) * (2 * m + k as i64) as f64 / denom;
        let prev2 = if k >= 2 { p[k - 2] } else { 0.0 };
        p[k] = a * i as f64 * p[k - 1] - b * prev2;
    }
    p
}

/// Generalised factorial `a (a-1) … (a-b+1)`.
fn gen_fact(a: i64, b: i64) -> f64 {
    ((a - b + 1)..=a).fold(1.0, |acc, j| acc * j as f64)
}
