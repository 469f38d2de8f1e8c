use std::fs;
use std::path::{Path, PathBuf};

/// One attenuation dip below a flat `base`, in dB.
pub fn dip(x: f64, centre: f64, sigma: f64, depth: f64, base: f64) -> f64 {
    base - depth * (-0.5 * ((x - centre) / sigma).powi(2)).exp()
}

/// Even grid from `start` to `end` with n points (inclusive).
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![start];
    }
    (0..n)
        .map(|i| start + (end - start) * (i as f64) / ((n - 1) as f64))
        .collect()
}

/// Small deterministic wiggle in [-0.5, 0.5].
pub fn jitter(x: f64) -> f64 {
    ((x * 137.13).sin() + (x * 73.7).cos()) * 0.25
}

/// Write a two-column spectrum file with the given separator.
pub fn write_spectrum(dir: &Path, name: &str, sep: &str, xs: &[f64], ys: &[f64]) -> PathBuf {
    let mut body = String::new();
    for (x, y) in xs.iter().zip(ys) {
        body.push_str(&format!("{x}{sep}{y}\n"));
    }
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

/// Write a spectrum with a dip at `centre` over 1500..1600 nm.
pub fn write_dip(dir: &Path, name: &str, sep: &str, centre: f64) -> PathBuf {
    let xs = linspace(1500.0, 1600.0, 201);
    let ys: Vec<f64> = xs
        .iter()
        .map(|&x| dip(x, centre, 3.0, 15.0, -10.0) + 0.05 * jitter(x))
        .collect();
    write_spectrum(dir, name, sep, &xs, &ys)
}

#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}
