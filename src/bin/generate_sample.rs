//! Writes a drifting series of synthetic grating spectra for trying the
//! `single` and `batch` commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser)]
#[command(about = "Write synthetic two-column spectra as text files")]
struct Args {
    /// Output directory (created if missing)
    #[arg(default_value = "samples")]
    out_dir: PathBuf,
    /// Number of spectra to write
    #[arg(long, short = 'n', default_value_t = 12)]
    count: usize,
}

/// Attenuation dip in dB below a flat baseline.
fn gaussian_dip(x: f64, mu: f64, sigma: f64, depth: f64) -> f64 {
    -depth * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn generate_spectrum(
    wavelengths: &[f64],
    centre: f64,
    depth: f64,
    baseline: f64,
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    wavelengths
        .iter()
        .map(|&wl| baseline + gaussian_dip(wl, centre, 4.0, depth) + rng.gauss(0.0, noise_level))
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Render two columns with one of the separators the loader understands.
///
/// The first line is always data, since the delimiter is sniffed from it.
fn render(wavelengths: &[f64], intensity: &[f64], style: usize) -> String {
    let sep = match style % 3 {
        0 => ';',
        1 => ',',
        _ => '\t',
    };
    let mut out = String::new();
    for (wl, y) in wavelengths.iter().zip(intensity) {
        out.push_str(&format!("{wl:.3}{sep}{y:.4}\n"));
    }
    out
}

fn main() -> Result<()> {
    let Args { out_dir, count } = Args::parse();

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    // 1500 → 1600 nm, step 0.1
    let wavelengths: Vec<f64> = (0..=1000).map(|i| 1500.0 + i as f64 * 0.1).collect();

    for k in 0..count {
        // slow red shift with a little jitter, as a heating grating would show
        let centre = 1545.0 + 0.4 * k as f64 + rng.gauss(0.0, 0.05);
        let depth = 18.0 + rng.gauss(0.0, 0.5);
        let y = generate_spectrum(&wavelengths, centre, depth, -12.0, 0.15, &mut rng);

        let path = out_dir.join(format!("lpg_{k:03}.txt"));
        fs::write(&path, render(&wavelengths, &y, k))
            .with_context(|| format!("writing {}", path.display()))?;
    }

    println!(
        "Wrote {count} spectra ({} points each) to {}",
        wavelengths.len(),
        out_dir.display()
    );
    Ok(())
}
