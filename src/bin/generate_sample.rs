use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Iterations written per case history.
const ITERATIONS: usize = 400;
const TIME_STEP: f64 = 0.005;

/// Deterministic noise source: xoshiro256** seeded through splitmix64, so
/// every generated data set is identical for a given seed.
struct HistoryRng {
    s: [u64; 4],
}

impl HistoryRng {
    fn seeded(seed: u64) -> Self {
        let mut sm = seed;
        let mut splitmix = || {
            sm = sm.wrapping_add(0x9E37_79B9_7F4A_7C15);
            let mut z = sm;
            z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
            z ^ (z >> 31)
        };
        HistoryRng {
            s: [splitmix(), splitmix(), splitmix(), splitmix()],
        }
    }

    fn next_u64(&mut self) -> u64 {
        let [a, b, c, d] = self.s;
        let out = b.wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let c = c ^ a;
        let d = d ^ b;
        let b = b ^ c;
        let a = a ^ d;
        self.s = [a, b, c ^ (self.s[1] << 17), d.rotate_left(45)];
        out
    }

    /// Uniform in `[-1, 1)`.
    fn symmetric(&mut self) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        2.0 * unit - 1.0
    }

    /// Normal sample via the Marsaglia polar method.
    fn normal(&mut self, std_dev: f64) -> f64 {
        loop {
            let (u, v) = (self.symmetric(), self.symmetric());
            let r2 = u * u + v * v;
            if r2 > 0.0 && r2 < 1.0 {
                return std_dev * u * (-2.0 * r2.ln() / r2).sqrt();
            }
        }
    }
}

/// Converged coefficients of a thin aerofoil with a soft stall and a
/// Reynolds-dependent profile drag.
fn converged_coefficients(reynolds: u64, aoa_deg: i64) -> (f64, f64) {
    let alpha = (aoa_deg as f64).to_radians();
    let stall = 14f64.to_radians();
    let cl = 2.0 * std::f64::consts::PI * alpha / (1.0 + (alpha / stall).powi(4));
    let cd0 = 0.074 / (reynolds as f64).powf(0.2);
    let cd = cd0 + 0.012 * cl * cl + 0.02 * (alpha / stall).powi(6);
    (cd, cl)
}

/// Damped, noisy approach to `target`, like a solver residual history.
fn convergence_history(target: f64, rng: &mut HistoryRng) -> Vec<f64> {
    let start = target + 0.5 + target.abs();
    (0..ITERATIONS)
        .map(|i| {
            let t = i as f64 / 40.0;
            let transient = (start - target) * (-t).exp() * (3.0 * t).cos();
            let noise = rng.normal(1e-4) * (-t / 4.0).exp();
            target + transient + noise
        })
        .collect()
}

fn write_case(path: &Path, history: &[f64]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for (i, value) in history.iter().enumerate() {
        writer.write_record(&[
            i.to_string(),
            format!("{:.4}", i as f64 * TIME_STEP),
            format!("{value:.8}"),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let output_dir: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "results".to_string())
        .into();
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let mut rng = HistoryRng::seeded(42);
    let reynolds_numbers = [100_000u64, 200_000, 500_000];
    let angles = [0i64, 2, 4, 6, 8, 10, 12, 14, 16];

    let mut written = 0;
    for &re in &reynolds_numbers {
        for &aoa in &angles {
            let (cd, cl) = converged_coefficients(re, aoa);
            for (kind, target) in [("drag", cd), ("lift", cl)] {
                let path = output_dir.join(format!("{kind}_Re{re}_aoa{aoa}.csv"));
                write_case(&path, &convergence_history(target, &mut rng))?;
                written += 1;
            }
        }
    }

    println!(
        "Wrote {written} case files ({ITERATIONS} iterations each) to {}",
        output_dir.display()
    );
    Ok(())
}
