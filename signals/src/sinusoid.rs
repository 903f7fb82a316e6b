use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::kind::DatasetKind;
use crate::signal::{Signal, SignalSet};
use crate::split::Split;

/// Random sums of sines and cosines with integer frequencies.
#[derive(Clone, Debug, PartialEq)]
pub struct SinusoidConfig {
    /// Number of summed components; the first half are sines, the rest cosines.
    pub components: usize,
    pub start: f64,
    pub end: f64,
    pub points: usize,
    pub amp_range: f64,
    pub freq_range: u32,
    /// Standard deviation of the additive Gaussian noise.
    pub noise: f64,
}

impl Default for SinusoidConfig {
    fn default() -> Self {
        Self {
            components: 20,
            start: 0.0,
            end: 3.0,
            points: 1000,
            amp_range: 25.0,
            freq_range: 25,
            noise: 0.3,
        }
    }
}

impl SinusoidConfig {
    pub fn generate(&self, samples: usize, seed: u64, split: Split) -> SignalSet {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(split.seed_offset() << 32));
        let timestamps = crate::linspace(self.start as f32, self.end as f32, self.points);

        let signals = (0..samples)
            .map(|_| {
                let values = self.sample(&mut rng, &timestamps);
                Signal::new(values, timestamps.clone())
            })
            .collect();

        SignalSet::new(DatasetKind::Sinusoid, signals)
    }

    fn sample<R: Rng>(&self, rng: &mut R, timestamps: &[f32]) -> Vec<f32> {
        let amps: Vec<f64> = (0..self.components)
            .map(|_| round1(rng.gen_range(0.0..self.amp_range.max(f64::EPSILON))))
            .collect();
        let freqs: Vec<f64> = (0..self.components)
            .map(|_| rng.gen_range(1..=self.freq_range.max(1)) as f64)
            .collect();
        let phase = round1(rng.gen_range(-1.0..1.0));
        let half = self.components / 2;

        timestamps
            .iter()
            .map(|&t| {
                let shifted = 2.0 * PI * (t as f64 + phase);
                let clean: f64 = (0..self.components)
                    .map(|j| {
                        let angle = freqs[j] * shifted;
                        if j < half.max(1) {
                            amps[j] * angle.sin()
                        } else {
                            amps[j] * angle.cos()
                        }
                    })
                    .sum();
                (clean + self.noise * standard_normal(rng)) as f32
            })
            .collect()
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

// Box-Muller
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-10);
    let u2: f64 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
