use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Entropy consumed by the scoring policies.
pub trait NoiseSource {
    /// Draw uniformly from the closed interval `[low, high]`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
    /// Draw from a normal distribution.
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64;
}

/// Noise backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomNoise<R> {
    rng: R,
}

impl<R: Rng> RandomNoise<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomNoise<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_rng(&mut rand::rng()))
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NoiseSource for RandomNoise<R> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low < high {
            self.rng.random_range(low..=high)
        } else {
            low
        }
    }

    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev) {
            Ok(normal) => normal.sample(&mut self.rng),
            Err(_) => mean,
        }
    }
}

/// Returns the centre of every distribution, turning scores into plain arithmetic.
#[derive(Debug, Clone, Copy, Default)]
pub struct Noiseless;

impl NoiseSource for Noiseless {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (low + high) / 2.0
    }

    fn gaussian(&mut self, mean: f64, _std_dev: f64) -> f64 {
        mean
    }
}

/// How each comparison obtains its noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseMode {
    #[default]
    Random,
    /// Every comparison restarts from the same seed, so identical requests replay.
    Seeded(u64),
    Disabled,
}

impl NoiseMode {
    /// A fresh source per comparison; nothing is shared between requests.
    pub fn source(&self) -> Box<dyn NoiseSource + Send> {
        match self {
            NoiseMode::Random => Box::new(RandomNoise::from_entropy()),
            NoiseMode::Seeded(seed) => Box::new(RandomNoise::seeded(*seed)),
            NoiseMode::Disabled => Box::new(Noiseless),
        }
    }

    pub fn label(&self) -> String {
        match self {
            NoiseMode::Random => "random".to_string(),
            NoiseMode::Seeded(seed) => format!("seed {seed}"),
            NoiseMode::Disabled => "disabled".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised noise mode '{0}'")]
pub struct ParseNoiseModeError(pub String);

impl FromStr for NoiseMode {
    type Err = ParseNoiseModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "random" | "on" => Ok(NoiseMode::Random),
            "disabled" | "off" | "none" => Ok(NoiseMode::Disabled),
            other => other
                .strip_prefix("seed:")
                .unwrap_or(other)
                .parse::<u64>()
                .map(NoiseMode::Seeded)
                .map_err(|_| ParseNoiseModeError(value.to_string())),
        }
    }
}
