//! Reproducible illustrative series derived from the monthly late rate.
//!
//! Neither series is measured anywhere. They exist so a dashboard can show
//! how a passenger sentiment score and a booking volume *might* move against
//! punctuality. Both are driven by a seeded [`SeriesRng`], so a given input
//! and seed always produce the same numbers.

use crate::monthly::MonthlyMetric;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Dirichlet, Distribution, Normal};
use std::fmt;

/// Default seed used when no explicit seed is provided.
pub const DEFAULT_SEED: u64 = 42;

/// Deterministic RNG handed to the generator.
pub struct SeriesRng(pub ChaCha8Rng);

impl Default for SeriesRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl SeriesRng {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Shape of the synthetic series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesParams {
    /// Sentiment when nothing is late
    pub sentiment_base: f64,
    /// Sentiment lost at the worst month
    pub sentiment_slope: f64,
    /// A uniform draw above this carries the previous month's sentiment forward
    pub lag_threshold: f64,
    pub sentiment_noise: f64,
    pub sentiment_bounds: (f64, f64),
    /// Bookings when nothing is late
    pub bookings_base: f64,
    /// Fraction of bookings lost at the worst month
    pub bookings_slope: f64,
    /// Concentration of the weights blending months i, i-1 and i-2
    pub blend_alpha: [f64; 3],
    pub bookings_noise: f64,
    pub bookings_bounds: (i64, i64),
}

impl Default for SeriesParams {
    fn default() -> Self {
        SeriesParams {
            sentiment_base: 0.35,
            sentiment_slope: 0.3,
            lag_threshold: 0.6,
            sentiment_noise: 0.15,
            sentiment_bounds: (-1.0, 1.0),
            bookings_base: 20_000.0,
            bookings_slope: 0.4,
            blend_alpha: [3.0, 4.0, 3.0],
            bookings_noise: 2_000.0,
            bookings_bounds: (5_000, 30_000),
        }
    }
}

#[derive(Debug)]
pub enum SeriesError {
    InvalidNoise(String),
    InvalidBlend(String),
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesError::InvalidNoise(e) => write!(f, "Invalid noise parameter: {e}"),
            SeriesError::InvalidBlend(e) => write!(f, "Invalid blend concentration: {e}"),
        }
    }
}

impl std::error::Error for SeriesError {}

/// Late rates scaled into [0, 1] by the largest one (or by 1 when all are 0).
pub fn normalized_late_rates(metrics: &[MonthlyMetric]) -> Vec<f64> {
    let max = metrics
        .iter()
        .map(|m| m.late_rate)
        .fold(0.0_f64, f64::max);
    let divisor = if max > 0.0 { max } else { 1.0 };
    metrics.iter().map(|m| m.late_rate / divisor).collect()
}

pub struct SyntheticGenerator {
    rng: SeriesRng,
    params: SeriesParams,
    sentiment_noise: Normal<f64>,
    bookings_noise: Normal<f64>,
    blend: Dirichlet<f64>,
}

impl SyntheticGenerator {
    pub fn new(rng: SeriesRng, params: SeriesParams) -> Result<Self, SeriesError> {
        // Normal::new only rejects a non-finite std dev.
        for (series, std_dev) in [
            ("sentiment", params.sentiment_noise),
            ("bookings", params.bookings_noise),
        ] {
            if !(std_dev >= 0.0) {
                return Err(SeriesError::InvalidNoise(format!(
                    "{series} std dev must be non-negative, got {std_dev}"
                )));
            }
        }
        let sentiment_noise = Normal::new(0.0, params.sentiment_noise)
            .map_err(|e| SeriesError::InvalidNoise(e.to_string()))?;
        let bookings_noise = Normal::new(0.0, params.bookings_noise)
            .map_err(|e| SeriesError::InvalidNoise(e.to_string()))?;
        let blend = Dirichlet::new(&params.blend_alpha)
            .map_err(|e| SeriesError::InvalidBlend(e.to_string()))?;
        Ok(SyntheticGenerator {
            rng,
            params,
            sentiment_noise,
            bookings_noise,
            blend,
        })
    }

    /// Generator with the default shape and the given seed.
    pub fn with_seed(seed: u64) -> Result<Self, SeriesError> {
        SyntheticGenerator::new(SeriesRng::from_seed_u64(seed), SeriesParams::default())
    }

    /// Sentiment before lag and noise: `base - slope * late_norm`.
    pub fn sentiment_baseline(&self, metrics: &[MonthlyMetric]) -> Vec<f64> {
        normalized_late_rates(metrics)
            .into_iter()
            .map(|norm| self.params.sentiment_base - self.params.sentiment_slope * norm)
            .collect()
    }

    /// Bookings before blending and noise: `base * (1 - slope * late_norm)`.
    pub fn bookings_baseline(&self, metrics: &[MonthlyMetric]) -> Vec<f64> {
        normalized_late_rates(metrics)
            .into_iter()
            .map(|norm| self.params.bookings_base * (1.0 - self.params.bookings_slope * norm))
            .collect()
    }

    /// Fill `sentiment_score` and `bookings` on monthly metrics.
    ///
    /// Draws happen in a fixed order: one lag draw per month, sentiment
    /// noise, blend weights for months 2.., then bookings noise. Empty input
    /// comes back untouched without consuming any randomness.
    pub fn apply(&mut self, mut metrics: Vec<MonthlyMetric>) -> Vec<MonthlyMetric> {
        if metrics.is_empty() {
            return metrics;
        }
        let sentiment = self.sentiment_series(&metrics);
        let bookings = self.bookings_series(&metrics);
        for ((metric, score), booked) in metrics.iter_mut().zip(sentiment).zip(bookings) {
            metric.sentiment_score = score;
            metric.bookings = booked;
        }
        metrics
    }

    fn sentiment_series(&mut self, metrics: &[MonthlyMetric]) -> Vec<f64> {
        let raw = self.sentiment_baseline(metrics);
        let rng = &mut self.rng.0;

        let lagged: Vec<f64> = (0..raw.len())
            .map(|i| {
                let draw: f64 = rng.gen();
                if i > 0 && draw > self.params.lag_threshold {
                    raw[i - 1]
                } else {
                    raw[i]
                }
            })
            .collect();

        let (low, high) = self.params.sentiment_bounds;
        lagged
            .into_iter()
            .map(|value| (value + self.sentiment_noise.sample(rng)).clamp(low, high))
            .collect()
    }

    fn bookings_series(&mut self, metrics: &[MonthlyMetric]) -> Vec<u32> {
        let raw = self.bookings_baseline(metrics);
        let rng = &mut self.rng.0;

        let mut blended = raw.clone();
        for i in 2..raw.len() {
            let w = self.blend.sample(rng);
            blended[i] = w[0] * raw[i] + w[1] * raw[i - 1] + w[2] * raw[i - 2];
        }

        let (low, high) = self.params.bookings_bounds;
        blended
            .into_iter()
            .map(|value| {
                let noisy = value + self.bookings_noise.sample(rng);
                (noisy as i64).clamp(low, high).max(0) as u32
            })
            .collect()
    }
}
