//! Toy simulations shown on the AI Economics page.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ============================================================================
// Forecast Chart
// ============================================================================

/// Slider bounds and step for the GDP growth rate, in percent.
pub const RATE_MIN: f64 = 0.0;
pub const RATE_MAX: f64 = 10.0;
pub const RATE_STEP: f64 = 0.5;
pub const RATE_DEFAULT: f64 = 2.5;

/// Points per forecast series (one per month).
pub const FORECAST_MONTHS: usize = 12;

/// Slider-driven growth forecast: the rate plus per-month noise in `[-1, 1)`.
#[derive(Debug, Clone)]
pub struct ForecastModel {
    rate: f64,
    series: Vec<f64>,
    rng: StdRng,
}

impl ForecastModel {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic model for tests.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut model = Self {
            rate: RATE_DEFAULT,
            series: Vec::with_capacity(FORECAST_MONTHS),
            rng,
        };
        model.regenerate();
        model
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn series(&self) -> &[f64] {
        &self.series
    }

    /// Set the slider value, snapping to the step grid and clamping to range.
    /// Always redraws the series.
    pub fn set_rate(&mut self, rate: f64) {
        let rate = if rate.is_finite() { rate } else { RATE_DEFAULT };
        let snapped = (rate / RATE_STEP).round() * RATE_STEP;
        self.rate = snapped.clamp(RATE_MIN, RATE_MAX);
        self.regenerate();
    }

    pub fn increase(&mut self) {
        self.set_rate(self.rate + RATE_STEP);
    }

    pub fn decrease(&mut self) {
        self.set_rate(self.rate - RATE_STEP);
    }

    /// Chart caption, e.g. `GDP Growth Rate: 2.5%`.
    pub fn label(&self) -> String {
        format!("GDP Growth Rate: {}%", self.rate)
    }

    /// `(month, value)` pairs ready for a chart dataset.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.series
            .iter()
            .enumerate()
            .map(|(i, y)| (i as f64, *y))
            .collect()
    }

    fn regenerate(&mut self) {
        let rate = self.rate;
        let rng = &mut self.rng;
        self.series = (0..FORECAST_MONTHS)
            .map(|_| rate + rng.gen_range(-1.0..1.0))
            .collect();
    }
}

impl Default for ForecastModel {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Behavioral Prediction
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Safe,
    Risky,
}

impl Choice {
    pub fn label(self) -> &'static str {
        match self {
            Choice::Safe => "Safe Investment",
            Choice::Risky => "Risky Investment",
        }
    }
}

const DEFAULT_PREDICTION: &str = "AI Prediction: Based on behavioral patterns, 68% of users \
typically choose the safe investment option due to loss aversion bias.";

const SAFE_ANALYSIS: &str = "AI Analysis: You chose the safe investment. This aligns with loss \
aversion bias, where people prefer avoiding losses over acquiring gains. The AI model predicted \
this choice with 68% confidence based on behavioral patterns.";

const RISKY_ANALYSIS: &str = "AI Analysis: You chose the risky investment. This suggests \
risk-seeking behavior, which is less common (32% of users). The AI model identifies this as \
potentially influenced by optimism bias and overconfidence.";

/// Two-choice investment game with a canned prediction for each outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BehavioralGame {
    choice: Option<Choice>,
}

impl BehavioralGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a choice, replacing any previous one.
    pub fn choose(&mut self, choice: Choice) {
        self.choice = Some(choice);
    }

    pub fn choice(&self) -> Option<Choice> {
        self.choice
    }

    pub fn prediction(&self) -> &'static str {
        match self.choice {
            None => DEFAULT_PREDICTION,
            Some(Choice::Safe) => SAFE_ANALYSIS,
            Some(Choice::Risky) => RISKY_ANALYSIS,
        }
    }
}
