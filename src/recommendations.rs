//! Threshold rules that turn forecasts and symptom statistics into advisories

use serde::{Deserialize, Serialize};

use crate::analysis::SymptomStats;
use crate::prediction::CyclePrediction;

/// ---------------------------------------------------------------------------
/// Thresholds
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryThresholds {
  pub short_cycle_days: i64, // < 21 days
  pub long_cycle_days: i64, // > 35 days
  pub low_confidence: u8, // < 70%
  pub high_intensity: f64, // > 3.5 on the 1-5 scale
  pub declining_trend: f64, // < -0.5 points week over week
}

impl Default for AdvisoryThresholds {
  fn default() -> Self {
    Self {
      short_cycle_days: 21,
      long_cycle_days: 35,
      low_confidence: 70,
      high_intensity: 3.5,
      declining_trend: -0.5,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Advisory Flags
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
  ShortCycle,
  LongCycle,
  IrregularCycle,
  HighSymptomBurden,
  DecliningWellbeing,
  DecliningSleep,
}

impl AdvisoryKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      AdvisoryKind::ShortCycle => "short_cycle",
      AdvisoryKind::LongCycle => "long_cycle",
      AdvisoryKind::IrregularCycle => "irregular_cycle",
      AdvisoryKind::HighSymptomBurden => "high_symptom_burden",
      AdvisoryKind::DecliningWellbeing => "declining_wellbeing",
      AdvisoryKind::DecliningSleep => "declining_sleep",
    }
  }

  pub fn message(&self) -> &'static str {
    match self {
      AdvisoryKind::ShortCycle => {
        "Your average cycle is shorter than 21 days. Consider discussing this with a healthcare provider."
      }
      AdvisoryKind::LongCycle => {
        "Your average cycle is longer than 35 days. Consider discussing this with a healthcare provider."
      }
      AdvisoryKind::IrregularCycle => {
        "Your cycle lengths vary quite a bit, so predictions are less certain. Keep logging to improve accuracy."
      }
      AdvisoryKind::HighSymptomBurden => {
        "Your symptoms have been fairly intense. Rest, heat and gentle movement may help; seek care if they persist."
      }
      AdvisoryKind::DecliningWellbeing => {
        "Your mood or energy has dipped compared with last week. Plan some rest and activities you enjoy."
      }
      AdvisoryKind::DecliningSleep => {
        "Your sleep quality has dropped compared with last week. A regular bedtime routine may help."
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
  pub kind: AdvisoryKind,
  pub message: String,
}

impl From<AdvisoryKind> for Advisory {
  fn from(kind: AdvisoryKind) -> Self {
    Self {
      kind,
      message: kind.message().to_string(),
    }
  }
}

/// Which rules fired
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryFlags {
  /// Average cycle shorter than 21 days
  pub short_cycle: bool,

  /// Average cycle longer than 35 days
  pub long_cycle: bool,

  /// Forecast confidence below 70%
  pub irregular_cycle: bool,

  /// Mean symptom intensity above 3.5
  pub high_symptom_burden: bool,

  /// Mood or energy trend below -0.5
  pub declining_wellbeing: bool,

  /// Sleep trend below -0.5
  pub declining_sleep: bool,
}

impl AdvisoryFlags {
  /// Evaluate every rule; rules over a missing input stay off
  pub fn compute(
    prediction: Option<&CyclePrediction>,
    stats: Option<&SymptomStats>,
    thresholds: &AdvisoryThresholds,
  ) -> Self {
    let mut flags = AdvisoryFlags::default();

    if let Some(p) = prediction {
      flags.short_cycle = p.cycle_length < thresholds.short_cycle_days;
      flags.long_cycle = p.cycle_length > thresholds.long_cycle_days;
      flags.irregular_cycle = p.confidence < thresholds.low_confidence;
    }

    if let Some(s) = stats {
      flags.high_symptom_burden = s.average_intensity > thresholds.high_intensity;
      flags.declining_wellbeing =
        s.mood_trend < thresholds.declining_trend || s.energy_trend < thresholds.declining_trend;
      flags.declining_sleep = s.sleep_trend < thresholds.declining_trend;
    }

    flags
  }

  /// Fired rules in their fixed evaluation order
  pub fn to_advisories(&self) -> Vec<Advisory> {
    [
      (self.short_cycle, AdvisoryKind::ShortCycle),
      (self.long_cycle, AdvisoryKind::LongCycle),
      (self.irregular_cycle, AdvisoryKind::IrregularCycle),
      (self.high_symptom_burden, AdvisoryKind::HighSymptomBurden),
      (self.declining_wellbeing, AdvisoryKind::DecliningWellbeing),
      (self.declining_sleep, AdvisoryKind::DecliningSleep),
    ]
    .into_iter()
    .filter(|(fired, _)| *fired)
    .map(|(_, kind)| Advisory::from(kind))
    .collect()
  }
}

/// All advisories for the given forecast and statistics, default thresholds
pub fn evaluate(
  prediction: Option<&CyclePrediction>,
  stats: Option<&SymptomStats>,
) -> Vec<Advisory> {
  AdvisoryFlags::compute(prediction, stats, &AdvisoryThresholds::default()).to_advisories()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
