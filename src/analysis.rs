//! Deterministic analysis layer for daily symptom logs
//!
//! Turns the raw day-by-day entries into frequency, intensity and
//! short-term wellbeing trend figures. The recommendation rules read these
//! pre-computed numbers instead of looking at raw entries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::SymptomEntry;

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

/// How many symptom keys are reported as most common
pub const MOST_COMMON_LIMIT: usize = 5;

/// Entries per trend window (recent vs. the window before it)
pub const TREND_WINDOW: usize = 7;

/// ---------------------------------------------------------------------------
/// Symptom Statistics
/// ---------------------------------------------------------------------------

/// Occurrence count and mean intensity of a single symptom key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomFrequency {
  pub key: String,
  /// Days on which the symptom was recorded
  pub count: usize,
  pub average_intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomStats {
  /// Up to five keys, most frequent first
  pub most_common: Vec<String>,

  /// Details for the keys in `most_common`, same order
  pub frequencies: Vec<SymptomFrequency>,

  /// Mean over every recorded symptom intensity (flattened across days)
  pub average_intensity: f64,

  /// Mean mood of the last 7 entries minus mean of the 7 before
  pub mood_trend: f64,

  pub energy_trend: f64,

  pub sleep_trend: f64,

  pub entries_analyzed: usize,
}

impl SymptomStats {
  /// Compute statistics over all entries. None for an empty log.
  pub fn compute(entries: &[SymptomEntry]) -> Option<Self> {
    if entries.is_empty() {
      return None;
    }

    // Trend windows are defined over most-recent-first order
    let mut ordered: Vec<&SymptomEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));

    let frequencies = Self::compute_frequencies(&ordered);
    let most_common = frequencies.iter().map(|f| f.key.clone()).collect();

    let stats = Self {
      most_common,
      frequencies,
      average_intensity: Self::compute_average_intensity(&ordered),
      mood_trend: Self::compute_trend(&ordered, |e| e.mood),
      energy_trend: Self::compute_trend(&ordered, |e| e.energy),
      sleep_trend: Self::compute_trend(&ordered, |e| e.sleep),
      entries_analyzed: ordered.len(),
    };

    tracing::trace!(
      entries = stats.entries_analyzed,
      mood_trend = stats.mood_trend,
      "symptom stats computed"
    );
    Some(stats)
  }

  /// Top keys by number of days recorded. Ties keep first-seen order
  /// (newest entry first, keys alphabetical within a day).
  fn compute_frequencies(entries: &[&SymptomEntry]) -> Vec<SymptomFrequency> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, (usize, u32)> = HashMap::new();

    for entry in entries {
      for (key, detail) in &entry.symptoms {
        let slot = totals.entry(key.as_str()).or_insert_with(|| {
          order.push(key.as_str());
          (0, 0)
        });
        slot.0 += 1;
        slot.1 += detail.intensity as u32;
      }
    }

    let mut frequencies: Vec<SymptomFrequency> = order
      .into_iter()
      .map(|key| {
        let (count, intensity_sum) = totals[key];
        SymptomFrequency {
          key: key.to_string(),
          count,
          average_intensity: intensity_sum as f64 / count as f64,
        }
      })
      .collect();

    // Stable sort keeps first-seen order among equal counts
    frequencies.sort_by(|a, b| b.count.cmp(&a.count));
    frequencies.truncate(MOST_COMMON_LIMIT);
    frequencies
  }

  fn compute_average_intensity(entries: &[&SymptomEntry]) -> f64 {
    let (sum, count) = entries
      .iter()
      .flat_map(|e| e.symptoms.values())
      .fold((0u32, 0usize), |(s, n), d| (s + d.intensity as u32, n + 1));

    if count > 0 {
      sum as f64 / count as f64
    } else {
      0.0
    }
  }

  /// Recent window mean minus previous window mean. With no previous window
  /// the baseline is the recent mean itself, so the trend is 0.
  fn compute_trend(entries: &[&SymptomEntry], metric: impl Fn(&SymptomEntry) -> u8) -> f64 {
    let recent: Vec<f64> = entries
      .iter()
      .take(TREND_WINDOW)
      .map(|e| metric(*e) as f64)
      .collect();
    let previous: Vec<f64> = entries
      .iter()
      .skip(TREND_WINDOW)
      .take(TREND_WINDOW)
      .map(|e| metric(*e) as f64)
      .collect();

    let recent_avg = average(&recent).unwrap_or(0.0);
    let previous_avg = average(&previous).unwrap_or(recent_avg);

    recent_avg - previous_avg
  }
}

fn average(values: &[f64]) -> Option<f64> {
  if values.is_empty() {
    None
  } else {
    Some(values.iter().sum::<f64>() / values.len() as f64)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
