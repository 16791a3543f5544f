use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{TrackerError, TrackerResult};
use crate::store::Dated;

/// Lowest accepted value for mood, energy, sleep and symptom intensity
pub const MIN_SCORE: u8 = 1;
/// Highest accepted value for mood, energy, sleep and symptom intensity
pub const MAX_SCORE: u8 = 5;

/// How long a symptom lasted that day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymptomDuration {
  Short,
  #[default]
  Medium,
  Long,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomDetail {
  pub intensity: u8,
  #[serde(default)]
  pub duration: SymptomDuration,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
}

impl SymptomDetail {
  pub fn new(intensity: u8, duration: SymptomDuration) -> Self {
    Self {
      intensity,
      duration,
      notes: None,
    }
  }
}

/// One calendar day's snapshot. `date` is the unique key of the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomEntry {
  pub date: NaiveDate,
  #[serde(default)]
  pub symptoms: BTreeMap<String, SymptomDetail>,
  pub mood: u8,
  pub energy: u8,
  pub sleep: u8,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub general_notes: Option<String>,
}

impl SymptomEntry {
  pub fn new(date: NaiveDate, mood: u8, energy: u8, sleep: u8) -> Self {
    Self {
      date,
      symptoms: BTreeMap::new(),
      mood,
      energy,
      sleep,
      general_notes: None,
    }
  }

  pub fn with_symptom(mut self, key: impl Into<String>, detail: SymptomDetail) -> Self {
    self.symptoms.insert(key.into(), detail);
    self
  }

  pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
    self.general_notes = Some(notes.into());
    self
  }

  /// Reject future dates and scores outside 1-5
  pub fn validate(&self, today: NaiveDate) -> TrackerResult<()> {
    if self.date > today {
      return Err(TrackerError::InvalidDate(format!(
        "symptom entry date {} is in the future",
        self.date
      )));
    }

    check_score("mood", self.mood)?;
    check_score("energy", self.energy)?;
    check_score("sleep", self.sleep)?;
    for (key, detail) in &self.symptoms {
      check_score(&format!("{} intensity", key), detail.intensity)?;
    }

    Ok(())
  }
}

fn check_score(field: &str, value: u8) -> TrackerResult<()> {
  if (MIN_SCORE..=MAX_SCORE).contains(&value) {
    Ok(())
  } else {
    Err(TrackerError::InvalidScore(format!(
      "{} must be between {} and {}, got {}",
      field, MIN_SCORE, MAX_SCORE, value
    )))
  }
}

impl Dated for SymptomEntry {
  fn record_date(&self) -> NaiveDate {
    self.date
  }
}
