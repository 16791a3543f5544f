use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::error::{TrackerError, TrackerResult};
use crate::store::Dated;

/// Menstrual flow recorded for a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
  Light,
  #[default]
  Medium,
  Heavy,
}

impl Flow {
  pub fn as_str(&self) -> &'static str {
    match self {
      Flow::Light => "light",
      Flow::Medium => "medium",
      Flow::Heavy => "heavy",
    }
  }
}

impl std::fmt::Display for Flow {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Flow {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "light" => Ok(Self::Light),
      "medium" => Ok(Self::Medium),
      "heavy" => Ok(Self::Heavy),
      _ => Err(format!("Unknown flow: {}", s)),
    }
  }
}

/// One menstrual cycle, from onset to (optionally) the recorded end of bleeding.
///
/// A cycle without `end_date` is ongoing and is left out of length statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleEntry {
  pub id: Uuid,
  pub start_date: NaiveDate,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub end_date: Option<NaiveDate>,
  #[serde(default)]
  pub flow: Flow,
  #[serde(default)]
  pub symptoms: BTreeSet<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
}

impl CycleEntry {
  /// Start recording a new (ongoing) cycle
  pub fn new(start_date: NaiveDate, flow: Flow) -> Self {
    Self {
      id: Uuid::new_v4(),
      start_date,
      end_date: None,
      flow,
      symptoms: BTreeSet::new(),
      notes: None,
    }
  }

  pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
    self.end_date = Some(end_date);
    self
  }

  pub fn with_symptoms<I, S>(mut self, symptoms: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.symptoms = symptoms.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
    self.notes = Some(notes.into());
    self
  }

  /// Both start and end recorded
  pub fn is_completed(&self) -> bool {
    self.end_date.is_some()
  }

  /// Bleeding days, inclusive of both ends (None while ongoing)
  pub fn period_length_days(&self) -> Option<i64> {
    self.end_date.map(|end| (end - self.start_date).num_days() + 1)
  }

  /// Reject dates after `today` and an end before the start
  pub fn validate(&self, today: NaiveDate) -> TrackerResult<()> {
    if self.start_date > today {
      return Err(TrackerError::InvalidDate(format!(
        "cycle start {} is in the future",
        self.start_date
      )));
    }

    if let Some(end) = self.end_date {
      if end < self.start_date {
        return Err(TrackerError::InvalidRange(format!(
          "cycle end {} is before start {}",
          end, self.start_date
        )));
      }
      if end > today {
        return Err(TrackerError::InvalidDate(format!(
          "cycle end {} is in the future",
          end
        )));
      }
    }

    Ok(())
  }
}

impl Dated for CycleEntry {
  fn record_date(&self) -> NaiveDate {
    self.start_date
  }
}
