//! Deterministic cycle forecasting
//!
//! Everything here is a pure projection of the recorded cycles. Results are
//! recomputed on every request and never stored.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::CycleEntry;

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

/// Completed cycles needed before any forecast is made
pub const MIN_COMPLETED_CYCLES: usize = 2;

/// Ovulation is modelled this many days before the next period
pub const LUTEAL_PHASE_DAYS: i64 = 14;

pub const MAX_CONFIDENCE: f64 = 95.0;
pub const MIN_CONFIDENCE: f64 = 60.0;

/// Confidence points lost per day² of cycle-length variance
const VARIANCE_PENALTY: f64 = 2.0;

/// Days either side of ovulation counted as the fertile window
pub const FERTILE_WINDOW_RADIUS_DAYS: i64 = 2;

/// ---------------------------------------------------------------------------
/// Tier 1: Next-Period Forecast
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclePrediction {
  pub next_period: NaiveDate,

  /// Always `next_period - 14 days`
  pub ovulation: NaiveDate,

  /// Rounded mean of consecutive start-date gaps, in days
  pub cycle_length: i64,

  /// Heuristic consistency score in percent, within 60..=95
  pub confidence: u8,

  /// Completed cycles the forecast was built from
  pub cycles_used: usize,
}

impl CyclePrediction {
  /// Forecast the next period from the completed cycles in `cycles`.
  ///
  /// Returns None with fewer than two completed cycles. Order of the input
  /// does not matter.
  pub fn compute(cycles: &[CycleEntry]) -> Option<Self> {
    let mut completed: Vec<&CycleEntry> = cycles.iter().filter(|c| c.is_completed()).collect();
    if completed.len() < MIN_COMPLETED_CYCLES {
      tracing::trace!(completed = completed.len(), "not enough completed cycles to predict");
      return None;
    }

    completed.sort_by_key(|c| c.start_date);

    let lengths: Vec<i64> = completed
      .windows(2)
      .map(|pair| (pair[1].start_date - pair[0].start_date).num_days())
      .collect();

    let mean = lengths.iter().sum::<i64>() as f64 / lengths.len() as f64;
    let cycle_length = mean.round() as i64;

    let last_start = completed.last()?.start_date;
    let next_period = last_start + Duration::days(cycle_length);
    let ovulation = next_period - Duration::days(LUTEAL_PHASE_DAYS);

    // Spread is measured against the rounded average, as shown to the user
    let variance = lengths
      .iter()
      .map(|len| ((len - cycle_length) as f64).powi(2))
      .sum::<f64>()
      / lengths.len() as f64;

    Some(Self {
      next_period,
      ovulation,
      cycle_length,
      confidence: confidence_from_variance(variance),
      cycles_used: completed.len(),
    })
  }
}

/// 95 minus twice the variance, held inside 60..=95
pub fn confidence_from_variance(variance: f64) -> u8 {
  (MAX_CONFIDENCE - VARIANCE_PENALTY * variance)
    .clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
    .round() as u8
}

/// ---------------------------------------------------------------------------
/// Tier 2: Per-Cycle History
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRecord {
  /// 1-based, oldest first
  pub cycle_number: usize,
  pub start_date: NaiveDate,
  /// Bleeding days, inclusive (None while ongoing)
  pub period_length: Option<i64>,
  /// Days until the following cycle started (None for the latest)
  pub cycle_length: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleHistory {
  pub cycles: Vec<CycleRecord>,
  pub average_period_length: Option<f64>,
  pub average_cycle_length: Option<f64>,
}

impl CycleHistory {
  /// Period and cycle lengths for every recorded cycle, oldest first
  pub fn compute(cycles: &[CycleEntry]) -> Self {
    let mut ordered: Vec<&CycleEntry> = cycles.iter().collect();
    ordered.sort_by_key(|c| c.start_date);

    let records: Vec<CycleRecord> = ordered
      .iter()
      .enumerate()
      .map(|(i, cycle)| CycleRecord {
        cycle_number: i + 1,
        start_date: cycle.start_date,
        period_length: cycle.period_length_days(),
        cycle_length: ordered
          .get(i + 1)
          .map(|next| (next.start_date - cycle.start_date).num_days()),
      })
      .collect();

    let average_period_length = mean(records.iter().filter_map(|r| r.period_length));
    let average_cycle_length = mean(records.iter().filter_map(|r| r.cycle_length));

    Self {
      cycles: records,
      average_period_length,
      average_cycle_length,
    }
  }
}

fn mean(values: impl Iterator<Item = i64>) -> Option<f64> {
  let (sum, count) = values.fold((0i64, 0usize), |(s, n), v| (s + v, n + 1));
  if count > 0 {
    Some(sum as f64 / count as f64)
  } else {
    None
  }
}

/// ---------------------------------------------------------------------------
/// Tier 3: Where Today Falls in the Cycle
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStatus {
  /// 1 on the day the current cycle started
  pub cycle_day: i64,
  pub next_period: NaiveDate,
  /// Negative once the expected period has passed
  pub days_until_next_period: i64,
  pub is_late: bool,
  pub fertile_window_start: NaiveDate,
  pub fertile_window_end: NaiveDate,
  pub in_fertile_window: bool,
}

impl CycleStatus {
  /// Position of `today` in the current cycle.
  ///
  /// The current cycle is the one with the latest start, ongoing or not. If
  /// it started after the last completed cycle the forecast was built from,
  /// the forecast is re-anchored on that start. None when there are no
  /// cycles or the latest start is after `today`.
  pub fn compute(
    prediction: &CyclePrediction,
    cycles: &[CycleEntry],
    today: NaiveDate,
  ) -> Option<Self> {
    let current_start = cycles.iter().map(|c| c.start_date).max()?;
    if current_start > today {
      return None;
    }

    let last_completed_start = cycles
      .iter()
      .filter(|c| c.is_completed())
      .map(|c| c.start_date)
      .max();

    let next_period = match last_completed_start {
      Some(anchor) if current_start <= anchor => prediction.next_period,
      _ => current_start + Duration::days(prediction.cycle_length),
    };
    let ovulation = next_period - Duration::days(LUTEAL_PHASE_DAYS);
    let fertile_window_start = ovulation - Duration::days(FERTILE_WINDOW_RADIUS_DAYS);
    let fertile_window_end = ovulation + Duration::days(FERTILE_WINDOW_RADIUS_DAYS);

    let days_until_next_period = (next_period - today).num_days();

    Some(Self {
      cycle_day: (today - current_start).num_days() + 1,
      next_period,
      days_until_next_period,
      is_late: days_until_next_period < 0,
      fertile_window_start,
      fertile_window_end,
      in_fertile_window: (fertile_window_start..=fertile_window_end).contains(&today),
    })
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_approx_eq;
  use crate::test_utils::{date, mock_cycle};

  fn three_regular_cycles() -> Vec<CycleEntry> {
    vec![
      mock_cycle("2024-01-01", Some("2024-01-05")),
      mock_cycle("2024-01-29", Some("2024-02-02")),
      mock_cycle("2024-02-26", Some("2024-03-02")),
    ]
  }

  #[test]
  fn test_regular_cycles_full_confidence() {
    let prediction = CyclePrediction::compute(&three_regular_cycles()).unwrap();

    assert_eq!(prediction.cycle_length, 28);
    // 2024 is a leap year: Feb 26 + 28 days lands on Mar 25
    assert_eq!(prediction.next_period, date("2024-03-25"));
    assert_eq!(prediction.ovulation, date("2024-03-11"));
    assert_eq!(prediction.confidence, 95);
    assert_eq!(prediction.cycles_used, 3);
  }

  #[test]
  fn test_irregular_cycles_hit_confidence_floor() {
    let cycles = vec![
      mock_cycle("2024-01-01", Some("2024-01-05")),
      mock_cycle("2024-01-29", Some("2024-02-02")),
      mock_cycle("2024-03-09", Some("2024-03-13")),
    ];

    // Gaps 28 and 40: mean 34, variance 36, 95 - 72 clamps to 60
    let prediction = CyclePrediction::compute(&cycles).unwrap();
    assert_eq!(prediction.cycle_length, 34);
    assert_eq!(prediction.confidence, 60);
    assert_eq!(prediction.next_period, date("2024-04-12"));
    assert_eq!(prediction.ovulation, date("2024-03-29"));
  }

  #[test]
  fn test_leap_day_counts_toward_gap() {
    let cycles = vec![
      mock_cycle("2024-01-01", Some("2024-01-05")),
      mock_cycle("2024-01-29", Some("2024-02-02")),
      mock_cycle("2024-03-10", Some("2024-03-14")),
    ];

    // Gaps 28 and 41: mean 34.5 rounds to 35, variance 42.5
    let prediction = CyclePrediction::compute(&cycles).unwrap();
    assert_eq!(prediction.cycle_length, 35);
    assert_eq!(prediction.confidence, 60);
    assert_eq!(prediction.next_period, date("2024-04-14"));
  }

  #[test]
  fn test_single_completed_cycle_gives_no_prediction() {
    let cycles = vec![
      mock_cycle("2024-01-01", Some("2024-01-05")),
      mock_cycle("2024-01-29", None),
    ];
    assert!(CyclePrediction::compute(&cycles).is_none());
    assert!(CyclePrediction::compute(&[]).is_none());
  }

  #[test]
  fn test_ongoing_cycles_ignored_for_length() {
    let mut cycles = three_regular_cycles();
    cycles.push(mock_cycle("2024-03-20", None));

    let prediction = CyclePrediction::compute(&cycles).unwrap();
    assert_eq!(prediction.cycle_length, 28);
    assert_eq!(prediction.cycles_used, 3);
    assert_eq!(prediction.next_period, date("2024-03-25"));
  }

  #[test]
  fn test_input_order_does_not_matter() {
    let mut cycles = three_regular_cycles();
    cycles.reverse();
    assert_eq!(
      CyclePrediction::compute(&cycles),
      CyclePrediction::compute(&three_regular_cycles())
    );
  }

  #[test]
  fn test_average_rounds_to_nearest_day() {
    // Gaps 28 and 29: mean 28.5 rounds up to 29
    let cycles = vec![
      mock_cycle("2024-01-01", Some("2024-01-05")),
      mock_cycle("2024-01-29", Some("2024-02-02")),
      mock_cycle("2024-02-27", Some("2024-03-02")),
    ];
    let prediction = CyclePrediction::compute(&cycles).unwrap();
    assert_eq!(prediction.cycle_length, 29);
    // Deviations -1 and 0: variance 0.5, 95 - 1 = 94
    assert_eq!(prediction.confidence, 94);
  }

  #[test]
  fn test_prediction_invariants_over_many_histories() {
    let gap_sets: Vec<Vec<i64>> = vec![
      vec![28],
      vec![21, 35],
      vec![30, 30, 30, 30],
      vec![25, 27, 31, 26, 29],
      vec![18, 45, 22, 60],
      vec![0, 28],
    ];

    for gaps in gap_sets {
      let mut start = date("2023-01-01");
      let mut cycles = vec![CycleEntry::new(start, crate::models::Flow::Medium)
        .with_end_date(start + Duration::days(4))];
      for gap in &gaps {
        start = start + Duration::days(*gap);
        cycles.push(
          CycleEntry::new(start, crate::models::Flow::Medium).with_end_date(start + Duration::days(4)),
        );
      }

      let prediction = CyclePrediction::compute(&cycles).unwrap();
      let expected_len = (gaps.iter().sum::<i64>() as f64 / gaps.len() as f64).round() as i64;

      assert_eq!(prediction.cycle_length, expected_len, "gaps {:?}", gaps);
      assert!((60..=95).contains(&prediction.confidence), "gaps {:?}", gaps);
      assert_eq!(prediction.ovulation, prediction.next_period - Duration::days(14));
      assert_eq!(prediction.next_period, start + Duration::days(expected_len));
    }
  }

  #[test]
  fn test_confidence_from_variance_bounds() {
    assert_eq!(confidence_from_variance(0.0), 95);
    assert_eq!(confidence_from_variance(2.25), 91); // 90.5 rounds up
    assert_eq!(confidence_from_variance(17.5), 60);
    assert_eq!(confidence_from_variance(1000.0), 60);
  }

  #[test]
  fn test_cycle_history_lengths_and_averages() {
    let mut cycles = three_regular_cycles();
    cycles.push(mock_cycle("2024-03-25", None));

    let history = CycleHistory::compute(&cycles);
    assert_eq!(history.cycles.len(), 4);

    let first = &history.cycles[0];
    assert_eq!(first.cycle_number, 1);
    assert_eq!(first.start_date, date("2024-01-01"));
    assert_eq!(first.period_length, Some(5));
    assert_eq!(first.cycle_length, Some(28));

    let latest = &history.cycles[3];
    assert_eq!(latest.period_length, None);
    assert_eq!(latest.cycle_length, None);

    // Feb 26 - Mar 2 spans the leap day: six bleeding days
    assert_eq!(history.cycles[2].period_length, Some(6));
    assert_approx_eq!(history.average_period_length.unwrap(), 16.0 / 3.0, 1e-9);
    assert_eq!(history.average_cycle_length, Some(28.0));
  }

  #[test]
  fn test_cycle_history_empty() {
    let history = CycleHistory::compute(&[]);
    assert!(history.cycles.is_empty());
    assert_eq!(history.average_cycle_length, None);
    assert_eq!(history.average_period_length, None);
  }

  #[test]
  fn test_status_mid_cycle() {
    let cycles = three_regular_cycles();
    let prediction = CyclePrediction::compute(&cycles).unwrap();

    let status = CycleStatus::compute(&prediction, &cycles, date("2024-03-10")).unwrap();
    assert_eq!(status.cycle_day, 14);
    assert_eq!(status.next_period, date("2024-03-25"));
    assert_eq!(status.days_until_next_period, 15);
    assert!(!status.is_late);
    assert_eq!(status.fertile_window_start, date("2024-03-09"));
    assert_eq!(status.fertile_window_end, date("2024-03-13"));
    assert!(status.in_fertile_window);
  }

  #[test]
  fn test_status_late_period() {
    let cycles = three_regular_cycles();
    let prediction = CyclePrediction::compute(&cycles).unwrap();

    let status = CycleStatus::compute(&prediction, &cycles, date("2024-03-28")).unwrap();
    assert_eq!(status.days_until_next_period, -3);
    assert!(status.is_late);
    assert!(!status.in_fertile_window);
  }

  #[test]
  fn test_status_reanchors_on_new_ongoing_cycle() {
    let mut cycles = three_regular_cycles();
    cycles.push(mock_cycle("2024-03-26", None));
    let prediction = CyclePrediction::compute(&cycles).unwrap();

    let status = CycleStatus::compute(&prediction, &cycles, date("2024-03-27")).unwrap();
    assert_eq!(status.cycle_day, 2);
    assert_eq!(status.next_period, date("2024-04-23"));
    assert!(!status.is_late);
  }

  #[test]
  fn test_status_reanchors_on_early_ongoing_cycle() {
    let mut cycles = three_regular_cycles();
    cycles.push(mock_cycle("2024-03-20", None));
    let prediction = CyclePrediction::compute(&cycles).unwrap();
    assert_eq!(prediction.next_period, date("2024-03-25"));

    let status = CycleStatus::compute(&prediction, &cycles, date("2024-03-22")).unwrap();
    assert_eq!(status.cycle_day, 3);
    assert_eq!(status.next_period, date("2024-04-17"));
    assert_eq!(status.days_until_next_period, 26);
    assert_eq!(status.fertile_window_start, date("2024-04-01"));
    assert_eq!(status.fertile_window_end, date("2024-04-05"));
    assert!(!status.in_fertile_window);
  }
}
