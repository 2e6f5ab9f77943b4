//! Campus-wide summary reduced from per-area aggregates.

use serde::{Deserialize, Serialize};

use crate::{heat::round_to, reading::AreaAggregate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRef {
  pub area_id:    String,
  pub name:       String,
  pub avg_temp_f: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampusSummary {
  pub window_minutes:   i64,
  pub n_readings_total: i64,
  /// Reading-weighted mean of the per-area averages.
  pub avg_temp_f:       Option<f64>,
  pub hottest_area:     Option<AreaRef>,
  pub coolest_area:     Option<AreaRef>,
  pub timestamp_ms:     Option<i64>,
}

/// Reduce `areas` to a campus summary. Areas without readings in the window
/// are ignored; ties for hottest/coolest go to the first area seen.
pub fn campus_summary(areas: &[AreaAggregate], window_minutes: i64) -> CampusSummary {
  let with_data: Vec<(&AreaAggregate, f64)> = areas
    .iter()
    .filter(|a| a.has_data())
    .filter_map(|a| a.avg_temp_f.map(|t| (a, t)))
    .collect();

  let Some(&first) = with_data.first() else {
    return CampusSummary {
      window_minutes,
      n_readings_total: 0,
      avg_temp_f: None,
      hottest_area: None,
      coolest_area: None,
      timestamp_ms: None,
    };
  };

  let n_total: i64 = with_data.iter().map(|(a, _)| a.n_readings).sum();
  let weighted: f64 = with_data
    .iter()
    .map(|(a, t)| t * a.n_readings as f64)
    .sum();
  let avg_temp_f = weighted / n_total.max(1) as f64;

  let (mut hottest, mut coolest) = (first, first);
  for &(area, t) in &with_data[1..] {
    if t > hottest.1 {
      hottest = (area, t);
    }
    if t < coolest.1 {
      coolest = (area, t);
    }
  }

  let area_ref = |(a, t): (&AreaAggregate, f64)| AreaRef {
    area_id:    a.area_id.clone(),
    name:       a.name.clone(),
    avg_temp_f: t,
  };

  CampusSummary {
    window_minutes,
    n_readings_total: n_total,
    avg_temp_f: Some(round_to(avg_temp_f, 2)),
    hottest_area: Some(area_ref(hottest)),
    coolest_area: Some(area_ref(coolest)),
    timestamp_ms: with_data.iter().filter_map(|(a, _)| a.timestamp_ms).max(),
  }
}
