//! Heat index and unit arithmetic.

/// Heat index in °F via the Rothfusz regression, rounded to the nearest
/// whole degree (ties to even).
///
/// `temp_f` is in °F and `rh` is relative humidity in percent. No range
/// adjustments are applied outside the regression's intended domain.
pub fn heat_index(temp_f: f64, rh: f64) -> f64 {
  let t = temp_f;
  let h = rh;
  let hi = -42.379
    + 2.049_015_23 * t
    + 10.143_331_27 * h
    - 0.224_755_41 * t * h
    - 6.837_83e-3 * t * t
    - 5.481_717e-2 * h * h
    + 1.228_74e-3 * t * t * h
    + 8.5282e-4 * t * h * h
    - 1.99e-6 * t * t * h * h;
  hi.round_ties_even()
}

pub fn c_to_f(c: f64) -> f64 { c * 9.0 / 5.0 + 32.0 }

/// Round to `places` decimal places.
pub fn round_to(x: f64, places: i32) -> f64 {
  let scale = 10f64.powi(places);
  (x * scale).round() / scale
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn heat_index_matches_nws_table() {
    assert_eq!(heat_index(90.0, 50.0), 95.0);
    assert_eq!(heat_index(100.0, 40.0), 109.0);
  }

  #[test]
  fn heat_index_is_whole_degrees() {
    let hi = heat_index(83.3, 61.7);
    assert_eq!(hi, hi.trunc());
  }

  #[test]
  fn celsius_to_fahrenheit() {
    assert_eq!(c_to_f(0.0), 32.0);
    assert_eq!(c_to_f(100.0), 212.0);
    assert!((c_to_f(26.5) - 79.7).abs() < 1e-9);
  }

  #[test]
  fn rounding_to_places() {
    assert_eq!(round_to(79.666_666, 2), 79.67);
    assert_eq!(round_to(42.361_234_9, 6), 42.361_235);
    assert_eq!(round_to(-71.5, 0), -72.0);
  }
}
