//! Areas: named rectangular geofences over the campus.
//!
//! An area is both the box that synthetic devices wander in and the spatial
//! unit readings are aggregated over. Areas are inserted once and never
//! mutated.

use serde::{Deserialize, Serialize};

// ─── Bounds ──────────────────────────────────────────────────────────────────

/// An axis-aligned latitude/longitude box, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
  pub min_lat: f64,
  pub min_lon: f64,
  pub max_lat: f64,
  pub max_lon: f64,
}

/// Midpoint of a [`Bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
  pub lat: f64,
  pub lon: f64,
}

impl Bounds {
  pub fn contains(&self, lat: f64, lon: f64) -> bool {
    (self.min_lat..=self.max_lat).contains(&lat)
      && (self.min_lon..=self.max_lon).contains(&lon)
  }

  /// Pull `(lat, lon)` back onto the box if it has stepped outside.
  pub fn clamp(&self, lat: f64, lon: f64) -> (f64, f64) {
    (
      lat.clamp(self.min_lat, self.max_lat),
      lon.clamp(self.min_lon, self.max_lon),
    )
  }

  pub fn center(&self) -> Center {
    Center {
      lat: (self.min_lat + self.max_lat) / 2.0,
      lon: (self.min_lon + self.max_lon) / 2.0,
    }
  }
}

// ─── Area ────────────────────────────────────────────────────────────────────

/// A persisted area row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
  pub area_id: String,
  pub name:    String,
  pub bounds:  Bounds,
}

/// A fixed area definition plus the synthetic biases the generator applies
/// to readings taken inside it. The biases are never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaSeed {
  pub area_id:       &'static str,
  pub name:          &'static str,
  pub bounds:        Bounds,
  pub temp_c_offset: f64,
  pub rh_offset:     f64,
}

impl AreaSeed {
  pub fn to_area(&self) -> Area {
    Area {
      area_id: self.area_id.to_owned(),
      name:    self.name.to_owned(),
      bounds:  self.bounds,
    }
  }
}

const fn bbox(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Bounds {
  Bounds { min_lat, min_lon, max_lat, max_lon }
}

/// The six campus areas every demo database starts with.
pub const AREA_SEEDS: [AreaSeed; 6] = [
  AreaSeed {
    area_id:       "kendallEastGateway",
    name:          "Kendall Square / MIT East Gateway",
    bounds:        bbox(-71.0928, 42.3610, -71.0856, 42.3662),
    temp_c_offset: 1.2,
    rh_offset:     -2.0,
  },
  AreaSeed {
    area_id:       "mainCampusCore",
    name:          "Main Campus Core (Killian / Infinite Corridor)",
    bounds:        bbox(-71.0959, 42.3566, -71.0892, 42.3609),
    temp_c_offset: 0.3,
    rh_offset:     0.0,
  },
  AreaSeed {
    area_id:       "stataVassarNorth",
    name:          "Stata / Vassar Street North",
    bounds:        bbox(-71.0938, 42.3619, -71.0887, 42.3657),
    temp_c_offset: 0.9,
    rh_offset:     -1.0,
  },
  AreaSeed {
    area_id:       "sloanMediaLabAmes",
    name:          "Sloan / Media Lab / Ames Street",
    bounds:        bbox(-71.0912, 42.3573, -71.0866, 42.3614),
    temp_c_offset: 0.6,
    rh_offset:     0.8,
  },
  AreaSeed {
    area_id:       "westCampusKresgeSimmons",
    name:          "West Campus (Kresge / Simmons)",
    bounds:        bbox(-71.1038, 42.3548, -71.0957, 42.3606),
    temp_c_offset: -0.4,
    rh_offset:     1.5,
  },
  AreaSeed {
    area_id:       "nwAlbanyAthletics",
    name:          "NW Campus / Albany / Athletics corridor",
    bounds:        bbox(-71.1093, 42.3602, -71.1007, 42.3673),
    temp_c_offset: -0.2,
    rh_offset:     1.0,
  },
];

/// `(temp_c_offset, rh_offset)` for a seeded area; `(0.0, 0.0)` otherwise.
pub fn seed_offsets(area_id: &str) -> (f64, f64) {
  AREA_SEEDS
    .iter()
    .find(|s| s.area_id == area_id)
    .map_or((0.0, 0.0), |s| (s.temp_c_offset, s.rh_offset))
}
