use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use geojson::{GeoJson, Value};

// ---------------------------------------------------------------------------
// Geography reference: one polygon set per state
// ---------------------------------------------------------------------------

/// Property key carrying the state code in the geography file.
const STATE_CODE_PROPERTY: &str = "sigla_uf";

/// The outer rings of one state's territory, in lon/lat order.
#[derive(Debug, Clone)]
pub struct StateShape {
    pub code: String,
    pub rings: Vec<Vec<[f64; 2]>>,
}

impl StateShape {
    /// Even-odd ray-cast test over all rings of this state.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.rings.iter().any(|ring| point_in_ring(ring, lon, lat))
    }
}

/// The full geography reference loaded from GeoJSON.
#[derive(Debug, Clone)]
pub struct Geography {
    pub states: Vec<StateShape>,
}

impl Geography {
    /// Load a GeoJSON FeatureCollection keyed by `sigla_uf`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("reading geography file")?;
        Self::from_geojson_str(&content)
    }

    /// Parse from GeoJSON text.  Features without a state code or without a
    /// (Multi)Polygon geometry are rejected; this file is a reference, not
    /// user data, so a malformed feature is a load error.
    pub fn from_geojson_str(content: &str) -> Result<Self> {
        let geojson: GeoJson = content.parse().context("parsing GeoJSON")?;

        let GeoJson::FeatureCollection(fc) = geojson else {
            bail!("expected a GeoJSON FeatureCollection");
        };

        let mut states = Vec::with_capacity(fc.features.len());
        for (i, feature) in fc.features.into_iter().enumerate() {
            let code = feature
                .properties
                .as_ref()
                .and_then(|p| p.get(STATE_CODE_PROPERTY))
                .and_then(|v| v.as_str())
                .with_context(|| format!("feature {i}: missing '{STATE_CODE_PROPERTY}' property"))?
                .to_string();

            let geometry = feature
                .geometry
                .with_context(|| format!("feature {i} ({code}): missing geometry"))?;

            let rings = match geometry.value {
                Value::Polygon(poly) => outer_ring(&poly).into_iter().collect(),
                Value::MultiPolygon(multi) => {
                    multi.iter().filter_map(|poly| outer_ring(poly)).collect()
                }
                _ => bail!("feature {i} ({code}): expected Polygon or MultiPolygon"),
            };

            states.push(StateShape { code, rings });
        }

        Ok(Geography { states })
    }

    /// Sorted set of state codes present in the geography.
    pub fn state_codes(&self) -> BTreeSet<String> {
        self.states.iter().map(|s| s.code.clone()).collect()
    }

    /// The state whose territory contains the given lon/lat point, if any.
    pub fn state_at(&self, lon: f64, lat: f64) -> Option<&StateShape> {
        self.states.iter().find(|s| s.contains(lon, lat))
    }
}

/// First ring of a GeoJSON polygon (the outer boundary).  Holes are rare in
/// state outlines and ignored for fill purposes.
fn outer_ring(polygon: &[Vec<Vec<f64>>]) -> Option<Vec<[f64; 2]>> {
    let ring = polygon.first()?;
    Some(
        ring.iter()
            .filter(|pos| pos.len() >= 2)
            .map(|pos| [pos[0], pos[1]])
            .collect(),
    )
}

/// Standard even-odd crossing-number test.
fn point_in_ring(ring: &[[f64; 2]], lon: f64, lat: f64) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > lat) != (yj > lat) {
            let x_cross = xj + (lat - yj) / (yi - yj) * (xi - xj);
            if lon < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
