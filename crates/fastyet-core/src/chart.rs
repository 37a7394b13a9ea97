//! Chart payload types.
//!
//! A line-chart renderer expects one object per x-axis tick with one field
//! per line series:
//!
//! ```json
//! { "version": "1.43.0", "Debug,Clean,4 cores": 12.4, "Debug,Clean,8 cores": 7.9 }
//! ```
//!
//! [`ChartPoint`] is that object, [`ChartData`] bundles the points for one
//! repository.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::key::SeriesKey;
use crate::model::Repo;
use crate::stats::Interval;
use crate::version::Version;

/// Name of the x-axis field present on every point.
pub const VERSION_FIELD: &str = "version";

/// A series value: compile times are numbers (seconds), sizes are
/// fixed-point strings (megabytes, three decimals).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value, parsing text values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.parse().ok(),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// All series values for one version of one repository.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    version: Version,
    fields: BTreeMap<String, FieldValue>,
}

impl ChartPoint {
    pub fn new(version: Version) -> Self {
        ChartPoint {
            version,
            fields: BTreeMap::new(),
        }
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Numeric value of `field`, if present and numeric.
    pub fn value(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_f64)
    }

    /// Set `field`, returning the previous value if there was one.
    pub(crate) fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        let field = field.into();
        debug_assert_ne!(field, VERSION_FIELD, "series field would shadow the x-axis");
        self.fields.insert(field, value.into())
    }

    /// Series fields (everything except `version`), sorted by name.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl Serialize for ChartPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(VERSION_FIELD, &self.version)?;
        for (field, value) in &self.fields {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// Compare two points by version, ascending.
pub fn compare_points(a: &ChartPoint, b: &ChartPoint) -> Ordering {
    a.version.cmp(&b.version)
}

/// Sort points by version, ascending.
pub fn sort_by_version(points: &mut [ChartPoint]) {
    points.sort_by(compare_points);
}

/// Confidence bounds of one series at one version, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Compiler version the samples were taken with.
    pub version: Version,
    /// Build mode, profile mode and system of the series.
    pub series: SeriesKey,
    /// Mean and bounds, flattened into `low`/`mid`/`high`.
    #[serde(flatten)]
    pub interval: Interval,
}

/// Everything the renderer needs for one repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// Catalog entry of the repository.
    pub repo: Repo,
    /// Mean compile time in seconds per series, one point per version.
    pub compile_times: Vec<ChartPoint>,
    /// Output size in megabytes per build mode, one point per version.
    pub sizes: Vec<ChartPoint>,
    /// Per-series confidence bounds backing the `compile_times` values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub intervals: Vec<SeriesPoint>,
}

impl ChartData {
    /// The compile-time point for `version`, if any.
    pub fn compile_time_point(&self, version: &Version) -> Option<&ChartPoint> {
        self.compile_times.iter().find(|p| p.version() == version)
    }

    /// Every compile-time series name appearing in this chart, sorted.
    pub fn series_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .compile_times
            .iter()
            .flat_map(|p| p.fields().map(|(name, _)| name.to_owned()))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}
