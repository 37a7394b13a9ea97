//! Percentage change between consecutive versions.
//!
//! `delta = (previous - current) / previous * 100`, so a positive delta means
//! the newer version is faster or smaller.

use serde::Serialize;

use crate::chart::ChartPoint;
use crate::version::Version;

/// Percentage change from `previous` to `current`.
///
/// `None` when `previous` is zero.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some((previous - current) / previous * 100.0)
}

/// Delta of one field at one version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionDelta {
    pub version: Version,
    /// `None` when this point or its predecessor has no value for the field,
    /// or the predecessor's value is zero.
    pub delta: Option<f64>,
}

/// Deltas of `field` across `points`, which must already be in version order.
///
/// The first point's delta is always `0`.
pub fn percent_changes(points: &[ChartPoint], field: &str) -> Vec<VersionDelta> {
    let mut deltas = Vec::with_capacity(points.len());
    let mut previous: Option<f64> = None;

    for (i, point) in points.iter().enumerate() {
        let current = point.value(field);
        let delta = if i == 0 {
            Some(0.0)
        } else {
            match (previous, current) {
                (Some(prev), Some(cur)) => percent_change(prev, cur),
                _ => None,
            }
        };
        deltas.push(VersionDelta {
            version: point.version().clone(),
            delta,
        });
        previous = current;
    }

    deltas
}

/// The most recent value of a field and its change since the previous
/// version that has the field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestChange {
    /// Newest version that has the field.
    pub version: Version,
    pub value: f64,
    /// Next older version that has the field.
    pub previous: Option<Version>,
    /// Percent change from `previous`, positive when the value went down.
    pub delta: Option<f64>,
}

/// Latest value of `field` across version-ordered `points`, skipping points
/// without it.
///
/// Returns `None` when no point has the field.
pub fn latest_change(points: &[ChartPoint], field: &str) -> Option<LatestChange> {
    let mut values = points
        .iter()
        .rev()
        .filter_map(|p| p.value(field).map(|v| (p.version(), v)));
    let (version, value) = values.next()?;
    let previous = values.next();
    Some(LatestChange {
        version: version.clone(),
        value,
        previous: previous.map(|(v, _)| v.clone()),
        delta: previous.and_then(|(_, prev)| percent_change(prev, value)),
    })
}
