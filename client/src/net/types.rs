//! Wire DTOs for the organization projects API.
//!
//! DESIGN
//! ======
//! Field names mirror the JSON returned by the projects endpoint (camelCase),
//! so a response body deserializes straight into the snapshot type the stats
//! store holds. Optional stat blocks stay `Option` because the API only
//! includes them when the matching query flag was sent.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Organization feature flag that enables transaction stats on cards.
pub const PERFORMANCE_FEATURE: &str = "performance-view";

/// One `[timestamp, count]` bucket of a stats series.
pub type StatPoint = (i64, u64);

/// A project as returned by the projects endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    /// Unique, URL-safe identifier; the stats store is keyed by it.
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub platform: Option<String>,
    /// Timestamp of the first error event, if any arrived.
    #[serde(default)]
    pub first_event: Option<String>,
    #[serde(default)]
    pub first_transaction_event: bool,
    /// Error counts per bucket. Absent until stats have been loaded.
    #[serde(default, deserialize_with = "deserialize_series")]
    pub stats: Option<Vec<StatPoint>>,
    /// Transaction counts per bucket, only when requested.
    #[serde(default, deserialize_with = "deserialize_series")]
    pub transaction_stats: Option<Vec<StatPoint>>,
    #[serde(default)]
    pub session_stats: Option<SessionStats>,
}

impl Project {
    /// Overlay loaded details onto this project.
    ///
    /// Fields present in `details` win; absent optional fields keep the base
    /// value. `first_transaction_event` is always present on a loaded
    /// project, so it is taken from `details` even when `false`. Identity
    /// fields (`id`, `slug`) always come from `self`.
    #[must_use]
    pub fn merged_with(&self, details: Option<&Project>) -> Project {
        let Some(details) = details else {
            return self.clone();
        };
        Project {
            id: self.id.clone(),
            slug: self.slug.clone(),
            name: if details.name.is_empty() { self.name.clone() } else { details.name.clone() },
            platform: details.platform.clone().or_else(|| self.platform.clone()),
            first_event: details.first_event.clone().or_else(|| self.first_event.clone()),
            first_transaction_event: details.first_transaction_event,
            stats: details.stats.clone().or_else(|| self.stats.clone()),
            transaction_stats: details
                .transaction_stats
                .clone()
                .or_else(|| self.transaction_stats.clone()),
            session_stats: details.session_stats.clone().or_else(|| self.session_stats.clone()),
        }
    }
}

/// Release-health numbers for the stats period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    #[serde(default)]
    pub current_crash_free_rate: Option<f64>,
    #[serde(default)]
    pub previous_crash_free_rate: Option<f64>,
    #[serde(default)]
    pub has_health_data: bool,
}

/// The organization a dashboard is rendered for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub slug: String,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Organization {
    #[must_use]
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    #[must_use]
    pub fn has_performance(&self) -> bool {
        self.has_feature(PERFORMANCE_FEATURE)
    }
}

fn deserialize_series<'de, D>(deserializer: D) -> Result<Option<Vec<StatPoint>>, D::Error>
where
    D: Deserializer<'de>,
{
    type RawSeries = Vec<(serde_json::Value, serde_json::Value)>;
    let Some(raw) = Option::<RawSeries>::deserialize(deserializer)? else {
        return Ok(None);
    };
    raw.into_iter()
        .map(|(ts, count)| {
            let ts = integer_from_value(&ts).map_err(D::Error::custom)?;
            let count = integer_from_value(&count).map_err(D::Error::custom)?;
            let count = u64::try_from(count)
                .map_err(|_| D::Error::custom(format!("negative count {count}")))?;
            Ok((ts, count))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn integer_from_value(value: &serde_json::Value) -> Result<i64, String> {
    let serde_json::Value::Number(number) = value else {
        return Err("expected number".to_owned());
    };
    if let Some(int) = number.as_i64() {
        return Ok(int);
    }
    if let Some(float) = number.as_f64()
        && float.is_finite()
        && float.fract() == 0.0
        && float >= i64::MIN as f64
        && float <= i64::MAX as f64
    {
        return Ok(float as i64);
    }
    Err("expected integer-compatible number".to_owned())
}
