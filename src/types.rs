//! Core types for segmock

use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, Unexpected, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Free-form JSON object; the mock always sends it empty
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Segmentation pipelines the API can report on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentationKind {
    Demographic,
    Preference,
    Rfm,
}

impl SegmentationKind {
    pub const ALL: [SegmentationKind; 3] = [Self::Demographic, Self::Preference, Self::Rfm];

    /// Path segment used to select this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demographic => "demographic",
            Self::Preference => "preference",
            Self::Rfm => "rfm",
        }
    }

    /// Human-readable pipeline name used in response messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Demographic => "Demographic",
            Self::Preference => "Preference",
            Self::Rfm => "RFM",
        }
    }
}

impl fmt::Display for SegmentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "demographic" => Ok(Self::Demographic),
            "preference" => Ok(Self::Preference),
            "rfm" => Ok(Self::Rfm),
            other => Err(Error::InvalidSegmentationKind(other.to_string())),
        }
    }
}

/// Request body accepted by every segmentation endpoint.
///
/// The values are accepted for contract compatibility only; responses never
/// depend on them. An explicit `null` clears a field rather than restoring
/// its default.
///
/// Cluster bounds are lenient: integral floats (`5.0`) and integer strings
/// (`"2"`) are accepted, anything else is a type error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationRequest {
    #[serde(default)]
    pub reference_date: Option<String>,
    #[serde(default = "default_min_clusters", deserialize_with = "lenient_int")]
    pub min_clusters: Option<i64>,
    #[serde(default = "default_max_clusters", deserialize_with = "lenient_int")]
    pub max_clusters: Option<i64>,
}

fn default_min_clusters() -> Option<i64> {
    Some(2)
}

fn default_max_clusters() -> Option<i64> {
    Some(5)
}

fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    struct LenientIntVisitor;

    impl<'de> Visitor<'de> for LenientIntVisitor {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a valid integer")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v)
                .map(Some)
                .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(Some(v as i64))
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(LenientIntVisitor)
}

impl Default for SegmentationRequest {
    fn default() -> Self {
        Self {
            reference_date: None,
            min_clusters: default_min_clusters(),
            max_clusters: default_max_clusters(),
        }
    }
}

/// Ordered label -> customer count mapping.
///
/// Serialized as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution(Vec<(String, u64)>);

impl Distribution {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Distribution {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        // Later duplicates overwrite earlier ones, like a JSON object would
        let mut entries: Vec<(String, u64)> = Vec::new();
        for (label, count) in iter {
            let label = label.into();
            match entries.iter_mut().find(|(name, _)| *name == label) {
                Some(entry) => entry.1 = count,
                None => entries.push((label, count)),
            }
        }
        Distribution(entries)
    }
}

impl Serialize for Distribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Distribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DistributionVisitor;

        impl<'de> Visitor<'de> for DistributionVisitor {
            type Value = Distribution;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping labels to non-negative counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, u64>()? {
                    entries.push(entry);
                }
                Ok(entries.into_iter().collect())
            }
        }

        deserializer.deserialize_map(DistributionVisitor)
    }
}

/// Per-kind breakdown bundled in the comprehensive result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationSummary {
    pub demographic: Distribution,
    pub preference: Distribution,
    pub value_based_rfm: Distribution,
}

/// Response of `POST /api/segment/comprehensive`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationResult {
    pub summary: SegmentationSummary,
    pub details: JsonObject,
    pub customer_count: u64,
    pub data_exported_status: String,
}

/// Response of `POST /api/segment/{kind}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificSegmentationResult {
    pub message: String,
    pub distribution: Distribution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<JsonObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_values: Option<JsonObject>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_only_known_values() {
        for kind in SegmentationKind::ALL {
            assert_eq!(kind.as_str().parse::<SegmentationKind>().unwrap(), kind);
        }
        assert!("RFM".parse::<SegmentationKind>().is_err());
        assert!("bogus".parse::<SegmentationKind>().is_err());
        assert!("".parse::<SegmentationKind>().is_err());
    }

    #[test]
    fn request_defaults_apply_to_missing_fields() {
        let req: SegmentationRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req, SegmentationRequest::default());
        assert_eq!(req.min_clusters, Some(2));
        assert_eq!(req.max_clusters, Some(5));
    }

    #[test]
    fn request_explicit_null_clears_field() {
        let req: SegmentationRequest =
            serde_json::from_str(r#"{"min_clusters": null, "reference_date": null}"#).unwrap();
        assert_eq!(req.min_clusters, None);
        assert_eq!(req.max_clusters, Some(5));
        assert_eq!(req.reference_date, None);
    }

    #[test]
    fn request_rejects_non_integer_bounds() {
        assert!(serde_json::from_str::<SegmentationRequest>(r#"{"min_clusters": "two"}"#).is_err());
        assert!(serde_json::from_str::<SegmentationRequest>(r#"{"max_clusters": 2.5}"#).is_err());
        assert!(serde_json::from_str::<SegmentationRequest>(r#"{"max_clusters": true}"#).is_err());
        assert!(serde_json::from_str::<SegmentationRequest>(r#"{"min_clusters": [2]}"#).is_err());
        assert!(serde_json::from_str::<SegmentationRequest>(r#"{"reference_date": 7}"#).is_err());
    }

    #[test]
    fn request_coerces_integral_bounds() {
        let req: SegmentationRequest =
            serde_json::from_str(r#"{"min_clusters": "2", "max_clusters": 5.0}"#).unwrap();
        assert_eq!(req.min_clusters, Some(2));
        assert_eq!(req.max_clusters, Some(5));

        let req: SegmentationRequest =
            serde_json::from_str(r#"{"min_clusters": " -3 ", "max_clusters": 9}"#).unwrap();
        assert_eq!(req.min_clusters, Some(-3));
        assert_eq!(req.max_clusters, Some(9));
    }

    #[test]
    fn distribution_keeps_insertion_order() {
        let dist: Distribution = [("zeta", 1), ("alpha", 2), ("mid", 3)].into_iter().collect();
        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":2,"mid":3}"#);

        let back: Distribution = serde_json::from_str(&json).unwrap();
        assert_eq!(back.labels().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(back.total(), 6);
    }

    #[test]
    fn distribution_rejects_negative_counts() {
        assert!(serde_json::from_str::<Distribution>(r#"{"a": -1}"#).is_err());
    }
}
