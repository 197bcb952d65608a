//! Canned segmentation payloads served by the API
//!
//! The catalog is immutable once built. Handlers only read from it, so a
//! single `Arc<Catalog>` is shared by every request.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{
    Distribution, JsonObject, SegmentationKind, SegmentationResult, SegmentationSummary,
    SpecificSegmentationResult,
};

const DEFAULT_EXPORT_STATUS: &str = "No data exported";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    demographic: Distribution,
    preference: Distribution,
    rfm: Distribution,
    customer_count: u64,
    export_status: String,
}

/// On-disk catalog layout
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    demographic: Distribution,
    preference: Distribution,
    rfm: Distribution,
    #[serde(default)]
    customer_count: Option<u64>,
    #[serde(default)]
    export_status: Option<String>,
}

impl Catalog {
    /// Catalog compiled into the binary
    pub fn builtin() -> Self {
        Self {
            demographic: [("Male", 250), ("Female", 200), ("Unknown", 6)]
                .into_iter()
                .collect(),
            preference: [
                ("Preference Group 1", 150),
                ("Preference Group 2", 200),
                ("Preference Group 3", 106),
            ]
            .into_iter()
            .collect(),
            rfm: [
                ("Champions", 100),
                ("Loyal Customers", 150),
                ("Potential Loyalists", 80),
                ("At Risk", 70),
                ("Lost Customers", 56),
            ]
            .into_iter()
            .collect(),
            customer_count: 456,
            export_status: DEFAULT_EXPORT_STATUS.to_string(),
        }
    }

    /// Load a catalog from a JSON file.
    ///
    /// `customer_count` defaults to the demographic total and `export_status`
    /// to "No data exported" when omitted.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::CatalogNotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let file: CatalogFile = serde_json::from_slice(&bytes)
            .map_err(|e| Error::invalid_catalog(format!("{}: {}", path.display(), e)))?;

        if file.demographic.is_empty() || file.preference.is_empty() || file.rfm.is_empty() {
            return Err(Error::invalid_catalog(format!(
                "{}: every distribution needs at least one label",
                path.display()
            )));
        }

        let customer_count = file
            .customer_count
            .unwrap_or_else(|| file.demographic.total());

        tracing::debug!(
            path = %path.display(),
            customer_count,
            "Loaded segmentation catalog"
        );

        Ok(Self {
            demographic: file.demographic,
            preference: file.preference,
            rfm: file.rfm,
            customer_count,
            export_status: file
                .export_status
                .unwrap_or_else(|| DEFAULT_EXPORT_STATUS.to_string()),
        })
    }

    pub fn distribution(&self, kind: SegmentationKind) -> &Distribution {
        match kind {
            SegmentationKind::Demographic => &self.demographic,
            SegmentationKind::Preference => &self.preference,
            SegmentationKind::Rfm => &self.rfm,
        }
    }

    pub fn customer_count(&self) -> u64 {
        self.customer_count
    }

    /// Result of the all-in-one segmentation run
    pub fn comprehensive(&self) -> SegmentationResult {
        SegmentationResult {
            summary: SegmentationSummary {
                demographic: self.demographic.clone(),
                preference: self.preference.clone(),
                value_based_rfm: self.rfm.clone(),
            },
            details: JsonObject::new(),
            customer_count: self.customer_count,
            data_exported_status: self.export_status.clone(),
        }
    }

    /// Result of a single segmentation pipeline
    pub fn specific(&self, kind: SegmentationKind) -> SpecificSegmentationResult {
        let (profiles, avg_values) = match kind {
            SegmentationKind::Demographic => (None, None),
            SegmentationKind::Preference => (Some(JsonObject::new()), None),
            SegmentationKind::Rfm => (None, Some(JsonObject::new())),
        };

        SpecificSegmentationResult {
            message: format!("{} segmentation completed", kind.label()),
            distribution: self.distribution(kind).clone(),
            profiles,
            avg_values,
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
