// Calibration record: the persisted winner of a calibration run.
//
// Calibration and ranking are separate invocations: `calibrate` writes this
// record once, and every later `rank`/`project` run reads it back to rebuild
// the axis. The record carries the winning definition's full word lists so
// later runs don't depend on the definitions file still matching.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::axis::AxisDefinition;

use super::calibrator::CalibrationResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// Id (file name) of the winning embedding space
    #[serde(default)]
    pub space_id: String,
    pub axis: AxisDefinition,
    #[serde(default)]
    pub mean_error: Option<f64>,
    #[serde(default)]
    pub evaluated_terms: usize,
    /// RFC 3339 timestamp of the calibration run
    #[serde(default)]
    pub calibrated_at: String,
}

impl CalibrationRecord {
    pub fn new(result: &CalibrationResult, axis: AxisDefinition) -> Self {
        Self {
            space_id: result.space_id.clone(),
            axis,
            mean_error: Some(result.mean_error),
            evaluated_terms: result.evaluated_terms,
            calibrated_at: Utc::now().to_rfc3339(),
        }
    }

    /// Parse a record. A bare `{left, right}` / `{positive, negative}`
    /// definition is accepted as a record with no provenance.
    pub fn from_json(value: Value) -> Result<Self> {
        let is_full_record = value.get("axis").is_some();
        let record = if is_full_record {
            serde_json::from_value::<CalibrationRecord>(value)
                .context("Calibration record is malformed")?
        } else {
            let axis: AxisDefinition = serde_json::from_value(value)
                .context("Calibration record has neither an `axis` nor left/right word lists")?;
            CalibrationRecord {
                space_id: String::new(),
                axis,
                mean_error: None,
                evaluated_terms: 0,
                calibrated_at: String::new(),
            }
        };
        record.validate()?;
        Ok(record)
    }

    fn validate(&self) -> Result<()> {
        if self.axis.left.is_empty() || self.axis.right.is_empty() {
            anyhow::bail!(
                "Calibrated axis '{}' has an empty pole (left: {} words, right: {} words)",
                self.axis.name,
                self.axis.left.len(),
                self.axis.right.len()
            );
        }
        if let Some(err) = self.mean_error {
            if !err.is_finite() || err < 0.0 {
                anyhow::bail!("Calibration record has an invalid mean error: {err}");
            }
        }
        Ok(())
    }

    /// Write the record as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory for {}", path.display())
                })?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write calibration record to {}", path.display()))?;
        info!(path = %path.display(), axis = %self.axis.name, "Saved calibration record");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "No calibration record at {}. Run `polaxis calibrate` first.",
                path.display()
            );
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value: Value = serde_json::from_str(&text).with_context(|| {
            format!(
                "{} is not valid JSON. Re-run `polaxis calibrate` to regenerate it.",
                path.display()
            )
        })?;
        Self::from_json(value).with_context(|| {
            format!(
                "Invalid calibration record in {}. Re-run `polaxis calibrate` to regenerate it.",
                path.display()
            )
        })
    }
}
