//! Site configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{Error, Result},
    label::LabelClassifier,
    media::DEFAULT_MAX_UPLOAD_BYTES,
};

const DEFAULT_POSITIVE: [&str; 6] = ["person", "helmet", "vest", "gloves", "goggles", "boots"];
const DEFAULT_NEGATIVE: [&str; 4] = ["no_helmet", "no_goggles", "no_glove", "no_shoes"];
const DEFAULT_ALERT_SUBJECT: &str = "PPE compliance alert";

/// Labels the detector emits, split into worn equipment and violations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            positive: DEFAULT_POSITIVE.iter().map(|s| s.to_string()).collect(),
            negative: DEFAULT_NEGATIVE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Who gets told when a checkpoint fails.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AlertConfig {
    pub recipients: Vec<String>,
    /// Mail subject. Default: "PPE compliance alert".
    pub subject: Option<String>,
    /// Default: true.
    pub enabled: Option<bool>,
}

impl AlertConfig {
    pub fn effective_subject(&self) -> &str {
        self.subject.as_deref().unwrap_or(DEFAULT_ALERT_SUBJECT)
    }

    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// Durable cross-session tally store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file. In-memory when unset.
    pub database_path: Option<PathBuf>,
}

/// Upload limits.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MediaConfig {
    /// Largest accepted upload. Default: 100 MiB.
    pub max_upload_bytes: Option<u64>,
}

impl MediaConfig {
    pub fn effective_max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

/// Top-level configuration of one deployment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ComplianceConfig {
    pub vocabulary: VocabularyConfig,
    /// Ordered checkpoint labels. Defaults to the positive items.
    pub checkpoints: Option<Vec<String>>,
    pub alert: AlertConfig,
    pub storage: StorageConfig,
    pub media: MediaConfig,
}

impl ComplianceConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        self.classifier()?;
        if let Some(checkpoints) = &self.checkpoints {
            if checkpoints.iter().any(|label| label.trim().is_empty()) {
                return Err(Error::Config {
                    message: "empty checkpoint label".to_string(),
                });
            }
        }
        if self.alert.effective_enabled() && self.alert.recipients.is_empty() {
            warn!("alerts are enabled but no recipients are configured");
        }
        Ok(())
    }

    pub fn classifier(&self) -> Result<LabelClassifier> {
        LabelClassifier::new(&self.vocabulary.positive, &self.vocabulary.negative)
    }

    pub fn effective_checkpoints(&self) -> Vec<String> {
        match &self.checkpoints {
            Some(checkpoints) => checkpoints.iter().map(|l| l.trim().to_string()).collect(),
            None => {
                let mut seen = Vec::new();
                for label in &self.vocabulary.positive {
                    let label = label.trim().to_string();
                    if !seen.contains(&label) {
                        seen.push(label);
                    }
                }
                seen
            }
        }
    }
}
