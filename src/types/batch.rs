use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::env_value;
use crate::error::Result;
use crate::guard;

pub const BATCH_ID_ENV: &str = "APPLITOOLS_BATCH_ID";
pub const BATCH_NAME_ENV: &str = "APPLITOOLS_BATCH_NAME";

/// Batch id/name defaults resolved once, before any batch is created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDefaults {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl BatchDefaults {
    /// Reads `APPLITOOLS_BATCH_ID` and `APPLITOOLS_BATCH_NAME`, ignoring empty values.
    pub fn from_env() -> Self {
        Self {
            id: env_value(BATCH_ID_ENV),
            name: env_value(BATCH_NAME_ENV),
        }
    }
}

/// Groups related sessions so the server can present them together.
///
/// CI systems share a batch across processes by exporting the same
/// `APPLITOOLS_BATCH_ID` to every test process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInfo {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    started_at: DateTime<Utc>,
}

impl BatchInfo {
    /// A named batch with a fresh unique id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: Some(name.into()),
            started_at: now_in_seconds(),
        }
    }

    pub fn with_defaults(defaults: &BatchDefaults) -> Self {
        Self {
            id: defaults
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: defaults.name.clone(),
            started_at: now_in_seconds(),
        }
    }

    pub fn from_env() -> Self {
        Self::with_defaults(&BatchDefaults::from_env())
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Result<Self> {
        self.set_id(id)?;
        Ok(self)
    }

    pub fn with_started_at(mut self, started_at: DateTime<Utc>) -> Self {
        self.set_started_at(started_at);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> Result<()> {
        let id = id.into();
        guard::not_null_or_empty(Some(id.as_str()), "batch id")?;
        self.id = id;
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn set_started_at(&mut self, started_at: DateTime<Utc>) {
        self.started_at = started_at.trunc_subsecs(0);
    }
}

fn now_in_seconds() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}
