//! Descriptors sent to the server to open a session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::{BatchInfo, ImageMatchSettings};
use crate::error::{EyesError, Result};
use crate::geometry::RectangleSize;
use crate::guard;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    #[default]
    Sequential,
    Progression,
}

/// Runtime the application under test ran in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppEnvironment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosting_app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_size: Option<RectangleSize>,
}

impl AppEnvironment {
    pub fn new(
        os: Option<String>,
        hosting_app: Option<String>,
        display_size: Option<RectangleSize>,
    ) -> Self {
        Self {
            os,
            hosting_app,
            display_size,
        }
    }
}

/// Free-form name/value tag attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyData {
    name: String,
    value: String,
}

impl PropertyData {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let value = value.into();
        guard::not_null_or_empty(Some(name.as_str()), "name")?;
        guard::not_null_or_empty(Some(value.as_str()), "value")?;
        Ok(Self { name, value })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Everything the server needs to start a session. Validated on
/// construction and immutable afterwards; all defaulting happens in the
/// caller before this is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SessionStartPayload")]
pub struct SessionStartInfo {
    agent_id: String,
    session_type: SessionType,
    app_id_or_name: String,
    ver_id: Option<String>,
    scenario_id_or_name: String,
    batch_info: Arc<BatchInfo>,
    baseline_env_name: Option<String>,
    environment_name: Option<String>,
    environment: AppEnvironment,
    default_match_settings: ImageMatchSettings,
    branch_name: Option<String>,
    parent_branch_name: Option<String>,
    properties: Vec<PropertyData>,
}

impl SessionStartInfo {
    pub fn new(
        agent_id: impl Into<String>,
        session_type: SessionType,
        app_id_or_name: impl Into<String>,
        ver_id: Option<String>,
        scenario_id_or_name: impl Into<String>,
        batch_info: Arc<BatchInfo>,
        baseline_env_name: Option<String>,
        environment_name: Option<String>,
        environment: AppEnvironment,
        default_match_settings: ImageMatchSettings,
        branch_name: Option<String>,
        parent_branch_name: Option<String>,
        properties: Vec<PropertyData>,
    ) -> Result<Self> {
        let agent_id = agent_id.into();
        let app_id_or_name = app_id_or_name.into();
        let scenario_id_or_name = scenario_id_or_name.into();

        guard::not_null_or_empty(Some(agent_id.as_str()), "agentId")?;
        guard::not_null_or_empty(Some(app_id_or_name.as_str()), "appIdOrName")?;
        guard::not_null_or_empty(Some(scenario_id_or_name.as_str()), "scenarioIdOrName")?;
        guard::not_null_or_empty(Some(batch_info.id()), "batchInfo.id")?;
        for property in &properties {
            guard::not_null_or_empty(Some(property.name()), "property name")?;
            guard::not_null_or_empty(Some(property.value()), "property value")?;
        }

        Ok(Self {
            agent_id,
            session_type,
            app_id_or_name,
            ver_id,
            scenario_id_or_name,
            batch_info,
            baseline_env_name,
            environment_name,
            environment,
            default_match_settings,
            branch_name,
            parent_branch_name,
            properties,
        })
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn app_id_or_name(&self) -> &str {
        &self.app_id_or_name
    }

    pub fn ver_id(&self) -> Option<&str> {
        self.ver_id.as_deref()
    }

    pub fn scenario_id_or_name(&self) -> &str {
        &self.scenario_id_or_name
    }

    pub fn batch_info(&self) -> &Arc<BatchInfo> {
        &self.batch_info
    }

    pub fn baseline_env_name(&self) -> Option<&str> {
        self.baseline_env_name.as_deref()
    }

    pub fn environment_name(&self) -> Option<&str> {
        self.environment_name.as_deref()
    }

    pub fn environment(&self) -> &AppEnvironment {
        &self.environment
    }

    pub fn default_match_settings(&self) -> &ImageMatchSettings {
        &self.default_match_settings
    }

    pub fn branch_name(&self) -> Option<&str> {
        self.branch_name.as_deref()
    }

    pub fn parent_branch_name(&self) -> Option<&str> {
        self.parent_branch_name.as_deref()
    }

    pub fn properties(&self) -> &[PropertyData] {
        &self.properties
    }
}

impl fmt::Display for SessionStartInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "SessionStartInfo {{ {json} }}")
    }
}

/// Wire form of [`SessionStartInfo`]; deserialized payloads go back through
/// the validating constructor.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionStartPayload {
    agent_id: String,
    #[serde(default)]
    session_type: SessionType,
    app_id_or_name: String,
    #[serde(default)]
    ver_id: Option<String>,
    scenario_id_or_name: String,
    batch_info: Arc<BatchInfo>,
    #[serde(default)]
    baseline_env_name: Option<String>,
    #[serde(default)]
    environment_name: Option<String>,
    environment: AppEnvironment,
    default_match_settings: ImageMatchSettings,
    #[serde(default)]
    branch_name: Option<String>,
    #[serde(default)]
    parent_branch_name: Option<String>,
    #[serde(default)]
    properties: Vec<PropertyData>,
}

impl TryFrom<SessionStartPayload> for SessionStartInfo {
    type Error = EyesError;

    fn try_from(raw: SessionStartPayload) -> Result<Self> {
        SessionStartInfo::new(
            raw.agent_id,
            raw.session_type,
            raw.app_id_or_name,
            raw.ver_id,
            raw.scenario_id_or_name,
            raw.batch_info,
            raw.baseline_env_name,
            raw.environment_name,
            raw.environment,
            raw.default_match_settings,
            raw.branch_name,
            raw.parent_branch_name,
            raw.properties,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Region;
    use crate::types::MatchLevel;

    fn batch() -> Arc<BatchInfo> {
        Arc::new(BatchInfo::new("nightly").with_id("batch-1").unwrap())
    }

    fn build(agent_id: &str, app: &str, scenario: &str) -> Result<SessionStartInfo> {
        let mut settings = ImageMatchSettings::new(MatchLevel::Layout);
        settings.regions.ignore.push(Region::new(0, 0, 100, 20));

        SessionStartInfo::new(
            agent_id,
            SessionType::Progression,
            app,
            Some("1.0.3".to_string()),
            scenario,
            batch(),
            Some("baseline-env".to_string()),
            Some("ci-linux".to_string()),
            AppEnvironment::new(
                Some("Linux".to_string()),
                Some("Chrome".to_string()),
                Some(RectangleSize::new(1200, 800)),
            ),
            settings,
            Some("feature/x".to_string()),
            Some("default".to_string()),
            vec![PropertyData::new("team", "web").unwrap()],
        )
    }

    #[test]
    fn valid_arguments_construct() {
        let info = build("eyes-core/0.1.0", "Shop", "Checkout").expect("valid start info");
        assert_eq!(info.agent_id(), "eyes-core/0.1.0");
        assert_eq!(info.session_type(), SessionType::Progression);
        assert_eq!(info.app_id_or_name(), "Shop");
        assert_eq!(info.scenario_id_or_name(), "Checkout");
        assert_eq!(info.ver_id(), Some("1.0.3"));
        assert_eq!(info.batch_info().id(), "batch-1");
        assert_eq!(info.branch_name(), Some("feature/x"));
        assert_eq!(info.parent_branch_name(), Some("default"));
        assert_eq!(info.properties()[0].name(), "team");
    }

    #[test]
    fn empty_required_strings_are_illegal_arguments() {
        for (agent, app, scenario, field) in [
            ("", "Shop", "Checkout", "agentId"),
            ("agent", "", "Checkout", "appIdOrName"),
            ("agent", "Shop", "", "scenarioIdOrName"),
        ] {
            let err = build(agent, app, scenario).unwrap_err();
            assert!(matches!(err, EyesError::IllegalArgument(_)));
            assert!(err.to_string().contains(field), "{err} should name {field}");
        }
    }

    #[test]
    fn projection_round_trips_every_field() {
        let info = build("agent", "Shop", "Checkout").unwrap();
        let json = serde_json::to_string(&info).expect("serialize");
        let back: SessionStartInfo = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, info);
    }

    #[test]
    fn projection_uses_camel_case_keys() {
        let info = build("agent", "Shop", "Checkout").unwrap();
        let value = serde_json::to_value(&info).unwrap();
        for key in [
            "agentId",
            "sessionType",
            "appIdOrName",
            "verId",
            "scenarioIdOrName",
            "batchInfo",
            "baselineEnvName",
            "environmentName",
            "environment",
            "defaultMatchSettings",
            "branchName",
            "parentBranchName",
            "properties",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["sessionType"], "PROGRESSION");
        assert_eq!(value["environment"]["displaySize"]["width"], 1200);
    }

    #[test]
    fn deserializing_an_invalid_payload_fails_validation() {
        let info = build("agent", "Shop", "Checkout").unwrap();
        let mut value = serde_json::to_value(&info).unwrap();
        value["appIdOrName"] = serde_json::Value::String(String::new());
        let err = serde_json::from_value::<SessionStartInfo>(value).unwrap_err();
        assert!(err.to_string().contains("appIdOrName"));
    }

    #[test]
    fn display_wraps_json() {
        let info = build("agent", "Shop", "Checkout").unwrap();
        let rendered = info.to_string();
        assert!(rendered.starts_with("SessionStartInfo { {"));
        assert!(rendered.contains("\"appIdOrName\":\"Shop\""));
    }

    #[test]
    fn property_data_requires_name_and_value() {
        assert!(PropertyData::new("k", "v").is_ok());
        assert!(matches!(
            PropertyData::new("", "v"),
            Err(EyesError::IllegalArgument(_))
        ));
        assert!(matches!(
            PropertyData::new("k", ""),
            Err(EyesError::IllegalArgument(_))
        ));
    }
}
