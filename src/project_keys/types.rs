use {
    chrono::{DateTime, SecondsFormat, Utc},
    serde::{Deserialize, Deserializer, Serialize, Serializer},
};

/// DSN URLs for every ingestion endpoint of a key. Computed by the server.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProjectKeyDsn {
    pub secret: String,
    pub public: String,
    pub csp: String,
    pub security: String,
    pub minidump: String,
    pub cdn: String,
}

/// Number of events accepted per `window` seconds.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct ProjectKeyRateLimit {
    pub window: u64,
    pub count: u64,
}

/// Client key (DSN) of a project.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProjectKey {
    pub id: String,
    pub name: String,
    pub label: String,
    pub public: String,
    pub secret: String,
    #[serde(deserialize_with = "deserialize_project_id")]
    pub project_id: u64,
    pub is_active: bool,
    #[serde(default)]
    pub rate_limit: Option<ProjectKeyRateLimit>,
    pub dsn: ProjectKeyDsn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub browser_sdk_version: Option<String>,
    #[serde(with = "iso8601_millis")]
    pub date_created: DateTime<Utc>,
}

/// Payload of a key creation. Unset fields are left to server defaults.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectKeyParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<ProjectKeyRateLimit>,
}

/// Payload of a key update. Only the fields that are set are sent.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectKeyParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<ProjectKeyRateLimit>,
}

impl CreateProjectKeyParams {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

impl UpdateProjectKeyParams {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

// Older servers send the project ID as a string.
fn deserialize_project_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(id) => Ok(id),
        NumberOrString::String(id) => id.parse().map_err(serde::de::Error::custom),
    }
}

mod iso8601_millis {
    use super::*;

    /// Always at least three fractional digits. Sub-millisecond precision is
    /// kept as-is.
    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        let format = if value.timestamp_subsec_nanos() % 1_000_000 == 0 {
            SecondsFormat::Millis
        } else {
            SecondsFormat::AutoSi
        };
        serializer.serialize_str(&value.to_rfc3339_opts(format, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let value = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&value)
            .map(|date| date.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
