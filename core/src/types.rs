//! Domain DTOs for the Todoist sync API and the dashboard front-end.
//!
//! # Design
//! Field names follow the wire: the front-end payload uses camelCase keys
//! (`apiBase`, `todoistEndpoint`, ...) while provider fields are passed
//! through untouched via `#[serde(flatten)]` maps. Only the fields the helper
//! reads or derives are typed.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::markdown::render_markdown;

pub const DEFAULT_API_BASE: &str = "https://api.todoist.com";
pub const DEFAULT_API_VERSION: &str = "sync/v9";
pub const DEFAULT_ENDPOINT_PATH: &str = "sync";
pub const DEFAULT_RESOURCE_TYPE: &str = "items";

/// Connection settings supplied by the front-end with every `FETCH_TODOIST`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(rename = "apiBase", default = "default_api_base")]
    pub api_base: String,
    #[serde(rename = "apiVersion", default = "default_api_version")]
    pub api_version: String,
    #[serde(
        rename = "todoistEndpoint",
        alias = "endpointPath",
        default = "default_endpoint_path"
    )]
    pub endpoint_path: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "todoistResourceType", alias = "resourceTypes", default)]
    pub resource_types: ResourceTypes,
    #[serde(rename = "debug", alias = "debugEnabled", default)]
    pub debug: bool,
}

impl ClientConfig {
    /// A config pointing at the public API with default resource types.
    pub fn new(access_token: &str) -> Self {
        Self {
            api_base: default_api_base(),
            api_version: default_api_version(),
            endpoint_path: default_endpoint_path(),
            access_token: access_token.to_string(),
            resource_types: ResourceTypes::default(),
            debug: false,
        }
    }

    /// `{apiBase}/{apiVersion}/{endpointPath}` with redundant slashes removed.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.api_base.trim_end_matches('/'),
            self.api_version.trim_matches('/'),
            self.endpoint_path.trim_matches('/')
        )
    }
}

// The access token never reaches the logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .field("endpoint_path", &self.endpoint_path)
            .field("access_token", &"<redacted>")
            .field("resource_types", &self.resource_types)
            .field("debug", &self.debug)
            .finish()
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_endpoint_path() -> String {
    DEFAULT_ENDPOINT_PATH.to_string()
}

/// Resource types requested from the sync endpoint (`items`, `projects`, ...).
///
/// Deserializes from a JSON array, from a string holding a JSON array, or
/// from a single bare resource name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ResourceTypes(Vec<String>);

impl ResourceTypes {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(types.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|t| t == name)
    }

    /// JSON array text sent as the `resource_types` form field.
    pub fn to_form_value(&self) -> String {
        Value::from(self.0.clone()).to_string()
    }
}

impl Default for ResourceTypes {
    fn default() -> Self {
        Self(vec![DEFAULT_RESOURCE_TYPE.to_string()])
    }
}

impl<'de> Deserialize<'de> for ResourceTypes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            List(Vec<String>),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::List(types) => Ok(Self(types)),
            Raw::Text(text) => {
                let text = text.trim();
                if text.starts_with('[') {
                    serde_json::from_str(text).map(Self).map_err(D::Error::custom)
                } else if text.is_empty() {
                    Err(D::Error::custom("resource types must not be empty"))
                } else {
                    Ok(Self(vec![text.to_string()]))
                }
            }
        }
    }
}

/// A single task returned in the sync `items` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub content: String,
    /// HTML rendered from `content`; set by `TodoistClient::parse_sync`.
    #[serde(rename = "contentHtml", default, skip_serializing_if = "Option::is_none")]
    pub content_html: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(id: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            content: content.to_string(),
            content_html: None,
            extra: Map::new(),
        }
    }

    /// Derive `content_html` from this task's own `content`.
    pub fn render_html(&mut self) {
        self.content_html = Some(render_markdown(&self.content));
    }
}

/// The payload of one `TASKS` notification: the sync response with every
/// task annotated and the request's access token echoed back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskSnapshot {
    pub items: Vec<Task>,
    #[serde(rename = "accessToken", default)]
    pub access_token: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accept an identifier sent either as a JSON string or a JSON number.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}
