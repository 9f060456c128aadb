//! Resource catalog: the talent list and a per-talent template.

use serde::Serialize;

pub const LIST_URI: &str = "talents://list";
pub const TALENT_TEMPLATE: &str = "talents://{id}";
const SCHEME: &str = "talents://";
pub const JSON_MIME: &str = "application/json";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    pub uri: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTemplate {
    pub uri_template: String,
    pub name: String,
    pub description: String,
    pub mime_type: String,
}

/// A parsed `talents://` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TalentResource {
    List,
    Talent(String),
}

impl TalentResource {
    /// `talents://list` or `talents://{id}`; anything else is not ours.
    pub fn parse(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix(SCHEME)?;
        match rest {
            "" => None,
            "list" => Some(TalentResource::List),
            id if id.contains('/') => None,
            id => Some(TalentResource::Talent(id.to_string())),
        }
    }
}

pub fn resource_definitions() -> Vec<ResourceDefinition> {
    vec![ResourceDefinition {
        uri: LIST_URI.to_string(),
        name: "talents_list".to_string(),
        description: "Every talent profile as {id, name, type}".to_string(),
        mime_type: JSON_MIME.to_string(),
    }]
}

pub fn resource_templates() -> Vec<ResourceTemplate> {
    vec![ResourceTemplate {
        uri_template: TALENT_TEMPLATE.to_string(),
        name: "talent".to_string(),
        description: "A full talent profile by id".to_string(),
        mime_type: JSON_MIME.to_string(),
    }]
}
