#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Visual identity attached to every talent profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aesthetic {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A talent profile row as stored in the `talents` table.
///
/// The strongly-typed core covers the columns every profile carries. Columns the
/// schema grows later land in `extra` and round-trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Talent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub aesthetic: Aesthetic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(
        rename = "design-system",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub design_system: Option<Map<String, Value>>,
    /// ISO-8601, assigned by the store. Kept as the store's literal text.
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Talent {
    /// Resolves a field by its wire name, core columns first, then `extra`.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::String(self.id.clone())),
            "name" => Some(Value::String(self.name.clone())),
            "description" => Some(Value::String(self.description.clone())),
            "type" => Some(Value::String(self.kind.clone())),
            "aesthetic" => serde_json::to_value(&self.aesthetic).ok(),
            "title" => self.title.clone().map(Value::String),
            "summary" => self.summary.clone().map(Value::String),
            "photo" => self.photo.clone().map(Value::String),
            "design-system" => self.design_system.clone().map(Value::Object),
            "created_at" => Some(Value::String(self.created_at.clone())),
            "updated_at" => Some(Value::String(self.updated_at.clone())),
            other => self.extra.get(other).cloned(),
        }
    }

    pub fn summary_row(&self) -> TalentSummary {
        TalentSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind.clone(),
        }
    }

    /// Applies a partial update in place. `updated_at` is left to the caller.
    pub fn apply(&mut self, patch: TalentPatch) {
        let TalentPatch {
            name,
            description,
            kind,
            aesthetic,
            title,
            summary,
            photo,
            design_system,
            extra,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(aesthetic) = aesthetic {
            self.aesthetic = aesthetic;
        }
        if title.is_some() {
            self.title = title;
        }
        if summary.is_some() {
            self.summary = summary;
        }
        if photo.is_some() {
            self.photo = photo;
        }
        if design_system.is_some() {
            self.design_system = design_system;
        }
        self.extra.extend(extra);
    }
}

/// Projection served by the `talents_list` resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Insert payload. `id`, `created_at` and `updated_at` are store-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTalent {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub aesthetic: Aesthetic,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(
        rename = "design-system",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub design_system: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewTalent {
    pub fn into_talent(self, id: String, timestamp: String) -> Talent {
        Talent {
            id,
            name: self.name,
            description: self.description,
            kind: self.kind,
            aesthetic: self.aesthetic,
            title: self.title,
            summary: self.summary,
            photo: self.photo,
            design_system: self.design_system,
            created_at: timestamp.clone(),
            updated_at: timestamp,
            extra: self.extra,
        }
    }
}

/// Partial update. Only the fields that are set get serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TalentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aesthetic: Option<Aesthetic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(
        rename = "design-system",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub design_system: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
