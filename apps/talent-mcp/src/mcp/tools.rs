//! Tool catalog served by `tools/list`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::css::{ComponentKind, VisualState};

pub const QUERY_TALENTS: &str = "query_talents";
pub const GENERATE_CSS: &str = "generate_css";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    let components: Vec<&str> = ComponentKind::ALL.iter().map(|c| c.as_str()).collect();
    let states: Vec<&str> = VisualState::ALL.iter().map(|s| s.as_str()).collect();

    vec![
        ToolDefinition::new(
            QUERY_TALENTS,
            "Query talent profiles. Each criterion narrows the result: `keywords` matches \
             an aesthetic keyword, `type` matches exactly, any other field matches a \
             case-insensitive substring.",
            json!({
                "type": "object",
                "properties": {
                    "criteria": {
                        "type": "object",
                        "description": "Field to value mapping; all criteria must match",
                        "additionalProperties": true
                    }
                }
            }),
        ),
        ToolDefinition::new(
            GENERATE_CSS,
            "Generate a CSS fragment for a UI component using a talent profile.",
            json!({
                "type": "object",
                "properties": {
                    "talent_id": {
                        "type": "string",
                        "description": "Id of the talent profile"
                    },
                    "component": {
                        "type": "string",
                        "enum": components
                    },
                    "state": {
                        "type": "string",
                        "enum": states,
                        "default": VisualState::default().as_str()
                    },
                    "custom_properties": {
                        "type": "object",
                        "additionalProperties": {
                            "type": ["string", "number"]
                        }
                    }
                },
                "required": ["talent_id", "component"]
            }),
        ),
    ]
}
