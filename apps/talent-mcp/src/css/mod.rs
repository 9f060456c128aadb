//! Stylesheet fragments for UI components.
//!
//! `button`, `card` and `input` return hand-authored fragments covering the
//! base rule and its pseudo-states. The talent, requested state and custom
//! properties are accepted but do not influence the output yet.
//! `navbar`, `modal` and `table` return a placeholder comment.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Talent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Button,
    Card,
    Input,
    Navbar,
    Modal,
    Table,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Button,
        ComponentKind::Card,
        ComponentKind::Input,
        ComponentKind::Navbar,
        ComponentKind::Modal,
        ComponentKind::Table,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Button => "button",
            ComponentKind::Card => "card",
            ComponentKind::Input => "input",
            ComponentKind::Navbar => "navbar",
            ComponentKind::Modal => "modal",
            ComponentKind::Table => "table",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualState {
    #[default]
    Default,
    Hover,
    Active,
    Disabled,
    Focus,
}

impl VisualState {
    pub const ALL: [VisualState; 5] = [
        VisualState::Default,
        VisualState::Hover,
        VisualState::Active,
        VisualState::Disabled,
        VisualState::Focus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisualState::Default => "default",
            VisualState::Hover => "hover",
            VisualState::Active => "active",
            VisualState::Disabled => "disabled",
            VisualState::Focus => "focus",
        }
    }
}

impl fmt::Display for VisualState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A custom property value: CSS text or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssValue {
    Text(String),
    Number(f64),
}

pub type CustomProperties = BTreeMap<String, CssValue>;

const BUTTON_CSS: &str = ".button {
  display: inline-flex;
  align-items: center;
  justify-content: center;
  cursor: pointer;
  font-weight: 500;
  text-decoration: none;
  border: none;
  outline: none;
  padding: 0.5rem 1rem;
  border-radius: 0.25rem;
  background-color: #4a90e2;
  color: white;
  transition: all 0.2s ease;
}

.button:hover {
  background-color: #357ab8;
}

.button:active {
  transform: translateY(1px);
}

.button:focus {
  box-shadow: 0 0 0 3px rgba(74, 144, 226, 0.3);
}

.button:disabled {
  opacity: 0.6;
  cursor: not-allowed;
}";

const CARD_CSS: &str = ".card {
  background-color: #fff;
  border-radius: 8px;
  box-shadow: 0 2px 8px rgba(0, 0, 0, 0.1);
  padding: 16px;
  transition: all 0.2s ease;
}

.card:hover {
  box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15);
}";

const INPUT_CSS: &str = ".input {
  display: block;
  width: 100%;
  padding: 8px 12px;
  border: 1px solid #ccc;
  border-radius: 4px;
  background-color: #fff;
  transition: all 0.2s ease;
}

.input:focus {
  border-color: #4a90e2;
  box-shadow: 0 0 0 3px rgba(74, 144, 226, 0.3);
  outline: none;
}

.input:disabled {
  background-color: #f5f5f5;
  cursor: not-allowed;
}";

/// Returns the stylesheet fragment for `component`. Never fails.
pub fn generate_css(
    _talent: &Talent,
    component: ComponentKind,
    _state: VisualState,
    _custom_properties: &CustomProperties,
) -> String {
    match component {
        ComponentKind::Button => BUTTON_CSS.to_string(),
        ComponentKind::Card => CARD_CSS.to_string(),
        ComponentKind::Input => INPUT_CSS.to_string(),
        ComponentKind::Navbar | ComponentKind::Modal | ComponentKind::Table => {
            format!("/* CSS for {component} component */")
        }
    }
}
