use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A vendor-approved message template as listed by the `message_templates`
/// endpoint. Referenced in a send request by its `name` + `language` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Template {
    /// Parses a template selection as round-tripped through the host UI.
    pub fn from_selection(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Text of the first body component, placeholders included.
    pub fn body_text(&self) -> Option<&str> {
        self.components.iter().find_map(|component| match component {
            Component::Body { text } => text.as_deref(),
            _ => None,
        })
    }
}

/// A template picked in the host UI: the parsed view plus the record exactly
/// as it was listed, so fields this crate does not model survive a forward.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedTemplate {
    pub template: Template,
    pub record: Value,
}

impl SelectedTemplate {
    pub fn from_selection(raw: &str) -> Result<Self, serde_json::Error> {
        let record: Value = serde_json::from_str(raw)?;
        let template = Template::deserialize(&record)?;
        Ok(Self { template, record })
    }
}

/// Structural section of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Component {
    #[serde(alias = "header")]
    Header {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        format: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    #[serde(alias = "body")]
    Body {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    #[serde(alias = "footer")]
    Footer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    #[serde(alias = "buttons")]
    Buttons {
        #[serde(default)]
        buttons: Vec<Button>,
    },
    /// Component types this crate does not model (carousel, limited-time offer, ...).
    #[serde(other)]
    Other,
}

/// Button declared by a template. The platform caps the count; it is passed
/// through untouched here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    #[serde(rename = "type")]
    pub kind: ButtonKind,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ButtonKind {
    #[serde(alias = "reply")]
    Reply,
    #[serde(alias = "url")]
    Url,
    #[serde(alias = "phone_number")]
    PhoneNumber,
    #[serde(alias = "quick_reply")]
    QuickReply,
    #[serde(alias = "copy_code")]
    CopyCode,
    #[serde(other)]
    Other,
}
