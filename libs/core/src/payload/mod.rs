//! Wire shapes of the send-message request bodies.
//!
//! [`OutboundMessage`] is the platform's native body and is only produced by
//! [`PayloadBuilder`]. [`proxy::ProxyEnvelope`] is the simplified envelope sent
//! to a caller-supplied endpoint instead.

use serde::Serialize;

use crate::model::{ReplyButton, Section};

mod builder;
pub mod proxy;

pub use builder::{BodyComponent, HeaderComponent, MAX_LIST_SECTIONS, MAX_REPLY_BUTTONS};
pub use builder::{PayloadBuilder, state};
pub(crate) use builder::{check_list_sections, check_reply_buttons};

pub const MESSAGING_PRODUCT: &str = "whatsapp";

/// Native send-message body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub messaging_product: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_type: Option<RecipientType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(flatten)]
    pub content: MessageContent,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AuxComponent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    Individual,
}

/// Exactly one content block, tagged by the message `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    Text { text: TextBody },
    Interactive { interactive: Interactive },
    Template { template: TemplatePayload },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBody {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interactive {
    #[serde(flatten)]
    pub kind: InteractiveKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<InteractiveHeader>,
    pub body: BodyText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<BodyText>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InteractiveKind {
    Button { action: ButtonAction },
    List { action: ListAction },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyText {
    pub text: String,
}

impl BodyText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonAction {
    pub buttons: Vec<ActionButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ActionButton {
    Reply { reply: ReplyButton },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListAction {
    pub button: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InteractiveHeader {
    Text { text: String },
    Image { image: MediaLink },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaLink {
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplatePayload {
    pub name: String,
    pub language: Language,
    pub components: Vec<TemplateComponent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TemplateComponent {
    Body { parameters: Vec<Parameter> },
    Header { parameters: Vec<Parameter> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Parameter {
    Text { text: String },
    Image { image: MediaLink },
}

/// Message-level components appended next to a template (footer text and
/// reply-style buttons).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuxComponent {
    Footer { text: String },
    Buttons { buttons: Vec<ActionButton> },
}
