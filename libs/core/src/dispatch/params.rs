use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::DeliveryMode;

/// Which message variant one invocation sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Message,
    #[default]
    InteractiveButtons,
    InteractiveList,
    Template,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Message,
        Action::InteractiveButtons,
        Action::InteractiveList,
        Action::Template,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Message => "message",
            Action::InteractiveButtons => "interactiveButtons",
            Action::InteractiveList => "interactiveList",
            Action::Template => "template",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action `{0}` (expected message, interactiveButtons, interactiveList or template)")]
pub struct ParseActionError(String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderAction {
    #[default]
    None,
    Image,
}

/// `plainButton.fieldValues[]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainButton {
    #[serde(default)]
    pub button_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_description: Option<String>,
}

/// `buttonWithDescription.section[].buttonInSection.buttons[]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListButton {
    #[serde(default)]
    pub button_title: String,
    #[serde(default)]
    pub button_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListButtons {
    #[serde(default)]
    pub buttons: Vec<ListButton>,
}

/// `buttonWithDescription.section[]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionInput {
    #[serde(default)]
    pub section_title: String,
    #[serde(default)]
    pub button_in_section: ListButtons,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateParameter {
    #[serde(default)]
    pub parameter_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainButtonCollection {
    #[serde(default)]
    pub field_values: Vec<PlainButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectionCollection {
    #[serde(default)]
    pub section: Vec<SectionInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterCollection {
    #[serde(default)]
    pub parameters: Vec<TemplateParameter>,
}

/// Parameters resolved by the hosting workflow engine for one invocation,
/// under the engine's own parameter names. Absent fields take the engine's
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeParameters {
    pub action: Action,
    pub message: String,
    pub list_title: String,
    pub phone_number: String,
    /// Serialized [`PhoneNumber`](crate::model::PhoneNumber) record.
    pub sender_phone_dynamic_option: String,
    /// Serialized [`Template`](crate::model::Template) record.
    pub templates: String,
    pub header_action: HeaderAction,
    #[serde(rename = "headerImageURL")]
    pub header_image_url: String,
    pub footer_toggle: bool,
    pub footer: String,
    pub proxy_url_toggle: bool,
    pub proxy_url: String,
    pub plain_button: PlainButtonCollection,
    pub button_with_description: SectionCollection,
    pub template_parameter_list: ParameterCollection,
}

impl NodeParameters {
    /// Native vs proxy, decided once per invocation.
    pub fn delivery_mode(&self) -> DeliveryMode {
        DeliveryMode::select(&self.proxy_url, self.proxy_url_toggle)
    }

    /// Footer text, empty unless the footer toggle is on.
    pub fn footer_text(&self) -> &str {
        if self.footer_toggle {
            self.footer.as_str()
        } else {
            ""
        }
    }

    /// Header image url, empty unless the image header is selected.
    pub fn header_image(&self) -> &str {
        match self.header_action {
            HeaderAction::Image => self.header_image_url.as_str(),
            HeaderAction::None => "",
        }
    }

    pub fn plain_buttons(&self) -> &[PlainButton] {
        &self.plain_button.field_values
    }

    pub fn sections(&self) -> &[SectionInput] {
        &self.button_with_description.section
    }

    /// Template parameter values in input order.
    pub fn template_values(&self) -> Vec<String> {
        self.template_parameter_list
            .parameters
            .iter()
            .map(|p| p.parameter_value.clone())
            .collect()
    }
}
