//! Simplified envelopes posted to a caller-supplied proxy endpoint.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::Value;

use super::BodyText;
use crate::dispatch::{PlainButton, SectionInput};
use crate::model::SelectedTemplate;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\d+)\}\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProxyEnvelope {
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub body: ProxyBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ProxyBody {
    Text {
        message_body: String,
    },
    Interactive {
        message_body: String,
        #[serde(flatten)]
        data: InteractiveData,
    },
    Template {
        #[serde(skip_serializing_if = "Option::is_none")]
        message_body: Option<String>,
        template_data: TemplateData,
        /// The selected record, forwarded as listed.
        template_information: Value,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InteractiveData {
    #[serde(rename = "interactiveButtonData")]
    Buttons(ButtonData),
    #[serde(rename = "interactiveListData")]
    List(ListData),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonData {
    pub body: BodyText,
    pub buttons: Vec<PlainButton>,
}

/// List data keeps the sections in the shape they were entered, without
/// synthesized row ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListData {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<ProxyHeader>,
    pub body: BodyText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    pub sections: Vec<SectionInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProxyHeader {
    Image { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TemplateData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<ProxyHeader>,
    pub body: TemplateDataBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TemplateDataBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
}

impl ProxyEnvelope {
    pub fn text(from: &str, to: &str, message: &str) -> Self {
        Self::new(
            from,
            to,
            ProxyBody::Text {
                message_body: message.to_string(),
            },
        )
    }

    pub fn buttons(from: &str, to: &str, message: &str, buttons: &[PlainButton]) -> Self {
        Self::new(
            from,
            to,
            ProxyBody::Interactive {
                message_body: message.to_string(),
                data: InteractiveData::Buttons(ButtonData {
                    body: BodyText::new(message),
                    buttons: buttons.to_vec(),
                }),
            },
        )
    }

    /// `footer` and `header_image` are left out of the envelope when empty.
    pub fn list(
        from: &str,
        to: &str,
        message: &str,
        title: &str,
        sections: &[SectionInput],
        footer: &str,
        header_image: &str,
    ) -> Self {
        Self::new(
            from,
            to,
            ProxyBody::Interactive {
                message_body: message.to_string(),
                data: InteractiveData::List(ListData {
                    title: title.to_string(),
                    header: image_header(header_image),
                    body: BodyText::new(message),
                    footer: non_empty(footer),
                    sections: sections.to_vec(),
                }),
            },
        )
    }

    /// Renders the template body with `parameters` and ships the structured
    /// data next to it. Without a body text there is nothing to render and
    /// the parameters are not echoed.
    pub fn template(
        from: &str,
        to: &str,
        selected: &SelectedTemplate,
        parameters: &[String],
        header_image: &str,
    ) -> Self {
        let mut data = TemplateData {
            header: image_header(header_image),
            ..TemplateData::default()
        };
        let message_body = selected.template.body_text().map(|text| {
            if parameters.is_empty() {
                return text.to_string();
            }
            data.body.parameters = Some(parameters.to_vec());
            render_placeholders(text, parameters).into_owned()
        });

        Self::new(
            from,
            to,
            ProxyBody::Template {
                message_body,
                template_data: data,
                template_information: selected.record.clone(),
            },
        )
    }

    fn new(from: &str, to: &str, body: ProxyBody) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            body,
        }
    }
}

/// Replaces every `{{n}}` with `parameters[n - 1]` in one pass. Placeholders
/// past the supplied parameters stay verbatim; surplus parameters are ignored.
pub fn render_placeholders<'a>(text: &'a str, parameters: &[String]) -> Cow<'a, str> {
    PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| parameters.get(idx))
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    })
}

fn image_header(url: &str) -> Option<ProxyHeader> {
    non_empty(url).map(|url| ProxyHeader::Image { url })
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
