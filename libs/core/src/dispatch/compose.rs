//! One pure function per (action, mode) pair. Nothing here touches the network.

use serde::Serialize;

use super::{Action, DeliveryMode, NodeParameters, normalize};
use crate::errors::SendError;
use crate::model::{PhoneNumber, SelectedTemplate, Template};
use crate::payload::proxy::ProxyEnvelope;
use crate::payload::{OutboundMessage, PayloadBuilder, check_list_sections, check_reply_buttons};

/// Request body of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Native(OutboundMessage),
    Proxy(ProxyEnvelope),
}

/// A finished request body together with the sender it was composed for.
#[derive(Debug, Clone, PartialEq)]
pub struct Composed {
    pub sender: PhoneNumber,
    pub payload: Payload,
}

/// Builds the request body for `params.action` in the given mode.
pub fn compose(params: &NodeParameters, mode: &DeliveryMode) -> Result<Composed, SendError> {
    let sender = normalize::sender(&params.sender_phone_dynamic_option)?;
    let from = sender.id.as_str();
    let payload = match (params.action, mode) {
        (Action::Message, DeliveryMode::Native) => Payload::Native(native_text(params, from)),
        (Action::Message, DeliveryMode::Proxy { .. }) => Payload::Proxy(proxy_text(params, from)),
        (Action::InteractiveButtons, DeliveryMode::Native) => {
            Payload::Native(native_buttons(params, from)?)
        }
        (Action::InteractiveButtons, DeliveryMode::Proxy { .. }) => {
            Payload::Proxy(proxy_buttons(params, from)?)
        }
        (Action::InteractiveList, DeliveryMode::Native) => {
            Payload::Native(native_list(params, from)?)
        }
        (Action::InteractiveList, DeliveryMode::Proxy { .. }) => {
            Payload::Proxy(proxy_list(params, from)?)
        }
        (Action::Template, DeliveryMode::Native) => {
            let selected = normalize::template(&params.templates)?;
            Payload::Native(native_template(params, from, &selected.template))
        }
        (Action::Template, DeliveryMode::Proxy { .. }) => {
            let selected = normalize::template(&params.templates)?;
            Payload::Proxy(proxy_template(params, from, &selected))
        }
    };
    Ok(Composed { sender, payload })
}

pub fn native_text(params: &NodeParameters, from: &str) -> OutboundMessage {
    PayloadBuilder::new()
        .recipient(params.phone_number.as_str())
        .sender(from)
        .plain_message(params.message.as_str())
        .build()
}

pub fn native_buttons(params: &NodeParameters, from: &str) -> Result<OutboundMessage, SendError> {
    let buttons = normalize::reply_buttons(params.plain_buttons())?;
    let builder = PayloadBuilder::new()
        .recipient(params.phone_number.as_str())
        .sender(from)
        .interactive_buttons(params.message.as_str(), buttons)?
        .footer(params.footer_text())
        .header_image(params.header_image());
    Ok(builder.build())
}

pub fn native_list(params: &NodeParameters, from: &str) -> Result<OutboundMessage, SendError> {
    let sections = normalize::list_sections(params.sections())?;
    let builder = PayloadBuilder::new()
        .recipient(params.phone_number.as_str())
        .sender(from)
        .interactive_list(params.message.as_str(), params.list_title.as_str(), sections)?
        .footer(params.footer_text())
        .header_image(params.header_image());
    Ok(builder.build())
}

/// Body parameters only when values were supplied; a header image only when
/// the image header is selected with a url.
pub fn native_template(
    params: &NodeParameters,
    from: &str,
    template: &Template,
) -> OutboundMessage {
    let mut builder = PayloadBuilder::new()
        .recipient(params.phone_number.as_str())
        .sender(from)
        .template(template.name.as_str(), template.language.as_str());

    let values = params.template_values();
    if !values.is_empty() {
        builder = builder.body_parameters(values);
    }
    let header = params.header_image();
    if !header.is_empty() {
        builder = builder.header_image(header);
    }
    builder.build()
}

pub fn proxy_text(params: &NodeParameters, from: &str) -> ProxyEnvelope {
    ProxyEnvelope::text(from, &params.phone_number, &params.message)
}

pub fn proxy_buttons(params: &NodeParameters, from: &str) -> Result<ProxyEnvelope, SendError> {
    let buttons = params.plain_buttons();
    check_reply_buttons(buttons.len())?;
    Ok(ProxyEnvelope::buttons(
        from,
        &params.phone_number,
        &params.message,
        buttons,
    ))
}

pub fn proxy_list(params: &NodeParameters, from: &str) -> Result<ProxyEnvelope, SendError> {
    let sections = params.sections();
    check_list_sections(sections.len())?;
    Ok(ProxyEnvelope::list(
        from,
        &params.phone_number,
        &params.message,
        &params.list_title,
        sections,
        params.footer_text(),
        params.header_image(),
    ))
}

pub fn proxy_template(
    params: &NodeParameters,
    from: &str,
    selected: &SelectedTemplate,
) -> ProxyEnvelope {
    ProxyEnvelope::template(
        from,
        &params.phone_number,
        selected,
        &params.template_values(),
        params.header_image(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{HeaderAction, PlainButton, PlainButtonCollection};
    use crate::errors::ComposeError;
    use serde_json::{Value, json};

    const SENDER: &str = r#"{"id":"1098","display_phone_number":"+1 555 0100","verified_name":"Acme"}"#;

    fn params(action: Action) -> NodeParameters {
        NodeParameters {
            action,
            message: "hello".into(),
            phone_number: "15550001111".into(),
            sender_phone_dynamic_option: SENDER.into(),
            ..Default::default()
        }
    }

    fn to_json(composed: &Composed) -> Value {
        serde_json::to_value(&composed.payload).unwrap()
    }

    #[test]
    fn text_in_both_modes() {
        let native = compose(&params(Action::Message), &DeliveryMode::Native).unwrap();
        assert_eq!(native.sender.id, "1098");
        assert_eq!(
            to_json(&native),
            json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": "15550001111",
                "from": "1098",
                "type": "text",
                "text": {"body": "hello"}
            })
        );

        let proxy = compose(
            &params(Action::Message),
            &DeliveryMode::Proxy {
                url: "https://proxy.local".into(),
            },
        )
        .unwrap();
        assert_eq!(
            to_json(&proxy),
            json!({"from": "1098", "to": "15550001111", "type": "text", "messageBody": "hello"})
        );
    }

    #[test]
    fn button_ceiling_applies_to_proxy_too() {
        let mut p = params(Action::InteractiveButtons);
        p.plain_button = PlainButtonCollection {
            field_values: (0..4)
                .map(|i| PlainButton {
                    button_title: format!("B{i}"),
                    button_description: None,
                })
                .collect(),
        };
        for mode in [
            DeliveryMode::Native,
            DeliveryMode::Proxy {
                url: "https://proxy.local".into(),
            },
        ] {
            let err = compose(&p, &mode).expect_err("four buttons");
            assert!(matches!(
                err,
                SendError::Compose(ComposeError::TooManyButtons { count: 4, max: 3 })
            ));
        }
    }

    #[test]
    fn template_header_only_when_image_selected() {
        let mut p = params(Action::Template);
        p.templates = json!({"name": "promo", "language": "en_US", "components": []}).to_string();
        p.header_image_url = "https://x/h.png".into();

        let value = to_json(&compose(&p, &DeliveryMode::Native).unwrap());
        assert_eq!(value["template"]["components"], json!([]));

        p.header_action = HeaderAction::Image;
        let value = to_json(&compose(&p, &DeliveryMode::Native).unwrap());
        assert_eq!(
            value["template"]["components"],
            json!([{"type": "header", "parameters": [
                {"type": "image", "image": {"link": "https://x/h.png"}}
            ]}])
        );
    }

    #[test]
    fn malformed_sender_aborts_before_composing() {
        let mut p = params(Action::Message);
        p.sender_phone_dynamic_option = "not json".into();
        assert!(matches!(
            compose(&p, &DeliveryMode::Native),
            Err(SendError::Selection {
                field: "senderPhoneDynamicOption",
                ..
            })
        ));
    }
}
