use serde_json::Value;
use tracing::Span;
use tracing::field::Empty;

use crate::dispatch::{Action, DeliveryMode};

/// Span wrapping one send invocation. `message_id` is recorded once the
/// platform answers.
pub fn send_span(action: Action, mode: &DeliveryMode) -> Span {
    tracing::info_span!(
        "whatsapp.send",
        action = %action,
        mode = mode.as_str(),
        message_id = Empty,
    )
}

/// Span wrapping one option-provider listing.
pub fn options_span(resource: &'static str, business_account_id: &str) -> Span {
    tracing::info_span!(
        "whatsapp.options",
        resource,
        waba = %business_account_id,
        count = Empty,
    )
}

/// First message id of a send response, when the platform returned one.
pub fn message_id(response: &Value) -> Option<&str> {
    response
        .get("messages")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("id"))
        .and_then(|v| v.as_str())
}

pub fn record_message_id(span: &Span, response: &Value) {
    if let Some(id) = message_id(response) {
        span.record("message_id", tracing::field::display(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_first_message_id() {
        let response = json!({
            "messaging_product": "whatsapp",
            "contacts": [{"input": "15550001111", "wa_id": "15550001111"}],
            "messages": [{"id": "wamid.abc"}]
        });
        assert_eq!(message_id(&response), Some("wamid.abc"));
        assert_eq!(message_id(&json!({"ok": true})), None);
        assert_eq!(message_id(&Value::String("accepted".into())), None);
    }

    #[test]
    fn spans_accept_recorded_fields() {
        let span = send_span(Action::Template, &DeliveryMode::Native);
        record_message_id(&span, &json!({"messages": [{"id": "wamid.x"}]}));
        let span = options_span("templates", "waba-1");
        span.record("count", 3);
    }
}
