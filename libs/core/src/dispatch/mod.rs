//! Action dispatch: pick the variant, normalize its inputs, compose the body
//! for the selected delivery mode and hand it to the transport.

mod compose;
mod mode;
pub mod normalize;
mod params;

use serde_json::Value;
use tracing::{Instrument, error, info};

pub use compose::{
    Composed, Payload, compose, native_buttons, native_list, native_template, native_text,
    proxy_buttons, proxy_list, proxy_template, proxy_text,
};
pub use mode::DeliveryMode;
pub use params::{
    Action, HeaderAction, ListButton, ListButtons, NodeParameters, ParameterCollection,
    ParseActionError, PlainButton, PlainButtonCollection, SectionCollection, SectionInput,
    TemplateParameter,
};

use crate::config::{ApiConfig, Credentials};
use crate::errors::{DispatchError, SendError};
use crate::telemetry;
use crate::transport::Transport;

/// Runs one invocation per call: exactly one request, awaited before returning.
pub struct Dispatcher<T> {
    transport: T,
    api: ApiConfig,
    credentials: Credentials,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, api: ApiConfig, credentials: Credentials) -> Self {
        Self {
            transport,
            api,
            credentials,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    /// Sends the message described by `params` and returns the raw response
    /// body. Any failure is logged with the action and wrapped in a
    /// [`DispatchError`] that keeps the original cause.
    pub async fn execute(&self, params: &NodeParameters) -> Result<Value, DispatchError> {
        let action = params.action;
        let mode = params.delivery_mode();
        let span = telemetry::send_span(action, &mode);
        let recorder = span.clone();

        async move {
            match self.send(params, &mode).await {
                Ok(response) => {
                    telemetry::record_message_id(&recorder, &response);
                    info!("whatsapp message sent");
                    Ok(response)
                }
                Err(source) => {
                    error!(action = %action, error = %source, "request to WhatsApp API failed");
                    Err(DispatchError::new(action, source))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn send(&self, params: &NodeParameters, mode: &DeliveryMode) -> Result<Value, SendError> {
        let composed = compose(params, mode)?;
        let url = match mode {
            DeliveryMode::Native => self.api.messages_url(&composed.sender.id),
            DeliveryMode::Proxy { url } => url.clone(),
        };
        let body = serde_json::to_value(&composed.payload).map_err(SendError::Encode)?;
        let response = self
            .transport
            .post_json(&url, &self.credentials.api_key, &body)
            .await?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ComposeError, TransportError};
    use crate::testkit::RecordingTransport;
    use serde_json::json;
    use tracing_test::traced_test;

    fn dispatcher() -> Dispatcher<RecordingTransport> {
        Dispatcher::new(
            RecordingTransport::default(),
            ApiConfig::new("https://graph.test/v20.0"),
            Credentials::new("secret", "waba-1"),
        )
    }

    fn params(action: Action) -> NodeParameters {
        NodeParameters {
            action,
            message: "hello".into(),
            phone_number: "15550001111".into(),
            sender_phone_dynamic_option: json!({"id": "1098"}).to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn native_send_targets_sender_messages_endpoint() {
        let dispatcher = dispatcher();
        let response = dispatcher.execute(&params(Action::Message)).await.unwrap();
        assert_eq!(response["messages"][0]["id"], "wamid.test");

        let requests = dispatcher.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://graph.test/v20.0/1098/messages");
        assert_eq!(requests[0].token, "secret");
        assert_eq!(requests[0].body["type"], "text");
    }

    #[tokio::test]
    async fn proxy_url_is_ignored_without_toggle() {
        let dispatcher = dispatcher();
        let mut p = params(Action::Message);
        p.proxy_url = "https://proxy.local/send".into();
        dispatcher.execute(&p).await.unwrap();

        p.proxy_url_toggle = true;
        dispatcher.execute(&p).await.unwrap();

        let requests = dispatcher.transport().requests();
        assert_eq!(requests[0].url, "https://graph.test/v20.0/1098/messages");
        assert_eq!(requests[0].body["messaging_product"], "whatsapp");
        assert_eq!(requests[1].url, "https://proxy.local/send");
        assert_eq!(requests[1].body["messageBody"], "hello");
    }

    #[tokio::test]
    #[traced_test]
    async fn transport_failure_names_the_action() {
        let dispatcher = dispatcher();
        dispatcher.transport().fail_next(TransportError::Status {
            status: 401,
            body: "{\"error\":\"invalid token\"}".into(),
        });

        let err = dispatcher
            .execute(&params(Action::InteractiveButtons))
            .await
            .expect_err("scripted failure");
        assert_eq!(err.action, Action::InteractiveButtons);
        assert!(err.to_string().contains("interactiveButtons"));
        assert_eq!(err.transport().and_then(TransportError::status), Some(401));
        assert!(logs_contain("request to WhatsApp API failed"));
        assert!(logs_contain("action=interactiveButtons"));
    }

    #[tokio::test]
    async fn compose_errors_never_reach_the_transport() {
        let dispatcher = dispatcher();
        let mut p = params(Action::InteractiveList);
        p.button_with_description = SectionCollection {
            section: vec![SectionInput::default(); 11],
        };
        let err = dispatcher.execute(&p).await.expect_err("eleven sections");
        assert!(matches!(
            err.source,
            SendError::Compose(ComposeError::TooManySections { .. })
        ));
        assert!(dispatcher.transport().requests().is_empty());
    }
}
