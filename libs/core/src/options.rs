//! Dropdown population: list sender numbers and templates of the business
//! account as `{name, value}` pairs. `value` is the record's own JSON, which
//! the host hands back verbatim on send. Records that do not match the
//! expected shape are still listed, labelled from whatever fields they carry.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{Instrument, debug, warn};

use crate::config::{ApiConfig, Credentials};
use crate::errors::OptionsError;
use crate::model::{PhoneNumber, Template};
use crate::telemetry;
use crate::transport::Transport;

pub const NO_PHONE_NUMBERS: &str = "No Phone Numbers Available";
pub const NO_TEMPLATES: &str = "No Templates Available";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub name: String,
    pub value: String,
}

impl OptionEntry {
    fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: String::new(),
        }
    }
}

#[derive(Deserialize)]
struct Listing {
    #[serde(default)]
    data: Vec<Value>,
}

pub async fn phone_number_options<T>(
    transport: &T,
    api: &ApiConfig,
    credentials: &Credentials,
) -> Result<Vec<OptionEntry>, OptionsError>
where
    T: Transport + ?Sized,
{
    let url = api.phone_numbers_url(&credentials.business_account_id);
    let labels = Labels {
        typed: |record| {
            serde_json::from_value::<PhoneNumber>(record.clone()).map(|phone| phone.label())
        },
        raw: |record| {
            format!(
                "{} - {}",
                text_field(record, "display_phone_number"),
                text_field(record, "verified_name")
            )
        },
    };
    list_options(transport, "phone_numbers", &url, credentials, NO_PHONE_NUMBERS, labels).await
}

pub async fn template_options<T>(
    transport: &T,
    api: &ApiConfig,
    credentials: &Credentials,
) -> Result<Vec<OptionEntry>, OptionsError>
where
    T: Transport + ?Sized,
{
    let url = api.templates_url(&credentials.business_account_id);
    let labels = Labels {
        typed: |record| serde_json::from_value::<Template>(record.clone()).map(|t| t.name),
        raw: |record| text_field(record, "name").to_string(),
    };
    list_options(transport, "message_templates", &url, credentials, NO_TEMPLATES, labels).await
}

/// `typed` labels a record through the model; `raw` is used when it does not decode.
struct Labels {
    typed: fn(&Value) -> Result<String, serde_json::Error>,
    raw: fn(&Value) -> String,
}

fn text_field<'a>(record: &'a Value, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or_default()
}

async fn list_options<T>(
    transport: &T,
    resource: &'static str,
    url: &str,
    credentials: &Credentials,
    empty_label: &str,
    labels: Labels,
) -> Result<Vec<OptionEntry>, OptionsError>
where
    T: Transport + ?Sized,
{
    let span = telemetry::options_span(resource, &credentials.business_account_id);
    let recorder = span.clone();
    async move {
        let response = transport.get_json(url, &credentials.api_key).await?;
        let listing: Listing = serde_json::from_value(response)
            .map_err(|source| OptionsError::Decode { resource, source })?;
        recorder.record("count", listing.data.len());
        debug!(count = listing.data.len(), "listed options");

        if listing.data.is_empty() {
            return Ok(vec![OptionEntry::placeholder(empty_label)]);
        }
        Ok(listing
            .data
            .iter()
            .map(|record| {
                let name = (labels.typed)(record).unwrap_or_else(|err| {
                    warn!(resource, error = %err, "listing record has an unexpected shape");
                    (labels.raw)(record)
                });
                OptionEntry {
                    name,
                    value: record.to_string(),
                }
            })
            .collect())
    }
    .instrument(span)
    .await
}
