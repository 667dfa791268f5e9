//! Stands in for the hosting workflow engine: resolves parameters and
//! credentials, runs one invocation and prints the raw JSON result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use wabtn_core::config::{DEFAULT_API_BASE, ENV_API_BASE};
use wabtn_core::transport::Transport;
use wabtn_core::{
    Action, ApiConfig, Credentials, Dispatcher, HttpTransport, phone_number_options,
    template_options,
};

mod inputs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Send WhatsApp Business interactive messages")]
struct Cli {
    /// Versioned Graph API base url
    #[arg(long, global = true, env = ENV_API_BASE, default_value = DEFAULT_API_BASE)]
    api_base: String,
    /// JSON file with `apiKey` and `businessAccountID`; falls back to
    /// WHATSAPP_API_KEY / WHATSAPP_BUSINESS_ACCOUNT_ID
    #[arg(long, global = true, env = "WHATSAPP_CREDENTIALS")]
    credentials: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send one message described by a node-parameters JSON document
    Send {
        /// Parameters file, or `-` for stdin
        #[arg(long)]
        params: PathBuf,
        /// Overrides the `action` of the parameters document
        #[arg(long)]
        action: Option<Action>,
    },
    /// List sender phone numbers as name/value options
    PhoneNumbers,
    /// List message templates as name/value options
    Templates,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    wabtn_telemetry::install("wabtn-send")?;
    let result = run(cli).await;
    wabtn_telemetry::shutdown();
    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<Value> {
    let credentials = inputs::load_credentials(cli.credentials.as_deref())?;
    let api = ApiConfig::new(cli.api_base);
    let transport = HttpTransport::with_user_agent().context("failed to build http client")?;
    info!(api_base = %api.base_url(), "wabtn-send starting");
    execute(cli.command, transport, api, credentials).await
}

async fn execute<T: Transport>(
    command: Commands,
    transport: T,
    api: ApiConfig,
    credentials: Credentials,
) -> Result<Value> {
    match command {
        Commands::Send { params, action } => {
            let mut params = inputs::load_params(&params)?;
            if let Some(action) = action {
                params.action = action;
            }
            let dispatcher = Dispatcher::new(transport, api, credentials);
            Ok(dispatcher.execute(&params).await?)
        }
        Commands::PhoneNumbers => {
            let options = phone_number_options(&transport, &api, &credentials).await?;
            Ok(serde_json::to_value(options)?)
        }
        Commands::Templates => {
            let options = template_options(&transport, &api, &credentials).await?;
            Ok(serde_json::to_value(options)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;
    use std::io::Write;
    use std::sync::Arc;
    use wabtn_core::testkit::RecordingTransport;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_send_with_action_override() {
        let cli = Cli::try_parse_from([
            "wabtn-send",
            "send",
            "--params",
            "params.json",
            "--action",
            "interactiveList",
        ])
        .unwrap();
        match cli.command {
            Commands::Send { action, .. } => assert_eq!(action, Some(Action::InteractiveList)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[tokio::test]
    async fn send_applies_action_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let params = json!({
            "action": "interactiveButtons",
            "message": "hello",
            "phoneNumber": "15550001111",
            "senderPhoneDynamicOption": "{\"id\":\"1098\"}"
        });
        write!(file, "{params}").unwrap();

        let transport = Arc::new(RecordingTransport::default());
        let response = execute(
            Commands::Send {
                params: file.path().to_path_buf(),
                action: Some(Action::Message),
            },
            transport.clone(),
            ApiConfig::new("https://graph.test/v20.0"),
            Credentials::new("secret", "waba-1"),
        )
        .await
        .unwrap();

        assert_eq!(response["messages"][0]["id"], "wamid.test");
        assert_eq!(transport.last_body().unwrap()["type"], "text");
    }

    #[tokio::test]
    async fn failures_carry_the_action_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let params = json!({"action": "template", "senderPhoneDynamicOption": "{\"id\":\"1\"}"});
        write!(file, "{params}").unwrap();

        let err = execute(
            Commands::Send {
                params: file.path().to_path_buf(),
                action: None,
            },
            RecordingTransport::default(),
            ApiConfig::default(),
            Credentials::new("secret", "waba-1"),
        )
        .await
        .expect_err("empty template selection");
        assert!(err.to_string().starts_with("template request"), "{err}");
    }
}
