use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use wabtn_core::{Credentials, NodeParameters};

/// Reads node parameters from a JSON file, or stdin when `path` is `-`.
pub fn load_params(path: &Path) -> Result<NodeParameters> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read parameters from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read parameters from {}", path.display()))?
    };
    parse_params(&raw)
}

pub fn parse_params(raw: &str) -> Result<NodeParameters> {
    serde_json::from_str(raw).context("node parameters are not valid JSON")
}

/// Credentials from a `{apiKey, businessAccountID}` file when given, otherwise
/// from the environment.
pub fn load_credentials(path: Option<&Path>) -> Result<Credentials> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read credentials from {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid credentials file {}", path.display()))
        }
        None => Credentials::from_env().context("no credentials file given"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wabtn_core::Action;

    #[test]
    fn reads_params_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"action":"template","phoneNumber":"15550001111","templates":"{{}}"}}"#
        )
        .unwrap();
        let params = load_params(file.path()).unwrap();
        assert_eq!(params.action, Action::Template);
        assert_eq!(params.phone_number, "15550001111");
    }

    #[test]
    fn reports_bad_json_with_context() {
        let err = parse_params("{not json").unwrap_err();
        assert!(err.to_string().contains("node parameters"));
    }

    #[test]
    fn reads_credentials_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"apiKey":"secret","businessAccountID":"waba-1"}}"#).unwrap();
        let creds = load_credentials(Some(file.path())).unwrap();
        assert_eq!(creds.business_account_id, "waba-1");

        let missing = load_credentials(Some(Path::new("/nonexistent/creds.json"))).unwrap_err();
        assert!(missing.to_string().contains("/nonexistent/creds.json"));
    }
}
