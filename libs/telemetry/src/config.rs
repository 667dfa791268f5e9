use std::env;

pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtlpProtocol {
    Grpc,
    HttpProtobuf,
}

/// Subscriber settings resolved from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub json_logs: bool,
    pub otlp_endpoint: Option<String>,
    pub protocol: OtlpProtocol,
}

impl TelemetryConfig {
    pub fn from_env(service_name: &str, service_version: &str) -> Self {
        Self::from_lookup(service_name, service_version, |key| env::var(key).ok())
    }

    /// Same as [`TelemetryConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup<F>(service_name: &str, service_version: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let json_logs = lookup("LOG_FORMAT")
            .map(|v| !matches!(v.to_lowercase().as_str(), "text" | "pretty" | "plain"))
            .unwrap_or(true);
        let otel_enabled = lookup("ENABLE_OTEL")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);
        let otlp_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT")
            .map(|v| v.trim().to_string())
            .filter(|v| otel_enabled && !v.is_empty());
        let protocol = match lookup("OTEL_EXPORTER_OTLP_PROTOCOL")
            .map(|v| v.to_lowercase())
            .as_deref()
        {
            Some("http" | "http/protobuf") => OtlpProtocol::HttpProtobuf,
            _ => OtlpProtocol::Grpc,
        };

        Self {
            service_name: lookup("OTEL_SERVICE_NAME").unwrap_or_else(|| service_name.to_string()),
            service_version: service_version.to_string(),
            json_logs,
            otlp_endpoint,
            protocol,
        }
    }

    pub fn exporter_enabled(&self) -> bool {
        self.otlp_endpoint.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> TelemetryConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TelemetryConfig::from_lookup("wabtn-send", "0.1.0", |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_json_logs_without_export() {
        let cfg = config(&[]);
        assert!(cfg.json_logs);
        assert!(!cfg.exporter_enabled());
        assert_eq!(cfg.service_name, "wabtn-send");
        assert_eq!(cfg.protocol, OtlpProtocol::Grpc);
    }

    #[test]
    fn plain_formats_disable_json() {
        for format in ["text", "Pretty", "PLAIN"] {
            assert!(!config(&[("LOG_FORMAT", format)]).json_logs, "{format}");
        }
        assert!(config(&[("LOG_FORMAT", "json")]).json_logs);
    }

    #[test]
    fn export_needs_flag_and_endpoint() {
        let endpoint_only = config(&[("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4317")]);
        assert!(!endpoint_only.exporter_enabled());
        let blank = config(&[("ENABLE_OTEL", "true"), ("OTEL_EXPORTER_OTLP_ENDPOINT", " ")]);
        assert!(!blank.exporter_enabled());

        let cfg = config(&[
            ("ENABLE_OTEL", "yes"),
            ("OTEL_EXPORTER_OTLP_ENDPOINT", "http://collector:4318"),
            ("OTEL_EXPORTER_OTLP_PROTOCOL", "http/protobuf"),
        ]);
        assert_eq!(cfg.otlp_endpoint.as_deref(), Some("http://collector:4318"));
        assert_eq!(cfg.protocol, OtlpProtocol::HttpProtobuf);
    }
}
