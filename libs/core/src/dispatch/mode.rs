/// Where one invocation's request goes, and in which shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Platform endpoint, platform wire format.
    Native,
    /// Caller-supplied endpoint, simplified envelope.
    Proxy { url: String },
}

impl DeliveryMode {
    /// Proxy mode needs both the toggle and a non-empty url.
    pub fn select(proxy_url: &str, enabled: bool) -> Self {
        if enabled && !proxy_url.is_empty() {
            DeliveryMode::Proxy {
                url: proxy_url.to_string(),
            }
        } else {
            DeliveryMode::Native
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMode::Native => "native",
            DeliveryMode::Proxy { .. } => "proxy",
        }
    }

    pub fn is_proxy(&self) -> bool {
        matches!(self, DeliveryMode::Proxy { .. })
    }
}
