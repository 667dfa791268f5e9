use serde::{Deserialize, Serialize};

/// Business phone number registered on the account. Its `id` is the sender
/// used in the messages endpoint path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub id: String,
    #[serde(default)]
    pub display_phone_number: String,
    #[serde(default)]
    pub verified_name: String,
    #[serde(default)]
    pub code_verification_status: String,
}

impl PhoneNumber {
    /// Parses a sender selection as round-tripped through the host UI.
    pub fn from_selection(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Label shown in the host's sender dropdown.
    pub fn label(&self) -> String {
        format!("{} - {}", self.display_phone_number, self.verified_name)
    }
}
