//! WhatsApp Business message composition.
//!
//! Turns a host's node parameters into one of four send-message bodies (plain
//! text, reply buttons, list, template), either in the platform's native wire
//! format or as the simplified proxy envelope, and posts it through a
//! [`transport::Transport`]. Option providers list the sender numbers and
//! templates a host offers for selection.
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod model;
pub mod options;
pub mod payload;
pub mod telemetry;
#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
pub mod transport;

pub use config::{ApiConfig, Credentials};
pub use dispatch::{Action, DeliveryMode, Dispatcher, NodeParameters};
pub use errors::{
    ComposeError, ConfigError, DispatchError, OptionsError, SendError, TransportError,
};
pub use options::{OptionEntry, phone_number_options, template_options};
pub use payload::PayloadBuilder;
pub use transport::{HttpTransport, Transport};

/// Returns the semantic version advertised by this crate.
///
/// ```
/// assert_eq!(wabtn_core::version(), env!("CARGO_PKG_VERSION"));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
