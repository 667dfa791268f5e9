//! Value types for templates, interactive elements and sender numbers.

mod interactive;
mod phone;
mod template;

pub use interactive::{ReplyButton, Row, Section};
pub use phone::PhoneNumber;
pub use template::{Button, ButtonKind, Component, SelectedTemplate, Template};
