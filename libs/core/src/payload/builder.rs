use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use super::{
    ActionButton, AuxComponent, BodyText, ButtonAction, Interactive, InteractiveHeader,
    InteractiveKind, Language, ListAction, MESSAGING_PRODUCT, MediaLink, OutboundMessage,
    Parameter, RecipientType, TemplateComponent, TemplatePayload, TextBody,
};
use crate::errors::{ComponentKind, ComposeError};
use crate::model::{ReplyButton, Section};

/// Platform ceiling on reply buttons in one interactive button message.
pub const MAX_REPLY_BUTTONS: usize = 3;
/// Platform ceiling on sections in one interactive list message.
pub const MAX_LIST_SECTIONS: usize = 10;

static NEXT_BUILDER_ID: AtomicU64 = AtomicU64::new(1);

/// Message-type states of [`PayloadBuilder`]. The type parameter fixes which
/// content setters exist, so a builder never carries two message types.
pub mod state {
    use crate::payload::{MessageContent, TemplatePayload, TextBody};

    #[derive(Debug, Clone, Default)]
    pub struct Unset;

    #[derive(Debug, Clone)]
    pub struct Text(pub(super) TextBody);

    #[derive(Debug, Clone)]
    pub struct Template(pub(super) TemplatePayload);

    #[derive(Debug, Clone)]
    pub struct Interactive(pub(super) crate::payload::Interactive);

    pub trait Content: sealed::Sealed {
        #[doc(hidden)]
        fn content(&self) -> MessageContent;
    }

    impl Content for Text {
        fn content(&self) -> MessageContent {
            MessageContent::Text {
                text: self.0.clone(),
            }
        }
    }

    impl Content for Template {
        fn content(&self) -> MessageContent {
            MessageContent::Template {
                template: self.0.clone(),
            }
        }
    }

    impl Content for Interactive {
        fn content(&self) -> MessageContent {
            MessageContent::Interactive {
                interactive: self.0.clone(),
            }
        }
    }

    mod sealed {
        pub trait Sealed {}
        impl Sealed for super::Text {}
        impl Sealed for super::Template {}
        impl Sealed for super::Interactive {}
    }
}

/// Position of a template body component inside the builder that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyComponent {
    builder: u64,
    index: usize,
}

/// Position of a template header component inside the builder that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderComponent {
    builder: u64,
    index: usize,
}

/// Value-style assembler for the native [`OutboundMessage`].
///
/// Every step consumes the builder and returns the next one; `build` reads
/// without consuming, so building twice yields equal payloads.
///
/// ```
/// use wabtn_core::payload::PayloadBuilder;
///
/// let message = PayloadBuilder::new()
///     .recipient("15550001111")
///     .sender("1098")
///     .plain_message("hello")
///     .build();
/// assert_eq!(serde_json::to_value(&message).unwrap()["text"]["body"], "hello");
/// ```
#[derive(Debug, Clone)]
pub struct PayloadBuilder<S = state::Unset> {
    id: u64,
    to: Option<String>,
    from: Option<String>,
    components: Vec<AuxComponent>,
    state: S,
}

impl Default for PayloadBuilder<state::Unset> {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadBuilder<state::Unset> {
    pub fn new() -> Self {
        Self {
            id: NEXT_BUILDER_ID.fetch_add(1, Ordering::Relaxed),
            to: None,
            from: None,
            components: Vec::new(),
            state: state::Unset,
        }
    }

    pub fn plain_message(self, text: impl Into<String>) -> PayloadBuilder<state::Text> {
        self.with_state(state::Text(TextBody { body: text.into() }))
    }

    /// Starts a template message with an empty component list.
    pub fn template(
        self,
        name: impl Into<String>,
        language_code: impl Into<String>,
    ) -> PayloadBuilder<state::Template> {
        self.with_state(state::Template(TemplatePayload {
            name: name.into(),
            language: Language {
                code: language_code.into(),
            },
            components: Vec::new(),
        }))
    }

    pub fn interactive_buttons(
        self,
        body_text: impl Into<String>,
        buttons: Vec<ReplyButton>,
    ) -> Result<PayloadBuilder<state::Interactive>, ComposeError> {
        check_reply_buttons(buttons.len())?;
        let buttons = buttons
            .into_iter()
            .map(|reply| ActionButton::Reply { reply })
            .collect();
        Ok(self.with_state(state::Interactive(Interactive {
            kind: InteractiveKind::Button {
                action: ButtonAction { buttons },
            },
            header: None,
            body: BodyText::new(body_text),
            footer: None,
        })))
    }

    pub fn interactive_list(
        self,
        body_text: impl Into<String>,
        button_label: impl Into<String>,
        sections: Vec<Section>,
    ) -> Result<PayloadBuilder<state::Interactive>, ComposeError> {
        check_list_sections(sections.len())?;
        Ok(self.with_state(state::Interactive(Interactive {
            kind: InteractiveKind::List {
                action: ListAction {
                    button: button_label.into(),
                    sections,
                },
            },
            header: None,
            body: BodyText::new(body_text),
            footer: None,
        })))
    }

    fn with_state<N>(self, state: N) -> PayloadBuilder<N> {
        PayloadBuilder {
            id: self.id,
            to: self.to,
            from: self.from,
            components: self.components,
            state,
        }
    }
}

impl<S> PayloadBuilder<S> {
    /// Sets the destination number. No format validation; the platform does that.
    pub fn recipient(mut self, phone_number: impl Into<String>) -> Self {
        self.to = Some(phone_number.into());
        self
    }

    /// Sets the sending phone-number id.
    pub fn sender(mut self, phone_number_id: impl Into<String>) -> Self {
        self.from = Some(phone_number_id.into());
        self
    }
}

impl PayloadBuilder<state::Template> {
    /// Appends an empty body component and returns its handle.
    pub fn add_body_component(mut self) -> (Self, BodyComponent) {
        let index = self.push_template_component(TemplateComponent::Body {
            parameters: Vec::new(),
        });
        let handle = BodyComponent {
            builder: self.id,
            index,
        };
        (self, handle)
    }

    pub fn body_text_parameter(
        mut self,
        component: BodyComponent,
        text: impl Into<String>,
    ) -> Result<Self, ComposeError> {
        if component.builder != self.id {
            return Err(unknown(ComponentKind::Body));
        }
        match self.state.0.components.get_mut(component.index) {
            Some(TemplateComponent::Body { parameters }) => {
                parameters.push(Parameter::Text { text: text.into() });
                Ok(self)
            }
            _ => Err(unknown(ComponentKind::Body)),
        }
    }

    /// Adds one body component carrying a text parameter per value, in order.
    pub fn body_parameters<I, T>(self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let (mut builder, _) = self.add_body_component();
        if let Some(TemplateComponent::Body { parameters }) = builder.state.0.components.last_mut()
        {
            parameters.extend(values.into_iter().map(|text| Parameter::Text {
                text: text.into(),
            }));
        }
        builder
    }

    /// Appends an empty header component and returns its handle.
    pub fn add_header_component(mut self) -> (Self, HeaderComponent) {
        let index = self.push_template_component(TemplateComponent::Header {
            parameters: Vec::new(),
        });
        let handle = HeaderComponent {
            builder: self.id,
            index,
        };
        (self, handle)
    }

    pub fn header_image_parameter(
        mut self,
        component: HeaderComponent,
        image_url: impl Into<String>,
    ) -> Result<Self, ComposeError> {
        if component.builder != self.id {
            return Err(unknown(ComponentKind::Header));
        }
        match self.state.0.components.get_mut(component.index) {
            Some(TemplateComponent::Header { parameters }) => {
                parameters.push(Parameter::Image {
                    image: MediaLink {
                        link: image_url.into(),
                    },
                });
                Ok(self)
            }
            _ => Err(unknown(ComponentKind::Header)),
        }
    }

    /// Adds a header component carrying a single image parameter.
    pub fn header_image(self, image_url: impl Into<String>) -> Self {
        let (mut builder, _) = self.add_header_component();
        if let Some(TemplateComponent::Header { parameters }) =
            builder.state.0.components.last_mut()
        {
            parameters.push(Parameter::Image {
                image: MediaLink {
                    link: image_url.into(),
                },
            });
        }
        builder
    }

    pub fn footer_component(mut self, text: impl Into<String>) -> Self {
        self.components
            .push(AuxComponent::Footer { text: text.into() });
        self
    }

    pub fn quick_reply_button(self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.push_reply_button(text.clone(), text)
    }

    /// Reply button keyed by `url`; a non-empty `example` replaces the title.
    pub fn url_button(
        self,
        text: impl Into<String>,
        url: impl Into<String>,
        example: Option<&str>,
    ) -> Self {
        let title = example
            .filter(|example| !example.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| text.into());
        self.push_reply_button(url.into(), title)
    }

    pub fn phone_number_button(
        self,
        text: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        self.push_reply_button(phone_number.into(), text.into())
    }

    fn push_template_component(&mut self, component: TemplateComponent) -> usize {
        self.state.0.components.push(component);
        self.state.0.components.len() - 1
    }

    fn push_reply_button(mut self, id: String, title: String) -> Self {
        self.components.push(AuxComponent::Buttons {
            buttons: vec![ActionButton::Reply {
                reply: ReplyButton { id, title },
            }],
        });
        self
    }
}

impl PayloadBuilder<state::Interactive> {
    /// Sets the footer. An empty string means "not set" and leaves it absent.
    pub fn footer(mut self, text: &str) -> Self {
        if !text.is_empty() {
            self.state.0.footer = Some(BodyText::new(text));
        }
        self
    }

    /// Sets an image header. An empty url leaves the header absent.
    pub fn header_image(mut self, url: &str) -> Self {
        if !url.is_empty() {
            self.state.0.header = Some(InteractiveHeader::Image {
                image: MediaLink {
                    link: url.to_string(),
                },
            });
        }
        self
    }

    pub fn header_text(mut self, text: impl Into<String>) -> Self {
        self.state.0.header = Some(InteractiveHeader::Text { text: text.into() });
        self
    }
}

impl<S: state::Content> PayloadBuilder<S> {
    pub fn build(&self) -> OutboundMessage {
        let message = OutboundMessage {
            messaging_product: MESSAGING_PRODUCT,
            recipient_type: self.to.as_ref().map(|_| RecipientType::Individual),
            to: self.to.clone(),
            from: self.from.clone(),
            content: self.state.content(),
            components: self.components.clone(),
        };
        debug!(
            target = "wabtn.payload",
            to = ?message.to,
            "composed native payload"
        );
        message
    }
}

pub(crate) fn check_reply_buttons(count: usize) -> Result<(), ComposeError> {
    if count > MAX_REPLY_BUTTONS {
        return Err(ComposeError::TooManyButtons {
            count,
            max: MAX_REPLY_BUTTONS,
        });
    }
    Ok(())
}

pub(crate) fn check_list_sections(count: usize) -> Result<(), ComposeError> {
    if count > MAX_LIST_SECTIONS {
        return Err(ComposeError::TooManySections {
            count,
            max: MAX_LIST_SECTIONS,
        });
    }
    Ok(())
}

fn unknown(kind: ComponentKind) -> ComposeError {
    ComposeError::UnknownComponent { kind }
}
