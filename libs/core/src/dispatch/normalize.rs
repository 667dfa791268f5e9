//! Turns host-shaped inputs into the model types the builder consumes.

use super::{PlainButton, SectionInput};
use crate::errors::{ComposeError, SendError};
use crate::model::{PhoneNumber, ReplyButton, Row, Section, SelectedTemplate};
use crate::payload::{check_list_sections, check_reply_buttons};

fn synthetic_id(index: usize) -> String {
    format!("button_{index}")
}

/// Assigns `button_<i>` ids in input order. Fails past the reply-button ceiling.
pub fn reply_buttons(buttons: &[PlainButton]) -> Result<Vec<ReplyButton>, ComposeError> {
    check_reply_buttons(buttons.len())?;
    Ok(buttons
        .iter()
        .enumerate()
        .map(|(index, button)| ReplyButton::new(synthetic_id(index), button.button_title.clone()))
        .collect())
}

/// Row ids are scoped to their section: the index restarts at 0 in each one.
pub fn list_sections(sections: &[SectionInput]) -> Result<Vec<Section>, ComposeError> {
    check_list_sections(sections.len())?;
    Ok(sections
        .iter()
        .map(|section| Section {
            title: section.section_title.clone(),
            rows: section
                .button_in_section
                .buttons
                .iter()
                .enumerate()
                .map(|(index, button)| Row {
                    id: synthetic_id(index),
                    title: button.button_title.clone(),
                    description: button.button_description.clone(),
                })
                .collect(),
        })
        .collect())
}

pub(crate) fn sender(raw: &str) -> Result<PhoneNumber, SendError> {
    PhoneNumber::from_selection(raw).map_err(|source| SendError::Selection {
        field: "senderPhoneDynamicOption",
        source,
    })
}

pub(crate) fn template(raw: &str) -> Result<SelectedTemplate, SendError> {
    SelectedTemplate::from_selection(raw).map_err(|source| SendError::Selection {
        field: "templates",
        source,
    })
}
