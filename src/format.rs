//! Notification text for a status transition.

use crate::errors::FieldError;
use crate::models::{StatusCode, WorkItem};

/// Validate the item's fields and parse its status.
pub fn parse_status(item: &WorkItem) -> Result<(&str, StatusCode), FieldError> {
    let name = item.name.as_deref().ok_or(FieldError::MissingName)?;
    let status = item.status.as_deref().ok_or(FieldError::MissingStatus)?;
    let code = status
        .parse::<StatusCode>()
        .map_err(FieldError::UnrecognizedStatus)?;
    Ok((name, code))
}

/// Build the chat message announcing the item's current status.
///
/// Downstream consumers match on this exact phrasing; only the name and
/// verdict vary.
pub fn format_transition(item: &WorkItem) -> Result<String, FieldError> {
    let (name, code) = parse_status(item)?;
    Ok(render(name, code))
}

pub(crate) fn render(name: &str, code: StatusCode) -> String {
    format!(
        "Изменился статус проверки работы \"{name}\". {}",
        code.verdict()
    )
}
