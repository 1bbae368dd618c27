//! Shape checks for the decoded homework-status payload.

use serde_json::Value;

use crate::errors::StructuralError;
use crate::models::WorkItem;

/// Extract the newest homework from a decoded API response.
///
/// The API returns homeworks newest-first, so only the first element is
/// tracked. An empty list is not an error: it yields `Ok(None)`, meaning
/// there is nothing to report this cycle.
///
/// Field completeness of the returned item is not checked here; see
/// [`crate::format::format_transition`].
pub fn extract_latest(response: &Value) -> Result<Option<WorkItem>, StructuralError> {
    let object = response.as_object().ok_or(StructuralError::NotAMapping)?;

    let homeworks = match object.get("homeworks") {
        None | Some(Value::Null) => return Err(StructuralError::MissingWorkItems),
        Some(homeworks) => homeworks,
    };

    let homeworks = homeworks.as_array().ok_or(StructuralError::NotASequence)?;

    Ok(homeworks.first().map(WorkItem::from_json))
}
