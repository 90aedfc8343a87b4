//! Pre-render gate.
//!
//! File-presence errors take priority over field constraint errors and
//! carry their own status copy; the pure check lives here and the
//! controller applies the UI consequences (error flags, tab switch, focus).

use crate::fields::{FieldId, FormState};
use crate::uploads::{SlotId, UploadTracker};

/// Outcome of the pre-render check, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// All required files present and every field within its domain.
    Ready,
    /// One or more required slots have no files. Checked first; constraint
    /// validation is skipped entirely in this case.
    MissingFiles(Vec<SlotId>),
    /// First field (in table order) violating its declared domain.
    InvalidField { field: FieldId, reason: String },
}

/// Run the gate checks without touching the surface.
pub fn check(form: &FormState, uploads: &UploadTracker) -> ValidationOutcome {
    let missing = uploads.missing_required();
    if !missing.is_empty() {
        return ValidationOutcome::MissingFiles(missing);
    }
    if let Some((field, reason)) = form.first_invalid() {
        return ValidationOutcome::InvalidField { field, reason };
    }
    ValidationOutcome::Ready
}
