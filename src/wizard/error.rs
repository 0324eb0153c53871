//! Wizard-specific error types.

use super::step::StepKind;
use super::validators::Field;

/// Errors raised while promoting a step's draft into the store.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// A step that must precede the current one has not been completed
    #[error("Step not completed: {0}")]
    MissingStep(StepKind),

    /// A choice field holds a value outside its options
    #[error("Invalid option '{value}' for field {field:?}")]
    InvalidChoice { field: Field, value: String },

    /// The store rejected the record
    #[error("Failed to store step data: {0}")]
    StoreWrite(String),
}
