use crate::domain::{
    entities::{StackSelection, UserConfig},
    error::DomainError,
    strategies,
};

/// Centralized pre-generation checks.
///
/// Everything here runs before the first filesystem mutation.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_selection(selection: &StackSelection) -> Result<(), DomainError> {
        selection.validate()
    }

    /// Hard gate: a validated stack without a generation template is fatal.
    pub fn validate_template(selection: &StackSelection) -> Result<(), DomainError> {
        if strategies::has_template(selection.backend(), selection.database()) {
            Ok(())
        } else {
            Err(DomainError::TemplateMissing {
                backend: selection.backend(),
                database: selection.database(),
            })
        }
    }

    pub fn validate_user_config(
        selection: &StackSelection,
        config: &UserConfig,
    ) -> Result<(), DomainError> {
        config.validate_for(selection)
    }

    /// Run every check in order, stopping at the first failure.
    pub fn validate_request(
        selection: &StackSelection,
        config: &UserConfig,
    ) -> Result<(), DomainError> {
        Self::validate_selection(selection)?;
        Self::validate_template(selection)?;
        Self::validate_user_config(selection, config)
    }
}
