pub mod config;

use validator::ValidationErrors;

/// Collects every message out of a `validator::ValidationErrors`, one entry
/// per offending field, for the `errors` list of the response envelope.
pub fn validation_error_messages(errors: &ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect()
}
