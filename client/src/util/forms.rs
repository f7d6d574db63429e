//! Submit gate shared by the login, signup and nickname forms.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use account::FieldErrors;

/// Run `validate` and call `dispatch` only when it passes.
///
/// Returns the field errors to render; empty when the input was dispatched.
pub fn submit_if_valid<I, V, D>(input: &I, validate: V, dispatch: D) -> FieldErrors
where
    V: FnOnce(&I) -> Result<(), FieldErrors>,
    D: FnOnce(&I),
{
    match validate(input) {
        Ok(()) => {
            dispatch(input);
            FieldErrors::new()
        }
        Err(errors) => errors,
    }
}
