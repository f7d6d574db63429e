use std::cell::Cell;

use account::validation::{
    EMAIL_INVALID, NICKNAME_BAD_CHARS, PASSWORD_TOO_SHORT, validate_login, validate_nickname, validate_signup,
};
use account::{Field, LoginInput, SignupInput};

use super::*;

fn login(email: &str, password: &str) -> LoginInput {
    LoginInput { email: email.to_owned(), password: password.to_owned() }
}

#[test]
fn invalid_login_makes_no_call_and_reports_both_fields() {
    let calls = Cell::new(0);
    let errors = submit_if_valid(&login("not-an-email", "abc"), validate_login, |_| calls.set(calls.get() + 1));
    assert_eq!(calls.get(), 0);
    assert_eq!(errors.get(Field::Email), Some(EMAIL_INVALID));
    assert_eq!(errors.get(Field::Password), Some(PASSWORD_TOO_SHORT));
}

#[test]
fn short_password_reports_only_password() {
    let calls = Cell::new(0);
    let errors = submit_if_valid(&login("a@b.com", "short"), validate_login, |_| calls.set(calls.get() + 1));
    assert_eq!(calls.get(), 0);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(Field::Password), Some(PASSWORD_TOO_SHORT));
}

#[test]
fn valid_login_dispatches_once_with_no_errors() {
    let calls = Cell::new(0);
    let errors = submit_if_valid(&login("a@b.com", "secret1"), validate_login, |input| {
        assert_eq!(input.email, "a@b.com");
        calls.set(calls.get() + 1);
    });
    assert_eq!(calls.get(), 1);
    assert!(errors.is_empty());
}

#[test]
fn invalid_signup_nickname_blocks_dispatch() {
    let input = SignupInput {
        email: "a@b.com".to_owned(),
        password: "secret1".to_owned(),
        nickname: "bad nick!".to_owned(),
    };
    let calls = Cell::new(0);
    let errors = submit_if_valid(&input, validate_signup, |_| calls.set(calls.get() + 1));
    assert_eq!(calls.get(), 0);
    assert_eq!(errors.get(Field::Nickname), Some(NICKNAME_BAD_CHARS));
}

#[test]
fn nickname_gate_accepts_hangul() {
    let nickname = "에코_스텝".to_owned();
    let calls = Cell::new(0);
    let errors = submit_if_valid(&nickname, |n: &String| validate_nickname(n), |_| calls.set(calls.get() + 1));
    assert_eq!(calls.get(), 1);
    assert!(errors.is_empty());
}

#[test]
fn padded_email_is_rejected_as_typed() {
    let calls = Cell::new(0);
    let errors = submit_if_valid(&login(" a@b.com ", "secret1"), validate_login, |_| calls.set(calls.get() + 1));
    assert_eq!(calls.get(), 0);
    assert_eq!(errors.get(Field::Email), Some(EMAIL_INVALID));

    let input = SignupInput {
        email: "a@b.com ".to_owned(),
        password: "secret1".to_owned(),
        nickname: "leaf".to_owned(),
    };
    let errors = submit_if_valid(&input, validate_signup, |_| calls.set(calls.get() + 1));
    assert_eq!(calls.get(), 0);
    assert_eq!(errors.get(Field::Email), Some(EMAIL_INVALID));
}
