//! Form rules for login, signup and nickname changes.
//!
//! Each field reports at most one message: the first rule it breaks, in the
//! order the rules are listed here. A non-empty [`FieldErrors`] blocks the
//! submission; no request is made.

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;

use crate::models::{LoginInput, SignupInput};

pub const PASSWORD_MIN_LEN: usize = 6;
pub const NICKNAME_MIN_LEN: usize = 2;
pub const NICKNAME_MAX_LEN: usize = 20;

pub const EMAIL_INVALID: &str = "유효한 이메일을 입력해주세요.";
pub const PASSWORD_TOO_SHORT: &str = "비밀번호는 최소 6자 이상이어야 합니다.";
pub const NICKNAME_TOO_SHORT: &str = "닉네임은 최소 2자 이상이어야 합니다.";
pub const NICKNAME_TOO_LONG: &str = "닉네임은 20자 이하이어야 합니다.";
pub const NICKNAME_BAD_CHARS: &str = "닉네임은 알파벳, 숫자, 한글, @, 밑줄 및 하이픈만 포함해야 합니다.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Email,
    Password,
    Nickname,
}

/// Per-field messages for a rejected form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(Field, &'static str)>,
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: Field, check: Result<(), &'static str>) {
        if let Err(message) = check {
            self.entries.push((field, message));
        }
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| *m)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.entries.iter().copied()
    }

    /// First message, in field order. Used where only one line fits.
    #[must_use]
    pub fn first(&self) -> Option<&'static str> {
        self.entries.first().map(|(_, m)| *m)
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Email shape check: `local@label.label...tld`, no whitespace, TLD of two or
/// more letters, no leading/trailing/double dots in the local part.
#[must_use]
pub fn is_valid_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.starts_with('.') || local.contains("..") {
        return false;
    }
    let local_ok = local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '+' | '-' | '.'));
    let local_tail_ok = local
        .chars()
        .last()
        .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-'));
    if !local_ok || !local_tail_ok {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let Some((tld, hosts)) = labels.split_last() else {
        return false;
    };
    if hosts.is_empty() {
        return false;
    }
    let hosts_ok = hosts.iter().all(|label| {
        label
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric())
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    hosts_ok && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// # Errors
///
/// Returns the field message when the address is malformed.
pub fn check_email(email: &str) -> Result<(), &'static str> {
    if is_valid_email(email) { Ok(()) } else { Err(EMAIL_INVALID) }
}

/// # Errors
///
/// Returns the field message when the password is shorter than six characters.
pub fn check_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(PASSWORD_TOO_SHORT);
    }
    Ok(())
}

fn is_nickname_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '가'..='힣' | '@' | '_' | '-')
}

/// # Errors
///
/// Returns the first broken rule: too short, too long, then disallowed characters.
pub fn check_nickname(nickname: &str) -> Result<(), &'static str> {
    let len = nickname.chars().count();
    if len < NICKNAME_MIN_LEN {
        return Err(NICKNAME_TOO_SHORT);
    }
    if len > NICKNAME_MAX_LEN {
        return Err(NICKNAME_TOO_LONG);
    }
    if !nickname.chars().all(is_nickname_char) {
        return Err(NICKNAME_BAD_CHARS);
    }
    Ok(())
}

/// # Errors
///
/// Returns every failing field of the login form.
pub fn validate_login(input: &LoginInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.push(Field::Email, check_email(&input.email));
    errors.push(Field::Password, check_password(&input.password));
    errors.into_result()
}

/// # Errors
///
/// Returns every failing field of the signup form.
pub fn validate_signup(input: &SignupInput) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.push(Field::Email, check_email(&input.email));
    errors.push(Field::Password, check_password(&input.password));
    errors.push(Field::Nickname, check_nickname(&input.nickname));
    errors.into_result()
}

/// # Errors
///
/// Returns the nickname message when the candidate breaks a rule.
pub fn validate_nickname(nickname: &str) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.push(Field::Nickname, check_nickname(nickname));
    errors.into_result()
}
