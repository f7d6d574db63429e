//! Signup page. The new account signs in explicitly afterwards.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use account::{Field, FieldErrors, SignupInput, validation::validate_signup};
use leptos::prelude::*;

use crate::util::forms::submit_if_valid;

#[cfg(any(test, feature = "hydrate"))]
const SIGNUP_DONE_ALERT: &str = "회원가입이 완료되었습니다.";

/// Alert text and destination once the sign-up request settles. Either way
/// the caller lands on the login view.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn signup_outcome(result: &account::ActionResult<account::Navigate>) -> (String, String) {
    match result {
        Ok(next) => (SIGNUP_DONE_ALERT.to_owned(), next.to.clone()),
        Err(e) => (e.message.clone(), account::View::Login.path().to_owned()),
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let nickname = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let input = SignupInput {
            email: email.get_untracked(),
            password: password.get_untracked(),
            nickname: nickname.get_untracked(),
        };
        let found = submit_if_valid(&input, validate_signup, |input| {
            #[cfg(feature = "hydrate")]
            {
                busy.set(true);
                let input = input.clone();
                let navigate = navigate.clone();
                leptos::task::spawn_local(async move {
                    let result = crate::net::api::signup(&input).await;
                    if let Err(e) = &result {
                        log::warn!("signup failed: {e}");
                    }
                    let (message, to) = signup_outcome(&result);
                    crate::util::browser::alert(&message);
                    busy.set(false);
                    navigate(&to, leptos_router::NavigateOptions::default());
                });
            }
            #[cfg(not(feature = "hydrate"))]
            let _ = input;
        });
        errors.set(found);
    };

    let field_error = move |field: Field| errors.with(|e| e.get(field).unwrap_or_default());

    view! {
        <section class="auth-page">
            <h1>"회원가입"</h1>
            <form class="auth-form" on:submit=on_submit novalidate>
                <label for="email">"이메일"</label>
                <input
                    id="email"
                    type="email"
                    placeholder="you@example.com"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <p class="field-error">{move || field_error(Field::Email)}</p>
                <label for="password">"비밀번호"</label>
                <input
                    id="password"
                    type="password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <p class="field-error">{move || field_error(Field::Password)}</p>
                <label for="nickname">"닉네임"</label>
                <input
                    id="nickname"
                    type="text"
                    prop:value=move || nickname.get()
                    on:input=move |ev| nickname.set(event_target_value(&ev))
                />
                <p class="field-error">{move || field_error(Field::Nickname)}</p>
                <button class="auth-button" type="submit" disabled=move || busy.get()>
                    "회원가입"
                </button>
            </form>
            <p class="auth-page__switch">
                "이미 계정이 있으신가요? "
                <a href="/login">"로그인"</a>
            </p>
        </section>
    }
}
