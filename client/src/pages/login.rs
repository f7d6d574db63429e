//! Login page: email + password, or Kakao.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use account::{Field, FieldErrors, LoginInput, validation::validate_login};
use leptos::prelude::*;

use crate::util::forms::submit_if_valid;

#[cfg(any(test, feature = "hydrate"))]
const INVALID_CREDENTIALS: &str = "Invalid login credentials";
#[cfg(any(test, feature = "hydrate"))]
const INVALID_CREDENTIALS_ALERT: &str = "계정이 존재하지 않거나 잘못된 비밀번호입니다.";
#[cfg(any(test, feature = "hydrate"))]
const LOGIN_FAILED_ALERT: &str = "로그인 중 오류가 발생했습니다.";

/// Alert text for a failed sign-in. Rejected credentials get the localized
/// message instead of the remote one.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn login_alert_message(remote: &str) -> String {
    if remote.contains(INVALID_CREDENTIALS) {
        INVALID_CREDENTIALS_ALERT.to_owned()
    } else if remote.trim().is_empty() {
        LOGIN_FAILED_ALERT.to_owned()
    } else {
        remote.to_owned()
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let sync = expect_context::<crate::state::session_sync::SessionSync>();
    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let input = LoginInput { email: email.get_untracked(), password: password.get_untracked() };
        let found = submit_if_valid(&input, validate_login, |input| {
            #[cfg(feature = "hydrate")]
            {
                busy.set(true);
                let input = input.clone();
                let sync = sync.clone();
                let navigate = navigate.clone();
                leptos::task::spawn_local(async move {
                    match crate::net::api::login(&input).await {
                        Ok(outcome) => {
                            sync.publish(&crate::state::session::SessionEvent::SignedIn(outcome.session));
                            navigate(&outcome.navigate.to, leptos_router::NavigateOptions::default());
                        }
                        Err(e) => {
                            log::warn!("login failed: {e}");
                            crate::util::browser::alert(&login_alert_message(&e.message));
                        }
                    }
                    busy.set(false);
                });
            }
            #[cfg(not(feature = "hydrate"))]
            let _ = input;
        });
        errors.set(found);
    };

    let on_kakao = move |_| {
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::kakao().await {
                Ok(start) => crate::util::browser::assign_location(&start.url),
                Err(e) => crate::util::browser::alert(&e.message),
            }
        });
    };

    let field_error = move |field: Field| errors.with(|e| e.get(field).unwrap_or_default());

    view! {
        <section class="auth-page">
            <h1>"로그인"</h1>
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
                <button class="auth-button" type="submit" disabled=move || busy.get()>
                    "로그인"
                </button>
            </form>
            <button class="auth-button auth-button--kakao" type="button" on:click=on_kakao>
                "카카오로 로그인"
            </button>
            <p class="auth-page__switch">
                "계정이 없으신가요? "
                <a href="/signup">"회원가입"</a>
            </p>
        </section>
    }
}
