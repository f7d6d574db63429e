//! Landing page.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use account::User;
use leptos::prelude::*;

use crate::net::api;
use crate::state::session::SessionState;

const WELCOME: &str = "EcoStep에 오신 것을 환영합니다.";

/// Greeting line: the sign-up nickname when the remote user carries one,
/// otherwise the session email.
pub(crate) fn greeting_for(session: &SessionState, user: Option<&User>) -> String {
    if !session.is_authenticated {
        return WELCOME.to_owned();
    }
    let name = user
        .filter(|u| u.id == session.id)
        .and_then(User::nickname)
        .filter(|n| !n.is_empty())
        .unwrap_or(session.email.as_str());
    if name.is_empty() { WELCOME.to_owned() } else { format!("{name}님, 환영합니다.") }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let user = LocalResource::new(move || {
        let signed_in = session.with(|s| s.user_id().is_some());
        async move { if signed_in { api::fetch_user().await.ok().flatten() } else { None } }
    });
    let greeting = move || {
        let user = user.get().flatten();
        session.with(|s| greeting_for(s, user.as_ref()))
    };

    view! {
        <section class="home">
            <h1>"EcoStep"</h1>
            <p>{greeting}</p>
        </section>
    }
}
