//! Site header. Links depend on the session store.

use leptos::prelude::*;

use super::logout_button::LogoutButton;
use crate::state::session::SessionState;

#[component]
pub fn Header() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let signed_in = move || session.with(|s| s.is_authenticated);

    view! {
        <header class="site-header">
            <a class="site-header__logo" href="/">"EcoStep"</a>
            <nav class="site-header__nav">
                <Show
                    when=signed_in
                    fallback=|| {
                        view! {
                            <a href="/login">"로그인"</a>
                            <a href="/signup">"회원가입"</a>
                        }
                    }
                >
                    <a href="/mypage">"마이페이지"</a>
                    <LogoutButton/>
                </Show>
            </nav>
        </header>
    }
}
