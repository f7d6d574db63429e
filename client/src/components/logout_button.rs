//! Logout with confirmation.

use leptos::prelude::*;

const CONFIRM_LOGOUT: &str = "로그아웃 하시겠습니까?";

/// Asks first; declining leaves the session alone. Otherwise ends the
/// remote session, clears the store and goes to the login view.
#[component]
pub fn LogoutButton() -> impl IntoView {
    #[cfg(feature = "hydrate")]
    let sync = expect_context::<crate::state::session_sync::SessionSync>();
    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_click = move |_| {
        if !crate::util::browser::confirm(CONFIRM_LOGOUT) {
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            let sync = sync.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let target = match crate::net::api::logout().await {
                    Ok(nav) => nav.to,
                    Err(e) => {
                        log::warn!("logout request failed: {e}");
                        account::View::Login.path().to_owned()
                    }
                };
                sync.publish(&crate::state::session::SessionEvent::SignedOut);
                navigate(&target, leptos_router::NavigateOptions::default());
            });
        }
    };

    view! {
        <button class="site-header__logout" type="button" on:click=on_click>
            "로그아웃"
        </button>
    }
}
