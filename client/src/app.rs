//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::{header::Header, modal::Modal};
use crate::pages::{home::HomePage, login::LoginPage, mypage::MyPage, signup::SignupPage};
use crate::state::{modal::ModalState, session::SessionState, session_sync::SessionSync};

/// Interval between session checks in the browser.
#[cfg(feature = "hydrate")]
const SESSION_CHECK_MS: u32 = 5 * 60 * 1000;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="ko">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Owns the session store and its sync service. The store changes only
/// through the reducer subscribed here.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(SessionState::default());
    let modal = RwSignal::new(ModalState::default());
    let sync = SessionSync::new();

    provide_context(session);
    provide_context(modal);
    provide_context(sync.clone());

    let subscription = sync.subscribe(move |event| session.update(|s| s.apply(event)));
    on_cleanup({
        let sync = sync.clone();
        move || {
            sync.unsubscribe(subscription);
        }
    });

    #[cfg(feature = "hydrate")]
    if sync.start() {
        leptos::task::spawn_local(async move {
            let payload = crate::net::api::fetch_session().await.unwrap_or_else(|e| {
                log::warn!("initial session fetch failed: {e}");
                None
            });
            sync.publish(&crate::state::session::SessionEvent::InitialSession(payload));

            // The server renews a lapsed access cookie on request; re-reading
            // the session picks up the new token or the loss of the session.
            loop {
                gloo_timers::future::TimeoutFuture::new(SESSION_CHECK_MS).await;
                match crate::net::api::fetch_session().await {
                    Ok(fetched) => {
                        if let Some(event) = session.get_untracked().reconcile(fetched) {
                            sync.publish(&event);
                        }
                    }
                    Err(e) => log::warn!("session check failed: {e}"),
                }
            }
        });
    }

    view! {
        <Stylesheet id="leptos" href="/pkg/ecostep.css"/>
        <Title text="EcoStep"/>

        <Router>
            <Header/>
            <main class="page">
                <Routes fallback=|| "페이지를 찾을 수 없습니다.".into_view()>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("signup") view=SignupPage/>
                    <Route path=StaticSegment("mypage") view=MyPage/>
                </Routes>
            </main>
            <Modal/>
        </Router>
    }
}
