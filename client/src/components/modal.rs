//! App-wide message modal with auto-dismiss.

use leptos::prelude::*;

use crate::state::modal::ModalState;

/// Show `content` and schedule its dismissal after
/// [`AUTO_DISMISS_MS`](crate::state::modal::AUTO_DISMISS_MS).
pub fn show_modal(modal: RwSignal<ModalState>, content: impl Into<String>) {
    let content = content.into();
    let generation = modal.try_update(|m| m.open(content)).unwrap_or_default();

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(crate::state::modal::AUTO_DISMISS_MS).await;
        modal.update(|m| {
            m.dismiss(generation);
        });
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = generation;
}

#[component]
pub fn Modal() -> impl IntoView {
    let modal = expect_context::<RwSignal<ModalState>>();

    view! {
        <Show when=move || modal.with(|m| m.open)>
            <div class="modal-backdrop">
                <div class="modal" role="dialog">
                    <p class="modal__content">{move || modal.with(|m| m.content.clone())}</p>
                    <button class="modal__confirm" type="button" on:click=move |_| modal.update(ModalState::close)>
                        "확인"
                    </button>
                </div>
            </div>
        </Show>
    }
}
