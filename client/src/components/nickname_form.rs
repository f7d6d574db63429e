//! Nickname editor for my page.

use account::{Field, FieldErrors, UserInfo, validation::validate_nickname};
use leptos::prelude::*;

use super::modal::show_modal;
use crate::state::modal::ModalState;
use crate::util::forms::submit_if_valid;

const NICKNAME_TAKEN: &str = "이미 사용 중인 닉네임입니다.";
const NICKNAME_CHANGED: &str = "닉네임이 변경되었습니다.";

/// Validate, check availability, update. Each outcome lands in the modal.
/// `on_saved` receives the updated profile row.
#[component]
pub fn NicknameForm(
    #[prop(into)] user_id: Signal<String>,
    #[prop(into)] current: Signal<Option<String>>,
    on_saved: Callback<UserInfo>,
) -> impl IntoView {
    let modal = expect_context::<RwSignal<ModalState>>();
    let nickname = RwSignal::new(String::new());
    let errors = RwSignal::new(FieldErrors::new());
    let busy = RwSignal::new(false);

    Effect::new(move |_| {
        nickname.set(current.get().unwrap_or_default());
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let candidate = nickname.get_untracked().trim().to_owned();
        let found = submit_if_valid(&candidate, |n: &String| validate_nickname(n), |n| {
            busy.set(true);
            let candidate = n.clone();
            let user_id = user_id.get_untracked();
            leptos::task::spawn_local(async move {
                save_nickname(&user_id, &candidate, modal, on_saved).await;
                busy.set(false);
            });
        });
        errors.set(found);
    };

    view! {
        <form class="nickname-form" on:submit=on_submit>
            <label for="nickname">"닉네임"</label>
            <input
                id="nickname"
                type="text"
                prop:value=move || nickname.get()
                on:input=move |ev| nickname.set(event_target_value(&ev))
            />
            <Show when=move || errors.with(|e| e.get(Field::Nickname).is_some())>
                <p class="field-error">{move || errors.with(|e| e.get(Field::Nickname).unwrap_or_default())}</p>
            </Show>
            <button type="submit" disabled=move || busy.get()>
                "변경"
            </button>
        </form>
    }
}

async fn save_nickname(user_id: &str, candidate: &str, modal: RwSignal<ModalState>, on_saved: Callback<UserInfo>) {
    use crate::net::api;

    match api::check_nickname_availability(user_id, candidate).await {
        Ok(true) => {}
        Ok(false) => return show_modal(modal, NICKNAME_TAKEN),
        Err(e) => return show_modal(modal, e.message),
    }
    match api::update_nickname(user_id, candidate).await {
        Ok(info) => {
            show_modal(modal, NICKNAME_CHANGED);
            on_saved.run(info);
        }
        Err(e) => show_modal(modal, e.message),
    }
}
