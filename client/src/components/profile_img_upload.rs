//! Profile image picker with local preview, upload and cancel.
//!
//! Transitions live in [`ProfileImageState`]; this component only wires
//! them to the file input, the storage upload and the profile row update.

use leptos::prelude::*;

use crate::state::profile_image::{Phase, ProfileImageState};

/// `avatar` is the persisted URL from the profile row. `on_changed` asks the
/// page to refetch that row, after a save or a cancel.
#[component]
pub fn ProfileImgUpload(
    #[prop(into)] user_id: Signal<String>,
    #[prop(into)] avatar: Signal<Option<String>>,
    on_changed: Callback<()>,
) -> impl IntoView {
    let state = RwSignal::new(ProfileImageState::default());

    Effect::new(move |_| {
        let persisted = avatar.get();
        state.update(|s| s.sync_persisted(persisted));
    });

    #[cfg(feature = "hydrate")]
    let picked = StoredValue::new_local(None::<web_sys::File>);

    let on_pick = move |ev: leptos::ev::Event| {
        #[cfg(feature = "hydrate")]
        {
            let input: web_sys::HtmlInputElement = event_target(&ev);
            let Some(file) = input.files().and_then(|list| list.get(0)) else {
                return;
            };
            let Some(preview_url) = crate::util::browser::object_url(&file) else {
                return;
            };
            let selection = crate::state::profile_image::Selection { file_name: file.name(), preview_url };
            // Replaced, or rejected while saving.
            if let Some(stale) = state.try_update(|s| s.select(selection)).flatten() {
                crate::util::browser::revoke_object_url(&stale.preview_url);
            }
            if state.with_untracked(|s| s.phase() == Phase::Selected) {
                picked.set_value(Some(file));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = ev;
    };

    let on_save = move |_| {
        let Some(selection) = state.try_update(ProfileImageState::begin_save).flatten() else {
            return;
        };
        #[cfg(feature = "hydrate")]
        {
            let Some(file) = picked.get_value() else {
                state.update(|s| {
                    s.fail_save();
                });
                return;
            };
            let user_id = user_id.get_untracked();
            leptos::task::spawn_local(async move {
                save_avatar(&user_id, &file, state).await;
                picked.set_value(None);
                crate::util::browser::revoke_object_url(&selection.preview_url);
                on_changed.run(());
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (selection, user_id);
    };

    let on_cancel = move |_| {
        let Some(discarded) = state.try_update(ProfileImageState::cancel).flatten() else {
            return;
        };
        crate::util::browser::revoke_object_url(&discarded.preview_url);
        #[cfg(feature = "hydrate")]
        picked.set_value(None);
        on_changed.run(());
    };

    let phase = move || state.with(ProfileImageState::phase);

    view! {
        <div class="profile-image">
            <img class="profile-image__preview" alt="프로필 이미지" src=move || state.with(|s| s.preview().to_owned())/>
            <label class="profile-image__pick">
                "이미지 선택"
                <input type="file" accept="image/*" on:change=on_pick disabled=move || phase() == Phase::Saving/>
            </label>
            <Show when=move || phase() != Phase::Idle>
                <div class="profile-image__actions">
                    <button type="button" on:click=on_save disabled=move || phase() == Phase::Saving>
                        {move || if phase() == Phase::Saving { "저장 중..." } else { "저장" }}
                    </button>
                    <button type="button" on:click=on_cancel disabled=move || phase() == Phase::Saving>
                        "취소"
                    </button>
                </div>
            </Show>
        </div>
    }
}

/// Upload, store the URL on the profile row, settle the state machine.
/// Outcomes are reported with a blocking alert.
#[cfg(feature = "hydrate")]
async fn save_avatar(user_id: &str, file: &web_sys::File, state: RwSignal<ProfileImageState>) {
    use crate::net::api;
    use crate::util::browser::alert;

    let fail = |message: &str| {
        log::warn!("profile image save failed: {message}");
        state.update(|s| {
            s.fail_save();
        });
        alert(message);
    };

    let url = match api::upload_profile_image(user_id, file).await {
        Ok(Some(url)) => url.public_url,
        Ok(None) => return fail("선택된 이미지가 없습니다."),
        Err(e) => return fail(&e.message),
    };
    state.update(|s| s.uploaded(&url));

    match api::update_avatar_url(user_id, &url).await {
        Ok(_) => {
            state.update(|s| {
                s.finish_save(url);
            });
            alert("프로필 이미지가 변경되었습니다.");
        }
        Err(e) => fail(&e.message),
    }
}
