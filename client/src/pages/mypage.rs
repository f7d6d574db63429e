//! My page: profile image, nickname, own posts and liked posts.

#[cfg(test)]
#[path = "mypage_test.rs"]
mod mypage_test;

use account::{Row, UserInfo};
use leptos::prelude::*;

use crate::components::{nickname_form::NicknameForm, profile_img_upload::ProfileImgUpload};
use crate::net::api;
use crate::state::session::SessionState;

const UNTITLED: &str = "(제목 없음)";

/// Title of a `posts` row.
pub(crate) fn post_title(row: &Row) -> String {
    row.get("title")
        .and_then(serde_json::Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED)
        .to_owned()
}

/// Title of the post embedded in a `likes` row.
pub(crate) fn liked_post_title(row: &Row) -> String {
    row.get("posts").map_or_else(|| UNTITLED.to_owned(), post_title)
}

#[component]
fn PostList(title: &'static str, rows: Vec<Row>, label: fn(&Row) -> String) -> impl IntoView {
    let items = if rows.is_empty() {
        view! { <p class="post-list__empty">"게시글이 없습니다."</p> }.into_any()
    } else {
        view! { <ul>{rows.iter().map(|row| view! { <li>{label(row)}</li> }).collect_view()}</ul> }.into_any()
    };
    view! {
        <section class="post-list">
            <h2>{title}</h2>
            {items}
        </section>
    }
}

#[component]
pub fn MyPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let user_id = Signal::derive(move || session.with(|s| s.user_id().map(str::to_owned).unwrap_or_default()));
    let refresh = RwSignal::new(0_u32);

    let info = LocalResource::new(move || {
        let id = user_id.get();
        refresh.track();
        async move {
            if id.is_empty() {
                return None;
            }
            api::get_user_info(&id).await.ok()
        }
    });
    let posts = LocalResource::new(move || {
        let id = user_id.get();
        async move { if id.is_empty() { Ok(Vec::new()) } else { api::get_my_posts(&id).await } }
    });
    let likes = LocalResource::new(move || {
        let id = user_id.get();
        async move { if id.is_empty() { Ok(Vec::new()) } else { api::get_like_posts(&id).await } }
    });

    let profile = RwSignal::new(None::<UserInfo>);
    Effect::new(move |_| {
        if let Some(fetched) = info.get() {
            profile.set(fetched);
        }
    });
    let avatar = Signal::derive(move || profile.with(|p| p.as_ref().and_then(|p| p.user_avatar.clone())));
    let nickname = Signal::derive(move || profile.with(|p| p.as_ref().and_then(|p| p.user_nickname.clone())));

    let on_nickname_saved = Callback::new(move |updated: UserInfo| profile.set(Some(updated)));
    let on_avatar_changed = Callback::new(move |()| refresh.update(|n| *n += 1));

    let rows_view = move |resource: LocalResource<account::ActionResult<Vec<Row>>>,
                          title: &'static str,
                          label: fn(&Row) -> String| {
        move || {
            resource.get().map(|result| match result {
                Ok(rows) => view! { <PostList title rows label/> }.into_any(),
                Err(e) => view! { <p class="post-list__error">{e.message}</p> }.into_any(),
            })
        }
    };

    view! {
        <Show
            when=move || session.with(|s| s.is_authenticated)
            fallback=|| {
                view! {
                    <p class="mypage__signed-out">
                        "로그인이 필요합니다. "
                        <a href="/login">"로그인"</a>
                    </p>
                }
            }
        >
            <section class="mypage">
                <h1>"마이페이지"</h1>
                <ProfileImgUpload user_id avatar on_changed=on_avatar_changed/>
                <p class="mypage__nickname">{move || nickname.get().unwrap_or_default()}</p>
                <NicknameForm user_id current=nickname on_saved=on_nickname_saved/>
                <Suspense fallback=|| view! { <p>"불러오는 중..."</p> }>
                    {rows_view(posts, "내 게시글", post_title)}
                    {rows_view(likes, "좋아요한 게시글", liked_post_title)}
                </Suspense>
            </section>
        </Show>
    }
}
