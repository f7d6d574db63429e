//! Profile, post and like routes. All require the session cookie.

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;

use account::{ActionError, AvatarUrlUpdate, NicknameUpdate, PublicUrl, Row, UserInfo};
use axum::extract::{Multipart, State};
use serde::Deserialize;

use super::Reply;
use super::auth::SessionToken;
use super::extract::{ApiJson, ApiMultipart, ApiPath, ApiQuery};
use crate::services::user::{self as user_svc, AvatarFile};
use crate::state::AppState;

/// Multipart field carrying the avatar file.
pub const AVATAR_FIELD: &str = "profileImage";

/// `GET /api/users/{id}`
pub async fn user_info(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    ApiPath(user_id): ApiPath<String>,
) -> Reply<UserInfo> {
    Reply(user_svc::get_user_info(state.remote.as_ref(), &token, &user_id).await)
}

/// `PATCH /api/users/{id}/nickname`
pub async fn update_nickname(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    ApiPath(user_id): ApiPath<String>,
    ApiJson(body): ApiJson<NicknameUpdate>,
) -> Reply<UserInfo> {
    Reply(user_svc::update_nickname(state.remote.as_ref(), &token, &user_id, &body.nickname).await)
}

#[derive(Debug, Deserialize)]
pub struct NicknameQuery {
    nickname: String,
}

/// `GET /api/users/{id}/nickname-availability?nickname=`
pub async fn nickname_availability(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    ApiPath(user_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<NicknameQuery>,
) -> Reply<bool> {
    Reply(user_svc::check_nickname_availability(state.remote.as_ref(), &token, &query.nickname, &user_id).await)
}

/// `GET /api/users/{id}/posts`
pub async fn my_posts(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    ApiPath(user_id): ApiPath<String>,
) -> Reply<Vec<Row>> {
    Reply(user_svc::get_my_posts(state.remote.as_ref(), &token, &user_id).await)
}

/// `GET /api/users/{id}/likes`
pub async fn like_posts(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    ApiPath(user_id): ApiPath<String>,
) -> Reply<Vec<Row>> {
    Reply(user_svc::get_like_posts(state.remote.as_ref(), &token, &user_id).await)
}

/// Pull the avatar out of the form. Other fields are ignored.
async fn read_avatar(multipart: &mut Multipart) -> Result<Option<AvatarFile>, ActionError> {
    let read_failed = |e: axum::extract::multipart::MultipartError| {
        tracing::warn!(error = %e, "avatar form read failed");
        ActionError::upload(format!("이미지 업로드 실패: {e}"))
    };

    while let Some(field) = multipart.next_field().await.map_err(read_failed)? {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(read_failed)?;
        return Ok(AvatarFile::from_parts(file_name.as_deref(), content_type.as_deref(), bytes.to_vec()));
    }
    Ok(None)
}

/// `POST /api/users/{id}/avatar`: multipart with a `profileImage` file.
/// Answers `{"ok": null}` when no file was sent.
pub async fn upload_avatar(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    ApiPath(user_id): ApiPath<String>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Reply<Option<PublicUrl>> {
    let file = match read_avatar(&mut multipart).await {
        Ok(file) => file,
        Err(e) => return Reply(Err(e)),
    };
    Reply(user_svc::upload_profile_image(state.remote.as_ref(), &token, &user_id, file).await)
}

/// `PUT /api/users/{id}/avatar-url`
pub async fn update_avatar_url(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
    ApiPath(user_id): ApiPath<String>,
    ApiJson(body): ApiJson<AvatarUrlUpdate>,
) -> Reply<UserInfo> {
    Reply(user_svc::update_avatar_url(state.remote.as_ref(), &token, &user_id, &body.url).await)
}
