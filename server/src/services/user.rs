//! Profile, post and like actions.
//!
//! Every call runs under the caller's access token; which rows a token may
//! read or change is decided by the remote service.

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;

use account::validation::validate_nickname;
use account::{ActionError, ActionResult, ErrorKind, PublicUrl, Row, UserInfo};
use serde_json::json;

use super::{invalid, remote_failure};
use crate::remote::{Query, RemoteError, RemoteService, UploadOptions};

pub const USER_INFO_TABLE: &str = "user_info";
pub const POSTS_TABLE: &str = "posts";
pub const LIKES_TABLE: &str = "likes";
pub const AVATAR_BUCKET: &str = "avatars";
pub const AVATAR_CACHE_SECS: u32 = 3600;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
const DEFAULT_FILE_NAME: &str = "avatar";

/// An uploaded avatar file. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AvatarFile {
    /// `None` when no bytes were sent (no file picked). The name keeps only
    /// its last path segment; a name that would not name a file inside the
    /// user's folder falls back to `avatar`.
    #[must_use]
    pub fn from_parts(file_name: Option<&str>, content_type: Option<&str>, bytes: Vec<u8>) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        let file_name = file_name
            .and_then(|name| name.rsplit(['/', '\\']).next())
            .filter(|name| !matches!(*name, "" | "." | ".."))
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_owned();
        let content_type = content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_owned();
        Some(Self { file_name, content_type, bytes })
    }

    /// Storage key: one folder per user, original file name.
    #[must_use]
    pub fn object_path(&self, user_id: &str) -> String {
        format!("{user_id}/{}", self.file_name)
    }
}

fn data_failure(table: &str, err: &RemoteError) -> ActionError {
    tracing::error!(error = %err, status = ?err.status(), table, "table request failed");
    remote_failure(ErrorKind::Data, err)
}

fn decode_info(row: Row) -> ActionResult<UserInfo> {
    serde_json::from_value(row).map_err(|e| {
        tracing::error!(error = %e, "malformed user_info row");
        ActionError::data(format!("malformed profile row: {e}"))
    })
}

/// Exactly one profile row is expected; zero or several is a data error.
fn single_info(mut rows: Vec<Row>) -> ActionResult<UserInfo> {
    if rows.len() != 1 {
        tracing::warn!(rows = rows.len(), "expected a single user_info row");
        return Err(ActionError::data("profile not found"));
    }
    decode_info(rows.remove(0))
}

/// # Errors
///
/// `Data` when the row is missing or the query fails.
pub async fn get_user_info(remote: &dyn RemoteService, access_token: &str, user_id: &str) -> ActionResult<UserInfo> {
    let query = Query::select("*").eq("user_id", user_id);
    let rows = remote
        .select(access_token, USER_INFO_TABLE, &query)
        .await
        .map_err(|e| data_failure(USER_INFO_TABLE, &e))?;
    single_info(rows)
}

/// # Errors
///
/// `Validation` for a malformed nickname (no remote call), `Data` when the
/// update fails or touches no row.
pub async fn update_nickname(
    remote: &dyn RemoteService,
    access_token: &str,
    user_id: &str,
    nickname: &str,
) -> ActionResult<UserInfo> {
    validate_nickname(nickname).map_err(|e| invalid(&e))?;

    let query = Query::select("*").eq("user_id", user_id);
    let rows = remote
        .update(access_token, USER_INFO_TABLE, &query, json!({ "user_nickname": nickname }))
        .await
        .map_err(|e| data_failure(USER_INFO_TABLE, &e))?;
    single_info(rows)
}

/// # Errors
///
/// `Data` when the query fails.
pub async fn get_my_posts(remote: &dyn RemoteService, access_token: &str, user_id: &str) -> ActionResult<Vec<Row>> {
    let query = Query::select("*").eq("user_id", user_id);
    remote
        .select(access_token, POSTS_TABLE, &query)
        .await
        .map_err(|e| data_failure(POSTS_TABLE, &e))
}

/// True iff no other user holds `nickname` right now. Point-in-time only; two
/// callers can both see `true` for the same name.
///
/// # Errors
///
/// `Data` when the query fails.
pub async fn check_nickname_availability(
    remote: &dyn RemoteService,
    access_token: &str,
    nickname: &str,
    user_id: &str,
) -> ActionResult<bool> {
    let query = Query::select("user_nickname")
        .eq("user_nickname", nickname)
        .neq("user_id", user_id)
        .limit(1);
    let rows = remote
        .select(access_token, USER_INFO_TABLE, &query)
        .await
        .map_err(|e| data_failure(USER_INFO_TABLE, &e))?;
    Ok(rows.is_empty())
}

/// Likes of `user_id`, each with its post embedded under `posts`.
///
/// # Errors
///
/// `Data` when the query fails.
pub async fn get_like_posts(remote: &dyn RemoteService, access_token: &str, user_id: &str) -> ActionResult<Vec<Row>> {
    let query = Query::select("*, posts(*)").eq("user_id", user_id);
    remote
        .select(access_token, LIKES_TABLE, &query)
        .await
        .map_err(|e| data_failure(LIKES_TABLE, &e))
}

/// Store the avatar at `{user_id}/{file name}`, overwriting any previous
/// object there, and return its public URL. `None` file is a no-op.
///
/// # Errors
///
/// `Upload` carrying the storage message when the write fails.
pub async fn upload_profile_image(
    remote: &dyn RemoteService,
    access_token: &str,
    user_id: &str,
    file: Option<AvatarFile>,
) -> ActionResult<Option<PublicUrl>> {
    let Some(file) = file else {
        tracing::debug!(user_id, "avatar upload without a file");
        return Ok(None);
    };

    let path = file.object_path(user_id);
    let options = UploadOptions {
        content_type: file.content_type,
        cache_control_secs: AVATAR_CACHE_SECS,
        upsert: true,
    };
    remote
        .upload(access_token, AVATAR_BUCKET, &path, file.bytes, &options)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, path = %path, "avatar upload failed");
            ActionError::upload(format!("이미지 업로드 실패: {e}"))
        })?;

    let public_url = remote.public_url(AVATAR_BUCKET, &path).map_err(|e| {
        tracing::error!(error = %e, path = %path, "avatar public url failed");
        ActionError::upload(format!("이미지 업로드 실패: {e}"))
    })?;
    Ok(Some(PublicUrl { public_url }))
}

/// # Errors
///
/// `Data` when the update fails or touches no row.
pub async fn update_avatar_url(
    remote: &dyn RemoteService,
    access_token: &str,
    user_id: &str,
    url: &str,
) -> ActionResult<UserInfo> {
    let query = Query::select("*").eq("user_id", user_id);
    let rows = remote
        .update(access_token, USER_INFO_TABLE, &query, json!({ "user_avatar": url }))
        .await
        .map_err(|e| data_failure(USER_INFO_TABLE, &e))?;
    single_info(rows)
}
