use serde_json::json;

use super::*;
use crate::remote::memory::{MemoryRemote, PUBLIC_BASE};
use account::validation::NICKNAME_TOO_LONG;

/// A remote with one signed-in account. Returns `(remote, user_id, token)`.
fn signed_in(nickname: &str) -> (MemoryRemote, String, String) {
    let remote = MemoryRemote::new();
    let user_id = remote.add_account("me@b.com", "secret1", nickname);
    let token = remote.sign_in_as(&user_id);
    (remote, user_id, token)
}

fn png(name: &str) -> Option<AvatarFile> {
    AvatarFile::from_parts(Some(name), Some("image/png"), vec![0x89, b'P', b'N', b'G'])
}

// =============================================================================
// AvatarFile
// =============================================================================

#[test]
fn avatar_file_without_bytes_is_none() {
    assert!(AvatarFile::from_parts(Some("a.png"), Some("image/png"), Vec::new()).is_none());
}

#[test]
fn avatar_file_strips_directories_and_defaults_fields() {
    let f = AvatarFile::from_parts(Some("C:\\photos\\me.jpg"), None, vec![1]).unwrap();
    assert_eq!(f.file_name, "me.jpg");
    assert_eq!(f.content_type, "application/octet-stream");

    let f = AvatarFile::from_parts(None, Some(""), vec![1]).unwrap();
    assert_eq!(f.file_name, "avatar");
    assert_eq!(f.object_path("u1"), "u1/avatar");

    for name in [".", "..", "photos/..", "C:\\photos\\.", "dir/"] {
        let f = AvatarFile::from_parts(Some(name), None, vec![1]).unwrap();
        assert_eq!(f.file_name, "avatar", "{name}");
        assert_eq!(f.object_path("u1"), "u1/avatar", "{name}");
    }
}

// =============================================================================
// get_user_info / update_nickname
// =============================================================================

#[tokio::test]
async fn get_user_info_returns_single_row() {
    let (remote, user_id, token) = signed_in("leaf");
    let info = get_user_info(&remote, &token, &user_id).await.unwrap();
    assert_eq!(info, UserInfo { user_id, user_nickname: Some("leaf".into()), user_avatar: None });
}

#[tokio::test]
async fn get_user_info_missing_row_is_data_error() {
    let (remote, _, token) = signed_in("leaf");
    let err = get_user_info(&remote, &token, "nobody").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Data);
}

#[tokio::test]
async fn get_user_info_remote_failure_is_data_error() {
    let (remote, user_id, token) = signed_in("leaf");
    remote.fail("select", RemoteError::Api { status: 500, message: "db down".into() });
    let err = get_user_info(&remote, &token, &user_id).await.unwrap_err();
    assert_eq!(err, ActionError::data("db down"));
}

#[tokio::test]
async fn update_nickname_persists_and_returns_row() {
    let (remote, user_id, token) = signed_in("leaf");
    let info = update_nickname(&remote, &token, &user_id, "새싹-01").await.unwrap();
    assert_eq!(info.user_nickname.as_deref(), Some("새싹-01"));
    assert_eq!(remote.rows(USER_INFO_TABLE)[0]["user_nickname"], "새싹-01");
}

#[tokio::test]
async fn update_nickname_invalid_makes_no_call() {
    let (remote, user_id, token) = signed_in("leaf");
    let before = remote.total_calls();
    let err = update_nickname(&remote, &token, &user_id, &"x".repeat(21)).await.unwrap_err();
    assert_eq!(err, ActionError::validation(NICKNAME_TOO_LONG));
    assert_eq!(remote.total_calls(), before);
}

#[tokio::test]
async fn update_nickname_touching_no_row_is_data_error() {
    let (remote, _, token) = signed_in("leaf");
    let err = update_nickname(&remote, &token, "someone-else", "valid").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Data);
}

// =============================================================================
// check_nickname_availability
// =============================================================================

#[tokio::test]
async fn nickname_held_by_another_user_is_unavailable() {
    let (remote, user_id, token) = signed_in("leaf");
    remote.add_account("other@b.com", "secret1", "existingNick");

    assert!(!check_nickname_availability(&remote, &token, "existingNick", &user_id).await.unwrap());
}

#[tokio::test]
async fn own_nickname_is_available() {
    let (remote, user_id, token) = signed_in("existingNick");
    assert!(check_nickname_availability(&remote, &token, "existingNick", &user_id).await.unwrap());
}

#[tokio::test]
async fn unused_nickname_is_available() {
    let (remote, user_id, token) = signed_in("leaf");
    remote.add_account("other@b.com", "secret1", "existingNick");
    assert!(check_nickname_availability(&remote, &token, "fresh", &user_id).await.unwrap());
    assert_eq!(remote.call_count("select"), 1);
}

// =============================================================================
// posts / likes
// =============================================================================

#[tokio::test]
async fn get_my_posts_filters_by_owner() {
    let (remote, user_id, token) = signed_in("leaf");
    remote.insert_row(POSTS_TABLE, json!({ "id": 1, "user_id": user_id, "title": "mine" }));
    remote.insert_row(POSTS_TABLE, json!({ "id": 2, "user_id": "user-other", "title": "theirs" }));

    let posts = get_my_posts(&remote, &token, &user_id).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["title"], "mine");
}

#[tokio::test]
async fn get_like_posts_embeds_post() {
    let (remote, user_id, token) = signed_in("leaf");
    remote.insert_row(POSTS_TABLE, json!({ "id": 7, "user_id": "user-other", "title": "liked" }));
    remote.insert_row(LIKES_TABLE, json!({ "id": 1, "user_id": user_id, "post_id": 7 }));

    let likes = get_like_posts(&remote, &token, &user_id).await.unwrap();
    assert_eq!(likes.len(), 1);
    assert_eq!(likes[0]["post_id"], 7);
    assert_eq!(likes[0]["posts"]["title"], "liked");
}

#[tokio::test]
async fn posts_query_unreachable_remote_is_network_error() {
    let (remote, user_id, token) = signed_in("leaf");
    remote.fail("select", RemoteError::Request("timed out".into()));
    let err = get_my_posts(&remote, &token, &user_id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
}

// =============================================================================
// upload_profile_image / update_avatar_url
// =============================================================================

#[tokio::test]
async fn upload_without_file_is_noop() {
    let (remote, user_id, token) = signed_in("leaf");
    assert_eq!(upload_profile_image(&remote, &token, &user_id, None).await.unwrap(), None);
    assert_eq!(remote.call_count("upload"), 0);
    assert_eq!(remote.call_count("public_url"), 0);
}

#[tokio::test]
async fn upload_stores_object_with_upsert_and_cache() {
    let (remote, user_id, token) = signed_in("leaf");
    let url = upload_profile_image(&remote, &token, &user_id, png("me.png"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(url.public_url, format!("{PUBLIC_BASE}/avatars/{user_id}/me.png"));
    let stored = remote.object(AVATAR_BUCKET, &format!("{user_id}/me.png")).unwrap();
    assert_eq!(stored.content_type, "image/png");
    assert_eq!(stored.cache_control_secs, 3600);
}

#[tokio::test]
async fn upload_same_name_overwrites() {
    let (remote, user_id, token) = signed_in("leaf");
    upload_profile_image(&remote, &token, &user_id, png("me.png")).await.unwrap();
    let second = AvatarFile::from_parts(Some("me.png"), Some("image/png"), vec![9, 9]);
    upload_profile_image(&remote, &token, &user_id, second).await.unwrap();

    let stored = remote.object(AVATAR_BUCKET, &format!("{user_id}/me.png")).unwrap();
    assert_eq!(stored.body, vec![9, 9]);
}

#[tokio::test]
async fn upload_failure_is_upload_error_with_remote_message() {
    let (remote, user_id, token) = signed_in("leaf");
    remote.fail("upload", RemoteError::Api { status: 413, message: "Payload too large".into() });

    let err = upload_profile_image(&remote, &token, &user_id, png("me.png")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Upload);
    assert_eq!(err.message, "이미지 업로드 실패: Payload too large");
    assert_eq!(remote.call_count("public_url"), 0);
}

#[tokio::test]
async fn stored_avatar_matches_returned_public_url() {
    let (remote, user_id, token) = signed_in("leaf");
    let url = upload_profile_image(&remote, &token, &user_id, png("me.png"))
        .await
        .unwrap()
        .unwrap();

    let info = update_avatar_url(&remote, &token, &user_id, &url.public_url).await.unwrap();
    assert_eq!(info.user_avatar.as_deref(), Some(url.public_url.as_str()));
    let persisted = get_user_info(&remote, &token, &user_id).await.unwrap();
    assert_eq!(persisted.user_avatar, Some(url.public_url));
}
