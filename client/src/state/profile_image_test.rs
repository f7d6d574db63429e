use super::*;

const STORED: &str = "https://remote.test/storage/v1/object/public/avatars/u1/old.png";
const NEW_URL: &str = "https://remote.test/storage/v1/object/public/avatars/u1/new.png";

fn pick(name: &str) -> Selection {
    Selection { file_name: name.to_owned(), preview_url: format!("blob:local/{name}") }
}

fn idle_with_avatar() -> ProfileImageState {
    ProfileImageState::new(Some(STORED.to_owned()))
}

// =============================================================
// Idle
// =============================================================

#[test]
fn idle_without_avatar_shows_default_image() {
    let s = ProfileImageState::default();
    assert_eq!(s.phase(), Phase::Idle);
    assert_eq!(s.preview(), DEFAULT_PROFILE_IMAGE);
    assert_eq!(ProfileImageState::new(Some(String::new())).preview(), DEFAULT_PROFILE_IMAGE);
}

#[test]
fn idle_shows_persisted_avatar() {
    assert_eq!(idle_with_avatar().preview(), STORED);
}

// =============================================================
// Selected
// =============================================================

#[test]
fn select_previews_local_file_without_touching_persisted() {
    let mut s = idle_with_avatar();
    assert_eq!(s.select(pick("new.png")), None);
    assert_eq!(s.phase(), Phase::Selected);
    assert_eq!(s.preview(), "blob:local/new.png");
    assert_eq!(s.persisted(), Some(STORED));
}

#[test]
fn reselect_returns_replaced_selection() {
    let mut s = idle_with_avatar();
    s.select(pick("a.png"));
    let replaced = s.select(pick("b.png")).unwrap();
    assert_eq!(replaced.file_name, "a.png");
    assert_eq!(s.selection().unwrap().file_name, "b.png");
}

#[test]
fn cancel_restores_pre_selection_avatar() {
    let mut s = idle_with_avatar();
    s.select(pick("new.png"));
    let discarded = s.cancel().unwrap();
    assert_eq!(discarded.file_name, "new.png");
    assert_eq!(s.phase(), Phase::Idle);
    assert_eq!(s.preview(), STORED);
    assert!(s.selection().is_none());
}

#[test]
fn cancel_outside_selected_is_noop() {
    let mut s = idle_with_avatar();
    assert_eq!(s.cancel(), None);
    assert_eq!(s, idle_with_avatar());
}

// =============================================================
// Saving
// =============================================================

#[test]
fn begin_save_requires_selection() {
    let mut s = idle_with_avatar();
    assert_eq!(s.begin_save(), None);
    assert_eq!(s.phase(), Phase::Idle);
}

#[test]
fn second_save_click_while_saving_starts_nothing() {
    let mut s = idle_with_avatar();
    s.select(pick("new.png"));
    assert!(s.begin_save().is_some());
    assert_eq!(s.begin_save(), None);
    assert_eq!(s.phase(), Phase::Saving);
}

#[test]
fn select_and_cancel_ignored_while_saving() {
    let mut s = idle_with_avatar();
    s.select(pick("new.png"));
    s.begin_save();

    let rejected = s.select(pick("other.png")).unwrap();
    assert_eq!(rejected.file_name, "other.png");
    assert_eq!(s.cancel(), None);
    assert_eq!(s.phase(), Phase::Saving);
    assert_eq!(s.preview(), "blob:local/new.png");
}

#[test]
fn successful_save_converges_on_stored_url() {
    let mut s = idle_with_avatar();
    s.select(pick("new.png"));
    s.begin_save();
    s.uploaded(NEW_URL);
    assert_eq!(s.preview(), NEW_URL);

    s.finish_save(NEW_URL.to_owned());
    assert_eq!(s.phase(), Phase::Idle);
    assert_eq!(s.preview(), NEW_URL);
    assert_eq!(s.persisted(), Some(NEW_URL));
}

#[test]
fn failed_save_keeps_local_preview() {
    let mut s = idle_with_avatar();
    s.select(pick("new.png"));
    s.begin_save();
    s.fail_save();
    assert_eq!(s.phase(), Phase::Idle);
    assert_eq!(s.preview(), "blob:local/new.png");
    assert_eq!(s.persisted(), Some(STORED));
}

#[test]
fn uploaded_outside_saving_is_ignored() {
    let mut s = idle_with_avatar();
    s.uploaded(NEW_URL);
    assert_eq!(s.preview(), STORED);
}

// =============================================================
// sync_persisted
// =============================================================

#[test]
fn refetch_moves_idle_preview() {
    let mut s = ProfileImageState::default();
    s.sync_persisted(Some(STORED.to_owned()));
    assert_eq!(s.preview(), STORED);
}

#[test]
fn refetch_keeps_pending_local_preview() {
    let mut s = idle_with_avatar();
    s.select(pick("new.png"));
    s.sync_persisted(Some(NEW_URL.to_owned()));
    assert_eq!(s.preview(), "blob:local/new.png");

    s.cancel();
    assert_eq!(s.preview(), NEW_URL, "cancel reverts to the latest persisted avatar");
}
