//! Profile image editor state machine.
//!
//! ```text
//!   Idle --select--> Selected --begin_save--> Saving --finish_save/fail_save--> Idle
//!    ^                  |
//!    +-----cancel-------+
//! ```
//!
//! Picking a file only swaps the preview to a local object URL; nothing is
//! sent until `begin_save`. A failed save keeps the local preview.

#[cfg(test)]
#[path = "profile_image_test.rs"]
mod profile_image_test;

/// Shown when the profile has no avatar.
pub const DEFAULT_PROFILE_IMAGE: &str = "/images/default-profile";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Selected,
    Saving,
}

/// A locally picked file: its name and a displayable URL for the preview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub file_name: String,
    pub preview_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileImageState {
    persisted: Option<String>,
    preview: String,
    phase: Phase,
    selection: Option<Selection>,
}

impl Default for ProfileImageState {
    fn default() -> Self {
        Self::new(None)
    }
}

fn display(persisted: Option<&str>) -> String {
    persisted
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_PROFILE_IMAGE)
        .to_owned()
}

impl ProfileImageState {
    #[must_use]
    pub fn new(persisted: Option<String>) -> Self {
        let preview = display(persisted.as_deref());
        Self { persisted, preview, phase: Phase::Idle, selection: None }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn preview(&self) -> &str {
        &self.preview
    }

    #[cfg(test)]
    #[must_use]
    pub fn persisted(&self) -> Option<&str> {
        self.persisted.as_deref()
    }

    #[cfg(test)]
    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Pick (or re-pick) a file. Ignored while saving. Returns the replaced
    /// selection, whose preview URL the caller may release.
    pub fn select(&mut self, selection: Selection) -> Option<Selection> {
        if self.phase == Phase::Saving {
            return Some(selection);
        }
        self.preview.clone_from(&selection.preview_url);
        self.phase = Phase::Selected;
        self.selection.replace(selection)
    }

    /// Selected -> Saving. `None` in any other phase, so a second click on
    /// save while an upload is in flight starts nothing.
    pub fn begin_save(&mut self) -> Option<Selection> {
        if self.phase != Phase::Selected {
            return None;
        }
        self.phase = Phase::Saving;
        self.selection.clone()
    }

    /// The blob is stored; show its public URL while the profile row updates.
    pub fn uploaded(&mut self, public_url: &str) {
        if self.phase == Phase::Saving {
            public_url.clone_into(&mut self.preview);
        }
    }

    /// Saving -> Idle with the stored URL as both persisted value and preview.
    pub fn finish_save(&mut self, persisted: String) -> Option<Selection> {
        self.preview = display(Some(&persisted));
        self.persisted = Some(persisted);
        self.phase = Phase::Idle;
        self.selection.take()
    }

    /// Saving -> Idle. The preview is left as it is.
    pub fn fail_save(&mut self) -> Option<Selection> {
        self.phase = Phase::Idle;
        self.selection.take()
    }

    /// Selected -> Idle, preview back to the persisted avatar. Returns the
    /// discarded selection; `None` (and no change) outside `Selected`.
    pub fn cancel(&mut self) -> Option<Selection> {
        if self.phase != Phase::Selected {
            return None;
        }
        self.phase = Phase::Idle;
        self.preview = display(self.persisted.as_deref());
        self.selection.take()
    }

    /// New persisted value from the profile row. Moves the preview only when
    /// nothing local is pending.
    pub fn sync_persisted(&mut self, persisted: Option<String>) {
        self.persisted = persisted;
        if self.phase == Phase::Idle {
            self.preview = display(self.persisted.as_deref());
        }
    }
}
