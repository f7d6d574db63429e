//! Auto-dismiss modal state.
//!
//! Each `open` bumps a generation. The dismiss timer scheduled for one
//! opening carries its generation, so a stale timer cannot close a newer
//! message.

#[cfg(test)]
#[path = "modal_test.rs"]
mod modal_test;

pub const AUTO_DISMISS_MS: u32 = 3000;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModalState {
    pub open: bool,
    pub content: String,
    pub generation: u64,
}

impl ModalState {
    /// Show `content`; returns the generation to hand to the dismiss timer.
    pub fn open(&mut self, content: impl Into<String>) -> u64 {
        self.generation += 1;
        self.content = content.into();
        self.open = true;
        self.generation
    }

    /// Confirm button: close now.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Timer expiry. Closes only if `generation` is still the one showing.
    pub fn dismiss(&mut self, generation: u64) -> bool {
        if self.open && self.generation == generation {
            self.open = false;
            return true;
        }
        false
    }
}
