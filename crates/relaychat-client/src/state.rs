/// Per-session client state: the held upstream session identifier and the
/// in-flight flag that keeps sends from overlapping.
///
/// Starts empty. [`SessionState::clear`] drops the identifier so the next
/// send opens a fresh upstream conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    session_id: Option<String>,
    busy: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Replace the held identifier. Empty strings are ignored.
    pub fn adopt(&mut self, session_id: Option<String>) {
        if let Some(id) = session_id.filter(|s| !s.is_empty()) {
            self.session_id = Some(id);
        }
    }

    pub fn clear(&mut self) {
        self.session_id = None;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Claim the in-flight slot. Returns `false` if a send already holds it.
    pub fn try_begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn finish(&mut self) {
        self.busy = false;
    }
}
