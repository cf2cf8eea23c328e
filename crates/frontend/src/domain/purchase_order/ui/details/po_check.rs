//! Uniqueness gate for the customer PO number.
//!
//! Pure state machine; the debounce and the network call live in the view
//! model. Every issued check captures a token, and a response is applied
//! only if its token is still the latest one, so results land in
//! request-issue order no matter how responses interleave.

/// `Idle -> Checking -> {Exists | Clear}`, back to `Idle` when the field
/// empties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoCheckState {
    Idle,
    Checking,
    /// The server reported the number as taken; blocks saving.
    Exists,
    Clear,
}

#[derive(Debug, Clone)]
pub struct UniquenessGate {
    state: PoCheckState,
    seq: u64,
}

impl UniquenessGate {
    pub fn new() -> Self {
        Self {
            state: PoCheckState::Idle,
            seq: 0,
        }
    }

    pub fn state(&self) -> PoCheckState {
        self.state
    }

    /// The inline error shown under the field, when any.
    pub fn field_error(&self) -> Option<&'static str> {
        match self.state {
            PoCheckState::Exists => Some("This PO already exists"),
            _ => None,
        }
    }

    pub fn blocks_save(&self) -> bool {
        self.state == PoCheckState::Exists
    }

    /// Start a check and return its token. Invalidates any in-flight check.
    pub fn begin(&mut self) -> u64 {
        self.seq += 1;
        self.state = PoCheckState::Checking;
        self.seq
    }

    /// Field emptied or form left: back to idle, in-flight checks ignored.
    pub fn reset(&mut self) {
        self.seq += 1;
        self.state = PoCheckState::Idle;
    }

    /// Apply a server message for the check issued with `token`. The number
    /// is taken iff the message equals the literal "YES", case-insensitive;
    /// this comparison is a backend contract and is preserved as-is.
    pub fn apply_message(&mut self, token: u64, message: &str) {
        if token != self.seq {
            return;
        }
        self.state = if message.trim().eq_ignore_ascii_case("YES") {
            PoCheckState::Exists
        } else {
            PoCheckState::Clear
        };
    }

    /// A failed check fails open: the user is not blocked by a transient
    /// error. The caller logs the failure.
    pub fn apply_failure(&mut self, token: u64) {
        if token != self.seq {
            return;
        }
        self.state = PoCheckState::Clear;
    }
}

impl Default for UniquenessGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_sets_exists_case_insensitive() {
        let mut gate = UniquenessGate::new();
        let t = gate.begin();
        gate.apply_message(t, "yes");
        assert_eq!(gate.state(), PoCheckState::Exists);
        assert_eq!(gate.field_error(), Some("This PO already exists"));
        assert!(gate.blocks_save());

        let t = gate.begin();
        gate.apply_message(t, "NO");
        assert_eq!(gate.state(), PoCheckState::Clear);
        assert!(!gate.blocks_save());
    }

    #[test]
    fn test_stale_response_never_overwrites_newer_result() {
        let mut gate = UniquenessGate::new();
        let t1 = gate.begin();
        let t2 = gate.begin();
        // Request 2 resolves first.
        gate.apply_message(t2, "NO");
        assert_eq!(gate.state(), PoCheckState::Clear);
        // Request 1 resolves late; its result must be ignored.
        gate.apply_message(t1, "YES");
        assert_eq!(gate.state(), PoCheckState::Clear);
    }

    #[test]
    fn test_reset_clears_error_and_ignores_in_flight() {
        let mut gate = UniquenessGate::new();
        let t = gate.begin();
        gate.apply_message(t, "YES");
        assert!(gate.blocks_save());

        let t2 = gate.begin();
        gate.reset();
        assert_eq!(gate.state(), PoCheckState::Idle);
        assert_eq!(gate.field_error(), None);
        gate.apply_message(t2, "YES");
        assert_eq!(gate.state(), PoCheckState::Idle);
    }

    #[test]
    fn test_failure_fails_open() {
        let mut gate = UniquenessGate::new();
        let t = gate.begin();
        gate.apply_failure(t);
        assert_eq!(gate.state(), PoCheckState::Clear);
        assert!(!gate.blocks_save());
    }
}
