//! Transaction states

/// Transaction state machine states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum State {
    /// Waiting for a request; the only state that reports ready
    #[default]
    Idle,
    /// Inactive period between a latched request and the first clock edge
    Gap,
    /// Edge train running, bits moving
    Transfer,
}

impl State {
    /// Check if this state accepts requests and config writes
    pub fn is_ready(&self) -> bool {
        matches!(self, State::Idle)
    }

    /// Check if the selected slave's chip select is asserted in this state
    pub fn is_selecting(&self) -> bool {
        matches!(self, State::Transfer)
    }
}
