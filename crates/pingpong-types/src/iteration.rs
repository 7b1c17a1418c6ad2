use serde::{Deserialize, Serialize};

/// Lifecycle marker of an iteration: written `Started` before any side
/// effect, then `Completed` once every phase has succeeded (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IterationState {
    Started,
    Completed
}

/// The descriptor of one pass over a block range, or a phase-transition
/// marker. At most one of these exists in the store at a time (spec §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Iteration {
    Normal {
        state:      IterationState,
        from_block: u64,
        to_block:   u64
    },
    RecoveryStart {
        state:    IterationState,
        to_block: u64
    },
    Recovery {
        state:               IterationState,
        from_block:          u64,
        to_block:            u64,
        recovery_until_block: u64
    },
    RecoveryEnd {
        state:    IterationState,
        to_block: u64
    }
}

impl Iteration {
    pub fn state(&self) -> IterationState {
        match self {
            Iteration::Normal { state, .. }
            | Iteration::RecoveryStart { state, .. }
            | Iteration::Recovery { state, .. }
            | Iteration::RecoveryEnd { state, .. } => *state
        }
    }

    pub fn to_block(&self) -> u64 {
        match self {
            Iteration::Normal { to_block, .. }
            | Iteration::RecoveryStart { to_block, .. }
            | Iteration::Recovery { to_block, .. }
            | Iteration::RecoveryEnd { to_block, .. } => *to_block
        }
    }

    pub fn from_block(&self) -> Option<u64> {
        match self {
            Iteration::Normal { from_block, .. } | Iteration::Recovery { from_block, .. } => Some(*from_block),
            Iteration::RecoveryStart { .. } | Iteration::RecoveryEnd { .. } => None
        }
    }

    pub fn recovery_until_block(&self) -> Option<u64> {
        match self {
            Iteration::Recovery { recovery_until_block, .. } => Some(*recovery_until_block),
            _ => None
        }
    }

    pub fn is_recovery_phase(&self) -> bool {
        matches!(self, Iteration::RecoveryStart { .. } | Iteration::Recovery { .. })
    }

    /// Returns the same iteration with its state replaced — used to write
    /// the `Started` marker first and the `Completed` marker last.
    pub fn with_state(&self, state: IterationState) -> Iteration {
        match self.clone() {
            Iteration::Normal { from_block, to_block, .. } => Iteration::Normal { state, from_block, to_block },
            Iteration::RecoveryStart { to_block, .. } => Iteration::RecoveryStart { state, to_block },
            Iteration::Recovery { from_block, to_block, recovery_until_block, .. } => {
                Iteration::Recovery { state, from_block, to_block, recovery_until_block }
            }
            Iteration::RecoveryEnd { to_block, .. } => Iteration::RecoveryEnd { state, to_block }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_state_preserves_fields() {
        let it = Iteration::Recovery {
            state:                IterationState::Started,
            from_block:           10,
            to_block:             20,
            recovery_until_block: 100
        };
        let completed = it.with_state(IterationState::Completed);
        assert_eq!(completed.state(), IterationState::Completed);
        assert_eq!(completed.from_block(), Some(10));
        assert_eq!(completed.to_block(), 20);
        assert_eq!(completed.recovery_until_block(), Some(100));
    }

    #[test]
    fn json_round_trip() {
        let it = Iteration::RecoveryStart { state: IterationState::Started, to_block: 5 };
        let json = serde_json::to_string(&it).unwrap();
        let back: Iteration = serde_json::from_str(&json).unwrap();
        assert_eq!(it, back);
    }
}
