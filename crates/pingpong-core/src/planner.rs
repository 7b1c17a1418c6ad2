use pingpong_types::{BotConfig, Iteration, IterationState};

/// Component C (spec §4.C): a pure total function from the previous
/// iteration and the current chain head to the next iteration, or
/// `None` meaning "skip this tick — nothing new to scan yet".
///
/// Rules are evaluated in order; the first match wins. See spec §4.C for
/// the full rationale; the one place this implementation resolves an
/// ambiguity in the prose is the `toBlock - fromBlock < 1` skip
/// condition (rule 4): spec §4.C's own edge-case note ("when
/// `confirmedHead < fromBlock` the planner must signal Skip") pins this
/// down as a strict `confirmedHead < fromBlock` check, not
/// `confirmedHead <= fromBlock` — a single newly-confirmed block is a
/// valid one-block range, not a skip.
pub fn plan(previous: Option<&Iteration>, head: u64, config: &BotConfig) -> Option<Iteration> {
    let confirmed_head = head.saturating_sub(config.confirmation_blocks);

    // Rule 1: cold start always enters recovery.
    let Some(previous) = previous else {
        return Some(Iteration::RecoveryStart {
            state:    IterationState::Started,
            to_block: config.starting_block.saturating_sub(1)
        });
    };

    // Rule 2: crash mid-iteration re-enters recovery from a safe block.
    if previous.state() == IterationState::Started {
        let to_block = match previous.from_block() {
            Some(from_block) => from_block.saturating_sub(1),
            None => previous.to_block()
        };
        return Some(Iteration::RecoveryStart { state: IterationState::Started, to_block });
    }

    // Rule 3: the recovery window has been fully scanned.
    if let Iteration::Recovery { to_block, recovery_until_block, .. } = previous {
        if *to_block >= *recovery_until_block {
            return Some(Iteration::RecoveryEnd { state: IterationState::Started, to_block: *to_block });
        }
    }

    // Rule 4: compute the next block range, clamped to the batch size.
    let from_block = previous.to_block() + 1;
    if confirmed_head < from_block {
        return None;
    }
    let to_block = confirmed_head.min(from_block + config.max_blocks_batch_size);

    // Rule 5: still inside a recovery pass.
    if previous.is_recovery_phase() {
        let recovery_until_block = previous.recovery_until_block().unwrap_or(head);
        return Some(Iteration::Recovery {
            state: IterationState::Started,
            from_block,
            to_block,
            recovery_until_block
        });
    }

    // Rule 6: business as usual.
    Some(Iteration::Normal { state: IterationState::Started, from_block, to_block })
}
