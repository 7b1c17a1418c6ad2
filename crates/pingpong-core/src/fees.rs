/// Replacement fees for a stale pong (spec §4.E "Fee-bump algorithm").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BumpedFees {
    pub max_fee:      u128,
    pub priority_fee: u128
}

/// Pure, bit-exact fee-bump calculation. Returns `None` when the stale
/// transaction's fees already meet or exceed the current estimate — no
/// replacement is needed.
pub fn calculate_bump_fees(
    tx_max_fee: u128,
    tx_priority_fee: u128,
    current_max_fee: u128,
    current_priority_fee: u128
) -> Option<BumpedFees> {
    if tx_max_fee >= current_max_fee && tx_priority_fee >= current_priority_fee {
        return None;
    }

    let new_priority = current_priority_fee.max(tx_priority_fee);
    let base_fee = (current_max_fee - current_priority_fee) / 2;
    let adjusted_max = 2 * base_fee + new_priority;
    let min_replacement = tx_max_fee + (tx_max_fee * 10 + 99) / 100;
    let new_max = adjusted_max.max(min_replacement).max(current_max_fee);

    Some(BumpedFees { max_fee: new_max, priority_fee: new_priority })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_percent_floor_binds() {
        let bumped = calculate_bump_fees(11, 3, 12, 6).unwrap();
        assert_eq!(bumped, BumpedFees { max_fee: 13, priority_fee: 6 });
    }

    #[test]
    fn already_ahead_needs_no_replacement() {
        assert_eq!(calculate_bump_fees(20, 10, 12, 6), None);
    }

    #[test]
    fn equal_fees_need_no_replacement() {
        assert_eq!(calculate_bump_fees(12, 6, 12, 6), None);
    }

    #[test]
    fn adjusted_max_can_dominate_min_replacement() {
        // current fees jumped a lot since the stale tx was built.
        let bumped = calculate_bump_fees(10, 1, 100, 50).unwrap();
        assert_eq!(bumped.priority_fee, 50);
        assert!(bumped.max_fee >= 100);
    }
}
