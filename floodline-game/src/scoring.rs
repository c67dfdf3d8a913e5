//! Decision scoring policy.

use crate::config::GameType;
use crate::constants::{
    PUNISHMENT_DENY_DELTA, PUNISHMENT_TRAPPED_PER_ROUND, REWARD_DENY_DELTA, REWARD_PASS_DELTA,
};
use crate::state::Decision;

/// Score delta for a resolved round.
///
/// Punishment games only ever lose points: a denial costs a flat delay
/// penalty, a trapped train costs per remaining round. Reward games pay out
/// for both calls, with a successful passage worth slightly more than a
/// denial and a trapped train worth nothing.
#[must_use]
pub fn score_decision(
    game_type: GameType,
    decision: Decision,
    trapped: bool,
    remaining_rounds: u32,
) -> i64 {
    match (game_type, decision) {
        (GameType::Punishment, Decision::Deny) => PUNISHMENT_DENY_DELTA,
        (GameType::Punishment, Decision::Allow) => {
            if trapped {
                PUNISHMENT_TRAPPED_PER_ROUND * i64::from(remaining_rounds)
            } else {
                0
            }
        }
        (GameType::Reward, Decision::Deny) => REWARD_DENY_DELTA,
        (GameType::Reward, Decision::Allow) => {
            if trapped {
                0
            } else {
                REWARD_PASS_DELTA
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punishment_table() {
        assert_eq!(
            score_decision(GameType::Punishment, Decision::Deny, false, 7),
            -10
        );
        assert_eq!(
            score_decision(GameType::Punishment, Decision::Allow, false, 7),
            0
        );
        assert_eq!(
            score_decision(GameType::Punishment, Decision::Allow, true, 3),
            -150
        );
        // Trap on the final round costs nothing further.
        assert_eq!(
            score_decision(GameType::Punishment, Decision::Allow, true, 0),
            0
        );
    }

    #[test]
    fn reward_table() {
        assert_eq!(score_decision(GameType::Reward, Decision::Deny, false, 7), 40);
        assert_eq!(score_decision(GameType::Reward, Decision::Allow, false, 7), 50);
        assert_eq!(score_decision(GameType::Reward, Decision::Allow, true, 7), 0);
    }
}
