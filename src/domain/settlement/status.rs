//! Settlement status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Settlement payout status.
///
/// A settlement is born pending and moves to settled exactly once when an
/// admin releases the payout. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    /// Money captured from the tenant, payout to the owner still queued.
    PendingSettlement,

    /// Payout released to the owner. Terminal.
    Settled,
}

impl SettlementStatus {
    /// Stable string form used in storage and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::PendingSettlement => "pending_settlement",
            SettlementStatus::Settled => "settled",
        }
    }

    /// Parses a status from its string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending_settlement" => Some(SettlementStatus::PendingSettlement),
            "settled" => Some(SettlementStatus::Settled),
            _ => None,
        }
    }
}

impl StateMachine for SettlementStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SettlementStatus::*;
        matches!((self, target), (PendingSettlement, Settled))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SettlementStatus::*;
        match self {
            PendingSettlement => vec![Settled],
            Settled => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_transition_to_settled() {
        let status = SettlementStatus::PendingSettlement;
        assert!(status.can_transition_to(&SettlementStatus::Settled));

        let result = status.transition_to(SettlementStatus::Settled);
        assert_eq!(result.unwrap(), SettlementStatus::Settled);
    }

    #[test]
    fn settled_is_terminal() {
        assert!(SettlementStatus::Settled.is_terminal());
        assert!(!SettlementStatus::Settled.can_transition_to(&SettlementStatus::PendingSettlement));
    }

    #[test]
    fn status_round_trips_through_string_form() {
        for status in [SettlementStatus::PendingSettlement, SettlementStatus::Settled] {
            assert_eq!(SettlementStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_string(&SettlementStatus::PendingSettlement).unwrap();
        assert_eq!(json, "\"pending_settlement\"");
    }
}
