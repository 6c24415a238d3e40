//! Owner bank details snapshot.

use crate::domain::foundation::ValidationError;
use serde::{Deserialize, Serialize};

/// Payout details for an owner, captured at settlement-creation time.
///
/// This is intentionally a copy and not a live reference: later changes to
/// the owner's bank details must not retroactively alter a settlement that
/// is already queued for payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerBankSnapshot {
    /// Bank name as registered by the owner.
    pub bank_name: String,

    /// Account number in the owner's registered form.
    pub account_number: String,

    /// Name on the account.
    pub account_holder: String,
}

impl OwnerBankSnapshot {
    /// Creates a snapshot, rejecting empty fields.
    pub fn new(
        bank_name: impl Into<String>,
        account_number: impl Into<String>,
        account_holder: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let bank_name = bank_name.into();
        let account_number = account_number.into();
        let account_holder = account_holder.into();

        if bank_name.trim().is_empty() {
            return Err(ValidationError::empty_field("bank_name"));
        }
        if account_number.trim().is_empty() {
            return Err(ValidationError::empty_field("account_number"));
        }
        if account_holder.trim().is_empty() {
            return Err(ValidationError::empty_field("account_holder"));
        }

        Ok(Self {
            bank_name,
            account_number,
            account_holder,
        })
    }

    /// Account number with all but the last four characters masked,
    /// suitable for logs and admin listings.
    pub fn masked_account_number(&self) -> String {
        let len = self.account_number.chars().count();
        if len <= 4 {
            return "*".repeat(len);
        }
        let visible: String = self
            .account_number
            .chars()
            .skip(len - 4)
            .collect();
        format!("{}{}", "*".repeat(len - 4), visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_complete_details() {
        let snapshot = OwnerBankSnapshot::new("First Bank", "12345678", "Ada Owner").unwrap();
        assert_eq!(snapshot.bank_name, "First Bank");
        assert_eq!(snapshot.account_number, "12345678");
        assert_eq!(snapshot.account_holder, "Ada Owner");
    }

    #[test]
    fn new_rejects_empty_fields() {
        assert!(OwnerBankSnapshot::new("", "12345678", "Ada").is_err());
        assert!(OwnerBankSnapshot::new("Bank", "  ", "Ada").is_err());
        assert!(OwnerBankSnapshot::new("Bank", "12345678", "").is_err());
    }

    #[test]
    fn masked_account_number_keeps_last_four() {
        let snapshot = OwnerBankSnapshot::new("Bank", "12345678", "Ada").unwrap();
        assert_eq!(snapshot.masked_account_number(), "****5678");
    }

    #[test]
    fn masked_account_number_hides_short_numbers_entirely() {
        let snapshot = OwnerBankSnapshot::new("Bank", "123", "Ada").unwrap();
        assert_eq!(snapshot.masked_account_number(), "***");
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let snapshot = OwnerBankSnapshot::new("Bank", "12345678", "Ada").unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: OwnerBankSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
