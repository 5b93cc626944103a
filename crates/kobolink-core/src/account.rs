//! Account summary shown on the dashboard
//!
//! Built once when security setup completes. Purely presentational: the
//! wallet balance is always zero and nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A freshly onboarded user, as the dashboard presents it
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// Session-scoped user id
    pub user_id: Uuid,
    /// Full name as entered during profile setup
    pub full_name: String,
    /// Username friends would send money to
    pub username: String,
    /// Phone number with all but the last four digits masked
    pub masked_phone: String,
    /// Wallet balance in kobo
    pub balance_kobo: u64,
    /// When onboarding completed
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build the summary from the completed onboarding form
    pub fn from_onboarding(
        full_name: impl Into<String>,
        username: impl Into<String>,
        dialing_code: &str,
        phone: &str,
    ) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            full_name: full_name.into(),
            username: username.into(),
            masked_phone: mask_phone(dialing_code, phone),
            balance_kobo: 0,
            created_at: Utc::now(),
        }
    }

    /// First name for the dashboard greeting, falling back to "User"
    pub fn first_name(&self) -> &str {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or("User")
    }

    /// Wallet balance rendered as naira, e.g. `₦0.00`
    pub fn format_balance(&self) -> String {
        format!("₦{}.{:02}", self.balance_kobo / 100, self.balance_kobo % 100)
    }
}

/// Mask a phone number down to its last four digits, e.g.
/// `+234 ••• ••• 5678`.
pub fn mask_phone(dialing_code: &str, phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 4 {
        return format!("{dialing_code} {digits}");
    }
    let last_four = &digits[digits.len() - 4..];
    format!("{dialing_code} ••• ••• {last_four}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_phone_keeps_last_four_digits() {
        assert_eq!(mask_phone("+234", "801 234 5678"), "+234 ••• ••• 5678");
        assert_eq!(mask_phone("+234", "8012345678"), "+234 ••• ••• 5678");
    }

    #[test]
    fn test_mask_phone_short_numbers_pass_through() {
        assert_eq!(mask_phone("+234", "801"), "+234 801");
        assert_eq!(mask_phone("+234", ""), "+234 ");
    }

    #[test]
    fn test_account_from_onboarding() {
        let account = Account::from_onboarding("Tobi Adebayo", "tobi_ada", "+234", "8012345678");

        assert_eq!(account.first_name(), "Tobi");
        assert_eq!(account.username, "tobi_ada");
        assert_eq!(account.masked_phone, "+234 ••• ••• 5678");
        assert_eq!(account.balance_kobo, 0);
        assert_eq!(account.format_balance(), "₦0.00");
    }

    #[test]
    fn test_first_name_falls_back_to_user() {
        let account = Account::from_onboarding("   ", "someone", "+234", "8012345678");
        assert_eq!(account.first_name(), "User");
    }

    #[test]
    fn test_balance_formatting() {
        let mut account = Account::from_onboarding("A B", "ab", "+234", "8012345678");
        account.balance_kobo = 12345;
        assert_eq!(account.format_balance(), "₦123.45");
        account.balance_kobo = 5;
        assert_eq!(account.format_balance(), "₦0.05");
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = Account::from_onboarding("A", "a", "+234", "8012345678");
        let b = Account::from_onboarding("B", "b", "+234", "8012345678");
        assert_ne!(a.user_id, b.user_id);
    }
}
