// 💳 Account Record - balance arithmetic with no I/O
//
// Balance mutation is pure: every operation returns a Result and the
// caller decides how to render it. A rejected operation leaves the
// record untouched, so a valid account can never go negative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// BALANCE ERRORS
// ============================================================================

/// A rejected balance operation. The account(s) involved are unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BalanceError {
    /// Amount was zero or negative. Zero is not an allowed no-op.
    NonPositiveAmount,

    /// Amount exceeds the available balance.
    InsufficientFunds { balance: f64, requested: f64 },
}

impl std::fmt::Display for BalanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BalanceError::NonPositiveAmount => {
                write!(f, "Amount must be greater than zero")
            }
            BalanceError::InsufficientFunds { balance, requested } => write!(
                f,
                "Insufficient funds: requested {:.2}, available {:.2}",
                requested, balance
            ),
        }
    }
}

impl std::error::Error for BalanceError {}

// ============================================================================
// ACCOUNT RECORD
// ============================================================================

/// One bank account as held in the Accounts table.
///
/// `account_number` is the identity (immutable after open),
/// `holder_name` and `balance` are values that may change.
/// Loaded as a snapshot per operation and written back afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "Account_Number")]
    pub account_number: String,

    #[serde(rename = "Holder_Name")]
    pub holder_name: String,

    #[serde(rename = "Balance")]
    pub balance: f64,

    /// When the row was inserted (rfc3339 in the store). Serialized
    /// as an empty CSV field when absent.
    #[serde(rename = "Created_At")]
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new account record, stamped now.
    pub fn new(account_number: String, holder_name: String, balance: f64) -> Self {
        Account {
            account_number,
            holder_name,
            balance,
            created_at: Some(Utc::now()),
        }
    }

    /// Add `amount` to the balance. Zero and negative amounts are rejected.
    pub fn deposit(&mut self, amount: f64) -> Result<(), BalanceError> {
        if amount <= 0.0 {
            return Err(BalanceError::NonPositiveAmount);
        }
        self.balance += amount;
        Ok(())
    }

    /// Remove `amount` from the balance. Rejects zero, negative and
    /// over-balance amounts; the balance stays non-negative.
    pub fn withdraw(&mut self, amount: f64) -> Result<(), BalanceError> {
        if amount <= 0.0 {
            return Err(BalanceError::NonPositiveAmount);
        }
        if amount > self.balance {
            return Err(BalanceError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Move `amount` from this account to `receiver`.
    ///
    /// Both legs are validated before either side is touched, so a
    /// rejection never leaves a partial mutation. The sum of the two
    /// balances is conserved on success.
    pub fn transfer_to(
        &mut self,
        receiver: &mut Account,
        amount: f64,
    ) -> Result<(), BalanceError> {
        if amount <= 0.0 {
            return Err(BalanceError::NonPositiveAmount);
        }
        if amount > self.balance {
            return Err(BalanceError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        receiver.balance += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(number: &str, balance: f64) -> Account {
        Account::new(number.to_string(), format!("Holder {}", number), balance)
    }

    #[test]
    fn test_deposit_increases_balance() {
        let mut acc = account("A1", 100.0);
        acc.deposit(50.0).unwrap();
        assert_eq!(acc.balance, 150.0);
    }

    #[test]
    fn test_deposit_rejects_zero_and_negative() {
        let mut acc = account("A1", 100.0);

        assert_eq!(acc.deposit(0.0), Err(BalanceError::NonPositiveAmount));
        assert_eq!(acc.deposit(-25.0), Err(BalanceError::NonPositiveAmount));
        assert_eq!(acc.balance, 100.0, "rejected deposit must not change the balance");
    }

    #[test]
    fn test_withdraw_decreases_balance() {
        let mut acc = account("A1", 100.0);
        acc.withdraw(40.0).unwrap();
        assert_eq!(acc.balance, 60.0);
    }

    #[test]
    fn test_withdraw_rejects_over_balance() {
        let mut acc = account("A1", 150.0);

        let result = acc.withdraw(200.0);
        assert_eq!(
            result,
            Err(BalanceError::InsufficientFunds {
                balance: 150.0,
                requested: 200.0,
            })
        );
        assert_eq!(acc.balance, 150.0, "rejected withdrawal must not change the balance");
    }

    #[test]
    fn test_withdraw_rejects_zero_and_negative() {
        let mut acc = account("A1", 100.0);

        assert_eq!(acc.withdraw(0.0), Err(BalanceError::NonPositiveAmount));
        assert_eq!(acc.withdraw(-1.0), Err(BalanceError::NonPositiveAmount));
        assert_eq!(acc.balance, 100.0);
    }

    #[test]
    fn test_withdraw_full_balance_reaches_zero() {
        let mut acc = account("A1", 75.0);
        acc.withdraw(75.0).unwrap();
        assert_eq!(acc.balance, 0.0);
    }

    #[test]
    fn test_transfer_conserves_sum() {
        let mut sender = account("A1", 100.0);
        let mut receiver = account("A2", 50.0);

        sender.transfer_to(&mut receiver, 30.0).unwrap();

        assert_eq!(sender.balance, 70.0);
        assert_eq!(receiver.balance, 80.0);
        assert_eq!(sender.balance + receiver.balance, 150.0);
    }

    #[test]
    fn test_transfer_rejects_over_balance_without_mutation() {
        let mut sender = account("A1", 70.0);
        let mut receiver = account("A2", 80.0);

        let result = sender.transfer_to(&mut receiver, 1000.0);
        assert_eq!(
            result,
            Err(BalanceError::InsufficientFunds {
                balance: 70.0,
                requested: 1000.0,
            })
        );
        assert_eq!(sender.balance, 70.0);
        assert_eq!(receiver.balance, 80.0);
    }

    #[test]
    fn test_transfer_rejects_zero_and_negative_without_mutation() {
        let mut sender = account("A1", 100.0);
        let mut receiver = account("A2", 50.0);

        assert_eq!(
            sender.transfer_to(&mut receiver, 0.0),
            Err(BalanceError::NonPositiveAmount)
        );
        assert_eq!(
            sender.transfer_to(&mut receiver, -10.0),
            Err(BalanceError::NonPositiveAmount)
        );
        assert_eq!(sender.balance, 100.0);
        assert_eq!(receiver.balance, 50.0);
    }

    #[test]
    fn test_balance_never_negative_across_valid_operations() {
        let mut acc = account("A1", 20.0);
        let mut other = account("A2", 0.0);

        // Mix of accepted and rejected operations; rejected ones are ignored
        let _ = acc.deposit(30.0);
        let _ = acc.withdraw(45.0);
        let _ = acc.withdraw(100.0);
        let _ = acc.transfer_to(&mut other, 5.0);
        let _ = acc.transfer_to(&mut other, 500.0);
        let _ = acc.deposit(-50.0);

        assert!(acc.balance >= 0.0);
        assert!(other.balance >= 0.0);
        assert_eq!(acc.balance + other.balance, 50.0);
    }
}
