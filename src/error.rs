//! Error types for HashLedger

use std::fmt;

/// The public ledger operation that was being attempted when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateAccount,
    GetAccountBalance,
    GetAccountBalances,
    GetTransaction,
    GetBlock,
    ProcessTransaction,
    Validate,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateAccount => "create-account",
            Action::GetAccountBalance => "get-account-balance",
            Action::GetAccountBalances => "get-account-balances",
            Action::GetTransaction => "get-transaction",
            Action::GetBlock => "get-block",
            Action::ProcessTransaction => "process-transaction",
            Action::Validate => "validate",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of a transfer failed to resolve to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Payer,
    Receiver,
}

impl Party {
    pub fn as_str(&self) -> &'static str {
        match self {
            Party::Payer => "payer",
            Party::Receiver => "receiver",
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The individual checks performed by chain validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityViolation {
    #[error("block does not contain {expected} transactions (found {found})")]
    TransactionCountMismatch { expected: usize, found: usize },
    #[error("previous hash {found} does not match recomputed hash {expected}, blockchain has been manipulated")]
    HashMismatch { expected: String, found: String },
    #[error("account balances total {found} instead of the total supply {expected}")]
    BalanceMismatch { expected: u64, found: u64 },
    #[error("linked previous block is missing from the chain")]
    MissingPreviousBlock,
}

/// Why a ledger operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error("unique account address required: {0} already exists")]
    DuplicateAddress(String),
    /// `party` is set when the address came from one side of a transfer.
    #[error("invalid {}account address: {address}", party_prefix(.party))]
    InvalidAddress {
        party: Option<Party>,
        address: String,
    },
    #[error("unique transaction id required: {0} already used")]
    DuplicateTransactionId(u64),
    #[error("payer has insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: u64, required: u64 },
    #[error("transaction fee must be at least {minimum}, got {fee}")]
    FeeTooLow { fee: u64, minimum: u64 },
    #[error("block {0} does not exist")]
    BlockNotFound(u64),
    #[error("no block has been sealed yet")]
    NoSealedBlock,
    #[error("block {block}: {violation}")]
    ChainIntegrity {
        block: u64,
        violation: IntegrityViolation,
    },
}

impl ErrorKind {
    pub fn invalid_address(party: Party, address: impl Into<String>) -> Self {
        ErrorKind::InvalidAddress {
            party: Some(party),
            address: address.into(),
        }
    }

    pub fn unknown_account(address: impl Into<String>) -> Self {
        ErrorKind::InvalidAddress {
            party: None,
            address: address.into(),
        }
    }
}

fn party_prefix(party: &Option<Party>) -> String {
    party.map(|p| format!("{} ", p)).unwrap_or_default()
}

/// A failed ledger operation: the attempted action plus the reason it failed.
///
/// Failures never leave partial mutations behind, so callers may report the
/// error and keep using the ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{action}: {kind}")]
pub struct LedgerError {
    pub action: Action,
    pub kind: ErrorKind,
}

impl LedgerError {
    pub fn new(action: Action, kind: ErrorKind) -> Self {
        LedgerError { action, kind }
    }

    /// Human-readable reason, without the action prefix.
    pub fn reason(&self) -> String {
        self.kind.to_string()
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_action_and_reason() {
        let err = LedgerError::new(
            Action::ProcessTransaction,
            ErrorKind::FeeTooLow { fee: 5, minimum: 10 },
        );
        assert_eq!(
            err.to_string(),
            "process-transaction: transaction fee must be at least 10, got 5"
        );
        assert_eq!(err.reason(), "transaction fee must be at least 10, got 5");
    }

    #[test]
    fn test_invalid_address_names_party() {
        let kind = ErrorKind::invalid_address(Party::Receiver, "carol");
        assert_eq!(kind.to_string(), "invalid receiver account address: carol");
    }

    #[test]
    fn test_invalid_address_without_party() {
        let kind = ErrorKind::unknown_account("zed");
        assert_eq!(
            kind,
            ErrorKind::InvalidAddress {
                party: None,
                address: "zed".to_string()
            }
        );
        assert_eq!(kind.to_string(), "invalid account address: zed");
    }

    #[test]
    fn test_integrity_error_mentions_block() {
        let kind = ErrorKind::ChainIntegrity {
            block: 3,
            violation: IntegrityViolation::TransactionCountMismatch {
                expected: 10,
                found: 9,
            },
        };
        assert!(kind.to_string().starts_with("block 3: block does not contain 10"));
    }

    #[test]
    fn test_hash_mismatch_reports_both_hashes() {
        let violation = IntegrityViolation::HashMismatch {
            expected: "aa".to_string(),
            found: "bb".to_string(),
        };
        assert_eq!(
            violation.to_string(),
            "previous hash bb does not match recomputed hash aa, blockchain has been manipulated"
        );
    }
}
