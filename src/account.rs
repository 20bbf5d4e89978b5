//! Account balance record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of the reserved account funded with the total supply at genesis.
pub const MASTER_ADDRESS: &str = "master";

/// Fixed total supply of the ledger, credited to [`MASTER_ADDRESS`] in the
/// genesis block. Every sealed snapshot must sum to exactly this value.
pub const TOTAL_SUPPLY: u64 = 2_147_483_647;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    pub balance: u64,
}

impl Account {
    /// A new zero-balance account.
    pub fn new(address: impl Into<String>) -> Self {
        Account {
            address: address.into(),
            balance: 0,
        }
    }

    pub fn with_balance(address: impl Into<String>, balance: u64) -> Self {
        Account {
            address: address.into(),
            balance,
        }
    }

    /// The genesis master account holding the entire supply.
    pub fn master() -> Self {
        Self::with_balance(MASTER_ADDRESS, TOTAL_SUPPLY)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.address, self.balance)
    }
}
