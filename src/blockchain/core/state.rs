use crate::account::{Account, MASTER_ADDRESS};
use crate::error::ErrorKind;
use crate::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-block balance snapshot: address to account.
///
/// Kept ordered so that iteration, fingerprints and hashes are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    accounts: BTreeMap<String, Account>,
}

impl BalanceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot holding only the master account with the full supply.
    pub fn genesis() -> Self {
        let mut snapshot = Self::new();
        snapshot.accounts.insert(MASTER_ADDRESS.to_string(), Account::master());
        snapshot
    }

    pub fn contains(&self, address: &str) -> bool {
        self.accounts.contains_key(address)
    }

    pub fn get(&self, address: &str) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn balance(&self, address: &str) -> Option<u64> {
        self.get(address).map(|a| a.balance)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Adds a new account, refusing to overwrite an existing address.
    pub fn insert_new(&mut self, account: Account) -> Result<(), ErrorKind> {
        if self.accounts.contains_key(&account.address) {
            return Err(ErrorKind::DuplicateAddress(account.address));
        }
        self.accounts.insert(account.address.clone(), account);
        Ok(())
    }

    /// Sum of all balances. Saturates rather than wrapping so a corrupted
    /// snapshot can never appear to balance.
    pub fn total(&self) -> u64 {
        self.accounts()
            .fold(0u64, |sum, a| sum.saturating_add(a.balance))
    }

    /// Plain address to balance view.
    pub fn balances(&self) -> BTreeMap<String, u64> {
        self.accounts()
            .map(|a| (a.address.clone(), a.balance))
            .collect()
    }

    /// Stable textual form of every `address=balance` pair.
    pub fn fingerprint(&self) -> String {
        self.accounts()
            .map(|a| format!("{}={}", a.address, a.balance))
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn credit(&mut self, address: &str, amount: u64) -> Result<(), ErrorKind> {
        let account = self
            .accounts
            .get_mut(address)
            .ok_or_else(|| ErrorKind::unknown_account(address))?;
        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or(ErrorKind::InsufficientFunds {
                balance: account.balance,
                required: amount,
            })?;
        Ok(())
    }

    pub fn debit(&mut self, address: &str, amount: u64) -> Result<(), ErrorKind> {
        let account = self
            .accounts
            .get_mut(address)
            .ok_or_else(|| ErrorKind::unknown_account(address))?;
        if account.balance < amount {
            return Err(ErrorKind::InsufficientFunds {
                balance: account.balance,
                required: amount,
            });
        }
        account.balance -= amount;
        Ok(())
    }

    /// Moves `amount + fee` out of the payer, `amount` to the receiver and
    /// `fee` to the master account, in that order.
    ///
    /// Not atomic on its own: callers apply it to a scratch copy and swap
    /// the copy in on success.
    pub fn apply_transaction(&mut self, tx: &Transaction) -> Result<(), ErrorKind> {
        let total = tx.total_debit().ok_or(ErrorKind::InsufficientFunds {
            balance: self.balance(tx.payer()).unwrap_or(0),
            required: u64::MAX,
        })?;
        self.debit(tx.payer(), total)?;
        self.credit(tx.receiver(), tx.amount())?;
        self.credit(MASTER_ADDRESS, tx.fee())?;
        Ok(())
    }
}
