use crate::account::{Account, MASTER_ADDRESS};
use crate::config::LedgerSection;
use crate::crypto::{digest, HashHex};
use crate::error::{Action, ErrorKind, LedgerError, Party, Result};
use crate::merkle::merkle_root;
use crate::transaction::{Transaction, TransactionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

use super::state::BalanceSnapshot;
use super::validation::validate_chain;

/// Number of the first block; its `previous_hash` is the ledger seed.
pub const GENESIS_BLOCK_NUMBER: u64 = 1;

/// A block seals once it holds this many transactions.
pub const BLOCK_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub number: u64,
    pub previous_hash: HashHex,
    /// Empty until the block is sealed.
    pub hash: HashHex,
    pub transactions: Vec<Transaction>,
    pub balances: BalanceSnapshot,
    /// Number of the block this one was chained from; `None` for genesis.
    pub previous_block: Option<u64>,
}

impl Block {
    pub fn genesis(seed: &str) -> Self {
        Block {
            number: GENESIS_BLOCK_NUMBER,
            previous_hash: seed.to_string(),
            hash: String::new(),
            transactions: Vec::with_capacity(BLOCK_CAPACITY),
            balances: BalanceSnapshot::genesis(),
            previous_block: None,
        }
    }

    /// An open block chained onto `previous`, starting from its balances.
    pub fn next(previous: &Block) -> Self {
        Block {
            number: previous.number + 1,
            previous_hash: previous.hash.clone(),
            hash: String::new(),
            transactions: Vec::with_capacity(BLOCK_CAPACITY),
            balances: previous.balances.clone(),
            previous_block: Some(previous.number),
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.previous_block.is_none()
    }

    pub fn is_sealed(&self) -> bool {
        !self.hash.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.transactions.len() >= BLOCK_CAPACITY
    }

    pub fn transaction_fingerprints(&self) -> Vec<String> {
        self.transactions.iter().map(Transaction::fingerprint).collect()
    }

    /// Stable combination of the block's identity: number, previous hash,
    /// link, transaction ids and balance snapshot.
    pub fn structural_fingerprint(&self) -> String {
        let ids = self
            .transactions
            .iter()
            .map(|tx| tx.id().to_string())
            .collect::<Vec<_>>()
            .join(",");
        let link = self
            .previous_block
            .map(|n| n.to_string())
            .unwrap_or_default();
        format!(
            "{}|{}|{}|[{}]|{{{}}}",
            self.number,
            self.previous_hash,
            link,
            ids,
            self.balances.fingerprint()
        )
    }

    pub fn merkle_root(&self) -> HashHex {
        merkle_root(&self.transaction_fingerprints())
    }

    /// `digest(previous_hash + digest(structural_fingerprint + merkle_root))`,
    /// recomputed from the block's current contents.
    pub fn compute_hash(&self) -> HashHex {
        let inner = digest(&format!("{}{}", self.structural_fingerprint(), self.merkle_root()));
        digest(&format!("{}{}", self.previous_hash, inner))
    }

    pub fn contains_transaction(&self, id: TransactionId) -> bool {
        self.transactions.iter().any(|tx| tx.id() == id)
    }

    pub fn find_transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id() == id)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Block Number: {}", self.number)?;
        writeln!(f, "Previous Hash: {}", self.previous_hash)?;
        writeln!(f, "Hash: {}", self.hash)?;
        match self.previous_block {
            Some(n) => writeln!(f, "Previous Block Number: {}", n)?,
            None => writeln!(f, "Previous Block: none")?,
        }
        write!(f, "Transactions: {}", self.transactions.len())
    }
}

/// The full chain of blocks plus derived account state.
///
/// Exactly one block is open at any time; every other block is sealed and
/// immutable. Every accessor returns owned copies.
#[derive(Debug, Clone)]
pub struct Ledger {
    name: String,
    description: String,
    seed: String,
    blocks: BTreeMap<u64, Block>,
    open_block: Block,
}

impl Ledger {
    /// Creates a ledger whose genesis block is anchored on `seed` and holds
    /// the master account funded with the total supply.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        seed: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let seed = seed.into();
        info!("Creating ledger {} (seed = {})", name, seed);

        Ledger {
            name,
            description: description.into(),
            open_block: Block::genesis(&seed),
            seed,
            blocks: BTreeMap::new(),
        }
    }

    pub fn from_config(section: &LedgerSection) -> Self {
        Self::new(
            section.name.clone(),
            section.description.clone(),
            section.seed.clone(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of the block currently accepting transactions.
    pub fn open_block_number(&self) -> u64 {
        self.open_block.number
    }

    pub fn sealed_block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Transactions waiting in the open block.
    pub fn pending_transaction_count(&self) -> usize {
        self.open_block.transactions.len()
    }

    fn last_sealed(&self) -> Option<&Block> {
        self.blocks.values().next_back()
    }

    fn genesis(&self) -> &Block {
        self.blocks
            .get(&GENESIS_BLOCK_NUMBER)
            .unwrap_or(&self.open_block)
    }

    fn all_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values().chain(std::iter::once(&self.open_block))
    }

    /// Snapshot used to decide whether an address exists: the latest sealed
    /// block, or genesis while nothing has sealed.
    fn resolution_snapshot(&self) -> &BalanceSnapshot {
        match self.last_sealed() {
            Some(block) => &block.balances,
            None => &self.genesis().balances,
        }
    }

    fn resolve(&self, address: &str, party: Party) -> std::result::Result<(), ErrorKind> {
        if self.resolution_snapshot().contains(address) {
            Ok(())
        } else {
            Err(ErrorKind::invalid_address(party, address))
        }
    }

    /// Adds a zero-balance account to the open block's snapshot.
    pub fn create_account(&mut self, address: &str) -> Result<Account> {
        let account = Account::new(address);
        self.open_block
            .balances
            .insert_new(account.clone())
            .map_err(|kind| LedgerError::new(Action::CreateAccount, kind))?;
        debug!("Created account {} in block {}", address, self.open_block.number);
        Ok(account)
    }

    /// Balance of `address` as of the last sealed block.
    pub fn get_account_balance(&self, address: &str) -> Result<u64> {
        let err = |kind| LedgerError::new(Action::GetAccountBalance, kind);
        let block = self.last_sealed().ok_or_else(|| err(ErrorKind::NoSealedBlock))?;
        block
            .balances
            .balance(address)
            .ok_or_else(|| err(ErrorKind::unknown_account(address)))
    }

    /// Every balance as of the last sealed block.
    pub fn get_account_balances(&self) -> Result<BTreeMap<String, u64>> {
        self.last_sealed()
            .map(|block| block.balances.balances())
            .ok_or_else(|| LedgerError::new(Action::GetAccountBalances, ErrorKind::NoSealedBlock))
    }

    /// Looks up a transaction in any block, sealed or open.
    pub fn get_transaction(&self, id: TransactionId) -> Option<Transaction> {
        self.all_blocks()
            .find_map(|block| block.find_transaction(id))
            .cloned()
    }

    /// Copy of a sealed block. The open block, and any number past it, is
    /// not retrievable.
    pub fn get_block(&self, number: u64) -> Result<Block> {
        self.blocks
            .get(&number)
            .cloned()
            .ok_or_else(|| LedgerError::new(Action::GetBlock, ErrorKind::BlockNotFound(number)))
    }

    fn contains_transaction(&self, id: TransactionId) -> bool {
        self.all_blocks().any(|block| block.contains_transaction(id))
    }

    /// Validates and applies `tx` to the open block, sealing it when full.
    ///
    /// Checks run in a fixed order: id uniqueness, payer and receiver
    /// resolution, funds, fee. On failure nothing is modified.
    pub fn process_transaction(&mut self, tx: Transaction) -> Result<String> {
        self.check_transaction(&tx).map_err(|kind| {
            warn!("Rejected transaction {}: {}", tx.id(), kind);
            LedgerError::new(Action::ProcessTransaction, kind)
        })?;

        let mut temp_state = self.open_block.balances.clone();
        temp_state
            .apply_transaction(&tx)
            .map_err(|kind| LedgerError::new(Action::ProcessTransaction, kind))?;
        self.open_block.balances = temp_state;

        let id = tx.id_str();
        debug!(
            "Accepted transaction {} into block {} ({} -> {}, amount {}, fee {})",
            id,
            self.open_block.number,
            tx.payer(),
            tx.receiver(),
            tx.amount(),
            tx.fee()
        );
        self.open_block.transactions.push(tx);

        if self.open_block.is_full() {
            self.seal_open_block();
        }
        Ok(id)
    }

    fn check_transaction(&self, tx: &Transaction) -> std::result::Result<(), ErrorKind> {
        if self.contains_transaction(tx.id()) {
            return Err(ErrorKind::DuplicateTransactionId(tx.id()));
        }

        self.resolve(tx.payer(), Party::Payer)?;
        self.resolve(tx.receiver(), Party::Receiver)?;

        let payer_balance = self
            .open_block
            .balances
            .balance(tx.payer())
            .ok_or_else(|| ErrorKind::invalid_address(Party::Payer, tx.payer()))?;
        if !self.open_block.balances.contains(tx.receiver()) {
            return Err(ErrorKind::invalid_address(Party::Receiver, tx.receiver()));
        }

        tx.validate_with_state(payer_balance)
    }

    /// Fixes the open block's hash, files it with the sealed blocks and opens
    /// its successor with a copy of its balances.
    fn seal_open_block(&mut self) {
        self.open_block.hash = self.open_block.compute_hash();
        let next = Block::next(&self.open_block);
        let sealed = std::mem::replace(&mut self.open_block, next);

        info!(
            "Sealed block {} (hash = {}, master = {})",
            sealed.number,
            sealed.hash,
            sealed.balances.balance(MASTER_ADDRESS).unwrap_or(0)
        );
        self.blocks.insert(sealed.number, sealed);
    }

    /// Verifies every sealed block: transaction count, link to the
    /// recomputed hash of its previous block, and total supply. The open
    /// block is not checked.
    pub fn validate(&self) -> Result<()> {
        validate_chain(&self.blocks).map_err(|kind| {
            warn!("Chain validation failed: {}", kind);
            LedgerError::new(Action::Validate, kind)
        })
    }
}
