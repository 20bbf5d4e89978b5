//! HashLedger - an in-memory ledger of account balances kept in a hash-chained
//! sequence of blocks
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Blocks, the [`Ledger`] and chain validation
//! - [`transaction`] - Transaction type and acceptance rules
//! - [`account`] - Account records and the fixed total supply
//!
//! ## Hashing
//! - [`crypto`] - SHA-256 digests rendered as hex
//! - [`merkle`] - Merkle root over transaction fingerprints
//!
//! ## Interpreter
//! - [`script`] - Line-oriented command interpreter
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod account;
pub mod blockchain;
pub mod transaction;

// ============================================================================
// Hashing
// ============================================================================
pub mod crypto;
pub mod merkle;

// ============================================================================
// Interpreter
// ============================================================================
pub mod script;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;

pub use account::{Account, MASTER_ADDRESS, TOTAL_SUPPLY};
pub use blockchain::{Block, Ledger, BLOCK_CAPACITY, GENESIS_BLOCK_NUMBER};
pub use error::{Action, ErrorKind, LedgerError};
pub use transaction::{Transaction, TransactionId, MIN_FEE};
