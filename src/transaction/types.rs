/// Transaction types for HashLedger
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a transaction, unique across the whole chain.
pub type TransactionId = u64;

/// An immutable transfer request from `payer` to `receiver`.
///
/// The payer is debited `amount + fee`, the receiver is credited `amount`
/// and the master account collects `fee`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    amount: u64,
    fee: u64,
    note: String,
    payer: String,
    receiver: String,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        amount: u64,
        fee: u64,
        note: impl Into<String>,
        payer: impl Into<String>,
        receiver: impl Into<String>,
    ) -> Self {
        Transaction {
            id,
            amount,
            fee,
            note: note.into(),
            payer: payer.into(),
            receiver: receiver.into(),
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn fee(&self) -> u64 {
        self.fee
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn payer(&self) -> &str {
        &self.payer
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    /// Canonical string form of the id, as returned by `process_transaction`.
    pub fn id_str(&self) -> String {
        self.id.to_string()
    }

    /// Copy of this transaction with a different amount.
    ///
    /// Accepted transactions are never modified; this only produces a new,
    /// detached value.
    pub fn with_amount(&self, amount: u64) -> Self {
        Transaction {
            amount,
            ..self.clone()
        }
    }

    /// Hash input for this transaction.
    ///
    /// Field order is fixed: fee, amount, note, payer, receiver, id. Fields are
    /// separated by `|` so adjacent numeric fields cannot run together.
    pub fn fingerprint(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.fee, self.amount, self.note, self.payer, self.receiver, self.id
        )
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Transaction Id: {}", self.id)?;
        writeln!(f, "Amount: {}", self.amount)?;
        writeln!(f, "Fee: {}", self.fee)?;
        writeln!(f, "Note: {}", self.note)?;
        writeln!(f, "Payer: {}", self.payer)?;
        write!(f, "Receiver: {}", self.receiver)
    }
}
