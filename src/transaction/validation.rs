/// Acceptance rules for a transaction against the payer's current balance
use crate::error::ErrorKind;
use crate::transaction::types::Transaction;

/// Smallest fee a transaction may carry.
pub const MIN_FEE: u64 = 10;

impl Transaction {
    /// Total the payer is debited, or `None` if `amount + fee` overflows.
    pub fn total_debit(&self) -> Option<u64> {
        self.amount().checked_add(self.fee())
    }

    /// Checks that the payer can cover `amount + fee`.
    pub fn validate_funds(&self, payer_balance: u64) -> Result<(), ErrorKind> {
        match self.total_debit() {
            Some(required) if required <= payer_balance => Ok(()),
            Some(required) => Err(ErrorKind::InsufficientFunds {
                balance: payer_balance,
                required,
            }),
            None => Err(ErrorKind::InsufficientFunds {
                balance: payer_balance,
                required: u64::MAX,
            }),
        }
    }

    pub fn validate_fee(&self) -> Result<(), ErrorKind> {
        if self.fee() < MIN_FEE {
            return Err(ErrorKind::FeeTooLow {
                fee: self.fee(),
                minimum: MIN_FEE,
            });
        }
        Ok(())
    }

    /// Stateful checks, funds first and fee second.
    ///
    /// Id uniqueness and address resolution depend on the whole chain and are
    /// checked by the ledger before this is called.
    pub fn validate_with_state(&self, payer_balance: u64) -> Result<(), ErrorKind> {
        self.validate_funds(payer_balance)?;
        self.validate_fee()
    }
}
