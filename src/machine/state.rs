use crate::Amount;

/// Money collected by the machine and not yet withdrawn or donated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CashBox {
    balance: Amount,
}

impl CashBox {
    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn credit(&mut self, amount: Amount) {
        self.balance += amount;
    }

    /// Callers check the balance first; this never clamps.
    pub fn debit(&mut self, amount: Amount) {
        self.balance -= amount;
    }
}
