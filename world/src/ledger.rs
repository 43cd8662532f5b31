use kaiju_cats_core::PlacementError;

/// Running total of command spending against a fixed allowance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BudgetLedger {
    total: u32,
    spent: u32,
}

impl BudgetLedger {
    pub(crate) const fn new(total: u32) -> Self {
        Self { total, spent: 0 }
    }

    pub(crate) const fn total(&self) -> u32 {
        self.total
    }

    pub(crate) const fn spent(&self) -> u32 {
        self.spent
    }

    pub(crate) const fn remaining(&self) -> u32 {
        self.total - self.spent
    }

    /// Charges `charge` after refunding `refund`, or leaves the ledger untouched
    /// when the result would exceed the total.
    pub(crate) fn replace(&mut self, refund: u32, charge: u32) -> Result<(), PlacementError> {
        let spent = self
            .spent
            .checked_sub(refund)
            .expect("refund exceeds what was spent")
            .checked_add(charge)
            .filter(|spent| *spent <= self.total)
            .ok_or(PlacementError::OverBudget)?;
        self.spent = spent;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charges_up_to_the_total() {
        let mut ledger = BudgetLedger::new(30);
        assert_eq!(ledger.replace(0, 20), Ok(()));
        assert_eq!(ledger.replace(0, 10), Ok(()));
        assert_eq!(ledger.remaining(), 0);
        assert_eq!(ledger.replace(0, 10), Err(PlacementError::OverBudget));
        assert_eq!(ledger.spent(), 30);
    }

    #[test]
    fn refund_frees_room_for_a_pricier_command() {
        let mut ledger = BudgetLedger::new(40);
        ledger.replace(0, 10).expect("turn fits");
        ledger.replace(0, 20).expect("stomp fits");
        assert_eq!(ledger.replace(10, 30), Err(PlacementError::OverBudget));
        assert_eq!(ledger.spent(), 30);
        assert_eq!(ledger.replace(20, 30), Ok(()));
        assert_eq!(ledger.spent(), 40);
        assert_eq!(ledger.total(), 40);
    }
}
