//! Wallet, loan repayment and the insolvency watchdog.

use std::time::Duration;

use resort_tycoon_core::{BankruptcyCause, BankruptcyConfig, LoanState};
use serde::{Deserialize, Serialize};

/// Remaining balances below this are treated as fully repaid.
const REPAYMENT_EPSILON: f64 = 1e-6;

/// Insolvency watchdog state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankruptcyState {
    /// Whether the resort went bankrupt.
    pub bankrupt: bool,
    /// Condition that triggered bankruptcy.
    pub cause: Option<BankruptcyCause>,
    /// How long the balance has been negative.
    pub negative_timer: Duration,
    /// How long loan payments have outweighed income.
    pub debt_timer: Duration,
}

/// Outcome of a single loan tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct LoanPayment {
    pub(crate) amount: f64,
    pub(crate) remaining: f64,
    pub(crate) repaid: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Finance {
    balance: f64,
    loan: Option<LoanState>,
    bankruptcy: BankruptcyState,
}

impl Finance {
    pub(crate) fn new(balance: f64) -> Self {
        Self {
            balance,
            loan: None,
            bankruptcy: BankruptcyState::default(),
        }
    }

    pub(crate) fn balance(&self) -> f64 {
        self.balance
    }

    pub(crate) fn loan(&self) -> Option<LoanState> {
        self.loan
    }

    pub(crate) fn bankruptcy(&self) -> BankruptcyState {
        self.bankruptcy
    }

    pub(crate) fn is_bankrupt(&self) -> bool {
        self.bankruptcy.bankrupt
    }

    pub(crate) fn loan_payment_per_sec(&self) -> f64 {
        self.loan.map_or(0.0, |loan| loan.payment_per_second)
    }

    /// Applies a signed delta and returns the new balance.
    pub(crate) fn adjust(&mut self, delta: f64) -> f64 {
        self.balance += delta;
        self.balance
    }

    /// Issues a loan and credits its principal. The caller checks for an existing loan.
    pub(crate) fn issue_loan(&mut self, principal: f64, rate: f64, duration_secs: u32) -> LoanState {
        let loan = LoanState::issue(principal, rate, duration_secs);
        self.loan = Some(loan);
        self.balance += principal;
        loan
    }

    /// Debits one scheduled payment, clearing the loan after the final one.
    pub(crate) fn pay_loan(&mut self) -> Option<LoanPayment> {
        let loan = self.loan.as_mut()?;
        let amount = loan.payment_per_second;
        self.balance -= amount;
        loan.payments_made = loan.payments_made.saturating_add(1);
        loan.remaining_owed = (loan.remaining_owed - amount).max(0.0);

        let repaid = loan.payments_made >= loan.duration_secs
            || loan.remaining_owed <= REPAYMENT_EPSILON;
        if repaid {
            loan.remaining_owed = 0.0;
        }
        let remaining = loan.remaining_owed;
        if repaid {
            self.loan = None;
        }
        Some(LoanPayment {
            amount,
            remaining,
            repaid,
        })
    }

    /// Advances the watchdog by `elapsed`, returning the cause on the tick that bankrupts.
    pub(crate) fn watch(
        &mut self,
        elapsed: Duration,
        economy_total: i64,
        config: &BankruptcyConfig,
    ) -> Option<BankruptcyCause> {
        if self.bankruptcy.bankrupt {
            return None;
        }

        let state = &mut self.bankruptcy;
        if self.balance < 0.0 {
            state.negative_timer = state.negative_timer.saturating_add(elapsed);
        } else {
            state.negative_timer = Duration::ZERO;
        }

        let payment = self.loan.map_or(0.0, |loan| loan.payment_per_second);
        if payment > 0.0 && payment > economy_total as f64 * config.debt_income_ratio {
            state.debt_timer = state.debt_timer.saturating_add(elapsed);
        } else {
            state.debt_timer = Duration::ZERO;
        }

        let cause = if state.negative_timer >= config.negative_grace() {
            BankruptcyCause::NegativeBalance
        } else if state.debt_timer >= config.debt_grace() {
            BankruptcyCause::UnsustainableDebt
        } else {
            return None;
        };
        state.bankrupt = true;
        state.cause = Some(cause);
        Some(cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUARTER: Duration = Duration::from_millis(250);

    #[test]
    fn loan_is_repaid_exactly_after_schedule() {
        let mut finance = Finance::new(1_000.0);
        let loan = finance.issue_loan(500.0, 0.1, 60);
        assert!((loan.total_owed - 550.0).abs() < f64::EPSILON);
        assert!((finance.balance() - 1_500.0).abs() < f64::EPSILON);

        let mut last = None;
        for _ in 0..60 {
            last = finance.pay_loan();
        }
        let last = last.expect("final payment");
        assert!(last.repaid);
        assert_eq!(last.remaining, 0.0);
        assert!(finance.loan().is_none());
        assert!((finance.balance() - 950.0).abs() < 1e-6);
        assert!(finance.pay_loan().is_none());
    }

    #[test]
    fn remaining_never_increases() {
        let mut finance = Finance::new(0.0);
        let _ = finance.issue_loan(2_000.0, 0.2, 60);
        let mut previous = f64::INFINITY;
        while let Some(payment) = finance.pay_loan() {
            assert!(payment.remaining <= previous);
            previous = payment.remaining;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn negative_balance_bankrupts_after_grace() {
        let config = BankruptcyConfig::default();
        let mut finance = Finance::new(-1.0);
        for _ in 0..11 {
            assert_eq!(finance.watch(QUARTER, 0, &config), None);
        }
        assert_eq!(
            finance.watch(QUARTER, 0, &config),
            Some(BankruptcyCause::NegativeBalance)
        );
        assert!(finance.is_bankrupt());
        assert_eq!(finance.watch(QUARTER, 0, &config), None, "fires once");
    }

    #[test]
    fn recovering_balance_resets_the_timer() {
        let config = BankruptcyConfig::default();
        let mut finance = Finance::new(-1.0);
        for _ in 0..10 {
            let _ = finance.watch(QUARTER, 0, &config);
        }
        let _ = finance.adjust(5.0);
        assert_eq!(finance.watch(QUARTER, 0, &config), None);
        assert_eq!(finance.bankruptcy().negative_timer, Duration::ZERO);
    }

    #[test]
    fn unaffordable_debt_bankrupts_after_grace() {
        let config = BankruptcyConfig::default();
        let mut finance = Finance::new(1_000.0);
        let _ = finance.issue_loan(5_000.0, 0.35, 60);
        for _ in 0..19 {
            assert_eq!(finance.watch(QUARTER, 100, &config), None);
        }
        assert_eq!(
            finance.watch(QUARTER, 100, &config),
            Some(BankruptcyCause::UnsustainableDebt)
        );
    }

    #[test]
    fn covered_debt_is_tolerated() {
        let config = BankruptcyConfig::default();
        let mut finance = Finance::new(1_000.0);
        let _ = finance.issue_loan(500.0, 0.1, 60);
        for _ in 0..40 {
            assert_eq!(finance.watch(QUARTER, 20, &config), None);
        }
        assert_eq!(finance.bankruptcy().debt_timer, Duration::ZERO);
    }
}
