//! Income/expense ledger: two parallel entry lists with positional CRUD,
//! recomputed totals, and the low-balance classification.

use crate::error::{Result, SaldoError};
use crate::storage::{self, Storage};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Storage key for the income list.
pub const INCOMES_KEY: &str = "incomes";
/// Storage key for the expense list.
pub const EXPENSES_KEY: &str = "expenses";

/// Fraction of total income below which a positive balance counts as low.
const LOW_BALANCE_RATIO: f64 = 0.20;

/// A single ledger line. Entries carry no id; they are addressed by
/// position within their list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub date: NaiveDate,
    pub label: String,
    /// Always stored rounded to 2 decimal places.
    pub amount: f64,
}

/// Which of the two lists an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Income,
    Expense,
}

impl Flow {
    fn key(&self) -> &'static str {
        match self {
            Flow::Income => INCOMES_KEY,
            Flow::Expense => EXPENSES_KEY,
        }
    }
}

/// Recomputed aggregate over both lists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LedgerTotals {
    pub income_total: f64,
    pub expense_total: f64,
    pub balance: f64,
}

/// Classification of the current balance against total income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BalanceState {
    /// Balance is zero or below.
    Negative,
    /// Positive, but under 20% of total income.
    Low,
    Normal,
}

/// Classify a balance against the income it came from.
pub fn classify_balance(balance: f64, income_total: f64) -> BalanceState {
    if balance <= 0.0 {
        BalanceState::Negative
    } else if balance < income_total * LOW_BALANCE_RATIO {
        BalanceState::Low
    } else {
        BalanceState::Normal
    }
}

#[derive(Debug)]
pub struct Ledger<S: Storage> {
    storage: S,
    incomes: Vec<Entry>,
    expenses: Vec<Entry>,
}

impl<S: Storage> Ledger<S> {
    /// Open the ledger, reading both persisted lists. Absent keys load as
    /// empty lists.
    pub fn load(storage: S) -> Result<Self> {
        let incomes = storage::load_collection(&storage, INCOMES_KEY)?;
        let expenses = storage::load_collection(&storage, EXPENSES_KEY)?;
        log::debug!("loaded {} income(s), {} expense(s)", incomes.len(), expenses.len());
        Ok(Self {
            storage,
            incomes,
            expenses,
        })
    }

    pub fn entries(&self, flow: Flow) -> &[Entry] {
        match flow {
            Flow::Income => &self.incomes,
            Flow::Expense => &self.expenses,
        }
    }

    /// Append a validated entry to the end of a list.
    pub fn add(&mut self, flow: Flow, date: NaiveDate, label: &str, amount: f64) -> Result<&Entry> {
        let entry = Entry {
            date,
            label: validated_label(label)?.to_string(),
            amount: round2(validated_amount(amount)?),
        };
        self.list_mut(flow).push(entry);
        self.persist(flow)?;
        let list = self.entries(flow);
        Ok(&list[list.len() - 1])
    }

    /// Remove by position. Out-of-range indexes are a silent no-op.
    pub fn remove_at(&mut self, flow: Flow, index: usize) -> Result<Option<Entry>> {
        let list = self.list_mut(flow);
        if index >= list.len() {
            return Ok(None);
        }
        let removed = list.remove(index);
        self.persist(flow)?;
        Ok(Some(removed))
    }

    /// Replace the entry at `index` wholesale. A non-finite amount aborts
    /// the edit with the prior record retained; nothing is ever replaced
    /// partially.
    pub fn edit_at(
        &mut self,
        flow: Flow,
        index: usize,
        date: NaiveDate,
        label: &str,
        amount: f64,
    ) -> Result<&Entry> {
        let amount = round2(validated_amount(amount)?);
        let list = self.list_mut(flow);
        if index >= list.len() {
            return Err(SaldoError::BadIndex(index));
        }
        list[index] = Entry {
            date,
            label: label.to_string(),
            amount,
        };
        self.persist(flow)?;
        Ok(&self.entries(flow)[index])
    }

    /// Sums over both lists, recomputed on every call.
    pub fn totals(&self) -> LedgerTotals {
        let income_total: f64 = self.incomes.iter().map(|e| e.amount).sum();
        let expense_total: f64 = self.expenses.iter().map(|e| e.amount).sum();
        LedgerTotals {
            income_total,
            expense_total,
            balance: income_total - expense_total,
        }
    }

    /// Low-balance classification of the current ledger state. Never
    /// cached; always derived from the lists as they stand.
    pub fn balance_state(&self) -> BalanceState {
        let totals = self.totals();
        classify_balance(totals.balance, totals.income_total)
    }

    fn list_mut(&mut self, flow: Flow) -> &mut Vec<Entry> {
        match flow {
            Flow::Income => &mut self.incomes,
            Flow::Expense => &mut self.expenses,
        }
    }

    fn persist(&mut self, flow: Flow) -> Result<()> {
        match flow {
            Flow::Income => storage::save_collection(&mut self.storage, flow.key(), &self.incomes),
            Flow::Expense => storage::save_collection(&mut self.storage, flow.key(), &self.expenses),
        }
    }
}

fn validated_label(label: &str) -> Result<&str> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(SaldoError::Invalid("label must not be empty"));
    }
    Ok(trimmed)
}

fn validated_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() {
        return Err(SaldoError::Invalid("amount must be a finite number"));
    }
    Ok(amount)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn ledger() -> Ledger<MemoryStorage> {
        Ledger::load(MemoryStorage::new()).unwrap()
    }

    #[test]
    fn add_appends_and_rounds_to_cents() {
        let mut l = ledger();
        let entry = l.add(Flow::Income, date(1), "Salary", 1234.5678).unwrap();
        assert_eq!(entry.amount, 1234.57);
        assert_eq!(l.entries(Flow::Income).len(), 1);
        assert!(l.entries(Flow::Expense).is_empty());
    }

    #[test]
    fn add_rejects_blank_label_and_non_finite_amount() {
        let mut l = ledger();
        assert!(matches!(
            l.add(Flow::Income, date(1), "   ", 10.0),
            Err(SaldoError::Invalid(_))
        ));
        assert!(matches!(
            l.add(Flow::Expense, date(1), "Rent", f64::NAN),
            Err(SaldoError::Invalid(_))
        ));
        assert!(matches!(
            l.add(Flow::Expense, date(1), "Rent", f64::INFINITY),
            Err(SaldoError::Invalid(_))
        ));
        assert!(l.entries(Flow::Income).is_empty());
        assert!(l.entries(Flow::Expense).is_empty());
    }

    #[test]
    fn remove_at_is_positional_and_silent_out_of_range() {
        let mut l = ledger();
        l.add(Flow::Expense, date(1), "Groceries", 80.0).unwrap();
        l.add(Flow::Expense, date(2), "Fuel", 50.0).unwrap();

        assert!(l.remove_at(Flow::Expense, 5).unwrap().is_none());
        let removed = l.remove_at(Flow::Expense, 0).unwrap().unwrap();
        assert_eq!(removed.label, "Groceries");
        assert_eq!(l.entries(Flow::Expense)[0].label, "Fuel");
    }

    #[test]
    fn edit_at_replaces_whole_entry() {
        let mut l = ledger();
        l.add(Flow::Income, date(1), "Salary", 3000.0).unwrap();

        let edited = l.edit_at(Flow::Income, 0, date(5), "Salary + bonus", 3500.559).unwrap();
        assert_eq!(edited.date, date(5));
        assert_eq!(edited.label, "Salary + bonus");
        assert_eq!(edited.amount, 3500.56);
    }

    #[test]
    fn edit_at_aborts_on_non_finite_amount() {
        let mut l = ledger();
        l.add(Flow::Income, date(1), "Salary", 3000.0).unwrap();
        let before = l.entries(Flow::Income)[0].clone();

        assert!(matches!(
            l.edit_at(Flow::Income, 0, date(9), "Changed", f64::NAN),
            Err(SaldoError::Invalid(_))
        ));
        assert_eq!(l.entries(Flow::Income)[0], before);
    }

    #[test]
    fn edit_at_out_of_range_is_an_error() {
        let mut l = ledger();
        assert!(matches!(
            l.edit_at(Flow::Income, 3, date(1), "Ghost", 1.0),
            Err(SaldoError::BadIndex(3))
        ));
    }

    #[test]
    fn totals_sum_both_lists() {
        let mut l = ledger();
        l.add(Flow::Income, date(1), "Salary", 100.0).unwrap();
        l.add(Flow::Income, date(2), "Freelance", 50.0).unwrap();
        l.add(Flow::Expense, date(3), "Groceries", 30.0).unwrap();

        let totals = l.totals();
        assert_eq!(totals.income_total, 150.0);
        assert_eq!(totals.expense_total, 30.0);
        assert_eq!(totals.balance, 120.0);
        assert_eq!(l.balance_state(), BalanceState::Normal);
    }

    #[test]
    fn balance_classification_thresholds() {
        // 5 left out of 100 earned: under the 20-unit threshold
        assert_eq!(classify_balance(5.0, 100.0), BalanceState::Low);
        // in the red
        assert_eq!(classify_balance(-10.0, 100.0), BalanceState::Negative);
        // exactly zero counts as negative
        assert_eq!(classify_balance(0.0, 100.0), BalanceState::Negative);
        // at the threshold exactly is not low
        assert_eq!(classify_balance(20.0, 100.0), BalanceState::Normal);
        assert_eq!(classify_balance(120.0, 150.0), BalanceState::Normal);
    }

    #[test]
    fn balance_state_tracks_ledger_mutations() {
        let mut l = ledger();
        l.add(Flow::Income, date(1), "Salary", 100.0).unwrap();
        l.add(Flow::Expense, date(2), "Rent", 95.0).unwrap();
        assert_eq!(l.balance_state(), BalanceState::Low);

        l.add(Flow::Expense, date(3), "Repairs", 15.0).unwrap();
        assert_eq!(l.balance_state(), BalanceState::Negative);

        l.remove_at(Flow::Expense, 0).unwrap();
        l.remove_at(Flow::Expense, 0).unwrap();
        assert_eq!(l.balance_state(), BalanceState::Normal);
    }

    #[test]
    fn entry_serde_round_trip_preserves_every_field() {
        let entry = Entry {
            date: date(14),
            label: "Electricity bill".to_string(),
            amount: 187.42,
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn each_list_persists_under_its_own_key() {
        let mut l = ledger();
        l.add(Flow::Income, date(1), "Salary", 100.0).unwrap();
        l.add(Flow::Expense, date(2), "Rent", 40.0).unwrap();

        let reloaded = Ledger::load(l.storage.clone()).unwrap();
        assert_eq!(reloaded.entries(Flow::Income), l.entries(Flow::Income));
        assert_eq!(reloaded.entries(Flow::Expense), l.entries(Flow::Expense));
    }
}
