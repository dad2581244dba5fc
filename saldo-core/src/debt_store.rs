//! Debt store: owns the debt collection and every mutation on it.
//!
//! Discipline for every command: validate fully, then mutate, then rewrite
//! the whole collection to storage as one logical step. Confirmation
//! prompts for destructive commands belong to the caller; by the time a
//! command runs the decision is already made.

use crate::debt::{Debt, DebtDraft, StatusFilter};
use crate::error::{Result, SaldoError};
use crate::storage::{self, Storage};
use chrono::Utc;
use serde::Serialize;
use std::cmp::Reverse;

/// Storage key for the debt collection.
pub const DEBTS_KEY: &str = "debts";

/// Aggregate view over all debts, settled or not.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DebtSummary {
    pub count: usize,
    /// Sum of face amounts, not remaining balances.
    pub total_amount: f64,
    pub settled_count: usize,
    /// Rounded mean of per-debt progress; 0 for an empty store.
    pub average_progress: u32,
}

#[derive(Debug)]
pub struct DebtStore<S: Storage> {
    storage: S,
    debts: Vec<Debt>,
}

impl<S: Storage> DebtStore<S> {
    /// Open the store, reading any previously persisted collection.
    pub fn load(storage: S) -> Result<Self> {
        let debts = storage::load_collection(&storage, DEBTS_KEY)?;
        log::debug!("loaded {} debt(s)", debts.len());
        Ok(Self { storage, debts })
    }

    pub fn len(&self) -> usize {
        self.debts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.debts.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Debt> {
        self.debts.iter().find(|d| d.id == id)
    }

    /// Validate and append a new debt. The record starts with zero paid
    /// installments and is never settled at birth.
    pub fn create(&mut self, draft: DebtDraft) -> Result<&Debt> {
        validate(&draft)?;
        let now = Utc::now();
        let debt = Debt {
            id: self.next_id(now.timestamp_millis()),
            name: draft.name.trim().to_string(),
            total_amount: draft.total_amount,
            total_installments: draft.total_installments,
            paid_installments: 0,
            kind: draft.kind,
            start_date: draft.start_date.unwrap_or_else(|| now.date_naive()),
            description: draft.description,
            settled: false,
            created_at: now,
        };
        log::debug!("create debt {} ({})", debt.id, debt.name);
        self.debts.push(debt);
        self.persist()?;
        Ok(&self.debts[self.debts.len() - 1])
    }

    /// Replace the editable fields of an existing debt.
    ///
    /// The edit form never supplies a paid count, so the stored one is
    /// kept, clamped into the new installment range so the paid <= total
    /// bound survives a shrunk plan. Editing always returns the debt to
    /// the active state; `created_at` is immutable.
    pub fn update(&mut self, id: i64, draft: DebtDraft) -> Result<&Debt> {
        validate(&draft)?;
        let idx = self
            .debts
            .iter()
            .position(|d| d.id == id)
            .ok_or(SaldoError::NotFound(id))?;

        let debt = &mut self.debts[idx];
        debt.name = draft.name.trim().to_string();
        debt.total_amount = draft.total_amount;
        debt.total_installments = draft.total_installments;
        debt.paid_installments = debt.paid_installments.min(draft.total_installments);
        debt.kind = draft.kind;
        if let Some(date) = draft.start_date {
            debt.start_date = date;
        }
        debt.description = draft.description;
        debt.settled = false;

        self.persist()?;
        Ok(&self.debts[idx])
    }

    /// Remove a debt. Missing ids are a silent no-op.
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let before = self.debts.len();
        self.debts.retain(|d| d.id != id);
        if self.debts.len() == before {
            return Ok(false);
        }
        log::debug!("deleted debt {id}");
        self.persist()?;
        Ok(true)
    }

    /// Record one paid installment and return the updated progress.
    ///
    /// Returns `Ok(None)` without touching state when the id is unknown,
    /// the debt is settled, or every installment is already paid (a
    /// reactivated debt can sit fully paid yet unsettled). Reaching the
    /// final installment settles the debt in the same mutation.
    pub fn pay_installment(&mut self, id: i64) -> Result<Option<u32>> {
        let Some(debt) = self.debts.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        if debt.settled || debt.paid_installments >= debt.total_installments {
            return Ok(None);
        }

        debt.paid_installments += 1;
        if debt.paid_installments == debt.total_installments {
            debt.settled = true;
        }
        let progress = debt.progress();

        self.persist()?;
        Ok(Some(progress))
    }

    /// Force-settle: marks the debt settled and the plan fully paid.
    /// Missing ids are a silent no-op.
    pub fn mark_settled(&mut self, id: i64) -> Result<Option<&Debt>> {
        let Some(idx) = self.debts.iter().position(|d| d.id == id) else {
            return Ok(None);
        };
        {
            let debt = &mut self.debts[idx];
            debt.settled = true;
            debt.paid_installments = debt.total_installments;
        }
        self.persist()?;
        Ok(Some(&self.debts[idx]))
    }

    /// Bring a settled debt back to active. The paid count is left as-is,
    /// not reset. Missing ids are a silent no-op.
    pub fn reactivate(&mut self, id: i64) -> Result<Option<&Debt>> {
        let Some(idx) = self.debts.iter().position(|d| d.id == id) else {
            return Ok(None);
        };
        self.debts[idx].settled = false;
        self.persist()?;
        Ok(Some(&self.debts[idx]))
    }

    /// Filtered, sorted view of the collection. Never mutates.
    ///
    /// Filter is a case-insensitive substring match on the name (empty
    /// matches all). Sort: active debts before settled ones, then by
    /// progress descending. `sort_by_key` is stable, so ties keep their
    /// stored relative order.
    pub fn list(&self, filter: &str, status: StatusFilter) -> Vec<&Debt> {
        let needle = filter.to_lowercase();
        let mut view: Vec<&Debt> = self
            .debts
            .iter()
            .filter(|d| d.name.to_lowercase().contains(&needle) && status.matches(d))
            .collect();
        view.sort_by_key(|d| (d.settled, Reverse(d.progress())));
        view
    }

    pub fn summary(&self) -> DebtSummary {
        let count = self.debts.len();
        let settled_count = self.debts.iter().filter(|d| d.settled).count();
        let total_amount = self.debts.iter().map(|d| d.total_amount).sum();
        let average_progress = if count == 0 {
            0
        } else {
            let progress_sum: u32 = self.debts.iter().map(Debt::progress).sum();
            (f64::from(progress_sum) / count as f64).round() as u32
        };
        DebtSummary {
            count,
            total_amount,
            settled_count,
            average_progress,
        }
    }

    /// Time-based id with a monotonic guard: never below any existing id,
    /// so same-millisecond creations cannot collide.
    fn next_id(&self, now_ms: i64) -> i64 {
        let max_existing = self.debts.iter().map(|d| d.id).max().unwrap_or(0);
        now_ms.max(max_existing + 1)
    }

    fn persist(&mut self) -> Result<()> {
        storage::save_collection(&mut self.storage, DEBTS_KEY, &self.debts)
    }
}

fn validate(draft: &DebtDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(SaldoError::Invalid("name must not be empty"));
    }
    if !draft.total_amount.is_finite() || draft.total_amount <= 0.0 {
        return Err(SaldoError::Invalid("total amount must be positive"));
    }
    if draft.total_installments == 0 {
        return Err(SaldoError::Invalid("installment count must be positive"));
    }
    Ok(())
}
