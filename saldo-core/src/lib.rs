//! saldo-core: debt tracking and income/expense ledger semantics.
//!
//! Single-threaded and synchronous by design: every command validates
//! fully, mutates the in-memory collection, then rewrites that collection
//! wholesale to its storage key. A host that needs concurrency wraps a
//! store in its own mutual-exclusion scope.

pub mod debt;
pub mod debt_store;
pub mod error;
pub mod ledger;
pub mod storage;

pub use debt::{Debt, DebtDraft, DebtKind, StatusFilter};
pub use debt_store::{DEBTS_KEY, DebtStore, DebtSummary};
pub use error::{Result, SaldoError, StorageError};
pub use ledger::{
    BalanceState, EXPENSES_KEY, Entry, Flow, INCOMES_KEY, Ledger, LedgerTotals, classify_balance,
};
pub use storage::{MemoryStorage, Storage, load_collection, save_collection};
