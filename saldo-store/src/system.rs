//! Startup wiring: explicit store instances opened from one data
//! directory. There is no ambient global state; whatever process hosts the
//! library owns a `FinanceSystem` and hands out access itself.

use crate::json_file::JsonFileStorage;
use anyhow::{Context, Result};
use saldo_core::{DebtStore, Ledger};
use std::path::{Path, PathBuf};

/// Default data directory, `$HOME/.saldo`.
pub fn saldo_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".saldo"))
}

/// The wired-up library: debt store and ledger over file storage in a
/// shared directory. Each collection writes its own key, so the two
/// stores never contend.
pub struct FinanceSystem {
    pub debts: DebtStore<JsonFileStorage>,
    pub ledger: Ledger<JsonFileStorage>,
}

impl FinanceSystem {
    pub fn open(dir: &Path) -> Result<Self> {
        let debts = DebtStore::load(
            JsonFileStorage::open(dir).with_context(|| format!("open {}", dir.display()))?,
        )
        .context("load debts")?;
        let ledger = Ledger::load(
            JsonFileStorage::open(dir).with_context(|| format!("open {}", dir.display()))?,
        )
        .context("load ledger")?;
        Ok(Self { debts, ledger })
    }

    pub fn open_default() -> Result<Self> {
        Self::open(&saldo_home()?)
    }
}
