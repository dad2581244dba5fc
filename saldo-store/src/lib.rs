//! saldo-store: file-backed persistence and startup wiring for saldo-core.

pub mod json_file;
pub mod system;

pub use json_file::JsonFileStorage;
pub use system::{FinanceSystem, saldo_home};
