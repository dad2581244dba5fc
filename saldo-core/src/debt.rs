//! Debt entity and its derived metrics.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A long-term installment obligation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Debt {
    /// Unique identifier, assigned at creation, never reused.
    pub id: i64,
    /// Non-empty display label.
    pub name: String,
    /// Full face amount, fixed by create/update, never derived.
    pub total_amount: f64,
    /// Fixed scale for progress calculation. Always positive for records
    /// created through the store.
    pub total_installments: u32,
    /// Installments paid so far, in `[0, total_installments]`.
    pub paid_installments: u32,
    pub kind: DebtKind,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    /// Fully paid or manually closed. Cleared by `reactivate` without
    /// touching `paid_installments`, so a fully-paid-but-unsettled debt is
    /// a legal state.
    pub settled: bool,
    /// Creation timestamp, immutable across edits.
    pub created_at: DateTime<Utc>,
}

impl Debt {
    /// Rounded percentage of installments paid.
    ///
    /// Stored data is not validated on load, so a record with zero total
    /// installments reports 0 instead of dividing by zero.
    pub fn progress(&self) -> u32 {
        if self.total_installments == 0 {
            return 0;
        }
        let ratio = f64::from(self.paid_installments) / f64::from(self.total_installments);
        (ratio * 100.0).round() as u32
    }

    /// Per-installment amount, recomputed on demand.
    pub fn installment_amount(&self) -> f64 {
        if self.total_installments == 0 {
            return 0.0;
        }
        self.total_amount / f64::from(self.total_installments)
    }

    /// Amount paid so far, recomputed on demand.
    pub fn amount_paid(&self) -> f64 {
        self.installment_amount() * f64::from(self.paid_installments)
    }
}

/// Closed set of debt categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DebtKind {
    #[serde(rename = "consortium")]
    Consortium,
    #[serde(rename = "loan")]
    Loan,
    #[serde(rename = "financing")]
    Financing,
    #[serde(rename = "other")]
    Other,
}

impl DebtKind {
    /// Display name for badges and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            DebtKind::Consortium => "Consortium",
            DebtKind::Loan => "Loan",
            DebtKind::Financing => "Financing",
            DebtKind::Other => "Other",
        }
    }
}

/// Form-shaped input for create and update. The paid count is never part
/// of a draft; it belongs to the stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct DebtDraft {
    pub name: String,
    pub total_amount: f64,
    pub total_installments: u32,
    pub kind: DebtKind,
    /// Defaults to today (UTC) when omitted.
    pub start_date: Option<NaiveDate>,
    pub description: Option<String>,
}

/// Status facet of the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Active,
    Settled,
}

impl StatusFilter {
    pub fn matches(&self, debt: &Debt) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !debt.settled,
            StatusFilter::Settled => debt.settled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(paid: u32, total: u32) -> Debt {
        Debt {
            id: 1,
            name: "Car loan".to_string(),
            total_amount: 12000.0,
            total_installments: total,
            paid_installments: paid,
            kind: DebtKind::Loan,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            description: None,
            settled: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn progress_rounds_to_nearest_percent() {
        assert_eq!(sample(1, 3).progress(), 33);
        assert_eq!(sample(2, 3).progress(), 67);
        assert_eq!(sample(5, 10).progress(), 50);
        assert_eq!(sample(10, 10).progress(), 100);
    }

    #[test]
    fn progress_defined_for_corrupt_record() {
        // A zero-installment record can only come from unvalidated storage.
        assert_eq!(sample(0, 0).progress(), 0);
        assert_eq!(sample(0, 0).installment_amount(), 0.0);
    }

    #[test]
    fn installment_amounts_recomputed() {
        let d = sample(3, 12);
        assert_eq!(d.installment_amount(), 1000.0);
        assert_eq!(d.amount_paid(), 3000.0);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(DebtKind::Consortium.label(), "Consortium");
        assert_eq!(DebtKind::Financing.label(), "Financing");
    }

    #[test]
    fn serde_round_trip_preserves_every_field() {
        let mut debt = sample(7, 24);
        debt.description = Some("workshop equipment".to_string());
        debt.settled = true;

        let json = serde_json::to_string(&debt).unwrap();
        let back: Debt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, debt);
    }

    #[test]
    fn description_defaults_to_none_when_absent() {
        // Records written before the field existed must still load.
        let json = r#"{
            "id": 2,
            "name": "Old record",
            "total_amount": 500.0,
            "total_installments": 5,
            "paid_installments": 2,
            "kind": "loan",
            "start_date": "2024-05-01",
            "settled": false,
            "created_at": "2024-05-01T12:00:00Z"
        }"#;
        let debt: Debt = serde_json::from_str(json).unwrap();
        assert_eq!(debt.description, None);
        assert_eq!(debt.kind, DebtKind::Loan);
    }
}
