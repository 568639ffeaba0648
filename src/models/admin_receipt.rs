use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{self, WEIGHT_PLACES};
use crate::database::Entity;
use crate::models::DateRange;

/// Fine metal handed to the goldsmith.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GivenItem {
    pub product_name: String,
    pub pure_weight: f64,
    pub pure_percent: f64,
    pub melting: f64,
    pub total: f64,
}

impl GivenItem {
    pub fn new(product_name: String, pure_weight: f64, pure_percent: f64, melting: f64) -> Self {
        Self {
            product_name,
            pure_weight,
            pure_percent,
            melting,
            total: calculations::given_total(pure_weight, pure_percent, melting),
        }
    }

    fn recomputed(self) -> Self {
        Self::new(self.product_name, self.pure_weight, self.pure_percent, self.melting)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GivenTotals {
    pub pure_weight: f64,
    pub total: f64,
}

/// Finished ornaments coming back from the goldsmith.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedItem {
    pub product_name: String,
    pub final_ornaments_wt: f64,
    pub stone_weight: f64,
    pub sub_total: f64,
    pub making_charge_percent: f64,
    pub total: f64,
}

impl ReceivedItem {
    pub fn new(
        product_name: String,
        final_ornaments_wt: f64,
        stone_weight: f64,
        making_charge_percent: f64,
    ) -> Self {
        let sub_total = calculations::received_sub_total(final_ornaments_wt, stone_weight);
        Self {
            product_name,
            final_ornaments_wt,
            stone_weight,
            sub_total,
            making_charge_percent,
            total: calculations::received_total(sub_total, making_charge_percent),
        }
    }

    fn recomputed(self) -> Self {
        Self::new(
            self.product_name,
            self.final_ornaments_wt,
            self.stone_weight,
            self.making_charge_percent,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedTotals {
    pub final_ornaments_wt: f64,
    pub stone_weight: f64,
    pub sub_total: f64,
    pub total: f64,
}

/// The "given" side of an admin receipt. Built only through [`GivenLedger::new`],
/// so totals always match the items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GivenLedger {
    pub date: Option<NaiveDate>,
    pub items: Vec<GivenItem>,
    pub totals: GivenTotals,
}

impl GivenLedger {
    pub fn new(date: Option<NaiveDate>, items: Vec<GivenItem>) -> Self {
        let items: Vec<GivenItem> = items.into_iter().map(GivenItem::recomputed).collect();
        let totals = GivenTotals {
            pure_weight: calculations::sum(items.iter().map(|i| i.pure_weight), WEIGHT_PLACES),
            total: calculations::sum(items.iter().map(|i| i.total), WEIGHT_PLACES),
        };
        Self { date, items, totals }
    }

    pub fn is_populated(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn recomputed(self) -> Self {
        Self::new(self.date, self.items)
    }
}

/// The "received" side of an admin receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedLedger {
    pub date: Option<NaiveDate>,
    pub items: Vec<ReceivedItem>,
    pub totals: ReceivedTotals,
}

impl ReceivedLedger {
    pub fn new(date: Option<NaiveDate>, items: Vec<ReceivedItem>) -> Self {
        let items: Vec<ReceivedItem> = items.into_iter().map(ReceivedItem::recomputed).collect();
        let totals = ReceivedTotals {
            final_ornaments_wt: calculations::sum(
                items.iter().map(|i| i.final_ornaments_wt),
                WEIGHT_PLACES,
            ),
            stone_weight: calculations::sum(items.iter().map(|i| i.stone_weight), WEIGHT_PLACES),
            sub_total: calculations::sum(items.iter().map(|i| i.sub_total), WEIGHT_PLACES),
            total: calculations::sum(items.iter().map(|i| i.total), WEIGHT_PLACES),
        };
        Self { date, items, totals }
    }

    pub fn is_populated(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn recomputed(self) -> Self {
        Self::new(self.date, self.items)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminReceiptStatus {
    Empty,
    Incomplete,
    Complete,
}

impl AdminReceiptStatus {
    pub fn of(given: &GivenLedger, received: &ReceivedLedger) -> Self {
        match (given.is_populated(), received.is_populated()) {
            (false, false) => AdminReceiptStatus::Empty,
            (true, true) => AdminReceiptStatus::Complete,
            _ => AdminReceiptStatus::Incomplete,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminReceiptStatus::Empty => "empty",
            AdminReceiptStatus::Incomplete => "incomplete",
            AdminReceiptStatus::Complete => "complete",
        }
    }
}

impl fmt::Display for AdminReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminReceiptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" => Ok(AdminReceiptStatus::Empty),
            "incomplete" => Ok(AdminReceiptStatus::Incomplete),
            "complete" => Ok(AdminReceiptStatus::Complete),
            other => Err(format!("Unknown status '{other}'")),
        }
    }
}

/// Fine weight still owed: given total minus received total.
pub fn balance(given: &GivenLedger, received: &ReceivedLedger) -> f64 {
    let given_total = calculations::to_decimal(given.totals.total);
    let received_total = calculations::to_decimal(received.totals.total);
    calculations::round(
        given_total.checked_sub(received_total).unwrap_or(Decimal::ZERO),
        WEIGHT_PLACES,
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminReceipt {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub client_name: String,
    pub status: AdminReceiptStatus,
    pub given: GivenLedger,
    pub received: ReceivedLedger,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminReceipt {
    pub fn into_draft(self) -> AdminReceiptDraft {
        AdminReceiptDraft {
            client_id: self.client_id,
            client_name: self.client_name,
            given: self.given,
            received: self.received,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminReceiptDraft {
    pub client_id: Option<Uuid>,
    pub client_name: String,
    pub given: GivenLedger,
    pub received: ReceivedLedger,
}

impl AdminReceiptDraft {
    /// Ledgers with re-derived totals, as they are stored.
    pub fn computed_ledgers(&self) -> (GivenLedger, ReceivedLedger) {
        (self.given.clone().recomputed(), self.received.clone().recomputed())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdminReceiptFilter {
    pub client_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub status: Option<AdminReceiptStatus>,
    /// Matches when the given date, received date, creation day or last
    /// update day falls inside the range.
    pub activity: DateRange,
}

impl Entity for AdminReceipt {
    type Draft = AdminReceiptDraft;
    type Filter = AdminReceiptFilter;
    const LABEL: &'static str = "Admin receipt";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn given(pure: f64, pct: f64, melting: f64) -> GivenItem {
        GivenItem::new("Bar".into(), pure, pct, melting)
    }

    fn received(wt: f64, stone: f64, making: f64) -> ReceivedItem {
        ReceivedItem::new("Chain".into(), wt, stone, making)
    }

    #[test]
    fn zero_melting_gives_zero_total() {
        assert_eq!(given(10.0, 92.0, 0.0).total, 0.0);
        assert_eq!(given(10.0, 92.0, 100.0).total, 9.2);
    }

    #[test]
    fn received_item_adds_making_charge_to_sub_total() {
        let item = received(12.5, 2.5, 5.0);
        assert_eq!(item.sub_total, 10.0);
        assert_eq!(item.total, 10.5);
    }

    #[test]
    fn status_follows_populated_ledgers() {
        let empty_given = GivenLedger::default();
        let empty_received = ReceivedLedger::default();
        let some_given = GivenLedger::new(None, vec![given(10.0, 92.0, 100.0)]);
        let some_received = ReceivedLedger::new(None, vec![received(10.0, 0.0, 0.0)]);

        assert_eq!(AdminReceiptStatus::of(&empty_given, &empty_received), AdminReceiptStatus::Empty);
        assert_eq!(AdminReceiptStatus::of(&some_given, &empty_received), AdminReceiptStatus::Incomplete);
        assert_eq!(AdminReceiptStatus::of(&empty_given, &some_received), AdminReceiptStatus::Incomplete);
        assert_eq!(AdminReceiptStatus::of(&some_given, &some_received), AdminReceiptStatus::Complete);
    }

    #[test]
    fn ledger_totals_and_balance() {
        let g = GivenLedger::new(
            None,
            vec![given(10.0, 92.0, 100.0), given(5.0, 99.5, 0.0)],
        );
        assert_eq!(g.totals.pure_weight, 15.0);
        assert_eq!(g.totals.total, 9.2);

        let r = ReceivedLedger::new(
            None,
            vec![received(6.0, 1.0, 10.0), received(2.0, 0.0, 0.0)],
        );
        assert_eq!(r.totals.final_ornaments_wt, 8.0);
        assert_eq!(r.totals.stone_weight, 1.0);
        assert_eq!(r.totals.sub_total, 7.0);
        assert_eq!(r.totals.total, 7.5);

        assert_eq!(balance(&g, &r), 1.7);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Complete".parse::<AdminReceiptStatus>(), Ok(AdminReceiptStatus::Complete));
        assert_eq!(" empty ".parse::<AdminReceiptStatus>(), Ok(AdminReceiptStatus::Empty));
        assert!("done".parse::<AdminReceiptStatus>().is_err());
        assert_eq!(AdminReceiptStatus::Incomplete.to_string(), "incomplete");
    }
}
