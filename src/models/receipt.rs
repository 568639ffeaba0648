use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{self, AMOUNT_PLACES, WEIGHT_PLACES};
use crate::database::Entity;
use crate::models::DateRange;

/// One line of a client receipt. `net_weight` and `final_weight` are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub item_name: String,
    pub tag: String,
    pub gross_weight: f64,
    pub stone_weight: f64,
    pub net_weight: f64,
    pub melting_touch: f64,
    pub final_weight: f64,
    pub stone_amount: f64,
}

impl ReceiptItem {
    pub fn new(
        item_name: String,
        tag: String,
        gross_weight: f64,
        stone_weight: f64,
        melting_touch: f64,
        stone_amount: f64,
    ) -> Self {
        let net_weight = calculations::net_weight(gross_weight, stone_weight);
        Self {
            item_name,
            tag,
            gross_weight,
            stone_weight,
            net_weight,
            melting_touch,
            final_weight: calculations::final_weight(net_weight, melting_touch),
            stone_amount,
        }
    }

    /// Re-derive the computed columns from the raw ones.
    pub fn recomputed(self) -> Self {
        Self::new(
            self.item_name,
            self.tag,
            self.gross_weight,
            self.stone_weight,
            self.melting_touch,
            self.stone_amount,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptTotals {
    pub gross_weight: f64,
    pub stone_weight: f64,
    pub net_weight: f64,
    pub final_weight: f64,
    pub stone_amount: f64,
}

impl ReceiptTotals {
    pub fn of(items: &[ReceiptItem]) -> Self {
        Self {
            gross_weight: calculations::sum(items.iter().map(|i| i.gross_weight), WEIGHT_PLACES),
            stone_weight: calculations::sum(items.iter().map(|i| i.stone_weight), WEIGHT_PLACES),
            net_weight: calculations::sum(items.iter().map(|i| i.net_weight), WEIGHT_PLACES),
            final_weight: calculations::sum(items.iter().map(|i| i.final_weight), WEIGHT_PLACES),
            stone_amount: calculations::sum(items.iter().map(|i| i.stone_amount), AMOUNT_PLACES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub client_name: String,
    pub shop_name: String,
    pub phone_number: String,
    pub metal_type: String,
    pub issue_date: NaiveDate,
    pub items: Vec<ReceiptItem>,
    pub totals: ReceiptTotals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Receipt {
    pub fn into_draft(self) -> ReceiptDraft {
        ReceiptDraft {
            client_id: self.client_id,
            client_name: self.client_name,
            shop_name: self.shop_name,
            phone_number: self.phone_number,
            metal_type: self.metal_type,
            issue_date: self.issue_date,
            items: self.items,
        }
    }
}

/// Receipt content as written by a create or update. Totals are never taken
/// from the caller; stores derive them from [`ReceiptDraft::computed_items`].
#[derive(Debug, Clone)]
pub struct ReceiptDraft {
    pub client_id: Option<Uuid>,
    pub client_name: String,
    pub shop_name: String,
    pub phone_number: String,
    pub metal_type: String,
    pub issue_date: NaiveDate,
    pub items: Vec<ReceiptItem>,
}

impl ReceiptDraft {
    /// Items with freshly derived columns, as they are stored.
    pub fn computed_items(&self) -> Vec<ReceiptItem> {
        self.items.iter().cloned().map(ReceiptItem::recomputed).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReceiptFilter {
    pub client_id: Option<Uuid>,
    pub client_name: Option<String>,
    pub metal_type: Option<String>,
    pub issue_dates: DateRange,
}

impl Entity for Receipt {
    type Draft = ReceiptDraft;
    type Filter = ReceiptFilter;
    const LABEL: &'static str = "Receipt";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(gross: f64, stone: f64, touch: f64, amount: f64) -> ReceiptItem {
        ReceiptItem::new("Bangle".into(), "T-1".into(), gross, stone, touch, amount)
    }

    #[test]
    fn item_derives_net_and_final_weight() {
        let it = item(10.0, 2.0, 91.6, 0.0);
        assert_eq!(it.net_weight, 8.0);
        assert_eq!(it.final_weight, 7.328);
    }

    #[test]
    fn recompute_discards_stale_derived_values() {
        let mut it = item(5.0, 1.0, 75.0, 0.0);
        it.net_weight = 999.0;
        it.final_weight = -1.0;
        let it = it.recomputed();
        assert_eq!(it.net_weight, 4.0);
        assert_eq!(it.final_weight, 3.0);
    }

    #[test]
    fn totals_sum_every_column() {
        let items = vec![item(10.0, 2.0, 91.6, 150.255), item(4.1234, 0.1, 75.0, 10.0)];
        let totals = ReceiptTotals::of(&items);
        assert_eq!(totals.gross_weight, 14.123);
        assert_eq!(totals.stone_weight, 2.1);
        assert_eq!(totals.net_weight, 12.023);
        assert_eq!(totals.final_weight, 10.345);
        assert_eq!(totals.stone_amount, 160.26);
        assert_eq!(ReceiptTotals::of(&[]), ReceiptTotals::default());
    }

    #[test]
    fn draft_totals_are_idempotent() {
        let draft = ReceiptDraft {
            client_id: None,
            client_name: "Walk-in".into(),
            shop_name: String::new(),
            phone_number: String::new(),
            metal_type: "gold".into(),
            issue_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            items: vec![item(10.0, 2.0, 91.6, 0.0)],
        };
        let once = ReceiptTotals::of(&draft.computed_items());
        let again = ReceiptDraft {
            items: draft.computed_items(),
            ..draft.clone()
        };
        assert_eq!(once, ReceiptTotals::of(&again.computed_items()));
    }
}
