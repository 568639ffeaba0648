use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::lenient_number;
use crate::dtos::common::{date_range, non_blank, parse_id};
use crate::error::AppError;
use crate::models::receipt::{ReceiptItem, ReceiptTotals};
use crate::models::{Receipt, ReceiptFilter};

/// One row of the receipt form. Numeric columns arrive as typed text.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptItemRequest {
    pub item_name: Option<String>,
    pub tag: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub gross_weight: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub stone_weight: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub melting_touch: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub stone_amount: f64,
}

impl From<ReceiptItemRequest> for ReceiptItem {
    fn from(req: ReceiptItemRequest) -> Self {
        ReceiptItem::new(
            req.item_name.unwrap_or_default().trim().to_string(),
            req.tag.unwrap_or_default().trim().to_string(),
            req.gross_weight,
            req.stone_weight,
            req.melting_touch,
            req.stone_amount,
        )
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateReceiptRequest {
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub metal_type: Option<String>,
    pub issue_date: Option<String>,
    pub items: Vec<ReceiptItemRequest>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateReceiptRequest {
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub metal_type: Option<String>,
    pub issue_date: Option<String>,
    pub items: Option<Vec<ReceiptItemRequest>>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptQuery {
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub metal_type: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl TryFrom<ReceiptQuery> for ReceiptFilter {
    type Error = AppError;

    fn try_from(q: ReceiptQuery) -> Result<Self, Self::Error> {
        let client_id = match non_blank(q.client_id) {
            Some(raw) => Some(parse_id(&raw, "client")?),
            None => None,
        };
        Ok(ReceiptFilter {
            client_id,
            client_name: non_blank(q.client_name),
            metal_type: non_blank(q.metal_type),
            issue_dates: date_range(q.from_date.as_deref(), q.to_date.as_deref())?,
        })
    }
}

/// Row of the bills list: the receipt header and totals without the items.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub client_name: String,
    pub shop_name: String,
    pub phone_number: String,
    pub metal_type: String,
    pub issue_date: NaiveDate,
    pub item_count: usize,
    pub totals: ReceiptTotals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Receipt> for BillSummary {
    fn from(r: Receipt) -> Self {
        BillSummary {
            id: r.id,
            client_id: r.client_id,
            client_name: r.client_name,
            shop_name: r.shop_name,
            phone_number: r.phone_number,
            metal_type: r.metal_type,
            issue_date: r.issue_date,
            item_count: r.items.len(),
            totals: r.totals,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_rows_tolerate_text_and_blanks() {
        let req: ReceiptItemRequest = serde_json::from_str(
            r#"{"itemName": " Ring ", "grossWeight": "10", "stoneWeight": "", "meltingTouch": 91.6}"#,
        )
        .unwrap();
        let item = ReceiptItem::from(req);
        assert_eq!(item.item_name, "Ring");
        assert_eq!(item.tag, "");
        assert_eq!(item.net_weight, 10.0);
        assert_eq!(item.final_weight, 9.16);
        assert_eq!(item.stone_amount, 0.0);
    }

    #[test]
    fn query_rejects_malformed_client_id() {
        let q = ReceiptQuery {
            client_id: Some("abc".into()),
            ..Default::default()
        };
        assert!(ReceiptFilter::try_from(q).is_err());
    }
}
