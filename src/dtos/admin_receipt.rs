use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::lenient_number;
use crate::dtos::common::{date_range, non_blank, parse_id, parse_optional_date};
use crate::error::AppError;
use crate::models::admin_receipt::{GivenItem, GivenLedger, ReceivedItem, ReceivedLedger};
use crate::models::{AdminReceipt, AdminReceiptFilter, AdminReceiptStatus, DateRange};

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GivenItemRequest {
    pub product_name: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub pure_weight: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub pure_percent: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub melting: f64,
}

impl From<GivenItemRequest> for GivenItem {
    fn from(req: GivenItemRequest) -> Self {
        GivenItem::new(
            req.product_name.unwrap_or_default().trim().to_string(),
            req.pure_weight,
            req.pure_percent,
            req.melting,
        )
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceivedItemRequest {
    pub product_name: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub final_ornaments_wt: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub stone_weight: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub making_charge_percent: f64,
}

impl From<ReceivedItemRequest> for ReceivedItem {
    fn from(req: ReceivedItemRequest) -> Self {
        ReceivedItem::new(
            req.product_name.unwrap_or_default().trim().to_string(),
            req.final_ornaments_wt,
            req.stone_weight,
            req.making_charge_percent,
        )
    }
}

/// One tab of the admin receipt form. Absent fields keep what is stored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRequest<T> {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<T>>,
}

fn merge_ledger<R, I>(
    req: LedgerRequest<R>,
    existing_date: Option<NaiveDate>,
    existing_items: Vec<I>,
    field: &str,
) -> Result<(Option<NaiveDate>, Vec<I>), AppError>
where
    R: Into<I>,
{
    let date = parse_optional_date(req.date.as_deref(), field)?.or(existing_date);
    let items = match req.items {
        Some(items) => items.into_iter().map(Into::into).collect(),
        None => existing_items,
    };
    Ok((date, items))
}

impl LedgerRequest<GivenItemRequest> {
    pub fn merge_into(self, existing: GivenLedger) -> Result<GivenLedger, AppError> {
        let (date, items) = merge_ledger(self, existing.date, existing.items, "given.date")?;
        Ok(GivenLedger::new(date, items))
    }
}

impl LedgerRequest<ReceivedItemRequest> {
    pub fn merge_into(self, existing: ReceivedLedger) -> Result<ReceivedLedger, AppError> {
        let (date, items) = merge_ledger(self, existing.date, existing.items, "received.date")?;
        Ok(ReceivedLedger::new(date, items))
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAdminReceiptRequest {
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub given: Option<LedgerRequest<GivenItemRequest>>,
    pub received: Option<LedgerRequest<ReceivedItemRequest>>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAdminReceiptRequest {
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub given: Option<LedgerRequest<GivenItemRequest>>,
    pub received: Option<LedgerRequest<ReceivedItemRequest>>,
}

fn parse_status(raw: Option<String>) -> Result<Option<AdminReceiptStatus>, AppError> {
    non_blank(raw)
        .map(|s| s.parse::<AdminReceiptStatus>().map_err(AppError::validation))
        .transpose()
}

fn parse_client_id(raw: Option<String>) -> Result<Option<Uuid>, AppError> {
    non_blank(raw).map(|s| parse_id(&s, "client")).transpose()
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminReceiptQuery {
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<AdminReceiptQuery> for AdminReceiptFilter {
    type Error = AppError;

    fn try_from(q: AdminReceiptQuery) -> Result<Self, Self::Error> {
        Ok(AdminReceiptFilter {
            client_id: parse_client_id(q.client_id)?,
            client_name: non_blank(q.client_name),
            status: parse_status(q.status)?,
            activity: DateRange::default(),
        })
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminBillQuery {
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub status: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl TryFrom<AdminBillQuery> for AdminReceiptFilter {
    type Error = AppError;

    fn try_from(q: AdminBillQuery) -> Result<Self, Self::Error> {
        Ok(AdminReceiptFilter {
            client_id: parse_client_id(q.client_id)?,
            client_name: non_blank(q.client_name),
            status: parse_status(q.status)?,
            activity: date_range(q.from_date.as_deref(), q.to_date.as_deref())?,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBillSummary {
    pub id: Uuid,
    pub client_id: Option<Uuid>,
    pub client_name: String,
    pub status: AdminReceiptStatus,
    pub given_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,
    pub given_item_count: usize,
    pub received_item_count: usize,
    pub given_total: f64,
    pub received_total: f64,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AdminReceipt> for AdminBillSummary {
    fn from(r: AdminReceipt) -> Self {
        AdminBillSummary {
            id: r.id,
            client_id: r.client_id,
            client_name: r.client_name,
            status: r.status,
            given_date: r.given.date,
            received_date: r.received.date,
            given_item_count: r.given.items.len(),
            received_item_count: r.received.items.len(),
            given_total: r.given.totals.total,
            received_total: r.received.totals.total,
            balance: r.balance,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_ledger_fields_keep_stored_values() {
        let stored = GivenLedger::new(
            NaiveDate::from_ymd_opt(2024, 4, 2),
            vec![GivenItem::new("Bar".into(), 10.0, 92.0, 100.0)],
        );

        let req: LedgerRequest<GivenItemRequest> = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(req.merge_into(stored.clone()).unwrap(), stored);

        let req: LedgerRequest<GivenItemRequest> =
            serde_json::from_str(r#"{"date": "2024-04-09"}"#).unwrap();
        let merged = req.merge_into(stored.clone()).unwrap();
        assert_eq!(merged.date, NaiveDate::from_ymd_opt(2024, 4, 9));
        assert_eq!(merged.items, stored.items);
    }

    #[test]
    fn provided_items_replace_and_recompute() {
        let req: LedgerRequest<ReceivedItemRequest> = serde_json::from_str(
            r#"{"items": [{"productName": "Chain", "finalOrnamentsWt": "12.5", "stoneWeight": "2.5", "makingChargePercent": "5"}]}"#,
        )
        .unwrap();
        let merged = req.merge_into(ReceivedLedger::default()).unwrap();
        assert_eq!(merged.items.len(), 1);
        assert_eq!(merged.totals.sub_total, 10.0);
        assert_eq!(merged.totals.total, 10.5);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let q = AdminReceiptQuery {
            status: Some("finished".into()),
            ..Default::default()
        };
        assert!(AdminReceiptFilter::try_from(q).is_err());
    }
}
