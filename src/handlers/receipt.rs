use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;
use crate::state::AppState;
use crate::error::AppError;
use crate::database::Repository;
use crate::dtos::common::{parse_id, parse_optional_date, required, DeletedResponse};
use crate::dtos::receipt::{CreateReceiptRequest, ReceiptQuery, UpdateReceiptRequest};
use crate::handlers::{check_linked_name, link_client, missing};
use crate::models::receipt::ReceiptItem;
use crate::models::{Receipt, ReceiptDraft, ReceiptFilter};

/// Reads show the linked client's current details; the copy on the bill is
/// used once that client is gone.
pub(crate) async fn load_receipt(
    receipts: &dyn Repository<Receipt>,
    id: Uuid,
) -> Result<Receipt, AppError> {
    receipts.find(id).await?.ok_or_else(missing::<Receipt>)
}

pub async fn create_receipt(
    State(AppState { clients, receipts, .. }): State<AppState>,
    Json(req): Json<CreateReceiptRequest>,
) -> Result<(StatusCode, Json<Receipt>), AppError> {
    let link = link_client(clients.as_ref(), req.client_id, req.client_name).await?;
    let metal_type = required(req.metal_type, "metalType")?;
    let issue_date = parse_optional_date(req.issue_date.as_deref(), "issueDate")?
        .unwrap_or_else(|| Utc::now().date_naive());

    let draft = ReceiptDraft {
        client_id: link.id,
        client_name: link.client_name,
        shop_name: link.shop_name,
        phone_number: link.phone_number,
        metal_type,
        issue_date,
        items: req.items.into_iter().map(ReceiptItem::from).collect(),
    };

    let receipt = receipts.create(draft).await?;
    tracing::info!(
        receipt_id = %receipt.id,
        items = receipt.items.len(),
        final_weight = receipt.totals.final_weight,
        "Receipt created"
    );

    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn get_receipt(
    State(AppState { receipts, .. }): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Receipt>, AppError> {
    let id = parse_id(&id, "receipt")?;
    load_receipt(receipts.as_ref(), id).await.map(Json)
}

pub async fn list_receipts(
    State(AppState { receipts, .. }): State<AppState>,
    Query(query): Query<ReceiptQuery>,
) -> Result<Json<Vec<Receipt>>, AppError> {
    let filter = ReceiptFilter::try_from(query)?;
    let found = receipts.search(&filter).await?;
    Ok(Json(found))
}

/// Merges the supplied fields into the stored receipt; totals are always
/// recomputed from the resulting item list.
pub async fn update_receipt(
    State(AppState { clients, receipts, .. }): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateReceiptRequest>,
) -> Result<Json<Receipt>, AppError> {
    let id = parse_id(&id, "receipt")?;

    let mut draft = load_receipt(receipts.as_ref(), id).await?.into_draft();

    if req.client_id.is_some() {
        let link = link_client(clients.as_ref(), req.client_id, req.client_name).await?;
        draft.client_id = link.id;
        draft.client_name = link.client_name;
        draft.shop_name = link.shop_name;
        draft.phone_number = link.phone_number;
    } else if let Some(name) = check_linked_name(draft.client_id, &draft.client_name, req.client_name)? {
        draft.client_name = name;
    }
    if req.metal_type.is_some() {
        draft.metal_type = required(req.metal_type, "metalType")?;
    }
    if let Some(date) = parse_optional_date(req.issue_date.as_deref(), "issueDate")? {
        draft.issue_date = date;
    }
    if let Some(items) = req.items {
        draft.items = items.into_iter().map(ReceiptItem::from).collect();
    }

    let receipt = receipts
        .update(id, draft)
        .await?
        .ok_or_else(missing::<Receipt>)?;
    tracing::info!(receipt_id = %receipt.id, "Receipt updated");

    Ok(Json(receipt))
}

pub async fn delete_receipt(
    State(AppState { receipts, .. }): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let id = parse_id(&id, "receipt")?;

    if !receipts.delete(id).await? {
        return Err(missing::<Receipt>());
    }
    tracing::info!(receipt_id = %id, "Receipt deleted");

    Ok(Json(DeletedResponse {
        message: "Receipt deleted".to_string(),
        id,
    }))
}
