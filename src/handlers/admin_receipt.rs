use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::admin_receipt::{
    AdminReceiptQuery, CreateAdminReceiptRequest, UpdateAdminReceiptRequest,
};
use crate::dtos::common::{parse_id, DeletedResponse};
use crate::handlers::{check_linked_name, link_client, missing};
use crate::models::admin_receipt::{GivenLedger, ReceivedLedger};
use crate::models::{AdminReceipt, AdminReceiptDraft, AdminReceiptFilter};

/// Either ledger may be left out; the status follows whichever ones carry items.
pub async fn create_admin_receipt(
    State(AppState { clients, admin_receipts, .. }): State<AppState>,
    Json(req): Json<CreateAdminReceiptRequest>,
) -> Result<(StatusCode, Json<AdminReceipt>), AppError> {
    let link = link_client(clients.as_ref(), req.client_id, req.client_name).await?;

    let given = match req.given {
        Some(ledger) => ledger.merge_into(GivenLedger::default())?,
        None => GivenLedger::default(),
    };
    let received = match req.received {
        Some(ledger) => ledger.merge_into(ReceivedLedger::default())?,
        None => ReceivedLedger::default(),
    };

    let draft = AdminReceiptDraft {
        client_id: link.id,
        client_name: link.client_name,
        given,
        received,
    };

    let receipt = admin_receipts.create(draft).await?;
    tracing::info!(
        admin_receipt_id = %receipt.id,
        status = %receipt.status,
        balance = receipt.balance,
        "Admin receipt created"
    );

    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn get_admin_receipt(
    State(AppState { admin_receipts, .. }): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdminReceipt>, AppError> {
    let id = parse_id(&id, "admin receipt")?;

    let receipt = admin_receipts
        .find(id)
        .await?
        .ok_or_else(missing::<AdminReceipt>)?;

    Ok(Json(receipt))
}

pub async fn list_admin_receipts(
    State(AppState { admin_receipts, .. }): State<AppState>,
    Query(query): Query<AdminReceiptQuery>,
) -> Result<Json<Vec<AdminReceipt>>, AppError> {
    let filter = AdminReceiptFilter::try_from(query)?;
    let found = admin_receipts.search(&filter).await?;
    Ok(Json(found))
}

/// Only the ledgers present in the request are touched; an omitted ledger is
/// kept exactly as stored.
pub async fn update_admin_receipt(
    State(AppState { clients, admin_receipts, .. }): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAdminReceiptRequest>,
) -> Result<Json<AdminReceipt>, AppError> {
    let id = parse_id(&id, "admin receipt")?;

    let mut draft = admin_receipts
        .find(id)
        .await?
        .ok_or_else(missing::<AdminReceipt>)?
        .into_draft();

    if req.client_id.is_some() {
        let link = link_client(clients.as_ref(), req.client_id, req.client_name).await?;
        draft.client_id = link.id;
        draft.client_name = link.client_name;
    } else if let Some(name) = check_linked_name(draft.client_id, &draft.client_name, req.client_name)? {
        draft.client_name = name;
    }
    if let Some(given) = req.given {
        draft.given = given.merge_into(draft.given)?;
    }
    if let Some(received) = req.received {
        draft.received = received.merge_into(draft.received)?;
    }

    let receipt = admin_receipts
        .update(id, draft)
        .await?
        .ok_or_else(missing::<AdminReceipt>)?;
    tracing::info!(admin_receipt_id = %receipt.id, status = %receipt.status, "Admin receipt updated");

    Ok(Json(receipt))
}

pub async fn delete_admin_receipt(
    State(AppState { admin_receipts, .. }): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let id = parse_id(&id, "admin receipt")?;

    if !admin_receipts.delete(id).await? {
        return Err(missing::<AdminReceipt>());
    }
    tracing::info!(admin_receipt_id = %id, "Admin receipt deleted");

    Ok(Json(DeletedResponse {
        message: "Admin receipt deleted".to_string(),
        id,
    }))
}
