use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use crate::state::AppState;
use crate::error::AppError;
use crate::dtos::client::{ClientQuery, CreateClientRequest, UpdateClientRequest};
use crate::dtos::common::{non_blank, parse_id, required, DeletedResponse};
use crate::handlers::missing;
use crate::models::{Client, ClientDraft, ClientFilter};

pub async fn create_client(
    State(AppState { clients, .. }): State<AppState>,
    Json(req): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    let draft = ClientDraft {
        shop_name: required(req.shop_name, "shopName")?,
        client_name: required(req.client_name, "clientName")?,
        phone_number: required(req.phone_number, "phoneNumber")?,
        address: non_blank(req.address).unwrap_or_default(),
    };

    let client = clients.create(draft).await?;
    tracing::info!(client_id = %client.id, "Client created");

    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn get_client(
    State(AppState { clients, .. }): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Client>, AppError> {
    let id = parse_id(&id, "client")?;

    let client = clients
        .find(id)
        .await?
        .ok_or_else(missing::<Client>)?;

    Ok(Json(client))
}

pub async fn list_clients(
    State(AppState { clients, .. }): State<AppState>,
    Query(query): Query<ClientQuery>,
) -> Result<Json<Vec<Client>>, AppError> {
    let filter: ClientFilter = query.into();
    let found = clients.search(&filter).await?;
    Ok(Json(found))
}

/// Absent fields keep their stored value; required fields cannot be blanked.
pub async fn update_client(
    State(AppState { clients, .. }): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateClientRequest>,
) -> Result<Json<Client>, AppError> {
    let id = parse_id(&id, "client")?;

    let mut draft = clients
        .find(id)
        .await?
        .ok_or_else(missing::<Client>)?
        .into_draft();

    if req.shop_name.is_some() {
        draft.shop_name = required(req.shop_name, "shopName")?;
    }
    if req.client_name.is_some() {
        draft.client_name = required(req.client_name, "clientName")?;
    }
    if req.phone_number.is_some() {
        draft.phone_number = required(req.phone_number, "phoneNumber")?;
    }
    if let Some(address) = req.address {
        draft.address = address.trim().to_string();
    }

    let client = clients
        .update(id, draft)
        .await?
        .ok_or_else(missing::<Client>)?;
    tracing::info!(client_id = %client.id, "Client updated");

    Ok(Json(client))
}

/// Receipts and admin receipts of the client are left in place.
pub async fn delete_client(
    State(AppState { clients, .. }): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let id = parse_id(&id, "client")?;

    if !clients.delete(id).await? {
        return Err(missing::<Client>());
    }
    tracing::info!(client_id = %id, "Client deleted");

    Ok(Json(DeletedResponse {
        message: "Client deleted".to_string(),
        id,
    }))
}
