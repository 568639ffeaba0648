use axum::{
    routing::get,
    Router,
};
use crate::handlers::client::{
    list_clients, get_client, create_client, update_client, delete_client
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route("/clients/{id}", get(get_client).put(update_client).delete(delete_client))
}
