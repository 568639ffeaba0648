use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::Entity;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub shop_name: String,
    pub client_name: String,
    pub phone_number: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client content without identity or timestamps.
#[derive(Debug, Clone)]
pub struct ClientDraft {
    pub shop_name: String,
    pub client_name: String,
    pub phone_number: String,
    pub address: String,
}

/// Case-insensitive substring filters; `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub shop_name: Option<String>,
    pub client_name: Option<String>,
    pub phone_number: Option<String>,
}

impl Client {
    pub fn into_draft(self) -> ClientDraft {
        ClientDraft {
            shop_name: self.shop_name,
            client_name: self.client_name,
            phone_number: self.phone_number,
            address: self.address,
        }
    }
}

impl Entity for Client {
    type Draft = ClientDraft;
    type Filter = ClientFilter;
    const LABEL: &'static str = "Client";
}
