use serde::Deserialize;

use crate::dtos::common::non_blank;
use crate::models::ClientFilter;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateClientRequest {
    pub shop_name: Option<String>,
    pub client_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateClientRequest {
    pub shop_name: Option<String>,
    pub client_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientQuery {
    pub shop_name: Option<String>,
    pub client_name: Option<String>,
    pub phone_number: Option<String>,
}

impl From<ClientQuery> for ClientFilter {
    fn from(q: ClientQuery) -> Self {
        ClientFilter {
            shop_name: non_blank(q.shop_name),
            client_name: non_blank(q.client_name),
            phone_number: non_blank(q.phone_number),
        }
    }
}
