pub mod admin_bill;
pub mod admin_receipt;
pub mod auth;
pub mod bill;
pub mod client;
pub mod receipt;

use uuid::Uuid;

use crate::database::{Entity, Repository};
use crate::dtos::common::{non_blank, parse_id, required};
use crate::error::AppError;
use crate::models::Client;

/// Client reference resolved at write time, plus the details copied onto the bill.
pub(crate) struct ClientLink {
    pub id: Option<Uuid>,
    pub client_name: String,
    pub shop_name: String,
    pub phone_number: String,
}

/// A supplied `clientId` must name an existing client. Without one the bill is
/// for a walk-in customer and `clientName` is required.
pub(crate) async fn link_client(
    clients: &dyn Repository<Client>,
    client_id: Option<String>,
    client_name: Option<String>,
) -> Result<ClientLink, AppError> {
    match non_blank(client_id) {
        Some(raw) => {
            let id = parse_id(&raw, "client")?;
            let client = clients
                .find(id)
                .await?
                .ok_or_else(|| AppError::validation(format!("Client {id} does not exist")))?;
            Ok(ClientLink {
                id: Some(id),
                client_name: client.client_name,
                shop_name: client.shop_name,
                phone_number: client.phone_number,
            })
        }
        None => Ok(ClientLink {
            id: None,
            client_name: required(client_name, "clientName")?,
            shop_name: String::new(),
            phone_number: String::new(),
        }),
    }
}

/// 404 for a record family, worded from its label.
pub(crate) fn missing<E: Entity>() -> AppError {
    AppError::not_found(format!("{} not found", E::LABEL))
}

/// A linked bill shows its client's name, so renaming happens on the client.
/// Repeating the current name is accepted.
pub(crate) fn check_linked_name(
    linked_to: Option<Uuid>,
    current_name: &str,
    requested: Option<String>,
) -> Result<Option<String>, AppError> {
    match (linked_to, requested) {
        (Some(client_id), Some(name)) if name.trim() != current_name => {
            Err(AppError::validation(format!(
                "clientName follows client {client_id}; rename the client or pass a clientId"
            )))
        }
        (Some(_), _) => Ok(None),
        (None, requested) => requested.map(|n| required(Some(n), "clientName")).transpose(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Receipt;

    #[test]
    fn not_found_messages_use_the_entity_label() {
        assert!(matches!(missing::<Receipt>(), AppError::NotFound(m) if m == "Receipt not found"));
    }

    #[test]
    fn linked_bills_keep_their_client_name() {
        let client = Some(Uuid::new_v4());
        assert!(check_linked_name(client, "John", Some("Ravi".into())).is_err());
        assert_eq!(check_linked_name(client, "John", Some(" John ".into())).unwrap(), None);
        assert_eq!(check_linked_name(None, "John", Some(" Ravi ".into())).unwrap(), Some("Ravi".into()));
        assert!(check_linked_name(None, "John", Some("  ".into())).is_err());
        assert_eq!(check_linked_name(None, "John", None).unwrap(), None);
    }
}
