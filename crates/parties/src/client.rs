use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopledger_core::{ClientId, LedgerError, LedgerResult};

/// Contact information for a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Client identity, as printed on a statement header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    /// National id / tax number, when the shop records one.
    pub tax_id: Option<String>,
    pub contact: ContactInfo,
    pub registered_at: DateTime<Utc>,
}

/// Command: RegisterClient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterClient {
    pub client_id: ClientId,
    pub name: String,
    pub tax_id: Option<String>,
    pub contact: Option<ContactInfo>,
    pub occurred_at: DateTime<Utc>,
}

impl Client {
    /// Validate a registration and build the client identity.
    pub fn register(cmd: RegisterClient) -> LedgerResult<Self> {
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(LedgerError::validation("client name cannot be empty"));
        }

        let tax_id = cmd
            .tax_id
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Self {
            id: cmd.client_id,
            name: name.to_string(),
            tax_id,
            contact: cmd.contact.unwrap_or_default(),
            registered_at: cmd.occurred_at,
        })
    }
}

/// Resolves client references.
///
/// The statement builder goes through this seam so that an unknown client is
/// reported as `NotFound` instead of producing an empty statement.
pub trait ClientDirectory {
    fn find_client(&self, id: &ClientId) -> Option<Client>;

    fn resolve(&self, id: &ClientId) -> LedgerResult<Client> {
        self.find_client(id)
            .ok_or_else(|| LedgerError::not_found(format!("client {id}")))
    }
}

impl ClientDirectory for HashMap<ClientId, Client> {
    fn find_client(&self, id: &ClientId) -> Option<Client> {
        self.get(id).cloned()
    }
}

impl<D> ClientDirectory for Arc<D>
where
    D: ClientDirectory + ?Sized,
{
    fn find_client(&self, id: &ClientId) -> Option<Client> {
        (**self).find_client(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str) -> RegisterClient {
        RegisterClient {
            client_id: ClientId::new(),
            name: name.to_string(),
            tax_id: Some("  ".to_string()),
            contact: None,
            occurred_at: Utc::now(),
        }
    }

    #[test]
    fn register_trims_name_and_drops_blank_tax_id() {
        let client = Client::register(register("  Taller Norte ")).unwrap();
        assert_eq!(client.name, "Taller Norte");
        assert_eq!(client.tax_id, None);
        assert_eq!(client.contact, ContactInfo::default());
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Client::register(register("   ")).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn directory_reports_unknown_client_as_not_found() {
        let client = Client::register(register("Ana")).unwrap();
        let mut directory = HashMap::new();
        directory.insert(client.id, client.clone());

        assert_eq!(directory.resolve(&client.id).unwrap(), client);
        let err = directory.resolve(&ClientId::new()).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[test]
    fn client_serializes_with_contact_block() {
        let client = Client::register(register("Ana")).unwrap();
        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(json["name"], "Ana");
        assert!(json["contact"].is_object());
    }
}
