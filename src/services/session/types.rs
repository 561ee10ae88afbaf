use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    services::wallet::{ProviderKind, WalletConnection},
    utils::format::short_address,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthGrant {
    pub token: String,
    pub user: UserRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    /// `None` until the token has been confirmed by the identity service.
    pub user: Option<Arc<UserRecord>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSession {
    pub address: String,
    pub kind: ProviderKind,
}

impl WalletSession {
    pub fn short_address(&self) -> String {
        short_address(&self.address)
    }

    pub fn network_name(&self) -> &'static str {
        self.kind.network_name()
    }
}

impl From<WalletConnection> for WalletSession {
    fn from(connection: WalletConnection) -> Self {
        Self {
            address: connection.address,
            kind: connection.kind,
        }
    }
}
