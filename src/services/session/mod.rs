use std::sync::Arc;

use futures::{FutureExt, future::BoxFuture};

use crate::{
    error::{AppError, Result, ServiceResult},
    infrastructure::{
        identity::UserDirectory,
        storage::{KeyValueStore, StorageKey},
    },
    services::{
        session::types::{AuthGrant, AuthSession, UserRecord, WalletSession},
        wallet::{ProviderKind, WalletConnection},
    },
    utils::format::mask_secret,
};

pub mod types;

/// A stored token on its way to the identity service.
pub struct TokenCheck {
    token: String,
    future: BoxFuture<'static, ServiceResult<Arc<UserRecord>>>,
}

impl TokenCheck {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub async fn wait(self) -> CheckedToken {
        CheckedToken {
            token: self.token,
            outcome: self.future.await,
        }
    }
}

#[derive(Debug)]
pub struct CheckedToken {
    pub token: String,
    pub outcome: ServiceResult<Arc<UserRecord>>,
}

/// Single owner of the auth and wallet sessions and the only writer of durable storage.
///
/// Every mutation writes storage first and touches memory only once storage agreed, so the
/// two never disagree from the outside. Derived flags are computed from the session
/// objects on each call.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    directory: UserDirectory,
    auth: Option<AuthSession>,
    wallet: Option<WalletSession>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, directory: UserDirectory) -> Self {
        Self {
            storage,
            directory,
            auth: None,
            wallet: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.as_ref().is_some_and(|auth| auth.user.is_some())
    }

    pub fn is_wallet_connected(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn auth(&self) -> Option<&AuthSession> {
        self.auth.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|auth| auth.token.as_str())
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.auth.as_ref().and_then(|auth| auth.user.as_deref())
    }

    pub fn wallet(&self) -> Option<&WalletSession> {
        self.wallet.as_ref()
    }

    pub fn wallet_address(&self) -> Option<&str> {
        self.wallet.as_ref().map(|wallet| wallet.address.as_str())
    }

    /// The wallet is trusted as stored, without asking the provider again. The returned
    /// token still has to be validated.
    pub fn restore(&mut self) -> Result<Option<String>> {
        self.wallet = self.read_wallet()?;

        let token = self
            .storage
            .get(StorageKey::TOKEN)?
            .filter(|token| !token.is_empty());

        self.auth = token.clone().map(|token| AuthSession { token, user: None });

        tracing::info!(
            has_token = token.is_some(),
            wallet_connected = self.wallet.is_some(),
            "Session restored"
        );

        Ok(token)
    }

    fn read_wallet(&self) -> Result<Option<WalletSession>> {
        let Some(address) = self
            .storage
            .get(StorageKey::WALLET_ADDRESS)?
            .filter(|address| !address.is_empty())
        else {
            return Ok(None);
        };

        let kind = self
            .storage
            .get(StorageKey::WALLET_TYPE)?
            .and_then(|tag| tag.parse::<ProviderKind>().ok());

        match kind {
            Some(kind) => Ok(Some(WalletSession { address, kind })),
            None => {
                tracing::warn!("Stored wallet has no usable type, dropping it");
                self.write_keys(&[
                    (StorageKey::WALLET_ADDRESS, None),
                    (StorageKey::WALLET_TYPE, None),
                ])?;
                Ok(None)
            }
        }
    }

    /// Token validation against the identity service, detached from `self` so the host can
    /// await it while other events are processed.
    pub fn validate_token(&self, token: String) -> TokenCheck {
        let directory = self.directory.clone();
        let lookup = token.clone();
        TokenCheck {
            token,
            future: async move { directory.validate(&lookup).await }.boxed(),
        }
    }

    /// A rejected token downgrades to unauthenticated and keeps the wallet.
    pub fn apply_validation(&mut self, checked: CheckedToken) -> Result<()> {
        let CheckedToken { token, outcome } = checked;

        if self.token() != Some(token.as_str()) {
            tracing::debug!(
                token = %mask_secret(&token),
                "Ignoring validation for a replaced token"
            );
            return Ok(());
        }

        match outcome {
            Ok(user) => {
                if let Some(auth) = self.auth.as_mut() {
                    auth.user = Some(user);
                }
                Ok(())
            }
            Err(error) => {
                tracing::info!(reason = %error, "Stored session expired");
                self.write_keys(&[(StorageKey::TOKEN, None)])?;
                self.auth = None;
                Err(AppError::SessionExpired)
            }
        }
    }

    pub async fn rehydrate(&mut self) -> Result<()> {
        let Some(token) = self.restore()? else {
            return Ok(());
        };
        let checked = self.validate_token(token).wait().await;
        self.apply_validation(checked)
    }

    pub async fn refresh_user(&mut self) -> Result<Option<Arc<UserRecord>>> {
        let Some(token) = self.token().map(str::to_string) else {
            return Ok(None);
        };
        let outcome = self.directory.who_am_i(&token).await;
        self.apply_validation(CheckedToken { token, outcome })?;
        Ok(self.auth.as_ref().and_then(|auth| auth.user.clone()))
    }

    pub fn login(&self, email: &str, password: &str) -> BoxFuture<'static, Result<AuthGrant>> {
        let directory = self.directory.clone();
        let email = email.trim().to_string();
        let password = password.to_string();

        async move { login_with(&directory, &email, &password).await }.boxed()
    }

    pub fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<BoxFuture<'static, Result<AuthGrant>>> {
        if password != confirm_password {
            return Err(AppError::PasswordMismatch);
        }

        let email = email.trim().to_string();
        if email.is_empty() {
            return Err(AppError::InvalidParams("Email is required".into()));
        }

        let directory = self.directory.clone();
        let password = password.to_string();

        Ok(async move {
            directory
                .service()
                .register(&email, &password)
                .await
                .map_err(|error| AppError::RegistrationRejected(error.reason))?;

            tracing::info!("Account registered");

            login_with(&directory, &email, &password).await
        }
        .boxed())
    }

    pub fn set_auth(&mut self, grant: AuthGrant) -> Result<()> {
        self.write_keys(&[(StorageKey::TOKEN, Some(grant.token.as_str()))])?;

        tracing::info!(user_id = %grant.user.id, "Authenticated");

        self.auth = Some(AuthSession {
            token: grant.token,
            user: Some(Arc::new(grant.user)),
        });
        Ok(())
    }

    pub fn clear_auth(&mut self) -> Result<()> {
        self.write_keys(&[
            (StorageKey::TOKEN, None),
            (StorageKey::WALLET_ADDRESS, None),
            (StorageKey::WALLET_TYPE, None),
        ])?;

        self.auth = None;
        self.wallet = None;
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.clear_auth()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Replaces whatever wallet was active before.
    pub fn set_wallet(&mut self, connection: WalletConnection) -> Result<()> {
        if connection.address.trim().is_empty() {
            return Err(AppError::ConnectionRejected {
                kind: connection.kind,
                reason: "Empty wallet address".into(),
            });
        }

        self.write_keys(&[
            (StorageKey::WALLET_ADDRESS, Some(connection.address.as_str())),
            (StorageKey::WALLET_TYPE, Some(connection.kind.as_str())),
        ])?;

        tracing::info!(provider = %connection.kind, "Wallet connected");

        self.wallet = Some(WalletSession::from(connection));
        Ok(())
    }

    pub fn clear_wallet(&mut self) -> Result<()> {
        self.write_keys(&[
            (StorageKey::WALLET_ADDRESS, None),
            (StorageKey::WALLET_TYPE, None),
        ])?;

        if self.wallet.take().is_some() {
            tracing::info!("Wallet disconnected");
        }
        Ok(())
    }

    /// Writes (`Some`) or removes (`None`) each key. If any write fails, keys already
    /// written are put back to their previous values before the error is returned.
    fn write_keys(&self, changes: &[(&str, Option<&str>)]) -> Result<()> {
        let mut previous = Vec::with_capacity(changes.len());

        for (key, value) in changes {
            let before = match self.storage.get(key) {
                Ok(before) => before,
                Err(error) => {
                    self.restore_keys(&previous);
                    return Err(error);
                }
            };

            let written = match value {
                Some(value) => self.storage.set(key, value),
                None => self.storage.remove(key),
            };

            if let Err(error) = written {
                self.restore_keys(&previous);
                return Err(error);
            }

            previous.push((*key, before));
        }

        Ok(())
    }

    fn restore_keys(&self, previous: &[(&str, Option<String>)]) {
        for (key, before) in previous.iter().rev() {
            let restored = match before {
                Some(value) => self.storage.set(key, value),
                None => self.storage.remove(key),
            };
            if let Err(error) = restored {
                tracing::error!(key = %key, error = %error, "Failed to roll back storage key");
            }
        }
    }
}

async fn login_with(directory: &UserDirectory, email: &str, password: &str) -> Result<AuthGrant> {
    let grant = directory
        .service()
        .login(email, password)
        .await
        .map_err(|error| AppError::LoginRejected(error.reason))?;

    directory.remember(&grant.token, grant.user.clone()).await;
    Ok(grant)
}
