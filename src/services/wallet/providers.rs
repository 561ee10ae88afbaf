use std::sync::Arc;

use futures::{FutureExt, future::BoxFuture};

use crate::{
    error::{AppError, Result},
    infrastructure::host::{InjectedSolana, WalletHost},
    services::wallet::types::{ProviderKind, WalletConnection},
};

/// One implementation per provider kind. `is_available` is a pure probe of the host;
/// `connect` suspends until the extension's authorization dialog resolves.
pub trait WalletProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn is_available(&self) -> bool;

    fn connect(&self) -> BoxFuture<'static, Result<WalletConnection>>;
}

pub struct PhantomProvider {
    host: Arc<dyn WalletHost>,
}

impl PhantomProvider {
    pub fn new(host: Arc<dyn WalletHost>) -> Self {
        Self { host }
    }

    fn injected(host: &dyn WalletHost) -> Option<Arc<dyn InjectedSolana>> {
        host.solana().filter(|provider| provider.is_phantom())
    }
}

impl WalletProvider for PhantomProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::SolanaPhantom
    }

    fn is_available(&self) -> bool {
        Self::injected(self.host.as_ref()).is_some()
    }

    fn connect(&self) -> BoxFuture<'static, Result<WalletConnection>> {
        let injected = Self::injected(self.host.as_ref());
        connect_solana(ProviderKind::SolanaPhantom, injected).boxed()
    }
}

pub struct BackpackProvider {
    host: Arc<dyn WalletHost>,
}

impl BackpackProvider {
    pub fn new(host: Arc<dyn WalletHost>) -> Self {
        Self { host }
    }
}

impl WalletProvider for BackpackProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::SolanaBackpack
    }

    fn is_available(&self) -> bool {
        self.host.backpack_solana().is_some()
    }

    fn connect(&self) -> BoxFuture<'static, Result<WalletConnection>> {
        let injected = self.host.backpack_solana();
        connect_solana(ProviderKind::SolanaBackpack, injected).boxed()
    }
}

pub struct MetaMaskProvider {
    host: Arc<dyn WalletHost>,
}

impl MetaMaskProvider {
    pub fn new(host: Arc<dyn WalletHost>) -> Self {
        Self { host }
    }
}

impl WalletProvider for MetaMaskProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::EvmMetamask
    }

    fn is_available(&self) -> bool {
        self.host.ethereum().is_some()
    }

    fn connect(&self) -> BoxFuture<'static, Result<WalletConnection>> {
        let injected = self.host.ethereum();

        async move {
            let kind = ProviderKind::EvmMetamask;
            let ethereum = injected.ok_or(AppError::ProviderUnavailable(kind))?;

            let accounts = ethereum
                .request_accounts()
                .await
                .map_err(|error| rejected(kind, error.reason))?;

            let address = accounts
                .into_iter()
                .map(|account| account.trim().to_string())
                .find(|account| !account.is_empty())
                .ok_or_else(|| rejected(kind, "No accounts found"))?;

            Ok(WalletConnection { address, kind })
        }
        .boxed()
    }
}

async fn connect_solana(
    kind: ProviderKind,
    injected: Option<Arc<dyn InjectedSolana>>,
) -> Result<WalletConnection> {
    let solana = injected.ok_or(AppError::ProviderUnavailable(kind))?;

    solana
        .connect()
        .await
        .map_err(|error| rejected(kind, error.reason))?;

    let public_key = solana
        .public_key()
        .ok_or_else(|| rejected(kind, "No publicKey"))?;

    Ok(WalletConnection {
        address: bs58::encode(public_key).into_string(),
        kind,
    })
}

fn rejected(kind: ProviderKind, reason: impl Into<String>) -> AppError {
    AppError::ConnectionRejected {
        kind,
        reason: reason.into(),
    }
}
