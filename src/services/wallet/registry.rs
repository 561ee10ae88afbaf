use std::sync::Arc;

use futures::{FutureExt, future::BoxFuture};

use crate::{
    error::{AppError, Result},
    infrastructure::host::WalletHost,
    services::wallet::{
        providers::{BackpackProvider, MetaMaskProvider, PhantomProvider, WalletProvider},
        types::{ProviderKind, WalletConnection},
    },
};

/// Known providers in [`ProviderKind::PRIORITY`] order.
#[derive(Clone)]
pub struct WalletRegistry {
    providers: Vec<Arc<dyn WalletProvider>>,
}

impl WalletRegistry {
    pub fn new(host: Arc<dyn WalletHost>) -> Self {
        Self::with_providers(vec![
            Arc::new(PhantomProvider::new(host.clone())),
            Arc::new(BackpackProvider::new(host.clone())),
            Arc::new(MetaMaskProvider::new(host)),
        ])
    }

    /// Registers custom providers; they are ordered by kind priority regardless of the
    /// order given.
    pub fn with_providers(mut providers: Vec<Arc<dyn WalletProvider>>) -> Self {
        providers.sort_by_key(|provider| priority_of(provider.kind()));
        Self { providers }
    }

    pub fn provider(&self, kind: ProviderKind) -> Option<Arc<dyn WalletProvider>> {
        self.providers
            .iter()
            .find(|provider| provider.kind() == kind)
            .cloned()
    }

    pub fn is_available(&self, kind: ProviderKind) -> bool {
        self.provider(kind)
            .is_some_and(|provider| provider.is_available())
    }

    pub fn list_available(&self) -> Vec<ProviderKind> {
        self.providers
            .iter()
            .filter(|provider| provider.is_available())
            .map(|provider| provider.kind())
            .collect()
    }

    pub fn connect(&self, kind: ProviderKind) -> BoxFuture<'static, Result<WalletConnection>> {
        match self.provider(kind) {
            Some(provider) if provider.is_available() => provider.connect(),
            _ => futures::future::ready(Err(AppError::ProviderUnavailable(kind))).boxed(),
        }
    }

    /// Tries every available provider in priority order and stops at the first success.
    /// A rejected attempt falls through to the next provider; when all of them reject,
    /// the last rejection is returned.
    pub fn auto_connect(&self) -> BoxFuture<'static, Result<WalletConnection>> {
        let candidates: Vec<_> = self
            .providers
            .iter()
            .filter(|provider| provider.is_available())
            .cloned()
            .collect();

        async move {
            let mut last_error = AppError::NoProviderAvailable;

            for provider in candidates {
                let kind = provider.kind();
                match provider.connect().await {
                    Ok(connection) => return Ok(connection),
                    Err(error) => {
                        tracing::debug!(
                            provider = %kind,
                            error = %error,
                            "Auto-connect attempt failed"
                        );
                        last_error = error;
                    }
                }
            }

            Err(last_error)
        }
        .boxed()
    }
}

fn priority_of(kind: ProviderKind) -> usize {
    ProviderKind::PRIORITY
        .iter()
        .position(|candidate| *candidate == kind)
        .unwrap_or(usize::MAX)
}
