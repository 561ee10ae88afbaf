//! Wallet objects injected into the host environment by browser extensions.
//!
//! Each getter reflects the environment at the moment it is called; an extension installed
//! mid-session shows up on the next probe.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::ServiceResult;

/// A Solana-style injected provider (`window.solana`, `window.backpack.solana`).
pub trait InjectedSolana: Send + Sync {
    fn is_phantom(&self) -> bool;

    /// Opens the extension's authorization dialog.
    fn connect(&self) -> BoxFuture<'_, ServiceResult<()>>;

    /// Public key of the authorized account, once `connect` has resolved.
    fn public_key(&self) -> Option<[u8; 32]>;
}

/// An Ethereum-style injected provider (`window.ethereum`).
pub trait InjectedEthereum: Send + Sync {
    /// `eth_requestAccounts`.
    fn request_accounts(&self) -> BoxFuture<'_, ServiceResult<Vec<String>>>;
}

pub trait WalletHost: Send + Sync {
    fn solana(&self) -> Option<Arc<dyn InjectedSolana>>;

    fn backpack_solana(&self) -> Option<Arc<dyn InjectedSolana>>;

    fn ethereum(&self) -> Option<Arc<dyn InjectedEthereum>>;
}

/// Host with no wallet extensions at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyHost;

impl WalletHost for EmptyHost {
    fn solana(&self) -> Option<Arc<dyn InjectedSolana>> {
        None
    }

    fn backpack_solana(&self) -> Option<Arc<dyn InjectedSolana>> {
        None
    }

    fn ethereum(&self) -> Option<Arc<dyn InjectedEthereum>> {
        None
    }
}
