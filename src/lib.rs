pub mod board;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::{
    config::Config,
    error::Result,
    infrastructure::{
        host::WalletHost, identity::IdentityService, pixels::PixelService, storage,
        storage::KeyValueStore,
    },
};

pub use board::WishBoard;

/// External collaborators the board is wired to.
#[derive(Clone)]
pub struct Collaborators {
    pub identity: Arc<dyn IdentityService>,
    pub pixels: Arc<dyn PixelService>,
    pub storage: Arc<dyn KeyValueStore>,
    pub host: Arc<dyn WalletHost>,
}

impl Collaborators {
    /// Uses the storage selected by `config` (file-backed or in-memory).
    pub fn with_configured_storage(
        config: &Config,
        identity: Arc<dyn IdentityService>,
        pixels: Arc<dyn PixelService>,
        host: Arc<dyn WalletHost>,
    ) -> Result<Self> {
        Ok(Self {
            identity,
            pixels,
            storage: storage::open(&config.storage)?,
            host,
        })
    }
}
