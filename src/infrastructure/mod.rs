pub mod host;
pub mod identity;
pub mod pixels;
pub mod storage;

pub use host::{EmptyHost, InjectedEthereum, InjectedSolana, WalletHost};
pub use identity::{IdentityService, UserDirectory};
pub use pixels::PixelService;
pub use storage::{KeyValueStore, StorageKey};
