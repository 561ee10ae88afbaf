pub mod providers;
pub mod registry;
pub mod types;

pub use providers::{BackpackProvider, MetaMaskProvider, PhantomProvider, WalletProvider};
pub use registry::WalletRegistry;
pub use types::{ProviderFamily, ProviderKind, WalletConnection};
