pub struct StorageKey;

impl StorageKey {
    pub const TOKEN: &'static str = "token";
    pub const WALLET_ADDRESS: &'static str = "walletAddress";
    pub const WALLET_TYPE: &'static str = "walletType";
}
