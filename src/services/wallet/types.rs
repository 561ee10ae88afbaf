use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    Solana,
    Evm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "solana-phantom")]
    SolanaPhantom,
    #[serde(rename = "solana-backpack")]
    SolanaBackpack,
    #[serde(rename = "evm-metamask")]
    EvmMetamask,
}

impl ProviderKind {
    /// Fixed priority used for default selection and auto-connect.
    pub const PRIORITY: [ProviderKind; 3] = [
        ProviderKind::SolanaPhantom,
        ProviderKind::SolanaBackpack,
        ProviderKind::EvmMetamask,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::SolanaPhantom => "solana-phantom",
            ProviderKind::SolanaBackpack => "solana-backpack",
            ProviderKind::EvmMetamask => "evm-metamask",
        }
    }

    pub fn family(&self) -> ProviderFamily {
        match self {
            ProviderKind::SolanaPhantom | ProviderKind::SolanaBackpack => ProviderFamily::Solana,
            ProviderKind::EvmMetamask => ProviderFamily::Evm,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::SolanaPhantom => "Phantom",
            ProviderKind::SolanaBackpack => "Backpack",
            ProviderKind::EvmMetamask => "MetaMask",
        }
    }

    pub fn network_name(&self) -> &'static str {
        match self.family() {
            ProviderFamily::Solana => "Solana",
            ProviderFamily::Evm => "Ethereum",
        }
    }

    pub fn install_url(&self) -> Option<&'static str> {
        match self {
            ProviderKind::SolanaPhantom => Some("https://phantom.app/download"),
            ProviderKind::SolanaBackpack => Some("https://backpack.app/downloads"),
            ProviderKind::EvmMetamask => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ProviderKind::PRIORITY
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| AppError::InvalidParams(format!("Unknown wallet type '{value}'")))
    }
}

/// Result of a successful provider authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConnection {
    pub address: String,
    pub kind: ProviderKind,
}
