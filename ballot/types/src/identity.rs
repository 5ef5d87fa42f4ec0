use {
    crate::LAMPORTS_PER_SOL,
    serde::{Deserialize, Serialize},
    solana_sdk::pubkey::Pubkey,
};

/// The connected wallet: its public address and the last balance we saw.
///
/// `balance` is `None` until the first successful balance query, and is only
/// refreshed when explicitly re-queried.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WalletIdentity {
    #[serde(with = "pubkey_string")]
    pub address: Pubkey,
    pub balance: Option<f64>,
}

impl WalletIdentity {
    pub fn new(address: Pubkey) -> Self {
        Self {
            address,
            balance: None,
        }
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = Some(balance);
        self
    }

    /// The first and last eight characters of the address.
    pub fn short_address(&self) -> String {
        let address = self.address.to_string();

        if address.len() <= 16 {
            return address;
        }

        format!("{}...{}", &address[..8], &address[address.len() - 8..])
    }
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

pub mod pubkey_string {
    use {
        serde::{Deserialize, Deserializer, Serializer, de::Error},
        solana_sdk::pubkey::Pubkey,
        std::str::FromStr,
    };

    pub fn serialize<S>(pubkey: &Pubkey, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(pubkey)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Pubkey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_lamports() {
        assert_eq!(lamports_to_sol(1_500_000_000), 1.5);
        assert_eq!(lamports_to_sol(0), 0.0);
    }

    #[test]
    fn shortens_address() {
        let identity = WalletIdentity::new(crate::MEMO_PROGRAM_ID);

        assert_eq!(identity.short_address(), "MemoSq4g...DLGmfcHr");
    }
}
