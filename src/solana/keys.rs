use std::fmt;

use ed25519_dalek::{Signer, SigningKey};

use crate::error::WalletError;

/// A 32-byte Solana account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pubkey(pub [u8; 32]);

impl Pubkey {
    /// Parse a Base58-encoded address. Rejects anything that does not
    /// decode to exactly 32 bytes.
    pub fn parse(s: &str) -> Result<Self, WalletError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| WalletError::InvalidRecipient(format!("{}: {}", s, e)))?;
        let arr: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            WalletError::InvalidRecipient(format!(
                "{}: expected 32 bytes, got {}",
                s,
                bytes.len()
            ))
        })?;
        Ok(Pubkey(arr))
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self.to_base58())
    }
}

/// Signing keypair rebuilt from a wallet's stored 64-byte secret
/// (seed followed by the public key, the standard Solana export format).
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Rebuild the keypair from stored secret bytes.
    ///
    /// Fails when the material is empty, not 64 bytes, or the embedded
    /// public half does not match the one derived from the seed.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        if bytes.is_empty() {
            return Err(WalletError::NoSigningKey);
        }
        let arr: [u8; 64] = bytes.try_into().map_err(|_| WalletError::NoSigningKey)?;
        let signing_key =
            SigningKey::from_keypair_bytes(&arr).map_err(|_| WalletError::NoSigningKey)?;
        Ok(Self { signing_key })
    }

    /// Deterministic keypair from a 32-byte seed. Used by tooling and tests.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// The 64-byte export form (seed || public key).
    pub fn to_secret_bytes(&self) -> [u8; 64] {
        self.signing_key.to_keypair_bytes()
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}
