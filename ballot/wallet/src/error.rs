use std::io;

#[derive(Debug, thiserror::Error)]
pub enum KeystoreError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("failed to encrypt or decrypt key; wrong password?")]
    Cipher(#[from] aes_gcm::Error),

    #[error("incorrect {what} length! expecting: {expect}, got: {actual}")]
    Length {
        what: &'static str,
        expect: usize,
        actual: usize,
    },

    #[error("invalid ed25519 seed: {0}")]
    InvalidSeed(String),

    #[error("keystore is for {stored}, but the decrypted key belongs to {derived}")]
    PubkeyMismatch { stored: String, derived: String },
}

pub type KeystoreResult<T> = core::result::Result<T, KeystoreError>;
