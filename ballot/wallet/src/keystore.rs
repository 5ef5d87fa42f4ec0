use {
    crate::{KeystoreError, KeystoreResult},
    aes_gcm::{AeadCore, Aes256Gcm, Key, KeyInit, Nonce, aead::Aead},
    ballot_types::{Pubkey, pubkey_string},
    pbkdf2::pbkdf2_hmac,
    rand::{Rng, rngs::OsRng},
    serde::{Deserialize, Serialize},
    sha2::Sha256,
    solana_sdk::signer::{Signer, keypair::keypair_from_seed},
    std::{fs, path::Path},
};

pub const ED25519_SEED_LEN: usize = 32;
pub const PBKDF2_ITERATIONS: u32 = 600_000;
const PBKDF2_SALT_LEN: usize = 16;
const PBKDF2_KEY_LEN: usize = 32;
const AES256GCM_NONCE_LEN: usize = 12;

fn default_iterations() -> u32 {
    PBKDF2_ITERATIONS
}

/// Data structure for encrypting a 32-byte ed25519 seed before saving on disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Keystore {
    #[serde(with = "pubkey_string")]
    pub pubkey: Pubkey,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(with = "hex::serde")]
    pub salt: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub nonce: Vec<u8>,
    #[serde(with = "hex::serde")]
    pub ciphertext: Vec<u8>,
}

/// The public key of the keypair derived from `seed`.
pub fn pubkey_from_seed(seed: &[u8; ED25519_SEED_LEN]) -> KeystoreResult<Pubkey> {
    keypair_from_seed(seed)
        .map(|keypair| keypair.pubkey())
        .map_err(|err| KeystoreError::InvalidSeed(err.to_string()))
}

/// Generate a new random seed.
pub fn generate_seed() -> [u8; ED25519_SEED_LEN] {
    let mut seed = [0u8; ED25519_SEED_LEN];
    OsRng.fill(&mut seed);
    seed
}

fn derive_key<P>(password: P, salt: &[u8], iterations: u32) -> [u8; PBKDF2_KEY_LEN]
where
    P: AsRef<[u8]>,
{
    let mut password_hash = [0u8; PBKDF2_KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_ref(), salt, iterations, &mut password_hash);
    password_hash
}

impl Keystore {
    pub fn encrypt<P>(seed: &[u8; ED25519_SEED_LEN], password: P) -> KeystoreResult<Self>
    where
        P: AsRef<[u8]>,
    {
        Self::encrypt_with_iterations(seed, password, PBKDF2_ITERATIONS)
    }

    pub fn encrypt_with_iterations<P>(
        seed: &[u8; ED25519_SEED_LEN],
        password: P,
        iterations: u32,
    ) -> KeystoreResult<Self>
    where
        P: AsRef<[u8]>,
    {
        let pubkey = pubkey_from_seed(seed)?;

        // generate encryption key
        let mut salt = [0u8; PBKDF2_SALT_LEN];
        OsRng.fill(&mut salt);
        let password_hash = derive_key(password, &salt, iterations);

        // encrypt the seed
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&password_hash));
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher.encrypt(&nonce, seed.as_ref())?;

        Ok(Self {
            pubkey,
            iterations,
            salt: salt.to_vec(),
            nonce: nonce.to_vec(),
            ciphertext,
        })
    }

    /// Recover the seed, checking that it still derives the stored public key.
    pub fn decrypt<P>(&self, password: P) -> KeystoreResult<[u8; ED25519_SEED_LEN]>
    where
        P: AsRef<[u8]>,
    {
        if self.nonce.len() != AES256GCM_NONCE_LEN {
            return Err(KeystoreError::Length {
                what: "nonce",
                expect: AES256GCM_NONCE_LEN,
                actual: self.nonce.len(),
            });
        }

        let password_hash = derive_key(password, &self.salt, self.iterations);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&password_hash));

        let seed: [u8; ED25519_SEED_LEN] = cipher
            .decrypt(Nonce::from_slice(&self.nonce), self.ciphertext.as_ref())?
            .try_into()
            .map_err(|bytes: Vec<u8>| KeystoreError::Length {
                what: "seed",
                expect: ED25519_SEED_LEN,
                actual: bytes.len(),
            })?;

        let derived = pubkey_from_seed(&seed)?;
        if derived != self.pubkey {
            return Err(KeystoreError::PubkeyMismatch {
                stored: self.pubkey.to_string(),
                derived: derived.to_string(),
            });
        }

        Ok(seed)
    }

    /// Read a keystore file without decrypting it.
    pub fn read<F>(filename: F) -> KeystoreResult<Self>
    where
        F: AsRef<Path>,
    {
        let keystore_str = fs::read_to_string(filename)?;
        Ok(serde_json::from_str(&keystore_str)?)
    }

    /// Read and decrypt a keystore file.
    pub fn from_file<F, P>(filename: F, password: P) -> KeystoreResult<[u8; ED25519_SEED_LEN]>
    where
        F: AsRef<Path>,
        P: AsRef<[u8]>,
    {
        Self::read(filename)?.decrypt(password)
    }

    /// Encrypt a seed and save it to a file.
    pub fn write_to_file<F, P>(
        seed: &[u8; ED25519_SEED_LEN],
        filename: F,
        password: P,
    ) -> KeystoreResult<Self>
    where
        F: AsRef<Path>,
        P: AsRef<[u8]>,
    {
        let keystore = Self::encrypt(seed, password)?;
        keystore.save(filename)?;
        Ok(keystore)
    }

    pub fn save<F>(&self, filename: F) -> KeystoreResult<()>
    where
        F: AsRef<Path>,
    {
        if let Some(parent) = filename.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let keystore_str = serde_json::to_string_pretty(self)?;
        fs::write(filename, keystore_str.as_bytes())?;

        Ok(())
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, assertor::*};

    // Full-strength key derivation is too slow for unit tests.
    const TEST_ITERATIONS: u32 = 1_000;

    #[test]
    fn encrypt_then_decrypt() {
        let seed = generate_seed();
        let keystore =
            Keystore::encrypt_with_iterations(&seed, "hunter2", TEST_ITERATIONS).unwrap();

        assert_that!(keystore.pubkey).is_equal_to(pubkey_from_seed(&seed).unwrap());
        assert_that!(keystore.ciphertext.len()).is_equal_to(ED25519_SEED_LEN + 16);
        assert_that!(keystore.decrypt("hunter2").unwrap()).is_equal_to(seed);
    }

    #[test]
    fn wrong_password_fails() {
        let keystore =
            Keystore::encrypt_with_iterations(&generate_seed(), "hunter2", TEST_ITERATIONS)
                .unwrap();

        assert!(matches!(
            keystore.decrypt("hunter3"),
            Err(KeystoreError::Cipher(_))
        ));
    }

    #[test]
    fn tampered_pubkey_is_detected() {
        let mut keystore =
            Keystore::encrypt_with_iterations(&generate_seed(), "pw", TEST_ITERATIONS).unwrap();
        keystore.pubkey = Pubkey::new_unique();

        assert!(matches!(
            keystore.decrypt("pw"),
            Err(KeystoreError::PubkeyMismatch { .. })
        ));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keys/voter.json");
        let seed = generate_seed();

        let keystore = Keystore::encrypt_with_iterations(&seed, "pw", TEST_ITERATIONS).unwrap();
        keystore.save(&path).unwrap();

        assert_that!(Keystore::read(&path).unwrap()).is_equal_to(keystore);
        assert_that!(Keystore::from_file(&path, "pw").unwrap()).is_equal_to(seed);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_that!(raw["iterations"].as_u64()).is_equal_to(Some(u64::from(TEST_ITERATIONS)));
        assert!(raw["nonce"].as_str().unwrap().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
