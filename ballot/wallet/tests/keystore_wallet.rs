use {
    assertor::*,
    async_trait::async_trait,
    ballot_types::{
        Hash, Pubkey, SignedTransaction, VoteOption, VoteTransactionRequest, WalletError,
        WalletProvider,
    },
    ballot_wallet::{
        Approver, AutoApprove, KeystoreWallet, SignatureRequest, TrustedOrigins, UNAUTHORIZED_CODE,
        generate_seed,
    },
    chrono::Utc,
    std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    tempfile::TempDir,
};

const ORIGIN: &str = "ballot-cli";

/// Answers every prompt the same way and counts how often it was asked.
#[derive(Default)]
struct Scripted {
    approve: bool,
    asked: Arc<AtomicUsize>,
}

#[async_trait]
impl Approver for Scripted {
    async fn approve_connection(&self, _origin: &str, _pubkey: &Pubkey) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.approve
    }

    async fn approve_transaction(&self, _request: &SignatureRequest) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.approve
    }
}

fn trusted_origins(dir: &TempDir) -> TrustedOrigins {
    TrustedOrigins::load(dir.path().join("trusted.json")).unwrap()
}

fn vote_for(fee_payer: Pubkey) -> VoteTransactionRequest {
    VoteTransactionRequest::new(VoteOption::B, fee_payer, Hash::new_unique(), 50, Utc::now())
}

#[tokio::test]
async fn approved_connection_is_remembered() {
    let dir = tempfile::tempdir().unwrap();
    let seed = generate_seed();
    let asked = Arc::new(AtomicUsize::new(0));

    let wallet = KeystoreWallet::new(&seed, ORIGIN, trusted_origins(&dir), Scripted {
        approve: true,
        asked: asked.clone(),
    })
    .unwrap();

    // Silent connect fails until the user approves once.
    assert_that!(wallet.connect(true).await).is_equal_to(Err(WalletError::UserRejected));
    assert_that!(wallet.connect(false).await).is_equal_to(Ok(wallet.pubkey()));
    assert_that!(wallet.connect(true).await).is_equal_to(Ok(wallet.pubkey()));
    assert_that!(asked.load(Ordering::SeqCst)).is_equal_to(1);

    // A fresh wallet over the same file trusts the origin too.
    let reopened = KeystoreWallet::new(&seed, ORIGIN, trusted_origins(&dir), AutoApprove).unwrap();
    assert_that!(reopened.connect(true).await).is_equal_to(Ok(wallet.pubkey()));

    assert!(reopened.revoke().unwrap());
    assert!(!reopened.is_trusted());
}

#[tokio::test]
async fn declined_connection_is_a_rejection() {
    let dir = tempfile::tempdir().unwrap();
    let wallet =
        KeystoreWallet::new(&generate_seed(), ORIGIN, trusted_origins(&dir), Scripted::default())
            .unwrap();

    assert_that!(wallet.connect(false).await).is_equal_to(Err(WalletError::UserRejected));
    assert!(!wallet.is_trusted());
}

#[tokio::test]
async fn signs_an_approved_vote() {
    let dir = tempfile::tempdir().unwrap();
    let wallet =
        KeystoreWallet::new(&generate_seed(), ORIGIN, trusted_origins(&dir), AutoApprove).unwrap();
    wallet.connect(false).await.unwrap();

    let tx = vote_for(wallet.pubkey()).unsigned_transaction();
    let signed = wallet.sign_transaction(tx).await.unwrap();

    assert!(signed.verify().is_ok());
    assert!(SignedTransaction::new(signed).unwrap().is_fully_signed());
}

#[tokio::test]
async fn refuses_to_sign_before_connecting() {
    let dir = tempfile::tempdir().unwrap();
    let wallet =
        KeystoreWallet::new(&generate_seed(), ORIGIN, trusted_origins(&dir), AutoApprove).unwrap();

    let tx = vote_for(wallet.pubkey()).unsigned_transaction();

    assert!(matches!(
        wallet.sign_transaction(tx).await,
        Err(WalletError::Provider {
            code: Some(UNAUTHORIZED_CODE),
            ..
        })
    ));
}

#[tokio::test]
async fn refuses_foreign_fee_payer() {
    let dir = tempfile::tempdir().unwrap();
    let wallet =
        KeystoreWallet::new(&generate_seed(), ORIGIN, trusted_origins(&dir), AutoApprove).unwrap();
    wallet.connect(false).await.unwrap();

    let tx = vote_for(Pubkey::new_unique()).unsigned_transaction();

    assert!(matches!(
        wallet.sign_transaction(tx).await,
        Err(WalletError::Provider { code: None, .. })
    ));
}

#[tokio::test]
async fn declined_signature_is_a_rejection() {
    let dir = tempfile::tempdir().unwrap();
    let mut trusted = trusted_origins(&dir);
    trusted.trust(ORIGIN).unwrap();

    let wallet =
        KeystoreWallet::new(&generate_seed(), ORIGIN, trusted, Scripted::default()).unwrap();
    let tx = vote_for(wallet.pubkey()).unsigned_transaction();

    assert_that!(wallet.sign_transaction(tx).await.map(|_| ()))
        .is_equal_to(Err(WalletError::UserRejected));
}
