mod approver;
mod error;
mod keystore;
mod keystore_wallet;
mod session;
mod trusted;

pub use {approver::*, error::*, keystore::*, keystore_wallet::*, session::*, trusted::*};
