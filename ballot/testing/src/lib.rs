mod ledger;
mod tracing;
mod wallet;

pub use {ledger::*, tracing::*, wallet::*};
