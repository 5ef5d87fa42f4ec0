mod client;
mod commitment;
mod constants;
mod error;
mod event;
mod identity;
mod option;
mod tally;
mod tx;

pub use {
    client::*, commitment::*, constants::*, error::*, event::*, identity::*, option::*, tally::*,
    tx::*,
};

// -------------------------------- re-exports ---------------------------------

pub use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction,
};
