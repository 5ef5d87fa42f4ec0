mod client;
mod connect;
mod types;

pub use {client::*, connect::*, types::*};
