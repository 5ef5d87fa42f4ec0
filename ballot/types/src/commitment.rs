use {
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumString},
};

/// Durability level requested when querying or confirming ledger state.
///
/// Ordered from weakest to strongest, so a status at `Finalized` also
/// satisfies a request for `Confirmed`.
#[derive(
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CommitmentLevel {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl CommitmentLevel {
    pub fn is_satisfied_by(self, reached: CommitmentLevel) -> bool {
        reached >= self
    }
}
