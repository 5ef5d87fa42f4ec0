use {
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
};

/// One of the four fixed choices a user can vote for.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VoteOption {
    A,
    B,
    C,
    D,
}

impl VoteOption {
    pub const ALL: [VoteOption; 4] = [VoteOption::A, VoteOption::B, VoteOption::C, VoteOption::D];

    /// The 0-based index of the option, as embedded in the vote memo.
    pub const fn index(self) -> usize {
        match self {
            VoteOption::A => 0,
            VoteOption::B => 1,
            VoteOption::C => 2,
            VoteOption::D => 3,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(VoteOption::A),
            1 => Some(VoteOption::B),
            2 => Some(VoteOption::C),
            3 => Some(VoteOption::D),
            _ => None,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            VoteOption::A => 'A',
            VoteOption::B => 'B',
            VoteOption::C => 'C',
            VoteOption::D => 'D',
        }
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid vote option `{0}`: expecting one of A, B, C, D or an index 0-3")]
pub struct ParseVoteOptionError(String);

impl FromStr for VoteOption {
    type Err = ParseVoteOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Ok(index) = trimmed.parse::<usize>() {
            return VoteOption::from_index(index).ok_or_else(|| ParseVoteOptionError(s.into()));
        }

        match trimmed.to_ascii_uppercase().as_str() {
            "A" => Ok(VoteOption::A),
            "B" => Ok(VoteOption::B),
            "C" => Ok(VoteOption::C),
            "D" => Ok(VoteOption::D),
            _ => Err(ParseVoteOptionError(s.into())),
        }
    }
}

// ----------------------------------- tests -----------------------------------
