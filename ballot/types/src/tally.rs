use {
    crate::VoteOption,
    serde::{Deserialize, Serialize},
};

/// Vote counters for the four options.
///
/// The field names match the persisted layout, a JSON object with four integer
/// fields. Unknown or missing fields make the value malformed; there is no
/// schema version.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct VoteTally {
    #[serde(rename = "optionA")]
    pub option_a: u64,
    #[serde(rename = "optionB")]
    pub option_b: u64,
    #[serde(rename = "optionC")]
    pub option_c: u64,
    #[serde(rename = "optionD")]
    pub option_d: u64,
}

impl VoteTally {
    pub const fn new(option_a: u64, option_b: u64, option_c: u64, option_d: u64) -> Self {
        Self {
            option_a,
            option_b,
            option_c,
            option_d,
        }
    }

    pub const fn get(&self, option: VoteOption) -> u64 {
        match option {
            VoteOption::A => self.option_a,
            VoteOption::B => self.option_b,
            VoteOption::C => self.option_c,
            VoteOption::D => self.option_d,
        }
    }

    fn get_mut(&mut self, option: VoteOption) -> &mut u64 {
        match option {
            VoteOption::A => &mut self.option_a,
            VoteOption::B => &mut self.option_b,
            VoteOption::C => &mut self.option_c,
            VoteOption::D => &mut self.option_d,
        }
    }

    /// Return a copy of the tally with one more vote for `option`.
    #[must_use]
    pub fn incremented(mut self, option: VoteOption) -> Self {
        let count = self.get_mut(option);
        *count = count.saturating_add(1);
        self
    }

    pub fn total(&self) -> u64 {
        VoteOption::ALL
            .iter()
            .map(|option| self.get(*option))
            .fold(0, u64::saturating_add)
    }

    /// Share of the total for `option`, in percent. Zero when nobody voted.
    pub fn percentage(&self, option: VoteOption) -> f64 {
        // Widened so a stored tally near `u64::MAX` still splits correctly.
        let total: u128 = VoteOption::ALL
            .iter()
            .map(|option| self.get(*option) as u128)
            .sum();

        if total == 0 {
            return 0.0;
        }

        self.get(option) as f64 / total as f64 * 100.0
    }

    /// Per-option count and percentage, in option order.
    pub fn views(&self) -> Vec<TallyView> {
        VoteOption::ALL
            .into_iter()
            .map(|option| TallyView {
                option,
                count: self.get(option),
                percentage: self.percentage(option),
            })
            .collect()
    }
}

/// What a presenter needs to render one option's result row.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TallyView {
    pub option: VoteOption,
    pub count: u64,
    pub percentage: f64,
}

impl TallyView {
    pub fn count_label(&self) -> String {
        format!("{} votes", self.count)
    }

    pub fn percentage_label(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

// ----------------------------------- tests -----------------------------------
