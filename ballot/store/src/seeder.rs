use {
    ballot_types::VoteTally,
    rand::{Rng, SeedableRng, rngs::StdRng},
    std::{ops::Range, sync::Mutex},
};

/// Baseline counts used when there is no usable persisted tally.
pub const SEED_RANGE: Range<u64> = 10..60;

/// Produces the baseline tally for a fresh (or corrupted) store.
pub trait Seeder {
    fn seed(&self) -> VoteTally;
}

/// Draws every count uniformly from [`SEED_RANGE`].
#[derive(Debug, Default)]
pub struct RandomSeeder {
    // `None` uses the thread-local generator.
    rng: Option<Mutex<StdRng>>,
}

impl RandomSeeder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reproducible seeder, for tests.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    fn draw<R>(rng: &mut R) -> VoteTally
    where
        R: Rng,
    {
        VoteTally::new(
            rng.gen_range(SEED_RANGE),
            rng.gen_range(SEED_RANGE),
            rng.gen_range(SEED_RANGE),
            rng.gen_range(SEED_RANGE),
        )
    }
}

impl Seeder for RandomSeeder {
    fn seed(&self) -> VoteTally {
        match &self.rng {
            Some(rng) => {
                let mut rng = rng
                    .lock()
                    .unwrap_or_else(|err| panic!("RandomSeeder is poisoned: {err:?}"));
                Self::draw(&mut *rng)
            },
            None => Self::draw(&mut rand::thread_rng()),
        }
    }
}

/// Always seeds the same tally.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSeeder(pub VoteTally);

impl Seeder for FixedSeeder {
    fn seed(&self) -> VoteTally {
        self.0
    }
}
