#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};
use {
    crate::{RandomSeeder, Seeder, Storage, StoreResult},
    ballot_types::{TALLY_STORAGE_KEY, VoteOption, VoteTally},
    std::sync::{Arc, Mutex, MutexGuard},
};

struct Inner<S> {
    storage: S,
    seeder: Box<dyn Seeder + Send + Sync>,
    /// The last tally read from or written to storage. `None` until the first
    /// `load`.
    current: Mutex<Option<VoteTally>>,
}

/// The four vote counters, persisted under a single storage key.
///
/// Clones are handles to the same store. Every mutation is written to storage
/// before the call returns, and the cached value only changes once the write
/// has succeeded.
pub struct LocalTallyStore<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for LocalTallyStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> LocalTallyStore<S>
where
    S: Storage,
{
    pub fn new(storage: S) -> Self {
        Self::with_seeder(storage, RandomSeeder::new())
    }

    pub fn with_seeder<D>(storage: S, seeder: D) -> Self
    where
        D: Seeder + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                storage,
                seeder: Box::new(seeder),
                current: Mutex::new(None),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<VoteTally>> {
        self.inner
            .current
            .lock()
            .unwrap_or_else(|err| panic!("LocalTallyStore is poisoned: {err:?}"))
    }

    /// Read the persisted tally, seeding and persisting a fresh one if there is
    /// none or the stored value is malformed.
    pub fn load(&self) -> StoreResult<VoteTally> {
        let mut current = self.lock();
        let tally = self.read_or_seed()?;
        *current = Some(tally);

        Ok(tally)
    }

    /// The current tally without touching storage, unless nothing was loaded
    /// yet.
    pub fn snapshot(&self) -> StoreResult<VoteTally> {
        let mut current = self.lock();

        match *current {
            Some(tally) => Ok(tally),
            None => {
                let tally = self.read_or_seed()?;
                *current = Some(tally);
                Ok(tally)
            },
        }
    }

    /// Add one vote for `option` and persist the result.
    pub fn increment(&self, option: VoteOption) -> StoreResult<VoteTally> {
        let mut current = self.lock();

        let base = match *current {
            Some(tally) => tally,
            None => self.read_or_seed()?,
        };
        let next = base.incremented(option);

        self.persist(&next)?;
        *current = Some(next);

        #[cfg(feature = "tracing")]
        debug!(%option, count = next.get(option), "Vote counted");

        Ok(next)
    }

    /// Throw away the current counts and reseed. The only way a count can go
    /// down.
    pub fn reset(&self) -> StoreResult<VoteTally> {
        let mut current = self.lock();

        let tally = self.inner.seeder.seed();
        self.persist(&tally)?;
        *current = Some(tally);

        #[cfg(feature = "tracing")]
        info!(?tally, "Tally reset");

        Ok(tally)
    }

    fn read_or_seed(&self) -> StoreResult<VoteTally> {
        if let Some(raw) = self.inner.storage.read(TALLY_STORAGE_KEY)? {
            match serde_json::from_str::<VoteTally>(&raw) {
                Ok(tally) => return Ok(tally),
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    warn!(err = %_err, "Discarding malformed stored tally");
                },
            }
        }

        let tally = self.inner.seeder.seed();
        self.persist(&tally)?;

        #[cfg(feature = "tracing")]
        info!(?tally, "Initialized tally");

        Ok(tally)
    }

    fn persist(&self, tally: &VoteTally) -> StoreResult<()> {
        let raw = serde_json::to_string(tally)?;
        self.inner.storage.write(TALLY_STORAGE_KEY, &raw)
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{FileStorage, FixedSeeder, MemStorage, SEED_RANGE, StoreError},
        assertor::*,
    };

    const BASELINE: VoteTally = VoteTally::new(10, 10, 10, 10);

    /// Storage whose writes always fail.
    struct ReadOnly(MemStorage);

    impl Storage for ReadOnly {
        fn read(&self, key: &str) -> StoreResult<Option<String>> {
            self.0.read(key)
        }

        fn write(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
    }

    #[test]
    fn load_is_idempotent() {
        let store = LocalTallyStore::new(MemStorage::new());

        let first = store.load().unwrap();
        let second = store.load().unwrap();

        assert_that!(second).is_equal_to(first);
    }

    #[test]
    fn fresh_store_is_seeded_and_persisted() {
        let storage = MemStorage::new();
        let store = LocalTallyStore::with_seeder(storage.clone(), FixedSeeder(BASELINE));

        assert_that!(store.load().unwrap()).is_equal_to(BASELINE);
        assert_that!(storage.read(TALLY_STORAGE_KEY).unwrap()).is_equal_to(Some(
            r#"{"optionA":10,"optionB":10,"optionC":10,"optionD":10}"#.to_string(),
        ));
    }

    #[test]
    fn increment_changes_exactly_one_counter() {
        for option in VoteOption::ALL {
            let store = LocalTallyStore::with_seeder(MemStorage::new(), FixedSeeder(BASELINE));
            let before = store.load().unwrap();
            let after = store.increment(option).unwrap();

            for other in VoteOption::ALL {
                let expected = before.get(other) + u64::from(other == option);
                assert_that!(after.get(other)).is_equal_to(expected);
            }
        }
    }

    #[test]
    fn increment_is_visible_to_a_new_store() {
        let storage = MemStorage::new();
        let store = LocalTallyStore::with_seeder(storage.clone(), FixedSeeder(BASELINE));
        store.load().unwrap();
        store.increment(VoteOption::B).unwrap();

        // Simulate a reload right after the vote.
        let reloaded = LocalTallyStore::with_seeder(storage, FixedSeeder(VoteTally::default()));

        assert_that!(reloaded.load().unwrap()).is_equal_to(VoteTally::new(10, 11, 10, 10));
    }

    #[test]
    fn persisted_tally_round_trips() {
        let tally = VoteTally::new(12, 0, 57, 3);
        let storage = MemStorage::new().with_entry(
            TALLY_STORAGE_KEY,
            serde_json::to_string(&tally).unwrap(),
        );

        assert_that!(LocalTallyStore::new(storage).load().unwrap()).is_equal_to(tally);
    }

    #[test]
    fn malformed_value_is_reseeded_and_persisted() {
        let storage = MemStorage::new().with_entry(TALLY_STORAGE_KEY, "{not json");
        let store = LocalTallyStore::new(storage.clone());

        let tally = store.load().unwrap();

        for option in VoteOption::ALL {
            assert!(SEED_RANGE.contains(&tally.get(option)), "{option}: {tally:?}");
        }

        let persisted: VoteTally =
            serde_json::from_str(&storage.read(TALLY_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_that!(persisted).is_equal_to(tally);
    }

    #[test]
    fn failed_write_leaves_tally_unchanged() {
        let storage = MemStorage::new().with_entry(
            TALLY_STORAGE_KEY,
            serde_json::to_string(&BASELINE).unwrap(),
        );
        let store = LocalTallyStore::new(ReadOnly(storage));
        store.load().unwrap();

        assert!(store.increment(VoteOption::A).is_err());
        assert_that!(store.snapshot().unwrap()).is_equal_to(BASELINE);
    }

    #[test]
    fn reset_reseeds() {
        let store = LocalTallyStore::with_seeder(MemStorage::new(), FixedSeeder(BASELINE));
        store.load().unwrap();
        store.increment(VoteOption::D).unwrap();

        assert_that!(store.reset().unwrap()).is_equal_to(BASELINE);
        assert_that!(store.load().unwrap()).is_equal_to(BASELINE);
    }

    #[test]
    fn file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let store =
            LocalTallyStore::with_seeder(FileStorage::new(dir.path()), FixedSeeder(BASELINE));
        store.load().unwrap();
        store.increment(VoteOption::C).unwrap();
        drop(store);

        let reopened = LocalTallyStore::new(FileStorage::new(dir.path()));
        assert_that!(reopened.snapshot().unwrap()).is_equal_to(VoteTally::new(10, 10, 11, 10));
    }
}
