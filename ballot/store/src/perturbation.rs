#[cfg(feature = "tracing")]
use tracing::{debug, warn};
use {
    crate::{LocalTallyStore, Storage, StoreResult},
    ballot_types::{Presenter, UiEvent, VoteOption},
    rand::{Rng, SeedableRng, rngs::StdRng},
    std::{sync::Mutex, time::Duration},
    tokio::{task::JoinHandle, time::MissedTickBehavior},
};

/// Simulated voting activity from other users, applied in the background.
pub trait Perturbation {
    fn is_enabled(&self) -> bool;

    fn interval(&self) -> Duration;

    /// Decide, for one tick, whether someone else voted and for what.
    fn pick(&self) -> Option<VoteOption>;
}

/// No background activity. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPerturbation;

impl Perturbation for NoPerturbation {
    fn is_enabled(&self) -> bool {
        false
    }

    fn interval(&self) -> Duration {
        Duration::MAX
    }

    fn pick(&self) -> Option<VoteOption> {
        None
    }
}

/// On each tick, with the given probability, adds a vote to a uniformly
/// chosen option.
#[derive(Debug)]
pub struct RandomPerturbation {
    probability: f64,
    interval: Duration,
    rng: Mutex<StdRng>,
}

impl RandomPerturbation {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);
    pub const DEFAULT_PROBABILITY: f64 = 0.05;

    pub fn new(probability: f64, interval: Duration) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            interval,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }
}

impl Default for RandomPerturbation {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PROBABILITY, Self::DEFAULT_INTERVAL)
    }
}

impl Perturbation for RandomPerturbation {
    fn is_enabled(&self) -> bool {
        self.probability > 0.0 && !self.interval.is_zero()
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn pick(&self) -> Option<VoteOption> {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|err| panic!("RandomPerturbation is poisoned: {err:?}"));

        if !rng.gen_bool(self.probability) {
            return None;
        }

        VoteOption::from_index(rng.gen_range(0..VoteOption::ALL.len()))
    }
}

/// Apply a single tick of `perturbation` to the store and tell the presenter
/// if anything changed.
pub fn perturb_once<S, P>(
    store: &LocalTallyStore<S>,
    perturbation: &P,
    presenter: &Presenter,
) -> StoreResult<Option<VoteOption>>
where
    S: Storage,
    P: Perturbation + ?Sized,
{
    let Some(option) = perturbation.pick() else {
        return Ok(None);
    };

    let tally = store.increment(option)?;

    #[cfg(feature = "tracing")]
    debug!(%option, "Simulated external vote");

    presenter.emit(UiEvent::Tally(tally.views()));

    Ok(Some(option))
}

/// Run `perturbation` on a background task until the handle is aborted.
///
/// Returns `None`, and spawns nothing, if the perturbation is disabled or has
/// no interval to tick on.
pub fn spawn_perturbation<S, P>(
    store: LocalTallyStore<S>,
    perturbation: P,
    presenter: Presenter,
) -> Option<JoinHandle<()>>
where
    S: Storage + Send + Sync + 'static,
    P: Perturbation + Send + Sync + 'static,
{
    if !perturbation.is_enabled() || perturbation.interval().is_zero() {
        #[cfg(feature = "tracing")]
        debug!(interval = ?perturbation.interval(), "Perturbation disabled");

        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(perturbation.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            if let Err(_err) = perturb_once(&store, &perturbation, &presenter) {
                #[cfg(feature = "tracing")]
                warn!(err = %_err, "Failed to persist simulated vote");
            }
        }
    }))
}

// ----------------------------------- tests -----------------------------------
