//! Replay harness for checking that battles are reproducible.
//!
//! Every rule in the simulation is a total order over reading order, hit
//! points and unit ids, so two runs of the same map must agree round for
//! round. Things that would break that:
//!
//! - iterating a `HashMap` on the simulation path (its hasher is seeded
//!   per process)
//! - sorting with a key that can tie without a final coordinate or id
//! - any state outside [`Simulation`] that leaks into a turn
//!
//! The helpers here replay a battle several times, on one thread or many,
//! and through a snapshot, comparing [`Simulation::state_hash`] along the
//! way.

use std::thread;

use skirmish_core::simulation::Simulation;

/// Final hashes of several replays of the same battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    /// Final state hash of each replay.
    pub hashes: Vec<u64>,
    /// Rounds requested per replay.
    pub rounds: u64,
}

impl ReplayResult {
    /// True if every replay ended in the same state.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// The distinct final hashes, sorted.
    #[must_use]
    pub fn distinct_hashes(&self) -> Vec<u64> {
        let mut distinct = self.hashes.clone();
        distinct.sort_unstable();
        distinct.dedup();
        distinct
    }

    /// # Panics
    ///
    /// Panics with every hash listed if the replays disagree.
    pub fn assert_deterministic(&self) {
        assert!(
            self.is_deterministic(),
            "{} replays of {} rounds ended in {} different states: {:?}",
            self.hashes.len(),
            self.rounds,
            self.distinct_hashes().len(),
            self.hashes
        );
    }
}

/// Advance a simulation by one round, doing nothing once combat has ended.
///
/// # Panics
///
/// Panics if the round fails with an internal fault.
pub fn step_if_running(sim: &mut Simulation) {
    if sim.is_running() {
        if let Err(e) = sim.step_round() {
            panic!("round {} failed: {e}", sim.rounds_completed() + 1);
        }
    }
}

fn play(setup: impl Fn() -> Simulation, rounds: u64) -> u64 {
    let mut sim = setup();
    for _ in 0..rounds {
        step_if_running(&mut sim);
    }
    sim.state_hash()
}

/// Replay a battle `replays` times in sequence.
pub fn replay<F>(setup: F, replays: usize, rounds: u64) -> ReplayResult
where
    F: Fn() -> Simulation,
{
    ReplayResult {
        hashes: (0..replays).map(|_| play(&setup, rounds)).collect(),
        rounds,
    }
}

/// Replay a battle on `threads` scoped threads at once.
///
/// # Panics
///
/// Panics if a replay thread panics.
pub fn replay_on_threads<F>(setup: F, threads: usize, rounds: u64) -> ReplayResult
where
    F: Fn() -> Simulation + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| s.spawn(|| play(&setup, rounds)))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("replay thread panicked"))
            .collect()
    });

    ReplayResult { hashes, rounds }
}

/// Step two copies side by side and report the first round after which
/// their hashes differ (0 for the initial state).
pub fn first_divergent_round<F>(setup: F, rounds: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let mut left = setup();
    let mut right = setup();

    for round in 0..=rounds {
        if round > 0 {
            step_if_running(&mut left);
            step_if_running(&mut right);
        }
        if left.state_hash() != right.state_hash() {
            tracing::warn!(round, "Replays diverged");
            return Some(round);
        }
    }

    None
}

/// Play `rounds` rounds, snapshot, restore, then finish both the original
/// and the restored copy. True if they end identically.
pub fn snapshot_resumes_identically<F>(setup: F, rounds: u64) -> bool
where
    F: Fn() -> Simulation,
{
    let mut original = setup();
    for _ in 0..rounds {
        step_if_running(&mut original);
    }

    let Ok(bytes) = original.snapshot() else {
        return false;
    };
    let Ok(mut restored) = Simulation::restore(&bytes) else {
        return false;
    };
    if restored.state_hash() != original.state_hash() {
        return false;
    }

    match (original.run(), restored.run()) {
        (Ok(a), Ok(b)) => a == b && original.state_hash() == restored.state_hash(),
        _ => false,
    }
}
