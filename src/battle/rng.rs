use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The single random source a battle draws from: dodge and crit rolls,
/// turn-order tie-breaks and bot choices all go through here.
///
/// Production code uses a seeded or OS-seeded generator. Tests script the
/// exact sequence of draws with [`TurnRng::new_for_test`].
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

#[derive(Debug, Clone)]
enum RngSource {
    Seeded(StdRng),
    Scripted { outcomes: Vec<u8>, index: usize },
}

impl TurnRng {
    /// Deterministic generator; the same seed replays the same battle.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Seeded(StdRng::from_os_rng()),
        }
    }

    /// Scripted draws, consumed in order. Values are used as percent rolls
    /// directly (1..=100); index picks use `value % len`.
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    fn next_scripted(outcomes: &[u8], index: &mut usize, reason: &str) -> u8 {
        if *index >= outcomes.len() {
            panic!(
                "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        }
        let outcome = outcomes[*index];

        #[cfg(test)]
        println!("[RNG] Consumed {} for: {}", outcome, reason);

        *index += 1;
        outcome
    }

    /// A percent roll in `1..=100`. A check against `chance` succeeds when
    /// the roll is `<= chance`.
    pub fn roll_percent(&mut self, reason: &str) -> u8 {
        let roll = match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(1..=100),
            RngSource::Scripted { outcomes, index } => Self::next_scripted(outcomes, index, reason),
        };
        tracing::trace!(roll, reason, "percent roll");
        roll
    }

    /// Uniform index into a collection of `len` items. `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize, reason: &str) -> usize {
        debug_assert!(len > 0, "pick_index called with an empty collection");
        let picked = match &mut self.source {
            RngSource::Seeded(rng) => rng.random_range(0..len),
            RngSource::Scripted { outcomes, index } => {
                Self::next_scripted(outcomes, index, reason) as usize % len
            }
        };
        tracing::trace!(picked, len, reason, "index pick");
        picked
    }

    /// An unbiased key used to order combatants that share a speed.
    pub fn tiebreak(&mut self, reason: &str) -> u32 {
        match &mut self.source {
            RngSource::Seeded(rng) => rng.random(),
            RngSource::Scripted { outcomes, index } => {
                Self::next_scripted(outcomes, index, reason) as u32
            }
        }
    }
}
