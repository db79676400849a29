//! Canned deterrent phrases for the emergency command.

use std::sync::Mutex;

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

/// The fixed phrase pool. Never empty.
const DETERRENTS: &[&str] = &[
    "Stop. Don't do it.",
    "Close the app. Go for a walk.",
    "Cold shower. Right now.",
    "Think of the streak you'd be throwing away.",
    "Twenty push-ups, then reassess.",
    "Urges pass. Resets don't.",
    "Future you is watching. Make them proud.",
];

/// Uniform phrase picker backed by a seedable PRNG.
///
/// Seeded once at construction; pass a fixed seed for reproducible output.
pub struct PhrasePicker {
    rng: Mutex<Mcg128Xsl64>,
}

impl PhrasePicker {
    /// Picker seeded from entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(Mcg128Xsl64::from_entropy()),
        }
    }

    /// Picker with a fixed seed, for reproducible output.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(Mcg128Xsl64::seed_from_u64(seed)),
        }
    }

    /// One phrase, chosen uniformly.
    pub fn pick(&self) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        DETERRENTS.choose(&mut *rng).copied().unwrap_or(DETERRENTS[0])
    }
}

impl Default for PhrasePicker {
    fn default() -> Self {
        Self::new()
    }
}
