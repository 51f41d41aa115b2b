use log::debug;
use rand::{rngs::StdRng, SeedableRng};

/// Creates the run's random number generator.
///
/// Call once at process start and pass the generator down; weight init and
/// mini-batch shuffling both draw from it, so one seed reproduces a run.
pub fn seeded(seed: u64) -> StdRng {
    debug!("seeding RNG with {}", seed);
    StdRng::seed_from_u64(seed)
}
