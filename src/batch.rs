//! Scanning many independent texts at once.
//!
//! A compiled automaton is immutable, so any number of threads can scan
//! with it concurrently as long as each text has its own cursor. These
//! helpers spread a batch of texts over a rayon pool and fall back to a
//! plain loop for batches smaller than
//! [`ParallelConfig::min_batch_size_for_parallelism`].

use crate::automaton::Automaton;
use crate::config::ParallelConfig;
use crate::error::{AcismError, Result};
use crate::scanner::Match;
use log::debug;
use rayon::prelude::*;

/// Number of matches in each text, in input order.
///
/// # Examples
///
/// ```rust
/// use acism::{batch, Automaton, ParallelConfig};
///
/// let automaton = Automaton::new(&["error", "warn"])?;
/// let lines = ["error: disk full", "ok", "warn: error rate high"];
/// let counts = batch::count_batch(&automaton, &lines, &ParallelConfig::default())?;
/// assert_eq!(counts, vec![1, 0, 2]);
/// # Ok::<(), acism::AcismError>(())
/// ```
pub fn count_batch<T>(
    automaton: &Automaton,
    texts: &[T],
    config: &ParallelConfig,
) -> Result<Vec<usize>>
where
    T: AsRef<[u8]> + Sync,
{
    run_batch(texts, config, |text| automaton.count_matches(text))
}

/// All matches of each text, in input order.
pub fn find_batch<T>(
    automaton: &Automaton,
    texts: &[T],
    config: &ParallelConfig,
) -> Result<Vec<Vec<Match>>>
where
    T: AsRef<[u8]> + Sync,
{
    run_batch(texts, config, |text| automaton.find_all(text))
}

fn run_batch<T, R, F>(texts: &[T], config: &ParallelConfig, scan: F) -> Result<Vec<R>>
where
    T: AsRef<[u8]> + Sync,
    R: Send,
    F: Fn(&[u8]) -> R + Sync,
{
    if !config.should_parallelize(texts.len()) {
        return Ok(texts.iter().map(|text| scan(text.as_ref())).collect());
    }

    let parallel = || -> Vec<R> {
        texts.par_iter().map(|text| scan(text.as_ref())).collect()
    };

    if config.num_threads == 0 || config.num_threads == rayon::current_num_threads() {
        return Ok(parallel());
    }

    debug!(
        "scanning {} texts on a dedicated pool of {} threads",
        texts.len(),
        config.num_threads
    );
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build()
        .map_err(|err| AcismError::InvalidConfig(format!("thread pool: {err}")))?;
    Ok(pool.install(parallel))
}
