/// Shuffle bag — non-repeating random draws from each template pool.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashMap;

/// Draw order for a single pool: a permutation of template indices and
/// how far into it we are.
#[derive(Debug, Clone, Default)]
struct ShuffleState {
    order: Vec<usize>,
    cursor: usize,
}

impl ShuffleState {
    fn exhausted(&self, pool_len: usize) -> bool {
        // A pool whose size no longer matches the permutation is treated as
        // exhausted so the next draw covers every template again.
        self.cursor >= self.order.len() || self.order.len() != pool_len
    }

    fn reshuffle(&mut self, pool_len: usize, rng: &mut StdRng) {
        self.order.clear();
        self.order.extend(0..pool_len);
        self.order.shuffle(rng);
        self.cursor = 0;
    }
}

/// Per-pool draw state, owned by a single generator instance.
///
/// Every run of `n` consecutive draws from an `n`-template pool aligned to a
/// reshuffle returns each template exactly once.
#[derive(Debug, Clone, Default)]
pub struct ShuffleBag {
    states: FxHashMap<String, ShuffleState>,
}

impl ShuffleBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the next template for `key`. Returns `None` only for an empty pool.
    pub fn next<'p>(&mut self, key: &str, pool: &'p [String], rng: &mut StdRng) -> Option<&'p str> {
        if pool.is_empty() {
            return None;
        }

        let state = self.states.entry(key.to_string()).or_default();

        if state.exhausted(pool.len()) {
            state.reshuffle(pool.len(), rng);
            tracing::trace!(pool = key, size = pool.len(), "reshuffled template pool");
        }

        let index = state.order[state.cursor];
        state.cursor += 1;
        Some(pool[index].as_str())
    }
}
