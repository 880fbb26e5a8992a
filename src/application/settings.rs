use crate::domain::values::id_strategy::IdStrategy;
use std::time::Duration;

pub const DEFAULT_TOP_K: usize = 10;

/// Knobs fixed when the service is composed and shared by every dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub default_top_k: usize,
    pub id_strategy: IdStrategy,
    /// Upper bound on a single embedding call; `None` waits indefinitely.
    pub embed_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_top_k: DEFAULT_TOP_K,
            id_strategy: IdStrategy::Random,
            embed_timeout: None,
        }
    }
}
