use rand::{SeedableRng, rngs::StdRng};

use super::*;

/// Purely random placement: every subset of `config.items` cells is equally likely.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomItemGenerator {
    seed: u64,
}

impl RandomItemGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl ItemGenerator for RandomItemGenerator {
    fn generate(self, config: GameConfig) -> ItemLayout {
        let total_cells = usize::from(config.total_cells());
        let requested = usize::from(config.items);

        if requested > total_cells {
            log::warn!(
                "Grid already full, requested {} items but only fits {}",
                requested,
                total_cells
            );
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let indices = rand::seq::index::sample(&mut rng, total_cells, requested.min(total_cells));

        ItemLayout::from_distinct(config.size, indices.into_iter().collect())
    }
}
