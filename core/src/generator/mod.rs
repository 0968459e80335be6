use crate::*;
pub use random::*;

mod random;

pub trait ItemGenerator {
    fn generate(self, config: GameConfig) -> ItemLayout;
}
