use alloc::vec::Vec;

use super::*;

/// Places every symbol twice and shuffles the deck with a seeded RNG, so a seed always reproduces
/// the same board.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: GameConfig) -> BoardLayout {
        use rand::prelude::*;

        let config = if config.is_valid() {
            config
        } else {
            let adjusted = GameConfig::new(config.size, config.reveal_delay_ms);
            log::warn!(
                "Board size {:?} cannot hold whole pairs, generated {:?} instead",
                config.size,
                adjusted.size
            );
            adjusted
        };

        let pairs = config.pair_count();
        let mut deck: Vec<Symbol> = (0..pairs)
            .flat_map(|id| {
                let symbol = Symbol(id as u8);
                [symbol, symbol]
            })
            .collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        deck.shuffle(&mut rng);

        log::debug!("generated {} pairs with seed {}", pairs, self.seed);
        BoardLayout::from_symbols_unchecked(config.size, &deck)
    }
}
