use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::EngineFault;

/// Ordered 52-card deck. Cards leave from the top and never come back until
/// the next [`Deck::shuffle`].
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    rng: ChaCha20Rng,
}

impl Deck {
    /// Deck whose ChaCha20 stream is keyed from the thread-local CSPRNG,
    /// which is itself seeded from operating-system entropy.
    pub fn new() -> Self {
        Self::with_rng(ChaCha20Rng::from_rng(&mut rand::rng()))
    }

    pub fn new_with_seed(seed: u64) -> Self {
        Self::with_rng(ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha20Rng) -> Self {
        // Keep initial order until shuffle is called explicitly
        Self {
            cards: full_deck(),
            position: 0,
            rng,
        }
    }

    /// Restores all 52 cards and applies a Fisher-Yates shuffle.
    pub fn shuffle(&mut self) {
        self.cards = full_deck();
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
    }

    pub fn draw(&mut self) -> Result<Card, EngineFault> {
        let c = *self
            .cards
            .get(self.position)
            .ok_or(EngineFault::DeckUnderflow)?;
        self.position += 1;
        Ok(c)
    }

    pub fn draw_many(&mut self, n: usize) -> Result<Vec<Card>, EngineFault> {
        if n > self.remaining() {
            return Err(EngineFault::DeckUnderflow);
        }
        (0..n).map(|_| self.draw()).collect()
    }

    pub fn burn(&mut self) -> Result<Card, EngineFault> {
        self.draw()
    }

    pub fn reset(&mut self) {
        self.cards = full_deck();
        self.position = 0;
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
