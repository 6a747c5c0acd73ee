//! Deck state and the transformation algebra acting on it.
//!
//! A deck is a permutation of the 26 letters `A..=Z`. A transformation
//! rotates the deck left and then exchanges cards at fixed positions. Decks
//! are values: applying a transformation returns a new deck and leaves the
//! input untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of cards in the deck.
pub const DECK_SIZE: usize = 26;

/// A position pair exchanged by a transformation.
///
/// The pair is unordered in meaning; [`normalized`](Self::normalized)
/// gives the canonical low-index-first form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Swap(pub usize, pub usize);

impl Swap {
    /// Returns the swap with its lower position first.
    pub fn normalized(self) -> Swap {
        if self.0 <= self.1 {
            self
        } else {
            Swap(self.1, self.0)
        }
    }
}

/// One atomic deck mutation: rotate left by `rotation`, then apply `swaps`
/// in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transformation {
    pub swaps: Vec<Swap>,
    pub rotation: usize,
}

impl Transformation {
    /// Every position referenced by the swaps, in swap order.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.swaps.iter().flat_map(|s| [s.0, s.1])
    }

    /// Checks the structural invariants of a transformation.
    ///
    /// All positions must lie in `[0, 26)` and be pairwise distinct, the
    /// rotation must be below 26, and a rotation-free transformation must
    /// move position 0 through exactly one swap.
    pub fn is_well_formed(&self) -> bool {
        if self.rotation >= DECK_SIZE {
            return false;
        }
        let mut seen = [false; DECK_SIZE];
        for p in self.positions() {
            if p >= DECK_SIZE || seen[p] {
                return false;
            }
            seen[p] = true;
        }
        self.rotation > 0 || seen[0]
    }
}

/// A permutation of `A..=Z`, position 0 being the top card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Deck {
    cards: [u8; DECK_SIZE],
}

impl Default for Deck {
    fn default() -> Self {
        Self::identity()
    }
}

impl Deck {
    /// The unshuffled deck: `A` at position 0 through `Z` at position 25.
    pub fn identity() -> Self {
        let mut cards = [0u8; DECK_SIZE];
        for (i, card) in cards.iter_mut().enumerate() {
            *card = b'A' + i as u8;
        }
        Deck { cards }
    }

    /// The card at position 0.
    pub fn top(&self) -> char {
        char::from(self.cards[0])
    }

    /// The card at `position`, or `None` past the bottom of the deck.
    pub fn card_at(&self, position: usize) -> Option<char> {
        self.cards.get(position).map(|&c| char::from(c))
    }

    /// Cards from top to bottom.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.cards.iter().map(|&c| char::from(c))
    }

    /// Position of `symbol` (case-insensitive), or `None` if it is not a letter.
    pub fn position_of(&self, symbol: char) -> Option<usize> {
        let upper = symbol.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return None;
        }
        self.cards.iter().position(|&c| c == upper as u8)
    }

    /// Returns true if the deck holds each of `A..=Z` exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; DECK_SIZE];
        for &c in &self.cards {
            if !c.is_ascii_uppercase() {
                return false;
            }
            let idx = (c - b'A') as usize;
            if seen[idx] {
                return false;
            }
            seen[idx] = true;
        }
        true
    }

    /// Applies `transformation` to a copy of this deck.
    ///
    /// The copy is first rotated left by `rotation` (the card at index
    /// `rotation` becomes the top card), then each swap exchanges the cards
    /// at its two post-rotation positions, in list order.
    ///
    /// # Panics
    /// Panics if a swap references a position past 25. Transformations built
    /// by this crate never do.
    ///
    /// # Examples
    ///
    /// ```
    /// use decklab::{Deck, Swap, Transformation};
    ///
    /// let t = Transformation { swaps: vec![Swap(0, 1)], rotation: 2 };
    /// let deck = Deck::identity().apply(&t);
    /// assert_eq!(deck.to_string(), "DCEFGHIJKLMNOPQRSTUVWXYZAB");
    /// ```
    pub fn apply(&self, transformation: &Transformation) -> Deck {
        let mut next = *self;
        next.cards.rotate_left(transformation.rotation % DECK_SIZE);
        for swap in &transformation.swaps {
            next.cards.swap(swap.0, swap.1);
        }
        next
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.symbols() {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

/// Applies `transformation` to `deck`, returning the new deck.
pub fn apply_transformation(deck: &Deck, transformation: &Transformation) -> Deck {
    deck.apply(transformation)
}

/// The record left behind by enciphering one plaintext letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherStep {
    /// Deck after the transformation.
    pub deck: Deck,
    /// The new top card, emitted as ciphertext.
    pub output: char,
    /// The transformation that was applied.
    pub transformation: Transformation,
}
