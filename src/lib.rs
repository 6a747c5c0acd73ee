//! DeckLab: a deck-of-cards permutation cipher and isomorph analyzer.
//!
//! The cipher models a deck of the 26 letters `A..=Z`. Every plaintext
//! letter owns a [`Transformation`] (a left rotation followed by a fixed set
//! of position swaps); enciphering a letter applies its transformation to the
//! running deck and emits the new top card. The companion analyzer looks for
//! *isomorphs* in ciphertext: equal-length windows that share a repetition
//! structure, a classic sign of non-random structure.
//!
//! This is a teaching and exploration tool, not a secure cipher.
//!
//! # Architecture
//!
//! ```text
//! seed + CipherConfig ──► generate_cipher_mapping ──► CipherMapping
//! CipherMapping + plaintext ──► encipher ──► ciphertext + CipherStep trace
//! ciphertext ──► find_isomorphs ──► sort_by_interestingness
//! ```
//!
//! # Examples
//!
//! Encipher a message with a seeded mapping:
//!
//! ```
//! use decklab::{encipher, generate_cipher_mapping, CipherConfig};
//!
//! let config = CipherConfig { swap_count: 4, rotation_max: 3, rotation_constant: false };
//! let mapping = generate_cipher_mapping(2024, &config).unwrap();
//!
//! let result = encipher("Attack at dawn", &mapping);
//! assert_eq!(result.ciphertext.len(), 12);
//! assert_eq!(result.steps.len(), 12);
//! ```
//!
//! Rank the isomorphs of a ciphertext:
//!
//! ```
//! use decklab::{count_pattern_occurrences, find_isomorphs, sort_by_interestingness};
//!
//! let found = find_isomorphs("ahwoanaouvonuyun");
//! let counts = count_pattern_occurrences(&found);
//! let ranked = sort_by_interestingness(&found, Some(&counts));
//! assert_eq!(ranked.len(), found.len());
//! ```

#![deny(clippy::all)]

pub mod deck;
pub mod engine;
pub mod error;
pub mod generate;
pub mod isomorph;
pub mod random;

pub use deck::{apply_transformation, CipherStep, Deck, Swap, Transformation, DECK_SIZE};
pub use engine::{encipher, encipher_step, Encipherment};
pub use error::DeckLabError;
pub use generate::{
    generate_cipher_mapping, generate_cipher_mapping_with, generate_sliding_window_mapping,
    generate_transformation, CipherConfig, CipherMapping, RotationPolicy, TransformationKey,
};
pub use isomorph::{
    count_pattern_occurrences, find_isomorphs, isomorph_interestingness, isomorph_pattern,
    sort_by_interestingness, Isomorph,
};
