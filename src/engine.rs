//! Step-by-step encipherment.
//!
//! Each plaintext letter selects its transformation from the mapping, the
//! transformation is applied to the running deck, and the new top card is
//! emitted as ciphertext. Characters outside `A..=Z` (after uppercasing) are
//! skipped: they neither advance the deck nor appear in the output.

use tracing::debug;

use crate::deck::{CipherStep, Deck, Transformation};
use crate::generate::CipherMapping;

/// The outcome of enciphering a whole message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encipherment {
    /// Deck after the last letter (the identity deck if nothing was enciphered).
    pub deck: Deck,
    /// One output letter per enciphered plaintext letter.
    pub ciphertext: String,
    /// Transformation applied for the last letter, if any.
    pub last_transformation: Option<Transformation>,
    /// One record per enciphered letter, in order.
    pub steps: Vec<CipherStep>,
}

/// Enciphers a single character against `deck`.
///
/// Returns the new deck and the new top card, or `None` if `plaintext` is
/// not a letter.
///
/// # Examples
///
/// ```
/// use decklab::{encipher_step, generate_sliding_window_mapping, Deck};
///
/// let mapping = generate_sliding_window_mapping();
/// let (deck, out) = encipher_step(&Deck::identity(), 'a', &mapping).unwrap();
/// assert_eq!(out, deck.top());
/// assert!(encipher_step(&Deck::identity(), '7', &mapping).is_none());
/// ```
pub fn encipher_step(
    deck: &Deck,
    plaintext: char,
    mapping: &CipherMapping,
) -> Option<(Deck, char)> {
    let transformation = mapping.get(plaintext)?;
    let next = deck.apply(transformation);
    Some((next, next.top()))
}

/// Enciphers `plaintext` starting from the identity deck.
///
/// # Examples
///
/// ```
/// use decklab::{encipher, generate_sliding_window_mapping, Deck};
///
/// let mapping = generate_sliding_window_mapping();
/// let result = encipher("Hi, there!", &mapping);
/// assert_eq!(result.ciphertext.len(), 7);
/// assert_eq!(result.steps.len(), 7);
///
/// let empty = encipher("", &mapping);
/// assert_eq!(empty.deck, Deck::identity());
/// assert!(empty.last_transformation.is_none());
/// ```
pub fn encipher(plaintext: &str, mapping: &CipherMapping) -> Encipherment {
    let mut deck = Deck::identity();
    let mut ciphertext = String::new();
    let mut steps = Vec::new();
    let mut skipped = 0usize;

    for c in plaintext.chars() {
        let (Some((next, output)), Some(transformation)) =
            (encipher_step(&deck, c, mapping), mapping.get(c))
        else {
            skipped += 1;
            continue;
        };
        deck = next;
        ciphertext.push(output);
        steps.push(CipherStep {
            deck,
            output,
            transformation: transformation.clone(),
        });
    }

    debug!(letters = steps.len(), skipped, "enciphered message");
    let last_transformation = steps.last().map(|s| s.transformation.clone());
    Encipherment {
        deck,
        ciphertext,
        last_transformation,
        steps,
    }
}
