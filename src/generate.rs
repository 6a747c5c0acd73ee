//! Cipher mapping generation.
//!
//! A cipher mapping assigns one [`Transformation`] to each letter `A..=Z`,
//! all 26 pairwise distinct. Two generators are provided:
//!
//! - [`generate_cipher_mapping`] draws transformations from a seeded
//!   [`SequenceSource`] and rejects any candidate whose normalized key was
//!   already assigned to an earlier letter.
//! - [`generate_sliding_window_mapping`] needs no randomness and is distinct
//!   by construction.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::deck::{Swap, Transformation, DECK_SIZE};
use crate::error::DeckLabError;
use crate::random::{create_rng, SequenceSource};

/// Largest supported swap count (13 swaps touch all 26 positions).
pub const MAX_SWAP_COUNT: usize = 13;

/// Largest supported rotation.
pub const MAX_ROTATION: usize = DECK_SIZE - 1;

/// Attempts on a single letter after which the rejection loop is reported.
const ATTEMPT_WARN_THRESHOLD: usize = 10_000;

/// Window size of the sliding-window generator.
const WINDOW: usize = 7;

/// Number of non-zero deck positions.
const NON_ZERO_POSITIONS: usize = DECK_SIZE - 1;

/// Parameters of the randomized mapping generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CipherConfig {
    /// Swaps per transformation, in `[1, 13]`.
    pub swap_count: usize,
    /// Maximum rotation, in `[0, 25]`. Zero disables rotation.
    pub rotation_max: usize,
    /// Use `rotation_max` for every letter instead of drawing from `[1, rotation_max]`.
    pub rotation_constant: bool,
}

impl Default for CipherConfig {
    fn default() -> Self {
        CipherConfig {
            swap_count: 4,
            rotation_max: 0,
            rotation_constant: false,
        }
    }
}

impl CipherConfig {
    /// Checks ranges and feasibility.
    ///
    /// # Errors
    /// - [`DeckLabError::SwapCountOutOfRange`] if `swap_count` is not in `[1, 13]`.
    /// - [`DeckLabError::RotationOutOfRange`] if `rotation_max > 25`.
    /// - [`DeckLabError::InfeasibleConfig`] for one swap without rotation:
    ///   position 0 can only pair with 25 partners, one short of 26 letters.
    pub fn validate(&self) -> Result<(), DeckLabError> {
        if !(1..=MAX_SWAP_COUNT).contains(&self.swap_count) {
            return Err(DeckLabError::SwapCountOutOfRange(self.swap_count));
        }
        if self.rotation_max > MAX_ROTATION {
            return Err(DeckLabError::RotationOutOfRange(self.rotation_max));
        }
        if self.swap_count == 1 && self.rotation_max == 0 {
            return Err(DeckLabError::InfeasibleConfig {
                swap_count: self.swap_count,
                rotation_max: self.rotation_max,
            });
        }
        Ok(())
    }

    /// The rotation policy this configuration selects.
    pub fn rotation_policy(&self) -> RotationPolicy {
        match (self.rotation_max, self.rotation_constant) {
            (0, _) => RotationPolicy::None,
            (max, true) => RotationPolicy::Fixed(max),
            (max, false) => RotationPolicy::Uniform { max },
        }
    }
}

/// How each transformation's rotation is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationPolicy {
    /// Never rotate; position 0 is always swapped instead.
    None,
    /// Rotate every transformation by exactly this amount.
    Fixed(usize),
    /// Draw uniformly from `[1, max]` for every candidate.
    Uniform { max: usize },
}

impl RotationPolicy {
    /// Picks the rotation for one candidate transformation.
    ///
    /// Only [`RotationPolicy::Uniform`] consumes a value from `rng`.
    pub fn choose<R: SequenceSource + ?Sized>(&self, rng: &mut R) -> usize {
        match *self {
            RotationPolicy::None => 0,
            RotationPolicy::Fixed(r) => r,
            RotationPolicy::Uniform { max } => 1 + rng.next_below(max),
        }
    }
}

/// Canonical comparison key of a transformation.
///
/// Swaps are stored low-index-first and sorted, so transformations that differ
/// only in swap order or orientation share a key. The rotation is part of the
/// key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransformationKey {
    rotation: usize,
    swaps: Vec<Swap>,
}

impl TransformationKey {
    /// Builds the key of `transformation`: swaps normalized and sorted,
    /// rotation unchanged.
    pub fn new(transformation: &Transformation) -> Self {
        let mut swaps: Vec<Swap> = transformation
            .swaps
            .iter()
            .map(|s| s.normalized())
            .collect();
        swaps.sort();
        TransformationKey {
            rotation: transformation.rotation,
            swaps,
        }
    }
}

impl fmt::Display for TransformationKey {
    /// Renders as `r{rotation};a,b;c,d;...`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.rotation)?;
        for s in &self.swaps {
            write!(f, ";{},{}", s.0, s.1)?;
        }
        Ok(())
    }
}

impl Transformation {
    /// Normalized comparison key.
    pub fn key(&self) -> TransformationKey {
        TransformationKey::new(self)
    }
}

/// One transformation per letter `A..=Z`, all pairwise distinct.
///
/// Serializes as an object keyed by the letters `"A"` through `"Z"`.
/// Deserializing checks that every letter is present exactly once, that
/// each entry is well formed and that no two entries share a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<char, Transformation>",
    into = "BTreeMap<char, Transformation>"
)]
pub struct CipherMapping {
    transformations: Vec<Transformation>,
}

impl CipherMapping {
    /// Transformation for `symbol` (case-insensitive), or `None` for a non-letter.
    pub fn get(&self, symbol: char) -> Option<&Transformation> {
        let upper = symbol.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return None;
        }
        self.transformations.get((upper as u8 - b'A') as usize)
    }

    /// `(letter, transformation)` pairs in `A..=Z` order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &Transformation)> + '_ {
        self.transformations
            .iter()
            .enumerate()
            .map(|(i, t)| (char::from(b'A' + i as u8), t))
    }

    /// Number of entries (always 26).
    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    /// Returns true if the mapping has no entries. Never true for a
    /// generated mapping.
    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }

    /// Returns true if no two entries share a normalized key.
    pub fn keys_are_distinct(&self) -> bool {
        let mut keys = HashSet::with_capacity(self.transformations.len());
        self.transformations.iter().all(|t| keys.insert(t.key()))
    }
}

impl From<CipherMapping> for BTreeMap<char, Transformation> {
    fn from(mapping: CipherMapping) -> Self {
        ('A'..='Z').zip(mapping.transformations).collect()
    }
}

impl TryFrom<BTreeMap<char, Transformation>> for CipherMapping {
    type Error = DeckLabError;

    fn try_from(mut entries: BTreeMap<char, Transformation>) -> Result<Self, Self::Error> {
        let mut transformations = Vec::with_capacity(DECK_SIZE);
        for letter in 'A'..='Z' {
            let transformation = entries
                .remove(&letter)
                .ok_or_else(|| DeckLabError::InvalidMapping(format!("missing letter {}", letter)))?;
            if !transformation.is_well_formed() {
                return Err(DeckLabError::InvalidMapping(format!(
                    "malformed transformation for {}",
                    letter
                )));
            }
            transformations.push(transformation);
        }
        if let Some(extra) = entries.keys().next() {
            return Err(DeckLabError::InvalidMapping(format!(
                "unexpected key {:?}",
                extra
            )));
        }
        let mapping = CipherMapping { transformations };
        if !mapping.keys_are_distinct() {
            return Err(DeckLabError::InvalidMapping(
                "two letters share a transformation".to_string(),
            ));
        }
        Ok(mapping)
    }
}

impl Index<char> for CipherMapping {
    type Output = Transformation;

    /// # Panics
    /// Panics if `symbol` is not an ASCII letter.
    fn index(&self, symbol: char) -> &Transformation {
        match self.get(symbol) {
            Some(t) => t,
            None => panic!("no transformation for non-letter {:?}", symbol),
        }
    }
}

/// Draws `count` distinct positions from `[low, DECK_SIZE)` by rejection.
fn sample_unique<R: SequenceSource + ?Sized>(
    rng: &mut R,
    low: usize,
    count: usize,
) -> Vec<usize> {
    let span = DECK_SIZE - low;
    let mut used = [false; DECK_SIZE];
    let mut result = Vec::with_capacity(count);
    while result.len() < count {
        let v = low + rng.next_below(span);
        if !used[v] {
            used[v] = true;
            result.push(v);
        }
    }
    result
}

/// Pairs consecutive positions into swaps.
fn pair_up(positions: &[usize]) -> Vec<Swap> {
    positions.chunks_exact(2).map(|p| Swap(p[0], p[1])).collect()
}

/// Generates one candidate transformation.
///
/// Without rotation, position 0 is placed first and `2 * swap_count - 1`
/// distinct positions are drawn from `[1, 25]`, so the first swap is always
/// `(0, x)` and the top card always changes. With rotation, all
/// `2 * swap_count` positions are drawn from `[0, 25]`.
///
/// # Errors
/// - [`DeckLabError::SwapCountOutOfRange`] if `swap_count` is not in `[1, 13]`.
/// - [`DeckLabError::RotationOutOfRange`] if `rotation > 25`.
///
/// Nothing is drawn from `rng` when an error is returned.
///
/// # Examples
///
/// ```
/// use decklab::generate_transformation;
/// use decklab::random::create_rng;
///
/// let t = generate_transformation(&mut create_rng(1), 4, 0).unwrap();
/// assert_eq!(t.swaps[0].0, 0);
/// assert!(generate_transformation(&mut create_rng(1), 14, 3).is_err());
/// ```
pub fn generate_transformation<R: SequenceSource + ?Sized>(
    rng: &mut R,
    swap_count: usize,
    rotation: usize,
) -> Result<Transformation, DeckLabError> {
    if !(1..=MAX_SWAP_COUNT).contains(&swap_count) {
        return Err(DeckLabError::SwapCountOutOfRange(swap_count));
    }
    if rotation > MAX_ROTATION {
        return Err(DeckLabError::RotationOutOfRange(rotation));
    }

    let positions = if rotation == 0 {
        let mut positions = Vec::with_capacity(swap_count * 2);
        positions.push(0);
        positions.extend(sample_unique(rng, 1, swap_count * 2 - 1));
        positions
    } else {
        sample_unique(rng, 0, swap_count * 2)
    };

    Ok(Transformation {
        swaps: pair_up(&positions),
        rotation,
    })
}

/// Generates a cipher mapping from `seed` using the default sequence source.
///
/// The same seed and configuration always produce the same mapping.
///
/// # Errors
/// Returns the error from [`CipherConfig::validate`] for an out-of-range or
/// infeasible configuration.
///
/// # Examples
///
/// ```
/// use decklab::{generate_cipher_mapping, CipherConfig};
///
/// let config = CipherConfig { swap_count: 4, rotation_max: 0, rotation_constant: false };
/// let a = generate_cipher_mapping(42, &config).unwrap();
/// let b = generate_cipher_mapping(42, &config).unwrap();
/// assert_eq!(a, b);
/// assert!(a.keys_are_distinct());
/// ```
///
/// ```
/// use decklab::{generate_cipher_mapping, CipherConfig};
///
/// let config = CipherConfig { swap_count: 1, rotation_max: 0, rotation_constant: false };
/// assert!(generate_cipher_mapping(42, &config).is_err());
/// ```
pub fn generate_cipher_mapping(
    seed: i64,
    config: &CipherConfig,
) -> Result<CipherMapping, DeckLabError> {
    config.validate()?;
    let mut rng = create_rng(seed);
    let mapping = build_mapping(&mut rng, config)?;
    debug!(seed, ?config, "generated cipher mapping");
    Ok(mapping)
}

/// Generates a cipher mapping drawing from a caller-supplied source.
///
/// # Errors
/// Returns the error from [`CipherConfig::validate`] for an out-of-range or
/// infeasible configuration. The source is not touched in that case.
pub fn generate_cipher_mapping_with<R: SequenceSource + ?Sized>(
    rng: &mut R,
    config: &CipherConfig,
) -> Result<CipherMapping, DeckLabError> {
    config.validate()?;
    build_mapping(rng, config)
}

/// Rejection-samples one unused transformation per letter.
///
/// Collisions are checked against every earlier letter. The loop is not
/// capped; a letter that needs an unusual number of attempts is logged.
fn build_mapping<R: SequenceSource + ?Sized>(
    rng: &mut R,
    config: &CipherConfig,
) -> Result<CipherMapping, DeckLabError> {
    let policy = config.rotation_policy();
    let mut used: HashSet<TransformationKey> = HashSet::with_capacity(DECK_SIZE);
    let mut transformations = Vec::with_capacity(DECK_SIZE);
    let mut total_attempts = 0usize;

    for i in 0..DECK_SIZE {
        let letter = char::from(b'A' + i as u8);
        let mut attempts = 0usize;
        loop {
            attempts += 1;
            let rotation = policy.choose(rng);
            let candidate = generate_transformation(rng, config.swap_count, rotation)?;
            let key = candidate.key();
            if used.insert(key) {
                transformations.push(candidate);
                break;
            }
            trace!(%letter, key = %candidate.key(), "rejected duplicate transformation");
            if attempts == ATTEMPT_WARN_THRESHOLD {
                warn!(
                    %letter,
                    attempts,
                    swap_count = config.swap_count,
                    rotation_max = config.rotation_max,
                    "transformation rejection loop is running long"
                );
            }
        }
        total_attempts += attempts;
    }

    debug!(total_attempts, "cipher mapping rejection sampling finished");
    Ok(CipherMapping { transformations })
}

/// Wraps `v >= 1` into the non-zero positions `[1, 25]`.
fn wrap_non_zero(v: usize) -> usize {
    (v - 1) % NON_ZERO_POSITIONS + 1
}

/// Generates the deterministic sliding-window mapping.
///
/// Letter `i` takes the 7 non-zero positions starting at `i + 1` (wrapping
/// within `[1, 25]`), pairs position 0 with window slot `i % 7`, and pairs
/// the remaining 6 positions consecutively. Every transformation has 4 swaps
/// and rotation 1. Letters `A` and `Z` share a window but pair position 0
/// with different slots, so all 26 entries are distinct.
///
/// # Examples
///
/// ```
/// use decklab::{generate_sliding_window_mapping, Swap};
///
/// let mapping = generate_sliding_window_mapping();
/// assert_eq!(mapping['A'].swaps[0], Swap(0, 1));
/// assert!(mapping.keys_are_distinct());
/// ```
pub fn generate_sliding_window_mapping() -> CipherMapping {
    let transformations = (0..DECK_SIZE)
        .map(|i| {
            let window: Vec<usize> = (0..WINDOW).map(|k| wrap_non_zero(i + 1 + k)).collect();
            let partner_idx = i % WINDOW;
            let rest: Vec<usize> = window
                .iter()
                .enumerate()
                .filter(|&(idx, _)| idx != partner_idx)
                .map(|(_, &p)| p)
                .collect();

            let mut swaps = Vec::with_capacity(4);
            swaps.push(Swap(0, window[partner_idx]));
            swaps.extend(pair_up(&rest));
            Transformation { swaps, rotation: 1 }
        })
        .collect();

    CipherMapping { transformations }
}
