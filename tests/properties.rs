//! Property-based tests for the deck engine, the mapping generator and the
//! isomorph analyzer.

use std::collections::HashMap;

use decklab::{
    encipher, find_isomorphs, generate_cipher_mapping, isomorph_interestingness,
    isomorph_pattern, sort_by_interestingness, CipherConfig, Deck, Isomorph, Transformation,
};
use proptest::prelude::*;

// ============================================================================
//  Strategies
// ============================================================================

/// Any configuration the generator accepts.
fn feasible_config() -> impl Strategy<Value = CipherConfig> {
    (1usize..=13, 0usize..=25, any::<bool>())
        .prop_filter("one swap needs rotation", |(s, r, _)| !(*s == 1 && *r == 0))
        .prop_map(|(swap_count, rotation_max, rotation_constant)| CipherConfig {
            swap_count,
            rotation_max,
            rotation_constant,
        })
}

/// A well-formed transformation built from a shuffled position list.
fn transformation() -> impl Strategy<Value = Transformation> {
    (Just((0usize..26).collect::<Vec<_>>()).prop_shuffle(), 1usize..=13, 0usize..26).prop_map(
        |(positions, swap_count, rotation)| Transformation {
            swaps: positions[..swap_count * 2]
                .chunks_exact(2)
                .map(|p| decklab::Swap(p[0], p[1]))
                .collect(),
            rotation,
        },
    )
}

fn isomorph() -> impl Strategy<Value = Isomorph> {
    ("[a.]{3,8}", 0usize..50, 0usize..50).prop_map(|(pattern, start_a, gap)| {
        let start_b = start_a + pattern.len() + gap;
        Isomorph {
            pattern,
            start_a,
            start_b,
        }
    })
}

// ============================================================================
//  Deck
// ============================================================================

proptest! {
    /// Applying any sequence of transformations keeps the deck a permutation.
    #[test]
    fn deck_stays_permutation(ts in prop::collection::vec(transformation(), 0..20)) {
        let mut deck = Deck::identity();
        for t in &ts {
            deck = deck.apply(t);
            prop_assert!(deck.is_permutation());
        }
    }

    /// Rotation moves the card at index `r` to the top.
    #[test]
    fn rotation_brings_index_to_top(r in 0usize..26) {
        let t = Transformation { swaps: vec![], rotation: r };
        let deck = Deck::identity().apply(&t);
        prop_assert_eq!(Some(deck.top()), Deck::identity().card_at(r));
    }
}

// ============================================================================
//  Mapping generation
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every feasible configuration yields 26 distinct well-formed entries.
    #[test]
    fn mapping_invariants(seed in any::<i64>(), cfg in feasible_config()) {
        let m = generate_cipher_mapping(seed, &cfg).unwrap();
        prop_assert_eq!(m.len(), 26);
        prop_assert!(m.keys_are_distinct());
        for (_, t) in m.iter() {
            prop_assert_eq!(t.swaps.len(), cfg.swap_count);
            prop_assert!(t.is_well_formed());
            if cfg.rotation_max == 0 {
                prop_assert_eq!(t.swaps[0].0, 0);
            }
        }
    }

    /// The same seed always reproduces the same mapping.
    #[test]
    fn mapping_determinism(seed in any::<i64>(), cfg in feasible_config()) {
        prop_assert_eq!(
            generate_cipher_mapping(seed, &cfg).unwrap(),
            generate_cipher_mapping(seed, &cfg).unwrap()
        );
    }

    /// Ciphertext length equals the number of letters in the plaintext.
    #[test]
    fn ciphertext_counts_letters(seed in any::<i64>(), text in "[ -~]{0,64}") {
        let m = generate_cipher_mapping(seed, &CipherConfig::default()).unwrap();
        let result = encipher(&text, &m);
        let letters = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
        prop_assert_eq!(result.ciphertext.len(), letters);
        prop_assert_eq!(result.steps.len(), letters);
        prop_assert!(result.ciphertext.chars().all(|c| c.is_ascii_uppercase()));
    }
}

// ============================================================================
//  Isomorphs
// ============================================================================

proptest! {
    /// Patterns are invariant under a consistent renaming of characters.
    #[test]
    fn pattern_invariant_under_renaming(s in "[A-F]{0,20}", shift in 1u8..20) {
        let renamed: String = s.chars().map(|c| char::from(c as u8 - b'A' + b'a' + shift)).collect();
        prop_assert_eq!(isomorph_pattern(&s), isomorph_pattern(&renamed));
    }

    /// A pattern has the input's length and scores within [0, 1].
    #[test]
    fn pattern_shape(s in "[A-Z]{0,30}") {
        let p = isomorph_pattern(&s);
        prop_assert_eq!(p.chars().count(), s.chars().count());
        let score = isomorph_interestingness(&p);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    /// Every reported pair is non-overlapping and genuinely isomorphic.
    #[test]
    fn found_isomorphs_are_valid(ct in "[A-E]{0,40}") {
        let chars: Vec<char> = ct.chars().collect();
        for iso in find_isomorphs(&ct) {
            let n = iso.len();
            prop_assert!(iso.start_b >= iso.start_a + n);
            let a: String = chars[iso.start_a..iso.start_a + n].iter().collect();
            let b: String = chars[iso.start_b..iso.start_b + n].iter().collect();
            prop_assert_eq!(isomorph_pattern(&a), iso.pattern.clone());
            prop_assert_eq!(isomorph_pattern(&b), iso.pattern);
        }
    }

    /// Sorting is a permutation of the input and leaves the input intact.
    #[test]
    fn sort_is_non_mutating_permutation(input in prop::collection::vec(isomorph(), 0..30)) {
        let before = input.clone();
        let sorted = sort_by_interestingness(&input, None);
        prop_assert_eq!(&input, &before);

        let mut tally: HashMap<Isomorph, i32> = HashMap::new();
        for i in &input {
            *tally.entry(i.clone()).or_insert(0) += 1;
        }
        for i in &sorted {
            *tally.entry(i.clone()).or_insert(0) -= 1;
        }
        prop_assert!(tally.values().all(|&v| v == 0));

        for pair in sorted.windows(2) {
            prop_assert!(
                isomorph_interestingness(&pair[0].pattern)
                    >= isomorph_interestingness(&pair[1].pattern)
            );
        }
    }
}
