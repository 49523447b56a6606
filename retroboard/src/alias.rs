//! Alias generation for seeded participants

use rand::Rng;
use std::collections::HashSet;

const ADJECTIVES: &[&str] = &[
    "Brave", "Calm", "Eager", "Gentle", "Keen", "Lively", "Mellow", "Nimble", "Quiet", "Witty",
];

const ANIMALS: &[&str] = &[
    "Badger", "Falcon", "Heron", "Lynx", "Marmot", "Otter", "Puffin", "Stoat", "Tapir", "Wren",
];

/// Pick an alias not already in `taken`. Falls back to a numbered alias once
/// the adjective/animal combinations run dry.
pub(crate) fn generate_alias(rng: &mut impl Rng, taken: &HashSet<String>) -> String {
    for _ in 0..ADJECTIVES.len() * ANIMALS.len() {
        let alias = format!(
            "{} {}",
            ADJECTIVES[rng.random_range(0..ADJECTIVES.len())],
            ANIMALS[rng.random_range(0..ANIMALS.len())]
        );
        if !taken.contains(&alias) {
            return alias;
        }
    }

    let mut n = taken.len() + 1;
    loop {
        let alias = format!("Participant {n}");
        if !taken.contains(&alias) {
            return alias;
        }
        n += 1;
    }
}
