//! Cosmetic validator names
//!
//! Names have the form `validator-<word>-<hex>`: the word is picked by
//! Blake3(id) so the same id always yields the same name, and no draw is
//! taken from the simulation rng.

use crate::pos_interface::ValidatorId;

const WORDS: [&str; 32] = [
    "amber", "anchor", "aspen", "badger", "beacon", "birch", "cobalt", "comet", "copper", "delta",
    "ember", "falcon", "fjord", "garnet", "harbor", "heron", "indigo", "juniper", "kestrel",
    "lantern", "maple", "meadow", "nimbus", "onyx", "orchid", "pebble", "quartz", "raven",
    "sable", "thistle", "willow", "zephyr",
];

pub fn display_name(id: ValidatorId) -> String {
    let hash = blake3::hash(&id.to_le_bytes());
    let index = hash.as_bytes()[0] as usize % WORDS.len();
    let hex = format!("{:016x}", id);
    format!("validator-{}-{}", WORDS[index], &hex[..4])
}
