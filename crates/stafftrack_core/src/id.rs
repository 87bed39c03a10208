//! Identifier generation.
//!
//! # Invariants
//! - Generation never fails. When the OS random source is unavailable the
//!   generator falls back to two independently seeded alphanumeric draws.
//! - Fallback identifiers carry at least 26 alphanumeric characters.

use log::warn;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::{Builder, Uuid};

const FALLBACK_DRAW_LEN: usize = 13;

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns a new opaque identifier, unique with overwhelming probability.
pub fn generate_id() -> String {
    let mut bytes = [0_u8; 16];
    match getrandom::fill(&mut bytes) {
        Ok(()) => random_uuid(bytes).to_string(),
        Err(err) => {
            warn!("event=id_generate module=id status=fallback error={err}");
            fallback_id()
        }
    }
}

fn random_uuid(bytes: [u8; 16]) -> Uuid {
    Builder::from_random_bytes(bytes).into_uuid()
}

/// Pseudo-random alphanumeric identifier built from two separately seeded
/// draws.
pub(crate) fn fallback_id() -> String {
    let mut id = alphanumeric_draw(fallback_seed());
    id.push_str(&alphanumeric_draw(fallback_seed()));
    id
}

fn alphanumeric_draw(seed: u64) -> String {
    StdRng::seed_from_u64(seed)
        .sample_iter(&Alphanumeric)
        .take(FALLBACK_DRAW_LEN)
        .map(char::from)
        .collect()
}

fn fallback_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default();
    let counter = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);
    nanos
        ^ counter.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ u64::from(std::process::id()).rotate_left(32)
}
