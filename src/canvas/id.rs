//! Layer and canvas identifiers.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

/// Random suffix length for canvas-wide identifiers.
pub const CANVAS_ID_LENGTH: usize = 8;

/// Random suffix length for layer identifiers.
pub const LAYER_ID_LENGTH: usize = 5;

/// Generate an identifier of the form `<hex millis>-<hex random>`.
///
/// Uniqueness is probabilistic; collisions are not detected.
pub fn make_id(random_len: usize) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();

    let mut rng = rand::rng();
    let suffix: String = (0..random_len)
        .filter_map(|_| char::from_digit(rng.random_range(0..16), 16))
        .collect();

    format!("{:x}-{}", millis, suffix)
}
