//! Content addressing for emitted assets.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Number of hex characters kept from a digest.
pub const HASH_LEN: usize = 8;

/// Short hex digest of `input`.
pub fn short_hash(input: impl AsRef<[u8]>) -> String {
    let digest = Sha256::digest(input.as_ref());
    let mut hex = format!("{digest:x}");
    hex.truncate(HASH_LEN);
    hex
}

/// Identifier of a subset font, derived from where it came from.
///
/// Two fonts with identical bytes but different source directories or file
/// names get different identifiers; reruns over the same layout get the same one.
pub fn address_font(group_key: &Path, file_name: &str) -> String {
    short_hash(format!("{}:{file_name}", group_key.display()))
}

/// Identifier of a rendered bundle stylesheet.
pub fn address_css(css: &str) -> String {
    short_hash(css)
}
