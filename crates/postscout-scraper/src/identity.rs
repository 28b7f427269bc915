//! Stable identifiers for rendered posts.

use sha2::{Digest, Sha256};

use crate::driver::PostElement;
use crate::selectors::POST_URN_ATTRIBUTE;

/// Hex characters kept from the content digest.
const FINGERPRINT_LEN: usize = 8;

/// Returns the post's `data-urn` verbatim when present, otherwise a short
/// fingerprint of its visible text.
///
/// Never fails and never returns an empty string. Two distinct posts with
/// identical visible text and no URN share an identifier.
pub async fn resolve_identity<E: PostElement>(post: &E) -> String {
    match post.attribute(POST_URN_ATTRIBUTE).await {
        Ok(Some(urn)) if !urn.is_empty() => return urn,
        Ok(_) => {}
        Err(err) => tracing::debug!(error = %err, "could not read post URN; fingerprinting"),
    }

    let text = post.inner_text().await.unwrap_or_else(|err| {
        tracing::debug!(error = %err, "could not read post text; fingerprinting empty body");
        String::new()
    });
    fingerprint(&text)
}

/// First [`FINGERPRINT_LEN`] hex characters of the SHA-256 of `text`.
#[must_use]
pub fn fingerprint(text: &str) -> String {
    let mut hex = format!("{:x}", Sha256::digest(text.as_bytes()));
    hex.truncate(FINGERPRINT_LEN);
    hex
}
