//! Header-name resolution.
//!
//! Stores are edited by humans, so column headers drift: casing, spacing and
//! punctuation vary, the handle column gets renamed outright. Resolution is a
//! pure function over the header row trying an ordered list of strategies and
//! returning the first hit:
//!
//! 1. normalized exact match against the canonical name
//! 2. normalized exact match against the field's known synonyms
//! 3. substring containment between normalized header and canonical name
//!
//! `None` means the field is absent: reads yield empty strings and writes
//! skip the field.

use super::types::FieldKey;

/// Resolve a canonical field to a column index in the given header row.
pub fn resolve_header(headers: &[String], key: FieldKey) -> Option<usize> {
    let canonical = normalize(key.canonical());

    if let Some(idx) = headers.iter().position(|h| normalize(h) == canonical) {
        return Some(idx);
    }

    for synonym in key.synonyms() {
        let synonym = normalize(synonym);
        if let Some(idx) = headers.iter().position(|h| normalize(h) == synonym) {
            return Some(idx);
        }
    }

    headers.iter().position(|h| {
        let header = normalize(h);
        !header.is_empty() && (header.contains(&canonical) || canonical.contains(&header))
    })
}

/// Lowercase and strip everything but letters and digits, so that
/// "Linked Account ID", "linked_account_id" and "Linked-Account Id" compare
/// equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}
