//! Derives a canonical relative path, collection label, and public URL from
//! the scanned path, using structural anchors (`extracted`, `archive`,
//! `dashboard`). Total function: every branch has an explicit fallback.

use crate::models::DEFAULT_COLLECTION;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// Matches the unreserved set: alphanumerics plus `-_.~` stay literal.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub canonical_path: String,
    pub collection: String,
    pub public_url: String,
}

pub fn resolve(original: &str, bucket_url: &str) -> ResolvedPath {
    let segments: Vec<&str> = original
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .collect();

    let mut canonical = original.to_string();
    let mut collection = DEFAULT_COLLECTION.to_string();

    if let Some(idx) = segments.iter().position(|s| *s == "extracted") {
        let rest = &segments[idx + 1..];
        if !rest.is_empty() {
            canonical = rest.join("/");
            // A collection needs a directory between the anchor and the file.
            if rest.len() >= 2 {
                collection = rest[0].to_string();
            }
        }
    } else if let Some(idx) = segments.iter().position(|s| *s == "archive") {
        let rest = &segments[idx..];
        canonical = rest.join("/");
        if rest.len() > 2 {
            collection = rest[1].to_string();
        }
    } else if let Some((_, after)) = original.split_once("dashboard") {
        canonical = after.trim_start_matches(['/', '\\']).replace('\\', "/");
    }

    let public_url = format!(
        "{}/{}",
        bucket_url.trim_end_matches('/'),
        encode_segments(&canonical)
    );

    ResolvedPath {
        canonical_path: canonical,
        collection,
        public_url,
    }
}

/// Percent-encodes each path segment, preserving forward slashes.
fn encode_segments(path: &str) -> String {
    path.split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .map(|seg| utf8_percent_encode(seg, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
