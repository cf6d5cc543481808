//! Layered keyword tagging. Every layer unions into one set, so re-running
//! the engine over an already-tagged record is a no-op.

use crate::config::Taxonomy;
use std::collections::BTreeSet;
use std::path::Path;

pub fn tags_for(filename: &str, collection: &str, tax: &Taxonomy) -> BTreeSet<String> {
    let mut tags: BTreeSet<String> = tax.base_tags.iter().cloned().collect();

    let norm_name = normalize(filename, &['_', '-', '.']);
    let norm_collection = normalize(collection, &['_', '-']);
    let search_text = format!("{norm_name} {norm_collection}");

    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default();
    for bundle in &tax.extension_tags {
        if bundle.extensions.iter().any(|e| *e == extension) {
            tags.extend(bundle.tags.iter().cloned());
        }
    }

    for entry in &tax.collection_tags {
        if norm_collection.contains(&entry.name) {
            tags.extend(entry.tags.iter().cloned());
        }
    }

    // First matching keyword adds the bucket's tag once, then on to the next.
    for bucket in &tax.keyword_buckets {
        if bucket.keywords.iter().any(|k| search_text.contains(k.as_str())) {
            tags.insert(bucket.tag.clone());
        }
    }

    for rule in &tax.filename_patterns {
        if rule.keywords.iter().any(|k| norm_name.contains(k.as_str())) {
            tags.insert(rule.tag.clone());
        }
    }

    tags
}

fn normalize(text: &str, separators: &[char]) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if separators.contains(&c) { ' ' } else { c })
        .collect()
}
