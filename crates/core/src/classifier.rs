//! Maps a record to one coarse source category via priority-ordered
//! substring rules; the first rule that matches wins.

use crate::config::SourceRule;
use crate::models::SourceCategory;

pub fn classify(collection: &str, filename: &str, rules: &[SourceRule]) -> SourceCategory {
    let haystack = format!("{collection} {filename}").to_lowercase();
    for rule in rules {
        if rule.keywords.iter().any(|k| haystack.contains(k.as_str())) {
            return rule.category;
        }
    }
    SourceCategory::ArchiveDefault
}
