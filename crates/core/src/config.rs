use crate::models::{FileCategory, SourceCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub taxonomy: Taxonomy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving documents/timeline/search-index/master-archive.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Directory receiving manifest.json (the site root).
    #[serde(default = "default_site_dir")]
    pub site_dir: String,
    /// Storage bucket prefix prepended to every public URL, no trailing slash.
    #[serde(default = "default_bucket_url")]
    pub bucket_url: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            site_dir: default_site_dir(),
            bucket_url: default_bucket_url(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_site_dir() -> String {
    ".".to_string()
}

fn default_bucket_url() -> String {
    "https://epstein-archive-media.s3.us-east-1.amazonaws.com".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Capacity of the change-notification queue feeding the rebuild worker.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_queue_capacity() -> usize {
    64
}

/// A named tag plus the candidate substrings that trigger it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordBucket {
    pub tag: String,
    pub keywords: Vec<String>,
}

/// Tag bundle contributed when `name` appears in the normalized collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionTags {
    pub name: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionTags {
    pub extensions: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRule {
    pub category: SourceCategory,
    pub keywords: Vec<String>,
}

/// All keyword tables in one injectable object, so alternate taxonomies are
/// testable without touching engine code. Rule lists are ordered; order is
/// significant for the classifier and the keyword buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxonomy {
    #[serde(default = "default_categories")]
    pub categories: BTreeMap<String, FileCategory>,
    #[serde(default = "default_base_tags")]
    pub base_tags: Vec<String>,
    #[serde(default = "default_extension_tags")]
    pub extension_tags: Vec<ExtensionTags>,
    #[serde(default = "default_collection_tags")]
    pub collection_tags: Vec<CollectionTags>,
    #[serde(default = "default_keyword_buckets")]
    pub keyword_buckets: Vec<KeywordBucket>,
    #[serde(default = "default_filename_patterns")]
    pub filename_patterns: Vec<KeywordBucket>,
    #[serde(default = "default_source_rules")]
    pub source_rules: Vec<SourceRule>,
    #[serde(default = "default_person_patterns")]
    pub person_patterns: Vec<KeywordBucket>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            base_tags: default_base_tags(),
            extension_tags: default_extension_tags(),
            collection_tags: default_collection_tags(),
            keyword_buckets: default_keyword_buckets(),
            filename_patterns: default_filename_patterns(),
            source_rules: default_source_rules(),
            person_patterns: default_person_patterns(),
        }
    }
}

fn default_categories() -> BTreeMap<String, FileCategory> {
    [
        (".pdf", FileCategory::Document),
        (".doc", FileCategory::Document),
        (".docx", FileCategory::Document),
        (".txt", FileCategory::Text),
        (".jpg", FileCategory::Image),
        (".jpeg", FileCategory::Image),
        (".png", FileCategory::Image),
        (".gif", FileCategory::Image),
        (".mp4", FileCategory::Video),
        (".mov", FileCategory::Video),
        (".avi", FileCategory::Video),
        (".dat", FileCategory::Data),
        (".opt", FileCategory::Data),
    ]
    .into_iter()
    .map(|(ext, cat)| (ext.to_string(), cat))
    .collect()
}

fn default_base_tags() -> Vec<String> {
    vec!["epstein".to_string(), "investigation".to_string()]
}

fn ext_tags(extensions: &[&str], tags: &[&str]) -> ExtensionTags {
    ExtensionTags {
        extensions: extensions.iter().map(|s| s.to_string()).collect(),
        tags: tags.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_extension_tags() -> Vec<ExtensionTags> {
    vec![
        ext_tags(&[".jpg", ".jpeg", ".png", ".gif"], &["image"]),
        ext_tags(&[".mp4", ".mov", ".avi", ".mkv", ".webm"], &["video"]),
        ext_tags(&[".pdf"], &["document", "pdf"]),
    ]
}

fn collection(name: &str, tags: &[&str]) -> CollectionTags {
    CollectionTags {
        name: name.to_string(),
        tags: tags.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_collection_tags() -> Vec<CollectionTags> {
    vec![
        collection(
            "dataset 1",
            &["maxwell", "legal", "discovery", "court", "deposition"],
        ),
        collection("dataset 2", &["maxwell", "legal", "discovery", "court"]),
        collection("dataset 3", &["maxwell", "legal", "discovery", "court"]),
        collection("dataset 4", &["maxwell", "legal", "discovery", "court"]),
        collection("dataset 5", &["maxwell", "legal", "discovery", "court"]),
        collection("dataset 6", &["maxwell", "legal", "discovery", "court"]),
        collection("dataset 7", &["maxwell", "legal", "discovery", "court"]),
        collection(
            "dataset 8",
            &["maxwell", "trial", "media", "property", "evidence"],
        ),
        collection(
            "usvi",
            &["island", "little st james", "property", "drone", "aerial"],
        ),
        collection("estate", &["financial", "assets", "property", "records"]),
        collection("gdrive", &["doj", "government", "official"]),
        collection("images005", &["property", "photographs", "evidence"]),
        collection("12.03.25", &["usvi", "production", "island", "property"]),
        collection("12.11.25", &["estate", "financial", "assets"]),
        collection("12.18.25", &["release", "official", "doj"]),
    ]
}

fn bucket(tag: &str, keywords: &[&str]) -> KeywordBucket {
    KeywordBucket {
        tag: tag.to_string(),
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_keyword_buckets() -> Vec<KeywordBucket> {
    vec![
        bucket("epstein", &["epstein", "jeffrey", "island", "pedophile"]),
        bucket("maxwell", &["ghislaine", "maxwell", "terra", "mar", "terramar"]),
        bucket("trump", &["trump", "donald", "president"]),
        bucket("clinton", &["clinton", "bill", "president"]),
        bucket("prince", &["prince", "andrew", "duke", "royal"]),
        bucket("dershowitz", &["dershowitz", "alan"]),
        bucket("brunel", &["brunel", "jean", "luc"]),
        bucket("les", &["wexner", "leslie"]),
        bucket("giuffre", &["virginia", "roberts", "giuffre"]),
        bucket("sjberg", &["johanna", "sjoberg", "sjberg"]),
        bucket(
            "flight",
            &["flight", "log", "pilot", "manifest", "plane", "lolita", "express"],
        ),
        bucket(
            "court",
            &["deposition", "transcript", "testimony", "affidavit", "motion", "exhibit", "v."],
        ),
        bucket("redacted", &["redacted", "blacked", "out"]),
        bucket(
            "financial",
            &["bank", "check", "deposit", "transfer", "jp", "morgan", "deutsche"],
        ),
        bucket("palm", &["palm", "beach", "florida", "mansion"]),
        bucket("mexico", &["zorro", "ranch", "mexico", "nm"]),
        bucket("paris", &["paris", "france", "apartment"]),
        bucket("ny", &["york", "manhattan", "house", "71st"]),
        bucket("vi", &["virgin", "islands", "lsj", "little", "james", "sj", "st"]),
    ]
}

fn default_filename_patterns() -> Vec<KeywordBucket> {
    vec![
        bucket("legal", &["dc", "district"]),
        bucket("court", &["def", "plaintiff"]),
        bucket("testimony", &["deposition", "transcript"]),
        bucket("government", &["house", "oversight"]),
        bucket("aerial", &["dji", "drone"]),
        bucket("photograph", &["img"]),
    ]
}

fn source_rule(category: SourceCategory, keywords: &[&str]) -> SourceRule {
    SourceRule {
        category,
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
    }
}

fn default_source_rules() -> Vec<SourceRule> {
    vec![
        source_rule(SourceCategory::Doj, &["doj", "oversight", "release", "gdrive"]),
        source_rule(SourceCategory::Usvi, &["usvi", "estate"]),
        source_rule(SourceCategory::Court, &["minors"]),
        source_rule(SourceCategory::Court, &["dataset"]),
        source_rule(
            SourceCategory::Court,
            &["court", "deposition", "legal", "exhibit"],
        ),
        source_rule(SourceCategory::Maxwell, &["maxwell"]),
    ]
}

fn default_person_patterns() -> Vec<KeywordBucket> {
    vec![
        bucket(
            "trump",
            &["trump", "donald trump", "donald j. trump", "president trump"],
        ),
        bucket(
            "clinton",
            &["clinton", "bill clinton", "william clinton", "president clinton", "hillary"],
        ),
        bucket(
            "prince",
            &["prince andrew", "duke of york", "andrew windsor", "prince"],
        ),
        bucket(
            "giuffre",
            &["giuffre", "virginia giuffre", "virginia roberts", "roberts"],
        ),
        bucket("dershowitz", &["dershowitz", "alan dershowitz"]),
        bucket(
            "brunel",
            &["brunel", "jean-luc brunel", "jean luc brunel"],
        ),
        bucket("wexner", &["wexner", "les wexner", "leslie wexner"]),
        bucket("spacey", &["spacey", "kevin spacey"]),
        bucket("richardson", &["richardson", "bill richardson"]),
        bucket("dubin", &["dubin", "glenn dubin", "eva dubin"]),
    ]
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
