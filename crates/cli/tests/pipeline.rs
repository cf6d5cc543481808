use archive_core::config::AppConfig;
use archive_core::pipeline;
use chrono::{TimeZone, Utc};
use filetime::FileTime;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn set_mtime(path: &Path, year: i32, month: u32, day: u32) {
    let ts = Utc
        .with_ymd_and_hms(year, month, day, 12, 0, 0)
        .unwrap()
        .timestamp();
    filetime::set_file_mtime(path, FileTime::from_unix_time(ts, 0)).unwrap();
}

#[tokio::test]
async fn test_full_pipeline() {
    // 1. Three evidence files across three collections.
    let temp = tempdir().unwrap();
    let root = temp.path().join("root");
    for coll in ["usvi", "estate", "dataset1"] {
        fs::create_dir_all(root.join("archive").join(coll)).unwrap();
    }
    let flight = root.join("archive/usvi/flight_log_1997.pdf");
    let image = root.join("archive/estate/img001.jpg");
    let deposition = root.join("archive/dataset1/deposition_maxwell.docx");
    fs::write(&flight, vec![b'f'; 2048]).unwrap();
    fs::write(&image, vec![b'i'; 512 * 1024]).unwrap();
    fs::write(&deposition, vec![b'd'; 10 * 1024]).unwrap();
    set_mtime(&flight, 2020, 3, 5);
    set_mtime(&image, 2020, 3, 15);
    set_mtime(&deposition, 2020, 4, 15);

    let mut cfg = AppConfig::default();
    cfg.output.data_dir = temp.path().join("data").to_string_lossy().into_owned();
    cfg.output.site_dir = temp.path().join("site").to_string_lossy().into_owned();

    // 2. Run the pipeline.
    let summary = pipeline::run_scan(&cfg, &[root.clone()]).await.unwrap();
    assert_eq!(summary.discovered, 3);
    assert_eq!(summary.views_written.len(), 5);

    let data_dir = Path::new(&cfg.output.data_dir);
    let read = |p: &Path| -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(p).unwrap()).unwrap()
    };

    // 3. Documents view: statistics and category counts.
    let documents = read(&data_dir.join("documents.json"));
    assert_eq!(documents["statistics"]["total_files"], 3);
    assert_eq!(documents["statistics"]["by_category"]["document"], 2);
    assert_eq!(documents["statistics"]["by_category"]["image"], 1);
    assert_eq!(documents["files"].as_array().unwrap().len(), 3);

    // 4. Timeline: April before March, March holding two entries.
    let timeline = read(&data_dir.join("timeline.json"));
    let entries = timeline["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0][0], "2020-04");
    assert_eq!(entries[1][0], "2020-03");
    assert_eq!(entries[1][1].as_array().unwrap().len(), 2);

    // 5. Search index: three entries with semantic tags and bucket URLs.
    let index = read(&data_dir.join("search-index.json"));
    let index = index.as_array().unwrap();
    assert_eq!(index.len(), 3);
    let entry = |name: &str| {
        index
            .iter()
            .find(|e| e["name"] == name)
            .unwrap_or_else(|| panic!("missing entry {name}"))
    };
    let flight_tags = entry("flight_log_1997.pdf")["tags"].as_array().unwrap();
    for tag in ["epstein", "investigation", "flight"] {
        assert!(flight_tags.iter().any(|t| t == tag), "missing tag {tag}");
    }
    assert!(entry("img001.jpg")["tags"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t == "image"));
    assert!(entry("flight_log_1997.pdf")["path"]
        .as_str()
        .unwrap()
        .ends_with("/archive/usvi/flight_log_1997.pdf"));

    // 6. Manifest: collection names survive.
    let manifest = read(&temp.path().join("site/manifest.json"));
    let files = manifest["files"].as_array().unwrap();
    assert_eq!(files.len(), 3);
    assert!(files
        .iter()
        .any(|f| f["filename"] == "img001.jpg" && f["collection_name"] == "estate"));

    // 7. Master archive: positional ids in deterministic scan order
    // (directories walked name-sorted: dataset1, estate, usvi).
    let master = read(&data_dir.join("master_archive.json"));
    let records = master["records"].as_array().unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["EVD-DAT-0000", "EVD-EST-0001", "EVD-USV-0002"]);
    assert_eq!(records[2]["source"], "usvi");
    assert_eq!(records[0]["source"], "court");
    assert_eq!(records[0]["description"], "Recovered from dataset1");
}

#[tokio::test]
async fn rescan_regenerates_views_in_full() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("root/archive/usvi");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("a.pdf"), b"one").unwrap();

    let mut cfg = AppConfig::default();
    cfg.output.data_dir = temp.path().join("data").to_string_lossy().into_owned();
    cfg.output.site_dir = temp.path().join("site").to_string_lossy().into_owned();

    let scan_roots = vec![temp.path().join("root")];
    pipeline::run_scan(&cfg, &scan_roots).await.unwrap();
    fs::write(root.join("b.pdf"), b"two").unwrap();
    let summary = pipeline::run_scan(&cfg, &scan_roots).await.unwrap();
    assert_eq!(summary.discovered, 2);

    let master: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(temp.path().join("data/master_archive.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(master["records"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn configured_include_roots_drive_the_scan() {
    let temp = tempdir().unwrap();
    let first = temp.path().join("first/archive/usvi");
    let second = temp.path().join("second/archive/estate");
    fs::create_dir_all(&first).unwrap();
    fs::create_dir_all(&second).unwrap();
    fs::write(first.join("a.pdf"), b"one").unwrap();
    fs::write(second.join("b.jpg"), b"two").unwrap();

    let mut cfg = AppConfig::default();
    cfg.scan.include = vec![
        temp.path().join("first").to_string_lossy().into_owned(),
        temp.path().join("second").to_string_lossy().into_owned(),
    ];
    cfg.output.data_dir = temp.path().join("data").to_string_lossy().into_owned();
    cfg.output.site_dir = temp.path().join("site").to_string_lossy().into_owned();

    // No root on the command line: the config's include list is the scan set.
    let roots = cli::paths::effective_roots(None, &cfg.scan).unwrap();
    let summary = pipeline::run_scan(&cfg, &roots).await.unwrap();
    assert_eq!(summary.discovered, 2);

    let manifest: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(temp.path().join("site/manifest.json")).unwrap(),
    )
    .unwrap();
    let collections: Vec<&str> = manifest["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["collection_name"].as_str().unwrap())
        .collect();
    assert_eq!(collections, vec!["usvi", "estate"]);
}

#[test]
fn cli_root_wins_over_include_and_empty_both_is_an_error() {
    use std::path::PathBuf;

    let mut scan = archive_core::config::ScanConfig::default();
    scan.include = vec!["/cfg/root".to_string()];

    let roots = cli::paths::effective_roots(Some(PathBuf::from("/cli/root")), &scan).unwrap();
    assert_eq!(roots, vec![PathBuf::from("/cli/root")]);

    let roots = cli::paths::effective_roots(None, &scan).unwrap();
    assert_eq!(roots, vec![PathBuf::from("/cfg/root")]);

    scan.include.clear();
    assert!(cli::paths::effective_roots(None, &scan).is_err());
}
