use super::*;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "cardsmith_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn reads_relative_and_file_scheme_paths() {
    let tmp = temp_dir("fetch_paths");
    std::fs::create_dir_all(&tmp).unwrap();
    std::fs::write(tmp.join("art.bin"), [1u8, 2, 3]).unwrap();

    let fetcher = ResourceFetcher::new(&tmp).unwrap();
    assert_eq!(fetcher.fetch("art.bin").unwrap(), vec![1, 2, 3]);

    let absolute = format!("file://{}", tmp.join("art.bin").display());
    assert_eq!(fetcher.fetch(&absolute).unwrap(), vec![1, 2, 3]);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn missing_file_reports_path() {
    let fetcher = ResourceFetcher::new(temp_dir("fetch_missing")).unwrap();
    let err = fetcher.fetch("nope.png").unwrap_err();
    assert!(err.to_string().contains("nope.png"));
}

#[test]
fn unknown_scheme_is_rejected() {
    let fetcher = ResourceFetcher::new(".").unwrap();
    let err = fetcher.fetch("ftp://example.test/a.png").unwrap_err();
    assert!(err.to_string().contains("unsupported resource scheme 'ftp'"));
}

#[test]
fn memory_fetcher_serves_registered_bytes_only() {
    let mut fetcher = MemoryFetcher::new();
    fetcher.insert("mem://a", vec![9]);
    assert_eq!(fetcher.len(), 1);
    assert_eq!(fetcher.fetch("mem://a").unwrap(), vec![9]);
    assert!(fetcher.fetch("mem://b").is_err());
}
