use cmt_storage::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_path_traversal_blocked() {
    let temp = TempDir::new().unwrap();

    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    assert!(storage.resolve("../etc/passwd").is_err());
    assert!(storage.resolve("foo/../../bar").is_err());
}

#[tokio::test]
async fn test_write_read_roundtrip() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let payload = b"%PDF-1.7 sample";
    storage.write("papers/007P.pdf", payload).await.unwrap();
    assert!(storage.exists("papers/007P.pdf").unwrap());

    let data = storage.read("papers/007P.pdf").await.unwrap();
    assert_eq!(data, payload);

    let meta = storage.metadata("papers/007P.pdf").await.unwrap();
    assert_eq!(meta.len(), payload.len() as u64);
}

#[tokio::test]
async fn test_overwrite_is_atomic_replace() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    storage.write("001P.pdf", b"draft").await.unwrap();
    storage.write("001P.pdf", b"camera-ready").await.unwrap();

    assert_eq!(storage.read("001P.pdf").await.unwrap(), b"camera-ready");
}

#[tokio::test]
async fn test_namespace_isolation() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let ns_a = storage.namespace("icse2026").unwrap();
    let ns_b = storage.namespace("fse2026").unwrap();

    ns_a.write("001P.pdf", b"a").await.unwrap();
    ns_b.write("001P.pdf", b"b").await.unwrap();

    let a_path = ns_a.resolve("001P.pdf").unwrap();
    let b_path = ns_b.resolve("001P.pdf").unwrap();
    assert_ne!(a_path, b_path, "paths must differ across namespaces");

    assert_eq!(ns_a.read("001P.pdf").await.unwrap(), b"a");
    assert_eq!(ns_b.read("001P.pdf").await.unwrap(), b"b");
}

#[tokio::test]
async fn test_namespace_name_validation() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    assert!(storage.namespace("").is_err());
    assert!(storage.namespace("../evil").is_err());
    assert!(storage.namespace("has space").is_err());

    let ns = storage.namespace("ICSE2026").unwrap();
    assert!(ns.resolve("x.pdf").unwrap().to_string_lossy().contains("icse2026"));
}

#[tokio::test]
async fn test_delete_and_exists() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    storage.write("tmp/file.pdf", b"x").await.unwrap();
    assert!(storage.exists("tmp/file.pdf").unwrap());

    storage.delete("tmp/file.pdf").await.unwrap();
    assert!(!storage.exists("tmp/file.pdf").unwrap());
}

#[tokio::test]
async fn test_delete_missing_file_errors() {
    let temp = TempDir::new().unwrap();
    let storage = Storage::builder().root(temp.path()).connect().await.unwrap();

    let err = storage.delete("nope.pdf").await.unwrap_err();
    assert!(matches!(err, StorageError::FileNotFound { .. }));
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let temp = TempDir::new().unwrap();
    let storage =
        Storage::builder().root(temp.path()).max_file_size(16).connect().await.unwrap();

    let err = storage.write("big.pdf", &[0u8; 17]).await.unwrap_err();
    assert!(matches!(err, StorageError::FileTooLarge { .. }));
    assert!(!storage.exists("big.pdf").unwrap());

    storage.write("ok.pdf", &[0u8; 16]).await.unwrap();
}

#[tokio::test]
async fn test_orphaned_tmp_files_purged_on_connect() {
    let temp = TempDir::new().unwrap();

    // Simulate a crash that left a stale temp file behind.
    let stale = temp.path().join("007P.pdf.cmttmp.3");
    std::fs::write(&stale, b"partial").unwrap();
    let old = std::time::SystemTime::now() - std::time::Duration::from_secs(3600);
    let file = std::fs::OpenOptions::new().write(true).open(&stale).unwrap();
    file.set_modified(old).unwrap();
    drop(file);

    let _storage = Storage::builder().root(temp.path()).connect().await.unwrap();
    assert!(!stale.exists(), "stale temp file should be purged during boot");
}
