use cmt_domain::config::{ApiConfig, DatabaseConfig, ServerConfig, StorageConfig};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4820);
    assert!(server.ssl.is_none());

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!(db.namespace, "cmt");
    assert_eq!(db.database, "core");
    assert!(db.credentials.is_some());

    let storage = StorageConfig::default();
    assert_eq!(storage.uploads_dir, std::path::PathBuf::from("uploads"));
    assert!(storage.max_upload_bytes > 0);
}

#[test]
fn api_config_deserializes() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "database": { "url": "mem://", "namespace": "n", "database": "d", "credentials": null },
        "storage": { "uploads_dir": "/tmp/uploads", "max_upload_bytes": 1024 }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.database.namespace, "n");
    assert_eq!(cfg.storage.uploads_dir, std::path::PathBuf::from("/tmp/uploads"));
    assert_eq!(cfg.storage.max_upload_bytes, 1024);
}

#[test]
fn security_defaults_flag_dev_secrets() {
    let cfg = ApiConfig::default();
    assert_eq!(cfg.security.identity.jwt.issuer, "cmt");
    assert_eq!(cfg.security.identity.jwt.ttl_seconds, 3600);
    assert_eq!(cfg.security.identity.jwt.secret, "dev-only-change-me");
}
