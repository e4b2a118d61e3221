use cmt_kernel::config::load_config;
use cmt_kernel::domain::config::ApiConfig;
use std::io::Write;

#[test]
fn loads_layered_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.toml");

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
[server]
port = 9000

[database]
namespace = "cmt-test"
"#
    )
    .unwrap();

    let cfg: ApiConfig = load_config(Some(dir.path().join("server"))).expect("load config");
    assert_eq!(cfg.server.port, 9000);
    assert_eq!(cfg.database.namespace, "cmt-test");
    // Untouched sections fall back to defaults.
    assert_eq!(cfg.database.database, "core");
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let result: Result<ApiConfig, _> = load_config(Some(dir.path().join("absent")));
    assert!(result.is_err());
}
