#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

#[test]
fn test_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movielist");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("favorites"));
}

#[test]
fn test_search_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movielist");
    cmd.args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--query"))
        .stdout(predicate::str::contains("--pages"));
}

#[test]
fn test_search_rejects_zero_pages() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movielist");
    cmd.args(["search", "--pages", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--pages"));
}

#[test]
fn test_favorites_add_missing_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("movielist");
    cmd.args(["favorites", "add"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_favorites_list_empty() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movielist");
    cmd.args(["favorites", "list", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No favorites saved yet"));
}

#[test]
fn test_favorites_list_shows_saved_movies() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let favorites = serde_json::json!([
        {
            "imdbID": "tt0107290",
            "Title": "Jurassic Park",
            "Year": "1993",
            "Poster": "N/A",
            "isFav": true
        }
    ]);
    std::fs::write(
        dir.path().join("favorites.json"),
        serde_json::to_string(&favorites).unwrap(),
    )
    .unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movielist");
    cmd.args(["favorites", "list", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Jurassic Park"))
        .stdout(predicate::str::contains("Total: 1 favorites"));
}

#[test]
fn test_favorites_list_unreadable_file_starts_empty() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("favorites.json"), "not json").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movielist");
    cmd.args(["favorites", "list", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No favorites saved yet"));
}

#[test]
fn test_favorites_remove_absent_id_persists() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    let mut cmd = cargo_bin_cmd!("movielist");
    cmd.args(["favorites", "remove", "--id", "tt0000001", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("tt0000001 is not in favorites"));

    // Assert
    let content = std::fs::read_to_string(dir.path().join("favorites.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed, serde_json::json!([]));
}

#[test]
fn test_favorites_add_existing_skips_fetch() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let favorites = serde_json::json!([
        { "imdbID": "tt0107290", "Title": "Jurassic Park", "Year": "1993", "Poster": "N/A" }
    ]);
    std::fs::write(
        dir.path().join("favorites.json"),
        serde_json::to_string(&favorites).unwrap(),
    )
    .unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movielist");
    cmd.args(["favorites", "add", "--id", "tt0107290", "--base-url"])
        .arg("http://127.0.0.1:9/")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already in favorites"));
}

#[test]
fn test_detail_unreachable_upstream_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movielist");
    cmd.args(["detail", "--id", "tt0107290", "--base-url"])
        .arg("http://127.0.0.1:9/")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "failed to fetch movie detail for tt0107290",
        ));
}

#[test]
fn test_invalid_base_url_fails() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movielist");
    cmd.args(["search", "--base-url", "not a url", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid base URL"));
}

#[test]
fn test_config_init_then_show() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    let mut init = cargo_bin_cmd!("movielist");
    init.args(["config", "init", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default config"));

    // Assert
    assert!(dir.path().join("config.toml").exists());
    let mut show = cargo_bin_cmd!("movielist");
    show.args(["config", "show", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("default_term = \"Jurassic\""));
}

#[test]
fn test_config_init_keeps_existing_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[search]\ndefault_term = \"Alien\"\n").unwrap();

    // Act
    let mut cmd = cargo_bin_cmd!("movielist");
    cmd.args(["config", "init", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Config already exists"));

    // Assert
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Alien"));
}

#[test]
fn test_zero_timeout_config_is_rejected() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[upstream]\ntimeout_secs = 0\n",
    )
    .unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("movielist");
    cmd.args(["config", "show", "--dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "timeout_secs must be greater than 0",
        ));
}
