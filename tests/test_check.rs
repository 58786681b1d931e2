//! `check api` against a mock shop API.

mod common;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use mockito::Matcher;
use predicates::prelude::*;

fn drivekit_cmd() -> Command {
    cargo_bin_cmd!("drivekit")
}

const PRODUCTS: &str = r#"[
    {"id": 1, "name": "Teddy Bear", "imageUrls": [
        "https://res.cloudinary.com/shop/image/upload/v1/teddy.jpg",
        "/uploads/teddy-2.jpg"
    ]},
    {"id": 2, "name": "Blocks", "imageUrls": ["/uploads/blocks.jpg"]},
    {"id": 3, "name": "Kite"}
]"#;

#[test]
fn test_check_api_reports_counts() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/products")
        .match_query(Matcher::UrlEncoded("admin".into(), "true".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PRODUCTS)
        .create();

    let (tmp, config) = common::temp_project();
    common::write_config(
        tmp.path(),
        &format!("[check]\napi_base = \"{}\"\n", server.url()),
    );

    let mut cmd = drivekit_cmd();
    cmd.args(["--config"]).arg(&config).args(["check", "api"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("CDN URLs:     1"))
        .stdout(predicate::str::contains("local paths:  2"))
        .stdout(predicate::str::contains("products with CDN images: 1"))
        .stdout(predicate::str::contains("Teddy Bear"));
    mock.assert();
}

#[test]
fn test_check_api_empty_list() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/products")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create();

    let (tmp, config) = common::temp_project();
    common::write_config(
        tmp.path(),
        &format!("[check]\napi_base = \"{}\"\n", server.url()),
    );

    let mut cmd = drivekit_cmd();
    cmd.args(["--config"]).arg(&config).args(["check", "api"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Checked 0 product(s)"));
}

#[test]
fn test_check_api_server_error_fails() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", "/api/products")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create();

    let (tmp, config) = common::temp_project();
    common::write_config(
        tmp.path(),
        &format!("[check]\napi_base = \"{}\"\n", server.url()),
    );

    let mut cmd = drivekit_cmd();
    cmd.args(["--config"]).arg(&config).args(["check", "api"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 500"));
}
