//! Full runs over HTTP against wiremock servers

use formscout::config::Config;
use formscout::crawler::Coordinator;
use formscout::feed::FeedUrls;
use formscout::state::ScanStateStore;
use formscout::storage::open_storage;
use formscout::FormRecord;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Sign in</title></head>
<body>
    <form action="/session" method="POST">
        <input type="email" name="email" id="email" placeholder="Email" required>
        <input type="password" name="password" required>
        <select name="remember">
            <option value="1">Yes</option>
            <option value="0">No</option>
        </select>
        <input type="submit" value="Sign in">
    </form>
    <form role="search"><input type="search" name="q"></form>
</body>
</html>"#;

fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.output.results_dir = root.join("results");
    config.output.state_path = root.join("state").join("scan_state.json");
    config.crawler.navigation_timeout_secs = 5;
    config
}

fn feed_urls(server: &MockServer) -> FeedUrls {
    FeedUrls {
        exact: format!("{}/domains.txt", server.uri()),
        wildcard: format!("{}/wildcards.txt", server.uri()),
    }
}

#[tokio::test]
async fn test_full_run_over_http() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(LOGIN_PAGE)
                .insert_header("content-type", "text/html"),
        )
        .mount(&site)
        .await;

    // Only the plain-http seed of "127.0.0.1:<port>" is reachable.
    let site_domain = site.address().to_string();

    let feed = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "# exact scope\n\n{}\n",
            site_domain
        )))
        .mount(&feed)
        .await;
    Mock::given(method("GET"))
        .and(path("/wildcards.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&feed)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let coordinator = Coordinator::from_config(config.clone())
        .unwrap()
        .with_feed_urls(feed_urls(&feed));

    let report = coordinator.run_once().await.unwrap();

    assert_eq!(report.universe_size, 1);
    assert_eq!(report.attempted, vec![site_domain.clone()]);
    assert_eq!(report.forms_saved, 2);

    let content = std::fs::read_to_string(dir.path().join("results/forms.json")).unwrap();
    let forms: Vec<FormRecord> = serde_json::from_str(&content).unwrap();
    assert_eq!(forms.len(), 2);

    let login = &forms[0];
    assert_eq!(login.url, format!("{}/", site.uri()));
    assert_eq!(login.action, format!("{}/session", site.uri()));
    assert_eq!(login.method, "post");
    let types: Vec<_> = login.fields.iter().map(|f| f.field_type.as_str()).collect();
    assert_eq!(types, vec!["email", "password", "select-one", "submit"]);
    assert_eq!(
        login.fields[2].options,
        Some(vec!["1".to_string(), "0".to_string()])
    );
    assert!(content.contains("\"type\": \"email\""));

    assert_eq!(forms[1].method, "get");
    assert_eq!(forms[1].fields[0].field_type, "search");

    let state = ScanStateStore::new(open_storage(), config.output.state_path.clone()).load();
    assert_eq!(state.scanned, vec![site_domain]);
    let raw_state = std::fs::read_to_string(&config.output.state_path).unwrap();
    assert!(raw_state.contains("\"lastUpdate\""));
}

#[tokio::test]
async fn test_unreachable_feeds_reset_empty_state() {
    let feed = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&feed)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let coordinator = Coordinator::from_config(config.clone())
        .unwrap()
        .with_feed_urls(feed_urls(&feed));

    let report = coordinator.run_once().await.unwrap();

    assert_eq!(report.universe_size, 0);
    assert!(report.state_reset);
    assert!(dir.path().join("results").is_dir());
    assert!(config.output.state_path.is_file());
}
