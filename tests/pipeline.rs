//! End-to-end runs against a mock search provider and mock pages.

use gleaner::config::Settings;
use gleaner::persist::{persist, Destination, PersistOutcome, Record, SaveFormat};
use gleaner::pipeline::Pipeline;
use gleaner::research::Researcher;
use gleaner::retrieve::find;
use gleaner::scrape::Scraper;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_web() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("authorization", "Bearer tvly-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "intro to algebra",
            "results": [
                {
                    "title": "Algebra for Beginners",
                    "url": format!("{}/algebra-basics", server.uri()),
                    "content": "Variables and expressions",
                    "score": 0.93
                },
                {
                    "title": "Solving Algebra Equations",
                    "url": format!("{}/equations", server.uri()),
                    "content": "One-step equations",
                    "score": 0.81
                }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/algebra-basics"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(concat!(
                    "<html><body><h1>Algebra</h1>",
                    "<p>Algebra uses letters.</p><p>x + 2 = 5</p>",
                    "</body></html>"
                )),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/equations"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(
                    "<html><body><div>Balance both sides in algebra.</div></body></html>",
                ),
        )
        .mount(&server)
        .await;

    server
}

fn settings_for(server: &MockServer, dir: &std::path::Path) -> Settings {
    let mut settings = Settings::default();
    settings.search.base_url = server.uri();
    settings.search.api_key = Some("tvly-test".to_string());
    settings.storage.output_dir = dir.display().to_string();
    settings.storage.db_path = dir.join("education_data.db").display().to_string();
    settings
}

#[tokio::test]
async fn test_search_scrape_persist_find() {
    let server = mock_web().await;
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(&server, dir.path());

    let researcher = Researcher::from_settings(&settings.search).unwrap();
    let results = researcher.search("intro to algebra", 2).await.unwrap();
    assert_eq!(results.len(), 2);

    let scraper = Scraper::new(&settings.scrape).unwrap();
    let articles = scraper.scrape(&results).await.unwrap();
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].scraped_text, "Algebra uses letters. x + 2 = 5");
    assert_eq!(articles[1].scraped_text, "No <p> content found.");

    let records: Vec<Record> = articles.iter().map(|a| a.to_record()).collect();
    let destination = Destination::new(
        settings.output_path("algebra"),
        settings.db_path(),
        "articles",
    );
    let outcome = persist(&records, "sqlite", &destination);
    assert!(outcome.is_saved(), "{:?}", outcome);

    let rows = find("algebra", &settings.db_path(), "articles").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0]["url"],
        Value::String(format!("{}/algebra-basics", server.uri()))
    );
    assert_eq!(rows[1]["title"], Value::String("Solving Algebra Equations".to_string()));
}

#[tokio::test]
async fn test_pipeline_harvest_to_sqlite() {
    let server = mock_web().await;
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_for(&server, dir.path());
    let db_path = settings.db_path();

    let pipeline = Pipeline::new(settings).unwrap();
    let report = pipeline
        .harvest("intro to algebra", 5, "algebra", SaveFormat::Sqlite)
        .await
        .unwrap();

    assert_eq!(report.found, 2);
    assert_eq!(report.scraped, 2);
    assert!(matches!(report.outcome, PersistOutcome::Saved { rows: 2, .. }));

    let rows = find("letters", &db_path, "articles").unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_empty_data_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let destination = Destination::new(
        dir.path().join("empty"),
        dir.path().join("db.sqlite"),
        "articles",
    );

    let outcome = persist(&[], "csv", &destination);
    assert!(matches!(outcome, PersistOutcome::Skipped { .. }));
    assert!(!dir.path().join("empty.csv").exists());
}

#[test]
fn test_unsupported_format_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let destination = Destination::new(
        dir.path().join("notes"),
        dir.path().join("db.sqlite"),
        "articles",
    );
    let record = json!({ "url": "https://example.com", "title": "T", "scraped_text": "x" })
        .as_object()
        .cloned()
        .unwrap();

    let outcome = persist(&[record], "xml", &destination);
    assert!(outcome.message().contains("Unsupported save format"));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_find_on_missing_database_does_not_create_it() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("never.db");

    assert!(find("algebra", &db, "articles").is_none());
    assert!(!db.exists());
}
