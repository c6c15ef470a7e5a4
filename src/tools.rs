//! Tool definitions and dispatch for agent callers.
//!
//! Each tool wraps one pipeline stage. Results are JSON values; an absent
//! result is `null` with the reason in the logs.

use crate::config::Settings;
use crate::error::{GleanerError, Result};
use crate::persist::{persist, Destination, PersistOutcome, Record, SaveFormat};
use crate::research::{Researcher, SearchResult};
use crate::retrieve::find;
use crate::scrape::Scraper;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// Names of every tool, in definition order.
pub const TOOL_NAMES: [&str; 4] = [
    "research_education_data",
    "scrape_and_structure_data",
    "save_data",
    "search_database",
];

/// A typed tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall {
    /// Search the web for educational content.
    ResearchEducationData {
        query: String,
        #[serde(default = "default_max_results")]
        max_results: u32,
    },

    /// Fetch pages for search results and extract their text.
    ScrapeAndStructureData { search_results: Vec<SearchResult> },

    /// Persist records as csv, excel, pdf or sqlite.
    SaveData {
        data: Vec<Record>,
        filename: String,
        #[serde(default = "default_save_format")]
        save_format: String,
        #[serde(default)]
        db_name: Option<String>,
        #[serde(default = "default_table_name")]
        table_name: String,
    },

    /// Keyword search over a persisted table.
    SearchDatabase {
        query: String,
        #[serde(default)]
        db_name: Option<String>,
        #[serde(default = "default_table_name")]
        table_name: String,
    },
}

fn default_max_results() -> u32 {
    5
}

fn default_save_format() -> String {
    "csv".to_string()
}

fn default_table_name() -> String {
    "articles".to_string()
}

impl ToolCall {
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::ResearchEducationData { .. } => TOOL_NAMES[0],
            ToolCall::ScrapeAndStructureData { .. } => TOOL_NAMES[1],
            ToolCall::SaveData { .. } => TOOL_NAMES[2],
            ToolCall::SearchDatabase { .. } => TOOL_NAMES[3],
        }
    }
}

/// A tool as advertised to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Definitions for every tool, with JSON-schema arguments.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: TOOL_NAMES[0].to_string(),
            description: "Search the web for educational content. \
                Returns validated results with title, url and content, or null on failure."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query for educational content"
                    },
                    "max_results": {
                        "type": "integer",
                        "description": "Maximum number of results to return",
                        "default": 5
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: TOOL_NAMES[1].to_string(),
            description: "Fetch the pages of search results and extract their paragraph text. \
                Pages that fail to load are skipped. \
                Returns article records, or null if nothing was extracted."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "search_results": {
                        "type": "array",
                        "description": "Results returned by research_education_data",
                        "items": {
                            "type": "object",
                            "properties": {
                                "title": { "type": "string" },
                                "url": { "type": "string" },
                                "content": { "type": "string" },
                                "score": { "type": "number" },
                                "raw_content": { "type": "string" }
                            },
                            "required": ["title", "url", "content"]
                        }
                    }
                },
                "required": ["search_results"]
            }),
        },
        ToolDefinition {
            name: TOOL_NAMES[2].to_string(),
            description: "Save records as csv, excel, pdf or sqlite. \
                Each save fully replaces the target file or table."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "data": {
                        "type": "array",
                        "description": "Records to save, usually from scrape_and_structure_data",
                        "items": { "type": "object" }
                    },
                    "filename": {
                        "type": "string",
                        "description": "Output filename without extension"
                    },
                    "save_format": {
                        "type": "string",
                        "enum": ["csv", "excel", "pdf", "sqlite"],
                        "default": "csv"
                    },
                    "db_name": {
                        "type": "string",
                        "description": "SQLite database path (sqlite format only)"
                    },
                    "table_name": {
                        "type": "string",
                        "default": "articles"
                    }
                },
                "required": ["data", "filename"]
            }),
        },
        ToolDefinition {
            name: TOOL_NAMES[3].to_string(),
            description: "Search saved articles whose title or text contains the query. \
                Returns matching records, or null if there are none."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Keyword or phrase to look for"
                    },
                    "db_name": {
                        "type": "string",
                        "description": "SQLite database path"
                    },
                    "table_name": {
                        "type": "string",
                        "default": "articles"
                    }
                },
                "required": ["query"]
            }),
        },
    ]
}

/// Parse a tool call from its name and JSON arguments.
pub fn parse_tool_call(name: &str, arguments: Value) -> Result<ToolCall> {
    if !TOOL_NAMES.contains(&name) {
        return Err(GleanerError::Tool(format!("Unknown tool: {}", name)));
    }

    let arguments = match arguments {
        Value::Null => json!({}),
        other => other,
    };

    serde_json::from_value(json!({ "name": name, "arguments": arguments }))
        .map_err(|e| GleanerError::InvalidInput(format!("Invalid arguments for {}: {}", name, e)))
}

/// Tool execution context.
pub struct ToolContext {
    settings: Settings,
}

impl ToolContext {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Parse and execute in one step.
    pub async fn call(&self, name: &str, arguments: Value) -> Result<Value> {
        let tool = parse_tool_call(name, arguments)?;
        self.execute(&tool).await
    }

    /// Execute a tool call and return its JSON result.
    #[instrument(skip_all, fields(tool = tool.name()))]
    pub async fn execute(&self, tool: &ToolCall) -> Result<Value> {
        match tool {
            ToolCall::ResearchEducationData { query, max_results } => {
                self.execute_research(query, *max_results).await
            }
            ToolCall::ScrapeAndStructureData { search_results } => {
                self.execute_scrape(search_results).await
            }
            ToolCall::SaveData {
                data,
                filename,
                save_format,
                db_name,
                table_name,
            } => self.execute_save(data, filename, save_format, db_name.as_deref(), table_name),
            ToolCall::SearchDatabase {
                query,
                db_name,
                table_name,
            } => self.execute_search_database(query, db_name.as_deref(), table_name),
        }
    }

    async fn execute_research(&self, query: &str, max_results: u32) -> Result<Value> {
        let researcher = match Researcher::from_settings(&self.settings.search) {
            Ok(r) => r,
            Err(e) => {
                warn!("Search unavailable: {}", e);
                return Ok(Value::Null);
            }
        };

        match researcher.search(query, max_results).await {
            Ok(results) => Ok(serde_json::to_value(results)?),
            Err(e) => {
                warn!("An error occurred during data research: {}", e);
                Ok(Value::Null)
            }
        }
    }

    async fn execute_scrape(&self, results: &[SearchResult]) -> Result<Value> {
        let scraper = Scraper::new(&self.settings.scrape)?;

        Ok(match scraper.scrape(results).await {
            Some(articles) => Value::Array(
                articles
                    .iter()
                    .map(|a| Value::Object(a.to_record()))
                    .collect(),
            ),
            None => Value::Null,
        })
    }

    fn execute_save(
        &self,
        data: &[Record],
        filename: &str,
        save_format: &str,
        db_name: Option<&str>,
        table_name: &str,
    ) -> Result<Value> {
        let destination = Destination::new(
            self.settings.output_path(filename),
            self.resolve_db(db_name),
            table_name,
        );

        match persist(data, save_format, &destination) {
            outcome @ PersistOutcome::Failed {
                format: SaveFormat::Sqlite,
                ..
            } => Err(GleanerError::Tool(outcome.message())),
            outcome => {
                info!("{}", outcome.message());
                Ok(Value::String(outcome.message()))
            }
        }
    }

    fn execute_search_database(
        &self,
        query: &str,
        db_name: Option<&str>,
        table_name: &str,
    ) -> Result<Value> {
        let db_path = self.resolve_db(db_name);

        Ok(match find(query, &db_path, table_name) {
            Some(rows) => Value::Array(rows.into_iter().map(Value::Object).collect()),
            None => Value::Null,
        })
    }

    fn resolve_db(&self, db_name: Option<&str>) -> PathBuf {
        match db_name.map(str::trim).filter(|d| !d.is_empty()) {
            Some(db) => Settings::expand_path(db),
            None => self.settings.db_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context_in(dir: &std::path::Path) -> ToolContext {
        let mut settings = Settings::default();
        settings.storage.output_dir = dir.display().to_string();
        settings.storage.db_path = dir.join("education.db").display().to_string();
        settings.search.api_key_env = "GLEANER_TEST_UNSET_TOOLS_KEY".to_string();
        ToolContext::new(settings)
    }

    #[test]
    fn test_parse_research_defaults() {
        let tool =
            parse_tool_call("research_education_data", json!({ "query": "algebra" })).unwrap();
        match tool {
            ToolCall::ResearchEducationData { query, max_results } => {
                assert_eq!(query, "algebra");
                assert_eq!(max_results, 5);
            }
            _ => panic!("Expected ResearchEducationData tool"),
        }
    }

    #[test]
    fn test_parse_save_defaults() {
        let tool = parse_tool_call(
            "save_data",
            json!({ "data": [{ "title": "A" }], "filename": "lessons" }),
        )
        .unwrap();
        match tool {
            ToolCall::SaveData {
                save_format,
                db_name,
                table_name,
                ..
            } => {
                assert_eq!(save_format, "csv");
                assert!(db_name.is_none());
                assert_eq!(table_name, "articles");
            }
            _ => panic!("Expected SaveData tool"),
        }
    }

    #[test]
    fn test_parse_scrape_validates_urls() {
        let err = parse_tool_call(
            "scrape_and_structure_data",
            json!({ "search_results": [{ "title": "A", "url": "not a url", "content": "x" }] }),
        )
        .unwrap_err();
        assert!(matches!(err, GleanerError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = parse_tool_call("delete_everything", Value::Null).unwrap_err();
        assert!(err.to_string().contains("Unknown tool"));
    }

    #[test]
    fn test_definitions_cover_every_tool() {
        let names: Vec<_> = tool_definitions().into_iter().map(|t| t.name).collect();
        assert_eq!(names, TOOL_NAMES);
        let value = serde_json::to_value(&tool_definitions()[0]).unwrap();
        assert!(value.get("inputSchema").is_some());
    }

    #[tokio::test]
    async fn test_research_without_key_is_null() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());

        let result = ctx
            .call("research_education_data", json!({ "query": "algebra" }))
            .await
            .unwrap();
        assert!(result.is_null());
    }

    #[tokio::test]
    async fn test_research_returns_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {
                        "title": "Algebra",
                        "url": "https://example.com/algebra",
                        "content": "Basics",
                        "score": 0.9
                    }
                ]
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context_in(dir.path());
        ctx.settings.search.base_url = server.uri();
        ctx.settings.search.api_key = Some("test-key".to_string());

        let result = ctx
            .call("research_education_data", json!({ "query": "algebra", "max_results": 3 }))
            .await
            .unwrap();
        assert_eq!(result[0]["url"], "https://example.com/algebra");
        assert_eq!(result.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_and_search_database() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());
        let data = json!([
            { "url": "https://example.com/a", "title": "Algebra", "scraped_text": "x + y" },
            { "url": "https://example.com/b", "title": "Biology", "scraped_text": "cells" }
        ]);

        let saved = ctx
            .call(
                "save_data",
                json!({ "data": data, "filename": "ignored", "save_format": "sqlite" }),
            )
            .await
            .unwrap();
        assert!(saved.as_str().unwrap().starts_with("Saved 2 rows"));

        let found = ctx
            .call("search_database", json!({ "query": "alg" }))
            .await
            .unwrap();
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["title"], "Algebra");

        let missing = ctx
            .call(
                "search_database",
                json!({
                    "query": "alg",
                    "db_name": dir.path().join("other.db").display().to_string()
                }),
            )
            .await
            .unwrap();
        assert!(missing.is_null());
    }

    #[tokio::test]
    async fn test_save_csv_reports_message() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());

        let saved = ctx
            .call(
                "save_data",
                json!({ "data": [{ "title": "A" }], "filename": "lesson" }),
            )
            .await
            .unwrap();
        assert!(saved.as_str().unwrap().contains("lesson.csv"));
        assert!(dir.path().join("lesson.csv").exists());

        let skipped = ctx
            .call(
                "save_data",
                json!({ "data": [{ "title": "A" }], "filename": "lesson", "save_format": "xml" }),
            )
            .await
            .unwrap();
        assert!(skipped.as_str().unwrap().contains("Unsupported save format"));
    }

    #[tokio::test]
    async fn test_sqlite_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        let err = ctx
            .call(
                "save_data",
                json!({
                    "data": [{ "title": "A" }],
                    "filename": "x",
                    "save_format": "sqlite",
                    "db_name": blocker.join("db.sqlite").display().to_string()
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GleanerError::Tool(_)));
    }
}
