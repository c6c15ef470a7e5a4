//! MCP (Model Context Protocol) server for Gleaner.
//!
//! Exposes the research, scrape, save and search tools to AI assistants.
//! Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;

pub use server::McpServer;
