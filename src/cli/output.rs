//! CLI output formatting utilities.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a web search hit.
    pub fn search_result(title: &str, url: &str, score: Option<f64>, content: &str) {
        match score {
            Some(score) => println!(
                "\n{} {} (score: {:.2})",
                style(">>").green(),
                style(title).bold(),
                score
            ),
            None => println!("\n{} {}", style(">>").green(), style(title).bold()),
        }
        println!("   {}", content_preview(content, 200));
        println!("   {}", style(url).dim());
    }

    /// Print a stored article.
    pub fn article(title: &str, url: &str, text: &str) {
        println!("\n{} {}", style("*").cyan(), style(title).bold());
        println!("   {}", style(url).dim());
        println!("   {}", content_preview(text, 300));
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) =
            ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Single-line preview, cut at `max_chars` characters.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.split_whitespace().collect::<Vec<_>>().join(" ");
    match content.char_indices().nth(max_chars) {
        Some((index, _)) => format!("{}...", &content[..index]),
        None => content,
    }
}
