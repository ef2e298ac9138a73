//! toc-navigator command line
//!
//! Opens a documentation page, reveals one entry of its table of contents and
//! prints the entry's documentation as markdown on stdout.

use anyhow::Context;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use toc_navigator::{BrowserSession, ConnectionOptions, LaunchOptions, Navigator, NavigatorConfig, TocTarget};

#[derive(Parser)]
#[command(name = "toc-navigator")]
#[command(version)]
#[command(about = "Reveal a documentation TOC entry and print its content", long_about = None)]
#[command(group(ArgGroup::new("target").required(true).multiple(true).args(["target_id", "target_text"])))]
struct Cli {
    /// Page that hosts the table of contents
    #[arg(long, value_name = "URL")]
    url: String,

    /// Identifier of the TOC entry
    #[arg(long, value_name = "ID")]
    target_id: Option<String>,

    /// Visible text of the TOC entry (substring match)
    #[arg(long, value_name = "TEXT")]
    target_text: Option<String>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    chrome_path: Option<PathBuf>,

    /// WebSocket endpoint URL of an already running browser
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// JSON file with selectors and timings
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the converted markdown without sanitizing it
    #[arg(long)]
    raw: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn target(&self) -> TocTarget {
        TocTarget {
            id: self.target_id.clone(),
            text: self.target_text.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = match &cli.config {
        Some(path) => NavigatorConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => NavigatorConfig::default(),
    };

    let session = match &cli.ws_endpoint {
        Some(endpoint) => {
            log::info!("Connecting to browser at {}", endpoint);
            BrowserSession::connect(ConnectionOptions::new(endpoint.clone()))?
        }
        None => {
            let mut options = LaunchOptions::new().headless(!cli.headed);
            if let Some(path) = &cli.chrome_path {
                options = options.chrome_path(path.clone());
            }
            if let Some(dir) = &cli.user_data_dir {
                options = options.user_data_dir(dir.clone());
            }
            BrowserSession::launch(options)?
        }
    };

    session.navigate(&cli.url)?;
    session
        .wait_for_element(&config.selectors.container, config.content_wait_timeout())
        .context("Table of contents did not appear")?;

    let target = cli.target();
    let mut navigator = Navigator::new(&session, config)?;
    let content = if cli.raw {
        navigator.open_raw(&target)?
    } else {
        navigator.open(&target)?
    };

    // Never exit directly: the session has to drop to close the browser
    let text = require_content(content, &target)?;
    println!("{}", text);
    Ok(())
}

fn require_content(content: Option<String>, target: &TocTarget) -> anyhow::Result<String> {
    content.ok_or_else(|| anyhow::anyhow!("No content found for {}", target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_requires_a_target() {
        assert!(Cli::try_parse_from(["toc-navigator", "--url", "https://example.com"]).is_err());

        let cli = Cli::try_parse_from(["toc-navigator", "--url", "https://example.com", "--target-text", "Create Volume"])
            .unwrap();
        assert_eq!(cli.target(), TocTarget::by_text("Create Volume"));
    }

    #[test]
    fn test_missing_content_is_an_error() {
        let target = TocTarget::by_id("vol-create");

        let err = require_content(None, &target).unwrap_err();
        assert_eq!(err.to_string(), "No content found for #vol-create");
        assert_eq!(require_content(Some("text".to_string()), &target).unwrap(), "text");
    }

    #[test]
    fn test_both_target_fields() {
        let cli = Cli::try_parse_from([
            "toc-navigator",
            "--url",
            "https://example.com",
            "--target-id",
            "vol-create",
            "--target-text",
            "Create Volume",
            "-H",
            "--raw",
        ])
        .unwrap();

        assert_eq!(cli.target(), TocTarget::new("vol-create", "Create Volume"));
        assert!(cli.headed);
        assert!(cli.raw);
    }
}
