//! Darklens CLI
//!
//! Scan a web page for dark patterns from the command line and optionally
//! highlight what was found in a visible browser window.

use clap::Parser;
use darklens::browser::{BrowserSession, LaunchOptions};
use darklens::classify::GeminiClassifier;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "darklens")]
#[command(version)]
#[command(about = "Scan a web page for dark patterns", long_about = None)]
struct Cli {
    /// URL of the page to scan
    url: String,

    /// Launch the browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Gemini API key (default: read from GEMINI_API_KEY)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Gemini model to use
    #[arg(long, value_name = "MODEL")]
    model: Option<String>,

    /// Highlight the detected patterns on the page
    #[arg(long)]
    highlight: bool,

    /// Keep the browser open for N seconds after highlighting
    /// (only useful together with --headed)
    #[arg(long, value_name = "SECONDS", default_value = "0")]
    hold: u64,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut classifier = match cli.api_key {
        Some(key) => GeminiClassifier::new(key)?,
        None => GeminiClassifier::from_env()?,
    };
    if let Some(model) = cli.model {
        classifier = classifier.with_model(model);
    }

    let mut options = LaunchOptions::new().headless(!cli.headed);
    if let Some(ref path) = cli.executable_path {
        options = options.chrome_path(path);
    }

    let session = BrowserSession::launch(options)?;
    session.navigate(&cli.url)?;
    session.wait_for_navigation()?;

    let report = darklens::scan_page(&session, &classifier).await?;

    if report.is_empty() {
        println!("No dark patterns detected on {}", report.page_url);
    } else {
        println!("Detected {} dark patterns on {}:\n", report.patterns.len(), report.page_url);
        for (index, pattern) in report.patterns.iter().enumerate() {
            println!("{}. [{}] \"{}\"", index + 1, pattern.pattern_type, pattern.text);
            println!("   {}\n", pattern.description);
        }
    }

    if cli.highlight && !report.is_empty() {
        let result = session.execute_tool(
            "add_all_highlights",
            serde_json::json!({ "patterns": report.patterns }),
        )?;
        if let Some(data) = result.data {
            println!("Highlighted {} of {} patterns on the page", data["highlighted"], data["total"]);
        }

        if cli.hold > 0 {
            println!("Holding the browser open for {} seconds...", cli.hold);
            tokio::time::sleep(Duration::from_secs(cli.hold)).await;
        }
    }

    session.close()?;
    Ok(())
}
