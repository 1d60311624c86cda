use anyhow::{bail, Context, Result};
use std::env;
use std::fs;

use price_watch::session::{Request, Session, TracingPresenter};
use price_watch::{Dispatcher, Page};

/// Runs extraction over a saved page and prints the popup message.
///
/// Usage: extract_page <html-file> <page-url> [--detect]
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("price_watch=debug".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let detect = args.iter().any(|arg| arg == "--detect");
    let positional: Vec<&String> = args.iter().filter(|arg| !arg.starts_with("--")).collect();

    let (html_path, page_url) = match positional.as_slice() {
        [html_path, page_url] => (html_path.as_str(), page_url.as_str()),
        _ => bail!("usage: extract_page <html-file> <page-url> [--detect]"),
    };

    let html = fs::read_to_string(html_path)
        .with_context(|| format!("Failed to read {}", html_path))?;
    let page = Page::parse(&html, page_url)?;

    let session = Session::new(Dispatcher::default(), TracingPresenter);
    let request = if detect {
        Request::DetectOnNavigation
    } else {
        Request::ExtractNow
    };

    let response = session.handle(0, request, &page);
    println!("{}", serde_json::to_string_pretty(&response.to_message())?);

    Ok(())
}
