use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

use crate::fetch::PageFetcher;
use crate::import::validate_url;

/// Paths that usually hold a single recipe ("/cong-thuc/…", "/recipe/…", "/mon-an/…").
pub const DEFAULT_RECIPE_PATTERN: &str = r"/(cong-thuc|recipes?|mon-an)/[^/?#]+/?$";

/// Fetch a sitemap through the configured fetcher and return the URLs matching
/// `pattern`.
pub async fn discover_recipe_urls<F: PageFetcher>(
    fetcher: &F,
    sitemap_url: &str,
    pattern: &str,
) -> Result<Vec<String>> {
    let re = Regex::new(pattern).with_context(|| format!("Invalid pattern {}", pattern))?;
    let url = validate_url(sitemap_url)?;

    info!("Fetching sitemap: {}", url);
    let xml = fetcher
        .fetch(&url)
        .await
        .context("Failed to fetch sitemap")?;

    let all_urls = parse_urlset(&xml)?;
    info!("Total URLs in sitemap: {}", all_urls.len());

    let filtered: Vec<String> = all_urls.into_iter().filter(|u| re.is_match(u)).collect();
    info!("Recipe pages after filtering: {}", filtered.len());
    Ok(filtered)
}

/// Parse a urlset XML and return all <loc> URLs.
fn parse_urlset(xml: &str) -> Result<Vec<String>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut urls = Vec::new();
    let mut in_url = false;
    let mut in_loc = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(e)) => match e.local_name().as_ref() {
                b"url" => in_url = true,
                b"loc" if in_url => in_loc = true,
                _ => {}
            },
            Ok(quick_xml::events::Event::Text(e)) if in_loc => {
                let loc = e.unescape()?.trim().to_string();
                if !loc.is_empty() {
                    urls.push(loc);
                }
            }
            Ok(quick_xml::events::Event::End(e)) => match e.local_name().as_ref() {
                b"loc" => in_loc = false,
                b"url" => in_url = false,
                _ => {}
            },
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }
    Ok(urls)
}
