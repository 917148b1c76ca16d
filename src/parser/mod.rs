pub mod cascade;
pub mod extract;

use scraper::Html;
use url::Url;

use extract::{ExtractMode, ExtractedData};

/// HTML text → lenient DOM → extracted fields. Malformed markup still yields a
/// document, so this never fails.
pub fn process_page(html: &str, url: &Url, mode: ExtractMode) -> ExtractedData {
    let doc = Html::parse_document(html);
    extract::extract_all(&doc, url, mode)
}
