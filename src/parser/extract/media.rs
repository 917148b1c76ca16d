use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use crate::parser::cascade::{first_attr, sel};

static OG_IMAGE: LazyLock<Selector> = LazyLock::new(|| sel("meta[property=\"og:image\"]"));
static FEATURED_IMG: LazyLock<Selector> =
    LazyLock::new(|| sel("[class*=\"featured\"] img, [class*=\"hero\"] img"));
static IMG: LazyLock<Selector> = LazyLock::new(|| sel("img"));

/// Representative image, resolved to an absolute URL against `base`.
pub fn image(doc: &Html, base: &Url) -> Option<String> {
    let raw = first_attr(doc, &[&OG_IMAGE], "content")
        .or_else(|| first_attr(doc, &[&FEATURED_IMG], "src"))
        .or_else(|| first_content_img(doc))?;
    Some(resolve(base, &raw))
}

/// First `<img>` that is not obviously a logo or an icon.
fn first_content_img(doc: &Html) -> Option<String> {
    doc.select(&IMG)
        .filter_map(|el| el.value().attr("src"))
        .map(str::trim)
        .find(|src| {
            let lower = src.to_lowercase();
            !src.is_empty() && !lower.contains("logo") && !lower.contains("icon")
        })
        .map(str::to_string)
}

fn resolve(base: &Url, raw: &str) -> String {
    base.join(raw)
        .map(String::from)
        .unwrap_or_else(|_| raw.to_string())
}
