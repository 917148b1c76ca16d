pub mod byline;
pub mod category;
pub mod headline;
pub mod lists;
pub mod media;
pub mod timing;

use clap::ValueEnum;
use scraper::Html;
use serde::Serialize;
use tracing::debug;
use url::Url;

pub use headline::TITLE_PLACEHOLDER;

/// What kind of page is being imported. Decides which fields are extracted and
/// which category taxonomy applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    #[default]
    Recipe,
    News,
}

impl ExtractMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractMode::Recipe => "recipe",
            ExtractMode::News => "news",
        }
    }
}

/// Best-effort record pulled out of one page. Every field may be a default; a
/// missing field and an empty one look the same here.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedData {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub image: String,
    pub author: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Run every field cascade over a parsed page. Never fails.
pub fn extract_all(doc: &Html, base: &Url, mode: ExtractMode) -> ExtractedData {
    let title = or_default(headline::title(doc), "title", base)
        .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string());
    let image = or_default(media::image(doc, base), "image", base).unwrap_or_default();
    let author = or_default(byline::author(doc), "author", base).unwrap_or_default();

    match mode {
        ExtractMode::Recipe => {
            let description =
                or_default(headline::description(doc), "description", base).unwrap_or_default();
            let category = category::categorize(&title, &description, mode);
            ExtractedData {
                title,
                description: Some(description),
                content: None,
                image,
                author,
                category,
                cooking_time: Some(
                    or_default(timing::cooking_time(doc), "cookingTime", base).unwrap_or_default(),
                ),
                servings: Some(or_default(timing::servings(doc), "servings", base).unwrap_or(0)),
                ingredients: Some(
                    or_default(lists::ingredients(doc), "ingredients", base).unwrap_or_default(),
                ),
                instructions: Some(
                    or_default(lists::instructions(doc), "instructions", base).unwrap_or_default(),
                ),
            }
        }
        ExtractMode::News => {
            let content = or_default(headline::content(doc), "content", base).unwrap_or_default();
            let category = category::categorize(&title, &content, mode);
            ExtractedData {
                title,
                description: None,
                content: Some(content),
                image,
                author,
                category,
                cooking_time: None,
                servings: None,
                ingredients: None,
                instructions: None,
            }
        }
    }
}

fn or_default<T>(found: Option<T>, field: &str, base: &Url) -> Option<T> {
    if found.is_none() {
        debug!(field, url = %base, "no match, using default");
    }
    found
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(fixture: &str) -> Html {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", fixture)).unwrap();
        Html::parse_document(&html)
    }

    fn base() -> Url {
        Url::parse("https://monngon.test/cong-thuc/pho-bo").unwrap()
    }

    #[test]
    fn pho_bo_recipe() {
        let doc = parse("pho_bo");
        let d = extract_all(&doc, &base(), ExtractMode::Recipe);
        assert_eq!(d.title, "Phở bò Hà Nội");
        assert_eq!(
            d.description.as_deref(),
            Some("Cách nấu phở bò Hà Nội nước dùng trong, thơm mùi quế hồi.")
        );
        assert_eq!(d.image, "https://monngon.test/images/pho-bo.jpg");
        assert_eq!(d.author, "Bếp Nhà Lan");
        assert_eq!(d.cooking_time.as_deref(), Some("3 giờ"));
        assert_eq!(d.servings, Some(4));
        assert_eq!(
            d.ingredients.as_deref(),
            Some("- 500g bánh phở\n- 300g thịt bò thăn\n- 1kg xương ống\n- 1 củ gừng, 2 củ hành tím")
        );
        let steps = d.instructions.unwrap();
        assert!(steps.starts_with("Bước 1: Chần xương"));
        assert_eq!(steps.split("\n\n").count(), 3);
        assert_eq!(d.category, "Ăn sáng");
        assert!(d.content.is_none());
    }

    #[test]
    fn news_article() {
        let doc = parse("news_article");
        let d = extract_all(&doc, &base(), ExtractMode::News);
        assert_eq!(d.title, "Ăn sáng đủ chất giúp giảm cân hiệu quả");
        assert_eq!(d.author, "Minh Anh");
        assert_eq!(d.category, "Giảm cân");
        assert_eq!(d.image, "https://monngon.test/uploads/bua-sang.jpg");
        assert!(d.content.unwrap().starts_with("Bữa sáng là bữa ăn quan trọng"));
        assert!(d.description.is_none());
        assert!(d.ingredients.is_none());
        assert!(d.servings.is_none());
    }

    #[test]
    fn single_h1() {
        let doc = Html::parse_document("<html><body><h1>Tên món</h1></body></html>");
        let d = extract_all(&doc, &base(), ExtractMode::Recipe);
        assert_eq!(d.title, "Tên món");
    }

    #[test]
    fn empty_body_defaults() {
        let doc = Html::parse_document("<html><head></head><body></body></html>");
        let d = extract_all(&doc, &base(), ExtractMode::Recipe);
        assert_eq!(d.title, TITLE_PLACEHOLDER);
        assert_eq!(d.image, "");
        assert_eq!(d.author, "");
        assert_eq!(d.description.as_deref(), Some(""));
        assert_eq!(d.cooking_time.as_deref(), Some(""));
        assert_eq!(d.servings, Some(0));
        assert_eq!(d.ingredients.as_deref(), Some(""));
        assert_eq!(d.instructions.as_deref(), Some(""));
        assert_eq!(d.category, category::DEFAULT_RECIPE_CATEGORY);

        let news = extract_all(&doc, &base(), ExtractMode::News);
        assert_eq!(news.content.as_deref(), Some(""));
        assert_eq!(news.category, category::DEFAULT_NEWS_CATEGORY);
    }

    #[test]
    fn deterministic() {
        let doc = parse("pho_bo");
        let a = extract_all(&doc, &base(), ExtractMode::Recipe);
        let b = extract_all(&Html::parse_document(&doc.html()), &base(), ExtractMode::Recipe);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&extract_all(&doc, &base(), ExtractMode::Recipe)).unwrap()
        );
    }

    #[test]
    fn camel_case_json() {
        let doc = parse("pho_bo");
        let json = serde_json::to_value(extract_all(&doc, &base(), ExtractMode::Recipe)).unwrap();
        assert_eq!(json["cookingTime"], "3 giờ");
        assert_eq!(json["servings"], 4);
        assert!(json.get("content").is_none());
    }
}
