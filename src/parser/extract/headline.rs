use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::parser::cascade::{first_attr, first_text, sel, text_of};

pub const TITLE_PLACEHOLDER: &str = "Không có tiêu đề";
const CONTENT_MAX_CHARS: usize = 2000;
const MIN_PARAGRAPH_CHARS: usize = 50;

static H1: LazyLock<Selector> = LazyLock::new(|| sel("h1"));
static CLASS_TITLE: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"title\"]"));
static CLASS_HEADING: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"heading\"]"));
static DOC_TITLE: LazyLock<Selector> = LazyLock::new(|| sel("title"));

static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| sel("meta[name=\"description\"]"));

static CLASS_CONTENT: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"content\"]"));
static CLASS_ARTICLE: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"article\"]"));
static CLASS_POST: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"post\"]"));
static MAIN_P: LazyLock<Selector> = LazyLock::new(|| sel("main p"));
static ENTRY_CONTENT: LazyLock<Selector> = LazyLock::new(|| sel(".entry-content"));
static ARTICLE: LazyLock<Selector> = LazyLock::new(|| sel("article"));
static P: LazyLock<Selector> = LazyLock::new(|| sel("p"));

pub fn title(doc: &Html) -> Option<String> {
    first_text(doc, &[&H1, &CLASS_TITLE, &CLASS_HEADING, &DOC_TITLE])
}

/// Recipe summary: the description meta tag and nothing else.
pub fn description(doc: &Html) -> Option<String> {
    first_attr(doc, &[&META_DESCRIPTION], "content")
}

/// Article body, capped at 2000 characters. Without a body-like container the
/// long paragraphs of the page are stitched together instead.
pub fn content(doc: &Html) -> Option<String> {
    let rules: [&Selector; 6] = [
        &CLASS_CONTENT,
        &CLASS_ARTICLE,
        &CLASS_POST,
        &MAIN_P,
        &ENTRY_CONTENT,
        &ARTICLE,
    ];
    if let Some(text) = first_text(doc, &rules) {
        return Some(text.chars().take(CONTENT_MAX_CHARS).collect());
    }

    let paragraphs: Vec<String> = doc
        .select(&P)
        .map(text_of)
        .filter(|t| t.chars().count() > MIN_PARAGRAPH_CHARS)
        .collect();
    if paragraphs.is_empty() {
        None
    } else {
        Some(paragraphs.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h1_wins() {
        let doc = Html::parse_document(
            "<title>Trang chủ</title><div class='post-title'>Khác</div><h1>Tên món</h1>",
        );
        assert_eq!(title(&doc).as_deref(), Some("Tên món"));
    }

    #[test]
    fn falls_back_to_document_title() {
        let doc = Html::parse_document("<html><head><title> Bún chả Hà Nội </title></head></html>");
        assert_eq!(title(&doc).as_deref(), Some("Bún chả Hà Nội"));
    }

    #[test]
    fn heading_class_before_document_title() {
        let doc = Html::parse_document(
            "<title>Site</title><body><span class='recipe-heading'>Gỏi cuốn</span></body>",
        );
        assert_eq!(title(&doc).as_deref(), Some("Gỏi cuốn"));
    }

    #[test]
    fn description_from_meta_only() {
        let doc = Html::parse_document(
            "<head><meta name='description' content='Món ngon mỗi ngày'></head>\
             <body><p class='description'>không dùng</p></body>",
        );
        assert_eq!(description(&doc).as_deref(), Some("Món ngon mỗi ngày"));
    }

    #[test]
    fn content_truncated() {
        let body = "a".repeat(2500);
        let doc = Html::parse_document(&format!("<div class='post-content'>{}</div>", body));
        assert_eq!(content(&doc).unwrap().chars().count(), 2000);
    }

    #[test]
    fn content_paragraph_fallback() {
        let long1 = "Rau xanh cung cấp nhiều chất xơ và vitamin cần thiết cho cơ thể mỗi ngày.";
        let long2 = "Uống đủ nước giúp quá trình trao đổi chất diễn ra hiệu quả hơn rất nhiều.";
        let doc = Html::parse_document(&format!(
            "<body><div><p>Ngắn</p><p>{}</p><p>{}</p></div></body>",
            long1, long2
        ));
        assert_eq!(content(&doc).unwrap(), format!("{}\n\n{}", long1, long2));
    }

    #[test]
    fn no_content_at_all() {
        let doc = Html::parse_document("<body><p>Ngắn</p></body>");
        assert!(content(&doc).is_none());
    }
}
