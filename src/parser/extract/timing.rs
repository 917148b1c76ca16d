use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::parser::cascade::{first_matching_text, sel};

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s*(phút|giờ|minute|hour)").unwrap());
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

static CLASS_TIME: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"time\"]"));
static CLASS_DURATION: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"duration\"]"));
static CLASS_PREP: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"prep\"]"));
static CLASS_COOK: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"cook\"]"));

static CLASS_SERVING: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"serving\"]"));
static CLASS_PORTION: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"portion\"]"));
static CLASS_YIELD: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"yield\"]"));

/// Free-text duration such as "45 phút" or "1 hour 20 minutes". Only text that
/// names a number and a time unit is accepted.
pub fn cooking_time(doc: &Html) -> Option<String> {
    first_matching_text(
        doc,
        &[&CLASS_TIME, &CLASS_DURATION, &CLASS_PREP, &CLASS_COOK],
        |t| DURATION_RE.is_match(t),
    )
}

/// First number in the first serving-like element that has one.
pub fn servings(doc: &Html) -> Option<u32> {
    let text = first_matching_text(
        doc,
        &[&CLASS_SERVING, &CLASS_PORTION, &CLASS_YIELD],
        |t| first_number(t).is_some(),
    )?;
    first_number(&text)
}

fn first_number(text: &str) -> Option<u32> {
    NUMBER_RE.find(text)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vietnamese_minutes() {
        let doc = Html::parse_document("<span class='cook-time'>Thời gian: 45 phút</span>");
        assert_eq!(cooking_time(&doc).as_deref(), Some("Thời gian: 45 phút"));
    }

    #[test]
    fn unit_is_case_insensitive() {
        let doc = Html::parse_document("<div class='total-duration'>1 Hour 15 Minutes</div>");
        assert_eq!(cooking_time(&doc).as_deref(), Some("1 Hour 15 Minutes"));
    }

    #[test]
    fn rejects_text_without_duration() {
        let doc = Html::parse_document(
            "<time class='post-time'>12/05/2024</time><span class='prep'>20 phút</span>",
        );
        assert_eq!(cooking_time(&doc).as_deref(), Some("20 phút"));
    }

    #[test]
    fn no_cooking_time() {
        let doc = Html::parse_document("<span class='cook'>Dễ làm</span>");
        assert!(cooking_time(&doc).is_none());
    }

    #[test]
    fn servings_first_number() {
        let doc = Html::parse_document(
            "<div class='servings'>Khẩu phần</div><div class='recipe-servings'>4-6 người</div>",
        );
        assert_eq!(servings(&doc), Some(4));
    }

    #[test]
    fn yield_fallback() {
        let doc = Html::parse_document("<p class='recipe-yield'>Makes 12 rolls</p>");
        assert_eq!(servings(&doc), Some(12));
    }

    #[test]
    fn no_servings() {
        let doc = Html::parse_document("<p>Cho cả nhà</p>");
        assert_eq!(servings(&doc), None);
    }
}
