use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::parser::cascade::{first_text, sel};

static CLASS_AUTHOR: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"author\"]"));
static REL_AUTHOR: LazyLock<Selector> = LazyLock::new(|| sel("[rel=\"author\"]"));
static BYLINE: LazyLock<Selector> = LazyLock::new(|| sel(".byline"));
static CLASS_WRITER: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"writer\"]"));

pub fn author(doc: &Html) -> Option<String> {
    first_text(doc, &[&CLASS_AUTHOR, &REL_AUTHOR, &BYLINE, &CLASS_WRITER])
}
