use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::parser::cascade::{first_list, sel, ListRule};

const MIN_INGREDIENT_CHARS: usize = 4;
const MIN_STEP_LINE_CHARS: usize = 10;

static CLASS_INGREDIENT: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"ingredient\"]"));
static RECIPE_INGREDIENTS_LI: LazyLock<Selector> =
    LazyLock::new(|| sel(".recipe-ingredients li"));
static INGREDIENTS_LI: LazyLock<Selector> = LazyLock::new(|| sel(".ingredients li"));
static UL_LI: LazyLock<Selector> = LazyLock::new(|| sel("ul li"));

static CLASS_INSTRUCTION: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"instruction\"]"));
static CLASS_METHOD: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"method\"]"));
static CLASS_STEP: LazyLock<Selector> = LazyLock::new(|| sel("[class*=\"step\"]"));
static RECIPE_DIRECTIONS_LI: LazyLock<Selector> =
    LazyLock::new(|| sel(".recipe-directions li"));
static OL_LI: LazyLock<Selector> = LazyLock::new(|| sel("ol li"));

/// `- item` lines joined with `\n`. Items shorter than 4 characters are noise.
pub fn ingredients(doc: &Html) -> Option<String> {
    let items = first_list(
        doc,
        &[
            ListRule::Class(&CLASS_INGREDIENT),
            ListRule::Items(&RECIPE_INGREDIENTS_LI),
            ListRule::Items(&INGREDIENTS_LI),
            ListRule::Items(&UL_LI),
        ],
    );
    let lines: Vec<String> = items
        .iter()
        .filter(|t| t.chars().count() >= MIN_INGREDIENT_CHARS)
        .map(|t| format!("- {}", t))
        .collect();
    non_empty(lines.join("\n"))
}

/// `Bước N: step` paragraphs. Numbering follows the matched elements, so a
/// dropped short line leaves a gap rather than renumbering.
pub fn instructions(doc: &Html) -> Option<String> {
    let items = first_list(
        doc,
        &[
            ListRule::Class(&CLASS_INSTRUCTION),
            ListRule::Class(&CLASS_METHOD),
            ListRule::Class(&CLASS_STEP),
            ListRule::Items(&RECIPE_DIRECTIONS_LI),
            ListRule::Items(&OL_LI),
        ],
    );
    let lines: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, t)| format!("Bước {}: {}", i + 1, t))
        .filter(|line| line.chars().count() >= MIN_STEP_LINE_CHARS)
        .collect();
    non_empty(lines.join("\n\n"))
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingredients_in_source_order() {
        let doc = Html::parse_document(
            "<div class='ingredients'><ul>\
             <li>500g bánh phở</li><li>300g thịt bò</li><li>2 củ hành tây</li>\
             </ul></div>",
        );
        assert_eq!(
            ingredients(&doc).as_deref(),
            Some("- 500g bánh phở\n- 300g thịt bò\n- 2 củ hành tây")
        );
    }

    #[test]
    fn short_ingredients_dropped() {
        let doc = Html::parse_document(
            "<ul class='recipe-ingredients'><li>Muối</li><li>x</li><li>Tiêu</li></ul>",
        );
        assert_eq!(ingredients(&doc).as_deref(), Some("- Muối\n- Tiêu"));
    }

    #[test]
    fn ingredient_classed_items_first() {
        let doc = Html::parse_document(
            "<ul><li>Trang chủ</li></ul>\
             <p class='ingredient-line'>1 thìa nước mắm</p>\
             <p class='ingredient-line'>2 thìa đường</p>",
        );
        assert_eq!(
            ingredients(&doc).as_deref(),
            Some("- 1 thìa nước mắm\n- 2 thìa đường")
        );
    }

    #[test]
    fn classed_container_beats_page_menus() {
        let doc = Html::parse_document(
            "<nav><ul><li>Trang chủ</li><li>Công thức</li></ul></nav>\
             <div class='ingredient-box'><ul><li>500g thịt bò</li><li>1 củ hành</li></ul></div>\
             <footer><ol><li>Liên hệ với chúng tôi</li></ol></footer>\
             <div class='instructions-wrap'><ol>\
             <li>Rửa sạch thịt bò</li><li>Thái hành thật mỏng</li>\
             </ol></div>",
        );
        assert_eq!(
            ingredients(&doc).as_deref(),
            Some("- 500g thịt bò\n- 1 củ hành")
        );
        assert_eq!(
            instructions(&doc).as_deref(),
            Some("Bước 1: Rửa sạch thịt bò\n\nBước 2: Thái hành thật mỏng")
        );
    }

    #[test]
    fn plain_list_fallback() {
        let doc = Html::parse_document("<ul><li>Gạo nếp</li><li>Đậu xanh</li></ul>");
        assert_eq!(ingredients(&doc).as_deref(), Some("- Gạo nếp\n- Đậu xanh"));
    }

    #[test]
    fn steps_numbered() {
        let doc = Html::parse_document(
            "<ol class='instructions'>\
             <li>Rửa sạch thịt bò</li><li>Nướng hành và gừng</li>\
             </ol>",
        );
        assert_eq!(
            instructions(&doc).as_deref(),
            Some("Bước 1: Rửa sạch thịt bò\n\nBước 2: Nướng hành và gừng")
        );
    }

    #[test]
    fn step_numbering_keeps_gaps() {
        let doc = Html::parse_document(
            "<div class='step'>Luộc xương</div><div class='step'>A</div><div class='step'>Nêm nếm</div>",
        );
        assert_eq!(
            instructions(&doc).as_deref(),
            Some("Bước 1: Luộc xương\n\nBước 3: Nêm nếm")
        );
    }

    #[test]
    fn no_lists() {
        let doc = Html::parse_document("<p>Không có gì</p>");
        assert!(ingredients(&doc).is_none());
        assert!(instructions(&doc).is_none());
    }
}
