use super::ExtractMode;

pub const DEFAULT_RECIPE_CATEGORY: &str = "Món chính";
pub const DEFAULT_NEWS_CATEGORY: &str = "Sức khỏe";

type Taxonomy = &'static [(&'static str, &'static [&'static str])];

// Order matters: the first category with a keyword hit wins.
const RECIPE_CATEGORIES: Taxonomy = &[
    ("Món chay", &["chay", "đậu hũ", "đậu phụ", "vegan", "vegetarian"]),
    (
        "Tráng miệng",
        &["chè", "bánh flan", "kem", "tráng miệng", "pudding", "dessert", "cake"],
    ),
    (
        "Đồ uống",
        &["sinh tố", "nước ép", "trà sữa", "cà phê", "smoothie", "juice", "drink"],
    ),
    ("Món canh", &["canh", "súp", "lẩu", "soup"]),
    ("Ăn sáng", &["phở", "bún", "bánh mì", "xôi", "cháo", "breakfast"]),
];

const NEWS_CATEGORIES: Taxonomy = &[
    ("Giảm cân", &["giảm cân", "ăn kiêng", "giảm mỡ", "diet"]),
    (
        "Dinh dưỡng",
        &["dinh dưỡng", "vitamin", "protein", "calo", "nutrition"],
    ),
    ("Công thức", &["công thức", "cách làm", "cách nấu", "recipe"]),
    ("Mẹo vặt", &["mẹo", "bí quyết", "tips"]),
];

/// Keyword match over the lowercased title and summary text.
pub fn categorize(title: &str, summary: &str, mode: ExtractMode) -> String {
    let (taxonomy, default) = match mode {
        ExtractMode::Recipe => (RECIPE_CATEGORIES, DEFAULT_RECIPE_CATEGORY),
        ExtractMode::News => (NEWS_CATEGORIES, DEFAULT_NEWS_CATEGORY),
    };
    let haystack = format!("{} {}", title, summary).to_lowercase();

    taxonomy
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|(name, _)| *name)
        .unwrap_or(default)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_keywords() {
        assert_eq!(categorize("Chè đậu đỏ", "", ExtractMode::Recipe), "Tráng miệng");
        assert_eq!(categorize("Canh chua cá lóc", "", ExtractMode::Recipe), "Món canh");
        assert_eq!(
            categorize("Bò kho", "Món ăn sáng: bánh mì chấm bò kho", ExtractMode::Recipe),
            "Ăn sáng"
        );
    }

    #[test]
    fn order_breaks_ties() {
        // "chay" and "phở" both match; Món chay is listed first.
        assert_eq!(categorize("Phở chay", "", ExtractMode::Recipe), "Món chay");
    }

    #[test]
    fn uppercase_input() {
        assert_eq!(categorize("SINH TỐ BƠ", "", ExtractMode::Recipe), "Đồ uống");
    }

    #[test]
    fn defaults_per_mode() {
        assert_eq!(categorize("Gà rang gừng", "", ExtractMode::Recipe), "Món chính");
        assert_eq!(categorize("Ngủ đủ giấc", "", ExtractMode::News), "Sức khỏe");
    }

    #[test]
    fn news_keywords() {
        assert_eq!(
            categorize("5 cách giảm cân an toàn", "", ExtractMode::News),
            "Giảm cân"
        );
        assert_eq!(
            categorize("Bổ sung vitamin D", "mùa đông", ExtractMode::News),
            "Dinh dưỡng"
        );
    }
}
