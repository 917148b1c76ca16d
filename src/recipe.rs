use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::parser::extract::ExtractedData;

pub const DEFAULT_COOKING_TIME: &str = "30 phút";
pub const DEFAULT_SERVINGS: u32 = 2;

static STEP_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Bước \d+:\s*").unwrap());

/// An imported recipe as it goes into the edit form: form defaults filled in,
/// list fields split back into items.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    pub image: String,
    pub author: String,
    pub category: String,
    pub cooking_time: String,
    pub servings: u32,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

impl RecipeDraft {
    pub fn from_extracted(data: &ExtractedData) -> Self {
        let cooking_time = data
            .cooking_time
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_COOKING_TIME.to_string());
        let servings = data
            .servings
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_SERVINGS);

        let ingredients = data
            .ingredients
            .as_deref()
            .unwrap_or("")
            .lines()
            .map(|l| l.trim_start_matches("- ").trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        let steps = data
            .instructions
            .as_deref()
            .unwrap_or("")
            .split("\n\n")
            .map(|s| STEP_PREFIX_RE.replace(s.trim(), "").to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            title: data.title.clone(),
            description: data
                .description
                .clone()
                .or_else(|| data.content.clone())
                .unwrap_or_default(),
            image: data.image.clone(),
            author: data.author.clone(),
            category: data.category.clone(),
            cooking_time,
            servings,
            ingredients,
            steps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingItem {
    pub item: String,
    pub count: usize,
    pub recipes: Vec<String>,
}

/// Merge ingredient lines across recipes. Lines that differ only in case or
/// spacing are the same item; order is first appearance.
pub fn shopping_list(drafts: &[RecipeDraft]) -> Vec<ShoppingItem> {
    let mut items: Vec<(String, ShoppingItem)> = Vec::new();

    for draft in drafts {
        for line in &draft.ingredients {
            let key = line.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
            match items.iter_mut().find(|(k, _)| *k == key) {
                Some((_, existing)) => {
                    existing.count += 1;
                    if !existing.recipes.contains(&draft.title) {
                        existing.recipes.push(draft.title.clone());
                    }
                }
                None => items.push((
                    key,
                    ShoppingItem {
                        item: line.clone(),
                        count: 1,
                        recipes: vec![draft.title.clone()],
                    },
                )),
            }
        }
    }

    items.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(title: &str, ingredients: &str) -> ExtractedData {
        ExtractedData {
            title: title.into(),
            description: Some(String::new()),
            content: None,
            image: String::new(),
            author: String::new(),
            category: "Món chính".into(),
            cooking_time: Some(String::new()),
            servings: Some(0),
            ingredients: Some(ingredients.into()),
            instructions: Some("Bước 1: Sơ chế rau\n\nBước 3: Xào chín".into()),
        }
    }

    #[test]
    fn form_defaults_applied() {
        let d = RecipeDraft::from_extracted(&extracted("Rau muống xào tỏi", "- 1 bó rau muống"));
        assert_eq!(d.cooking_time, DEFAULT_COOKING_TIME);
        assert_eq!(d.servings, DEFAULT_SERVINGS);
    }

    #[test]
    fn extracted_values_kept() {
        let mut e = extracted("Cá kho tộ", "");
        e.cooking_time = Some("1 giờ".into());
        e.servings = Some(5);
        let d = RecipeDraft::from_extracted(&e);
        assert_eq!(d.cooking_time, "1 giờ");
        assert_eq!(d.servings, 5);
        assert!(d.ingredients.is_empty());
    }

    #[test]
    fn lists_split_back() {
        let d = RecipeDraft::from_extracted(&extracted(
            "Rau muống xào tỏi",
            "- 1 bó rau muống\n- 3 tép tỏi",
        ));
        assert_eq!(d.ingredients, vec!["1 bó rau muống", "3 tép tỏi"]);
        assert_eq!(d.steps, vec!["Sơ chế rau", "Xào chín"]);
    }

    #[test]
    fn shopping_list_merges_duplicates() {
        let a = RecipeDraft::from_extracted(&extracted("Canh chua", "- 2 quả cà chua\n- 1 quả dứa"));
        let b = RecipeDraft::from_extracted(&extracted("Trứng xào", "- 2 Quả  cà chua\n- 3 quả trứng"));
        let list = shopping_list(&[a, b]);
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].item, "2 quả cà chua");
        assert_eq!(list[0].count, 2);
        assert_eq!(list[0].recipes, vec!["Canh chua", "Trứng xào"]);
        assert_eq!(list[2].item, "3 quả trứng");
    }
}
