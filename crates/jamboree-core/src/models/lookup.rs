use serde::{Deserialize, Serialize};

use super::Collection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Collection for Group {
    const PATH: &'static str = "/api/groups";
    const LABEL: &'static str = "groups";
    type Query = ();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Collection for Category {
    const PATH: &'static str = "/api/categories";
    const LABEL: &'static str = "categories";
    type Query = ();
}

/// Categories offered as item choices: active only, by sort order then name.
pub fn active_categories(categories: &[Category]) -> Vec<&Category> {
    let mut active: Vec<&Category> = categories.iter().filter(|c| c.is_active).collect();
    active.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
    active
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, name: &str, sort_order: i32, is_active: bool) -> Category {
        Category { id, name: name.to_string(), sort_order, is_active }
    }

    #[test]
    fn test_active_categories_sorted_and_filtered() {
        let categories = vec![
            category(1, "Tents", 2, true),
            category(2, "Cooking", 1, true),
            category(3, "Retired", 0, false),
            category(4, "Bedding", 2, true),
        ];

        let names: Vec<&str> = active_categories(&categories).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Cooking", "Bedding", "Tents"]);
    }

    #[test]
    fn test_category_defaults_when_fields_missing() {
        let parsed: Category = serde_json::from_str(r#"{"id": 5, "name": "Lighting"}"#).unwrap();
        assert_eq!(parsed.sort_order, 0);
        assert!(parsed.is_active);
    }
}
