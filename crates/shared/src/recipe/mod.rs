use std::collections::HashMap;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::{RecipeCatalog, Result};

/// Shopping aisle an ingredient is filed under.
#[derive(
    Serialize,
    Deserialize,
    EnumString,
    VariantArray,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    Meat,
    Vegetables,
    Dairy,
    Grains,
    Condiments,
    #[default]
    Other,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub amount: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Nutrition {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

/// Each field saturates at `u32::MAX`.
impl Add for Nutrition {
    type Output = Nutrition;

    fn add(self, rhs: Self) -> Self::Output {
        Nutrition {
            calories: self.calories.saturating_add(rhs.calories),
            protein: self.protein.saturating_add(rhs.protein),
            carbs: self.carbs.saturating_add(rhs.carbs),
            fat: self.fat.saturating_add(rhs.fat),
        }
    }
}

impl AddAssign for Nutrition {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub nutrition: Nutrition,
}

impl RecipeDetail {
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            title: self.title.to_owned(),
            image_url: self.image_url.to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchFilters {
    pub max_results: usize,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self { max_results: 12 }
    }
}

/// Recipe details already fetched for the current view, keyed by recipe id.
#[derive(Clone, Debug, Default)]
pub struct RecipeBook {
    recipes: HashMap<u64, RecipeDetail>,
}

impl RecipeBook {
    pub fn new(recipes: impl IntoIterator<Item = RecipeDetail>) -> Self {
        Self {
            recipes: recipes.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let recipes: Vec<RecipeDetail> = serde_json::from_str(json)?;

        Ok(Self::new(recipes))
    }

    pub fn insert(&mut self, recipe: RecipeDetail) {
        self.recipes.insert(recipe.id, recipe);
    }

    pub fn get(&self, id: u64) -> Option<&RecipeDetail> {
        self.recipes.get(&id)
    }

    pub fn ingredients(&self, id: u64) -> &[Ingredient] {
        self.get(id).map(|r| r.ingredients.as_slice()).unwrap_or_default()
    }

    pub fn nutrition(&self, id: u64) -> Nutrition {
        self.get(id).map(|r| r.nutrition).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[async_trait::async_trait]
impl RecipeCatalog for RecipeBook {
    async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<RecipeSummary>> {
        let query = query.trim().to_lowercase();
        let mut found = self
            .recipes
            .values()
            .filter(|r| r.title.to_lowercase().contains(&query))
            .map(RecipeDetail::summary)
            .collect::<Vec<_>>();

        found.sort_by_key(|r| r.id);
        found.truncate(filters.max_results);

        Ok(found)
    }

    async fn details(&self, id: u64) -> Result<Option<RecipeDetail>> {
        Ok(self.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pasta() -> RecipeDetail {
        RecipeDetail {
            id: 42,
            title: "Pasta".to_owned(),
            image_url: String::new(),
            ingredients: vec![Ingredient {
                name: "Tomato".to_owned(),
                category: Some(Category::Vegetables),
                amount: "2".to_owned(),
            }],
            instructions: String::new(),
            nutrition: Nutrition {
                calories: 500,
                protein: 20,
                carbs: 80,
                fat: 10,
            },
        }
    }

    #[test]
    fn test_book_from_json() {
        let book = RecipeBook::from_json(
            r#"[{"id": 7, "title": "Soup", "ingredients": [{"name": "Leek", "category": "Vegetables", "amount": "1"}]}]"#,
        )
        .unwrap();

        assert_eq!(book.len(), 1);
        assert_eq!(book.ingredients(7)[0].category, Some(Category::Vegetables));
        assert_eq!(book.nutrition(7), Nutrition::default());
        assert!(book.ingredients(8).is_empty());
    }

    #[tokio::test]
    async fn test_book_search_is_case_insensitive() {
        let book = RecipeBook::new([pasta()]);

        let found = book.search("PAST", &SearchFilters::default()).await.unwrap();
        assert_eq!(found, vec![pasta().summary()]);

        let none = book.search("curry", &SearchFilters::default()).await.unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_nutrition_sum() {
        let mut total = Nutrition::default();
        total += pasta().nutrition;
        total += pasta().nutrition;

        assert_eq!(total.calories, 1000);
        assert_eq!(total.fat, 20);
    }

    #[test]
    fn test_nutrition_sum_saturates() {
        let book = RecipeBook::from_json(
            r#"[{"id": 1, "title": "Feast", "nutrition": {"calories": 4000000000, "protein": 1, "carbs": 2, "fat": 3}}]"#,
        )
        .unwrap();

        let mut total = Nutrition::default();
        total += book.nutrition(1);
        total += book.nutrition(1);

        assert_eq!(total.calories, u32::MAX);
        assert_eq!(total.protein, 2);
        assert_eq!(total.fat, 6);
    }
}
