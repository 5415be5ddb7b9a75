use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;

use serde::Serialize;

use mealdeck_mealplan::WeeklyPlan;
use mealdeck_shared::recipe::{Category, RecipeBook};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemSource {
    MealPlan,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    /// Display amount, never summed across recipes.
    pub amount: String,
    /// Number of ingredient records merged into this item.
    pub count: u32,
    pub source: ItemSource,
    pub checked: bool,
}

/// Lowercase trimmed ingredient name, the dedup key of generated items.
pub fn ingredient_key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn generated_id(key: &str) -> String {
    format!("generated-{key}")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        Category::from_str(s.trim()).map(Self::Only)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Case-insensitive substring of the item name; empty keeps everything.
    pub search: String,
    pub category: CategoryFilter,
}

impl ListFilter {
    pub fn matches(&self, item: &ShoppingItem) -> bool {
        let search = self.search.to_lowercase();

        item.name.to_lowercase().contains(&search) && self.category.matches(item.category)
    }
}

/// Items grouped by category, categories in their fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShoppingList {
    groups: BTreeMap<Category, Vec<ShoppingItem>>,
}

impl ShoppingList {
    pub fn groups(&self) -> impl Iterator<Item = (&Category, &Vec<ShoppingItem>)> {
        self.groups.iter()
    }

    pub fn category(&self, category: Category) -> &[ShoppingItem] {
        self.groups.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn items(&self) -> impl Iterator<Item = &ShoppingItem> {
        self.groups.values().flatten()
    }

    pub fn find(&self, id: &str) -> Option<&ShoppingItem> {
        self.items().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generated items for every ingredient of every planned recipe.
///
/// Items keep the order in which their key was first seen, walking the plan
/// day by day and meal by meal. Recipes missing from `book` contribute nothing.
/// An ingredient without a category is filed under [`Category::Other`], and
/// `count` is the number of planned recipes listing the ingredient.
pub fn generate_items(plan: &WeeklyPlan, book: &RecipeBook) -> Vec<ShoppingItem> {
    let mut items: Vec<ShoppingItem> = vec![];
    let mut positions: HashMap<String, usize> = HashMap::new();

    for assignment in plan.assignments() {
        // An ingredient listed twice by one recipe still counts that recipe once.
        let mut seen: HashSet<String> = HashSet::new();

        for ingredient in book.ingredients(assignment.recipe.id) {
            let key = ingredient_key(&ingredient.name);
            if key.is_empty() || !seen.insert(key.to_owned()) {
                continue;
            }

            if let Some(pos) = positions.get(&key) {
                items[*pos].count += 1;
                continue;
            }

            positions.insert(key.to_owned(), items.len());
            items.push(ShoppingItem {
                id: generated_id(&key),
                name: ingredient.name.trim().to_owned(),
                category: ingredient.category.unwrap_or_default(),
                amount: ingredient.amount.to_owned(),
                count: 1,
                source: ItemSource::MealPlan,
                checked: false,
            });
        }
    }

    items
}

/// Builds the grouped view of generated and manual items.
///
/// Manual items are appended as they are, never merged with generated ones
/// nor with each other. `checked` holds the ids ticked in this session.
pub fn build_shopping_list(
    plan: &WeeklyPlan,
    book: &RecipeBook,
    manual_items: &[ShoppingItem],
    filter: &ListFilter,
    checked: &HashSet<String>,
) -> ShoppingList {
    let generated = generate_items(plan, book);
    let generated_count = generated.len();
    let mut groups: BTreeMap<Category, Vec<ShoppingItem>> = BTreeMap::new();

    for mut item in generated.into_iter().chain(manual_items.iter().cloned()) {
        if !filter.matches(&item) {
            continue;
        }

        item.checked = checked.contains(&item.id);
        groups.entry(item.category).or_default().push(item);
    }

    let list = ShoppingList { groups };
    tracing::debug!(
        generated = generated_count,
        manual = manual_items.len(),
        shown = list.len(),
        "shopping list built"
    );

    list
}

#[cfg(test)]
mod tests {
    use mealdeck_mealplan::WeekWindow;
    use mealdeck_shared::mealplan::{Assignment, MealType};
    use mealdeck_shared::recipe::{Ingredient, Nutrition, RecipeDetail, RecipeSummary};
    use time::macros::date;

    use super::*;

    fn ingredient(name: &str, category: Option<Category>, amount: &str) -> Ingredient {
        Ingredient {
            name: name.to_owned(),
            category,
            amount: amount.to_owned(),
        }
    }

    fn recipe(id: u64, title: &str, ingredients: Vec<Ingredient>) -> RecipeDetail {
        RecipeDetail {
            id,
            title: title.to_owned(),
            image_url: String::new(),
            ingredients,
            instructions: String::new(),
            nutrition: Nutrition::default(),
        }
    }

    fn assignment(id: &str, date: &str, meal_type: MealType, recipe: &RecipeDetail) -> Assignment {
        Assignment {
            id: id.to_owned(),
            owner_id: "u-1".to_owned(),
            date: date.to_owned(),
            meal_type,
            recipe: RecipeSummary {
                id: recipe.id,
                title: recipe.title.to_owned(),
                image_url: String::new(),
            },
        }
    }

    fn window() -> WeekWindow {
        WeekWindow::containing(date!(2024 - 06 - 05))
    }

    fn manual(id: &str, name: &str) -> ShoppingItem {
        ShoppingItem {
            id: id.to_owned(),
            name: name.to_owned(),
            category: Category::Other,
            amount: "1".to_owned(),
            count: 1,
            source: ItemSource::Manual,
            checked: false,
        }
    }

    #[test]
    fn test_single_recipe_list() {
        let pasta = recipe(
            42,
            "Pasta",
            vec![ingredient("Tomato", Some(Category::Vegetables), "2")],
        );
        let plan = WeeklyPlan::from_assignments(
            &window(),
            vec![assignment("a", "2024-06-05", MealType::Lunch, &pasta)],
        );
        let book = RecipeBook::new([pasta]);

        let list = build_shopping_list(&plan, &book, &[], &ListFilter::default(), &HashSet::new());

        assert_eq!(list.len(), 1);
        assert_eq!(
            list.category(Category::Vegetables),
            &[ShoppingItem {
                id: "generated-tomato".to_owned(),
                name: "Tomato".to_owned(),
                category: Category::Vegetables,
                amount: "2".to_owned(),
                count: 1,
                source: ItemSource::MealPlan,
                checked: false,
            }]
        );
    }

    #[test]
    fn test_shared_ingredient_is_counted_once_per_recipe() {
        let soup = recipe(1, "Soup", vec![ingredient("Garlic", None, "2 cloves")]);
        let stew = recipe(2, "Stew", vec![ingredient(" garlic ", None, "1 bulb")]);
        let plan = WeeklyPlan::from_assignments(
            &window(),
            vec![
                assignment("a", "2024-06-03", MealType::Dinner, &soup),
                assignment("b", "2024-06-04", MealType::Dinner, &stew),
            ],
        );
        let book = RecipeBook::new([soup, stew]);

        let items = generate_items(&plan, &book);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Garlic");
        assert_eq!(items[0].amount, "2 cloves");
        assert_eq!(items[0].count, 2);
        assert_eq!(items[0].category, Category::Other);
    }

    #[test]
    fn test_uncategorized_ingredient_is_grouped_under_other() {
        let bread = recipe(
            7,
            "Garlic bread",
            vec![
                ingredient("Garlic", None, "1"),
                ingredient("Butter", Some(Category::Dairy), "30g"),
            ],
        );
        let plan = WeeklyPlan::from_assignments(
            &window(),
            vec![assignment("a", "2024-06-06", MealType::Dinner, &bread)],
        );
        let book = RecipeBook::new([bread]);

        let list = build_shopping_list(&plan, &book, &[], &ListFilter::default(), &HashSet::new());

        assert_eq!(list.category(Category::Other).len(), 1);
        assert_eq!(list.category(Category::Other)[0].name, "Garlic");
        assert!(list.category(Category::Vegetables).is_empty());
        assert_eq!(list.category(Category::Dairy).len(), 1);
    }

    #[test]
    fn test_repeated_ingredient_counts_its_recipe_once() {
        let brine = recipe(
            3,
            "Brine",
            vec![
                ingredient("Salt", Some(Category::Condiments), "1 tbsp"),
                ingredient("Water", None, "1 l"),
                ingredient("salt", Some(Category::Condiments), "1 pinch"),
            ],
        );
        let fries = recipe(4, "Fries", vec![ingredient("Salt", Some(Category::Condiments), "")]);
        let plan = WeeklyPlan::from_assignments(
            &window(),
            vec![
                assignment("a", "2024-06-03", MealType::Lunch, &brine),
                assignment("b", "2024-06-04", MealType::Lunch, &fries),
            ],
        );
        let book = RecipeBook::new([brine, fries]);

        let items = generate_items(&plan, &book);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Salt");
        assert_eq!(items[0].amount, "1 tbsp");
        assert_eq!(items[0].count, 2);
    }

    #[test]
    fn test_build_is_deterministic() {
        let soup = recipe(
            1,
            "Soup",
            vec![
                ingredient("Leek", None, "1"),
                ingredient("Butter", None, "20g"),
                ingredient("Salt", None, "1 pinch"),
            ],
        );
        let rice = recipe(
            2,
            "Rice bowl",
            vec![ingredient("Rice", None, "2 cups"), ingredient("Salt", None, "")],
        );
        let plan = WeeklyPlan::from_assignments(
            &window(),
            vec![
                assignment("a", "2024-06-03", MealType::Lunch, &soup),
                assignment("b", "2024-06-04", MealType::Lunch, &rice),
                assignment("c", "2024-06-05", MealType::Dinner, &soup),
            ],
        );
        let book = RecipeBook::new([soup, rice]);
        let filter = ListFilter::default();

        let first = build_shopping_list(&plan, &book, &[], &filter, &HashSet::new());
        let second = build_shopping_list(&plan, &book, &[], &filter, &HashSet::new());

        assert_eq!(first, second);
        assert_eq!(
            first.items().map(|i| i.id.as_str()).collect::<Vec<_>>(),
            vec![
                "generated-leek",
                "generated-butter",
                "generated-salt",
                "generated-rice"
            ]
        );
        assert_eq!(first.find("generated-salt").map(|i| i.count), Some(3));
    }

    #[test]
    fn test_manual_items_are_never_merged() {
        let soup = recipe(1, "Soup", vec![ingredient("Milk", Some(Category::Dairy), "1 l")]);
        let plan = WeeklyPlan::from_assignments(
            &window(),
            vec![assignment("a", "2024-06-03", MealType::Lunch, &soup)],
        );
        let book = RecipeBook::new([soup]);
        let manual = [manual("manual-1", "milk"), manual("manual-2", "milk")];

        let list = build_shopping_list(&plan, &book, &manual, &ListFilter::default(), &HashSet::new());

        assert_eq!(list.len(), 3);
        assert_eq!(list.category(Category::Dairy).len(), 1);
        assert_eq!(list.category(Category::Other).len(), 2);
    }

    #[test]
    fn test_filters_and_checked_state() {
        let soup = recipe(
            1,
            "Soup",
            vec![
                ingredient("Chicken", Some(Category::Meat), "1 lb"),
                ingredient("Chickpeas", Some(Category::Grains), "1 can"),
                ingredient("Carrot", Some(Category::Vegetables), "2"),
            ],
        );
        let plan = WeeklyPlan::from_assignments(
            &window(),
            vec![assignment("a", "2024-06-03", MealType::Lunch, &soup)],
        );
        let book = RecipeBook::new([soup]);
        let checked = HashSet::from(["generated-carrot".to_owned()]);

        let search = ListFilter {
            search: "CHICK".to_owned(),
            category: CategoryFilter::All,
        };
        let list = build_shopping_list(&plan, &book, &[], &search, &checked);
        assert_eq!(list.len(), 2);

        let only_meat = ListFilter {
            search: "chick".to_owned(),
            category: CategoryFilter::Only(Category::Meat),
        };
        let list = build_shopping_list(&plan, &book, &[], &only_meat, &checked);
        assert_eq!(list.len(), 1);
        assert_eq!(list.category(Category::Meat)[0].name, "Chicken");

        let list = build_shopping_list(&plan, &book, &[], &ListFilter::default(), &checked);
        assert_eq!(list.find("generated-carrot").map(|i| i.checked), Some(true));
        assert_eq!(list.find("generated-chicken").map(|i| i.checked), Some(false));
        assert_eq!(
            list.groups().map(|(c, _)| *c).collect::<Vec<_>>(),
            vec![Category::Meat, Category::Vegetables, Category::Grains]
        );
    }

    #[test]
    fn test_missing_recipe_details_contribute_nothing() {
        let soup = recipe(1, "Soup", vec![ingredient("Leek", None, "1")]);
        let plan = WeeklyPlan::from_assignments(
            &window(),
            vec![assignment("a", "2024-06-03", MealType::Lunch, &soup)],
        );

        assert!(generate_items(&plan, &RecipeBook::default()).is_empty());
    }

    #[test]
    fn test_category_filter_from_str() {
        assert_eq!(CategoryFilter::from_str("all").unwrap(), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_str("Dairy").unwrap(),
            CategoryFilter::Only(Category::Dairy)
        );
        assert_eq!(
            CategoryFilter::from_str("dairy").unwrap(),
            CategoryFilter::Only(Category::Dairy)
        );
        assert!(CategoryFilter::from_str("Snacks").is_err());
    }
}
