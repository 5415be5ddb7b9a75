use std::collections::BTreeMap;

use serde::Serialize;

use mealdeck_shared::mealplan::DayKey;
use mealdeck_shared::recipe::{Nutrition, RecipeBook};

use crate::{WeekWindow, WeeklyPlan};

/// Nutrition totals per day of the window and for the whole week.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutritionSummary {
    pub daily: BTreeMap<DayKey, Nutrition>,
    pub weekly: Nutrition,
}

impl NutritionSummary {
    /// Recipes missing from `book` count as zero.
    pub fn compute(plan: &WeeklyPlan, window: &WeekWindow, book: &RecipeBook) -> Self {
        let mut summary = Self::default();

        for day in window.days() {
            let total = plan
                .day(&day.key)
                .into_iter()
                .flat_map(|meals| meals.values())
                .flatten()
                .fold(Nutrition::default(), |acc, a| acc + book.nutrition(a.recipe.id));

            summary.weekly += total;
            summary.daily.insert(day.key.to_owned(), total);
        }

        summary
    }

    pub fn day(&self, date: &str) -> Nutrition {
        self.daily.get(date).copied().unwrap_or_default()
    }
}
