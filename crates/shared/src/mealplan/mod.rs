use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::recipe::RecipeSummary;

/// ISO `YYYY-MM-DD` date string. Lexicographic order is chronological order.
pub type DayKey = String;

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
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// Fixed display order of the meal slots of a day.
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct MealSlot {
    pub date: DayKey,
    pub meal_type: MealType,
}

impl MealSlot {
    pub fn new(date: impl Into<DayKey>, meal_type: MealType) -> Self {
        Self {
            date: date.into(),
            meal_type,
        }
    }

    /// Identifier used by drop targets, `"{date}-{mealType}"`.
    pub fn target_id(&self) -> String {
        format!("{}-{}", self.date, self.meal_type)
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.meal_type)
    }
}

/// One recipe placed into one slot.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub owner_id: String,
    pub date: DayKey,
    pub meal_type: MealType,
    pub recipe: RecipeSummary,
}

impl Assignment {
    pub fn slot(&self) -> MealSlot {
        MealSlot::new(self.date.to_owned(), self.meal_type)
    }
}
