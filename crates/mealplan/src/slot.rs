use std::str::FromStr;

use time::{Date, macros::format_description};

use mealdeck_shared::Result;
use mealdeck_shared::mealplan::{MealSlot, MealType};

/// Parses a drop target identifier of the form `"{date}-{mealType}"`.
///
/// The date itself contains dashes so the split happens on the last one.
pub fn parse_drop_target(id: &str) -> Result<MealSlot> {
    let Some((date, meal_type)) = id.trim().rsplit_once('-') else {
        mealdeck_shared::reject!("drop target `{id}` has no meal type");
    };

    if Date::parse(date, format_description!("[year]-[month]-[day]")).is_err() {
        mealdeck_shared::reject!("drop target `{id}` has an invalid date");
    }

    let Ok(meal_type) = MealType::from_str(meal_type) else {
        mealdeck_shared::reject!("drop target `{id}` has an unknown meal type");
    };

    Ok(MealSlot::new(date, meal_type))
}
