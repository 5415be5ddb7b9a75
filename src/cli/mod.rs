use std::path::Path;

use anyhow::Context;
use mealdeck_mealplan::{SqliteStore, WeekWindow};
use mealdeck_shared::recipe::RecipeBook;
use time::{Date, macros::format_description};

use crate::config::Config;

pub mod export;
pub mod favorites;
pub mod plan;
pub mod week;

/// Parses an ISO `YYYY-MM-DD` date argument.
pub fn parse_date(value: &str) -> Result<Date, String> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("invalid date `{value}`: {e}"))
}

pub fn week_window(date: Option<Date>, tz: &str) -> WeekWindow {
    match date {
        Some(date) => WeekWindow::containing(date),
        None => WeekWindow::current(tz),
    }
}

pub async fn open_store(config: &Config) -> anyhow::Result<SqliteStore> {
    let pool = crate::create_pool(&config.database.url, config.database.max_connections).await?;

    Ok(SqliteStore::new(pool))
}

pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    store.migrate().await?;

    tracing::info!(url = %config.database.url, "migrations applied");

    Ok(())
}

/// Recipe details read from a JSON array of recipes.
pub fn load_book(path: impl AsRef<Path>) -> anyhow::Result<RecipeBook> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read recipes from {}", path.display()))?;

    Ok(RecipeBook::from_json(&json)?)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-06-05"), Ok(date!(2024 - 06 - 05)));
        assert!(parse_date("2024-6-5x").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_week_window_from_date() {
        let window = week_window(Some(date!(2024 - 06 - 09)), "UTC");
        assert_eq!(window.start(), "2024-06-03");
        assert_eq!(window.end(), "2024-06-09");
    }
}
