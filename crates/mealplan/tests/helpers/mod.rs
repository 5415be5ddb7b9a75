use std::time::Duration;

use mealdeck_mealplan::{CommandOptions, WeekWindow};
use mealdeck_shared::recipe::RecipeSummary;
use time::macros::date;

#[cfg(feature = "sqlite")]
use std::{path::PathBuf, str::FromStr};

#[cfg(feature = "sqlite")]
use mealdeck_mealplan::SqliteStore;
#[cfg(feature = "sqlite")]
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};

#[cfg(feature = "sqlite")]
#[allow(dead_code)]
pub async fn setup_sqlite_store(path: PathBuf) -> anyhow::Result<SqliteStore> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let store = SqliteStore::new(pool);
    store.migrate().await?;

    Ok(store)
}

/// Monday 2024-06-03 to Sunday 2024-06-09.
#[allow(dead_code)]
pub fn window() -> WeekWindow {
    WeekWindow::containing(date!(2024 - 06 - 05))
}

#[allow(dead_code)]
pub fn recipe(id: u64, title: impl Into<String>) -> RecipeSummary {
    RecipeSummary {
        id,
        title: title.into(),
        image_url: format!("https://img.mealdeck.localhost/{id}.jpg"),
    }
}

#[allow(dead_code)]
pub fn fast_options() -> CommandOptions {
    CommandOptions {
        timeout: Duration::from_millis(500),
        move_retries: 2,
        retry_backoff: Duration::from_millis(1),
    }
}
