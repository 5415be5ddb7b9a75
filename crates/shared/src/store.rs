use std::future::Future;
use std::time::Duration;

use crate::mealplan::{Assignment, MealSlot, MealType};
use crate::recipe::{RecipeDetail, RecipeSummary, SearchFilters};
use crate::{Error, Result};

/// Durable home of meal plan assignments.
///
/// `list_assignments` filters by owner only; callers narrow by date.
#[async_trait::async_trait]
pub trait PlanStore: Send + Sync {
    async fn create_assignment(
        &self,
        owner_id: &str,
        date: &str,
        meal_type: MealType,
        recipe: &RecipeSummary,
    ) -> Result<Assignment>;

    async fn list_assignments(&self, owner_id: &str) -> Result<Vec<Assignment>>;

    /// Deleting an unknown id succeeds.
    async fn delete_assignment(&self, id: &str) -> Result<()>;

    /// Whether [`PlanStore::relocate`] commits remove and add atomically.
    fn supports_relocate(&self) -> bool {
        false
    }

    /// Replace `assignment` by a copy placed in `to`, in one transaction.
    async fn relocate(&self, assignment: &Assignment, to: &MealSlot) -> Result<Assignment> {
        let _ = (assignment, to);
        crate::bail!("store does not support atomic relocation");
    }
}

#[async_trait::async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Adding a recipe that is already a favorite leaves a single entry.
    async fn add_favorite(&self, owner_id: &str, recipe: &RecipeSummary) -> Result<()>;

    async fn remove_favorite(&self, owner_id: &str, recipe_id: u64) -> Result<()>;

    async fn list_favorites(&self, owner_id: &str) -> Result<Vec<RecipeSummary>>;
}

/// Remote recipe search and detail lookups.
#[async_trait::async_trait]
pub trait RecipeCatalog: Send + Sync {
    async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<RecipeSummary>>;

    async fn details(&self, id: u64) -> Result<Option<RecipeDetail>>;
}

/// Run a store call, failing with [`Error::Timeout`] once `limit` elapses.
pub async fn timed<T, F>(limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res,
        Err(_) => {
            tracing::warn!(?limit, "persistence call timed out");
            Err(Error::Timeout(limit))
        }
    }
}
