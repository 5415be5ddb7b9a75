use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use mealdeck_shared::mealplan::{Assignment, MealType};
use mealdeck_shared::recipe::RecipeSummary;
use mealdeck_shared::{Error, FavoritesStore, PlanStore, Result};

#[derive(Default)]
struct Inner {
    assignments: Vec<Assignment>,
    favorites: HashMap<String, Vec<RecipeSummary>>,
    failing_creates: u32,
    failing_deletes: u32,
    list_delay: Option<Duration>,
    create_delay: Option<Duration>,
    list_calls: u64,
}

/// Process-local store with the same contract as a remote document store.
///
/// Failures and latency can be injected to exercise error paths.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `count` create calls fail.
    pub async fn fail_creates(&self, count: u32) {
        self.inner.write().await.failing_creates = count;
    }

    /// The next `count` delete calls fail.
    pub async fn fail_deletes(&self, count: u32) {
        self.inner.write().await.failing_deletes = count;
    }

    pub async fn delay_lists(&self, delay: Duration) {
        self.inner.write().await.list_delay = Some(delay);
    }

    pub async fn delay_creates(&self, delay: Duration) {
        self.inner.write().await.create_delay = Some(delay);
    }

    pub async fn list_calls(&self) -> u64 {
        self.inner.read().await.list_calls
    }

    /// Stores `assignment` as is, bypassing id generation.
    pub async fn seed(&self, assignment: Assignment) {
        self.inner.write().await.assignments.push(assignment);
    }
}

#[async_trait::async_trait]
impl PlanStore for MemoryStore {
    async fn create_assignment(
        &self,
        owner_id: &str,
        date: &str,
        meal_type: MealType,
        recipe: &RecipeSummary,
    ) -> Result<Assignment> {
        let delay = self.inner.read().await.create_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.inner.write().await;
        if inner.failing_creates > 0 {
            inner.failing_creates -= 1;
            return Err(Error::Persistence("create rejected".to_owned()));
        }

        let assignment = Assignment {
            id: ulid::Ulid::new().to_string(),
            owner_id: owner_id.to_owned(),
            date: date.to_owned(),
            meal_type,
            recipe: recipe.clone(),
        };
        inner.assignments.push(assignment.clone());

        Ok(assignment)
    }

    async fn list_assignments(&self, owner_id: &str) -> Result<Vec<Assignment>> {
        let delay = {
            let mut inner = self.inner.write().await;
            inner.list_calls += 1;
            inner.list_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let inner = self.inner.read().await;

        Ok(inner
            .assignments
            .iter()
            .filter(|a| a.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn delete_assignment(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.failing_deletes > 0 {
            inner.failing_deletes -= 1;
            return Err(Error::Persistence("delete rejected".to_owned()));
        }

        inner.assignments.retain(|a| a.id != id);

        Ok(())
    }
}

#[async_trait::async_trait]
impl FavoritesStore for MemoryStore {
    async fn add_favorite(&self, owner_id: &str, recipe: &RecipeSummary) -> Result<()> {
        let mut inner = self.inner.write().await;
        let favorites = inner.favorites.entry(owner_id.to_owned()).or_default();

        if !favorites.iter().any(|r| r.id == recipe.id) {
            favorites.push(recipe.clone());
        }

        Ok(())
    }

    async fn remove_favorite(&self, owner_id: &str, recipe_id: u64) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(favorites) = inner.favorites.get_mut(owner_id) {
            favorites.retain(|r| r.id != recipe_id);
        }

        Ok(())
    }

    async fn list_favorites(&self, owner_id: &str) -> Result<Vec<RecipeSummary>> {
        let inner = self.inner.read().await;

        Ok(inner.favorites.get(owner_id).cloned().unwrap_or_default())
    }
}
