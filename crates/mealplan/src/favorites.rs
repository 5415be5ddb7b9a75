use std::sync::Arc;
use std::time::Duration;

use mealdeck_shared::recipe::RecipeSummary;
use mealdeck_shared::{FavoritesStore, Result, Session, timed};

pub struct Favorites<S: FavoritesStore + ?Sized> {
    store: Arc<S>,
    limit: Duration,
}

impl<S: FavoritesStore + ?Sized> Favorites<S> {
    pub fn new(store: Arc<S>, limit: Duration) -> Self {
        Self { store, limit }
    }

    pub async fn add(&self, session: &Session, recipe: &RecipeSummary) -> Result<()> {
        let uid = session.require_uid()?;
        timed(self.limit, self.store.add_favorite(uid, recipe)).await?;
        tracing::info!(owner = uid, recipe = recipe.id, "favorite added");

        Ok(())
    }

    pub async fn remove(&self, session: &Session, recipe_id: u64) -> Result<()> {
        let uid = session.require_uid()?;
        timed(self.limit, self.store.remove_favorite(uid, recipe_id)).await?;
        tracing::info!(owner = uid, recipe = recipe_id, "favorite removed");

        Ok(())
    }

    /// Anonymous sessions have no favorites.
    pub async fn list(&self, session: &Session) -> Result<Vec<RecipeSummary>> {
        let Ok(uid) = session.require_uid() else {
            return Ok(vec![]);
        };

        timed(self.limit, self.store.list_favorites(uid)).await
    }
}

#[cfg(test)]
mod tests {
    use mealdeck_shared::Error;

    use super::*;
    use crate::MemoryStore;

    #[tokio::test]
    async fn test_favorites_require_session() {
        let favorites = Favorites::new(Arc::new(MemoryStore::new()), Duration::from_secs(1));
        let recipe = RecipeSummary {
            id: 3,
            title: "Salad".to_owned(),
            image_url: String::new(),
        };

        let res = favorites.add(&Session::anonymous(), &recipe).await;
        assert!(matches!(res, Err(Error::NotAuthenticated)));
        assert!(favorites.list(&Session::anonymous()).await.unwrap().is_empty());

        let session = Session::user("u-1");
        favorites.add(&session, &recipe).await.unwrap();
        assert_eq!(favorites.list(&session).await.unwrap(), vec![recipe]);

        favorites.remove(&session, 3).await.unwrap();
        assert!(favorites.list(&session).await.unwrap().is_empty());
    }
}
