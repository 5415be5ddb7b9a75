use mealdeck_mealplan::Favorites;
use mealdeck_shared::recipe::RecipeSummary;
use mealdeck_shared::{FavoritesStore, Session};

pub async fn add<S: FavoritesStore + ?Sized>(
    favorites: &Favorites<S>,
    session: &Session,
    recipe: &RecipeSummary,
) -> anyhow::Result<String> {
    favorites.add(session, recipe).await?;

    Ok(format!("{} added to favorites\n", recipe.title))
}

pub async fn remove<S: FavoritesStore + ?Sized>(
    favorites: &Favorites<S>,
    session: &Session,
    recipe_id: u64,
) -> anyhow::Result<String> {
    favorites.remove(session, recipe_id).await?;

    Ok(format!("recipe {recipe_id} removed from favorites\n"))
}

pub async fn list<S: FavoritesStore + ?Sized>(
    favorites: &Favorites<S>,
    session: &Session,
) -> anyhow::Result<String> {
    let recipes = favorites.list(session).await?;

    Ok(recipes
        .iter()
        .map(|r| format!("{}  {}\n", r.id, r.title))
        .collect())
}
