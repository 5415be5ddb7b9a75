use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum MealPlanAssignment {
    Table,
    Id,
    OwnerId,
    Date,
    MealType,
    RecipeId,
    RecipeTitle,
    RecipeImageUrl,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum FavoriteRecipe {
    Table,
    OwnerId,
    RecipeId,
    Title,
    ImageUrl,
    CreatedAt,
}
