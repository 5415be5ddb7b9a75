use std::str::FromStr;

use mealdeck_db::table::{FavoriteRecipe, MealPlanAssignment};
use sea_query::{Expr, ExprTrait, InsertStatement, OnConflict, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use sqlx_migrator::{Migrate, Plan};
use time::OffsetDateTime;

use mealdeck_shared::mealplan::{Assignment, MealSlot, MealType};
use mealdeck_shared::recipe::RecipeSummary;
use mealdeck_shared::{Error, FavoritesStore, PlanStore, Result};

#[derive(FromRow)]
struct AssignmentRow {
    id: String,
    owner_id: String,
    date: String,
    meal_type: String,
    recipe_id: i64,
    recipe_title: String,
    recipe_image_url: String,
}

impl TryFrom<AssignmentRow> for Assignment {
    type Error = Error;

    fn try_from(row: AssignmentRow) -> Result<Self> {
        let meal_type = MealType::from_str(&row.meal_type)
            .map_err(|_| Error::Persistence(format!("unknown meal type '{}'", row.meal_type)))?;

        Ok(Assignment {
            id: row.id,
            owner_id: row.owner_id,
            date: row.date,
            meal_type,
            recipe: RecipeSummary {
                id: row.recipe_id as u64,
                title: row.recipe_title,
                image_url: row.recipe_image_url,
            },
        })
    }
}

#[derive(FromRow)]
struct FavoriteRow {
    recipe_id: i64,
    title: String,
    image_url: String,
}

fn recipe_key(id: u64) -> Result<i64> {
    i64::try_from(id).map_err(|_| Error::InputRejected(format!("recipe id {id} out of range")))
}

/// SQLite backed [`PlanStore`] and [`FavoritesStore`].
///
/// Listing stays owner-filtered like the remote store it replaces; relocation
/// runs in a single transaction.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        let migrator = mealdeck_db::migrator::<sqlx::Sqlite>()?;
        let mut conn = self.pool.acquire().await?;
        migrator.run(&mut *conn, &Plan::apply_all()).await?;

        Ok(())
    }

    fn insert_statement(
        owner_id: &str,
        date: &str,
        meal_type: MealType,
        recipe: &RecipeSummary,
    ) -> Result<(Assignment, InsertStatement)> {
        let assignment = Assignment {
            id: ulid::Ulid::new().to_string(),
            owner_id: owner_id.to_owned(),
            date: date.to_owned(),
            meal_type,
            recipe: recipe.clone(),
        };

        let statement = Query::insert()
            .into_table(MealPlanAssignment::Table)
            .columns([
                MealPlanAssignment::Id,
                MealPlanAssignment::OwnerId,
                MealPlanAssignment::Date,
                MealPlanAssignment::MealType,
                MealPlanAssignment::RecipeId,
                MealPlanAssignment::RecipeTitle,
                MealPlanAssignment::RecipeImageUrl,
                MealPlanAssignment::CreatedAt,
            ])
            .values_panic([
                assignment.id.to_owned().into(),
                assignment.owner_id.to_owned().into(),
                assignment.date.to_owned().into(),
                meal_type.to_string().into(),
                recipe_key(recipe.id)?.into(),
                recipe.title.to_owned().into(),
                recipe.image_url.to_owned().into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .to_owned();

        Ok((assignment, statement))
    }
}

#[async_trait::async_trait]
impl PlanStore for SqliteStore {
    async fn create_assignment(
        &self,
        owner_id: &str,
        date: &str,
        meal_type: MealType,
        recipe: &RecipeSummary,
    ) -> Result<Assignment> {
        let (assignment, statement) = Self::insert_statement(owner_id, date, meal_type, recipe)?;
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(assignment)
    }

    async fn list_assignments(&self, owner_id: &str) -> Result<Vec<Assignment>> {
        let statement = Query::select()
            .columns([
                MealPlanAssignment::Id,
                MealPlanAssignment::OwnerId,
                MealPlanAssignment::Date,
                MealPlanAssignment::MealType,
                MealPlanAssignment::RecipeId,
                MealPlanAssignment::RecipeTitle,
                MealPlanAssignment::RecipeImageUrl,
            ])
            .from(MealPlanAssignment::Table)
            .and_where(Expr::col(MealPlanAssignment::OwnerId).eq(owner_id))
            .order_by(MealPlanAssignment::CreatedAt, Order::Asc)
            .order_by(MealPlanAssignment::Id, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, AssignmentRow, _>(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Assignment::try_from).collect()
    }

    async fn delete_assignment(&self, id: &str) -> Result<()> {
        let statement = Query::delete()
            .from_table(MealPlanAssignment::Table)
            .and_where(Expr::col(MealPlanAssignment::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(())
    }

    fn supports_relocate(&self) -> bool {
        true
    }

    /// Fails without changes when `assignment` is no longer stored, so a
    /// concurrent removal is not undone.
    async fn relocate(&self, assignment: &Assignment, to: &MealSlot) -> Result<Assignment> {
        let mut tx = self.pool.begin().await?;

        let statement = Query::delete()
            .from_table(MealPlanAssignment::Table)
            .and_where(Expr::col(MealPlanAssignment::Id).eq(&assignment.id))
            .and_where(Expr::col(MealPlanAssignment::OwnerId).eq(&assignment.owner_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let deleted = sqlx::query_with(&sql, values)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;

            return Err(Error::Persistence(format!(
                "assignment {} not found",
                assignment.id
            )));
        }

        let (moved, statement) = Self::insert_statement(
            &assignment.owner_id,
            &to.date,
            to.meal_type,
            &assignment.recipe,
        )?;
        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        Ok(moved)
    }
}

#[async_trait::async_trait]
impl FavoritesStore for SqliteStore {
    async fn add_favorite(&self, owner_id: &str, recipe: &RecipeSummary) -> Result<()> {
        let statement = Query::insert()
            .into_table(FavoriteRecipe::Table)
            .columns([
                FavoriteRecipe::OwnerId,
                FavoriteRecipe::RecipeId,
                FavoriteRecipe::Title,
                FavoriteRecipe::ImageUrl,
                FavoriteRecipe::CreatedAt,
            ])
            .values_panic([
                owner_id.to_owned().into(),
                recipe_key(recipe.id)?.into(),
                recipe.title.to_owned().into(),
                recipe.image_url.to_owned().into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .on_conflict(
                OnConflict::columns([FavoriteRecipe::OwnerId, FavoriteRecipe::RecipeId])
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(())
    }

    async fn remove_favorite(&self, owner_id: &str, recipe_id: u64) -> Result<()> {
        let statement = Query::delete()
            .from_table(FavoriteRecipe::Table)
            .and_where(Expr::col(FavoriteRecipe::OwnerId).eq(owner_id))
            .and_where(Expr::col(FavoriteRecipe::RecipeId).eq(recipe_key(recipe_id)?))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.pool).await?;

        Ok(())
    }

    async fn list_favorites(&self, owner_id: &str) -> Result<Vec<RecipeSummary>> {
        let statement = Query::select()
            .columns([
                FavoriteRecipe::RecipeId,
                FavoriteRecipe::Title,
                FavoriteRecipe::ImageUrl,
            ])
            .from(FavoriteRecipe::Table)
            .and_where(Expr::col(FavoriteRecipe::OwnerId).eq(owner_id))
            .order_by(FavoriteRecipe::CreatedAt, Order::Asc)
            .order_by(FavoriteRecipe::RecipeId, Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, FavoriteRow, _>(&sql, values)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| RecipeSummary {
                id: row.recipe_id as u64,
                title: row.title,
                image_url: row.image_url,
            })
            .collect())
    }
}
