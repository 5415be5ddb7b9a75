use sea_query::{ColumnDef, Index, Table, TableCreateStatement, TableDropStatement};

use crate::table::FavoriteRecipe;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(FavoriteRecipe::Table)
        .col(ColumnDef::new(FavoriteRecipe::OwnerId).string().not_null())
        .col(
            ColumnDef::new(FavoriteRecipe::RecipeId)
                .big_integer()
                .not_null(),
        )
        .col(ColumnDef::new(FavoriteRecipe::Title).string().not_null())
        .col(
            ColumnDef::new(FavoriteRecipe::ImageUrl)
                .string()
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(FavoriteRecipe::CreatedAt)
                .big_integer()
                .not_null(),
        )
        .primary_key(
            Index::create()
                .col(FavoriteRecipe::OwnerId)
                .col(FavoriteRecipe::RecipeId),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(FavoriteRecipe::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
