use sea_query::{
    ColumnDef, Index, IndexCreateStatement, IndexDropStatement, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::MealPlanAssignment;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(MealPlanAssignment::Table)
        .col(
            ColumnDef::new(MealPlanAssignment::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(ColumnDef::new(MealPlanAssignment::OwnerId).string().not_null())
        .col(
            ColumnDef::new(MealPlanAssignment::Date)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(
            ColumnDef::new(MealPlanAssignment::MealType)
                .string()
                .not_null()
                .string_len(9),
        )
        .col(
            ColumnDef::new(MealPlanAssignment::RecipeId)
                .big_integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(MealPlanAssignment::RecipeTitle)
                .string()
                .not_null(),
        )
        .col(
            ColumnDef::new(MealPlanAssignment::RecipeImageUrl)
                .string()
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(MealPlanAssignment::CreatedAt)
                .big_integer()
                .not_null(),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(MealPlanAssignment::Table).to_owned()
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

pub struct CreateOwnerIdx;

fn create_owner_idx() -> IndexCreateStatement {
    Index::create()
        .name("idx_meal_plan_assignment_owner")
        .table(MealPlanAssignment::Table)
        .col(MealPlanAssignment::OwnerId)
        .to_owned()
}

fn drop_owner_idx() -> IndexDropStatement {
    Index::drop()
        .name("idx_meal_plan_assignment_owner")
        .table(MealPlanAssignment::Table)
        .to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateOwnerIdx {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_owner_idx().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_owner_idx().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
