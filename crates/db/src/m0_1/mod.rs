mod favorite_recipe;
mod meal_plan_assignment;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "mealdeck",
    "m0_1",
    vec_box![],
    vec_box![
        meal_plan_assignment::CreateTable,
        meal_plan_assignment::CreateOwnerIdx,
        favorite_recipe::CreateTable,
    ]
);
