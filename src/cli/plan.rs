use std::time::Duration;

use anyhow::bail;
use mealdeck_mealplan::{Command, DropOutcome, WeekWindow, WeeklyPlan, hydrate};
use mealdeck_shared::mealplan::MealType;
use mealdeck_shared::recipe::RecipeSummary;
use mealdeck_shared::{PlanStore, Session, timed};

use super::parse_date;

pub async fn add<S: PlanStore + ?Sized>(
    command: &Command<S>,
    session: &Session,
    date: &str,
    meal_type: MealType,
    recipe: &RecipeSummary,
) -> anyhow::Result<String> {
    let assignment = command
        .add_assignment(session, date, meal_type, recipe)
        .await?;

    Ok(format!("added {} to {}\n", assignment.id, assignment.slot()))
}

pub async fn remove<S: PlanStore + ?Sized>(
    command: &Command<S>,
    session: &Session,
    id: &str,
) -> anyhow::Result<String> {
    command.remove_assignment(session, id).await?;

    Ok(format!("removed {id}\n"))
}

/// Moves assignment `id` onto the drop target `target` (`"{date}-{mealType}"`).
pub async fn move_to<S: PlanStore + ?Sized>(
    command: &Command<S>,
    session: &Session,
    id: &str,
    target: &str,
) -> anyhow::Result<String> {
    let uid = session.require_uid()?;
    let assignments = timed(
        command.options().timeout,
        command.store().list_assignments(uid),
    )
    .await?;

    let Some(date) = assignments.iter().find(|a| a.id == id).map(|a| a.date.to_owned()) else {
        bail!("assignment {id} not found");
    };

    let window = WeekWindow::containing(parse_date(&date).map_err(anyhow::Error::msg)?);
    let plan = WeeklyPlan::from_assignments(&window, assignments);

    match command.drop_assignment(session, &plan, id, target).await? {
        DropOutcome::Moved(moved) => Ok(format!("moved {id} to {} as {}\n", moved.slot(), moved.id)),
        DropOutcome::Unchanged => Ok(format!("{id} already in {target}\n")),
        DropOutcome::Rejected(reason) => bail!("drop rejected: {reason}"),
    }
}

pub fn render(plan: &WeeklyPlan, window: &WeekWindow) -> String {
    let mut out = format!("Week of {}\n", window.label());

    for day in window.days() {
        out.push_str(&format!("\n{}\n", day.display));

        for meal_type in MealType::ALL {
            let meals = plan.slot(&day.key, meal_type);
            if meals.is_empty() {
                out.push_str(&format!("  {meal_type}: -\n"));
            }

            for meal in meals {
                out.push_str(&format!(
                    "  {meal_type}: {} [{}]\n",
                    meal.recipe.title, meal.id
                ));
            }
        }
    }

    out
}

pub async fn show<S: PlanStore + ?Sized>(
    store: &S,
    session: &Session,
    window: &WeekWindow,
    limit: Duration,
) -> anyhow::Result<String> {
    session.require_uid()?;
    let plan = hydrate(store, session, window, limit).await?;

    Ok(render(&plan, window))
}
