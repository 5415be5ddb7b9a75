use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mealdeck::cli::{self, export::ExportInput, export::PlanFormat, export::ShoppingFormat};
use mealdeck::config::Config;
use mealdeck_mealplan::{Command, Favorites};
use mealdeck_shared::Session;
use mealdeck_shared::mealplan::MealType;
use mealdeck_shared::recipe::RecipeSummary;
use mealdeck_shopping::{CategoryFilter, ListFilter};
use time::Date;

/// mealdeck - weekly meal plans and shopping lists
#[derive(Parser)]
#[command(name = "mealdeck")]
#[command(about = "Weekly meal planning and shopping list derivation", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database if missing and run migrations
    Migrate,
    /// Print the Monday to Sunday week containing a date
    Week {
        #[command(flatten)]
        week: WeekArgs,
    },
    /// Edit or show a weekly meal plan
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },
    /// Manage favorite recipes
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Export a meal plan or its shopping list
    Export {
        #[command(subcommand)]
        target: ExportTarget,
    },
}

#[derive(clap::Args)]
struct WeekArgs {
    /// Any day of the week, defaults to today
    #[arg(long, value_parser = cli::parse_date)]
    date: Option<Date>,

    /// Time zone used to resolve today
    #[arg(long, default_value = "UTC")]
    tz: String,
}

#[derive(clap::Args)]
struct RecipeArgs {
    /// JSON array of recipe details
    #[arg(long)]
    recipes: PathBuf,

    #[arg(long)]
    recipe: u64,
}

#[derive(Subcommand)]
enum PlanAction {
    /// Assign a recipe to a meal slot
    Add {
        #[arg(long)]
        user: String,
        #[arg(long, value_parser = cli::parse_date)]
        date: Date,
        #[arg(long)]
        meal: MealType,
        #[command(flatten)]
        recipe: RecipeArgs,
    },
    /// Remove an assignment
    Remove {
        #[arg(long)]
        user: String,
        id: String,
    },
    /// Move an assignment onto a drop target such as 2024-06-05-dinner
    Move {
        #[arg(long)]
        user: String,
        id: String,
        target: String,
    },
    /// Print the plan of a week
    Show {
        #[arg(long)]
        user: String,
        #[command(flatten)]
        week: WeekArgs,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    Add {
        #[arg(long)]
        user: String,
        #[command(flatten)]
        recipe: RecipeArgs,
    },
    Remove {
        #[arg(long)]
        user: String,
        recipe: u64,
    },
    List {
        #[arg(long)]
        user: String,
    },
}

#[derive(Subcommand)]
enum ExportTarget {
    /// Export the week as CSV or as a paginated document
    Plan {
        #[arg(long)]
        user: String,
        #[arg(long)]
        recipes: PathBuf,
        #[arg(long, value_enum, default_value = "csv")]
        format: PlanFormat,
        #[command(flatten)]
        week: WeekArgs,
    },
    /// Export the shopping list of the week
    Shopping {
        #[arg(long)]
        user: String,
        #[arg(long)]
        recipes: PathBuf,
        #[arg(long, value_enum, default_value = "text")]
        format: ShoppingFormat,
        /// Keep items whose name contains this text
        #[arg(long, default_value = "")]
        search: String,
        /// Category name or "all"
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
        /// Manual item, may be repeated
        #[arg(long = "item")]
        items: Vec<String>,
        #[command(flatten)]
        week: WeekArgs,
    },
}

fn recipe_summary(args: &RecipeArgs) -> Result<RecipeSummary> {
    let book = cli::load_book(&args.recipes)?;
    let recipe = book
        .get(args.recipe)
        .with_context(|| format!("recipe {} not found in {}", args.recipe, args.recipes.display()))?;

    Ok(recipe.summary())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    mealdeck::observability::init_observability(
        "mealdeck",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    let output = match cli.command {
        Commands::Migrate => {
            cli::migrate(&config).await?;
            String::new()
        }
        Commands::Week { week } => cli::week::render(&cli::week_window(week.date, &week.tz)),
        Commands::Plan { action } => plan_command(&config, action).await?,
        Commands::Favorites { action } => favorites_command(&config, action).await?,
        Commands::Export { target } => export_command(&config, target).await?,
    };

    print!("{output}");

    Ok(())
}

async fn plan_command(config: &Config, action: PlanAction) -> Result<String> {
    let store = Arc::new(cli::open_store(config).await?);
    let command = Command::new(store.clone(), config.persistence.command_options());

    match action {
        PlanAction::Add {
            user,
            date,
            meal,
            recipe,
        } => {
            let recipe = recipe_summary(&recipe)?;
            let date = mealdeck_mealplan::day_key(date);
            cli::plan::add(&command, &Session::user(user), &date, meal, &recipe).await
        }
        PlanAction::Remove { user, id } => {
            cli::plan::remove(&command, &Session::user(user), &id).await
        }
        PlanAction::Move { user, id, target } => {
            cli::plan::move_to(&command, &Session::user(user), &id, &target).await
        }
        PlanAction::Show { user, week } => {
            let window = cli::week_window(week.date, &week.tz);
            cli::plan::show(
                store.as_ref(),
                &Session::user(user),
                &window,
                config.persistence.timeout(),
            )
            .await
        }
    }
}

async fn favorites_command(config: &Config, action: FavoritesAction) -> Result<String> {
    let store = Arc::new(cli::open_store(config).await?);
    let favorites = Favorites::new(store, config.persistence.timeout());

    match action {
        FavoritesAction::Add { user, recipe } => {
            let recipe = recipe_summary(&recipe)?;
            cli::favorites::add(&favorites, &Session::user(user), &recipe).await
        }
        FavoritesAction::Remove { user, recipe } => {
            cli::favorites::remove(&favorites, &Session::user(user), recipe).await
        }
        FavoritesAction::List { user } => {
            cli::favorites::list(&favorites, &Session::user(user)).await
        }
    }
}

async fn export_command(config: &Config, target: ExportTarget) -> Result<String> {
    let store = cli::open_store(config).await?;

    match target {
        ExportTarget::Plan {
            user,
            recipes,
            format,
            week,
        } => {
            let book = cli::load_book(&recipes)?;
            let window = cli::week_window(week.date, &week.tz);
            let session = Session::user(user);
            let input = ExportInput {
                store: &store,
                session: &session,
                window: &window,
                book: &book,
                limit: config.persistence.timeout(),
            };

            cli::export::plan(input, format, config.export.layout_options()).await
        }
        ExportTarget::Shopping {
            user,
            recipes,
            format,
            search,
            category,
            items,
            week,
        } => {
            let book = cli::load_book(&recipes)?;
            let window = cli::week_window(week.date, &week.tz);
            let session = Session::user(user);
            let input = ExportInput {
                store: &store,
                session: &session,
                window: &window,
                book: &book,
                limit: config.persistence.timeout(),
            };
            let filter = ListFilter { search, category };

            cli::export::shopping(input, format, &filter, &items).await
        }
    }
}
