use std::time::Duration;

use clap::ValueEnum;
use mealdeck_mealplan::{LayoutOptions, WeekWindow, hydrate, plan_csv, plan_document};
use mealdeck_shared::recipe::RecipeBook;
use mealdeck_shared::{Error, PlanStore, Session};
use mealdeck_shopping::{ListFilter, ShoppingSession, to_print_html, to_text};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Csv,
    Document,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShoppingFormat {
    Text,
    Print,
}

pub struct ExportInput<'a, S: PlanStore + ?Sized> {
    pub store: &'a S,
    pub session: &'a Session,
    pub window: &'a WeekWindow,
    pub book: &'a RecipeBook,
    pub limit: Duration,
}

pub async fn plan<S: PlanStore + ?Sized>(
    input: ExportInput<'_, S>,
    format: PlanFormat,
    layout: LayoutOptions,
) -> anyhow::Result<String> {
    input.session.require_uid()?;
    let plan = hydrate(input.store, input.session, input.window, input.limit).await?;

    Ok(match format {
        PlanFormat::Csv => plan_csv(&plan, input.window, input.book),
        PlanFormat::Document => plan_document(&plan, input.window, input.book, layout).to_text(),
    })
}

/// Builds the list of the week, with `items` added as manual entries.
pub async fn shopping<S: PlanStore + ?Sized>(
    input: ExportInput<'_, S>,
    format: ShoppingFormat,
    filter: &ListFilter,
    items: &[String],
) -> anyhow::Result<String> {
    input.session.require_uid()?;
    let plan = hydrate(input.store, input.session, input.window, input.limit).await?;

    let mut shopping = ShoppingSession::new();
    for text in items {
        match shopping.add_manual_item(text) {
            Ok(_) => {}
            Err(Error::InputRejected(reason)) => tracing::debug!(%reason, "manual item skipped"),
            Err(err) => return Err(err.into()),
        }
    }

    let list = shopping.build(&plan, input.book, filter);

    Ok(match format {
        ShoppingFormat::Text => to_text(&list, input.window),
        ShoppingFormat::Print => to_print_html(&list, input.window)?,
    })
}
