use askama::Template;
use serde::Serialize;

use mealdeck_mealplan::WeekWindow;
use mealdeck_shared::recipe::Category;
use mealdeck_shared::{Error, Result};

use crate::{ShoppingItem, ShoppingList};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingSummary {
    pub total: usize,
    /// Checked items among those shown.
    pub checked: usize,
    pub completion_percent: f64,
}

impl ShoppingSummary {
    pub fn of(list: &ShoppingList) -> Self {
        let total = list.len();
        let checked = list.items().filter(|item| item.checked).count();
        let completion_percent = if total > 0 {
            checked as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total,
            checked,
            completion_percent,
        }
    }

    pub fn line(&self) -> String {
        format!("Total Items: {} | Completed: {}", self.total, self.checked)
    }
}

fn glyph(item: &ShoppingItem) -> char {
    if item.checked { '✓' } else { '☐' }
}

/// Plain text list, one section per category.
pub fn to_text(list: &ShoppingList, window: &WeekWindow) -> String {
    let mut text = format!(
        "Shopping List - Week of {} to {}\n\n",
        window.first().display,
        window.last().display
    );

    for (category, items) in list.groups() {
        text.push_str(&format!("{category}:\n"));
        for item in items {
            text.push_str(&format!("{} {} ({})\n", glyph(item), item.name, item.amount));
        }
        text.push('\n');
    }

    text.push_str(&ShoppingSummary::of(list).line());
    text.push('\n');

    text
}

struct PrintSection<'a> {
    category: Category,
    items: &'a [ShoppingItem],
}

#[derive(Template)]
#[template(path = "shopping/print.html")]
struct PrintTemplate<'a> {
    week: String,
    summary: ShoppingSummary,
    sections: Vec<PrintSection<'a>>,
}

/// Print-ready HTML document of the list.
pub fn to_print_html(list: &ShoppingList, window: &WeekWindow) -> Result<String> {
    let template = PrintTemplate {
        week: window.label(),
        summary: ShoppingSummary::of(list),
        sections: list
            .groups()
            .map(|(category, items)| PrintSection {
                category: *category,
                items,
            })
            .collect(),
    };

    template
        .render()
        .map_err(|e| Error::Unknown(anyhow::Error::new(e).context("render shopping list")))
}
