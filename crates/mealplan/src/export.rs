use serde::Serialize;

use mealdeck_shared::mealplan::MealType;
use mealdeck_shared::recipe::{Nutrition, RecipeBook};

use crate::{NutritionSummary, WeekWindow, WeeklyPlan};

const TOP_MARGIN: u32 = 20;
const BODY_TOP: u32 = 50;
const LEFT: u32 = 20;
const MEAL_INDENT: u32 = 25;
const ITEM_INDENT: u32 = 30;

pub const CSV_HEADER: &str = "Day,Meal Type,Recipe,Calories,Protein (g),Carbs (g),Fat (g)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Vertical position past which the next line goes to a fresh page.
    pub page_height: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self { page_height: 250 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextLine {
    pub x: u32,
    pub y: u32,
    pub size: u8,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    pub lines: Vec<TextLine>,
}

/// Positioned text lines split into pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    /// Plain text rendition, one line per entry, pages separated by a form feed.
    pub fn to_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| {
                page.lines
                    .iter()
                    .map(|line| {
                        let indent = (line.x.saturating_sub(LEFT) / 5) as usize;
                        format!("{}{}\n", " ".repeat(indent), line.text)
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\u{c}")
    }

    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }
}

struct Layout {
    pages: Vec<Page>,
    y: u32,
    page_height: u32,
}

impl Layout {
    fn new(options: LayoutOptions) -> Self {
        Self {
            pages: vec![Page::default()],
            y: TOP_MARGIN,
            page_height: options.page_height,
        }
    }

    fn place(&mut self, x: u32, size: u8, text: impl Into<String>, advance: u32) {
        if self.y > self.page_height {
            self.pages.push(Page::default());
            self.y = TOP_MARGIN;
        }

        if let Some(page) = self.pages.last_mut() {
            page.lines.push(TextLine {
                x,
                y: self.y,
                size,
                text: text.into(),
            });
        }

        self.y += advance;
    }

    fn skip_to(&mut self, y: u32) {
        self.y = self.y.max(y);
    }

    fn finish(self) -> Document {
        Document { pages: self.pages }
    }
}

fn nutrition_line(n: Nutrition) -> String {
    format!(
        "Calories: {} | Protein: {}g | Carbs: {}g | Fat: {}g",
        n.calories, n.protein, n.carbs, n.fat
    )
}

/// Lays the week out day by day, every meal type of every day included.
pub fn plan_document(
    plan: &WeeklyPlan,
    window: &WeekWindow,
    book: &RecipeBook,
    options: LayoutOptions,
) -> Document {
    let nutrition = NutritionSummary::compute(plan, window, book);
    let mut layout = Layout::new(options);

    layout.place(LEFT, 20, "Weekly Meal Plan", 15);
    layout.place(LEFT, 12, format!("Week of {}", window.label()), 15);
    layout.skip_to(BODY_TOP);

    for day in window.days() {
        layout.place(LEFT, 14, day.display.to_owned(), 10);

        for meal_type in MealType::ALL {
            layout.place(
                MEAL_INDENT,
                10,
                format!("{}:", meal_type.as_ref().to_uppercase()),
                7,
            );

            let meals = plan.slot(&day.key, meal_type);
            if meals.is_empty() {
                layout.place(ITEM_INDENT, 10, "No meals planned", 7);
            }

            for meal in meals {
                layout.place(ITEM_INDENT, 10, format!("- {}", meal.recipe.title), 7);
            }
        }

        layout.place(MEAL_INDENT, 8, nutrition_line(nutrition.day(&day.key)), 15);
    }

    let document = layout.finish();
    tracing::debug!(
        pages = document.pages.len(),
        start = window.start(),
        "meal plan document laid out"
    );

    document
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

fn csv_quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// One row per assignment, one placeholder row per empty slot.
pub fn plan_csv(plan: &WeeklyPlan, window: &WeekWindow, book: &RecipeBook) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    let mut row = |day: &str, meal_type: MealType, title: &str, n: Nutrition| {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            csv_field(day),
            meal_type,
            csv_quoted(title),
            n.calories,
            n.protein,
            n.carbs,
            n.fat
        ));
    };

    for day in window.days() {
        for meal_type in MealType::ALL {
            let meals = plan.slot(&day.key, meal_type);
            if meals.is_empty() {
                row(&day.display, meal_type, "No meal planned", Nutrition::default());
            }

            for meal in meals {
                row(
                    &day.display,
                    meal_type,
                    &meal.recipe.title,
                    book.nutrition(meal.recipe.id),
                );
            }
        }
    }

    out
}
