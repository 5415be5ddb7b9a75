use std::collections::HashSet;

use mealdeck_mealplan::WeeklyPlan;
use mealdeck_shared::Result;
use mealdeck_shared::recipe::{Category, RecipeBook};

use crate::{ItemSource, ListFilter, ShoppingItem, ShoppingList, build_shopping_list};

/// Shopping state of one view session.
///
/// Manual items and ticks live here only; dropping the session forgets them.
#[derive(Debug, Default)]
pub struct ShoppingSession {
    manual_items: Vec<ShoppingItem>,
    checked: HashSet<String>,
    next_manual: u64,
}

impl ShoppingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the checked state of `id` and returns the new state.
    pub fn toggle_checked(&mut self, id: &str) -> bool {
        if self.checked.remove(id) {
            return false;
        }

        self.checked.insert(id.to_owned());
        true
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.checked.contains(id)
    }

    pub fn checked(&self) -> &HashSet<String> {
        &self.checked
    }

    /// Adds a manual item named after the trimmed `text`.
    ///
    /// Blank text is rejected. Ids come from a per-session counter and live in
    /// the `manual-` namespace, apart from the `generated-` one.
    pub fn add_manual_item(&mut self, text: &str) -> Result<ShoppingItem> {
        let name = text.trim();
        if name.is_empty() {
            mealdeck_shared::reject!("manual item text is empty");
        }

        self.next_manual += 1;
        let item = ShoppingItem {
            id: format!("manual-{}", self.next_manual),
            name: name.to_owned(),
            category: Category::Other,
            amount: "1".to_owned(),
            count: 1,
            source: ItemSource::Manual,
            checked: false,
        };
        self.manual_items.push(item.clone());

        Ok(item)
    }

    /// Removes a manual item and its tick. Generated items are left alone.
    pub fn remove_manual_item(&mut self, id: &str) -> Option<ShoppingItem> {
        let pos = self.manual_items.iter().position(|item| item.id == id)?;
        self.checked.remove(id);

        Some(self.manual_items.remove(pos))
    }

    pub fn manual_items(&self) -> &[ShoppingItem] {
        &self.manual_items
    }

    pub fn build(&self, plan: &WeeklyPlan, book: &RecipeBook, filter: &ListFilter) -> ShoppingList {
        build_shopping_list(plan, book, &self.manual_items, filter, &self.checked)
    }
}
