use std::collections::BTreeMap;

use serde::Serialize;

use mealdeck_shared::mealplan::{Assignment, DayKey, MealSlot, MealType};

use crate::WeekWindow;

pub type DayPlan = BTreeMap<MealType, Vec<Assignment>>;

/// Assignments of one week laid out by day and meal type.
///
/// Every day of the window is present with all three meal types, possibly
/// empty. Days iterate chronologically and meal types breakfast, lunch, dinner.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeeklyPlan {
    days: BTreeMap<DayKey, DayPlan>,
}

impl WeeklyPlan {
    pub fn empty(window: &WeekWindow) -> Self {
        let days = window
            .days()
            .iter()
            .map(|day| {
                let meals = MealType::ALL.iter().map(|m| (*m, Vec::new())).collect();
                (day.key.to_owned(), meals)
            })
            .collect();

        Self { days }
    }

    /// Lays out `assignments`, dropping those dated outside `window`.
    pub fn from_assignments(
        window: &WeekWindow,
        assignments: impl IntoIterator<Item = Assignment>,
    ) -> Self {
        let mut plan = Self::empty(window);
        let mut skipped = 0usize;

        for assignment in assignments {
            if !window.contains(&assignment.date) || !plan.insert(assignment) {
                skipped += 1;
            }
        }

        if skipped > 0 {
            tracing::debug!(
                skipped,
                start = window.start(),
                end = window.end(),
                "assignments outside the week window"
            );
        }

        plan
    }

    /// Appends locally; returns false when the date is not part of the plan.
    pub fn insert(&mut self, assignment: Assignment) -> bool {
        let Some(day) = self.days.get_mut(&assignment.date) else {
            return false;
        };

        day.entry(assignment.meal_type)
            .or_default()
            .push(assignment);

        true
    }

    /// Removes locally by id.
    pub fn remove(&mut self, id: &str) -> Option<Assignment> {
        for meals in self.days.values_mut() {
            for assignments in meals.values_mut() {
                if let Some(pos) = assignments.iter().position(|a| a.id == id) {
                    return Some(assignments.remove(pos));
                }
            }
        }

        None
    }

    /// Reorders within one slot. Display only, the store keeps no order.
    pub fn reorder(&mut self, slot: &MealSlot, from: usize, to: usize) -> bool {
        let Some(assignments) = self
            .days
            .get_mut(&slot.date)
            .and_then(|meals| meals.get_mut(&slot.meal_type))
        else {
            return false;
        };

        if from >= assignments.len() || to >= assignments.len() {
            return false;
        }

        let moved = assignments.remove(from);
        assignments.insert(to, moved);

        true
    }

    pub fn slot(&self, date: &str, meal_type: MealType) -> &[Assignment] {
        self.days
            .get(date)
            .and_then(|meals| meals.get(&meal_type))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn day(&self, date: &str) -> Option<&DayPlan> {
        self.days.get(date)
    }

    pub fn days(&self) -> impl Iterator<Item = (&DayKey, &DayPlan)> {
        self.days.iter()
    }

    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.days
            .values()
            .flat_map(|meals| meals.values())
            .flatten()
    }

    pub fn find(&self, id: &str) -> Option<&Assignment> {
        self.assignments().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.assignments().count()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().next().is_none()
    }
}
