use mealdeck_mealplan::WeekWindow;

/// One line per day, machine key then display label.
pub fn render(window: &WeekWindow) -> String {
    window
        .days()
        .iter()
        .map(|day| format!("{}  {}\n", day.key, day.display))
        .collect()
}
