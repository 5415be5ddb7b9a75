mod command;
mod session;
mod store;

pub mod mealplan;
pub mod recipe;

pub use command::*;
pub use session::*;
pub use store::*;
