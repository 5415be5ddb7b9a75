mod command;
mod export;
mod favorites;
mod hydrate;
mod memory;
mod nutrition;
mod plan;
mod slot;
mod week;

pub use command::*;
pub use export::*;
pub use favorites::*;
pub use hydrate::*;
pub use memory::*;
pub use nutrition::*;
pub use plan::*;
pub use slot::*;
pub use week::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "sqlite")] {
        mod sqlite;

        pub use sqlite::*;
    }
}
