mod aggregation;
mod export;
mod session;

pub use aggregation::*;
pub use export::*;
pub use session::*;
