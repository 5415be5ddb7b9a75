use std::time::Duration;

use crate::mealplan::MealSlot;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input rejected: {0}")]
    InputRejected(String),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("persistence: {0}")]
    Persistence(String),

    #[error("persistence call timed out after {0:?}")]
    Timeout(Duration),

    #[error("move of {assignment_id} from {from} to {to} left the plan inconsistent: {reason}")]
    PartialMove {
        assignment_id: String,
        from: MealSlot,
        to: MealSlot,
        reason: String,
    },

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the failed call may have been applied by the store anyway.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Unknown(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Unknown(value.into())
    }
}

impl From<time::error::Format> for Error {
    fn from(value: time::error::Format) -> Self {
        Self::Unknown(value.into())
    }
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Self::Persistence(value.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<sqlx_migrator::Error> for Error {
    fn from(value: sqlx_migrator::Error) -> Self {
        Self::Unknown(value.into())
    }
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Server(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Server(format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! reject {
    ($($arg:tt)*) => {
        return Err($crate::Error::InputRejected(format!($($arg)*)))
    };
}
