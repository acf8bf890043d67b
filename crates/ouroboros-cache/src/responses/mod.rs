//! Typed outcomes for every operation family
//!
//! Each operation returns a closed enum: the expected states of the
//! operation (`Hit`/`Miss`, `Stored`/`NotStored`, `Success`, ...) plus an
//! `Error` variant carrying an [`SdkError`]. Expected states are never errors.

use crate::error::SdkError;

/// Behaviour shared by all operation outcomes.
pub trait Outcome: Sized + From<SdkError> {
    /// Name of the active variant (`"Hit"`, `"Miss"`, `"Error"`, ...).
    fn tag(&self) -> &'static str;

    fn error(&self) -> Option<&SdkError>;

    fn is_error(&self) -> bool {
        self.error().is_some()
    }

    /// Opt-in "raise on error" adapter: the `Error` variant becomes `Err`,
    /// every other variant passes through.
    fn into_result(self) -> Result<Self, SdkError>;
}

/// Declares an outcome enum. An `Error(SdkError)` variant is appended to the
/// listed variants.
macro_rules! outcome {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident $( ( $payload:ty ) )? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant $( ( $payload ) )?, )*
            Error($crate::error::SdkError),
        }

        impl $crate::responses::Outcome for $name {
            fn tag(&self) -> &'static str {
                match self {
                    $( Self::$variant { .. } => stringify!($variant), )*
                    Self::Error(_) => "Error",
                }
            }

            fn error(&self) -> Option<&$crate::error::SdkError> {
                match self {
                    Self::Error(err) => Some(err),
                    _ => None,
                }
            }

            fn into_result(self) -> Result<Self, $crate::error::SdkError> {
                match self {
                    Self::Error(err) => Err(err),
                    other => Ok(other),
                }
            }
        }

        impl From<$crate::error::SdkError> for $name {
            fn from(err: $crate::error::SdkError) -> Self {
                Self::Error(err)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    Self::Error(err) => write!(f, "{}::Error: {}", stringify!($name), err),
                    other => write!(
                        f,
                        "{}::{}",
                        stringify!($name),
                        $crate::responses::Outcome::tag(other)
                    ),
                }
            }
        }
    };
}

mod control;
mod dictionary;
mod leaderboard;
mod list;
mod scalar;
mod set;
mod sorted_set;
mod store;
mod vector;
mod webhook;

pub use control::*;
pub use dictionary::*;
pub use leaderboard::*;
pub use list::*;
pub use scalar::*;
pub use set::*;
pub use sorted_set::*;
pub use store::*;
pub use vector::*;
pub use webhook::*;
