//! Value objects.

mod email;
mod phone_number;

pub use email::*;
pub use phone_number::*;
