//! HTTP middleware.

mod logging;
mod rate_limit;
mod request_id;

pub use logging::*;
pub use rate_limit::*;
pub use request_id::*;
