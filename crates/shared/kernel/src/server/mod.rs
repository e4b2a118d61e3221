mod error;
mod health;
mod router;
mod state;

pub use error::{ApiError, ApiErrorExt};
pub use router::system_router;
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateErrorExt};
