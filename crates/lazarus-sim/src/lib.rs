mod chaos;
mod cost;
mod events;
mod telemetry;
mod traffic;

pub use chaos::*;
pub use cost::*;
pub use events::*;
pub use telemetry::*;
pub use traffic::*;
