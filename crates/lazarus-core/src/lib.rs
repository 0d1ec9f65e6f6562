mod error;
mod lifecycle;
mod profile;
mod sequencer;
mod session;

pub use error::*;
pub use lifecycle::*;
pub use profile::*;
pub use sequencer::*;
pub use session::*;
