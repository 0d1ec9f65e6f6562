mod api;
mod control_plane;
mod error;
mod mock;
mod remote;

pub use api::*;
pub use control_plane::*;
pub use error::*;
pub use mock::*;
pub use remote::*;
