//! Client side of a networked Minesweeper game: the session protocol, the
//! screen state machine and the elapsed-time counter, independent of any UI toolkit.

pub use channel::*;
pub use config::*;
pub use counter::*;
pub use error::*;
pub use model::*;
pub use phoenix::*;
pub use session::*;
pub use timer::*;

pub use sapper_protocol as protocol;

mod channel;
mod config;
mod counter;
mod error;
mod model;
mod phoenix;
mod session;
mod timer;
