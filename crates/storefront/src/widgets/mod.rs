//! Small page widgets modelled as state machines.
//!
//! Each widget owns only its own state; the page wires DOM events to the
//! methods and reflects the resulting state.

pub mod countdown;
pub mod filter_drawer;
pub mod navbar;

pub use countdown::{Countdown, CountdownState, Remaining};
pub use filter_drawer::{DrawerEvent, FilterDrawer};
pub use navbar::{LinkClick, Navbar};
