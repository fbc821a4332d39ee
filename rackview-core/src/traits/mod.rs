//! Host collaborator traits
//!
//! The panel never talks to the network stack, the broker client or the
//! clock directly; hosts implement these for whatever they run on.

pub mod clock;
pub mod network;

pub use clock::Clock;
pub use network::{BrokerProvider, LinkProvider};
pub use rackview_display::DrawSurface;
