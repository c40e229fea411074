//! # Work Sessions
//!
//! Registering work is a toggle: the first scan of a (task, pallet, worker)
//! triple opens a session, the next one closes it.
//!
//! ## Sub-modules:
//! - `clock`: where transition timestamps come from.
//! - `resolver`: QR payloads to stored entities and the open session.
//! - `machine`: the transactional start-or-finish toggle.

pub mod clock;
pub mod machine;
pub mod resolver;

pub use clock::{Clock, SystemClock};
pub use machine::{SessionMachine, Transition};
pub use resolver::ScanTriple;
