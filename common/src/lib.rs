//! Models shared between the shop-floor backend and its clients.
//!
//! `model` holds the stored entities and the derived report views, `qr` the
//! text payload format printed on badges, task cards and pallet sheets, and
//! `requests` the bodies and query strings accepted by the HTTP API.

pub mod model;
pub mod qr;
pub mod requests;
