//! Session lifecycle for the demo wallet account.

pub mod session;

pub use session::Session;
