//! Host services
//!
//! Business logic between the command loop and the shared controller.

pub mod session;

pub use session::SessionService;
