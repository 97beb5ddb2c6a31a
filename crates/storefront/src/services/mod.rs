//! Stateful services consumers interact with.
//!
//! - `session` - sign-in lifecycle and token custody
//! - `cart` - the in-memory cart store
//! - `checkout` - checkout readiness from cart and session

pub mod cart;
pub mod checkout;
pub mod session;

pub use cart::CartStore;
pub use checkout::CheckoutGate;
pub use session::{SessionError, SessionManager};
