pub mod error;
pub mod key;
pub mod session;
pub mod store;
pub mod testing;

pub use error::StateError;
pub use key::SessionId;
pub use session::SessionStore;
pub use store::WorkflowStore;
