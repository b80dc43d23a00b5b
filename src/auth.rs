//! Credential, scope, and token models owned by the executor.

pub mod credential;
pub mod scope;
pub mod token;

pub use credential::*;
pub use scope::*;
pub use token::{cached::*, secret::*};
