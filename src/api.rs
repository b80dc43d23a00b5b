//! Request and response types exchanged between resource wrappers and the executor.

pub mod descriptor;
pub mod endpoint;
pub mod response;
pub mod scope;

pub use descriptor::*;
pub use endpoint::*;
pub use response::*;
pub use scope::*;
