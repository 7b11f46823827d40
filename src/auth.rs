//! Auth-domain models: issued tokens, their redacted secrets, and login credentials.

pub mod credentials;
pub mod token;

pub use credentials::*;
pub use token::{record::*, secret::*};
