//! Bearer token model and the secret wrapper that keeps it out of logs.

pub mod record;
pub mod secret;
