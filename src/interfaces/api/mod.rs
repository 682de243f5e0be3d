//! JSON shapes of the remote processor API.

pub mod process;
pub mod status;
