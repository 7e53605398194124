//! Human and API facing handlers with the payloads and templates they use.

pub mod forms;
pub mod handlers;
pub mod views;
