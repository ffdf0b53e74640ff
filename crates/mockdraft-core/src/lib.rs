// Library root: the snake-draft simulation engine plus dataset and config
// loading for the binary and integration tests.

pub mod bot;
pub mod config;
pub mod dataset;
pub mod draft;
