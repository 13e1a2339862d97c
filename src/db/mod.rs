// Public modules - these are exposed to other parts of the application
pub mod connection;
pub mod stats;
pub mod store;

// Private submodules - these only extend or support the store facade
mod correlation;
mod distribution;
mod schema;
