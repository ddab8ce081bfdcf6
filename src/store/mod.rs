pub mod json_store;
pub mod preferences;
pub mod schema;
