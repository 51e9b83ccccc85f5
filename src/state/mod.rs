/// State management module
///
/// This module handles all application state, including:
/// - Persistence of the library and preferences (store.rs)
/// - Shared data structures (data.rs)
/// - The filter + sort pipeline driving the gallery view (query.rs)
/// - Import/export of the library as JSON (transfer.rs)

pub mod data;
pub mod query;
pub mod store;
pub mod transfer;
