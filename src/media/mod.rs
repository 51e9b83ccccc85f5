/// Media loading module
///
/// This module handles:
/// - Fetching card images over HTTP
/// - Reading local image files
/// - Caching fetched images to disk

pub mod fetch;
