/// UI building blocks
///
/// This module provides the view pieces composed by main.rs:
/// - Gallery cards in grid and list layouts (card.rs)
/// - The overlay helper, add/edit form, and delete confirmation (modal.rs)
/// - The zoomable lightbox (lightbox.rs)

pub mod card;
pub mod lightbox;
pub mod modal;
