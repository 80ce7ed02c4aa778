//! Output formatting for wizard screens.
//!
//! - [`terminal`] - message styles, column padding and the existing pool table

mod terminal;

pub use terminal::{format_field, format_pool_listing, styled, Style};
