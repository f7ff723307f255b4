//! Theme domain module.
//!
//! # Module Structure
//!
//! - `model`: theme palettes and the built-in catalog
//! - `state`: the persisted active-theme container
//!
//! # Usage
//!
//! ```ignore
//! use postbox_core::theme::{ThemeState, catalog, find_theme};
//! ```

mod model;
mod state;

pub use model::{DEFAULT_THEME_ID, Theme, ThemeColors, catalog, default_theme, find_theme};
pub use state::ThemeState;
