pub mod content;
pub mod generate;
pub mod search;
pub mod template;

pub use crate::generate::{SiteSummary, generate_site};
