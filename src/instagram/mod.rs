//! Instagram link parsing and video URL resolution

pub mod resolver;
pub mod shortcode;

pub use resolver::{InstagramResolver, MediaResolver, ResolvedMedia};
pub use shortcode::extract_shortcode;
