mod frontmatter;
mod links;

pub use frontmatter::{extract_frontmatter, split_frontmatter};
pub use links::{InlineLink, extract_inline_links};
