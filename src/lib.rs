mod config;
mod error;
mod graph;
mod link_check;
mod output;
mod parse;
mod record;
mod scan;
mod tag_index;

pub use crate::config::{CONFIG_FILE_NAME, NotesConfig, ScanProfile};
pub use crate::error::{Error, Result};
pub use crate::graph::{
    GraphEdge, GraphNode, RelationGraph, STYLED_CATEGORIES, TagCount, node_id,
    render_graph_document,
};
pub use crate::link_check::{LinkIssue, LinkReport, check_links, resolve_link_target};
pub use crate::output::write_document;
pub use crate::parse::{InlineLink, extract_frontmatter, extract_inline_links, split_frontmatter};
pub use crate::record::{DEFAULT_CATEGORY, Difficulty, DocumentRecord};
pub use crate::scan::{Corpus, MarkdownFile, ScanStats, markdown_files, open_root};
pub use crate::tag_index::{
    DEFAULT_INDEX_DIFFICULTY, IndexEntry, TagIndex, render_tag_index_document,
};
