use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Component, Path};

use chrono::NaiveDateTime;
use tracing::warn;

use crate::record::{Difficulty, UNKNOWN_DIFFICULTY_EMOJI, title_case};
use crate::{Corpus, DocumentRecord};

/// Difficulty assumed for records whose header has none.
pub const DEFAULT_INDEX_DIFFICULTY: &str = "intermediate";

const TAGS_PER_LINE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Corpus-relative path with `/` separators.
    pub path: String,
    pub title: String,
    pub tags: Vec<String>,
    pub category: String,
    pub difficulty: String,
}

impl IndexEntry {
    fn from_record(rec: &DocumentRecord) -> Self {
        Self {
            path: rec.path_slash(),
            title: rec.display_title(),
            tags: rec.tags.clone(),
            category: rec.category.clone(),
            difficulty: rec
                .difficulty
                .clone()
                .unwrap_or_else(|| DEFAULT_INDEX_DIFFICULTY.to_string()),
        }
    }

    pub fn difficulty_emoji(&self) -> &'static str {
        Difficulty::parse(&self.difficulty)
            .map(Difficulty::emoji)
            .unwrap_or(UNKNOWN_DIFFICULTY_EMOJI)
    }

    /// Markdown link to the note, with `prefix` leading back to the corpus root.
    fn link(&self, prefix: &str) -> String {
        format!("[{}]({}{})", self.title, prefix, self.path.replace(' ', "%20"))
    }
}

/// Records grouped three ways. Groups hold indices into `entries`, sorted by
/// title.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    entries: Vec<IndexEntry>,
    by_tag: BTreeMap<String, Vec<usize>>,
    by_category: BTreeMap<String, Vec<usize>>,
    by_difficulty: BTreeMap<String, Vec<usize>>,
    /// `../` once per directory level of the output document.
    link_prefix: String,
}

impl TagIndex {
    pub fn build(corpus: &Corpus) -> Self {
        let mut idx = Self::default();
        for rec in &corpus.records {
            let entry = IndexEntry::from_record(rec);
            let ix = idx.entries.len();
            for tag in &entry.tags {
                idx.by_tag.entry(tag.clone()).or_default().push(ix);
            }
            idx.by_category
                .entry(entry.category.clone())
                .or_default()
                .push(ix);
            idx.by_difficulty
                .entry(entry.difficulty.clone())
                .or_default()
                .push(ix);
            idx.entries.push(entry);
        }

        let entries = &idx.entries;
        for group in idx
            .by_tag
            .values_mut()
            .chain(idx.by_category.values_mut())
            .chain(idx.by_difficulty.values_mut())
        {
            group.sort_by(|a, b| entries[*a].title.cmp(&entries[*b].title));
        }

        for (difficulty, group) in &idx.by_difficulty {
            if Difficulty::parse(difficulty).is_none() {
                warn!(
                    difficulty = %difficulty,
                    records = group.len(),
                    "unrecognized difficulty; records left out of the difficulty section"
                );
            }
        }
        idx
    }

    /// Makes links relative to the directory of `output`, a path relative to
    /// the corpus root.
    pub fn with_output_path(mut self, output: &Path) -> Self {
        let mut depth = 0usize;
        for c in output.parent().into_iter().flat_map(Path::components) {
            match c {
                Component::Normal(_) => depth += 1,
                Component::ParentDir => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        self.link_prefix = "../".repeat(depth);
        self
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn tag_count(&self) -> usize {
        self.by_tag.len()
    }

    pub fn category_count(&self) -> usize {
        self.by_category.len()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.by_tag.keys().map(String::as_str)
    }

    pub fn with_tag(&self, tag: &str) -> impl Iterator<Item = &IndexEntry> {
        self.group(self.by_tag.get(tag))
    }

    pub fn in_category(&self, category: &str) -> impl Iterator<Item = &IndexEntry> {
        self.group(self.by_category.get(category))
    }

    pub fn at_difficulty(&self, difficulty: Difficulty) -> impl Iterator<Item = &IndexEntry> {
        self.group(self.by_difficulty.get(difficulty.as_str()))
    }

    /// Entries whose difficulty is none of the recognized levels. They have
    /// no place in the difficulty section.
    pub fn unplaced(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries
            .iter()
            .filter(|e| Difficulty::parse(&e.difficulty).is_none())
    }

    fn group<'a>(&'a self, ixs: Option<&'a Vec<usize>>) -> impl Iterator<Item = &'a IndexEntry> {
        ixs.into_iter().flatten().map(|ix| &self.entries[*ix])
    }
}

fn tag_suffix<'a>(tags: impl Iterator<Item = &'a String>) -> String {
    let shown: Vec<String> = tags.take(TAGS_PER_LINE).map(|t| format!("#{t}")).collect();
    if shown.is_empty() {
        String::new()
    } else {
        format!(" `{}`", shown.join(" "))
    }
}

pub fn render_tag_index_document(index: &TagIndex, generated_at: NaiveDateTime) -> String {
    let mut out = String::new();

    out.push_str("# Tag Index\n\n");
    out.push_str("> Generated index of notes by tag, category and difficulty\n\n");
    let _ = writeln!(
        out,
        "Last updated: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    out.push_str("---\n\n");

    out.push_str("## 📊 Statistics\n\n");
    let _ = writeln!(out, "- **Documents**: {}", index.entries.len());
    let _ = writeln!(out, "- **Tags**: {}", index.tag_count());
    let _ = writeln!(out, "- **Categories**: {}\n", index.category_count());
    out.push_str("---\n\n");

    out.push_str("## 🏷️ By tag\n\n");
    for (tag, group) in &index.by_tag {
        let _ = writeln!(out, "### `{}` ({} documents)\n", tag, group.len());
        for entry in group.iter().map(|ix| &index.entries[*ix]) {
            let others = tag_suffix(entry.tags.iter().filter(|t| *t != tag));
            let link = entry.link(&index.link_prefix);
            let _ = writeln!(out, "- {} {}{}", entry.difficulty_emoji(), link, others);
        }
        out.push('\n');
    }
    out.push_str("---\n\n");

    out.push_str("## 📁 By category\n\n");
    for (category, group) in &index.by_category {
        let _ = writeln!(out, "### {} ({} documents)\n", title_case(category), group.len());
        for entry in group.iter().map(|ix| &index.entries[*ix]) {
            let tags = tag_suffix(entry.tags.iter());
            let link = entry.link(&index.link_prefix);
            let _ = writeln!(out, "- {} {}{}", entry.difficulty_emoji(), link, tags);
        }
        out.push('\n');
    }
    out.push_str("---\n\n");

    out.push_str("## 📈 By difficulty\n\n");
    for difficulty in Difficulty::ALL {
        let Some(group) = index.by_difficulty.get(difficulty.as_str()) else {
            continue;
        };
        let _ = writeln!(
            out,
            "### {} {} ({} documents)\n",
            difficulty.label(),
            difficulty.emoji(),
            group.len()
        );
        for entry in group.iter().map(|ix| &index.entries[*ix]) {
            let tags = tag_suffix(entry.tags.iter());
            let link = entry.link(&index.link_prefix);
            let _ = writeln!(out, "- {}{} *({})*", link, tags, entry.category);
        }
        out.push('\n');
    }
    out.push_str("---\n\n");

    out.push_str("## 🔄 Regenerating\n\n");
    out.push_str("This file is generated. Do not edit it by hand.\n\n");
    out.push_str("```bash\n");
    out.push_str("# rebuild the index\n");
    out.push_str("notemap tags\n");
    out.push_str("```\n\n");
    out.push_str("---\n\n");
    out.push_str("> Generated by `notemap tags`\n");
    out
}
