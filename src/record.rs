use std::path::{Path, PathBuf};

pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Parsed frontmatter of one note plus its corpus-relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Path relative to the corpus root; unique within a scan.
    pub path: PathBuf,
    /// Empty when the header has no title.
    pub title: String,
    pub tags: Vec<String>,
    pub category: String,
    pub difficulty: Option<String>,
    /// Note paths relative to the corpus root; not required to resolve.
    pub related: Vec<String>,
    pub language: Vec<String>,
}

impl DocumentRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            title: String::new(),
            tags: Vec::new(),
            category: DEFAULT_CATEGORY.to_string(),
            difficulty: None,
            related: Vec::new(),
            language: Vec::new(),
        }
    }

    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }

    /// Title, or the file stem when the header did not provide one.
    pub fn display_title(&self) -> String {
        if self.has_title() {
            return self.title.clone();
        }
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string()
    }

    pub fn difficulty_level(&self) -> Option<Difficulty> {
        self.difficulty.as_deref().and_then(Difficulty::parse)
    }

    /// Path with `/` separators regardless of platform.
    pub fn path_slash(&self) -> String {
        path_to_slash(&self.path)
    }
}

pub(crate) fn path_to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Beginner => "🟢",
            Self::Intermediate => "🟡",
            Self::Advanced => "🔴",
        }
    }
}

/// Marker for records whose difficulty is missing or unrecognized.
pub const UNKNOWN_DIFFICULTY_EMOJI: &str = "⚪";

/// First character upper-cased, the rest lower-cased.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Every alphabetic run starts upper-case, the rest of the run lower-case.
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_title_falls_back_to_stem() {
        let mut rec = DocumentRecord::new("practices/git-basics.md");
        assert_eq!(rec.display_title(), "git-basics");
        rec.title = "Git Basics".into();
        assert_eq!(rec.display_title(), "Git Basics");
    }

    #[test]
    fn difficulty_is_not_validated() {
        let mut rec = DocumentRecord::new("a.md");
        rec.difficulty = Some("expert".into());
        assert_eq!(rec.difficulty_level(), None);
        rec.difficulty = Some("advanced".into());
        assert_eq!(rec.difficulty_level(), Some(Difficulty::Advanced));
    }

    #[test]
    fn casing_helpers() {
        assert_eq!(capitalize("practices"), "Practices");
        assert_eq!(capitalize("dev-OPS"), "Dev-ops");
        assert_eq!(title_case("dev-ops tools"), "Dev-Ops Tools");
        assert_eq!(title_case(""), "");
    }
}
