use std::sync::LazyLock;

use regex::Regex;

static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("inline link regex is valid")
});

const EXTERNAL_PREFIXES: [&str; 3] = ["http://", "https://", "mailto:"];

/// One `[text](target)` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineLink {
    pub text: String,
    /// Target as written, fragment included.
    pub raw_target: String,
    /// Target with any `#fragment` removed.
    pub target: String,
    /// 1-based line number.
    pub line: u32,
}

impl InlineLink {
    pub fn is_external(&self) -> bool {
        EXTERNAL_PREFIXES.iter().any(|p| self.target.starts_with(p))
    }

    /// Links that point at a local file: not empty after fragment removal and
    /// not an external scheme.
    pub fn is_local(&self) -> bool {
        !self.target.is_empty() && !self.is_external()
    }
}

pub fn extract_inline_links(content: &str) -> Vec<InlineLink> {
    let mut out = Vec::new();
    for (line_ix, line) in content.lines().enumerate() {
        for cap in INLINE_LINK.captures_iter(line) {
            let raw_target = cap[2].to_string();
            let target = match raw_target.split_once('#') {
                Some((before, _)) => before.to_string(),
                None => raw_target.clone(),
            };
            out.push(InlineLink {
                text: cap[1].to_string(),
                raw_target,
                target,
                line: line_ix as u32 + 1,
            });
        }
    }
    out
}
