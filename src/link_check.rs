use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

use tracing::{info, warn};

use crate::config::ScanProfile;
use crate::parse::{InlineLink, extract_inline_links};
use crate::scan::{MarkdownFile, markdown_files, open_root};
use crate::Result;

/// A local link whose target does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkIssue {
    /// Referencing file, relative to the corpus root.
    pub source: PathBuf,
    /// 1-based line number.
    pub line: u32,
    pub text: String,
    /// Target as written in the file.
    pub target: String,
    /// Absolute path the target resolved to.
    pub resolved: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkReport {
    root: PathBuf,
    pub files_checked: usize,
    pub local_links: usize,
    pub unreadable: usize,
    /// In file scan order, then line order.
    pub issues: Vec<LinkIssue>,
}

impl LinkReport {
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// `0` when every link resolves, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_ok() { 0 } else { 1 }
    }

    /// Resolved path of an issue, relative to the root when it lies inside it.
    pub fn display_resolved(&self, issue: &LinkIssue) -> PathBuf {
        issue
            .resolved
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| issue.resolved.clone())
    }

    /// Human-readable report grouped by file.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.is_ok() {
            out.push_str("✅ No broken links found\n");
            return out;
        }

        let _ = writeln!(out, "❌ Found {} broken link(s):", self.issues.len());
        let mut current: Option<&Path> = None;
        for issue in &self.issues {
            if current != Some(issue.source.as_path()) {
                current = Some(issue.source.as_path());
                let _ = writeln!(out, "\n📄 {}", issue.source.display());
            }
            let _ = writeln!(
                out,
                "   line {}: [{}]({})",
                issue.line, issue.text, issue.target
            );
            let _ = writeln!(
                out,
                "      → {} not found",
                self.display_resolved(issue).display()
            );
        }
        out
    }
}

/// Checks every inline link of every markdown file under `root`. Files are
/// checked whether or not they carry a header block.
pub fn check_links(root: &Path, profile: &ScanProfile) -> Result<LinkReport> {
    let root = open_root(root)?;
    let (files, stats) = markdown_files(&root, profile)?;
    let mut report = LinkReport {
        root,
        unreadable: stats.unreadable,
        ..LinkReport::default()
    };

    for file in &files {
        let content = match std::fs::read_to_string(&file.abs) {
            Ok(c) => c,
            Err(err) => {
                warn!(path = %file.abs.display(), error = %err, "failed to read note");
                report.unreadable += 1;
                continue;
            }
        };
        report.files_checked += 1;
        for link in extract_inline_links(&content).into_iter().filter(InlineLink::is_local) {
            report.local_links += 1;
            if let Some(issue) = check_link(file, link) {
                report.issues.push(issue);
            }
        }
    }

    info!(
        files = report.files_checked,
        links = report.local_links,
        broken = report.issues.len(),
        "link check finished"
    );
    Ok(report)
}

fn check_link(file: &MarkdownFile, link: InlineLink) -> Option<LinkIssue> {
    let dir = file.abs.parent().unwrap_or(Path::new("/"));
    let resolved = resolve_link_target(dir, &link.target);
    if resolved.exists() {
        return None;
    }
    Some(LinkIssue {
        source: file.rel.clone(),
        line: link.line,
        text: link.text,
        target: link.raw_target,
        resolved,
    })
}

/// Joins `target` onto `dir`, folds `.` and `..` lexically, then
/// percent-decodes the result.
pub fn resolve_link_target(dir: &Path, target: &str) -> PathBuf {
    let mut joined = PathBuf::new();
    for c in dir.join(target).components() {
        match c {
            Component::ParentDir => {
                if !joined.pop() && !joined.has_root() {
                    joined.push(c);
                }
            }
            Component::CurDir => {}
            other => joined.push(other),
        }
    }
    let raw = joined.to_string_lossy();
    match urlencoding::decode(&raw) {
        Ok(decoded) => PathBuf::from(decoded.into_owned()),
        Err(_) => joined.clone(),
    }
}
