use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::ScanProfile;
use crate::parse::extract_frontmatter;
use crate::{DocumentRecord, Error, Result};

/// Why files were left out of a scan. Diagnostic only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub markdown_files: usize,
    pub excluded: usize,
    pub without_frontmatter: usize,
    pub unreadable: usize,
}

/// One markdown file selected by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownFile {
    pub abs: PathBuf,
    /// Relative to the corpus root.
    pub rel: PathBuf,
}

/// Records of every note under a root that has a header block.
#[derive(Debug, Clone)]
pub struct Corpus {
    root: PathBuf,
    pub records: Vec<DocumentRecord>,
    pub stats: ScanStats,
}

impl Corpus {
    pub fn scan(root: &Path, profile: &ScanProfile) -> Result<Self> {
        let root = open_root(root)?;
        let (files, mut stats) = markdown_files(&root, profile)?;
        let mut records = Vec::with_capacity(files.len());

        for file in files {
            let content = match std::fs::read_to_string(&file.abs) {
                Ok(c) => c,
                Err(err) => {
                    warn!(path = %file.abs.display(), error = %err, "failed to read note");
                    stats.unreadable += 1;
                    continue;
                }
            };
            match extract_frontmatter(&file.rel, &content) {
                Some(rec) => records.push(rec),
                None => {
                    debug!(path = %file.rel.display(), "no frontmatter; skipped");
                    stats.without_frontmatter += 1;
                }
            }
        }

        info!(
            root = %root.display(),
            records = records.len(),
            excluded = stats.excluded,
            without_frontmatter = stats.without_frontmatter,
            unreadable = stats.unreadable,
            "corpus scanned"
        );

        Ok(Self {
            root,
            records,
            stats,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn record(&self, rel: &Path) -> Option<&DocumentRecord> {
        self.records.iter().find(|r| r.path == rel)
    }
}

/// Canonical form of a corpus root that exists and can be listed.
pub fn open_root(root: &Path) -> Result<PathBuf> {
    if !root.is_dir() {
        return Err(Error::RootNotFound(root.to_path_buf()));
    }
    let root = std::fs::canonicalize(root).map_err(|e| Error::io(root, e))?;
    std::fs::read_dir(&root).map_err(|e| Error::io(&root, e))?;
    Ok(root)
}

/// Enumerates `*.md` files under `root` in sorted relative-path order,
/// skipping whatever `profile` excludes.
pub fn markdown_files(root: &Path, profile: &ScanProfile) -> Result<(Vec<MarkdownFile>, ScanStats)> {
    let root = open_root(root)?;
    let root = root.as_path();
    let mut stats = ScanStats::default();
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "failed to walk directory entry");
                stats.unreadable += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        stats.markdown_files += 1;
        if profile.is_excluded(rel) {
            debug!(path = %rel.display(), "excluded by scan profile");
            stats.excluded += 1;
            continue;
        }
        files.push(MarkdownFile {
            abs: entry.path().to_path_buf(),
            rel: rel.to_path_buf(),
        });
    }

    files.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok((files, stats))
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}
