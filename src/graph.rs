use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

use chrono::NaiveDateTime;

use crate::record::{Difficulty, capitalize, path_to_slash};
use crate::{Corpus, DocumentRecord};

/// Categories that get their own node colour.
pub const STYLED_CATEGORIES: [&str; 3] = ["practices", "concepts", "templates"];

const NODE_LABEL_CHARS: usize = 30;
const CATEGORY_LABEL_CHARS: usize = 20;

/// Mermaid node id for a corpus-relative note path.
///
/// `.md` is dropped and `/`, `\` and `-` become `_`. Ids with more than four
/// `_`-separated segments keep only the last three.
pub fn node_id(rel_path: &str) -> String {
    let stem = rel_path.strip_suffix(".md").unwrap_or(rel_path);
    let id: String = stem
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '-') { '_' } else { c })
        .collect();
    let parts: Vec<&str> = id.split('_').collect();
    if parts.len() > 4 {
        parts[parts.len() - 3..].join("_")
    } else {
        id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub title: String,
    pub category: String,
    pub difficulty: Option<Difficulty>,
}

impl GraphNode {
    fn from_record(rec: &DocumentRecord) -> Self {
        Self {
            id: node_id(&rec.path_slash()),
            title: rec.title.clone(),
            category: rec.category.clone(),
            difficulty: rec.difficulty_level(),
        }
    }

    pub fn style_class(&self) -> Option<&str> {
        STYLED_CATEGORIES
            .contains(&self.category.as_str())
            .then_some(self.category.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Relationship graph over the titled records of a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub categories: BTreeMap<String, Vec<GraphNode>>,
    /// Descending by count, ties alphabetical.
    pub tag_counts: Vec<TagCount>,
}

impl RelationGraph {
    pub fn build(corpus: &Corpus) -> Self {
        let mut graph = Self::default();
        let mut tag_counts: HashMap<&str, usize> = HashMap::new();

        for rec in corpus.records.iter().filter(|r| r.has_title()) {
            let node = GraphNode::from_record(rec);

            for related in &rec.related {
                let Some(target) = resolve_related(corpus.root(), related) else {
                    continue;
                };
                graph.edges.push(GraphEdge {
                    from: node.id.clone(),
                    to: node_id(&path_to_slash(&target)),
                });
            }
            for tag in &rec.tags {
                *tag_counts.entry(tag.as_str()).or_default() += 1;
            }

            graph
                .categories
                .entry(rec.category.clone())
                .or_default()
                .push(node.clone());
            graph.nodes.push(node);
        }

        graph.tag_counts = tag_counts
            .into_iter()
            .map(|(tag, count)| TagCount {
                tag: tag.to_string(),
                count,
            })
            .collect();
        graph
            .tag_counts
            .sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        graph
    }
}

/// Resolves a `related` entry against the corpus root. Entries that are
/// absolute, escape the root, or name no existing file resolve to `None`.
fn resolve_related(root: &Path, related: &str) -> Option<PathBuf> {
    let mut rel = PathBuf::new();
    for c in Path::new(related).components() {
        match c {
            Component::Normal(part) => rel.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !rel.pop() {
                    return None;
                }
            }
            Component::Prefix(_) | Component::RootDir => return None,
        }
    }
    if rel.as_os_str().is_empty() || !root.join(&rel).is_file() {
        return None;
    }
    Some(rel)
}

fn label(title: &str, max_chars: usize) -> String {
    title
        .chars()
        .take(max_chars)
        .collect::<String>()
        .replace('"', "#quot;")
}

pub fn render_graph_document(graph: &RelationGraph, generated_at: NaiveDateTime) -> String {
    let mut out = String::new();

    out.push_str("# Knowledge Graph (Mermaid)\n\n");
    out.push_str("> Relationships between notes, built from the `related` field of each note's frontmatter\n\n");
    out.push_str("## Legend\n\n");
    out.push_str("- 🟢 **Beginner** - for newcomers\n");
    out.push_str("- 🟡 **Intermediate** - some experience assumed\n");
    out.push_str("- 🔴 **Advanced** - deep dives\n\n");
    out.push_str("## Category colours\n\n");
    out.push_str("- 🔵 **Practices** - hands-on guides\n");
    out.push_str("- 🟢 **Concepts** - explanations of ideas\n");
    out.push_str("- 🟠 **Templates** - reusable templates\n\n");
    out.push_str("---\n\n");
    out.push_str("## Full graph\n\n");
    render_main_diagram(&mut out, graph);
    out.push_str("\n\n---\n\n");

    out.push_str("## Graphs by category\n\n");
    for (category, nodes) in &graph.categories {
        let _ = writeln!(out, "### {}\n", capitalize(category));
        out.push_str("```mermaid\n");
        out.push_str("graph LR\n");
        for node in nodes {
            let _ = writeln!(out, "    {}[\"{}\"]", node.id, label(&node.title, CATEGORY_LABEL_CHARS));
        }
        out.push_str("```\n\n");
    }

    out.push_str("---\n\n");
    out.push_str("## Documents per tag\n\n");
    out.push_str("| Tag | Documents |\n");
    out.push_str("|-----|-----------|\n");
    for tc in &graph.tag_counts {
        let _ = writeln!(out, "| `{}` | {} |", tc.tag, tc.count);
    }

    out.push_str("\n---\n\n");
    let _ = writeln!(
        out,
        "**Generated**: {} by `notemap graph`. Do not edit by hand.\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    out.push_str("**Regenerate**:\n");
    out.push_str("```bash\n");
    out.push_str("notemap graph\n");
    out.push_str("```\n");
    out
}

fn render_main_diagram(out: &mut String, graph: &RelationGraph) {
    let mut lines: Vec<String> = vec!["```mermaid".into(), "graph TD".into(), String::new()];

    lines.push("    %% styles".into());
    lines.push("    classDef practices fill:#3b82f6,stroke:#1e40af,color:#fff".into());
    lines.push("    classDef concepts fill:#10b981,stroke:#047857,color:#fff".into());
    lines.push("    classDef templates fill:#f59e0b,stroke:#d97706,color:#fff".into());
    lines.push("    classDef beginner fill:#22c55e,stroke:#16a34a,color:#fff".into());
    lines.push("    classDef intermediate fill:#eab308,stroke:#ca8a04,color:#000".into());
    lines.push("    classDef advanced fill:#ef4444,stroke:#dc2626,color:#fff".into());
    lines.push(String::new());

    lines.push("    %% nodes".into());
    for node in &graph.nodes {
        let icon = node
            .difficulty
            .map(|d| format!("{} ", d.emoji()))
            .unwrap_or_default();
        lines.push(format!(
            "    {}[\"{}{}\"]",
            node.id,
            icon,
            label(&node.title, NODE_LABEL_CHARS)
        ));
        if let Some(class) = node.style_class() {
            lines.push(format!("    class {} {}", node.id, class));
        }
    }
    lines.push(String::new());

    lines.push("    %% related notes".into());
    for edge in &graph.edges {
        lines.push(format!("    {} -.->|related| {}", edge.from, edge.to));
    }
    lines.push(String::new());
    lines.push("```".into());

    out.push_str(&lines.join("\n"));
}
