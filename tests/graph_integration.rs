use chrono::NaiveDate;
use notemap::{Corpus, GraphEdge, RelationGraph, ScanProfile, node_id, render_graph_document};

fn fixed_time() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .expect("valid timestamp")
}

#[test]
fn related_edge_is_drawn_only_when_target_exists() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let root = temp.path();
    std::fs::write(root.join("a.md"), "---\ntitle: A\nrelated: [b.md, c.md]\n---\n")?;
    std::fs::write(root.join("b.md"), "---\ntitle: B\n---\n")?;

    let corpus = Corpus::scan(root, &ScanProfile::graph())?;
    let graph = RelationGraph::build(&corpus);
    assert_eq!(
        graph.edges,
        vec![GraphEdge {
            from: "a".into(),
            to: "b".into(),
        }]
    );

    let doc = render_graph_document(&graph, fixed_time());
    assert!(doc.contains("    a -.->|related| b\n"));
    assert!(!doc.contains("|related| c"));

    std::fs::remove_file(root.join("b.md"))?;
    let corpus = Corpus::scan(root, &ScanProfile::graph())?;
    let graph = RelationGraph::build(&corpus);
    assert!(graph.edges.is_empty());

    Ok(())
}

#[test]
fn untitled_records_are_left_out_of_the_graph() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let root = temp.path();
    std::fs::write(root.join("titled.md"), "---\ntitle: Titled\ntags: [x]\n---\n")?;
    std::fs::write(root.join("untitled.md"), "---\ntags: [x, y]\n---\n")?;

    let graph = RelationGraph::build(&Corpus::scan(root, &ScanProfile::graph())?);
    let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["titled"]);
    assert_eq!(graph.tag_counts.len(), 1);
    assert_eq!(graph.tag_counts[0].count, 1);

    Ok(())
}

#[test]
fn nodes_carry_category_class_and_difficulty_marker() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let root = temp.path();
    std::fs::create_dir_all(root.join("practices"))?;
    std::fs::write(
        root.join("practices/docker-compose-networking-deep-dive.md"),
        "---\ntitle: Compose networking\ncategory: practices\ndifficulty: advanced\n---\n",
    )?;
    std::fs::write(
        root.join("misc.md"),
        "---\ntitle: Misc\ncategory: misc\ndifficulty: expert\n---\n",
    )?;

    let graph = RelationGraph::build(&Corpus::scan(root, &ScanProfile::graph())?);
    let doc = render_graph_document(&graph, fixed_time());

    let long_id = node_id("practices/docker-compose-networking-deep-dive.md");
    assert_eq!(long_id, "networking_deep_dive");
    assert!(doc.contains(&format!("    {long_id}[\"🔴 Compose networking\"]\n")));
    assert!(doc.contains(&format!("    class {long_id} practices\n")));
    assert!(doc.contains("    misc[\"Misc\"]\n"));
    assert!(!doc.contains("class misc"));
    assert!(doc.contains("### Practices\n"));
    assert!(doc.contains("### Misc\n"));

    Ok(())
}

#[test]
fn tag_table_sorts_by_count_then_name() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let root = temp.path();
    std::fs::write(root.join("one.md"), "---\ntitle: One\ntags: [zeta, beta, rust]\n---\n")?;
    std::fs::write(root.join("two.md"), "---\ntitle: Two\ntags: [rust, alpha]\n---\n")?;

    let graph = RelationGraph::build(&Corpus::scan(root, &ScanProfile::graph())?);
    let order: Vec<_> = graph
        .tag_counts
        .iter()
        .map(|t| (t.tag.as_str(), t.count))
        .collect();
    assert_eq!(
        order,
        vec![("rust", 2), ("alpha", 1), ("beta", 1), ("zeta", 1)]
    );

    let doc = render_graph_document(&graph, fixed_time());
    assert!(doc.contains("| `rust` | 2 |\n| `alpha` | 1 |\n"));

    Ok(())
}

#[test]
fn rendering_is_stable_for_unchanged_input() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let root = temp.path();
    std::fs::create_dir_all(root.join("concepts"))?;
    std::fs::write(
        root.join("concepts/ownership.md"),
        "---\ntitle: Ownership\ncategory: concepts\ntags: [rust]\nrelated: [concepts/borrowing.md]\n---\n",
    )?;
    std::fs::write(
        root.join("concepts/borrowing.md"),
        "---\ntitle: Borrowing\ncategory: concepts\ntags: [rust]\n---\n",
    )?;

    let first = render_graph_document(
        &RelationGraph::build(&Corpus::scan(root, &ScanProfile::graph())?),
        fixed_time(),
    );
    let second = render_graph_document(
        &RelationGraph::build(&Corpus::scan(root, &ScanProfile::graph())?),
        fixed_time(),
    );
    assert_eq!(first, second);
    assert!(first.contains("2026-01-02 03:04:05"));
    assert!(first.contains("concepts_ownership -.->|related| concepts_borrowing"));

    Ok(())
}
