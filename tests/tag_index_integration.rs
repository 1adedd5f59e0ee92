use std::path::Path;

use chrono::NaiveDate;
use notemap::{
    Corpus, Difficulty, ScanProfile, TagIndex, check_links, render_tag_index_document,
    write_document,
};

fn fixed_time() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 4)
        .and_then(|d| d.and_hms_opt(5, 6, 7))
        .expect("valid timestamp")
}

fn build(root: &std::path::Path) -> anyhow::Result<TagIndex> {
    Ok(TagIndex::build(&Corpus::scan(root, &ScanProfile::tags())?))
}

#[test]
fn record_appears_under_each_of_its_tags() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let root = temp.path();
    std::fs::write(
        root.join("go-testing.md"),
        "---\ntitle: Table tests\ntags: [go, testing]\ndifficulty: beginner\n---\n",
    )?;

    let index = build(root)?;
    assert_eq!(index.tags().collect::<Vec<_>>(), vec!["go", "testing"]);
    assert_eq!(index.with_tag("go").count(), 1);
    assert_eq!(index.with_tag("testing").count(), 1);

    let doc = render_tag_index_document(&index, fixed_time());
    assert!(doc.contains("### `go` (1 documents)\n\n- 🟢 [Table tests](go-testing.md) `#testing`\n"));
    assert!(doc.contains("### `testing` (1 documents)\n\n- 🟢 [Table tests](go-testing.md) `#go`\n"));

    Ok(())
}

#[test]
fn groups_are_sorted_by_title_and_fall_back_to_stem() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let root = temp.path();
    std::fs::write(root.join("b.md"), "---\ntitle: Zebra\ncategory: concepts\n---\n")?;
    std::fs::write(root.join("a.md"), "---\ntitle: Apple\ncategory: concepts\n---\n")?;
    std::fs::write(root.join("mango-notes.md"), "---\ncategory: concepts\n---\n")?;

    let index = build(root)?;
    let titles: Vec<_> = index
        .in_category("concepts")
        .map(|e| e.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Apple", "Zebra", "mango-notes"]);

    Ok(())
}

#[test]
fn difficulty_section_uses_fixed_order_and_skips_unknown_levels() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let root = temp.path();
    std::fs::write(
        root.join("adv.md"),
        "---\ntitle: Adv\ndifficulty: advanced\ntags: [a, b, c, d]\ncategory: dev-ops\n---\n",
    )?;
    std::fs::write(root.join("beg.md"), "---\ntitle: Beg\ndifficulty: beginner\n---\n")?;
    std::fs::write(root.join("none.md"), "---\ntitle: Unset\n---\n")?;
    std::fs::write(root.join("odd.md"), "---\ntitle: Odd\ndifficulty: expert\n---\n")?;

    let index = build(root)?;
    assert_eq!(index.at_difficulty(Difficulty::Intermediate).count(), 1);
    let unplaced: Vec<_> = index.unplaced().map(|e| e.title.as_str()).collect();
    assert_eq!(unplaced, vec!["Odd"]);

    let doc = render_tag_index_document(&index, fixed_time());
    let beginner = doc.find("### Beginner 🟢 (1 documents)").expect("beginner section");
    let intermediate = doc
        .find("### Intermediate 🟡 (1 documents)")
        .expect("intermediate section");
    let advanced = doc.find("### Advanced 🔴 (1 documents)").expect("advanced section");
    assert!(beginner < intermediate && intermediate < advanced);
    assert!(doc.contains("- [Adv](adv.md) `#a #b #c` *(dev-ops)*\n"));
    assert!(doc.contains("### Dev-Ops (1 documents)\n\n- 🔴 [Adv](adv.md) `#a #b #c`\n"));
    assert!(doc.contains("- ⚪ [Odd](odd.md)\n"));
    assert!(!doc.contains("- [Odd](odd.md)"));

    Ok(())
}

#[test]
fn statistics_and_idempotence() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let root = temp.path();
    std::fs::write(root.join("one.md"), "---\ntitle: One\ntags: [x, y]\n---\n")?;
    std::fs::write(root.join("two.md"), "---\ntitle: Two\ntags: [y]\ncategory: concepts\n---\n")?;
    std::fs::write(root.join("TAG_INDEX.md"), "---\ntitle: Generated\ntags: [self]\n---\n")?;

    let first = render_tag_index_document(&build(root)?, fixed_time());
    let second = render_tag_index_document(&build(root)?, fixed_time());
    assert_eq!(first, second);
    assert!(first.contains("- **Documents**: 2\n- **Tags**: 2\n- **Categories**: 2\n"));
    assert!(first.contains("Last updated: 2026-03-04 05:06:07"));
    assert!(!first.contains("`self`"));

    Ok(())
}

#[test]
fn index_in_a_subdirectory_links_back_to_the_notes() -> anyhow::Result<()> {
    let temp = tempfile::tempdir()?;
    let root = temp.path();
    std::fs::create_dir_all(root.join("concepts"))?;
    std::fs::write(
        root.join("concepts/a.md"),
        "---\ntitle: A\ntags: [x]\ncategory: concepts\ndifficulty: beginner\n---\n",
    )?;
    std::fs::write(root.join("my note.md"), "---\ntitle: Spaced\ntags: [x]\n---\n")?;

    let output = Path::new("generated/tags.md");
    let index = build(root)?.with_output_path(output);
    let doc = render_tag_index_document(&index, fixed_time());
    assert!(doc.contains("- 🟢 [A](../concepts/a.md) `#x`\n"));
    assert!(doc.contains("[Spaced](../my%20note.md)"));
    write_document(root, output, &doc)?;

    let report = check_links(root, &ScanProfile::links())?;
    assert!(report.is_ok(), "unexpected issues: {}", report.render());
    assert_eq!(report.local_links, 6);

    Ok(())
}
