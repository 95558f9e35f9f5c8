use tripforge::diff::{diff_opcodes, render_visual_diff, OpTag};

/// Rebuild the new document from the new-side spans of the opcodes.
fn reconstruct_new(old: &str, new: &str) -> String {
    let new_chars: Vec<char> = new.chars().collect();
    diff_opcodes(old, new)
        .iter()
        .filter(|op| op.tag != OpTag::Delete)
        .map(|op| new_chars[op.new_start..op.new_end].iter().collect::<String>())
        .collect()
}

/// Rebuild the old document from the old-side spans of the opcodes.
fn reconstruct_old(old: &str, new: &str) -> String {
    let old_chars: Vec<char> = old.chars().collect();
    diff_opcodes(old, new)
        .iter()
        .filter(|op| op.tag != OpTag::Insert)
        .map(|op| old_chars[op.old_start..op.old_end].iter().collect::<String>())
        .collect()
}

#[test]
fn test_opcodes_reconstruct_both_sides() {
    let cases = [
        ("", ""),
        ("", "# New Document"),
        ("# Old Document", ""),
        ("# Plan\nDay 1: temples", "# Plan\nDay 1: temples\nDay 2: markets"),
        ("The quick brown fox", "The slow brown cat"),
        ("unicode: café ☕", "unicode: cafés ☕☕"),
    ];

    for (old, new) in cases {
        assert_eq!(reconstruct_new(old, new), new, "new side for {:?}", (old, new));
        assert_eq!(reconstruct_old(old, new), old, "old side for {:?}", (old, new));
    }
}

#[test]
fn test_single_word_replacement_opcodes() {
    let ops = diff_opcodes("A B C", "A X C");
    let tags: Vec<OpTag> = ops.iter().map(|op| op.tag).collect();
    assert_eq!(tags, vec![OpTag::Equal, OpTag::Replace, OpTag::Equal]);

    // The replaced span is exactly the middle character on both sides.
    assert_eq!((ops[1].old_start, ops[1].old_end), (2, 3));
    assert_eq!((ops[1].new_start, ops[1].new_end), (2, 3));
}

#[test]
fn test_opcodes_are_ordered_and_cover_inputs() {
    let old = "# Plan\nDay 1\nDay 2\n";
    let new = "# Plan v2\nDay 1\nDay 3\n";
    let ops = diff_opcodes(old, new);

    let mut old_pos = 0;
    let mut new_pos = 0;
    for op in &ops {
        assert_eq!(op.old_start, old_pos);
        assert_eq!(op.new_start, new_pos);
        old_pos = op.old_end;
        new_pos = op.new_end;
    }
    assert_eq!(old_pos, old.chars().count());
    assert_eq!(new_pos, new.chars().count());
}

#[test]
fn test_visual_diff_marks_replacement() {
    let html = render_visual_diff("A B C", "A X C");
    assert!(html.starts_with("<style>"));
    assert!(html.contains("<span class=\"removed\">B</span>"));
    assert!(html.contains("<span class=\"added\">X</span>"));
    assert!(html.contains("<span class=\"unchanged\">A </span>"));
}

#[test]
fn test_visual_diff_identical_inputs_returns_plain_content() {
    let content = "# Same Document\nNothing changed";
    let html = render_visual_diff(content, content);
    assert_eq!(html, content);
}

#[test]
fn test_visual_diff_escapes_html() {
    let html = render_visual_diff("", "<h1>Tokyo & Kyoto</h1>");
    assert!(html.contains("&lt;h1&gt;Tokyo &amp; Kyoto&lt;/h1&gt;"));
    assert!(!html.contains("<h1>"));
}

#[test]
fn test_visual_diff_whitespace_only_spans_are_omitted() {
    let html = render_visual_diff("a b", "a  b");
    assert!(!html.contains("class=\"added\""));
    assert!(!html.contains("class=\"removed\""));
    // The inserted space produces no span at all.
    assert!(!html.contains("<span class=\"added\"> </span>"));
    assert!(html.contains("<span class=\"unchanged\">a </span>"));
}

#[test]
fn test_visual_diff_omits_whitespace_only_unchanged_spans() {
    // The only shared material is the space between the words.
    let html = render_visual_diff("xx yy", "zz ww");
    assert!(!html.contains("class=\"unchanged\""));
    assert!(html.contains("<span class=\"removed\">xx</span>"));
    assert!(html.contains("<span class=\"added\">zz</span>"));
}
