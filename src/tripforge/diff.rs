//! Character-level diff and HTML rendering between document versions.
//!
//! The opcode model follows the classic longest-matching-block approach:
//! recursively find the longest common substring, emit an opcode for the
//! mismatched material on each side, recurse left and right. Opcodes cover
//! both inputs completely and in order, so the new document can always be
//! reconstructed from them.

/// What happened to a span of characters between the old and new document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    /// Span present in both documents.
    Equal,
    /// Span present only in the new document.
    Insert,
    /// Span present only in the old document.
    Delete,
    /// Old span replaced wholesale by a new span.
    Replace,
}

/// One diff opcode: `old[old_start..old_end]` versus `new[new_start..new_end]`.
///
/// Ranges are indices into the documents' `char` sequences, not byte offsets.
/// For `Insert` the old range is empty; for `Delete` the new range is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub old_start: usize,
    pub old_end: usize,
    pub new_start: usize,
    pub new_end: usize,
}

/// Compute character-level opcodes describing how `old` becomes `new`.
///
/// Opcodes are emitted in document order, with adjacent opcodes never sharing
/// a tag, and together they tile both inputs: concatenating the new-side spans
/// of every `Equal`, `Insert` and `Replace` opcode reproduces `new` exactly.
pub fn diff_opcodes(old: &str, new: &str) -> Vec<Opcode> {
    let a: Vec<char> = old.chars().collect();
    let b: Vec<char> = new.chars().collect();
    let mut opcodes = Vec::new();
    fill_opcodes(&a, &b, 0, a.len(), 0, b.len(), &mut opcodes);
    opcodes
}

fn fill_opcodes(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
    out: &mut Vec<Opcode>,
) {
    let (i, j, k) = longest_match(a, b, a_lo, a_hi, b_lo, b_hi);
    if k == 0 {
        // No common material left in this window.
        let tag = match (a_lo < a_hi, b_lo < b_hi) {
            (true, true) => OpTag::Replace,
            (true, false) => OpTag::Delete,
            (false, true) => OpTag::Insert,
            (false, false) => return,
        };
        out.push(Opcode {
            tag,
            old_start: a_lo,
            old_end: a_hi,
            new_start: b_lo,
            new_end: b_hi,
        });
        return;
    }

    fill_opcodes(a, b, a_lo, i, b_lo, j, out);
    out.push(Opcode {
        tag: OpTag::Equal,
        old_start: i,
        old_end: i + k,
        new_start: j,
        new_end: j + k,
    });
    fill_opcodes(a, b, i + k, a_hi, j + k, b_hi, out);
}

/// Longest block common to `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
///
/// Returns `(i, j, k)` with `a[i..i+k] == b[j..j+k]`. Ties go to the earliest
/// block in `a`, then the earliest in `b`, which keeps opcode output stable.
fn longest_match(
    a: &[char],
    b: &[char],
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    use std::collections::HashMap;

    let mut best = (a_lo, b_lo, 0usize);
    // j2len[j] = length of the common run ending at a[i], b[j].
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for i in a_lo..a_hi {
        let mut new_j2len: HashMap<usize, usize> = HashMap::new();
        for j in b_lo..b_hi {
            if a[i] == b[j] {
                let k = j
                    .checked_sub(1)
                    .and_then(|p| j2len.get(&p).copied())
                    .unwrap_or(0)
                    + 1;
                new_j2len.insert(j, k);
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            }
        }
        j2len = new_j2len;
    }
    best
}

/// Render an HTML visual diff between two document versions.
///
/// Produces a standalone fragment: a `<style>` block followed by the new
/// document's text wrapped in `<span>` elements classed `added`, `removed` or
/// `unchanged`. Deleted spans appear struck through so a reviewer can see
/// what a stage removed. Whitespace-only spans are omitted regardless of tag,
/// so pure reformatting produces no highlights.
///
/// When the two versions are identical the new content is returned unstyled.
pub fn render_visual_diff(old: &str, new: &str) -> String {
    if old == new {
        return new.to_string();
    }

    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();
    let opcodes = diff_opcodes(old, new);

    let mut body = String::new();
    for op in &opcodes {
        let old_span: String = old_chars[op.old_start..op.old_end].iter().collect();
        let new_span: String = new_chars[op.new_start..op.new_end].iter().collect();
        match op.tag {
            OpTag::Equal => push_span(&mut body, "unchanged", &new_span),
            OpTag::Insert => push_span(&mut body, "added", &new_span),
            OpTag::Delete => push_span(&mut body, "removed", &old_span),
            OpTag::Replace => {
                push_span(&mut body, "removed", &old_span);
                push_span(&mut body, "added", &new_span);
            }
        }
    }

    format!("{}{}", DIFF_STYLE, body)
}

fn push_span(out: &mut String, class: &str, text: &str) {
    // Whitespace churn is noise, drop the span.
    if text.trim().is_empty() {
        return;
    }
    out.push_str(&format!(
        "<span class=\"{}\">{}</span>",
        class,
        escape_html(text)
    ));
}

/// Minimal HTML escape. Only `&`, `<` and `>` are rewritten; quotes stay as-is
/// since the output is element text, never an attribute value.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

const DIFF_STYLE: &str = "<style>\n\
    .added { background-color: #d4edda; color: #155724; padding: 1px 2px; border-radius: 2px; }\n\
    .removed { background-color: #f8d7da; color: #721c24; text-decoration: line-through; padding: 1px 2px; border-radius: 2px; }\n\
    .unchanged { color: inherit; }\n\
</style>\n";
