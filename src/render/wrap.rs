//! Column-width reflow that never splits an atomic token.
//!
//! Javadoc inline tags like `{@link Sender#write()}` contain spaces but must
//! land on a single output line, as must `Type.Method()` call references.
//! The chunker therefore folds those spans into the surrounding word; a
//! chunk that alone exceeds the width overflows its line instead of being
//! broken.

use regex::Regex;
use std::sync::LazyLock;

static RE_ATOMIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{@[a-z]+\s[^}]*\}|[A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*\(\)")
        .unwrap()
});

/// Reflow `text` to `width` columns, prefixing the first line with
/// `initial_indent` and every further line with `subsequent_indent`.
///
/// Whitespace between chunks collapses to a single space. Whitespace-only
/// input yields no lines. Hyphens never produce break points.
pub fn wrap(text: &str, width: usize, initial_indent: &str, subsequent_indent: &str) -> Vec<String> {
    let chunks = chunks(text);
    if chunks.is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut line = String::from(initial_indent);
    let mut col = initial_indent.chars().count();
    let mut has_word = false;

    for chunk in chunks {
        let chunk_len = chunk.chars().count();
        if has_word && col + 1 + chunk_len > width {
            lines.push(line);
            line = String::from(subsequent_indent);
            col = subsequent_indent.chars().count();
            has_word = false;
        }
        if has_word {
            line.push(' ');
            col += 1;
        }
        line.push_str(&chunk);
        col += chunk_len;
        has_word = true;
    }
    lines.push(line);
    lines
}

/// Split `text` into wrap chunks: maximal whitespace-free runs, except that
/// whitespace inside an atomic span does not end a chunk.
fn chunks(text: &str) -> Vec<String> {
    let spans: Vec<(usize, usize)> = RE_ATOMIC
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    let mut out = Vec::new();
    let mut cur = String::new();
    let mut span_iter = spans.iter().peekable();
    let mut i = 0;

    while i < text.len() {
        if let Some(&&(start, end)) = span_iter.peek() {
            if start == i {
                cur.push_str(&text[start..end]);
                span_iter.next();
                i = end;
                continue;
            }
        }
        let ch = text[i..].chars().next().unwrap();
        if ch.is_whitespace() {
            if !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
            }
        } else {
            cur.push(ch);
        }
        i += ch.len_utf8();
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fill() {
        assert_eq!(wrap("one two three", 10, "", ""), vec!["one two", "three"]);
    }

    #[test]
    fn whitespace_only_input() {
        assert!(wrap("", 80, "", "").is_empty());
        assert!(wrap("   \n ", 80, "// ", "// ").is_empty());
    }

    #[test]
    fn indents_count_toward_width() {
        assert_eq!(
            wrap("aa bb cc", 8, "// ", "// "),
            vec!["// aa bb", "// cc"]
        );
    }

    #[test]
    fn link_tag_is_atomic() {
        let lines = wrap("see {@link Sender#write()} for details", 20, "// ", "// ");
        assert_eq!(
            lines,
            vec!["// see", "// {@link Sender#write()}", "// for details"]
        );
    }

    #[test]
    fn atomic_keeps_adjacent_punctuation() {
        let lines = wrap("x {@link Interface#AUDIO_SOURCE}.", 10, "", "");
        assert_eq!(lines, vec!["x", "{@link Interface#AUDIO_SOURCE}."]);
    }

    #[test]
    fn call_reference_never_splits() {
        let lines = wrap("call Sender.Write() then Sender.Close() last", 19, "", "");
        assert_eq!(lines, vec!["call Sender.Write()", "then Sender.Close()", "last"]);
    }

    #[test]
    fn overlong_chunk_overflows_alone() {
        let lines = wrap("a {@link VeryLongClassName#veryLongMethodName()} b", 20, "", "");
        assert_eq!(
            lines,
            vec!["a", "{@link VeryLongClassName#veryLongMethodName()}", "b"]
        );
    }

    #[test]
    fn collapses_inner_whitespace() {
        assert_eq!(wrap("a\n  b   c", 80, "", ""), vec!["a b c"]);
    }
}
