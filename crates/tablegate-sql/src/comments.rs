//! Comment stripping.
//!
//! Runs before any extraction so commented-out table references are never
//! seen. String literals and quoted identifiers are copied verbatim, so `--`
//! or `/*` inside them is not mistaken for a comment.

/// Remove `--` line comments and `/* ... */` block comments.
///
/// Each comment is replaced by a single space so the tokens around it stay
/// separate. An unterminated block comment is kept as text: dropping the
/// rest of the query could hide table names.
pub fn strip_comments(sql: &str) -> String {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len());
    let mut i = 0;
    let mut copied_from = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                i = skip_quoted(bytes, i, quote);
            }
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                out.push_str(&sql[copied_from..i]);
                out.push(' ');
                i = sql[i..].find('\n').map(|off| i + off).unwrap_or(bytes.len());
                copied_from = i;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => match sql[i + 2..].find("*/") {
                Some(off) => {
                    out.push_str(&sql[copied_from..i]);
                    out.push(' ');
                    i = i + 2 + off + 2;
                    copied_from = i;
                }
                None => {
                    tracing::debug!(offset = i, "unterminated block comment left in place");
                    i += 2;
                }
            },
            _ => i += 1,
        }
    }

    out.push_str(&sql[copied_from..]);
    out
}

/// Index just past the quoted run starting at `start`. A doubled quote is an
/// escaped quote; an unterminated run extends to the end of input.
fn skip_quoted(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}
