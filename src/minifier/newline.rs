//! Line-ending normalization
//!
//! Rewrites every line terminator to a single LF before any minifier runs,
//! so the compactors and external tools only ever see `\n`.

use std::borrow::Cow;

/// Normalize line endings to LF.
///
/// Three sequential passes over the bytes: `\n\r` to `\n`, then `\r\n` to
/// `\n`, then any remaining lone `\r` to `\n`. Returns the input unchanged
/// (borrowed) when it contains no carriage return.
///
/// # Examples
///
/// ```
/// use uniminify::minifier::newline::normalize;
///
/// assert_eq!(normalize(b"a\r\nb\rc").as_ref(), b"a\nb\nc");
/// assert_eq!(normalize(b"a\n\rb").as_ref(), b"a\nb");
/// ```
pub fn normalize(input: &[u8]) -> Cow<'_, [u8]> {
    if !input.contains(&b'\r') {
        return Cow::Borrowed(input);
    }

    let pass = collapse_pair(input, b'\n', b'\r');
    let pass = collapse_pair(&pass, b'\r', b'\n');
    let pass = pass
        .into_iter()
        .map(|b| if b == b'\r' { b'\n' } else { b })
        .collect();

    Cow::Owned(pass)
}

/// Replace every non-overlapping `first second` pair with a single `\n`.
fn collapse_pair(input: &[u8], first: u8, second: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == first && input.get(i + 1) == Some(&second) {
            out.push(b'\n');
            i += 2;
        } else {
            out.push(input[i]);
            i += 1;
        }
    }
    out
}
