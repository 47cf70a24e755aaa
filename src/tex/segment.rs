//! Breaking caller strings up so every isolated substring is its own element.

use regex::Regex;

use crate::tex::TexError;

/// Split each string so that every occurrence of an `isolate` substring becomes its own
/// element. Concatenating the output reproduces the concatenated input.
///
/// Matching is leftmost-first: at a given position the first listed substring that matches
/// wins, so list longer substrings first when they share a prefix. Empty isolate strings
/// are ignored and empty pieces are dropped.
///
/// `split_to_isolate(["to be or not to be"], ["to", "be"])` gives
/// `["to", " ", "be", " or not ", "to", " ", "be"]`.
pub fn split_to_isolate<S, I>(strings: &[S], isolate: I) -> Result<Vec<String>, TexError>
where
    S: AsRef<str>,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let alternatives: Vec<String> = isolate
        .into_iter()
        .filter(|s| !s.as_ref().is_empty())
        .map(|s| regex::escape(s.as_ref()))
        .collect();

    if alternatives.is_empty() {
        return Ok(strings
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect());
    }

    // Escaped literals always parse; only the compiled-size limit can reject them.
    let pattern = Regex::new(&alternatives.join("|"))
        .map_err(|e| TexError::InvalidConfig(format!("cannot isolate substrings: {e}")))?;

    let mut out = Vec::new();
    for s in strings {
        let s = s.as_ref();
        let mut cursor = 0;
        for m in pattern.find_iter(s) {
            out.push(&s[cursor..m.start()]);
            out.push(m.as_str());
            cursor = m.end();
        }
        out.push(&s[cursor..]);
    }
    Ok(out
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

/// Rewrite `strings` so every explicit substring and every color-map key is its own
/// element, in order.
///
/// With a single-space separator the pieces are trimmed (word mode); empty pieces are
/// always dropped.
pub fn segment<S: AsRef<str>>(
    strings: &[S],
    explicit_substrings: &[String],
    color_map_keys: &[&str],
    arg_separator: &str,
) -> Result<Vec<String>, TexError> {
    let isolate = explicit_substrings
        .iter()
        .map(String::as_str)
        .chain(color_map_keys.iter().copied());

    let split = split_to_isolate(strings, isolate)?;
    let word_mode = arg_separator == " ";

    Ok(split
        .into_iter()
        .map(|s| if word_mode { s.trim().to_string() } else { s })
        .filter(|s| !s.is_empty())
        .collect())
}
