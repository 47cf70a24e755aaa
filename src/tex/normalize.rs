//! Markup repair before a string is handed to LaTeX.
//!
//! Every rewrite here is a heuristic that trades fidelity for "always renders":
//! - braces are balanced by count (nesting order is not validated)
//! - dangling operators get a `{\quad}` filler
//! - empty input becomes a blank `\quad`
//! - unmatched `\left`/`\right` pairs are downgraded to `\big`
//! - a half-open `array` environment blanks the whole string
//!
//! `normalize` never fails and never returns an empty string.

/// Group appended after operators that need an argument.
pub const FILLER: &str = "{\\quad}";

/// What empty (or unrenderable) markup turns into.
pub const BLANK: &str = "\\quad";

const LINE_BREAK: &str = "\\\\";
const LEFT_DELIMITER: &str = "\\left";
const RIGHT_DELIMITER: &str = "\\right";
const NEUTRAL_DELIMITER: &str = "\\big";
const DELIMITER_CHARS: &str = "(){}[]|.\\";
const CHECKED_ENVIRONMENTS: [&str; 1] = ["array"];

/// Prefix `alignment`, trim, and repair `text` so the backend can render it.
pub fn normalize(text: &str, alignment: &str) -> String {
    let prefixed = format!("{alignment} {text}");
    let mut tex = repair_braces(prefixed.trim());

    if needs_filler(&tex) {
        tex.push_str(FILLER);
    }

    if tex == "\\substack" || tex.is_empty() {
        tex = BLANK.to_string();
    }

    // Keep the first rendered line from being empty; every break gets the same pad.
    if tex.starts_with(LINE_BREAK) {
        tex = tex.replace(LINE_BREAK, &format!("{BLANK}{LINE_BREAK}"));
    }

    tex = repair_delimiters(&tex);

    if has_half_open_environment(&tex) {
        tex = BLANK.to_string();
    }

    tex
}

/// Pad the side with fewer braces until `{` and `}` counts match.
pub fn repair_braces(tex: &str) -> String {
    let lefts = tex.matches('{').count();
    let rights = tex.matches('}').count();

    let mut out = String::with_capacity(tex.len() + lefts.abs_diff(rights));
    for _ in lefts..rights {
        out.push('{');
    }
    out.push_str(tex);
    for _ in rights..lefts {
        out.push('}');
    }
    out
}

fn needs_filler(tex: &str) -> bool {
    matches!(tex, "\\over" | "\\overline" | "\\sqrt")
        || tex.ends_with('_')
        || tex.ends_with('^')
        || tex.ends_with("dot")
}

/// Byte offsets of `marker` occurrences that are immediately followed by a delimiter.
fn delimiter_markers(tex: &str, marker: &str) -> Vec<usize> {
    tex.match_indices(marker)
        .filter(|(at, _)| {
            tex[at + marker.len()..]
                .chars()
                .next()
                .is_some_and(|c| DELIMITER_CHARS.contains(c))
        })
        .map(|(at, _)| at)
        .collect()
}

/// Downgrade stretchy delimiters to `\big` when `\left` and `\right` do not pair up.
pub fn repair_delimiters(tex: &str) -> String {
    let lefts = delimiter_markers(tex, LEFT_DELIMITER);
    let rights = delimiter_markers(tex, RIGHT_DELIMITER);
    if lefts.len() == rights.len() {
        return tex.to_string();
    }

    let mut markers: Vec<(usize, usize)> = lefts
        .into_iter()
        .map(|at| (at, LEFT_DELIMITER.len()))
        .chain(rights.into_iter().map(|at| (at, RIGHT_DELIMITER.len())))
        .collect();
    markers.sort_unstable();

    let mut out = String::with_capacity(tex.len());
    let mut cursor = 0;
    for (at, len) in markers {
        out.push_str(&tex[cursor..at]);
        out.push_str(NEUTRAL_DELIMITER);
        cursor = at + len;
    }
    out.push_str(&tex[cursor..]);
    out
}

fn has_half_open_environment(tex: &str) -> bool {
    CHECKED_ENVIRONMENTS.iter().any(|env| {
        let begins = tex.contains(&format!("\\begin{{{env}}}"));
        let ends = tex.contains(&format!("\\end{{{env}}}"));
        begins != ends
    })
}
