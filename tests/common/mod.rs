//! Test renderer that needs no TeX installation.
//!
//! Every visible character of the markup becomes one 8x10 box, laid out left to right
//! 10 units apart. Control words count as one glyph unless they only affect layout
//! (`\quad`, `\centering`, ...). Braces, scripts markers, `&`, whitespace and `\\` draw nothing.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use locus_tex::tex::{ShapeBuilder, TexError, TexKind, TexRenderer};

const INVISIBLE_WORDS: &[&str] = &[
    "quad",
    "qquad",
    "centering",
    "left",
    "right",
    "big",
    "begin",
    "end",
    "substack",
    "displaystyle",
    "text",
];

pub struct GlyphBoxRenderer {
    dir: tempfile::TempDir,
    next_file: Cell<usize>,
    extra: HashMap<String, usize>,
    rendered: RefCell<Vec<(String, TexKind)>>,
}

impl GlyphBoxRenderer {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            next_file: Cell::new(0),
            extra: HashMap::new(),
            rendered: RefCell::new(Vec::new()),
        }
    }

    /// Emit `count` additional boxes whenever exactly `markup` is rendered.
    pub fn with_extra(mut self, markup: &str, count: usize) -> Self {
        self.extra.insert(markup.to_string(), count);
        self
    }

    /// Every `(markup, kind)` this renderer was asked for, in order.
    pub fn rendered(&self) -> Vec<(String, TexKind)> {
        self.rendered.borrow().clone()
    }
}

impl TexRenderer for GlyphBoxRenderer {
    fn render(&self, markup: &str, kind: TexKind) -> Result<PathBuf, TexError> {
        self.rendered.borrow_mut().push((markup.to_string(), kind));

        let n = visible_glyphs(markup) + self.extra.get(markup).copied().unwrap_or(0);
        let width = (10 * n).max(1);
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="10" viewBox="0 0 {width} 10">"#
        );
        for i in 0..n {
            let x = 10 * i;
            write!(svg, r#"<path d="M {x} 0 L {} 0 L {} 10 L {x} 10 Z"/>"#, x + 8, x + 8).unwrap();
        }
        svg.push_str("</svg>");

        let id = self.next_file.get();
        self.next_file.set(id + 1);
        let path = self.dir.path().join(format!("{id}.svg"));
        std::fs::write(&path, svg)?;
        Ok(path)
    }
}

/// Number of boxes `GlyphBoxRenderer` draws for `markup`.
pub fn visible_glyphs(markup: &str) -> usize {
    let mut count = 0;
    let mut chars = markup.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let mut word = String::new();
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_alphabetic() {
                        break;
                    }
                    word.push(next);
                    chars.next();
                }
                if word.is_empty() {
                    if let Some(escaped) = chars.next() {
                        count += usize::from(matches!(escaped, '{' | '}' | '%' | '$'));
                    }
                } else if !INVISIBLE_WORDS.contains(&word.as_str()) {
                    count += 1;
                }
            }
            '{' | '}' | '^' | '_' | '&' | '~' => {}
            c if c.is_whitespace() => {}
            _ => count += 1,
        }
    }
    count
}

pub fn builder() -> ShapeBuilder<GlyphBoxRenderer> {
    ShapeBuilder::new(GlyphBoxRenderer::new())
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}
