//! Lookup, recoloring, indexing and reordering of assembled substring groups.
//!
//! Groups are matched by their tag (the substring they were built for). A match is either
//! containment (`substring`, the default) or exact equality, optionally ignoring case.
//! `find` never fails; the `*_one`/`index_of*` variants that must produce a value report
//! `TexError::PartNotFound` / `TexError::GroupNotFound` instead.

use crate::scene::Rgba;
use crate::tex::TexError;
use crate::tex::assemble::{ExpressionTree, GroupId, SubstringGroup};

/// How a query string is compared to group tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Match when the query is contained in the tag (otherwise require equality).
    pub substring: bool,
    pub case_sensitive: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            substring: true,
            case_sensitive: true,
        }
    }
}

impl MatchOptions {
    /// Exact, case-sensitive equality.
    pub fn exact() -> Self {
        Self {
            substring: false,
            case_sensitive: true,
        }
    }

    pub fn ignore_case() -> Self {
        Self {
            case_sensitive: false,
            ..Self::default()
        }
    }

    pub fn matches(&self, query: &str, tag: &str) -> bool {
        if self.case_sensitive {
            self.compare(query, tag)
        } else {
            self.compare(&query.to_lowercase(), &tag.to_lowercase())
        }
    }

    fn compare(&self, query: &str, tag: &str) -> bool {
        if self.substring {
            tag.contains(query)
        } else {
            tag == query
        }
    }
}

/// Key of a color map entry: one substring, or several sharing a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorKey {
    Single(String),
    Many(Vec<String>),
}

impl ColorKey {
    pub fn single(tex: impl Into<String>) -> Result<Self, TexError> {
        let tex = tex.into();
        if tex.is_empty() {
            return Err(TexError::InvalidColorKey(
                "empty string would match every part".to_string(),
            ));
        }
        Ok(Self::Single(tex))
    }

    pub fn many<I>(texs: I) -> Result<Self, TexError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let texs: Vec<String> = texs.into_iter().map(Into::into).collect();
        if texs.is_empty() {
            return Err(TexError::InvalidColorKey("empty key list".to_string()));
        }
        if texs.iter().any(String::is_empty) {
            return Err(TexError::InvalidColorKey(format!(
                "key list {texs:?} contains an empty string"
            )));
        }
        Ok(Self::Many(texs))
    }

    /// Every substring this key stands for.
    pub fn texs(&self) -> &[String] {
        match self {
            Self::Single(tex) => std::slice::from_ref(tex),
            Self::Many(texs) => texs,
        }
    }
}

impl TryFrom<&str> for ColorKey {
    type Error = TexError;

    fn try_from(tex: &str) -> Result<Self, TexError> {
        Self::single(tex)
    }
}

impl TryFrom<String> for ColorKey {
    type Error = TexError;

    fn try_from(tex: String) -> Result<Self, TexError> {
        Self::single(tex)
    }
}

impl TryFrom<Vec<String>> for ColorKey {
    type Error = TexError;

    fn try_from(texs: Vec<String>) -> Result<Self, TexError> {
        Self::many(texs)
    }
}

impl TryFrom<&[&str]> for ColorKey {
    type Error = TexError;

    fn try_from(texs: &[&str]) -> Result<Self, TexError> {
        Self::many(texs.iter().copied())
    }
}

impl<const N: usize> TryFrom<[&str; N]> for ColorKey {
    type Error = TexError;

    fn try_from(texs: [&str; N]) -> Result<Self, TexError> {
        Self::many(texs)
    }
}

/// Ordered `key → color` assignments; later entries win where keys overlap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorMap {
    entries: Vec<(ColorKey, Rgba)>,
}

impl ColorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the color for `key`. A replaced key keeps its position.
    pub fn insert(&mut self, key: ColorKey, color: Rgba) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = color,
            None => self.entries.push((key, color)),
        }
    }

    /// Builder form of `insert`.
    pub fn with<K>(mut self, key: K, color: Rgba) -> Result<Self, TexError>
    where
        K: TryInto<ColorKey, Error = TexError>,
    {
        self.insert(key.try_into()?, color);
        Ok(self)
    }

    /// Parse `tex=#RRGGBB` (several texs separated by `,` share the color).
    pub fn parse_entry(entry: &str) -> Result<(ColorKey, Rgba), TexError> {
        let (texs, hex) = entry.rsplit_once('=').ok_or_else(|| {
            TexError::InvalidColorKey(format!("expected TEX=#RRGGBB, got {entry:?}"))
        })?;
        let color = Rgba::from_hex(hex).ok_or_else(|| TexError::InvalidColor(hex.to_string()))?;
        let key = if texs.contains(',') {
            ColorKey::many(texs.split(','))?
        } else {
            ColorKey::single(texs)?
        };
        Ok((key, color))
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ColorKey, Rgba)> {
        self.entries.iter()
    }

    /// All substrings named by any key, in entry order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries
            .iter()
            .flat_map(|(key, _)| key.texs())
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ExpressionTree {
    /// Groups whose tag matches `tex`, in tree order.
    pub fn find(&self, tex: &str, opts: MatchOptions) -> Vec<&SubstringGroup> {
        self.groups
            .iter()
            .filter(|g| opts.matches(tex, g.tex()))
            .collect()
    }

    pub fn find_one(&self, tex: &str, opts: MatchOptions) -> Option<&SubstringGroup> {
        self.groups.iter().find(|g| opts.matches(tex, g.tex()))
    }

    /// Like `find_one`, but a miss is an error.
    pub fn get_one(&self, tex: &str, opts: MatchOptions) -> Result<&SubstringGroup, TexError> {
        self.find_one(tex, opts).ok_or_else(|| TexError::PartNotFound {
            tex: tex.to_string(),
        })
    }

    /// Recolor every matching group; returns how many matched.
    pub fn recolor_by(&mut self, tex: &str, color: Rgba, opts: MatchOptions) -> usize {
        let mut matched = 0;
        for group in self.groups.iter_mut().filter(|g| opts.matches(tex, g.tex())) {
            group.node_mut().set_color(color);
            matched += 1;
        }
        matched
    }

    pub fn recolor_by_map(&mut self, map: &ColorMap, opts: MatchOptions) {
        for (key, color) in map.iter() {
            for tex in key.texs() {
                let matched = self.recolor_by(tex, *color, opts);
                if matched == 0 {
                    log::debug!("tex: color key {tex:?} matched no part");
                }
            }
        }
    }

    /// Position of the group with `id` among the top-level groups.
    pub fn index_of(&self, id: GroupId) -> Result<usize, TexError> {
        self.groups
            .iter()
            .position(|g| g.id() == id)
            .ok_or(TexError::GroupNotFound(id))
    }

    pub fn index_of_tex(&self, tex: &str, opts: MatchOptions) -> Result<usize, TexError> {
        let id = self.get_one(tex, opts)?.id();
        self.index_of(id)
    }

    /// Stable sort of the groups by tag.
    pub fn sort_alphabetically(&mut self) {
        self.groups.sort_by(|a, b| a.tex().cmp(b.tex()));
    }

    /// Stable sort of the groups by the x coordinate of their centers.
    pub fn sort_left_to_right(&mut self) {
        self.groups
            .sort_by(|a, b| a.bounds().center()[0].total_cmp(&b.bounds().center()[0]));
    }
}
