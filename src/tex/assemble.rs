//! Substring tree assembly.
//!
//! The whole expression is rendered once; that flat leaf list is authoritative. Every
//! segmented substring is then rendered on its own purely to learn how many leaves it
//! contributes, and the flat list is cut into consecutive runs of those sizes.
//!
//! A substring that renders to nothing still gets a group holding a single point
//! placeholder, placed where the substring would sit:
//! - right after the preceding group (its right-center point), or
//! - at the left-center point of the first flat leaf when it comes first, or
//! - at the origin when the whole render is empty.
//!
//! If the counts do not add up to the flat length the two renders disagree, and assembly
//! fails with `TexError::ShapeCountMismatch` instead of producing a misaligned tree.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::scene::{Aabb2, LEFT, Mobject2D, ORIGIN, RIGHT};
use crate::tex::TexError;
use crate::tex::builder::{ShapeBuilder, SingleStringConfig};
use crate::tex::engine::TexRenderer;

static NEXT_GROUP_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a substring group; survives reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(u64);

impl GroupId {
    fn next() -> Self {
        Self(NEXT_GROUP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The leaves of one caller-visible substring.
///
/// Identity is the `GroupId`. A clone gets a fresh id, so it is never found in the tree
/// it was copied from.
#[derive(Debug)]
pub struct SubstringGroup {
    id: GroupId,
    tex: String,
    node: Mobject2D,
    placeholder: bool,
}

impl Clone for SubstringGroup {
    fn clone(&self) -> Self {
        Self {
            id: GroupId::next(),
            tex: self.tex.clone(),
            node: self.node.clone(),
            placeholder: self.placeholder,
        }
    }
}

impl SubstringGroup {
    fn new(tex: &str, leaves: Vec<Mobject2D>, placeholder: bool) -> Self {
        Self {
            id: GroupId::next(),
            tex: tex.to_string(),
            node: Mobject2D::group(tex, leaves),
            placeholder,
        }
    }

    #[inline]
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// The substring this group was built for.
    #[inline]
    pub fn tex(&self) -> &str {
        &self.tex
    }

    /// True when the substring rendered nothing and the group holds a point.
    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    #[inline]
    pub fn node(&self) -> &Mobject2D {
        &self.node
    }

    #[inline]
    pub fn node_mut(&mut self) -> &mut Mobject2D {
        &mut self.node
    }

    #[inline]
    pub fn leaves(&self) -> &[Mobject2D] {
        &self.node.children
    }

    #[inline]
    pub fn bounds(&self) -> Aabb2 {
        self.node.bounds()
    }

    /// Bounds of the first leaf, in the same space as `bounds()`.
    pub fn first_leaf_bounds(&self) -> Option<Aabb2> {
        let leaf = self.leaves().first()?;
        Some(leaf.bounds().transformed(self.node.local_from_parent))
    }

    /// Add `mobject` (positioned in the group's parent space) so it is drawn first.
    pub fn add_to_back(&mut self, mut mobject: Mobject2D) {
        if let Some(to_local) = self.node.local_from_parent.inverse() {
            mobject.apply_transform(to_local);
        }
        self.node.add_to_back(mobject);
    }

    pub fn into_mobject(self) -> Mobject2D {
        self.node
    }
}

/// Ordered substring groups of one expression.
#[derive(Debug, Clone, Default)]
pub struct ExpressionTree {
    pub(crate) groups: Vec<SubstringGroup>,
}

impl ExpressionTree {
    #[inline]
    pub fn groups(&self) -> &[SubstringGroup] {
        &self.groups
    }

    #[inline]
    pub fn groups_mut(&mut self) -> &mut [SubstringGroup] {
        &mut self.groups
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SubstringGroup> {
        self.groups.iter()
    }

    /// Leaves across all groups, placeholders included.
    pub fn leaf_count(&self) -> usize {
        self.groups.iter().map(|g| g.leaves().len()).sum()
    }

    pub fn bounds(&self) -> Aabb2 {
        self.groups
            .iter()
            .fold(Aabb2::empty(), |acc, g| acc.union(g.bounds()))
    }

    pub fn into_groups(self) -> Vec<SubstringGroup> {
        self.groups
    }
}

impl<'a> IntoIterator for &'a ExpressionTree {
    type Item = &'a SubstringGroup;
    type IntoIter = std::slice::Iter<'a, SubstringGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Render `whole` once, measure every substring, and partition the render.
pub fn assemble<R: TexRenderer>(
    builder: &ShapeBuilder<R>,
    whole: &str,
    substrings: &[String],
    config: &SingleStringConfig,
) -> Result<ExpressionTree, TexError> {
    let flat = builder.build_single(whole, config)?.leaves;

    let parts = substrings
        .iter()
        .map(|s| Ok((s.as_str(), builder.count(s, config.kind)?)))
        .collect::<Result<Vec<_>, TexError>>()?;

    partition(whole, flat, &parts)
}

/// Cut `flat` into consecutive groups sized by `parts`' counts.
///
/// Every flat leaf ends up in exactly one group; zero-count parts get a placeholder.
pub fn partition(
    whole: &str,
    flat: Vec<Mobject2D>,
    parts: &[(&str, usize)],
) -> Result<ExpressionTree, TexError> {
    let measured: usize = parts.iter().map(|(_, count)| count).sum();
    if measured != flat.len() {
        log::warn!(
            "tex: {whole:?} rendered {} shape(s) but its substrings account for {measured}",
            flat.len()
        );
        return Err(TexError::ShapeCountMismatch {
            tex: whole.to_string(),
            flat: flat.len(),
            measured,
        });
    }

    let first_anchor = flat
        .first()
        .map(|leaf| leaf.bounds().critical_point(LEFT))
        .unwrap_or(ORIGIN);

    let mut leaves = flat.into_iter();
    let mut groups: Vec<SubstringGroup> = Vec::with_capacity(parts.len());

    for &(tex, count) in parts {
        let group = if count == 0 {
            let at = groups
                .last()
                .map(|prev| prev.bounds().critical_point(RIGHT))
                .unwrap_or(first_anchor);
            SubstringGroup::new(tex, vec![Mobject2D::point("placeholder", at)], true)
        } else {
            SubstringGroup::new(tex, leaves.by_ref().take(count).collect(), false)
        };
        groups.push(group);
    }

    Ok(ExpressionTree { groups })
}
