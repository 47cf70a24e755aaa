//! Scene graph abstractions consumed by the TeX layer.
//!
//! This module follows manim's mental model:
//! - You build a picture out of objects ("mobjects").
//! - A mobject is a node with a local transform, optional geometry, and children.
//! - Renderers consume a flattened list of draw items (meshes + fill + z-order).
//!
//! Coordinate system:
//! - World units match manim's frame: the visible frame is `FRAME_WIDTH` x `FRAME_HEIGHT`
//!   units centered on the origin, +y up.
//! - Layout helpers (`shift`, `next_to`, `to_edge`, ...) operate in the
//!   **parent space** of the node they are called on, i.e. on `local_from_parent`.
//!
//! Notes:
//! - This file intentionally does not depend on any TeX or SVG types.
//! - Geometry payloads are CPU triangle meshes; renderer upload is out of scope here.

/// Unit direction vectors (world units, +y up).
pub const ORIGIN: [f32; 2] = [0.0, 0.0];
pub const UP: [f32; 2] = [0.0, 1.0];
pub const DOWN: [f32; 2] = [0.0, -1.0];
pub const LEFT: [f32; 2] = [-1.0, 0.0];
pub const RIGHT: [f32; 2] = [1.0, 0.0];

pub const SMALL_BUFF: f32 = 0.1;
pub const MED_SMALL_BUFF: f32 = 0.25;
pub const MED_LARGE_BUFF: f32 = 0.5;

pub const FRAME_HEIGHT: f32 = 8.0;
pub const FRAME_WIDTH: f32 = FRAME_HEIGHT * 16.0 / 9.0;

/// 2D affine transform stored as a 3x3 matrix in column-major order.
///
/// Convention:
/// - Column vectors (x, y, 1)
/// - Composition is `world_from_local = parent * local`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine2 {
    /// Column-major 3x3 matrix.
    pub m: [[f32; 3]; 3],
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2 {
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [tx, ty, 1.0]],
        }
    }

    #[inline]
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Uniform scale about a fixed point `about`.
    #[inline]
    pub fn scale_about(factor: f32, about: [f32; 2]) -> Self {
        Self::translate(about[0], about[1])
            .mul(Self::scale(factor, factor))
            .mul(Self::translate(-about[0], -about[1]))
    }

    /// Compose transforms: `self * rhs`, rhs applies first.
    #[inline]
    pub fn mul(self, rhs: Self) -> Self {
        let a = self.m;
        let b = rhs.m;

        let mut out = [[0.0f32; 3]; 3];
        for col in 0..3 {
            for row in 0..3 {
                out[col][row] =
                    a[0][row] * b[col][0] + a[1][row] * b[col][1] + a[2][row] * b[col][2];
            }
        }
        Self { m: out }
    }

    /// Inverse transform; `None` when the linear part is singular.
    pub fn inverse(self) -> Option<Self> {
        let [[a, b, _], [c, d, _], [tx, ty, _]] = self.m;
        let det = a * d - b * c;
        if det.abs() < f32::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let (ia, ib, ic, id) = (d * inv, -b * inv, -c * inv, a * inv);
        Some(Self {
            m: [
                [ia, ib, 0.0],
                [ic, id, 0.0],
                [-(ia * tx + ic * ty), -(ib * tx + id * ty), 1.0],
            ],
        })
    }

    #[inline]
    pub fn transform_point(self, x: f32, y: f32) -> (f32, f32) {
        let nx = self.m[0][0] * x + self.m[1][0] * y + self.m[2][0];
        let ny = self.m[0][1] * x + self.m[1][1] * y + self.m[2][1];
        (nx, ny)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb2 {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl Default for Aabb2 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb2 {
    #[inline]
    pub fn from_min_max(min: [f32; 2], max: [f32; 2]) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn empty() -> Self {
        Self {
            min: [f32::INFINITY, f32::INFINITY],
            max: [f32::NEG_INFINITY, f32::NEG_INFINITY],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    #[inline]
    pub fn include_point(&mut self, p: [f32; 2]) {
        self.min[0] = self.min[0].min(p[0]);
        self.min[1] = self.min[1].min(p[1]);
        self.max[0] = self.max[0].max(p[0]);
        self.max[1] = self.max[1].max(p[1]);
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Self {
            min: [self.min[0].min(other.min[0]), self.min[1].min(other.min[1])],
            max: [self.max[0].max(other.max[0]), self.max[1].max(other.max[1])],
        }
    }

    /// Center of the box; the origin for an empty box.
    #[inline]
    pub fn center(&self) -> [f32; 2] {
        if self.is_empty() {
            return ORIGIN;
        }
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }

    #[inline]
    pub fn size(&self) -> [f32; 2] {
        if self.is_empty() {
            return [0.0, 0.0];
        }
        [self.max[0] - self.min[0], self.max[1] - self.min[1]]
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size()[0]
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size()[1]
    }

    /// The point of the box in `direction`, per axis: max edge for positive components,
    /// min edge for negative ones, center for zero.
    pub fn critical_point(&self, direction: [f32; 2]) -> [f32; 2] {
        let c = self.center();
        if self.is_empty() {
            return c;
        }
        let mut out = c;
        for axis in 0..2 {
            if direction[axis] > 0.0 {
                out[axis] = self.max[axis];
            } else if direction[axis] < 0.0 {
                out[axis] = self.min[axis];
            }
        }
        out
    }

    /// Conservative bounds of this box after an affine transform (transforms 4 corners).
    pub fn transformed(&self, xf: Affine2) -> Self {
        if self.is_empty() {
            return *self;
        }
        let corners = [
            [self.min[0], self.min[1]],
            [self.max[0], self.min[1]],
            [self.max[0], self.max[1]],
            [self.min[0], self.max[1]],
        ];
        let mut out = Self::empty();
        for c in corners {
            let (x, y) = xf.transform_point(c[0], c[1]);
            out.include_point([x, y]);
        }
        out
    }
}

/// Simple RGBA color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::from_rgb8(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::from_rgb8(0x00, 0x00, 0x00);
    pub const BLUE: Self = Self::from_rgb8(0x58, 0xC4, 0xDD);
    pub const TEAL: Self = Self::from_rgb8(0x5C, 0xD0, 0xB3);
    pub const GREEN: Self = Self::from_rgb8(0x83, 0xC1, 0x67);
    pub const YELLOW: Self = Self::from_rgb8(0xFF, 0xFF, 0x00);
    pub const GOLD: Self = Self::from_rgb8(0xF0, 0xAC, 0x5F);
    pub const RED: Self = Self::from_rgb8(0xFC, 0x62, 0x55);
    pub const MAROON: Self = Self::from_rgb8(0xC5, 0x5F, 0x73);
    pub const PURPLE: Self = Self::from_rgb8(0x9A, 0x72, 0xAC);
    pub const PINK: Self = Self::from_rgb8(0xD1, 0x47, 0xBD);
    pub const ORANGE: Self = Self::from_rgb8(0xFF, 0x86, 0x2F);
    pub const GREY: Self = Self::from_rgb8(0x88, 0x88, 0x88);

    #[inline]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parse `#RRGGBB` / `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        let mut color = Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?);
        if digits.len() == 8 {
            color.a = channel(6)? as f32 / 255.0;
        }
        Some(color)
    }

    /// Same color with a different alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

/// A renderer-agnostic CPU triangle mesh.
///
/// A mesh with positions but no indices is a valid "point set": it has bounds but
/// draws nothing. Zero-geometry placeholders use this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh2D {
    pub positions: Vec<[f32; 2]>,
    pub indices: Vec<u16>,
}

impl Mesh2D {
    #[inline]
    pub fn is_drawable(&self) -> bool {
        !self.positions.is_empty() && !self.indices.is_empty()
    }
}

/// A draw item produced by flattening the scene graph.
///
/// - `world_from_local` must already be fully composed for this item.
/// - `z` is a simple painter's-order; higher draws later.
#[derive(Debug, Clone)]
pub struct DrawItem2D {
    pub mesh: Mesh2D,
    pub fill: Rgba,
    pub world_from_local: Affine2,
    pub z: i32,
}

/// A "mobject": a node in the scene graph.
#[derive(Debug, Clone)]
pub struct Mobject2D {
    pub name: String,
    pub local_from_parent: Affine2,
    pub z: i32,

    pub fill: Rgba,
    pub mesh: Option<Mesh2D>,

    pub children: Vec<Mobject2D>,
}

impl Default for Mobject2D {
    fn default() -> Self {
        Self {
            name: "mobject".to_string(),
            local_from_parent: Affine2::IDENTITY,
            z: 0,
            fill: Rgba::WHITE,
            mesh: None,
            children: Vec::new(),
        }
    }
}

impl Mobject2D {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A zero-area point, the scene-graph counterpart of manim's `VectorizedPoint`.
    pub fn point(name: impl Into<String>, at: [f32; 2]) -> Self {
        Self::new(name).with_mesh(Mesh2D {
            positions: vec![at],
            indices: Vec::new(),
        })
    }

    /// A straight line drawn as a thin rectangle (two triangles).
    pub fn line(name: impl Into<String>, start: [f32; 2], end: [f32; 2], thickness: f32) -> Self {
        let mut mesh = Mesh2D::default();
        append_line_as_rect(&mut mesh, start, end, thickness);
        if mesh.positions.is_empty() {
            mesh.positions.push(start);
        }
        Self::new(name).with_mesh(mesh)
    }

    /// A node with children.
    pub fn group(name: impl Into<String>, children: Vec<Mobject2D>) -> Self {
        Self {
            name: name.into(),
            children,
            ..Default::default()
        }
    }

    #[inline]
    pub fn with_mesh(mut self, mesh: Mesh2D) -> Self {
        self.mesh = Some(mesh);
        self
    }

    #[inline]
    pub fn with_fill(mut self, fill: Rgba) -> Self {
        self.fill = fill;
        self
    }

    #[inline]
    pub fn add_child(&mut self, child: Mobject2D) {
        self.children.push(child);
    }

    /// Insert a child so it is drawn first.
    #[inline]
    pub fn add_to_back(&mut self, child: Mobject2D) {
        self.children.insert(0, child);
    }

    /// Number of geometry-bearing nodes in this subtree.
    pub fn leaf_count(&self) -> usize {
        let own = usize::from(self.mesh.is_some());
        own + self.children.iter().map(Mobject2D::leaf_count).sum::<usize>()
    }

    /// Local-space AABB of the mesh and all children.
    ///
    /// Child bounds are brought into this node's space by transforming their corners.
    pub fn compute_local_bounds(&self) -> Aabb2 {
        let mut bounds = Aabb2::empty();

        if let Some(mesh) = &self.mesh {
            for &p in &mesh.positions {
                bounds.include_point(p);
            }
        }

        for child in &self.children {
            bounds = bounds.union(child.bounds());
        }

        bounds
    }

    /// Bounds in parent space.
    #[inline]
    pub fn bounds(&self) -> Aabb2 {
        self.compute_local_bounds()
            .transformed(self.local_from_parent)
    }

    /// Pre-multiply a parent-space transform.
    #[inline]
    pub fn apply_transform(&mut self, parent_xf: Affine2) {
        self.local_from_parent = parent_xf.mul(self.local_from_parent);
    }

    pub fn shift(&mut self, delta: [f32; 2]) -> &mut Self {
        self.apply_transform(Affine2::translate(delta[0], delta[1]));
        self
    }

    pub fn scale_about(&mut self, factor: f32, about: [f32; 2]) -> &mut Self {
        self.apply_transform(Affine2::scale_about(factor, about));
        self
    }

    /// Uniform scale about the center of the bounds.
    pub fn scale(&mut self, factor: f32) -> &mut Self {
        let about = self.bounds().center();
        self.scale_about(factor, about)
    }

    /// Move so that the critical point in `aligned_edge` lands on `target`.
    pub fn move_to(&mut self, target: [f32; 2], aligned_edge: [f32; 2]) -> &mut Self {
        let from = self.bounds().critical_point(aligned_edge);
        self.shift([target[0] - from[0], target[1] - from[1]])
    }

    pub fn center(&mut self) -> &mut Self {
        self.move_to(ORIGIN, ORIGIN)
    }

    /// Place next to `target` (parent-space bounds) in `direction`, `buff` apart.
    pub fn next_to(
        &mut self,
        target: Aabb2,
        direction: [f32; 2],
        buff: f32,
        aligned_edge: [f32; 2],
    ) -> &mut Self {
        let delta = next_to_delta(self.bounds(), target, direction, buff, aligned_edge);
        self.shift(delta)
    }

    /// Move against the frame border in `edge` direction, leaving `buff`.
    pub fn to_edge(&mut self, edge: [f32; 2], buff: f32) -> &mut Self {
        let delta = to_edge_delta(self.bounds(), edge, buff);
        self.shift(delta)
    }

    /// Recolor this node and all descendants, keeping each node's alpha.
    pub fn set_color(&mut self, color: Rgba) -> &mut Self {
        self.fill = color.with_alpha(self.fill.a);
        for child in &mut self.children {
            child.set_color(color);
        }
        self
    }

    pub fn set_fill_opacity(&mut self, opacity: f32) -> &mut Self {
        self.fill.a = opacity;
        for child in &mut self.children {
            child.set_fill_opacity(opacity);
        }
        self
    }

    /// Flatten this subtree into draw items, composing transforms.
    pub fn flatten(&self, world_from_parent: Affine2, out: &mut Vec<DrawItem2D>) {
        let world_from_local = world_from_parent.mul(self.local_from_parent);

        if let Some(mesh) = &self.mesh {
            if mesh.is_drawable() {
                out.push(DrawItem2D {
                    mesh: mesh.clone(),
                    fill: self.fill,
                    world_from_local,
                    z: self.z,
                });
            }
        }

        for child in &self.children {
            child.flatten(world_from_local, out);
        }
    }
}

/// The shift that places `bounds` next to `target`, following manim's `next_to`.
pub fn next_to_delta(
    bounds: Aabb2,
    target: Aabb2,
    direction: [f32; 2],
    buff: f32,
    aligned_edge: [f32; 2],
) -> [f32; 2] {
    let target_point = target.critical_point([
        aligned_edge[0] + direction[0],
        aligned_edge[1] + direction[1],
    ]);
    let point_to_align = bounds.critical_point([
        aligned_edge[0] - direction[0],
        aligned_edge[1] - direction[1],
    ]);
    [
        target_point[0] - point_to_align[0] + buff * direction[0],
        target_point[1] - point_to_align[1] + buff * direction[1],
    ]
}

/// The shift that puts `bounds` against the frame border in `edge` direction.
///
/// Only the axes `edge` points along move.
pub fn to_edge_delta(bounds: Aabb2, edge: [f32; 2], buff: f32) -> [f32; 2] {
    let half = [FRAME_WIDTH * 0.5, FRAME_HEIGHT * 0.5];
    let from = bounds.critical_point(edge);
    let mut delta = [0.0f32; 2];
    for axis in 0..2 {
        if edge[axis] != 0.0 {
            let sign = edge[axis].signum();
            delta[axis] = sign * half[axis] - from[axis] - buff * edge[axis];
        }
    }
    delta
}

/// Append a line segment as a thin rectangle mesh (two triangles).
pub fn append_line_as_rect(mesh: &mut Mesh2D, a: [f32; 2], b: [f32; 2], thickness: f32) {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let len = (dx * dx + dy * dy).sqrt();

    if len < 1e-6 {
        return;
    }

    let nx = -dy / len;
    let ny = dx / len;
    let half = 0.5 * thickness;

    let p0 = [a[0] + nx * half, a[1] + ny * half];
    let p1 = [a[0] - nx * half, a[1] - ny * half];
    let p2 = [b[0] - nx * half, b[1] - ny * half];
    let p3 = [b[0] + nx * half, b[1] + ny * half];

    let base = mesh.positions.len() as u16;
    mesh.positions.extend_from_slice(&[p0, p1, p2, p3]);
    mesh.indices
        .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(name: &str, min: [f32; 2], side: f32) -> Mobject2D {
        let [x, y] = min;
        Mobject2D::new(name).with_mesh(Mesh2D {
            positions: vec![[x, y], [x + side, y], [x + side, y + side], [x, y + side]],
            indices: vec![0, 1, 2, 0, 2, 3],
        })
    }

    fn approx(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn critical_points_follow_direction_signs() {
        let b = Aabb2::from_min_max([0.0, 0.0], [2.0, 4.0]);
        assert_eq!(b.critical_point(RIGHT), [2.0, 2.0]);
        assert_eq!(b.critical_point(LEFT), [0.0, 2.0]);
        assert_eq!(b.critical_point([1.0, 1.0]), [2.0, 4.0]);
        assert_eq!(b.critical_point(ORIGIN), [1.0, 2.0]);
        assert_eq!(Aabb2::empty().critical_point(UP), ORIGIN);
    }

    #[test]
    fn child_bounds_compose_parent_transform() {
        let mut group = Mobject2D::group("g", vec![square("a", [0.0, 0.0], 1.0)]);
        group.shift([3.0, -1.0]);
        let b = group.bounds();
        assert!(approx(b.min, [3.0, -1.0]));
        assert!(approx(b.max, [4.0, 0.0]));
    }

    #[test]
    fn scale_keeps_center_fixed() {
        let mut m = square("a", [1.0, 1.0], 2.0);
        m.scale(0.5);
        let b = m.bounds();
        assert!(approx(b.center(), [2.0, 2.0]));
        assert!((b.width() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn next_to_places_with_buffer() {
        let anchor = square("anchor", [0.0, 0.0], 1.0).bounds();
        let mut m = square("m", [5.0, 5.0], 1.0);
        m.next_to(anchor, LEFT, 0.5, ORIGIN);
        let b = m.bounds();
        assert!(approx(b.max, [-0.5, 1.0]));
        assert!(approx(b.min, [-1.5, 0.0]));
    }

    #[test]
    fn to_edge_touches_frame_with_buffer() {
        let mut m = square("m", [0.0, 0.0], 1.0);
        m.to_edge(UP, 0.5);
        let b = m.bounds();
        assert!((b.max[1] - (FRAME_HEIGHT * 0.5 - 0.5)).abs() < 1e-4);
        assert!((b.min[0] - 0.0).abs() < 1e-4);
    }

    #[test]
    fn inverse_undoes_transform() {
        let xf = Affine2::translate(2.0, -3.0).mul(Affine2::scale(4.0, 0.5));
        let back = xf.inverse().unwrap().mul(xf);
        let (x, y) = back.transform_point(1.5, 7.0);
        assert!(approx([x, y], [1.5, 7.0]));
        assert!(Affine2::scale(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn set_color_is_recursive_and_keeps_alpha() {
        let mut leaf = square("a", [0.0, 0.0], 1.0);
        leaf.fill = Rgba::WHITE.with_alpha(0.5);
        let mut group = Mobject2D::group("g", vec![leaf]);
        group.set_color(Rgba::RED);
        group.set_color(Rgba::RED);
        assert_eq!(group.children[0].fill, Rgba::RED.with_alpha(0.5));
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(Rgba::from_hex("#FC6255"), Some(Rgba::RED));
        assert_eq!(Rgba::from_hex("ffffff80").map(|c| c.a), Some(128.0 / 255.0));
        assert_eq!(Rgba::from_hex("#12"), None);
        assert_eq!(Rgba::from_hex("#GGGGGG"), None);
    }

    #[test]
    fn flatten_skips_point_sets() {
        let root = Mobject2D::group(
            "root",
            vec![Mobject2D::point("p", [1.0, 1.0]), square("a", [0.0, 0.0], 1.0)],
        );
        let mut items = Vec::new();
        root.flatten(Affine2::IDENTITY, &mut items);
        assert_eq!(items.len(), 1);
        assert_eq!(root.leaf_count(), 2);
    }
}
