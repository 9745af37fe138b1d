//! Superellipse ("bean") outline generation.
//!
//! The outline is the Lamé curve `|x/rx|^nx + |y/ry|^ny = 1`, sampled at
//! `segments` evenly spaced parameter values:
//!
//! ```text
//! t  = i / segments * TAU
//! px = rx * sign(cos t) * |cos t|^(2/nx)
//! py = ry * sign(sin t) * |sin t|^(2/ny)
//! ```
//!
//! `nx = ny = 2` is an ordinary ellipse. Larger `nx` flattens the left/right tips.

use std::f32::consts::TAU;

use bevy::prelude::*;
use thiserror::Error;

/// Fill / stroke data handed through to the renderer untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            fill: Color::srgb_u8(0xff, 0x7f, 0x50),
            stroke: Color::srgb_u8(0x11, 0x11, 0x11),
            stroke_width: 1.0,
        }
    }
}

/// Rejected shape parameters. A loop built from these has no sound fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("radius {axis} must be > 0 (got {value})")]
    NonPositiveRadius { axis: &'static str, value: f32 },

    #[error("exponent {axis} must be > 0 (got {value})")]
    NonPositiveExponent { axis: &'static str, value: f32 },

    #[error("segments must be >= {min} (got {got})")]
    TooFewSegments { got: usize, min: usize },

    #[error("{name} is not a finite number")]
    NonFiniteParameter { name: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeParams {
    /// Horizontal semi-extent.
    pub rx: f32,
    /// Vertical semi-extent.
    pub ry: f32,
    /// Tip bluntness along x (2.0 = ellipse).
    pub nx: f32,
    /// Tip bluntness along y (2.0 = ellipse).
    pub ny: f32,
    pub segments: usize,
    pub style: RenderStyle,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            rx: 28.0,
            ry: 24.0,
            nx: 2.6,
            ny: 2.0,
            segments: 84,
            style: RenderStyle::default(),
        }
    }
}

impl ShapeParams {
    pub const MIN_SEGMENTS: usize = 3;

    pub fn validate(&self) -> Result<(), ShapeError> {
        for (name, v) in [("rx", self.rx), ("ry", self.ry), ("nx", self.nx), ("ny", self.ny)] {
            if !v.is_finite() {
                return Err(ShapeError::NonFiniteParameter { name });
            }
        }
        if self.rx <= 0.0 {
            return Err(ShapeError::NonPositiveRadius { axis: "rx", value: self.rx });
        }
        if self.ry <= 0.0 {
            return Err(ShapeError::NonPositiveRadius { axis: "ry", value: self.ry });
        }
        if self.nx <= 0.0 {
            return Err(ShapeError::NonPositiveExponent { axis: "nx", value: self.nx });
        }
        if self.ny <= 0.0 {
            return Err(ShapeError::NonPositiveExponent { axis: "ny", value: self.ny });
        }
        if self.segments < Self::MIN_SEGMENTS {
            return Err(ShapeError::TooFewSegments {
                got: self.segments,
                min: Self::MIN_SEGMENTS,
            });
        }
        Ok(())
    }

    /// Radius of the circle enclosing both semi-axes.
    pub fn max_radius(&self) -> f32 {
        self.rx.max(self.ry)
    }
}

/// Closed outline in body-local coordinates. The last vertex implicitly
/// connects back to the first; it is never repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexLoop(Vec<Vec2>);

impl VertexLoop {
    pub fn new(points: impl Into<Vec<Vec2>>) -> Self {
        Self(points.into())
    }

    pub fn points(&self) -> &[Vec2] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_points(self) -> Vec<Vec2> {
        self.0
    }

    /// Vertices followed by the first vertex again, ready for line strips.
    pub fn closed_iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.0.iter().chain(self.0.first()).copied()
    }

    /// Mean of the vertices.
    pub fn centroid(&self) -> Vec2 {
        if self.0.is_empty() {
            return Vec2::ZERO;
        }
        self.0.iter().copied().sum::<Vec2>() / self.0.len() as f32
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn extents(&self) -> (Vec2, Vec2) {
        self.0.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        )
    }

    /// Farthest vertex distance from the local origin.
    pub fn bounding_radius(&self) -> f32 {
        self.0.iter().map(|p| p.length()).fold(0.0, f32::max)
    }

    /// Twice the signed area; positive for counter-clockwise winding.
    pub fn signed_area2(&self) -> f32 {
        let n = self.0.len();
        (0..n)
            .map(|i| self.0[i].perp_dot(self.0[(i + 1) % n]))
            .sum()
    }

    /// True for a simple loop whose turns all agree with its winding.
    /// Near-collinear turns (within float noise of the coordinates) are
    /// tolerated; a flat (zero-area) or self-overlapping loop is not.
    pub fn is_convex(&self) -> bool {
        let n = self.0.len();
        if n < 3 {
            return false;
        }
        let scale = self.bounding_radius().max(f32::EPSILON);
        let area2 = self.signed_area2();
        if area2.abs() <= 1e-6 * scale * scale {
            return false;
        }
        let winding = area2.signum();
        let noise = 16.0 * f32::EPSILON * scale;
        let mut turning = 0.0f32;
        for i in 0..n {
            let a = self.0[i];
            let b = self.0[(i + 1) % n];
            let c = self.0[(i + 2) % n];
            let (e1, e2) = (b - a, c - b);
            let (l1, l2) = (e1.length(), e2.length());
            if l1 == 0.0 || l2 == 0.0 {
                continue;
            }
            let cross = e1.perp_dot(e2);
            let tol = (1e-6 * l1 * l2).max(noise * (l1 + l2));
            if cross * winding < -tol {
                return false;
            }
            turning += cross.atan2(e1.dot(e2));
        }
        // one full revolution; two or more means the outline overlaps itself
        (turning.abs() - TAU).abs() < 0.5
    }
}

/// `sign` with `sign(0) == 0`; `f32::signum` maps zero to one.
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Sample the bean outline. Counter-clockwise, starting at the `+x` tip.
pub fn generate_vertex_loop(params: &ShapeParams) -> Result<VertexLoop, ShapeError> {
    params.validate()?;
    let ex = 2.0 / params.nx;
    let ey = 2.0 / params.ny;
    let n = params.segments;
    let mut points = (0..n)
        .map(|i| {
            let (ct, st) = unit_direction(i, n);
            Vec2::new(
                params.rx * sign(ct) * ct.abs().powf(ex),
                params.ry * sign(st) * st.abs().powf(ey),
            )
        })
        .collect::<Vec<_>>();

    // Odd counts are not mirrored about the y axis; shift onto the vertex mean.
    // Residue below the tolerance is rounding and stays put so axis vertices
    // remain exact.
    let mean = points.iter().copied().sum::<Vec2>() / n as f32;
    let tol = 1e-5 * params.max_radius();
    let shift = Vec2::new(
        if mean.x.abs() > tol { mean.x } else { 0.0 },
        if mean.y.abs() > tol { mean.y } else { 0.0 },
    );
    if shift != Vec2::ZERO {
        for p in &mut points {
            *p -= shift;
        }
    }
    Ok(VertexLoop(points))
}

/// `(cos t, sin t)` for `t = i / n * TAU`, exact on the four axes. Raising
/// the `1e-8` residue of `cos(PI / 2)` to a small power would otherwise knock
/// axis vertices off their axis.
fn unit_direction(i: usize, n: usize) -> (f32, f32) {
    if (4 * i) % n == 0 {
        return match 4 * i / n {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            2 => (-1.0, 0.0),
            _ => (0.0, -1.0),
        };
    }
    let (s, c) = (i as f32 / n as f32 * TAU).sin_cos();
    (c, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(rx: f32, ry: f32, nx: f32, ny: f32, segments: usize) -> ShapeParams {
        ShapeParams {
            rx,
            ry,
            nx,
            ny,
            segments,
            ..Default::default()
        }
    }

    fn grid() -> Vec<ShapeParams> {
        let mut out = Vec::new();
        for &(rx, ry) in &[(28.0, 24.0), (5.0, 40.0), (1.0, 1.0), (120.0, 3.0)] {
            for &(nx, ny) in &[(1.0, 1.0), (2.0, 2.0), (2.7, 2.0), (4.0, 1.5), (8.0, 8.0)] {
                for &segments in &[3usize, 4, 7, 16, 84, 301] {
                    out.push(params(rx, ry, nx, ny, segments));
                }
            }
        }
        out
    }

    #[test]
    fn ellipse_exponents_recover_ellipse() {
        for p in grid().into_iter().filter(|p| p.nx == 2.0 && p.ny == 2.0) {
            let lp = generate_vertex_loop(&p).unwrap();
            for v in lp.points() {
                let e = (v.x / p.rx).powi(2) + (v.y / p.ry).powi(2);
                assert!((e - 1.0).abs() < 1e-4, "{v:?} off ellipse for {p:?}: {e}");
            }
        }
    }

    #[test]
    fn loop_has_exact_count_and_is_convex() {
        for p in grid() {
            let lp = generate_vertex_loop(&p).unwrap();
            assert_eq!(lp.len(), p.segments);
            assert!(lp.is_convex(), "expected convex loop for {p:?}");
            assert_ne!(lp.points().first(), lp.points().last());
        }
    }

    #[test]
    fn loop_is_counter_clockwise() {
        let lp = generate_vertex_loop(&ShapeParams::default()).unwrap();
        assert!(lp.signed_area2() > 0.0);
    }

    #[test]
    fn centroid_sits_at_origin() {
        for p in grid() {
            let lp = generate_vertex_loop(&p).unwrap();
            let c = lp.centroid();
            let tol = 1e-4 * p.max_radius();
            assert!(c.length() < tol, "centroid {c:?} for {p:?}");
        }
    }

    #[test]
    fn odd_count_is_recentred_but_keeps_its_shape() {
        let p = params(28.0, 24.0, 2.7, 2.0, 13);
        let lp = generate_vertex_loop(&p).unwrap();
        assert!(lp.centroid().length() < 1e-4);
        // +x tip still on the x axis, just shifted along it
        assert_eq!(lp.points()[0].y, 0.0);
        let (_, hi) = lp.extents();
        assert!((hi.x - 28.0).abs() < 1.0, "{hi:?}");
        assert!(lp.is_convex());
    }

    #[test]
    fn blunt_four_point_loop_lands_on_axes() {
        let lp = generate_vertex_loop(&params(28.0, 24.0, 8.0, 8.0, 4)).unwrap();
        assert_eq!(
            lp.points(),
            &[
                Vec2::new(28.0, 0.0),
                Vec2::new(0.0, 24.0),
                Vec2::new(-28.0, 0.0),
                Vec2::new(0.0, -24.0),
            ]
        );
        assert_eq!(lp.centroid(), Vec2::ZERO);
    }

    #[test]
    fn dense_ellipses_stay_convex() {
        for segments in [200, 300, 400, 1000, 5000] {
            let lp = generate_vertex_loop(&params(28.0, 24.0, 2.0, 2.0, segments)).unwrap();
            assert!(lp.is_convex(), "{segments} segments");
        }
    }

    #[test]
    fn generation_is_repeatable() {
        let p = params(31.5, 22.0, 2.7, 2.0, 84);
        assert_eq!(generate_vertex_loop(&p), generate_vertex_loop(&p));
    }

    #[test]
    fn bean_dimensions_and_blunt_tips() {
        let p = params(28.0, 24.0, 2.6, 2.0, 84);
        let lp = generate_vertex_loop(&p).unwrap();
        assert_eq!(lp.len(), 84);

        let (lo, hi) = lp.extents();
        assert!((lo.x + 28.0).abs() < 1e-3 && (hi.x - 28.0).abs() < 1e-3, "{lo:?} {hi:?}");
        assert!((lo.y + 24.0).abs() < 1e-3 && (hi.y - 24.0).abs() < 1e-3, "{lo:?} {hi:?}");

        // One step off each tip the bean is farther out along x than an ellipse.
        let ellipse = generate_vertex_loop(&params(28.0, 24.0, 2.0, 2.0, 84)).unwrap();
        for i in [1usize, 41, 43, 83] {
            let bean = lp.points()[i];
            let plain = ellipse.points()[i];
            assert!(bean.x.abs() > plain.x.abs(), "tip vertex {i}: {bean:?} vs {plain:?}");
            assert!((bean.y - plain.y).abs() < 1e-4);
        }
    }

    #[test]
    fn axis_vertices_are_exact_and_finite() {
        let lp = generate_vertex_loop(&params(10.0, 6.0, 3.0, 3.0, 4)).unwrap();
        let pts = lp.points();
        assert_eq!(pts[0], Vec2::new(10.0, 0.0));
        for v in pts {
            assert!(v.x.is_finite() && v.y.is_finite());
        }
        assert_eq!(pts[1], Vec2::new(0.0, 6.0));
        assert_eq!(pts[2], Vec2::new(-10.0, 0.0));
        assert_eq!(pts[3], Vec2::new(0.0, -6.0));
    }

    #[test]
    fn rejects_degenerate_parameters() {
        assert_eq!(
            generate_vertex_loop(&params(28.0, 24.0, 2.6, 2.0, 0)),
            Err(ShapeError::TooFewSegments { got: 0, min: 3 })
        );
        assert_eq!(
            generate_vertex_loop(&params(0.0, 24.0, 2.6, 2.0, 84)),
            Err(ShapeError::NonPositiveRadius { axis: "rx", value: 0.0 })
        );
        assert!(matches!(
            generate_vertex_loop(&params(28.0, -1.0, 2.6, 2.0, 84)),
            Err(ShapeError::NonPositiveRadius { axis: "ry", .. })
        ));
        assert!(matches!(
            generate_vertex_loop(&params(28.0, 24.0, 0.0, 2.0, 84)),
            Err(ShapeError::NonPositiveExponent { axis: "nx", .. })
        ));
        assert!(matches!(
            generate_vertex_loop(&params(f32::NAN, 24.0, 2.0, 2.0, 84)),
            Err(ShapeError::NonFiniteParameter { name: "rx" })
        ));
    }

    #[test]
    fn sub_unit_exponent_is_not_convex() {
        for segments in [16, 64, 301] {
            let lp = generate_vertex_loop(&params(20.0, 20.0, 0.5, 0.5, segments)).unwrap();
            assert!(!lp.is_convex(), "{segments} segments");
        }
    }

    #[test]
    fn doubly_wound_loop_is_not_convex() {
        // pentagram: every turn agrees in sign but the outline crosses itself
        let star = VertexLoop::new(
            (0..5)
                .map(|i| Vec2::from_angle(i as f32 * 2.0 * TAU / 5.0) * 10.0)
                .collect::<Vec<_>>(),
        );
        assert!(!star.is_convex());
    }

    #[test]
    fn collinear_loop_is_not_convex() {
        let flat = VertexLoop::new(vec![Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)]);
        assert!(!flat.is_convex());
    }
}
