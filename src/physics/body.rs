//! Engine boundary for bean bodies.
//!
//! `build_body` turns validated shape parameters into a [`BodyDescriptor`],
//! asking a [`BodyFactory`] for a convex body first and dropping to a regular
//! polygon when the engine rejects the outline. The builder keeps nothing after
//! returning; the handle belongs to whoever inserts it into the world.

use bevy::prelude::*;
use thiserror::Error;

use crate::geometry::{generate_vertex_loop, RenderStyle, ShapeError, ShapeParams, VertexLoop};

/// Side count of the fallback polygon.
pub const FALLBACK_SIDES: usize = 14;

/// Material parameters passed opaquely to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalProps {
    pub restitution: f32,
    pub friction: f32,
    /// Fraction of velocity lost per 60 Hz step.
    pub air_friction: f32,
}

/// Low bounce, low drag: beans settle quickly without jitter.
pub const BEAN_MATERIAL: PhysicalProps = PhysicalProps {
    restitution: 0.1,
    friction: 0.05,
    air_friction: 0.01,
};

impl Default for PhysicalProps {
    fn default() -> Self {
        BEAN_MATERIAL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Component)]
pub enum BodyLabel {
    Bean,
    BeanFallback,
}

impl BodyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyLabel::Bean => "bean",
            BodyLabel::BeanFallback => "bean-fallback",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, BodyLabel::BeanFallback)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyShape {
    Convex(VertexLoop),
    RegularPolygon { sides: usize, radius: f32 },
}

impl BodyShape {
    /// Outline in body-local coordinates, whichever path produced it.
    pub fn outline(&self) -> VertexLoop {
        match self {
            BodyShape::Convex(lp) => lp.clone(),
            BodyShape::RegularPolygon { sides, radius } => {
                crate::geometry::regular_polygon(*sides, *radius)
            }
        }
    }

    pub fn bounding_radius(&self) -> f32 {
        match self {
            BodyShape::Convex(lp) => lp.bounding_radius(),
            BodyShape::RegularPolygon { radius, .. } => *radius,
        }
    }
}

/// A freshly built body ready to be handed to the simulation.
#[derive(Debug, Clone)]
pub struct BodyDescriptor<H> {
    pub position: Vec2,
    pub shape: BodyShape,
    pub props: PhysicalProps,
    pub style: RenderStyle,
    pub label: BodyLabel,
    pub handle: H,
}

/// Engine could not turn the outline into a convex body.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionFailure {
    #[error("vertex loop is not convex")]
    NotConvex,
    #[error("vertex loop is degenerate: {0}")]
    Degenerate(String),
}

/// Body construction provided by a physics engine.
pub trait BodyFactory {
    type Handle;

    fn create_convex_body(
        &self,
        position: Vec2,
        vertices: &VertexLoop,
        props: &PhysicalProps,
        style: &RenderStyle,
    ) -> Result<Self::Handle, ConstructionFailure>;

    /// Must succeed for any `sides >= 3` and `radius > 0`.
    fn create_regular_polygon_body(
        &self,
        position: Vec2,
        sides: usize,
        radius: f32,
        props: &PhysicalProps,
        style: &RenderStyle,
    ) -> Self::Handle;
}

/// Build one bean. Invalid parameters are rejected before the engine is
/// consulted; an engine rejection falls back to a [`FALLBACK_SIDES`]-gon of
/// radius `max(rx, ry)` labelled [`BodyLabel::BeanFallback`].
pub fn build_body<F>(
    factory: &F,
    position: Vec2,
    params: &ShapeParams,
    props: &PhysicalProps,
) -> Result<BodyDescriptor<F::Handle>, ShapeError>
where
    F: BodyFactory + ?Sized,
{
    let vertices = generate_vertex_loop(params)?;
    let style = params.style;

    match factory.create_convex_body(position, &vertices, props, &style) {
        Ok(handle) => Ok(BodyDescriptor {
            position,
            shape: BodyShape::Convex(vertices),
            props: *props,
            style,
            label: BodyLabel::Bean,
            handle,
        }),
        Err(failure) => {
            let radius = params.max_radius();
            warn!(
                target: "spawn",
                "convex body rejected ({failure}); falling back to {FALLBACK_SIDES}-gon r={radius:.2} (rx={} ry={} nx={} ny={} segments={})",
                params.rx, params.ry, params.nx, params.ny, params.segments
            );
            let handle =
                factory.create_regular_polygon_body(position, FALLBACK_SIDES, radius, props, &style);
            Ok(BodyDescriptor {
                position,
                shape: BodyShape::RegularPolygon {
                    sides: FALLBACK_SIDES,
                    radius,
                },
                props: *props,
                style,
                label: BodyLabel::BeanFallback,
                handle,
            })
        }
    }
}
