use std::f32::consts::TAU;

use bevy::prelude::*;

use super::superellipse::VertexLoop;

/// Regular `sides`-gon of circumradius `radius`, counter-clockwise from `+x`.
pub fn regular_polygon(sides: usize, radius: f32) -> VertexLoop {
    let step = TAU / sides as f32;
    VertexLoop::new(
        (0..sides)
            .map(|i| Vec2::from_angle(step * i as f32) * radius)
            .collect::<Vec<_>>(),
    )
}
