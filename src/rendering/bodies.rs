//! Visuals for spawned bodies: filled polygons for beans, circles for balls,
//! sprites for textured balls, and gizmo outlines on top.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

use crate::core::components::{Appearance, BodyVisual, Outline};
use crate::core::config::GameConfig;
use crate::core::context::SimulationContext;

pub struct BodyRenderPlugin;

impl Plugin for BodyRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (sync_outline_width, attach_body_visuals, draw_outlines),
        );
    }
}

/// Triangle fan around the local origin. Valid for any loop that is
/// star-shaped about the origin, which covers every convex outline we build.
pub fn polygon_fill_mesh(points: &[Vec2]) -> Mesh {
    let n = points.len() as u32;
    let mut positions = Vec::with_capacity(points.len() + 1);
    positions.push([0.0, 0.0, 0.0]);
    positions.extend(points.iter().map(|p| [p.x, p.y, 0.0]));

    let extent = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc.max(p.abs()))
        .max(Vec2::splat(f32::EPSILON));
    let uvs: Vec<[f32; 2]> = positions
        .iter()
        .map(|p| [0.5 + p[0] / (2.0 * extent.x), 0.5 - p[1] / (2.0 * extent.y)])
        .collect();
    let normals = vec![[0.0, 0.0, 1.0]; positions.len()];

    let mut indices = Vec::with_capacity(points.len() * 3);
    for i in 0..n {
        indices.extend_from_slice(&[0, i + 1, (i + 1) % n + 1]);
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}

pub fn attach_body_visuals(
    mut commands: Commands,
    q: Query<(Entity, &Appearance), Added<Appearance>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    asset_server: Option<Res<AssetServer>>,
) {
    for (entity, appearance) in q.iter() {
        let mut body = commands.entity(entity);
        match appearance {
            Appearance::Polygon { points, fill } => {
                let mesh = meshes.add(polygon_fill_mesh(points));
                let material = materials.add(ColorMaterial::from_color(*fill));
                body.with_children(|parent| {
                    parent.spawn((BodyVisual, Mesh2d(mesh), MeshMaterial2d(material)));
                });
            }
            Appearance::Circle { radius, color } => {
                let mesh = meshes.add(Circle::new(*radius));
                let material = materials.add(ColorMaterial::from_color(*color));
                body.with_children(|parent| {
                    parent.spawn((BodyVisual, Mesh2d(mesh), MeshMaterial2d(material)));
                });
            }
            Appearance::Textured { radius, texture } => {
                let image = match asset_server.as_ref() {
                    Some(server) => server.load(texture.clone()),
                    None => {
                        warn!(target: "render", "no AssetServer; {texture} not loaded");
                        Handle::default()
                    }
                };
                body.with_children(|parent| {
                    parent.spawn((
                        BodyVisual,
                        Sprite {
                            image,
                            custom_size: Some(Vec2::splat(radius * 2.0)),
                            ..Default::default()
                        },
                    ));
                });
            }
        }
    }
}

pub fn draw_outlines(mut gizmos: Gizmos, q: Query<(&GlobalTransform, &Outline)>) {
    for (gtf, outline) in q.iter() {
        let Some(&first) = outline.points.first() else {
            continue;
        };
        let tf = gtf.compute_transform();
        let to_world = |p: Vec2| tf.transform_point(p.extend(0.0)).truncate();
        gizmos.linestrip_2d(
            outline
                .points
                .iter()
                .copied()
                .chain(std::iter::once(first))
                .map(to_world),
            outline.color,
        );
    }
}

/// Gizmo line widths are physical pixels; the configured stroke is logical.
fn sync_outline_width(
    mut store: ResMut<GizmoConfigStore>,
    cfg: Res<GameConfig>,
    ctx: Res<SimulationContext>,
) {
    if !ctx.is_changed() && !cfg.is_changed() {
        return;
    }
    let width = cfg.spawn.bean.stroke_width.max(0.5) * ctx.pixel_ratio();
    let (config, _) = store.config_mut::<DefaultGizmoConfigGroup>();
    if config.line.width != width {
        config.line.width = width;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{generate_vertex_loop, ShapeParams};
    use bevy::render::mesh::VertexAttributeValues;

    #[test]
    fn fan_covers_every_edge() {
        let lp = generate_vertex_loop(&ShapeParams::default()).unwrap();
        let mesh = polygon_fill_mesh(lp.points());
        assert_eq!(mesh.count_vertices(), lp.len() + 1);
        let Some(Indices::U32(idx)) = mesh.indices() else {
            panic!("u32 indices");
        };
        assert_eq!(idx.len(), lp.len() * 3);
        // last triangle closes back onto the first outline vertex
        assert_eq!(&idx[idx.len() - 3..], &[0, lp.len() as u32, 1]);
    }

    #[test]
    fn fan_triangles_wind_counter_clockwise() {
        let lp = generate_vertex_loop(&ShapeParams::default()).unwrap();
        let mesh = polygon_fill_mesh(lp.points());
        let Some(VertexAttributeValues::Float32x3(pos)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("positions");
        };
        let Some(Indices::U32(idx)) = mesh.indices() else {
            panic!("u32 indices");
        };
        for tri in idx.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec2::new(pos[i as usize][0], pos[i as usize][1]));
            assert!((b - a).perp_dot(c - a) >= 0.0);
        }
    }

    #[test]
    fn outline_width_follows_pixel_ratio() {
        let mut store = GizmoConfigStore::default();
        store.insert(GizmoConfig::default(), DefaultGizmoConfigGroup);
        let mut cfg = GameConfig::default();
        cfg.spawn.bean.stroke_width = 1.5;
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(store)
            .insert_resource(cfg)
            .insert_resource(SimulationContext::new(100.0))
            .add_systems(Update, sync_outline_width);

        let width = |app: &App| {
            let store = app.world().resource::<GizmoConfigStore>();
            store.config::<DefaultGizmoConfigGroup>().0.line.width
        };
        // no viewport yet: ratio 1
        app.update();
        assert_eq!(width(&app), 1.5);

        app.world_mut()
            .resource_mut::<SimulationContext>()
            .on_viewport_change(800.0, 600.0, 2.0);
        app.update();
        assert_eq!(width(&app), 3.0);
    }

    #[test]
    fn visuals_attach_as_children() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<ColorMaterial>>()
            .add_systems(Update, attach_body_visuals);
        let lp = generate_vertex_loop(&ShapeParams::default()).unwrap();
        let bean = app
            .world_mut()
            .spawn(Appearance::Polygon {
                points: lp.into_points(),
                fill: Color::WHITE,
            })
            .id();
        let ball = app
            .world_mut()
            .spawn(Appearance::Circle {
                radius: 10.0,
                color: Color::BLACK,
            })
            .id();
        app.update();
        app.update();

        let world = app.world_mut();
        assert_eq!(world.query::<&BodyVisual>().iter(world).count(), 2);
        for e in [bean, ball] {
            let children = world.get::<Children>(e).expect("visual child");
            assert_eq!(children.len(), 1);
        }
        assert_eq!(world.resource::<Assets<Mesh>>().len(), 2);
    }
}
