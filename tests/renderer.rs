use bevy_ecs::world::World;
use forward_renderer::gfx::{
    CompareFunction, CullFace, GraphicsContext, MeshHandle, TraceContext, TraceOp,
};
use forward_renderer::material::{Material, MaterialKind, MaterialRecord};
use forward_renderer::renderer::{far_plane_projection, ForwardRenderer, RendererError};
use forward_renderer::resources::{MaterialId, MaterialLibrary};
use forward_renderer::scene::{Attenuation, Camera, Light, MeshRenderer, Transform};
use forward_renderer::RendererConfig;
use glam::{Mat4, UVec2, Vec3, Vec4};

const VIEWPORT: UVec2 = UVec2::new(800, 600);

fn make_material(ctx: &mut TraceContext, transparent: bool) -> Material {
    let record = MaterialRecord {
        shader: Some(ctx.create_shader("mesh.vert", "mesh.frag").unwrap()),
        transparent: Some(transparent),
        ..Default::default()
    };
    Material::new(MaterialKind::Tinted, &record).unwrap()
}

fn spawn_mesh_at(
    ctx: &mut TraceContext,
    world: &mut World,
    material: MaterialId,
    z: f32,
) -> MeshHandle {
    let mesh = ctx.create_sphere_mesh(UVec2::new(4, 4)).unwrap();
    world.spawn((
        Transform::from_position(Vec3::new(0.0, 0.0, z)),
        MeshRenderer::new(mesh, material),
    ));
    mesh
}

fn drawn_meshes(ctx: &TraceContext) -> Vec<MeshHandle> {
    ctx.ops()
        .iter()
        .filter_map(|op| match op {
            TraceOp::DrawMesh(mesh) => Some(*mesh),
            _ => None,
        })
        .collect()
}

fn pipeline_state_before(ctx: &TraceContext, draw_index: usize) -> forward_renderer::gfx::PipelineState {
    ctx.ops()[..draw_index]
        .iter()
        .rev()
        .find_map(|op| match op {
            TraceOp::ApplyPipelineState(state) => Some(*state),
            _ => None,
        })
        .unwrap()
}

#[test]
fn no_camera_renders_nothing() {
    let mut ctx = TraceContext::new();
    let mut renderer =
        ForwardRenderer::initialize(&mut ctx, VIEWPORT, &RendererConfig::default()).unwrap();

    let mut materials = MaterialLibrary::new();
    let opaque = materials.insert(make_material(&mut ctx, false));
    let mut world = World::new();
    spawn_mesh_at(&mut ctx, &mut world, opaque, -2.0);

    ctx.clear_ops();
    renderer.render(&mut ctx, &mut world, &materials);

    assert!(ctx.ops().is_empty());
    assert_eq!(ctx.draw_count(), 0);
}

#[test]
fn transparent_geometry_draws_back_to_front() {
    let mut ctx = TraceContext::new();
    let mut renderer =
        ForwardRenderer::initialize(&mut ctx, VIEWPORT, &RendererConfig::default()).unwrap();

    let mut materials = MaterialLibrary::new();
    let transparent = materials.insert(make_material(&mut ctx, true));

    // Camera at the origin looking down -Z
    let mut world = World::new();
    world.spawn((Camera::default(), Transform::default()));
    let near = spawn_mesh_at(&mut ctx, &mut world, transparent, -5.0);
    let nearest = spawn_mesh_at(&mut ctx, &mut world, transparent, -1.0);
    let farthest = spawn_mesh_at(&mut ctx, &mut world, transparent, -10.0);
    let behind = spawn_mesh_at(&mut ctx, &mut world, transparent, 2.0);

    ctx.clear_ops();
    renderer.render(&mut ctx, &mut world, &materials);

    assert_eq!(drawn_meshes(&ctx), vec![farthest, near, nearest, behind]);
}

#[test]
fn opaque_scene_without_lights_stays_on_the_default_framebuffer() {
    let mut ctx = TraceContext::new();
    let mut renderer =
        ForwardRenderer::initialize(&mut ctx, VIEWPORT, &RendererConfig::default()).unwrap();

    let mut materials = MaterialLibrary::new();
    let opaque = materials.insert(make_material(&mut ctx, false));
    let mut world = World::new();
    world.spawn((Camera::default(), Transform::default()));
    spawn_mesh_at(&mut ctx, &mut world, opaque, -1.0);
    spawn_mesh_at(&mut ctx, &mut world, opaque, -3.0);

    ctx.clear_ops();
    renderer.render(&mut ctx, &mut world, &materials);

    assert_eq!(ctx.draw_count(), 2);
    assert_eq!(ctx.bound_framebuffer(), None);

    let ops = ctx.ops();
    assert!(!ops.iter().any(|op| matches!(op, TraceOp::BindFramebuffer(_))));
    assert!(!ops.iter().any(|op| matches!(op, TraceOp::WriteLights { .. })));
    assert!(!ops
        .iter()
        .any(|op| matches!(op, TraceOp::SetUniform { name, .. } if name == "light_count")));

    // The clear must land before any draw
    assert!(ops.iter().any(|op| matches!(op, TraceOp::SetViewport(size) if *size == VIEWPORT)));
    let clear_at = ops
        .iter()
        .position(|op| matches!(op, TraceOp::Clear { color: true, depth: true }))
        .unwrap();
    let first_draw_at = ops
        .iter()
        .position(|op| matches!(op, TraceOp::DrawMesh(_)))
        .unwrap();
    assert!(clear_at < first_draw_at);
}

#[test]
fn light_records_reach_every_draw() {
    let mut ctx = TraceContext::new();
    let mut renderer =
        ForwardRenderer::initialize(&mut ctx, VIEWPORT, &RendererConfig::default()).unwrap();

    let mut materials = MaterialLibrary::new();
    let opaque = materials.insert(make_material(&mut ctx, false));
    let mut world = World::new();
    world.spawn((Camera::default(), Transform::default()));
    spawn_mesh_at(&mut ctx, &mut world, opaque, -2.0);

    world.spawn((
        Light::directional(Vec4::ONE, Vec4::ONE, Vec4::splat(0.1)),
        Transform::default(),
    ));
    world.spawn((
        Light::point(Vec4::ONE, Vec4::ONE, Vec4::splat(0.1), Attenuation::default()),
        Transform::from_position(Vec3::new(0.0, 3.0, 0.0)),
    ));
    world.spawn((
        Light::spot(
            Vec4::ONE,
            Vec4::ONE,
            Vec4::splat(0.1),
            Attenuation::default(),
            0.3,
            0.5,
        ),
        Transform::from_position(Vec3::new(2.0, 2.0, 0.0)),
    ));

    ctx.clear_ops();
    renderer.render(&mut ctx, &mut world, &materials);

    let writes: Vec<_> = ctx
        .ops()
        .iter()
        .filter_map(|op| match op {
            TraceOp::WriteLights { lights, .. } => Some(lights),
            _ => None,
        })
        .collect();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].len(), 3);
    assert!(writes[0].iter().all(|light| light.kind != 0));
    assert!(ctx.ops().iter().any(|op| matches!(
        op,
        TraceOp::SetUniform { name, value: forward_renderer::gfx::UniformValue::Int(3), .. }
            if name == "light_count"
    )));
}

#[test]
fn sky_draws_between_opaque_and_transparent() {
    let mut ctx = TraceContext::new();
    let config = RendererConfig::default().with_sky("assets/textures/sky.png");
    let mut renderer = ForwardRenderer::initialize(&mut ctx, VIEWPORT, &config).unwrap();

    let sky_mesh = ctx
        .ops()
        .iter()
        .find_map(|op| match op {
            TraceOp::CreateSphereMesh(mesh) => Some(*mesh),
            _ => None,
        })
        .unwrap();

    let mut materials = MaterialLibrary::new();
    let opaque = materials.insert(make_material(&mut ctx, false));
    let transparent = materials.insert(make_material(&mut ctx, true));
    let mut world = World::new();
    world.spawn((Camera::default(), Transform::default()));
    let solid = spawn_mesh_at(&mut ctx, &mut world, opaque, -2.0);
    let glass = spawn_mesh_at(&mut ctx, &mut world, transparent, -4.0);

    ctx.clear_ops();
    renderer.render(&mut ctx, &mut world, &materials);

    assert_eq!(drawn_meshes(&ctx), vec![solid, sky_mesh, glass]);

    // The sky pass culls front faces and passes far-plane depth ties
    let sky_draw_at = ctx
        .ops()
        .iter()
        .position(|op| *op == TraceOp::DrawMesh(sky_mesh))
        .unwrap();
    let sky_state = pipeline_state_before(&ctx, sky_draw_at);
    assert!(sky_state.depth_testing.enabled);
    assert_eq!(sky_state.depth_testing.function, CompareFunction::LessEqual);
    assert!(sky_state.face_culling.enabled);
    assert_eq!(sky_state.face_culling.culled_face, CullFace::Front);

    let solid_draw_at = ctx
        .ops()
        .iter()
        .position(|op| *op == TraceOp::DrawMesh(solid))
        .unwrap();
    let solid_state = pipeline_state_before(&ctx, solid_draw_at);
    assert_eq!(solid_state.depth_testing.function, CompareFunction::Less);
}

#[test]
fn far_plane_projection_pins_depth_to_one() {
    let projection = Mat4::perspective_rh(1.0, 1.5, 0.1, 100.0);
    let pinned = far_plane_projection() * projection;

    for point in [
        Vec3::new(0.0, 0.0, -1.0),
        Vec3::new(3.0, -2.0, -50.0),
        Vec3::new(-10.0, 4.0, -99.0),
    ] {
        let clip = pinned * point.extend(1.0);
        let ndc_z = clip.z / clip.w;
        assert!(
            (ndc_z - 1.0).abs() < 1e-6,
            "point {point:?} landed at NDC z {ndc_z}"
        );
    }
}

#[test]
fn postprocess_renders_offscreen_then_composites() {
    let mut ctx = TraceContext::new();
    let config = RendererConfig::default().with_postprocess("assets/shaders/grayscale.frag");
    let mut renderer = ForwardRenderer::initialize(&mut ctx, VIEWPORT, &config).unwrap();

    let offscreen = ctx
        .ops()
        .iter()
        .find_map(|op| match op {
            TraceOp::CreateFramebuffer(framebuffer) => Some(*framebuffer),
            _ => None,
        })
        .unwrap();

    let mut materials = MaterialLibrary::new();
    let opaque = materials.insert(make_material(&mut ctx, false));
    let mut world = World::new();
    world.spawn((Camera::default(), Transform::default()));
    spawn_mesh_at(&mut ctx, &mut world, opaque, -2.0);

    ctx.clear_ops();
    renderer.render(&mut ctx, &mut world, &materials);

    let ops = ctx.ops();
    let bind_offscreen_at = ops
        .iter()
        .position(|op| *op == TraceOp::BindFramebuffer(Some(offscreen)))
        .unwrap();
    let clear_at = ops
        .iter()
        .position(|op| matches!(op, TraceOp::Clear { .. }))
        .unwrap();
    let mesh_draw_at = ops
        .iter()
        .position(|op| matches!(op, TraceOp::DrawMesh(_)))
        .unwrap();
    let bind_default_at = ops
        .iter()
        .position(|op| *op == TraceOp::BindFramebuffer(None))
        .unwrap();
    let composite_at = ops
        .iter()
        .position(|op| matches!(op, TraceOp::DrawFullscreen(_)))
        .unwrap();

    assert!(bind_offscreen_at < clear_at);
    assert!(clear_at < mesh_draw_at);
    assert!(mesh_draw_at < bind_default_at);
    assert!(bind_default_at < composite_at);
    assert_eq!(ctx.bound_framebuffer(), None);
}

#[test]
fn destroy_releases_exactly_what_initialize_created() {
    let mut ctx = TraceContext::new();
    let config = RendererConfig::default()
        .with_sky("assets/textures/sky.png")
        .with_postprocess("assets/shaders/grayscale.frag");
    let mut renderer = ForwardRenderer::initialize(&mut ctx, VIEWPORT, &config).unwrap();
    assert!(ctx.live_resource_count() > 0);

    renderer.destroy(&mut ctx);
    assert_eq!(ctx.live_resource_count(), 0);

    // A second destroy must not touch anything
    let ops_before = ctx.ops().len();
    renderer.destroy(&mut ctx);
    assert_eq!(ctx.live_resource_count(), 0);
    assert_eq!(ctx.ops().len(), ops_before);
}

#[test]
fn initialize_reports_asset_failures() {
    let mut ctx = TraceContext::new();
    ctx.fail_loads(true);

    let sky_config = RendererConfig::default().with_sky("assets/textures/missing.png");
    assert!(matches!(
        ForwardRenderer::initialize(&mut ctx, VIEWPORT, &sky_config),
        Err(RendererError::SkyCreation(_))
    ));

    let post_config = RendererConfig::default().with_postprocess("assets/shaders/missing.frag");
    assert!(matches!(
        ForwardRenderer::initialize(&mut ctx, VIEWPORT, &post_config),
        Err(RendererError::PostProcessCreation(_))
    ));
}
