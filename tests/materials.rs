use forward_renderer::gfx::{
    CompareFunction, GraphicsContext, PipelineState, TraceContext, TraceOp, UniformValue,
};
use forward_renderer::material::{
    Material, MaterialError, MaterialKind, MaterialRecord, ALBEDO_MAP_UNIT,
    AMBIENT_OCCLUSION_MAP_UNIT, BASE_TEXTURE_UNIT, EMISSIVE_MAP_UNIT, ROUGHNESS_MAP_UNIT,
    SPECULAR_MAP_UNIT,
};
use glam::Vec4;

fn record_with_shader(ctx: &mut TraceContext) -> MaterialRecord {
    MaterialRecord {
        shader: Some(ctx.create_shader("mesh.vert", "mesh.frag").unwrap()),
        ..Default::default()
    }
}

#[test]
fn missing_shader_is_a_configuration_error() {
    let record = MaterialRecord::default();
    for kind in [
        MaterialKind::Base,
        MaterialKind::Tinted,
        MaterialKind::Textured,
        MaterialKind::Lit,
        MaterialKind::LitTinted,
        MaterialKind::LitTextured,
    ] {
        assert!(matches!(
            Material::new(kind, &record),
            Err(MaterialError::MissingShader)
        ));
    }
}

#[test]
fn absent_fields_fall_back_to_defaults() {
    let mut ctx = TraceContext::new();
    let record = record_with_shader(&mut ctx);

    let Material::Textured(textured) = Material::new(MaterialKind::Textured, &record).unwrap()
    else {
        panic!("expected textured variant");
    };
    assert_eq!(textured.tinted.tint, Vec4::ONE);
    assert_eq!(textured.alpha_threshold, 0.0);
    assert!(textured.texture.is_none());
    assert!(!textured.tinted.base.transparent);

    let Material::Lit(lit) = Material::new(MaterialKind::Lit, &record).unwrap() else {
        panic!("expected lit variant");
    };
    assert_eq!(lit.shininess, 1.0);
    assert_eq!(lit.diffuse, Vec4::ONE);

    let Material::LitTextured(lit_textured) =
        Material::new(MaterialKind::LitTextured, &record).unwrap()
    else {
        panic!("expected lit textured variant");
    };
    assert_eq!(lit_textured.roughness_range, glam::Vec2::new(0.0, 1.0));
}

#[test]
fn configure_resets_absent_fields_to_defaults() {
    let mut ctx = TraceContext::new();
    let mut record = record_with_shader(&mut ctx);
    record.tint = Some(Vec4::new(1.0, 0.0, 0.0, 1.0));

    let mut material = Material::new(MaterialKind::Tinted, &record).unwrap();
    record.tint = None;
    material.configure(&record).unwrap();

    let Material::Tinted(tinted) = material else {
        panic!("expected tinted variant");
    };
    assert_eq!(tinted.tint, Vec4::ONE);
}

#[test]
fn prepare_applies_parent_state_first() {
    let mut ctx = TraceContext::new();
    let mut record = record_with_shader(&mut ctx);
    record.texture = Some(ctx.load_texture("bricks.png", true).unwrap());
    let shader = record.shader.unwrap();
    let material = Material::new(MaterialKind::Textured, &record).unwrap();

    ctx.clear_ops();
    material.prepare(&mut ctx);

    let ops = ctx.ops();
    assert_eq!(ops[0], TraceOp::ApplyPipelineState(PipelineState::default()));
    assert_eq!(ops[1], TraceOp::UseShader(shader));
    assert_eq!(
        ops[2],
        TraceOp::SetUniform {
            shader,
            name: "tint".to_string(),
            value: UniformValue::Vec4(Vec4::ONE),
        }
    );
    assert_eq!(
        ops[3],
        TraceOp::SetUniform {
            shader,
            name: "alpha_threshold".to_string(),
            value: UniformValue::Float(0.0),
        }
    );
    assert!(matches!(
        ops[4],
        TraceOp::BindTexture {
            unit: BASE_TEXTURE_UNIT,
            ..
        }
    ));
    assert_eq!(
        ops[5],
        TraceOp::SetUniform {
            shader,
            name: "tex".to_string(),
            value: UniformValue::Int(BASE_TEXTURE_UNIT as i32),
        }
    );
}

#[test]
fn empty_texture_slots_explicitly_unbind_their_units() {
    let mut ctx = TraceContext::new();
    let mut record = record_with_shader(&mut ctx);
    // Only the albedo slot is populated
    record.albedo_map = Some(ctx.load_texture("albedo.png", true).unwrap());
    let material = Material::new(MaterialKind::LitTextured, &record).unwrap();

    ctx.clear_ops();
    material.prepare(&mut ctx);

    let ops = ctx.ops();
    assert!(ops
        .iter()
        .any(|op| matches!(op, TraceOp::BindTexture { unit: ALBEDO_MAP_UNIT, .. })));
    for unit in [
        SPECULAR_MAP_UNIT,
        ROUGHNESS_MAP_UNIT,
        AMBIENT_OCCLUSION_MAP_UNIT,
        EMISSIVE_MAP_UNIT,
    ] {
        assert!(
            ops.iter().any(|op| *op == TraceOp::UnbindTexture { unit }),
            "unit {unit} was not explicitly unbound"
        );
    }
}

#[test]
fn prepare_is_idempotent() {
    let mut ctx = TraceContext::new();
    let record = record_with_shader(&mut ctx);
    // No texture at all: the unit must still end up deterministically unbound
    let material = Material::new(MaterialKind::Textured, &record).unwrap();

    ctx.clear_ops();
    material.prepare(&mut ctx);
    let first: Vec<_> = ctx.ops().to_vec();
    ctx.clear_ops();
    material.prepare(&mut ctx);

    assert_eq!(first, ctx.ops());
    assert!(first
        .iter()
        .any(|op| *op == TraceOp::UnbindTexture { unit: BASE_TEXTURE_UNIT }));
}

#[test]
fn pipeline_state_presets_match_their_purpose() {
    let opaque = PipelineState::opaque();
    assert!(opaque.depth_testing.enabled);
    assert!(opaque.depth_write);
    assert!(opaque.blending.is_none());

    let transparent = PipelineState::transparent();
    assert!(transparent.depth_testing.enabled);
    assert_eq!(transparent.depth_testing.function, CompareFunction::Less);
    assert!(!transparent.depth_write);
    assert!(transparent.blending.is_some());
}
