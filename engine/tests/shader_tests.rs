//! Shader Tests - WGSL Parse and Validation
//!
//! Parses and validates the shipped shaders with naga so a syntax error or
//! type mismatch fails in CI instead of at pipeline creation.

use naga::valid::{Capabilities, ValidationFlags, Validator};

const PLANET_SHADER: &str = include_str!("../../shaders/planet.wgsl");
const UI_SHADER: &str = include_str!("../../shaders/ui.wgsl");

fn validate(name: &str, source: &str) -> naga::Module {
    let module = naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|e| panic!("{} failed to parse: {}", name, e));
    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .unwrap_or_else(|e| panic!("{} failed validation: {:?}", name, e));
    module
}

#[test]
fn test_planet_shader_validates() {
    let module = validate("planet.wgsl", PLANET_SHADER);

    let entry_points: Vec<_> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
    for expected in ["vs_main", "fs_main", "vs_sky", "fs_sky"] {
        assert!(
            entry_points.contains(&expected),
            "missing entry point {}",
            expected
        );
    }
}

#[test]
fn test_ui_shader_validates() {
    let module = validate("ui.wgsl", UI_SHADER);

    let entry_points: Vec<_> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
    assert!(entry_points.contains(&"vs_main"));
    assert!(entry_points.contains(&"fs_main"));
}

#[test]
fn test_planet_uniform_block_matches_cpu_layout() {
    // FrameUniforms on the CPU side is 112 bytes; the WGSL struct must agree
    // or every frame renders garbage.
    let module = validate("planet.wgsl", PLANET_SHADER);

    let frame_uniforms = module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some("FrameUniforms"))
        .expect("FrameUniforms struct missing");

    if let naga::TypeInner::Struct { span, .. } = &frame_uniforms.1.inner {
        assert_eq!(*span, 112, "FrameUniforms WGSL size drifted from CPU side");
    } else {
        panic!("FrameUniforms is not a struct");
    }
}
