use realms_viz::shader::sources::{FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT};
use realms_viz::shader::{ShaderStage, UniformValue};
use realms_viz::testing::{CountingGl, GlCall, GlObject};
use realms_viz::{FxError, HostState, ShaderError, ShaderHost};

fn released_in_reverse(gl: &CountingGl) -> bool {
    let mut deleted = gl.deleted();
    deleted.reverse();
    deleted == gl.created()
}

#[test]
fn fragment_compile_failure_leaves_nothing_behind() {
    let gl = CountingGl::default().failing_compile(ShaderStage::Fragment);
    let mut host = ShaderHost::new(gl.clone());

    let err = host.init(FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT, 0.0).unwrap_err();
    assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Fragment, .. }));
    assert_eq!(
        FxError::from(err).to_string(),
        "nucleus background: fragment shader failed to compile: ERROR: 0:1: fragment stage rejected"
    );
    assert_eq!(host.state(), HostState::CompileFailed);

    for t in 0..10 {
        assert!(!host.frame(t as f64 * 16.0, 640.0, 480.0, 1.0));
    }
    assert_eq!(gl.draw_calls(), 0);
    assert_eq!(gl.live_objects(), 0);
    assert!(released_in_reverse(&gl));
    assert!(!gl.created().iter().any(|o| matches!(o, GlObject::Program(_))));
}

#[test]
fn vertex_compile_failure_never_compiles_the_fragment() {
    let gl = CountingGl::default().failing_compile(ShaderStage::Vertex);
    let mut host = ShaderHost::new(gl.clone());
    assert!(host.init(FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT, 0.0).is_err());

    assert_eq!(
        gl.calls_matching(|c| matches!(c, GlCall::Compile(_))),
        vec![GlCall::Compile(ShaderStage::Vertex)]
    );
    assert_eq!(gl.live_objects(), 0);
}

#[test]
fn teardown_after_failure_deletes_nothing_twice() {
    let gl = CountingGl::default().failing_compile(ShaderStage::Fragment);
    let mut host = ShaderHost::new(gl.clone());
    let _ = host.init(FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT, 0.0);
    let deleted = gl.deleted().len();

    host.teardown();
    drop(host);
    assert_eq!(gl.deleted().len(), deleted);
}

#[test]
fn dropping_a_running_host_releases_everything() {
    let gl = CountingGl::default();
    {
        let mut host = ShaderHost::new(gl.clone());
        host.init(FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT, 0.0).unwrap();
        host.frame(16.0, 100.0, 100.0, 1.0);
        assert_eq!(gl.live_objects(), 5);
    }
    assert_eq!(gl.live_objects(), 0);
    assert!(released_in_reverse(&gl));
}

#[test]
fn resize_is_ignored_until_running() {
    let gl = CountingGl::default();
    let mut host = ShaderHost::new(gl.clone());
    host.resize(800.0, 600.0, 1.0);
    assert!(gl.calls().is_empty());

    host.init(FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT, 0.0).unwrap();
    host.resize(800.0, 600.0, 1.0);
    assert_eq!(
        gl.calls_matching(|c| matches!(c, GlCall::Resize(..))),
        vec![GlCall::Resize(800, 600)]
    );
}

#[test]
fn frame_counter_and_clock_advance_together() {
    let gl = CountingGl::default();
    let mut host = ShaderHost::new(gl.clone());
    host.init(FULLSCREEN_VERTEX, NUCLEUS_FRAGMENT, 500.0).unwrap();

    for i in 1..=3 {
        assert!(host.frame(500.0 + i as f64 * 1000.0, 320.0, 240.0, 0.5));
        assert_eq!(gl.uniform("iFrame"), Some(UniformValue::Int(i)));
        assert_eq!(gl.uniform("iTime"), Some(UniformValue::Float(i as f32)));
    }
    // pixel ratio clamps up to 1
    assert_eq!(gl.uniform("iResolution"), Some(UniformValue::Vec3([320.0, 240.0, 1.0])));
    assert_eq!(gl.draw_calls(), 3);
}
