use std::time::{Duration, Instant};

use shadowbox_core::{
    AnimationChannel, AnimationConfig, CameraConfig, CameraControl, ControlSet, FrameDriver,
    Plane, ShadowProjector, Transform,
};

fn driver() -> FrameDriver {
    FrameDriver::new(
        CameraConfig::default(),
        AnimationConfig {
            easing_enabled: false,
            ..AnimationConfig::default()
        },
        Plane::ground(-3.0),
    )
}

#[test]
fn shadow_uses_this_frames_light() {
    let mut driver = driver();
    driver.animation_mut().apply_preset(4);
    let controls = ControlSet::new();

    let before = driver.animation().light_position();
    let out = driver.step(1.0 / 30.0, &controls, false);
    assert_ne!(out.light_position, before);

    let light = out.light_position.to_homogeneous();
    let expected = ShadowProjector::project_plane(&light, driver.ground());
    assert_eq!(out.shadow, expected);
    let model = Transform::model_matrix(0.0, out.model_rotation);
    assert_eq!(out.model, model);
    assert_eq!(out.shadow_model, expected * model);
}

#[test]
fn camera_and_animation_share_delta() {
    let mut driver = driver();
    let controls: ControlSet = [CameraControl::OrbitRight].into_iter().collect();

    let start = Instant::now();
    let first = driver.advance_at(start, &controls, false);
    assert_eq!(first.dt, 1.0 / 60.0);
    assert_eq!(first.frame, 1);

    let second = driver.advance_at(start + Duration::from_millis(20), &controls, false);
    assert!((0.001..=0.033).contains(&second.dt));
    assert_eq!(second.frame, 2);

    let total = (first.dt + second.dt) as f64;
    assert!((driver.animation().total_time() - total).abs() < 1e-6);
    assert!(driver.camera().yaw() > 0.0);
}

#[test]
fn shadow_lands_on_ground() {
    let mut driver = driver();
    driver.animation_mut().toggle_channel(AnimationChannel::Orbit);
    driver.animation_mut().toggle_channel(AnimationChannel::Bobbing);
    let controls = ControlSet::new();

    for _ in 0..120 {
        let out = driver.step(1.0 / 60.0, &controls, false);
        let vertex = nalgebra::Point3::new(1.0, 1.0, -0.5);
        let flat = ShadowProjector::project_point(&out.shadow_model, &vertex).unwrap();
        assert!((flat.y + 3.0).abs() < 1e-3);
        assert!(out.light_position.y >= 0.5);
    }
}

#[test]
fn drag_rotation_turns_model_and_shadow() {
    let mut driver = driver();
    driver.rotate_model(30.0, -45.0);
    assert_eq!(driver.model_pose(), (30.0, 315.0));

    let out = driver.step(1.0 / 60.0, &ControlSet::new(), false);
    let spin = (315.0 + out.model_rotation) % 360.0;
    let model = Transform::model_matrix(30.0, spin);
    assert!((out.model - model).norm() < 1e-5);
    assert!((out.shadow_model - out.shadow * model).norm() < 1e-4);

    driver.reset_model_pose();
    assert_eq!(driver.model_pose(), (0.0, 0.0));
}
