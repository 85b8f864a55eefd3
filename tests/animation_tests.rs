//! Animation Data Tests
//!
//! Tests for:
//! - Curve linear/step/cubic sampling and boundary holds
//! - Import-time validation of curves and clips
//! - Interpolatable trait implementations (f32, Vec3, Quat, MorphWeightData)
//! - KeyframeCursor sequential scan and binary search fallback
//! - LoopMode wrapping (Once, Loop, PingPong)
//! - AnimationClip duration auto-computation

use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Quat, Vec3};
use slotmap::SlotMap;

use kinema::animation::evaluator;
use kinema::animation::values::{Interpolatable, MorphWeightData};
use kinema::{
    AnimationClip, Channel, Curve, CurveData, InterpolationMode, KeyframeCursor, KinemaError, LoopMode,
    NodeHandle, Pose, PropertyValue, TargetPath,
};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn linear(times: Vec<f32>, values: Vec<f32>) -> Curve<f32> {
    Curve::new(times, values, InterpolationMode::Linear).unwrap()
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn node() -> NodeHandle {
    let mut nodes: SlotMap<NodeHandle, ()> = SlotMap::with_key();
    nodes.insert(())
}

// ============================================================================
// Curve: Linear Interpolation
// ============================================================================

#[test]
fn curve_linear_f32_midpoint() {
    let curve = linear(vec![0.0, 1.0], vec![0.0, 10.0]);

    let mut cursor = KeyframeCursor::default();
    let val = curve.sample_with_cursor(0.5, &mut cursor);
    assert!(approx(val, 5.0), "Expected 5.0, got {val}");
}

#[test]
fn curve_linear_f32_exact_keyframe() {
    let curve = linear(vec![0.0, 1.0, 2.0], vec![0.0, 10.0, 20.0]);

    let mut cursor = KeyframeCursor::default();
    assert!(approx(curve.sample_with_cursor(0.0, &mut cursor), 0.0));
    assert!(approx(curve.sample_with_cursor(1.0, &mut cursor), 10.0));
    assert!(approx(curve.sample_with_cursor(2.0, &mut cursor), 20.0));
}

#[test]
fn curve_linear_f32_holds_beyond_range() {
    let curve = linear(vec![0.0, 1.0], vec![0.0, 10.0]);

    let mut cursor = KeyframeCursor::default();
    let val = curve.sample_with_cursor(5.0, &mut cursor);
    assert!(approx(val, 10.0), "Expected 10.0, got {val}");
}

#[test]
fn curve_linear_f32_before_first() {
    let curve = linear(vec![1.0, 2.0], vec![10.0, 20.0]);

    let mut cursor = KeyframeCursor::default();
    let val = curve.sample_with_cursor(0.5, &mut cursor);
    assert!(approx(val, 10.0), "Expected 10.0, got {val}");
    assert!(approx(curve.sample(-3.0), 10.0));
}

#[test]
fn curve_nan_time_holds_first_key() {
    let curve = linear(vec![0.0, 1.0], vec![3.0, 7.0]);
    assert!(approx(curve.sample(f32::NAN), 3.0));
}

#[test]
fn curve_linear_vec3() {
    let curve = Curve::new(
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::new(10.0, 20.0, 30.0)],
        InterpolationMode::Linear,
    )
    .unwrap();

    let val = curve.sample(0.5);
    assert!(approx(val.x, 5.0));
    assert!(approx(val.y, 10.0));
    assert!(approx(val.z, 15.0));
}

#[test]
fn curve_linear_quat_slerp() {
    let q0 = Quat::IDENTITY;
    let q1 = Quat::from_rotation_y(PI);

    let curve = Curve::new(vec![0.0, 1.0], vec![q0, q1], InterpolationMode::Linear).unwrap();

    let val = curve.sample(0.5);
    let expected = q0.slerp(q1, 0.5);
    let angle = val.angle_between(expected);
    assert!(angle < 0.01, "Quaternion slerp mismatch: angle={angle}");
}

#[test]
fn curve_quat_slerp_is_equidistant() {
    let q0 = Quat::IDENTITY;
    let q1 = Quat::from_rotation_z(FRAC_PI_2);
    let curve = Curve::new(vec![0.0, 1.0], vec![q0, q1], InterpolationMode::Linear).unwrap();

    let mid = curve.sample(0.5);
    let to_start = mid.angle_between(q0);
    let to_end = mid.angle_between(q1);
    assert!((to_start - to_end).abs() < 1e-4, "{to_start} vs {to_end}");
    assert!(mid.is_normalized());
}

#[test]
fn curve_quat_takes_shortest_path() {
    let q0 = Quat::from_rotation_y(0.2);
    // Same orientation as rotation_y(0.4), opposite hemisphere
    let q1 = -Quat::from_rotation_y(0.4);
    let curve = Curve::new(vec![0.0, 1.0], vec![q0, q1], InterpolationMode::Linear).unwrap();

    let mid = curve.sample(0.5);
    assert!(mid.angle_between(Quat::from_rotation_y(0.3)) < 1e-3);
}

// ============================================================================
// Curve: Step Interpolation
// ============================================================================

#[test]
fn curve_step_holds_value() {
    let curve = Curve::new(
        vec![0.0, 1.0, 2.0],
        vec![0.0_f32, 100.0, 200.0],
        InterpolationMode::Step,
    )
    .unwrap();

    let mut cursor = KeyframeCursor::default();
    assert!(approx(curve.sample_with_cursor(0.0, &mut cursor), 0.0));
    assert!(approx(curve.sample_with_cursor(0.5, &mut cursor), 0.0));
    assert!(approx(curve.sample_with_cursor(0.99, &mut cursor), 0.0));
    assert!(approx(curve.sample_with_cursor(1.0, &mut cursor), 100.0));
    assert!(approx(curve.sample_with_cursor(1.5, &mut cursor), 100.0));
    assert!(approx(curve.sample_with_cursor(2.0, &mut cursor), 200.0));
}

// ============================================================================
// Curve: Cubic Spline Interpolation
// ============================================================================

#[test]
fn curve_cubic_f32_endpoints() {
    // values = [in_tangent0, value0, out_tangent0, in_tangent1, value1, out_tangent1]
    let curve = Curve::new(
        vec![0.0, 1.0],
        vec![
            0.0_f32, 0.0, 1.0, // key 0: in=0, value=0, out=1
            1.0, 10.0, 0.0, // key 1: in=1, value=10, out=0
        ],
        InterpolationMode::CubicSpline,
    )
    .unwrap();

    assert!(approx(curve.sample(0.0), 0.0), "got {}", curve.sample(0.0));
    assert!(approx(curve.sample(1.0), 10.0), "got {}", curve.sample(1.0));
}

#[test]
fn curve_cubic_zero_tangents_midpoint() {
    let curve = Curve::cubic_with_zero_tangents(vec![0.0, 1.0], vec![0.0_f32, 10.0]).unwrap();

    assert!(approx(curve.sample(0.5), 5.0), "got {}", curve.sample(0.5));
    // Ease-in: slower than linear early on
    assert!(curve.sample(0.25) < 2.5);
}

#[test]
fn curve_cubic_tangents_scale_with_key_spacing() {
    // Constant slope of 10/s expressed as tangents reproduces the line
    let curve = Curve::new(
        vec![0.0, 2.0],
        vec![10.0_f32, 0.0, 10.0, 10.0, 20.0, 10.0],
        InterpolationMode::CubicSpline,
    )
    .unwrap();

    assert!(approx(curve.sample(0.5), 5.0), "got {}", curve.sample(0.5));
    assert!(approx(curve.sample(1.5), 15.0), "got {}", curve.sample(1.5));
}

// ============================================================================
// Curve: Degenerate data and validation
// ============================================================================

#[test]
fn curve_single_key_is_constant() {
    let curve = linear(vec![0.5], vec![42.0]);
    assert!(curve.is_stationary());

    let mut cursor = KeyframeCursor::default();
    for t in [-1.0, 0.0, 0.5, 3.0] {
        assert!(approx(curve.sample_with_cursor(t, &mut cursor), 42.0));
    }
}

#[test]
fn curve_rejects_empty_keys() {
    let err = Curve::<f32>::new(vec![], vec![], InterpolationMode::Linear).unwrap_err();
    assert!(matches!(err, KinemaError::EmptyCurve));
}

#[test]
fn curve_rejects_unordered_and_duplicate_times() {
    let err = Curve::new(vec![0.0, 2.0, 1.0], vec![0.0_f32; 3], InterpolationMode::Linear).unwrap_err();
    assert!(matches!(err, KinemaError::UnorderedKeyframes { index: 2, .. }));

    let err = Curve::new(vec![0.0, 1.0, 1.0], vec![0.0_f32; 3], InterpolationMode::Linear).unwrap_err();
    assert!(matches!(err, KinemaError::UnorderedKeyframes { index: 2, .. }));
}

#[test]
fn curve_rejects_non_finite_times() {
    let err = Curve::new(vec![0.0, f32::NAN], vec![0.0_f32; 2], InterpolationMode::Linear).unwrap_err();
    assert!(matches!(err, KinemaError::NonFiniteKeyframe { index: 1 }));
}

#[test]
fn curve_rejects_value_count_mismatch() {
    let err = Curve::new(vec![0.0, 1.0], vec![0.0_f32; 2], InterpolationMode::CubicSpline).unwrap_err();
    assert!(matches!(
        err,
        KinemaError::ValueCountMismatch { expected: 6, found: 2 }
    ));
}

// ============================================================================
// KeyframeCursor
// ============================================================================

#[test]
fn sample_matches_cursor_across_all_times() {
    let curve = linear(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0, 10.0, 5.0, 20.0, 15.0]);

    let mut cursor = KeyframeCursor::default();
    for i in 0..=40 {
        let t = i as f32 * 0.1;
        let val_cursor = curve.sample_with_cursor(t, &mut cursor);
        let val_sample = curve.sample(t);
        assert!(
            approx(val_sample, val_cursor),
            "t={t}: sample()={val_sample} != sample_with_cursor()={val_cursor}"
        );
    }
}

#[test]
fn cursor_sequential_forward() {
    let curve = linear(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0, 10.0, 20.0, 30.0, 40.0]);

    let mut cursor = KeyframeCursor::default();
    for i in 0..=20 {
        let t = i as f32 * 0.2;
        let val = curve.sample_with_cursor(t, &mut cursor);
        let expected = t * 10.0;
        assert!(approx(val, expected), "t={t}: expected {expected}, got {val}");
    }
}

#[test]
fn cursor_sequential_backward() {
    let curve = linear(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0, 10.0, 20.0, 30.0, 40.0]);

    let mut cursor = KeyframeCursor::default();
    for i in (0..=20).rev() {
        let t = i as f32 * 0.2;
        let val = curve.sample_with_cursor(t, &mut cursor);
        assert!(approx(val, t * 10.0), "t={t}: got {val}");
    }
}

#[test]
fn cursor_forward_then_jump_back() {
    let curve = linear(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (0..7).map(|i| i as f32 * 10.0).collect());

    let mut cursor = KeyframeCursor::default();
    assert!(approx(curve.sample_with_cursor(5.5, &mut cursor), 55.0));
    // Large jump: binary search fallback
    assert!(approx(curve.sample_with_cursor(0.5, &mut cursor), 5.0));
}

#[test]
fn cursor_from_longer_curve_is_tolerated() {
    let long = linear((0..10).map(|i| i as f32).collect(), vec![0.0; 10]);
    let short = linear(vec![0.0, 2.0], vec![0.0, 100.0]);

    let mut cursor = KeyframeCursor::default();
    long.sample_with_cursor(8.5, &mut cursor);
    assert!(approx(short.sample_with_cursor(1.0, &mut cursor), 50.0));
}

// ============================================================================
// Interpolatable Implementations
// ============================================================================

#[test]
fn interpolatable_f32_linear() {
    let result = f32::interpolate_linear(&0.0, &10.0, 0.25);
    assert!(approx(result, 2.5));
}

#[test]
fn interpolatable_quat_linear_is_slerp() {
    let a = Quat::IDENTITY;
    let b = Quat::from_rotation_y(FRAC_PI_2);
    let result = Quat::interpolate_linear(&a, &b, 0.5);

    let angle = result.angle_between(a.slerp(b, 0.5));
    assert!(angle < 1e-4, "Slerp mismatch: angle={angle}");
}

#[test]
fn interpolatable_morph_weight_linear() {
    let a = MorphWeightData::from_slice(&[0.0, 1.0, 0.5, 0.0]);
    let b = MorphWeightData::from_slice(&[1.0, 0.0, 0.5, 1.0]);

    let result = MorphWeightData::interpolate_linear(&a, &b, 0.5);
    for w in &result.weights {
        assert!(approx(*w, 0.5));
    }
}

#[test]
fn interpolatable_morph_weight_missing_slots_read_zero() {
    let a = MorphWeightData::from_slice(&[1.0]);
    let b = MorphWeightData::from_slice(&[1.0, 1.0]);

    let result = MorphWeightData::interpolate_linear(&a, &b, 0.5);
    assert_eq!(result.len(), 2);
    assert!(approx(result.weights[1], 0.5));
}

// ============================================================================
// LoopMode
// ============================================================================

#[test]
fn loop_mode_once_clamps() {
    assert!(approx(LoopMode::Once.wrap(3.0, 2.0), 2.0));
    assert!(approx(LoopMode::Once.wrap(-1.0, 2.0), 0.0));
}

#[test]
fn loop_mode_loop_wraps() {
    assert!(approx(LoopMode::Loop.wrap(2.5, 2.0), 0.5));
    assert!(approx(LoopMode::Loop.wrap(-0.5, 2.0), 1.5));
}

#[test]
fn loop_mode_ping_pong_reflects() {
    assert!(approx(LoopMode::PingPong.wrap(1.5, 2.0), 1.5));
    assert!(approx(LoopMode::PingPong.wrap(2.5, 2.0), 1.5));
}

// ============================================================================
// AnimationClip
// ============================================================================

#[test]
fn clip_auto_duration() {
    let (a, b) = (node(), node());
    let clip = AnimationClip::new(
        "test",
        vec![
            CurveData::Vector3(
                Curve::new(vec![0.0, 1.5], vec![Vec3::ZERO, Vec3::X], InterpolationMode::Linear).unwrap(),
            ),
            CurveData::Quaternion(
                Curve::new(
                    vec![0.0, 3.0],
                    vec![Quat::IDENTITY, Quat::from_rotation_y(1.0)],
                    InterpolationMode::Linear,
                )
                .unwrap(),
            ),
        ],
        vec![
            Channel::new(0, a, TargetPath::Translation),
            Channel::new(1, b, TargetPath::Rotation),
        ],
    )
    .unwrap();

    assert!(approx(clip.duration(), 3.0), "got {}", clip.duration());
    assert_eq!(clip.name(), "test");
}

#[test]
fn clip_without_curves_has_zero_duration() {
    let clip = AnimationClip::new("empty", vec![], vec![]).unwrap();
    assert!(approx(clip.duration(), 0.0));
}

#[test]
fn clip_rejects_out_of_range_curve_index() {
    init_logger();
    let err = AnimationClip::new("bad", vec![], vec![Channel::new(0, node(), TargetPath::Scale)]).unwrap_err();
    assert!(matches!(err, KinemaError::CurveIndexOutOfBounds { curve: 0, curve_count: 0, .. }));
}

#[test]
fn clip_rejects_kind_mismatch() {
    init_logger();
    let curve = Curve::new(vec![0.0], vec![Vec3::ZERO], InterpolationMode::Linear).unwrap();
    let err = AnimationClip::new(
        "bad",
        vec![CurveData::Vector3(curve)],
        vec![Channel::new(0, node(), TargetPath::Rotation)],
    )
    .unwrap_err();
    assert!(matches!(err, KinemaError::TargetKindMismatch { .. }));
}

#[test]
fn translation_clip_sampled_at_half_second() {
    init_logger();
    let target = node();
    let clip = AnimationClip::new(
        "A",
        vec![CurveData::Vector3(
            Curve::new(
                vec![0.0, 1.0],
                vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)],
                InterpolationMode::Linear,
            )
            .unwrap(),
        )],
        vec![Channel::new(0, target, TargetPath::Translation)],
    )
    .unwrap();

    let mut cursor = KeyframeCursor::default();
    let value = evaluator::sample_channel(&clip, &clip.channels()[0], 0.5, &mut cursor);
    assert_eq!(value, Some(PropertyValue::Translation(Vec3::new(5.0, 0.0, 0.0))));

    let mut pose = Pose::new();
    pose.set(clip.channels()[0].target, value.unwrap());
    assert_eq!(pose.len(), 1);
}
