//! Skinning Tests
//!
//! Tests for:
//! - Skin construction and validation
//! - Bone matrix computation from committed joint transforms
//! - Bind pose in INIT_POSE
//! - Joint bounds

use std::sync::Arc;
use std::time::Duration;

use glam::{Affine3A, Mat4, Vec3};

use kinema::{
    AnimationClip, Animator, BoneMatrices, Channel, Curve, CurveData, Instant, InterpolationMode, KinemaError,
    Node, NodeHandle, PlaybackMode, Scene, Skin, SkinningUpdater, TargetPath,
};

const EPSILON: f32 = 1e-4;

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

/// Two-joint chain: `root` at the origin, `tip` one unit above it.
fn rig() -> (Scene, NodeHandle, NodeHandle, Arc<Skin>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut scene = Scene::new();
    let root = scene.create_node("root");
    let mut tip = Node::new("tip");
    tip.transform.position = Vec3::Y;
    let tip = scene.add_to_parent(tip, root);
    scene.update_matrix_world();

    let skin = Skin::from_current_pose("body", vec![root, tip], vec![], &scene).unwrap();
    (scene, root, tip, Arc::new(skin))
}

fn move_root(root: NodeHandle, to: Vec3) -> Arc<AnimationClip> {
    let curve = Curve::new(vec![0.0], vec![to], InterpolationMode::Linear).unwrap();
    Arc::new(
        AnimationClip::new(
            "shift",
            vec![CurveData::Vector3(curve)],
            vec![Channel::new(0, root, TargetPath::Translation)],
        )
        .unwrap(),
    )
}

fn bone_translation(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

#[test]
fn skin_rejects_mismatched_inverse_binds() {
    let (_, root, tip, _) = rig();
    let err = Skin::new("bad", vec![root, tip], vec![Affine3A::IDENTITY], vec![]).unwrap_err();
    assert!(matches!(err, KinemaError::SkinMismatch { joints: 2, inverse_binds: 1, .. }));
}

#[test]
fn inverse_binds_invert_bind_pose() {
    let (_, _, _, skin) = rig();
    let ibm = skin.inverse_bind_matrices()[1];
    assert!(approx_vec(ibm.translation.into(), Vec3::new(0.0, -1.0, 0.0)));
}

#[test]
fn bind_pose_yields_identity_bones() {
    let (scene, _, _, skin) = rig();
    let mut bones = BoneMatrices::for_skin(&skin);
    let updated = SkinningUpdater::update(&skin, &scene, &mut bones);

    assert_eq!(updated, 2);
    for m in bones.as_slice() {
        assert!(m.abs_diff_eq(Mat4::IDENTITY, EPSILON));
    }
}

#[test]
fn init_pose_reports_bind_pose() {
    let (scene, root, _, skin) = rig();
    let mut animator = Animator::new(vec![move_root(root, Vec3::new(2.0, 0.0, 0.0))], vec![skin]);
    animator.activate_animation(0);
    animator.update(Instant::now(), &scene);

    let bones = animator.bone_matrices(0).unwrap();
    assert_eq!(bones.len(), 2);
    assert!(bones.is_bind_pose());
}

#[test]
fn playing_moves_every_joint_with_its_parent() {
    let (scene, root, _, skin) = rig();
    let mut animator = Animator::new(vec![move_root(root, Vec3::new(2.0, 0.0, 0.0))], vec![skin]);
    animator.activate_animation(0);
    animator.play();
    animator.update(Instant::now(), &scene);

    let bones = animator.bone_matrices(0).unwrap();
    for m in bones.as_slice() {
        assert!(approx_vec(bone_translation(m), Vec3::new(2.0, 0.0, 0.0)), "got {m}");
    }
}

#[test]
fn returning_to_init_pose_restores_bind_pose() {
    let (scene, root, _, skin) = rig();
    let mut animator = Animator::new(vec![move_root(root, Vec3::new(2.0, 0.0, 0.0))], vec![skin]);
    animator.activate_animation(0);
    animator.play();
    let t0 = Instant::now();
    animator.update(t0, &scene);
    assert!(!animator.bone_matrices(0).unwrap().is_bind_pose());

    animator.set_mode(PlaybackMode::InitPose);
    animator.update(t0 + Duration::from_millis(16), &scene);
    assert!(animator.bone_matrices(0).unwrap().is_bind_pose());
}

#[test]
fn missing_joint_keeps_previous_matrix() {
    let (mut scene, root, tip, skin) = rig();
    scene.set_position(root, Vec3::X);
    scene.update_matrix_world();

    let mut bones = BoneMatrices::for_skin(&skin);
    SkinningUpdater::update(&skin, &scene, &mut bones);
    let before = bones.as_slice()[1];

    scene.remove_node(tip);
    let updated = SkinningUpdater::update(&skin, &scene, &mut bones);
    assert_eq!(updated, 1);
    assert_eq!(bones.as_slice()[1], before);
}

#[test]
fn joint_bounds_cover_current_pose() {
    let (mut scene, root, _, skin) = rig();
    let (min, max) = skin.joint_bounds(&scene).unwrap();
    assert!(approx_vec(min, Vec3::ZERO));
    assert!(approx_vec(max, Vec3::Y));

    scene.set_position(root, Vec3::new(0.0, 0.0, -3.0));
    scene.update_matrix_world();
    let (min, max) = skin.joint_bounds(&scene).unwrap();
    assert!(approx_vec(min, Vec3::new(0.0, 0.0, -3.0)));
    assert!(approx_vec(max, Vec3::new(0.0, 1.0, -3.0)));
}

#[test]
fn joint_bounds_none_without_joints() {
    let (mut scene, root, _, skin) = rig();
    scene.remove_node(root);
    assert!(skin.joint_bounds(&scene).is_none());
}

#[test]
fn skin_influences_only_its_targets() {
    let (mut scene, root, tip, _) = rig();
    let mesh = scene.create_node("mesh");
    let prop = scene.create_node("prop");
    let skin = Skin::from_current_pose("body", vec![root, tip], vec![mesh], &scene).unwrap();

    assert_eq!(skin.targets(), &[mesh]);
    assert!(skin.influences(mesh));
    assert!(!skin.influences(prop));
    assert!(!skin.influences(root));
}
