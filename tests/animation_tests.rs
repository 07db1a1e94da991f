//! Animation Playback Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step/cubic interpolation
//! - KeyframeCursor sequential scan and binary search fallback
//! - Decoding flat PropertyTrack buffers into typed keyframes
//! - AnimationAction loop modes (Once, Loop, PingPong)
//! - Binder name resolution and AnimationMixer pose writes
//! - AnimationClip duration auto-computation

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec3};

use retarget::animation::action::{AnimationAction, LoopMode};
use retarget::animation::binder::Binder;
use retarget::animation::binding::TrackData;
use retarget::animation::clip::{AnimationClip, InterpolationMode, PropertyTrack};
use retarget::animation::mixer::AnimationMixer;
use retarget::animation::track_name::TrackProperty;
use retarget::animation::tracks::{KeyframeCursor, KeyframeTrack};
use retarget::animation::values::Interpolatable;
use retarget::scene::skeleton::Skeleton;
use retarget::scene::transform::Transform;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

fn quat_approx(a: Quat, b: Quat) -> bool {
    // q and -q are the same rotation
    a.abs_diff_eq(b, 1e-4) || a.abs_diff_eq(-b, 1e-4)
}

// ============================================================================
// KeyframeTrack: Linear Interpolation
// ============================================================================

#[test]
fn track_linear_vec3_midpoint() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::new(10.0, 20.0, 30.0)],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    let val = track.sample_with_cursor(0.5, &mut cursor).unwrap();
    assert!(vec3_approx(val, Vec3::new(5.0, 10.0, 15.0)), "got {val}");
}

#[test]
fn track_linear_exact_keyframes() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    assert!(vec3_approx(track.sample_with_cursor(0.0, &mut cursor).unwrap(), Vec3::ZERO));
    assert!(vec3_approx(track.sample_with_cursor(1.0, &mut cursor).unwrap(), Vec3::X));
    assert!(vec3_approx(track.sample_with_cursor(2.0, &mut cursor).unwrap(), Vec3::Y));
}

#[test]
fn track_linear_clamps_outside_range() {
    let track = KeyframeTrack::new(
        vec![1.0, 2.0],
        vec![Vec3::splat(10.0), Vec3::splat(20.0)],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    assert!(vec3_approx(track.sample_with_cursor(5.0, &mut cursor).unwrap(), Vec3::splat(20.0)));
    assert!(vec3_approx(track.sample(0.0).unwrap(), Vec3::splat(10.0)));
}

#[test]
fn track_linear_quat_slerp() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Quat::IDENTITY, Quat::from_rotation_y(FRAC_PI_2)],
        InterpolationMode::Linear,
    );

    let val = track.sample(0.5).unwrap();
    let expected = Quat::from_rotation_y(FRAC_PI_2 / 2.0);
    assert!(quat_approx(val, expected), "got {val:?}");
    assert!(approx(val.length(), 1.0));
}

// ============================================================================
// KeyframeTrack: Step & Cubic
// ============================================================================

#[test]
fn track_step_holds_value() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![Vec3::X, Vec3::Y, Vec3::Z],
        InterpolationMode::Step,
    );

    let mut cursor = KeyframeCursor::default();
    assert!(vec3_approx(track.sample_with_cursor(0.9, &mut cursor).unwrap(), Vec3::X));
    assert!(vec3_approx(track.sample_with_cursor(1.5, &mut cursor).unwrap(), Vec3::Y));
    assert!(vec3_approx(track.sample_with_cursor(2.0, &mut cursor).unwrap(), Vec3::Z));
}

#[test]
fn track_cubic_endpoints() {
    // [in_tangent, value, out_tangent] per keyframe
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::splat(4.0), Vec3::ZERO],
        InterpolationMode::CubicSpline,
    );

    let mut cursor = KeyframeCursor::default();
    assert!(vec3_approx(track.sample_with_cursor(0.0, &mut cursor).unwrap(), Vec3::ZERO));
    assert!(vec3_approx(track.sample_with_cursor(1.0, &mut cursor).unwrap(), Vec3::splat(4.0)));
}

#[test]
fn track_cubic_flat_tangents_midpoint() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::splat(4.0), Vec3::ZERO],
        InterpolationMode::CubicSpline,
    );

    // Hermite with zero tangents is symmetric around the midpoint
    let val = track.sample(0.5).unwrap();
    assert!(vec3_approx(val, Vec3::splat(2.0)), "got {val}");
}

#[test]
fn empty_track_samples_nothing() {
    let track = KeyframeTrack::<Vec3>::new(Vec::new(), Vec::new(), InterpolationMode::Linear);
    let mut cursor = KeyframeCursor::default();

    assert!(track.is_empty());
    assert!(track.sample(0.0).is_none());
    assert!(track.sample_with_cursor(0.0, &mut cursor).is_none());
}

#[test]
fn sample_matches_cursor_across_all_times() {
    let track = KeyframeTrack::new(
        vec![0.0, 0.25, 0.5, 1.0, 2.0, 3.5],
        vec![Vec3::X, Vec3::Y, Vec3::Z, Vec3::ONE, Vec3::NEG_X, Vec3::ZERO],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    for step in 0..=80 {
        let t = step as f32 * 0.05;
        let a = track.sample(t).unwrap();
        let b = track.sample_with_cursor(t, &mut cursor).unwrap();
        assert!(vec3_approx(a, b), "t={t}: {a} != {b}");
    }
}

// ============================================================================
// KeyframeCursor
// ============================================================================

#[test]
fn cursor_sequential_forward() {
    let times: Vec<f32> = (0..10).map(|i| i as f32).collect();
    let values: Vec<Vec3> = (0..10).map(|i| Vec3::splat(i as f32)).collect();
    let track = KeyframeTrack::new(times, values, InterpolationMode::Linear);

    let mut cursor = KeyframeCursor::default();
    for i in 0..10 {
        let t = i as f32 + 0.5;
        let _ = track.sample_with_cursor(t, &mut cursor);
        assert_eq!(cursor.last_index, i.min(9));
    }
}

#[test]
fn cursor_forward_then_jump_back() {
    let times: Vec<f32> = (0..20).map(|i| i as f32).collect();
    let values: Vec<Vec3> = (0..20).map(|i| Vec3::splat(i as f32)).collect();
    let track = KeyframeTrack::new(times, values, InterpolationMode::Linear);

    let mut cursor = KeyframeCursor::default();
    let _ = track.sample_with_cursor(15.5, &mut cursor);
    assert_eq!(cursor.last_index, 15);

    // Far beyond the scan window: falls back to binary search
    let val = track.sample_with_cursor(2.5, &mut cursor).unwrap();
    assert_eq!(cursor.last_index, 2);
    assert!(vec3_approx(val, Vec3::splat(2.5)));
}

#[test]
fn cursor_single_keyframe() {
    let track = KeyframeTrack::new(vec![0.5], vec![Vec3::splat(7.0)], InterpolationMode::Linear);
    let mut cursor = KeyframeCursor::default();

    assert!(vec3_approx(track.sample_with_cursor(0.0, &mut cursor).unwrap(), Vec3::splat(7.0)));
    assert!(vec3_approx(track.sample_with_cursor(99.0, &mut cursor).unwrap(), Vec3::splat(7.0)));
}

// ============================================================================
// Decoding PropertyTrack Buffers
// ============================================================================

#[test]
fn decode_vec3_track() {
    let track = PropertyTrack::new(
        "Hips.position",
        vec![0.0, 1.0],
        vec![0.0, 1.0, 0.0, 1.0, 1.0, 0.0],
        InterpolationMode::Linear,
    );
    let typed = KeyframeTrack::<Vec3>::from_vec3_track(&track).unwrap();

    assert_eq!(typed.values, vec![Vec3::Y, Vec3::new(1.0, 1.0, 0.0)]);
}

#[test]
fn decode_quat_track_is_xyzw() {
    let q = Quat::from_rotation_z(0.7);
    let track = PropertyTrack::new(
        "Hips.quaternion",
        vec![0.0],
        q.to_array().to_vec(),
        InterpolationMode::Step,
    );
    let typed = KeyframeTrack::<Quat>::from_quat_track(&track).unwrap();

    assert!(quat_approx(typed.values[0], q));
}

#[test]
fn decode_rejects_mismatched_buffer() {
    let short = PropertyTrack::new(
        "Hips.position",
        vec![0.0, 1.0],
        vec![0.0, 1.0, 0.0],
        InterpolationMode::Linear,
    );
    assert!(!short.is_well_formed(TrackProperty::Position));
    assert!(KeyframeTrack::<Vec3>::from_vec3_track(&short).is_none());

    let cubic = PropertyTrack::new(
        "Hips.quaternion",
        vec![0.0],
        vec![0.0, 0.0, 0.0, 1.0],
        InterpolationMode::CubicSpline,
    );
    assert!(KeyframeTrack::<Quat>::from_quat_track(&cubic).is_none());
}

// ============================================================================
// Interpolatable
// ============================================================================

#[test]
fn interpolatable_vec3_linear() {
    let v = Vec3::interpolate_linear(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0), 0.25);
    assert!(vec3_approx(v, Vec3::new(0.5, 1.0, 1.5)));
}

#[test]
fn interpolatable_quat_cubic_is_normalized() {
    let a = Quat::from_rotation_x(0.2);
    let b = Quat::from_rotation_x(1.2);
    let tangent = Quat::from_xyzw(0.3, 0.0, 0.0, 0.1);

    let q = Quat::interpolate_cubic(a, tangent, tangent, b, 0.4, 1.0);
    assert!(approx(q.length(), 1.0));
}

// ============================================================================
// AnimationAction
// ============================================================================

fn make_simple_clip(duration: f32) -> Arc<AnimationClip> {
    let track = PropertyTrack::new(
        "Hips.position",
        vec![0.0, duration],
        vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        InterpolationMode::Linear,
    );
    Arc::new(AnimationClip::new("simple", vec![track]))
}

#[test]
fn action_loop_mode_once() {
    let mut action = AnimationAction::new(make_simple_clip(2.0));
    action.loop_mode = LoopMode::Once;

    action.update(1.5);
    assert!(approx(action.time, 1.5));
    assert!(!action.paused);

    action.update(1.0);
    assert!(approx(action.time, 2.0));
    assert!(action.paused, "Once should auto-pause at the end");
}

#[test]
fn action_loop_mode_loop() {
    let mut action = AnimationAction::new(make_simple_clip(2.0));
    action.loop_mode = LoopMode::Loop;

    action.update(2.5);
    assert!(approx(action.time, 0.5), "got {}", action.time);
    assert!(!action.paused);
}

#[test]
fn action_loop_reverse_playback() {
    let mut action = AnimationAction::new(make_simple_clip(2.0));
    action.loop_mode = LoopMode::Loop;
    action.time_scale = -1.0;

    action.update(0.5);
    assert!(approx(action.time, 1.5), "got {}", action.time);
}

#[test]
fn action_ping_pong_runs_backwards_on_second_pass() {
    let mut action = AnimationAction::new(make_simple_clip(2.0));
    action.loop_mode = LoopMode::PingPong;

    action.update(2.5);
    assert!(approx(action.time, 1.5), "got {}", action.time);

    let mut late = AnimationAction::new(make_simple_clip(2.0));
    late.loop_mode = LoopMode::PingPong;
    late.update(3.5);
    assert!(approx(late.time, 0.5), "got {}", late.time);
}

#[test]
fn action_paused_and_disabled_do_not_advance() {
    let mut action = AnimationAction::new(make_simple_clip(2.0));
    action.paused = true;
    action.update(1.0);
    assert!(approx(action.time, 0.0));

    action.play();
    action.stop();
    action.update(1.0);
    assert!(approx(action.time, 0.0));
    assert!(!action.is_running());
}

#[test]
fn action_time_scale() {
    let mut action = AnimationAction::new(make_simple_clip(10.0));
    action.time_scale = 2.0;
    action.update(1.0);
    assert!(approx(action.time, 2.0));
}

#[test]
fn action_zero_duration_clip_stays_put() {
    let mut action = AnimationAction::new(Arc::new(AnimationClip::new("empty", Vec::new())));
    action.update(1.0);
    assert!(approx(action.time, 0.0));
}

// ============================================================================
// Binder & Mixer
// ============================================================================

fn make_rig() -> Skeleton {
    let mut skeleton = Skeleton::new("rig");
    let hips = skeleton.add_bone("Skeleton_Hips_01", None, Transform::IDENTITY);
    skeleton.add_bone(
        "Skeleton_LeftUpperArm_01",
        Some(hips),
        Transform::from_trs(Vec3::new(0.2, 0.4, 0.0), Quat::IDENTITY, Vec3::ONE),
    );
    skeleton
}

fn make_arm_clip() -> Arc<AnimationClip> {
    let rotation = Quat::from_rotation_z(FRAC_PI_2);
    let mut values = Quat::IDENTITY.to_array().to_vec();
    values.extend(rotation.to_array());

    Arc::new(AnimationClip::new(
        "raise",
        vec![
            PropertyTrack::new(
                "Skeleton_LeftUpperArm_01.quaternion",
                vec![0.0, 1.0],
                values,
                InterpolationMode::Linear,
            ),
            PropertyTrack::new(
                "Skeleton_Hips_01.position",
                vec![0.0, 1.0],
                vec![0.0, 1.0, 0.0, 0.0, 1.0, 2.0],
                InterpolationMode::Linear,
            ),
            PropertyTrack::new(
                "mixamorig:Hips.position",
                vec![0.0],
                vec![0.0, 0.0, 0.0],
                InterpolationMode::Linear,
            ),
            PropertyTrack::new(
                "Skeleton_Hips_01.scale",
                vec![0.0, 1.0],
                vec![1.0, 1.0],
                InterpolationMode::Linear,
            ),
        ],
    ))
}

#[test]
fn binder_resolves_exact_node_names_only() {
    let skeleton = make_rig();
    let bindings = Binder::bind(&skeleton, &make_arm_clip());

    // Unknown bone and malformed buffer are both left unbound
    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings[0].track_index, 0);
    assert_eq!(bindings[0].bone_index, 1);
    assert_eq!(bindings[0].property, TrackProperty::Quaternion);
    assert!(matches!(bindings[0].data, TrackData::Quaternion(_)));

    assert_eq!(bindings[1].bone_index, 0);
    assert!(matches!(bindings[1].data, TrackData::Vector3(_)));
}

#[test]
fn mixer_writes_sampled_pose() {
    let mut skeleton = make_rig();
    let clip = make_arm_clip();
    let mut mixer = AnimationMixer::new();

    let action = mixer.clip_action(&clip, &skeleton);
    action.loop_mode = LoopMode::Once;
    action.play();
    mixer.update(0.5, &mut skeleton);

    let arm = skeleton.bone(1).unwrap();
    assert!(quat_approx(arm.local.rotation, Quat::from_rotation_z(FRAC_PI_2 / 2.0)));
    // Position was not animated on the arm
    assert!(vec3_approx(arm.local.position, Vec3::new(0.2, 0.4, 0.0)));

    let hips = skeleton.bone(0).unwrap();
    assert!(vec3_approx(hips.local.position, Vec3::new(0.0, 1.0, 1.0)));
}

#[test]
fn mixer_reuses_action_for_same_clip() {
    let skeleton = make_rig();
    let clip = make_arm_clip();
    let mut mixer = AnimationMixer::new();

    mixer.clip_action(&clip, &skeleton).time = 0.25;
    let again = mixer.clip_action(&clip, &skeleton);
    assert!(approx(again.time, 0.25));
    assert_eq!(mixer.actions().len(), 1);

    // Same contents, different clip instance
    let copy = Arc::new((*clip).clone());
    mixer.clip_action(&copy, &skeleton);
    assert_eq!(mixer.actions().len(), 2);
}

#[test]
fn mixer_blends_partial_weight() {
    let mut skeleton = make_rig();
    let clip = make_arm_clip();
    let mut mixer = AnimationMixer::new();

    let action = mixer.clip_action(&clip, &skeleton);
    action.weight = 0.5;
    action.time = 1.0;
    action.paused = true;
    mixer.update(0.0, &mut skeleton);

    let arm = skeleton.bone(1).unwrap();
    assert!(quat_approx(arm.local.rotation, Quat::from_rotation_z(FRAC_PI_2 / 2.0)));
    let hips = skeleton.bone(0).unwrap();
    assert!(vec3_approx(hips.local.position, Vec3::new(0.0, 0.5, 1.0)));
}

#[test]
fn mixer_partial_weight_is_stable_across_frames() {
    let mut skeleton = Skeleton::new("rig");
    skeleton.add_bone("Root", None, Transform::IDENTITY);
    let clip = Arc::new(AnimationClip::new(
        "hold",
        vec![PropertyTrack::new(
            "Root.position",
            vec![0.0, 1.0],
            vec![2.0, 0.0, 0.0, 2.0, 0.0, 0.0],
            InterpolationMode::Linear,
        )],
    ));
    let mut mixer = AnimationMixer::new();
    mixer.clip_action(&clip, &skeleton).weight = 0.5;

    for frame in 0..3 {
        mixer.update(0.1, &mut skeleton);
        let position = skeleton.bone(0).unwrap().local.position;
        assert!(vec3_approx(position, Vec3::new(1.0, 0.0, 0.0)), "frame {frame}: {position}");
    }
}

#[test]
fn mixer_skips_disabled_actions() {
    let mut skeleton = make_rig();
    let clip = make_arm_clip();
    let mut mixer = AnimationMixer::new();

    mixer.clip_action(&clip, &skeleton).stop();
    mixer.update(0.5, &mut skeleton);

    assert_eq!(skeleton.bone(1).unwrap().local, skeleton.bone(1).unwrap().rest);
}

// ============================================================================
// AnimationClip
// ============================================================================

#[test]
fn clip_auto_duration() {
    let clip = AnimationClip::new(
        "test",
        vec![
            PropertyTrack::new("A.position", vec![0.0, 1.0], vec![0.0; 6], InterpolationMode::Linear),
            PropertyTrack::new("B.position", vec![0.0, 2.5], vec![0.0; 6], InterpolationMode::Linear),
        ],
    );
    assert!(approx(clip.duration, 2.5));
    assert!(clip.track("B.position").is_some());
    assert!(clip.track("C.position").is_none());
}

#[test]
fn clip_empty_tracks_zero_duration() {
    let clip = AnimationClip::new("empty", Vec::new());
    assert!(approx(clip.duration, 0.0));
}
