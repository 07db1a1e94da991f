//! Track Name Tests
//!
//! Tests for:
//! - `[prefix:]bone.property` parsing
//! - Dotted bone names and nested prefixes
//! - Rejection of malformed names and unsupported properties

use retarget::animation::track_name::{TrackName, TrackNameError, TrackProperty, track_name};

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn parse_plain_name() {
    let name = TrackName::parse("Hips.position").unwrap();
    assert_eq!(name.prefix, None);
    assert_eq!(name.bone, "Hips");
    assert_eq!(name.property, TrackProperty::Position);
}

#[test]
fn parse_prefixed_name() {
    let name = TrackName::parse("mixamorig:LeftUpperArm.quaternion").unwrap();
    assert_eq!(name.prefix, Some("mixamorig"));
    assert_eq!(name.bone, "LeftUpperArm");
    assert_eq!(name.property, TrackProperty::Quaternion);
    assert_eq!(name.qualified_bone(), "mixamorig:LeftUpperArm");
}

#[test]
fn parse_splits_on_last_separators() {
    let dotted = TrackName::parse("Bone.001.scale").unwrap();
    assert_eq!(dotted.bone, "Bone.001");
    assert_eq!(dotted.property, TrackProperty::Scale);

    let nested = TrackName::parse("rig:mixamorig:Spine2.quaternion").unwrap();
    assert_eq!(nested.prefix, Some("rig:mixamorig"));
    assert_eq!(nested.bone, "Spine2");
}

// ============================================================================
// Rejection
// ============================================================================

#[test]
fn parse_rejects_malformed_names() {
    assert_eq!(TrackName::parse("Hips"), Err(TrackNameError::MissingSeparator));
    assert_eq!(TrackName::parse("Hips."), Err(TrackNameError::EmptyProperty));
    assert_eq!(TrackName::parse(".position"), Err(TrackNameError::EmptyBone));
    assert_eq!(TrackName::parse("mixamorig:.position"), Err(TrackNameError::EmptyBone));
}

#[test]
fn properties_are_case_sensitive_and_closed() {
    assert_eq!(
        TrackName::parse("Hips.Position"),
        Err(TrackNameError::UnsupportedProperty("Position".to_string()))
    );
    assert_eq!(
        TrackName::parse("Face.morphTargetInfluences"),
        Err(TrackNameError::UnsupportedProperty("morphTargetInfluences".to_string()))
    );
}

// ============================================================================
// Formatting
// ============================================================================

#[test]
fn format_round_trips_through_parse() {
    for property in [TrackProperty::Position, TrackProperty::Quaternion, TrackProperty::Scale] {
        let name = track_name("Skeleton_Hips_01", property);
        let parsed = TrackName::parse(&name).unwrap();
        assert_eq!(parsed.bone, "Skeleton_Hips_01");
        assert_eq!(parsed.property, property);
    }
    assert_eq!(TrackProperty::Position.components(), 3);
    assert_eq!(TrackProperty::Scale.components(), 3);
}
