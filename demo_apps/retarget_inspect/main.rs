//! Retarget Inspector
//!
//! Loads a destination rig (VRM, or any glTF whose bone names the bone map
//! understands) and an animation file, retargets one clip onto the rig and
//! prints which tracks survived. The clip is then played up to `--sample-at`
//! seconds and the resulting local rotation of every humanoid bone is shown.
//!
//! ```text
//! retarget_inspect --model assets/miyu.vrm --animation animations/idle.vrma --invert
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use glam::EulerRot;
use retarget::animation::AnimationClip;
use retarget::{
    AnimationMixer, BoneNameMap, GltfLoader, RetargetOptions, RetargetReport, SkeletonBinding,
    retarget_with_report,
};

/// Above this share of dropped tracks the result is probably not what the
/// user wanted.
const DROPPED_WARNING_RATIO: f32 = 0.5;

#[derive(Parser, Debug)]
#[command(name = "retarget_inspect", version, about = "Retarget an animation onto a humanoid rig")]
struct Cli {
    /// Destination model (.vrm, .glb, .gltf)
    #[arg(long)]
    model: PathBuf,

    /// Animation source (.vrma, .glb, .gltf)
    #[arg(long)]
    animation: PathBuf,

    /// Clip to retarget; defaults to the first one in the file
    #[arg(long)]
    clip: Option<String>,

    /// Invert rotation tracks while retargeting
    #[arg(long)]
    invert: bool,

    /// JSON bone-name map replacing or extending the built-in table
    #[arg(long)]
    bone_map: Option<PathBuf>,

    /// Playback time, in seconds, at which to sample the pose
    #[arg(long, default_value_t = 0.0)]
    sample_at: f32,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let bone_map = match &cli.bone_map {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read bone map: {}", path.display()))?;
            BoneNameMap::from_json_str(&json)
                .with_context(|| format!("Invalid bone map: {}", path.display()))?
        }
        None => BoneNameMap::humanoid(),
    };

    let model = GltfLoader::open(&cli.model)
        .with_context(|| format!("Failed to load model: {}", cli.model.display()))?;
    let mut skeleton = model.skeleton();
    let binding = if model.has_humanoid() {
        model.humanoid_binding()?
    } else {
        log::info!("{} has no humanoid extension, binding by bone name", cli.model.display());
        SkeletonBinding::from_skeleton(&skeleton, &bone_map)
    };
    log::info!("Destination rig binds {} humanoid bones", binding.len());

    let clips = GltfLoader::load_clips(&cli.animation)
        .with_context(|| format!("Failed to load animation: {}", cli.animation.display()))?;
    let source = select_clip(clips, cli.clip.as_deref())?;

    let options = RetargetOptions {
        invert_rotations: cli.invert,
    };
    let (clip, report) = retarget_with_report(&source, &binding, &bone_map, &options);

    print_report(&clip, &report);

    if report.is_empty_result() {
        log::warn!("No track of '{}' could be retargeted", source.name);
        return Ok(());
    }
    if report.dropped_ratio() > DROPPED_WARNING_RATIO {
        log::warn!(
            "{} of {} tracks were dropped",
            report.skipped.len(),
            report.source_tracks
        );
    }

    let clip = Arc::new(clip);
    let mut mixer = AnimationMixer::new();
    mixer.clip_action(&clip, &skeleton).play();
    mixer.update(cli.sample_at, &mut skeleton);

    println!();
    println!("Pose at {:.3}s (local rotation, XYZ euler degrees):", cli.sample_at);
    for (bone, node_name) in binding.iter() {
        let Some(local) = skeleton.find_bone(node_name).and_then(|i| skeleton.bone(i)).map(|b| b.local) else {
            continue;
        };
        let (x, y, z) = local.rotation.to_euler(EulerRot::XYZ);
        println!(
            "  {:<24} {:<28} {:>8.2} {:>8.2} {:>8.2}",
            bone.as_str(),
            node_name,
            x.to_degrees(),
            y.to_degrees(),
            z.to_degrees()
        );
    }

    Ok(())
}

fn select_clip(clips: Vec<AnimationClip>, name: Option<&str>) -> anyhow::Result<AnimationClip> {
    let available: Vec<String> = clips.iter().map(|c| c.name.clone()).collect();
    let found = match name {
        Some(name) => clips.into_iter().find(|c| c.name == name),
        None => clips.into_iter().next(),
    };
    match found {
        Some(clip) => Ok(clip),
        None if available.is_empty() => bail!("The animation file contains no clips"),
        None => bail!("No clip named {:?}; available: {available:?}", name.unwrap_or_default()),
    }
}

fn print_report(clip: &AnimationClip, report: &RetargetReport) {
    println!(
        "{}: {:.3}s, kept {} of {} tracks",
        clip.name, clip.duration, report.retained, report.source_tracks
    );
    for track in &clip.tracks {
        println!("  + {}", track.name);
    }
    for skipped in &report.skipped {
        println!("  - {:<40} {}", skipped.name, skipped.reason);
    }
}
