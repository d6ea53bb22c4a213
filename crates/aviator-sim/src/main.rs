//! rotor-sim: headless host for an Aviator Arsenal rotor component
//!
//! Architecture:
//!   profile/  scripted airspeed/altitude → flight samples
//!   host/     headless transforms and loop sound
//!   audio/    rodio output device (feature `audio`)

#[cfg(feature = "audio")]
mod audio;
mod host;
mod profile;

use std::path::PathBuf;

use anyhow::{Context, Result};
use aviator_rotor::{
    LoopTransition, PresentationConfig, RotorComponent, RotorConfig, VolumePolicy,
};
use clap::Parser;
use glam::Vec3;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use host::HeadlessScene;
use profile::Profile;

#[derive(Parser, Debug)]
#[command(name = "rotor-sim", version, about = "Fly a rotor component through a scripted profile")]
struct Args {
    /// Rotor config (TOML). Defaults to a propeller with the dive siren cue.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Profile::Dive)]
    profile: Profile,

    /// Simulated seconds
    #[arg(long, default_value_t = 60.0)]
    duration: f32,

    /// Physics step (s)
    #[arg(long, default_value_t = 0.02)]
    fixed_dt: f32,

    /// Render frame length (s)
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f32,

    /// Print one JSON record per frame on stdout
    #[arg(long)]
    json: bool,

    /// Audio file to loop on the default output device
    #[arg(long)]
    audio: Option<PathBuf>,
}

#[derive(Serialize)]
struct FrameRecord {
    t: f32,
    airspeed: f32,
    dynamic_pressure_kpa: f32,
    rotational_speed: f32,
    target_rotational_speed: f32,
    volume: f32,
    mode: Option<&'static str>,
    cue: &'static str,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("rotor_sim=info".parse()?)
                .add_directive("aviator_rotor=info".parse()?),
        )
        .init();

    let args = Args::parse();
    tracing::info!("rotor-sim v{}", env!("CARGO_PKG_VERSION"));

    if args.fixed_dt <= 0.0 || args.frame_dt <= 0.0 {
        anyhow::bail!("--fixed-dt and --frame-dt must be positive");
    }

    let config = match &args.config {
        Some(path) => RotorConfig::load(path)
            .with_context(|| format!("Failed to load rotor config {}", path.display()))?,
        None => demo_config(),
    };

    let mut scene = HeadlessScene::new(Vec3::Z, args.audio.clone());
    let mut rotor = RotorComponent::try_initialize(config, &mut scene)
        .context("Failed to start rotor component")?;

    run(&args, &mut rotor)
}

/// Stock propeller with the dive siren on the threshold-product cue
fn demo_config() -> RotorConfig {
    RotorConfig {
        audio_clip_name: "AviatorArsenal/Sounds/trumpet".to_string(),
        volume: VolumePolicy::default(),
        presentation: Some(PresentationConfig {
            discrete_transform: "blades".to_string(),
            disk_transform: "disk".to_string(),
            axis_transform: "hub".to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn run(args: &Args, rotor: &mut RotorComponent<host::HeadlessTransform, host::SimSound>) -> Result<()> {
    let report_frames = ((1.0 / args.frame_dt).round() as u64).max(1);
    let mut accumulator = 0.0f32;
    let mut fixed_ticks: u64 = 0;
    let mut frame: u64 = 0;
    let mut peak_speed = 0.0f32;
    let mut peak_volume = 0.0f32;

    loop {
        let t = frame as f32 * args.frame_dt;
        if t >= args.duration {
            break;
        }
        let sample = args.profile.sample(t);

        // Consume this frame's time in fixed physics steps
        accumulator += args.frame_dt;
        while accumulator >= args.fixed_dt {
            rotor.on_fixed_tick(&sample, args.fixed_dt, true);
            accumulator -= args.fixed_dt;
            fixed_ticks += 1;
        }

        let out = rotor
            .on_frame_tick(&sample, args.frame_dt, true)
            .context("Rotor component stopped responding")?;
        peak_speed = peak_speed.max(out.rotational_speed.abs());
        peak_volume = peak_volume.max(out.volume);

        let cue = match out.cue {
            LoopTransition::Started => "started",
            LoopTransition::Stopped => "stopped",
            LoopTransition::Unchanged => "unchanged",
        };

        if args.json {
            let record = FrameRecord {
                t,
                airspeed: sample.surface_speed,
                dynamic_pressure_kpa: sample.dynamic_pressure_kpa,
                rotational_speed: out.rotational_speed,
                target_rotational_speed: rotor.target_rotational_speed(),
                volume: out.volume,
                mode: out.mode.map(|m| m.as_str()),
                cue,
            };
            println!("{}", serde_json::to_string(&record)?);
        } else if out.cue != LoopTransition::Unchanged || out.mode_changed || frame % report_frames == 0 {
            tracing::info!(
                "t={:6.2}s v={:6.1} q={:6.2}kPa speed={:7.1} vol={:.2} mode={} cue={}",
                t,
                sample.surface_speed,
                sample.dynamic_pressure_kpa,
                out.rotational_speed,
                out.volume,
                out.mode.map(|m| m.as_str()).unwrap_or("-"),
                cue
            );
        }

        frame += 1;
    }

    tracing::info!(
        "Done: {} frames, {} physics ticks, peak speed {:.1}, peak volume {:.2}",
        frame,
        fixed_ticks,
        peak_speed,
        peak_volume
    );
    Ok(())
}
