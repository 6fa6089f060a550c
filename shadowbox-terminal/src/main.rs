/// Shadowbox - interactive terminal model viewer
///
/// Orbit the camera with A/D, Q/E and W/S (Tab for turbo), switch animation
/// presets with 1-5 and press Esc to quit.
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use shadowbox_core::obj::load_obj;
use shadowbox_core::{Mesh, Preset, PresetId};
use shadowbox_terminal::{TerminalApp, ViewerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "shadowbox",
    version,
    about = "Terminal 3D viewer with animated light and planar shadows"
)]
struct Args {
    /// Wavefront OBJ model to show (a cube when omitted)
    model: Option<PathBuf>,

    /// Animation preset to start with, by number (1-5) or name
    #[arg(long, default_value = "1", value_parser = parse_preset)]
    preset: PresetId,

    /// Height of the ground plane
    #[arg(long, default_value_t = -3.0, allow_hyphen_values = true)]
    ground_y: f32,

    /// Target frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Start with shadows hidden
    #[arg(long)]
    no_shadows: bool,

    /// Milliseconds a key counts as held after its last press, on terminals
    /// without key release events
    #[arg(long, default_value_t = 500)]
    hold_ms: u64,
}

fn parse_preset(value: &str) -> Result<PresetId, String> {
    let preset = match value.trim().parse::<PresetId>() {
        Ok(id) => Preset::by_id(id),
        Err(_) => Preset::by_name(value),
    };
    preset.map(|p| p.id).ok_or_else(|| {
        let names: Vec<_> = Preset::all().iter().map(|p| p.name).collect();
        format!("expected 1-{} or one of {}", names.len(), names.join(", "))
    })
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let mesh = match &args.model {
        Some(path) => load_obj(path).unwrap_or_else(|e| {
            log::error!("{}; showing a cube instead", e);
            Mesh::cube(2.0)
        }),
        None => Mesh::cube(2.0),
    };
    log::info!("model has {} triangles", mesh.triangles.len());

    let config = ViewerConfig {
        ground_y: args.ground_y,
        start_preset: args.preset,
        shadows: !args.no_shadows,
        target_fps: args.fps,
        hold_timeout: Duration::from_millis(args.hold_ms),
        ..ViewerConfig::default()
    };

    let mut app = TerminalApp::new(mesh, config)?;
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_by_number_or_name() {
        assert_eq!(parse_preset("4"), Ok(4));
        assert_eq!(parse_preset("zen"), Ok(5));
        assert_eq!(parse_preset(" Cinematic "), Ok(3));
        assert!(parse_preset("0").is_err());
        assert!(parse_preset("warp").unwrap_err().contains("Showcase"));
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["shadowbox", "--preset", "dynamic", "--ground-y", "-1.5"])
            .unwrap();
        assert_eq!(args.preset, 2);
        assert_eq!(args.ground_y, -1.5);
        assert!(args.model.is_none());
        assert!(Args::try_parse_from(["shadowbox", "--preset", "9"]).is_err());
    }
}
