use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tripreel::EncoderBackend as _;

#[derive(Parser, Debug)]
#[command(name = "tripreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the waypoint sequence built from a photo list as JSON.
    Waypoints(WaypointsArgs),
    /// Report which video codec the local ffmpeg can produce.
    Probe(ProbeArgs),
    /// Composite a single frame (map + overlays) as a PNG.
    Frame(FrameArgs),
    /// Replay a trip offline and save the recording (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct WaypointsArgs {
    /// Input photo list JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Also print the scrub timeline and playback length at this speed.
    #[arg(long, value_parser = parse_speed)]
    timeline: Option<f64>,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// ffmpeg executable.
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input photo list JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Waypoint to show (0-based, clamped).
    #[arg(long, default_value_t = 0)]
    waypoint: usize,

    /// Draw the intro card at this many ms into a recording instead of the caption.
    #[arg(long)]
    intro_ms: Option<f64>,

    /// Replay config JSON (branding, map size).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input photo list JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory for the saved video; overrides the config's `output_dir`.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Replay config JSON (branding, map size, output dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Playback speed multiplier (one of 0.5, 1, 2, 4).
    #[arg(long, default_value_t = 1.0, value_parser = parse_speed)]
    speed: f64,

    /// Simulated display refresh rate driving playback.
    #[arg(long, default_value_t = 60.0)]
    hz: f64,

    /// ffmpeg executable.
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Waypoints(args) => cmd_waypoints(args),
        Command::Probe(args) => cmd_probe(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn parse_speed(s: &str) -> Result<f64, String> {
    let speed: f64 = s.parse().map_err(|e| format!("invalid speed '{s}': {e}"))?;
    if tripreel::timing::SPEED_OPTIONS.contains(&speed) {
        Ok(speed)
    } else {
        Err(format!(
            "speed must be one of {:?}",
            tripreel::timing::SPEED_OPTIONS
        ))
    }
}

fn read_items_json(path: &Path) -> anyhow::Result<Vec<tripreel::PhotoItem>> {
    let f = File::open(path).with_context(|| format!("open photo list '{}'", path.display()))?;
    let r = BufReader::new(f);
    let items: Vec<tripreel::PhotoItem> =
        serde_json::from_reader(r).with_context(|| "parse photo list JSON")?;
    Ok(items)
}

fn read_config(path: Option<&Path>) -> anyhow::Result<tripreel::ReplayConfig> {
    match path {
        Some(p) => Ok(tripreel::ReplayConfig::from_path(p)?),
        None => Ok(tripreel::ReplayConfig::default()),
    }
}

fn assets_root(in_path: &Path) -> PathBuf {
    in_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn cmd_waypoints(args: WaypointsArgs) -> anyhow::Result<()> {
    let items = read_items_json(&args.in_path)?;
    let waypoints = tripreel::build_waypoints(&items);
    eprintln!(
        "{} of {} photos have usable coordinates",
        waypoints.len(),
        items.len()
    );

    let out = match args.timeline {
        Some(speed) => {
            let mut clock = tripreel::PlaybackClock::new();
            clock.set_speed_multiplier(speed);
            let _ = clock.start(waypoints, true);
            serde_json::json!({
                "waypoints": clock.waypoints(),
                "timeline": clock.timeline(),
                "duration_ms": clock.estimated_remaining_ms(),
            })
        }
        None => serde_json::to_value(&waypoints)?,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let backend = tripreel::FfmpegBackend::new(&args.ffmpeg);
    if !backend.can_capture() {
        anyhow::bail!("'{}' is not runnable", args.ffmpeg.display());
    }
    for candidate in &tripreel::CODEC_CANDIDATES {
        let ok = backend.is_type_supported(candidate);
        println!(
            "{:<32} {}",
            candidate.mime_type,
            if ok { "supported" } else { "-" }
        );
    }
    match tripreel::negotiate_codec(|c| backend.is_type_supported(c)) {
        Some(codec) => println!("selected: {}", codec.mime_type),
        None => {
            println!("selected: unsupported");
            anyhow::bail!("no supported codec; recording would be unavailable");
        }
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let items = read_items_json(&args.in_path)?;
    let canvas = cfg.canvas()?;

    let images = tripreel::ImageCache::new(
        Arc::new(tripreel::FsFetcher::with_root(assets_root(&args.in_path))),
        tripreel::LoadMode::Inline,
    );
    let mut composer = tripreel::FrameComposer::from_config(&cfg.branding)?;

    let mut clock = tripreel::PlaybackClock::new();
    let _ = clock.start(tripreel::build_waypoints(&items), true);
    if clock.waypoints().len() < tripreel::MIN_REPLAY_WAYPOINTS {
        anyhow::bail!("need at least two photos with coordinates");
    }
    let _ = clock.seek_to_waypoint(args.waypoint);

    let mut map = tripreel::TrackMap::new(canvas)?;
    map.set_route(clock.waypoints());
    let map_ref: &mut dyn tripreel::MapView = &mut map;
    if let Some(p) = clock.current_position() {
        map_ref.fly_to(p, 0.0);
        map_ref.set_marker(p);
    }

    let mut target = tripreel::Surface::new(canvas)?;
    let overlay = match args.intro_ms {
        Some(elapsed_ms) => tripreel::Overlay::Intro { elapsed_ms },
        None => tripreel::Overlay::Content {
            waypoint: clock.current_waypoint(),
            images: &images,
        },
    };
    composer.render_frame(map_ref.snapshot_surface()?, &mut target, overlay)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let frame = target.to_frame().to_opaque();
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let items = read_items_json(&args.in_path)?;
    let canvas = cfg.canvas()?;
    let out_dir = args.out_dir.clone().unwrap_or_else(|| cfg.output_dir());

    let images = tripreel::ImageCache::new(
        Arc::new(tripreel::FsFetcher::with_root(assets_root(&args.in_path))),
        tripreel::LoadMode::Inline,
    );
    let composer = tripreel::FrameComposer::from_config(&cfg.branding)?;
    let recorder = tripreel::RecorderController::new(
        Box::new(tripreel::FfmpegBackend::new(&args.ffmpeg)),
        composer,
        images.clone(),
    );
    if !recorder.is_supported() {
        anyhow::bail!("recording unsupported: no usable ffmpeg encoder");
    }

    let map = tripreel::TrackMap::new(canvas)?;
    let mut replay =
        tripreel::TripReplay::new(map, tripreel::ManualScheduler::new(), recorder, images);

    replay.set_speed_multiplier(args.speed);
    if !replay.start_replay(&items) {
        anyhow::bail!("need at least two photos with coordinates");
    }
    let route = replay.waypoints().to_vec();
    replay.map_mut().set_route(&route);
    if !replay.start_auto_record() {
        let reason = replay.recorder().last_error().unwrap_or("unknown");
        anyhow::bail!("failed to start recording: {reason}");
    }

    let mut frames = tripreel::FrameClock::new(args.hz, 0.0);
    while replay.is_recording() {
        replay.step(frames.now_ms());
        frames.advance();
    }
    while replay.is_processing() {
        replay.pump();
        std::thread::sleep(Duration::from_millis(5));
    }
    if let Some(err) = replay.recorder().last_error() {
        anyhow::bail!("recording failed: {err}");
    }

    match replay.save_video(&out_dir)? {
        Some(path) => eprintln!("wrote {}", path.display()),
        None => anyhow::bail!("recording produced no video"),
    }
    Ok(())
}
