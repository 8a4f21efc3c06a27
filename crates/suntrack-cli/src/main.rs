//! suntrack CLI — detect the sun disk in images and simulate the tracking loop.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use suntrack::{
    detect, Actuator, Axis, Channel, CornerOffsets, EdgeMap, FrameBuffer, FrameSource, TrackError,
    Tracker, TrackerConfig,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "suntrack")]
#[command(about = "Locate a bright circular target and derive elevation/azimuth corrections")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the detection pipeline on a single image.
    Detect(CliDetectArgs),

    /// Drive the full tracking loop over a directory of frames.
    Track(CliTrackArgs),

    /// Print the effective configuration as JSON.
    ConfigInfo(CliTuneArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChannelArg {
    Red,
    Green,
    Blue,
    Luminance,
}

impl From<ChannelArg> for Channel {
    fn from(c: ChannelArg) -> Self {
        match c {
            ChannelArg::Red => Channel::Red,
            ChannelArg::Green => Channel::Green,
            ChannelArg::Blue => Channel::Blue,
            ChannelArg::Luminance => Channel::Luminance,
        }
    }
}

/// Tunable overrides shared by all subcommands. Unset flags keep the value
/// from `--config` (or the built-in defaults).
#[derive(Debug, Clone, Args, Default)]
struct CliTuneArgs {
    /// Full configuration as a JSON file; flags below override fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Edge threshold on |gx| + |gy|.
    #[arg(long)]
    edge_threshold: Option<f64>,

    /// Channel the edge kernels run over.
    #[arg(long, value_enum)]
    channel: Option<ChannelArg>,

    /// Angular step for circle voting (degrees).
    #[arg(long)]
    angle_step: Option<u32>,

    /// Minimum votes for a peak to become a candidate.
    #[arg(long)]
    vote_floor: Option<u32>,

    /// Tolerance for the secondary diameter check (pixels).
    #[arg(long)]
    diameter_tol: Option<u32>,

    /// Maximum green/red ratio for on-target pixels.
    #[arg(long)]
    color_ratio: Option<f32>,

    /// Proportional controller gain.
    #[arg(long)]
    gain: Option<f64>,

    /// Lower tilt limit (degrees).
    #[arg(long)]
    min_tilt: Option<f64>,

    /// Upper tilt limit (degrees).
    #[arg(long)]
    max_tilt: Option<f64>,

    /// Home elevation used when the target is lost.
    #[arg(long)]
    home_elevation: Option<f64>,

    /// Home azimuth used when the target is lost.
    #[arg(long)]
    home_azimuth: Option<f64>,

    /// Disable the square-corner glare rejection probe.
    #[arg(long)]
    no_corner_check: bool,

    /// Corner probe signs as sx1,sy1,sx2,sy2 (e.g. -1,-1,1,1).
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    corner_signs: Option<Vec<i32>>,
}

impl CliTuneArgs {
    fn build_config(&self) -> CliResult<TrackerConfig> {
        let mut cfg: TrackerConfig = match &self.config {
            Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
            None => TrackerConfig::default(),
        };
        if let Some(t) = self.edge_threshold {
            cfg.edge.threshold = t;
        }
        if let Some(c) = self.channel {
            cfg.edge.channel = c.into();
        }
        if let Some(s) = self.angle_step {
            cfg.vote.angle_step_deg = s;
        }
        if let Some(v) = self.vote_floor {
            cfg.select.vote_floor = v;
        }
        if let Some(t) = self.diameter_tol {
            cfg.select.diameter_tol_px = t;
        }
        if let Some(r) = self.color_ratio {
            cfg.diameter.color_ratio_max = r;
        }
        if let Some(g) = self.gain {
            cfg.control.gain = g;
        }
        if let Some(t) = self.min_tilt {
            cfg.control.min_tilt = t;
        }
        if let Some(t) = self.max_tilt {
            cfg.control.max_tilt = t;
        }
        if let Some(e) = self.home_elevation {
            cfg.control.home_elevation = e;
        }
        if let Some(a) = self.home_azimuth {
            cfg.control.home_azimuth = a;
        }
        if self.no_corner_check {
            cfg.select.corner_check = None;
        } else if let Some(signs) = &self.corner_signs {
            if signs.len() != 4 || signs.iter().any(|s| s.abs() != 1) {
                return Err("corner signs must be four values from {-1, 1}".into());
            }
            cfg.select.corner_check = Some(CornerOffsets {
                first: [signs[0], signs[1]],
                second: [signs[2], signs[3]],
            });
        }
        Ok(cfg)
    }
}

#[derive(Debug, Clone, Args)]
struct CliDetectArgs {
    /// Path to the input image (PNG or PPM).
    #[arg(long)]
    image: PathBuf,

    /// Path to write the detection result (JSON); stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write the binary edge mask as an image.
    #[arg(long)]
    edges_out: Option<PathBuf>,

    /// Write the input with the detected center marked by a red square.
    #[arg(long)]
    annotate_out: Option<PathBuf>,

    #[command(flatten)]
    tune: CliTuneArgs,
}

#[derive(Debug, Clone, Args)]
struct CliTrackArgs {
    /// Directory of frame images, consumed in sorted order.
    #[arg(long)]
    frames: PathBuf,

    /// Path to write the per-cycle trace (JSON array); stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    #[command(flatten)]
    tune: CliTuneArgs,
}

fn load_frame(path: &Path) -> CliResult<FrameBuffer> {
    let img = image::open(path)?.to_rgb8();
    Ok(FrameBuffer::from_rgb_image(&img))
}

fn write_json<T: serde::Serialize>(value: &T, out: Option<&Path>) -> CliResult<()> {
    match out {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            serde_json::to_writer_pretty(file, value)?;
        }
        None => {
            serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
            println!();
        }
    }
    Ok(())
}

fn run_detect(args: &CliDetectArgs) -> CliResult<()> {
    let mut config = args.tune.build_config()?;
    let frame = load_frame(&args.image)?;
    config.frame.width = frame.width();
    config.frame.height = frame.height();

    let detection = detect(&frame, &config);
    write_json(&detection, args.out.as_deref())?;

    if let Some(path) = &args.edges_out {
        let edges = EdgeMap::compute(&frame, &config.edge);
        edges.to_image().save(path)?;
    }
    if let Some(path) = &args.annotate_out {
        let mut marked = frame.clone();
        if let Some(c) = &detection.candidate {
            marked.mark_square(
                c.center_x as i64,
                c.center_y as i64,
                3,
                image::Rgb([255, 0, 0]),
            );
        }
        marked.to_rgb_image().save(path)?;
    }
    Ok(())
}

/// Frame source backed by a sorted directory listing. Exhausting the listing
/// reports a capture failure, which the tracker treats as a lost-target cycle.
struct DirFrameSource {
    paths: Vec<PathBuf>,
    next: usize,
}

impl DirFrameSource {
    fn from_dir(dir: &Path) -> CliResult<Self> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        paths.sort();
        if paths.is_empty() {
            return Err(format!("no frames found in {}", dir.display()).into());
        }
        Ok(Self { paths, next: 0 })
    }

    fn remaining(&self) -> usize {
        self.paths.len() - self.next
    }
}

impl FrameSource for DirFrameSource {
    fn capture(&mut self) -> Result<FrameBuffer, TrackError> {
        let Some(path) = self.paths.get(self.next) else {
            return Err(TrackError::CaptureFailure("frame sequence exhausted".into()));
        };
        self.next += 1;
        let img = image::open(path)
            .map_err(|e| TrackError::CaptureFailure(format!("{}: {}", path.display(), e)))?;
        Ok(FrameBuffer::from_rgb_image(&img.to_rgb8()))
    }
}

/// Actuator stand-in that logs every command.
#[derive(Default)]
struct LogActuator;

impl Actuator for LogActuator {
    fn drive(&mut self, axis: Axis, angle_deg: f64) -> Result<(), TrackError> {
        tracing::info!(?axis, angle_deg, "actuator command");
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TrackError> {
        tracing::info!("actuator flushed");
        Ok(())
    }
}

fn run_track(args: &CliTrackArgs) -> CliResult<()> {
    let mut config = args.tune.build_config()?;
    let mut source = DirFrameSource::from_dir(&args.frames)?;

    // Fixed geometry comes from the first frame of the sequence.
    let first = load_frame(&source.paths[0])?;
    config.frame.width = first.width();
    config.frame.height = first.height();

    let mut tracker = Tracker::new(config);
    let mut actuator = LogActuator;
    let mut trace = Vec::new();
    while source.remaining() > 0 {
        let report = tracker.step(&mut source, &mut actuator)?;
        trace.push(report);
    }
    actuator.flush()?;
    write_json(&trace, args.out.as_deref())
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Detect(args) => run_detect(args),
        Commands::Track(args) => run_track(args),
        Commands::ConfigInfo(tune) => {
            let cfg = tune.build_config()?;
            write_json(&cfg, None)
        }
    }
}
