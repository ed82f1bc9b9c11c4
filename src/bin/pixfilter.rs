use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rayon::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "pixfilter", version)]
struct Cli {
    /// Log every filter stage.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a filter chain to one image and write a PNG.
    Apply(ApplyArgs),
    /// Apply a filter chain to many images in parallel.
    Batch(BatchArgs),
    /// Print the margin a filter chain adds around its input.
    Bounds(BoundsArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Filter chain JSON.
    #[arg(long)]
    chain: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Region to filter as `x,y,w,h` (defaults to the whole image).
    #[arg(long)]
    rect: Option<RectArg>,

    /// Grow the canvas by the chain's margin (transparent padding) before filtering.
    #[arg(long)]
    expand: bool,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Filter chain JSON.
    #[arg(long)]
    chain: PathBuf,

    /// Directory for the output PNGs (named after the inputs).
    #[arg(long)]
    out_dir: PathBuf,

    /// Grow each canvas by the chain's margin before filtering.
    #[arg(long)]
    expand: bool,

    /// Input images.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct BoundsArgs {
    /// Filter chain JSON.
    #[arg(long)]
    chain: PathBuf,
}

#[derive(Clone, Copy, Debug)]
struct RectArg(pixel_filters::Rect);

impl FromStr for RectArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid rect '{s}': {e}"))?;
        let [x, y, w, h] = parts[..] else {
            return Err(format!("rect must be x,y,w,h, got '{s}'"));
        };
        Ok(Self(pixel_filters::Rect::new(x, y, w, h)))
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Apply(args) => cmd_apply(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Bounds(args) => cmd_bounds(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_chain(path: &Path) -> anyhow::Result<pixel_filters::FilterChain> {
    let cfg = pixel_filters::ChainConfig::from_path(path)
        .with_context(|| format!("load chain '{}'", path.display()))?;
    let assets_root = path.parent().unwrap_or_else(|| Path::new("."));
    let chain = cfg
        .build(assets_root)
        .with_context(|| format!("build chain '{}'", path.display()))?;
    Ok(chain)
}

/// Copy `buf` into a larger transparent canvas that leaves room for `margin`.
fn expand_canvas(
    buf: &pixel_filters::PixelBuffer,
    margin: pixel_filters::Rect,
) -> anyhow::Result<pixel_filters::PixelBuffer> {
    let grown = buf.rect().pad(margin);
    let width = u32::try_from(grown.width).context("expanded width out of range")?;
    let height = u32::try_from(grown.height).context("expanded height out of range")?;
    let mut canvas = pixel_filters::PixelBuffer::new(width, height);
    canvas.write_region(-margin.x, -margin.y, buf)?;
    Ok(canvas)
}

fn filter_image(
    chain: &pixel_filters::FilterChain,
    in_path: &Path,
    rect: Option<pixel_filters::Rect>,
    expand: bool,
) -> anyhow::Result<pixel_filters::PixelBuffer> {
    let mut buf = pixel_filters::load_image(in_path)?;
    if expand {
        buf = expand_canvas(&buf, chain.bounds())?;
    }
    let rect = rect.unwrap_or_else(|| buf.rect());
    let report = chain.apply(&mut buf, rect, pixel_filters::Target::InPlace)?;
    if report.skipped() > 0 {
        eprintln!(
            "{}: {} of {} filters skipped",
            in_path.display(),
            report.skipped(),
            chain.len()
        );
    }
    Ok(buf)
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let chain = read_chain(&args.chain)?;
    let buf = filter_image(&chain, &args.in_path, args.rect.map(|r| r.0), args.expand)?;
    pixel_filters::save_png(&args.out, &buf)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let chain = read_chain(&args.chain)?;
    let jobs = batch_outputs(&args.inputs, &args.out_dir)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let outputs = jobs
        .par_iter()
        .map(|(input, out)| -> anyhow::Result<&Path> {
            let buf = filter_image(&chain, input, None, args.expand)?;
            pixel_filters::save_png(out, &buf)?;
            Ok(out.as_path())
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    for out in &outputs {
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}

/// Pair every input with `<out_dir>/<file stem>.png`.
///
/// Only the final extension is dropped, so `shot.v1.png` and `shot.v2.png`
/// stay distinct. Two inputs mapping to the same output are an error.
fn batch_outputs(inputs: &[PathBuf], out_dir: &Path) -> anyhow::Result<Vec<(PathBuf, PathBuf)>> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::with_capacity(inputs.len());
    let mut jobs = Vec::with_capacity(inputs.len());
    for input in inputs {
        let stem = input
            .file_stem()
            .with_context(|| format!("input '{}' has no file name", input.display()))?;
        let out = out_dir.join(format!("{}.png", stem.to_string_lossy()));
        if let Some(prev) = seen.insert(out.clone(), input.as_path()) {
            anyhow::bail!(
                "inputs '{}' and '{}' would both write '{}'",
                prev.display(),
                input.display(),
                out.display()
            );
        }
        jobs.push((input.clone(), out));
    }
    Ok(jobs)
}

fn cmd_bounds(args: BoundsArgs) -> anyhow::Result<()> {
    let chain = read_chain(&args.chain)?;
    let m = chain.bounds();
    println!("{} {} {} {}", m.x, m.y, m.width, m.height);
    Ok(())
}
