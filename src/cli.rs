use crate::config::{Config, load_config};
use crate::export::render_pages;
use crate::filter::{FilterState, filter_data};
use crate::ir::TimelineData;
use crate::layout::{TimelineLayout, compute_layout};
use crate::layout_dump::write_layout_dump;
use crate::parser::{ParseOptions, parse_timeline_with_options};
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Baseline pixels per year that corresponds to a year-height scale of 1.
pub const BASE_YEAR_HEIGHT: f32 = 24.0;

#[derive(Parser, Debug)]
#[command(name = "nenpyo", version, about = "Multi-lane chronological timeline renderer")]
pub struct Args {
    /// Input file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Pixels per year (24 is the baseline density)
    #[arg(long = "year-height", default_value_t = BASE_YEAR_HEIGHT)]
    pub year_height: f32,

    /// Comma-separated lane names to keep
    #[arg(long = "lanes", value_delimiter = ',')]
    pub lanes: Option<Vec<String>>,

    /// First year to keep
    #[arg(long = "from", allow_hyphen_values = true)]
    pub from: Option<i32>,

    /// Last year to keep
    #[arg(long = "to", allow_hyphen_values = true)]
    pub to: Option<i32>,

    /// Split the output into fixed-size pages
    #[arg(long = "paginate")]
    pub paginate: bool,

    /// Reject malformed rows instead of skipping them
    #[arg(long = "strict")]
    pub strict: bool,

    /// Log debug output to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Json => "json",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let options = ParseOptions {
        strict: args.strict,
        ..ParseOptions::default()
    };
    let data = parse_timeline_with_options(&input, options)?;
    info!(lanes = data.len(), events = data.event_count(), "loaded timeline");

    let scale = args.year_height / BASE_YEAR_HEIGHT;
    let data = apply_filters(&args, data);
    let layout = compute_layout(&data, scale, &config.layout);
    debug!(
        total_width = layout.layout_config.total_width,
        timeline_height = ?layout.layout_config.timeline_height,
        "computed layout"
    );

    if args.paginate {
        return write_pages(&args, &layout, &data, &config);
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &data, &config.theme, &config.layout, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &data, &config.theme, &config.layout, &config.render);
            write_png(&svg, &output, &config)?;
        }
        OutputFormat::Json => {
            write_layout_dump(
                args.output.as_deref(),
                &layout,
                &data,
                config.layout.gridline_interval,
            )?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Narrows the dataset to the requested lanes and years. The layout is then
/// computed for what remains.
fn apply_filters(args: &Args, data: TimelineData) -> TimelineData {
    if args.lanes.is_none() && args.from.is_none() && args.to.is_none() {
        return data;
    }
    let mut filters = FilterState::all(&data);
    if let Some(lanes) = &args.lanes {
        filters.selected_lanes = lanes.iter().map(|name| name.trim().to_string()).collect();
    }
    if let Some(from) = args.from {
        filters.year_range.0 = from;
    }
    if let Some(to) = args.to {
        filters.year_range.1 = to;
    }
    let filtered = filter_data(&data, &filters);
    info!(
        lanes = filtered.len(),
        events = filtered.event_count(),
        "applied filters"
    );
    filtered
}

fn write_pages(args: &Args, layout: &TimelineLayout, data: &TimelineData, config: &Config) -> Result<()> {
    let format = args.output_format;
    if format == OutputFormat::Json {
        return Err(anyhow::anyhow!("Pagination is only available for svg and png output"));
    }
    let base = ensure_output(&args.output, format.extension())?;
    let pages = render_pages(layout, data, config);
    let outputs = resolve_page_outputs(&base, format, pages.len());
    for (svg, path) in pages.iter().zip(&outputs) {
        match format {
            OutputFormat::Png => write_png(svg, path, config)?,
            _ => write_output_svg(svg, Some(path))?,
        }
    }
    info!(pages = outputs.len(), "wrote paginated output");
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    crate::render::write_output_png(svg, output, config.export.raster_scale)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

fn resolve_page_outputs(base: &Path, format: OutputFormat, count: usize) -> Vec<PathBuf> {
    let ext = format.extension();
    if base.is_dir() {
        return (0..count)
            .map(|idx| base.join(format!("page-{}.{}", idx + 1, ext)))
            .collect();
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("timeline");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    (0..count)
        .map(|idx| parent.join(format!("{}-{}.{}", stem, idx + 1, ext)))
        .collect()
}
