use crate::config::load_config;
use crate::i18n::TextCatalog;
use crate::icons::IconRegistry;
use crate::loader::{
    load_customers, load_diagram, load_icon_table, load_steps, load_text_catalog, select_customer,
};
use crate::ir::Diagram;
use crate::render::{
    DescriptionSlot, RenderSurface, apply_view, render_svg_with, write_output_png,
    write_output_svg,
};
use crate::snapshot::{Snapshot, write_snapshot_json};
use crate::tour::{PresentationClass, Tour};
use crate::{RenderOptions, snapshot_step, snapshot_steps, step_count};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{LevelFilter, debug, info, warn};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "archtour", version, about = "Guided-tour renderer for architecture diagrams")]
pub struct Args {
    /// Diagram bundle (JSON or JSON5)
    #[arg(short = 'd', long = "diagram")]
    pub diagram: PathBuf,

    /// Step file replacing the steps embedded in the diagram
    #[arg(short = 's', long = "steps")]
    pub steps: Option<PathBuf>,

    /// Customer catalog (single object or array)
    #[arg(short = 'c', long = "customers")]
    pub customers: Option<PathBuf>,

    /// Customer key to apply; defaults to the first customer in the catalog
    #[arg(short = 'k', long = "customer", requires = "customers")]
    pub customer: Option<String>,

    /// Text catalog for default labels and step text
    #[arg(short = 't', long = "texts")]
    pub texts: Option<PathBuf>,

    /// Icon table mapping icon keys to asset paths
    #[arg(short = 'I', long = "icons")]
    pub icons: Option<PathBuf>,

    /// Display locale
    #[arg(long = "locale")]
    pub locale: Option<String>,

    /// Step index to render (0 is the overview)
    #[arg(long = "step", default_value_t = 0, conflicts_with = "all_steps")]
    pub step: usize,

    /// Render every step to `<stem>-<n>.<ext>`
    #[arg(long = "all-steps")]
    pub all_steps: bool,

    /// Dim instead of hiding elements off the highlight path
    #[arg(long = "auto-dim")]
    pub auto_dim: bool,

    /// Zoom clicks from 100%; negative values zoom out
    #[arg(long = "zoom", default_value_t = 0, allow_hyphen_values = true)]
    pub zoom: i32,

    /// Play the tour on the auto-play timer, logging each step, until it stops or loops once
    #[arg(long = "play", conflicts_with_all = ["all_steps", "output"])]
    pub play: bool,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
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
    init_logger(&args.log_level);
    debug!(args:?; "Parsed arguments");

    let mut config = load_config(args.config.as_deref())?;
    if args.auto_dim {
        config.tour.auto_dim = true;
    }

    let mut diagram = load_diagram(&args.diagram)?;
    if let Some(path) = &args.steps {
        diagram.steps = load_steps(path, &diagram)?;
    }
    for (step, id) in diagram.authoring_warnings() {
        warn!(step = step.as_str(), id = id.as_str(); "Highlighted id is not visible in step");
    }

    let customer = match &args.customers {
        Some(path) => {
            let catalog = load_customers(path)?;
            Some(select_customer(&catalog, args.customer.as_deref())?.clone())
        }
        None => None,
    };
    let texts = match &args.texts {
        Some(path) => load_text_catalog(path, &config.tour.default_locale)?,
        None => TextCatalog::new(&config.tour.default_locale),
    };
    let icons = match &args.icons {
        Some(path) => load_icon_table(path)?,
        None => IconRegistry::new(),
    };

    let options = RenderOptions {
        config,
        customer,
        texts,
        icons,
        locale: args.locale.clone(),
        zoom_steps: args.zoom,
    };

    if args.play {
        return play(&diagram, &options);
    }

    if !args.all_steps {
        let snapshot = snapshot_step(&diagram, &options, args.step);
        return write_snapshot(&snapshot, &options, args.output_format, args.output.as_deref());
    }

    let count = step_count(&diagram);
    let indices: Vec<usize> = (0..count).collect();
    let outputs = resolve_multi_outputs(args.output.as_deref(), args.output_format, count)?;
    let snapshots = snapshot_steps(&diagram, &options, &indices);
    for (snapshot, output) in snapshots.iter().zip(&outputs) {
        write_snapshot(snapshot, &options, args.output_format, Some(output))?;
    }
    info!(steps = count; "Rendered all tour steps");
    Ok(())
}

fn init_logger(level: &str) {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });
    // A second init (tests, embedding) is harmless.
    let _ = env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .try_init();
}

fn write_snapshot(
    snapshot: &Snapshot,
    options: &RenderOptions,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let config = &options.config;
    match format {
        OutputFormat::Json => write_snapshot_json(snapshot, output),
        OutputFormat::Svg => {
            let svg = render_svg_with(snapshot, &config.theme, &config.layout, &config.render);
            write_output_svg(&svg, output)
        }
        OutputFormat::Png => {
            let output = ensure_output(output, "png")?;
            let svg = render_svg_with(snapshot, &config.theme, &config.layout, &config.render);
            write_output_png(&svg, output, &config.render, &config.theme)
        }
    }
}

/// Runs the tour on the auto-play timer and prints each step's panel text.
fn play(diagram: &Diagram, options: &RenderOptions) -> Result<()> {
    let config = &options.config;
    let count = step_count(diagram);
    let mut tour = Tour::new(diagram.steps.clone(), &config.tour, config.zoom.clone());
    let mut panel = PanelText::default();
    let announce = |tour: &Tour, panel: &mut PanelText| {
        apply_view(panel, &tour.view(diagram, &options.texts, options.locale()));
        println!("[{}] {} | {}", tour.index(), panel.title, panel.description);
    };

    announce(&tour, &mut panel);
    tour.start_autoplay()?;
    let timeout = Duration::from_millis(config.tour.autoplay_period_ms.max(1) * 2);
    let mut shown = 1usize;
    while tour.is_playing() && shown < count {
        if tour.wait_autoplay(timeout) {
            shown += 1;
            announce(&tour, &mut panel);
        }
    }
    tour.stop_autoplay();
    Ok(())
}

/// Collects the panel text of a step for terminal output.
#[derive(Debug, Default)]
struct PanelText {
    title: String,
    description: String,
}

impl RenderSurface for PanelText {
    fn set_class(&mut self, _id: &str, _class: PresentationClass) {}

    fn set_description(&mut self, slot: DescriptionSlot, text: &str) {
        match slot {
            DescriptionSlot::Title => self.title = text.to_string(),
            DescriptionSlot::Description => self.description = text.to_string(),
        }
    }
}

fn ensure_output<'a>(output: Option<&'a Path>, ext: &str) -> Result<&'a Path> {
    output.ok_or_else(|| anyhow::anyhow!("Output path required for {} output", ext))
}

fn resolve_multi_outputs(
    output: Option<&Path>,
    format: OutputFormat,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let ext = format.extension();
    let base = output.ok_or_else(|| anyhow::anyhow!("Output path required for --all-steps"))?;
    if base.is_dir() {
        return Ok((0..count)
            .map(|idx| base.join(format!("step-{idx}.{ext}")))
            .collect());
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("step");
    let parent = base.parent().unwrap_or_else(|| Path::new("."));
    Ok((0..count)
        .map(|idx| parent.join(format!("{stem}-{idx}.{ext}")))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_outputs_number_steps_from_zero() {
        let outputs =
            resolve_multi_outputs(Some(Path::new("out/tour.svg")), OutputFormat::Svg, 3).unwrap();
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("out/tour-0.svg"),
                PathBuf::from("out/tour-1.svg"),
                PathBuf::from("out/tour-2.svg"),
            ]
        );
        assert!(resolve_multi_outputs(None, OutputFormat::Json, 2).is_err());
    }

    #[test]
    fn parses_step_and_zoom_flags() {
        let args = Args::try_parse_from([
            "archtour", "-d", "plant.json", "--step", "2", "--zoom", "-3", "-e", "json",
        ])
        .unwrap();
        assert_eq!(args.step, 2);
        assert_eq!(args.zoom, -3);
        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn customer_key_requires_catalog() {
        assert!(Args::try_parse_from(["archtour", "-d", "plant.json", "-k", "acme"]).is_err());
    }
}
