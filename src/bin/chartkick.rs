use anyhow::{Context, Result, anyhow, bail};
use chartkick::backend::{self, Backend};
use chartkick::series::normalize;
use chartkick::{ChartKind, ChartOptions, Charts, DataSource, Document};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(
    name = "chartkick",
    version,
    about = "Render line, area, column, bar & pie charts with Highcharts or Google Charts"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a chart into a standalone HTML page (or print the backend payload).
    Render(RenderArgs),
    /// Print the normalized series for a chart kind as JSON.
    Normalize(NormalizeArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Line,
    Area,
    Column,
    Bar,
    Pie,
}

impl From<Kind> for ChartKind {
    fn from(k: Kind) -> Self {
        match k {
            Kind::Line => ChartKind::Line,
            Kind::Area => ChartKind::Area,
            Kind::Column => ChartKind::Column,
            Kind::Bar => ChartKind::Bar,
            Kind::Pie => ChartKind::Pie,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum BackendChoice {
    Highcharts,
    Google,
    /// Detect from --globals (Highcharts wins over google).
    Auto,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Chart kind.
    #[arg(short, long, value_enum, default_value_t = Kind::Line)]
    kind: Kind,
    /// Data: a JSON file path, an http(s) URL, or inline JSON.
    #[arg(short, long)]
    data: String,
    /// Charting backend.
    #[arg(long, value_enum, default_value_t = BackendChoice::Auto)]
    backend: BackendChoice,
    /// Page globals used by --backend auto, separated by comma (e.g. Highcharts,google).
    #[arg(long, default_value = "Highcharts")]
    globals: String,
    /// Id of the element the chart renders into.
    #[arg(long, default_value = "chart-1")]
    element: String,
    /// Options file (JSON: min, max, download, library).
    #[arg(long)]
    options: Option<PathBuf>,
    /// Value axis lower bound.
    #[arg(long, allow_hyphen_values = true)]
    min: Option<f64>,
    /// Value axis upper bound.
    #[arg(long, allow_hyphen_values = true)]
    max: Option<f64>,
    /// Backend-native options as inline JSON, merged last.
    #[arg(long)]
    library: Option<String>,
    /// Add a PNG download link on hover.
    #[arg(long, default_value_t = false)]
    download: bool,
    /// Page title.
    #[arg(long, default_value = "Chart")]
    title: String,
    /// Write the page here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print the backend-native chart as JSON instead of a page.
    #[arg(long, default_value_t = false)]
    payload: bool,
}

#[derive(Args, Debug)]
struct NormalizeArgs {
    /// Chart kind (selects time or category keys).
    #[arg(short, long, value_enum, default_value_t = Kind::Line)]
    kind: Kind,
    /// Data: a JSON file path or inline JSON.
    #[arg(short, long)]
    data: String,
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn read_json(arg: &str) -> Result<Value> {
    let path = Path::new(arg);
    if path.is_file() {
        let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))
    } else {
        serde_json::from_str(arg).context("--data is neither an existing file nor valid JSON")
    }
}

fn data_source(arg: &str) -> Result<DataSource> {
    if arg.starts_with("http://") || arg.starts_with("https://") {
        return Ok(DataSource::Remote(arg.to_string()));
    }
    Ok(DataSource::from(read_json(arg)?))
}

fn chart_options(args: &RenderArgs) -> Result<ChartOptions> {
    let mut opts = match &args.options {
        Some(path) => {
            let text =
                fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str::<ChartOptions>(&text)
                .with_context(|| format!("parse options {}", path.display()))?
        }
        None => ChartOptions::new(),
    };
    if let Some(min) = args.min {
        opts.min = Some(min);
    }
    if let Some(max) = args.max {
        opts.max = Some(max);
    }
    if args.download {
        opts.download = true;
    }
    if let Some(lib) = &args.library {
        let tree: Value = serde_json::from_str(lib).context("--library must be JSON")?;
        if !tree.is_object() {
            bail!("--library must be a JSON object");
        }
        opts.library = Some(tree);
    }
    Ok(opts)
}

fn select_backend(args: &RenderArgs) -> Option<Rc<dyn Backend>> {
    match args.backend {
        BackendChoice::Highcharts => backend::by_name("highcharts"),
        BackendChoice::Google => backend::by_name("google"),
        BackendChoice::Auto => backend::detect(&parse_list(&args.globals)),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Normalize(args) => cmd_normalize(args),
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let kind = ChartKind::from(args.kind);
    let source = data_source(&args.data)?;
    let options = chart_options(&args)?;
    let backend = select_backend(&args);

    let doc = Document::new();
    let element = doc.create_element(&args.element);
    let charts = Charts::new(doc.clone(), backend.clone());
    let outcome = charts.chart(kind, &element, source, options);
    // The page has loaded the library by the time it draws.
    if let Some(b) = &backend {
        b.ready().open();
    }

    let failure = match &outcome {
        Err(e) => Some(e.clone()),
        Ok(chart) => chart.error(),
    };

    if args.payload {
        if let Some(e) = failure {
            return Err(anyhow!(e).context("render failed"));
        }
        let native = element
            .chart()
            .ok_or_else(|| anyhow!("no chart was drawn into #{}", args.element))?;
        println!("{}", serde_json::to_string_pretty(&native)?);
        return Ok(());
    }

    let page = chartkick::html::render_page(&doc, backend.as_deref(), &args.title);
    match &args.out {
        Some(path) => {
            fs::write(path, page).with_context(|| format!("write {}", path.display()))?;
            eprintln!("Wrote {} chart to {}", kind, path.display());
        }
        None => print!("{page}"),
    }

    match failure {
        Some(e) => Err(anyhow!(e).context("render failed")),
        None => Ok(()),
    }
}

fn cmd_normalize(args: NormalizeArgs) -> Result<()> {
    let data = read_json(&args.data)?;
    let (series, hide_legend) = normalize(ChartKind::from(args.kind), &data);
    let out = json!({ "hide_legend": hide_legend, "data": series });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
