use narwhal::config::env_flag;
use narwhal::geom::{Rect, rect};
use narwhal::render::host::FixedViewport;
use narwhal::render::{Camera, GraphView, NarwhalError};
use narwhal::{Graph, NarwhalConfig, PresetLayout, RankDir};
use serde::Serialize;
use std::io::Read;
use std::rc::Rc;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Graph(NarwhalError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Graph(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<NarwhalError> for CliError {
    fn from(value: NarwhalError) -> Self {
        Self::Graph(value)
    }
}

impl From<narwhal::Error> for CliError {
    fn from(value: narwhal::Error) -> Self {
        Self::Graph(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Paths,
    Fit,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    config: Option<String>,
    rank_direction: Option<RankDir>,
    viewport_width: f64,
    viewport_height: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EdgeOut<'a> {
    id: &'a str,
    path: &'a str,
    arrowhead: &'a str,
    polyline: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PathsOut<'a> {
    rank_direction: RankDir,
    edges: Vec<EdgeOut<'a>>,
}

#[derive(Serialize)]
struct XyOut {
    x: f64,
    y: f64,
}

#[derive(Serialize)]
struct BoundsOut {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl From<Rect> for BoundsOut {
    fn from(r: Rect) -> Self {
        Self {
            left: r.min.x,
            top: r.min.y,
            right: r.max.x,
            bottom: r.max.y,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FitOut {
    viewport: XyOut,
    zoom: f64,
    pan: XyOut,
    content_bounds: Option<BoundsOut>,
    visible_world: BoundsOut,
}

fn usage() -> &'static str {
    "narwhal-cli\n\
\n\
USAGE:\n\
  narwhal-cli [paths] [--pretty] [--config <path>] [--rankdir TB|BT|LR|RL] [<path>|-]\n\
  narwhal-cli fit [--pretty] [--config <path>] [--viewport-width <w>] [--viewport-height <h>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', graph JSON is read from stdin.\n\
  - Nodes must carry positions (x, y); edge waypoints are optional.\n\
  - paths prints the bezier path, arrowhead and polyline of every edge as JSON.\n\
  - fit prints the camera pan/zoom that centers the graph in the viewport.\n\
  - NARWHAL_LOG takes a tracing filter (e.g. `narwhal_render=debug`); logs go to stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Paths,
        viewport_width: 800.0,
        viewport_height: 600.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "paths" => args.command = Command::Paths,
            "fit" => args.command = Command::Fit,
            "--pretty" => args.pretty = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--rankdir" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.rank_direction =
                    Some(dir.parse::<RankDir>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--viewport-width" => {
                let Some(w) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_width = parse_extent(w)?;
            }
            "--viewport-height" => {
                let Some(h) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.viewport_height = parse_extent(h)?;
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn parse_extent(raw: &str) -> Result<f64, CliError> {
    let v = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn load_config(args: &Args) -> Result<NarwhalConfig, CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => NarwhalConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => NarwhalConfig::empty_object(),
    };
    if let Some(dir) = args.rank_direction {
        config.set_value("layout.rankDirection", serde_json::to_value(dir)?);
    }
    Ok(config)
}

fn build_view(args: &Args, graph: Graph, config: &NarwhalConfig) -> Result<GraphView, CliError> {
    let viewport = FixedViewport::new(rect(0.0, 0.0, args.viewport_width, args.viewport_height));
    let camera = Camera::builder().viewport(Rc::new(viewport));
    let mut view = GraphView::from_config(graph, camera, config)?;
    view.relayout(&PresetLayout)?;
    Ok(view)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let config = load_config(&args)?;
    let graph = Graph::from_json_str(&text)?;
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "graph loaded"
    );
    let view = build_view(&args, graph, &config)?;

    match args.command {
        Command::Paths => {
            let timing_enabled = env_flag("NARWHAL_PATH_TIMING");
            let start = timing_enabled.then(std::time::Instant::now);
            let geometry = view.edges_geometry()?;
            if let Some(s) = start {
                eprintln!(
                    "[path-timing] edges={} total={:?}",
                    geometry.len(),
                    s.elapsed()
                );
            }

            let out = PathsOut {
                rank_direction: view.layout_options().rank_direction,
                edges: geometry
                    .iter()
                    .map(|g| EdgeOut {
                        id: &g.id,
                        path: &g.path,
                        arrowhead: &g.arrowhead,
                        polyline: &g.polyline,
                    })
                    .collect(),
            };
            write_json(&out, args.pretty)
        }
        Command::Fit => {
            let camera = view.camera();
            let size = camera.viewport_size();
            let pan = camera.pan();
            let out = FitOut {
                viewport: XyOut {
                    x: size.width,
                    y: size.height,
                },
                zoom: camera.zoom(),
                pan: XyOut { x: pan.x, y: pan.y },
                content_bounds: camera.content_bounds().map(BoundsOut::from),
                visible_world: camera.visible_world_rect().into(),
            };
            write_json(&out, args.pretty)
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("NARWHAL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
