use serde::{Deserialize, Serialize};
use std::io::Read;
use tierline::{
    Direction, Edge, LayoutAdapter, LayoutConfig, LayoutResult, Node, SchemaDocument,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Layout(tierline::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<tierline::Error> for CliError {
    fn from(value: tierline::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Layout,
    Schema,
    Validate,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    direction: Direction,
    config: LayoutConfig,
    pretty: bool,
    out: Option<String>,
}

/// Input of `layout` and `validate`.
#[derive(Debug, Deserialize)]
struct DiagramIn {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

fn usage() -> &'static str {
    "tierline-cli\n\
\n\
USAGE:\n\
  tierline-cli [layout] [--direction TB|BT|LR|RL] [--node-width <n>] [--node-height <n>] [--node-sep <n>] [--rank-sep <n>] [--edge-sep <n>] [--pretty] [--out <path>] [<path>|-]\n\
  tierline-cli schema [same options as layout] [<path>|-]\n\
  tierline-cli validate [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - layout reads {\"nodes\": [...], \"edges\": [...]} and prints the laid-out diagram.\n\
  - schema reads a table/relationship document and lays out one node per table.\n\
  - validate checks node ids and edge references and prints `ok`.\n\
  - --out writes pretty JSON to a file instead of stdout.\n\
  - RUST_LOG controls diagnostics on stderr (default: warn).\n\
"
}

fn parse_number(value: Option<&String>) -> Result<f64, CliError> {
    let Some(value) = value else {
        return Err(CliError::Usage(usage()));
    };
    value.parse::<f64>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "schema" => args.command = Command::Schema,
            "validate" => args.command = Command::Validate,
            "--pretty" => args.pretty = true,
            "--direction" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.direction = dir
                    .parse::<Direction>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--node-width" => args.config.node_width = parse_number(it.next())?,
            "--node-height" => args.config.node_height = parse_number(it.next())?,
            "--node-sep" => args.config.node_sep = parse_number(it.next())?,
            "--rank-sep" => args.config.rank_sep = parse_number(it.next())?,
            "--edge-sep" => args.config.edge_sep = parse_number(it.next())?,
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
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

fn emit(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    if let Some(path) = out {
        tierline::export::write_json(path, value)?;
        return Ok(());
    }
    let stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(stdout, value)?;
    } else {
        serde_json::to_writer(stdout, value)?;
    }
    println!();
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let adapter = LayoutAdapter::new().with_config(args.config);

    let result: LayoutResult = match args.command {
        Command::Validate => {
            let diagram: DiagramIn = serde_json::from_str(&text)?;
            tierline::validate(&diagram.nodes, &diagram.edges)?;
            println!("ok");
            return Ok(());
        }
        Command::Layout => {
            let diagram: DiagramIn = serde_json::from_str(&text)?;
            adapter.compute(&diagram.nodes, &diagram.edges, args.direction)?
        }
        Command::Schema => {
            let doc = SchemaDocument::from_json(&text)?;
            let (nodes, edges) = doc.to_graph()?;
            adapter.compute(&nodes, &edges, args.direction)?
        }
    };

    tracing::debug!(nodes = result.nodes.len(), direction = %args.direction, "layout done");
    emit(&result, args.pretty, args.out.as_deref())
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
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
        tracing::error!(error = %err, "command failed");
        eprintln!("{err}");
        std::process::exit(1);
    }
}
