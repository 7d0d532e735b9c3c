//! Command line front end. Reads an outline JSON, layers parameter
//! overrides on top of the defaults, runs the generator, and writes one
//! STL per artifact into the output directory.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use case_engine::{generate, EngineError};
use file_format::{
    apply_config_layer, check_filetype, load_outline, stl_bytes, ExportError, LoadError,
};
use molt_types::Config;
use planar_kernel::{KernelError, KernelIntrospect, PlanarKernel};
use serde_json::{Map, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("could not read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error("no artifacts could be built")]
    NothingBuilt,
}

/// Everything the command line contributes: the outline path, optional
/// config file, and ad hoc `--key value` parameter overrides.
#[derive(Debug, Default)]
struct CliArgs {
    outline_path: PathBuf,
    config_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    overrides: Map<String, Value>,
}

fn print_usage() {
    eprintln!("usage: molt <outline.json> [options]");
    eprintln!();
    eprintln!("options:");
    eprintln!("  -c, --config <file>    JSON file of parameter overrides");
    eprintln!("  -o, --output <dir>     output directory (default from config)");
    eprintln!("  --<param> <value>      override one parameter, e.g. --wall_z_height 6");
    eprintln!("  -h, --help             show this help");
    eprintln!();
    eprintln!("parameters and their defaults (values are JSON):");
    if let Ok(Value::Object(defaults)) = serde_json::to_value(Config::default()) {
        for (key, value) in &defaults {
            eprintln!("  --{key} {value}");
        }
    }
}

fn parse_args(args: &[String]) -> Result<CliArgs, CliError> {
    let mut parsed = CliArgs::default();
    let mut outline: Option<PathBuf> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                let value = flag_value(args, i)?;
                parsed.config_path = Some(PathBuf::from(value));
                i += 2;
            }
            "-o" | "--output" => {
                let value = flag_value(args, i)?;
                parsed.output_dir = Some(PathBuf::from(value));
                i += 2;
            }
            flag if flag.starts_with("--") => {
                let key = flag.trim_start_matches("--").to_string();
                let value = flag_value(args, i)?;
                parsed.overrides.insert(key, coerce_value(value));
                i += 2;
            }
            flag if flag.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option {flag}")));
            }
            path => {
                if outline.replace(PathBuf::from(path)).is_some() {
                    return Err(CliError::Usage(format!("unexpected argument {path}")));
                }
                i += 1;
            }
        }
    }
    parsed.outline_path = outline.ok_or_else(|| CliError::Usage("missing outline path".into()))?;
    Ok(parsed)
}

fn flag_value<'a>(args: &'a [String], i: usize) -> Result<&'a str, CliError> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("missing value for {}", args[i])))
}

/// Command line values arrive as text. Anything that parses as JSON keeps
/// its parsed type, so `--carrycase false` is a bool and `--tent_legs
/// [[32,50,0]]` is an array; everything else falls back to a string.
fn coerce_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn run(args: CliArgs) -> Result<(), CliError> {
    let outline_json =
        fs::read_to_string(&args.outline_path).map_err(|source| CliError::ReadFailed {
            path: args.outline_path.clone(),
            source,
        })?;
    let outline = load_outline(&outline_json)?;
    info!(
        points = outline.points().len(),
        "outline loaded, perimeter {:.1}mm",
        outline.perimeter()
    );

    let mut config = Config::default();
    if let Some(path) = &args.config_path {
        let layer = fs::read_to_string(path).map_err(|source| CliError::ReadFailed {
            path: path.clone(),
            source,
        })?;
        for key in apply_config_layer(&mut config, &layer)? {
            warn!(key = %key, "unknown parameter in config file");
        }
    }
    if !args.overrides.is_empty() {
        for key in config
            .merge_layer(&args.overrides)
            .map_err(LoadError::BadConfig)?
        {
            warn!(key = %key, "unknown parameter on command line");
        }
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    check_filetype(&config.output_filetype)?;

    let mut kernel = PlanarKernel::new();
    let report = generate(&mut kernel, &outline, &config)?;

    for warning in &report.warnings {
        warn!("{warning}");
    }
    for failure in &report.failures {
        warn!(artifact = %failure.kind, error = %failure.error, "artifact not built");
    }
    if report.artifacts.is_empty() {
        return Err(CliError::NothingBuilt);
    }

    fs::create_dir_all(&config.output_dir).map_err(|source| CliError::WriteFailed {
        path: config.output_dir.clone(),
        source,
    })?;
    for artifact in &report.artifacts {
        let mesh = kernel.tessellate(artifact.solid)?;
        let bytes = stl_bytes(&mesh)?;
        let name = format!("{}{}", artifact.kind.file_stem(), config.output_filetype);
        let path = config.output_dir.join(name);
        fs::write(&path, bytes).map_err(|source| CliError::WriteFailed {
            path: path.clone(),
            source,
        })?;
        info!(
            path = %path.display(),
            triangles = mesh.triangle_count(),
            "artifact written"
        );
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") || args.is_empty() {
        print_usage();
        return;
    }
    let parsed = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("error: {err}");
            print_usage();
            process::exit(1);
        }
    };
    if let Err(err) = run(parsed) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn positional_and_flags_parse_together() {
        let args = strings(&[
            "outline.json",
            "-c",
            "overrides.json",
            "-o",
            "out",
            "--wall_z_height",
            "6",
            "--carrycase",
            "false",
        ]);
        let parsed = parse_args(&args).unwrap();
        assert_eq!(parsed.outline_path, PathBuf::from("outline.json"));
        assert_eq!(parsed.config_path, Some(PathBuf::from("overrides.json")));
        assert_eq!(parsed.output_dir, Some(PathBuf::from("out")));
        assert_eq!(parsed.overrides["wall_z_height"], Value::from(6));
        assert_eq!(parsed.overrides["carrycase"], Value::from(false));
    }

    #[test]
    fn override_values_keep_their_json_types() {
        assert_eq!(coerce_value("6.5"), Value::from(6.5));
        assert_eq!(coerce_value("false"), Value::from(false));
        assert_eq!(
            coerce_value("[[32,50,0]]"),
            serde_json::json!([[32, 50, 0]])
        );
        assert_eq!(coerce_value(".stl"), Value::from(".stl"));
    }

    #[test]
    fn missing_outline_is_an_error() {
        let err = parse_args(&strings(&["-o", "out"])).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn dangling_flag_is_an_error() {
        let err = parse_args(&strings(&["outline.json", "--wall_z_height"])).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn second_positional_is_rejected() {
        let err = parse_args(&strings(&["a.json", "b.json"])).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }
}
