//! `verbump` command-line entry point.

use std::path::PathBuf;

use verbump::config::{BumpConfig, Overrides};
use verbump::logging::{self, LogOptions};
use verbump::pipeline::Operation;
use verbump::storage::FsStorage;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = logging::init(&options.log) {
        eprintln!("Logging disabled: {err}");
    }

    let config = match &options.config_path {
        Some(path) => BumpConfig::load_from(path).map_err(|err| err.to_string())?,
        None => {
            let cwd = std::env::current_dir()
                .map_err(|err| format!("Cannot resolve working directory: {err}"))?;
            BumpConfig::load_from_dir(&cwd)
                .map_err(|err| err.to_string())?
                .unwrap_or_default()
        }
    };
    let task = config
        .merge(options.overrides)
        .into_task()
        .map_err(|err| format!("{err}\n\n{}", help_text()))?;
    let report = task.run(&FsStorage).map_err(|err| err.to_string())?;

    println!(
        "Bumped {} version(s) in {} file(s).",
        report.total_substitutions(),
        report.files.len()
    );
    Ok(())
}

#[derive(Debug, Default)]
struct Options {
    config_path: Option<PathBuf>,
    overrides: Overrides,
    log: LogOptions,
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "-v" | "--verbose" => {
                options.log.verbose = true;
            }
            "--config" => {
                options.config_path = Some(PathBuf::from(next_value(&args, &mut idx, "--config")?));
            }
            "--log-dir" => {
                options.log.log_dir = Some(PathBuf::from(next_value(&args, &mut idx, "--log-dir")?));
            }
            "--to" => {
                options.overrides.to = Some(next_value(&args, &mut idx, "--to")?);
            }
            "--context" => {
                let value = next_value(&args, &mut idx, "--context")?;
                options.overrides.contexts.push(value);
            }
            "--step" => {
                let value = next_value(&args, &mut idx, "--step")?;
                let operation = value
                    .parse::<Operation>()
                    .map_err(|err| format!("{err}\n\n{}", help_text()))?;
                options.overrides.steps.push(operation);
            }
            "--hide-first-pre-counter" => {
                options.overrides.show_first_pre_counter = Some(false);
            }
            "--" => {
                options
                    .overrides
                    .files
                    .extend(args[idx + 1..].iter().map(PathBuf::from));
                break;
            }
            flag if flag.starts_with("--") => {
                let operation = parse_operation_flag(&args, &mut idx, &flag[2..])?;
                options.overrides.steps.push(operation);
            }
            unknown if unknown.starts_with('-') => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
            file => {
                options.overrides.files.push(PathBuf::from(file));
            }
        }
        idx += 1;
    }

    if options.overrides.to.is_some() && !options.overrides.steps.is_empty() {
        return Err("--to cannot be combined with pipeline steps".to_string());
    }
    Ok(Some(options))
}

/// `--rc 2`, `--major`, `--decrease-patch`: an operation name used as a flag.
/// Stage flags consume a following numeric argument.
fn parse_operation_flag(args: &[String], idx: &mut usize, name: &str) -> Result<Operation, String> {
    let operation = Operation::from_name(name, None)
        .map_err(|_| format!("Unknown argument: --{name}\n\n{}", help_text()))?;
    if !operation.takes_argument() {
        return Ok(operation);
    }
    let Some(counter) = args
        .get(*idx + 1)
        .and_then(|value| value.parse::<u64>().ok())
    else {
        return Ok(operation);
    };
    *idx += 1;
    Operation::from_name(name, Some(counter)).map_err(|err| err.to_string())
}

fn next_value(args: &[String], idx: &mut usize, name: &str) -> Result<String, String> {
    let next = args
        .get(*idx + 1)
        .ok_or_else(|| format!("{name} requires a value"))?;
    *idx += 1;
    Ok(next.clone())
}

fn help_text() -> String {
    [
        "verbump",
        "",
        "Bumps semantic versions found in comments and version properties.",
        "",
        "Usage:",
        "  verbump [options] [FILE...]",
        "  verbump --to 1.2.3 src/lib.php package.json",
        "  verbump --minor --rc 2 src/lib.php",
        "",
        "Options:",
        "  --config <path>           Settings file (default: ./bump.toml if present).",
        "  --to <version>            Replace every version with <version>.",
        "  --step <op[:n]>           Append a pipeline step (repeatable).",
        "  --<op> [n]                Shorthand for --step, e.g. --major, --rc 2.",
        "  --context <pattern>       block-comment, line-comment, property or a regex (repeatable).",
        "  --hide-first-pre-counter  Render 1.0.0-rc instead of 1.0.0-rc1.",
        "  --log-dir <dir>           Also write a timestamped log file into <dir>.",
        "  -v, --verbose             Debug logging.",
        "",
        "Operations:",
        "  major, minor, patch, preVersion, build,",
        "  decrease-major, decrease-minor, decrease-patch, decrease-pre-version, decrease-build,",
        "  rc, beta, alpha (optional counter), stable, dev",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use verbump::version::{Component, Stage};

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn collects_steps_in_order() {
        let options = parse_args(args(&["--major", "--step", "minor", "--rc", "2", "a.php"]))
            .unwrap()
            .unwrap();
        assert_eq!(
            options.overrides.steps,
            vec![
                Operation::Increase(Component::Major),
                Operation::Increase(Component::Minor),
                Operation::PreStage {
                    stage: Stage::Rc,
                    counter: Some(2)
                },
            ]
        );
        assert_eq!(options.overrides.files, vec![PathBuf::from("a.php")]);
    }

    #[test]
    fn stage_flag_leaves_non_numeric_files_alone() {
        let options = parse_args(args(&["--beta", "lib.php"])).unwrap().unwrap();
        assert_eq!(
            options.overrides.steps,
            vec![Operation::PreStage {
                stage: Stage::Beta,
                counter: None
            }]
        );
        assert_eq!(options.overrides.files, vec![PathBuf::from("lib.php")]);
    }

    #[test]
    fn parses_target_contexts_and_logging() {
        let options = parse_args(args(&[
            "--to",
            "1.2.3",
            "--context",
            "property",
            "--log-dir",
            "logs",
            "-v",
            "--",
            "--odd-name.txt",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(options.overrides.to.as_deref(), Some("1.2.3"));
        assert_eq!(options.overrides.contexts, vec!["property".to_string()]);
        assert_eq!(options.log.log_dir, Some(PathBuf::from("logs")));
        assert!(options.log.verbose);
        assert_eq!(options.overrides.files, vec![PathBuf::from("--odd-name.txt")]);
    }

    #[test]
    fn rejects_unknown_flags_and_conflicts() {
        assert!(parse_args(args(&["--frobnicate"])).is_err());
        assert!(parse_args(args(&["-x"])).is_err());
        assert!(parse_args(args(&["--to", "1.0.0", "--major"])).is_err());
        assert!(parse_args(args(&["--to"])).is_err());
    }

    #[test]
    fn help_short_circuits() {
        assert!(parse_args(args(&["--help"])).unwrap().is_none());
    }
}
