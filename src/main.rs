//! Sandgate CLI - list directories and run scripts inside a working root

use anyhow::Context;
use clap::Parser;
use sandgate::cli::{Args, SubCommand};
use sandgate::{
    format_output, ExecutionRequest, FixedInterpreter, Gateway, ScriptRunner, SearchPath,
    WorkingRoot,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Returns whether the printed result was a success.
fn run(args: Args) -> anyhow::Result<bool> {
    let output_format = args.output_format();

    let root = WorkingRoot::new(&args.root)
        .with_context(|| format!("invalid working root {}", args.root.display()))?;
    anyhow::ensure!(
        root.as_path().is_dir(),
        "working root {} is not a directory",
        root
    );

    let runner = match &args.interpreter {
        Some(path) => ScriptRunner::with_config(FixedInterpreter::new(path), args.runner_config()),
        None => ScriptRunner::with_config(SearchPath::default(), args.runner_config()),
    };
    if args.verbose {
        match runner.interpreter() {
            Ok(path) => info!(interpreter = %path.display(), root = %root, "gateway ready"),
            Err(e) => warn!(error = %e, "no interpreter available, run will fail"),
        }
    }
    let gateway = Gateway::new(root, runner);

    let result = match args.command {
        SubCommand::Ls { directory } => gateway.list(Some(directory.as_str())),
        SubCommand::Run { file, args: script_args } => {
            gateway.run(&ExecutionRequest::new(file).with_args(script_args))
        }
        SubCommand::Tools => {
            let decls = serde_json::to_string_pretty(&sandgate::declarations())?;
            println!("{}", decls);
            return Ok(true);
        }
        SubCommand::Call { name, arguments } => {
            let arguments: serde_json::Value =
                serde_json::from_str(&arguments).context("tool arguments must be valid JSON")?;
            sandgate::tools::dispatch(&gateway, &name, &arguments)
        }
    };

    println!("{}", format_output(&result, &output_format));
    Ok(result.is_ok())
}
