//! Command line front end: reads a JSON rule set, writes the compiled,
//! non-overlapping rules as JSON.
//!
//! ```text
//! domaincover <rules.json> [--out <file>] [--config <settings.toml>]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use domaincover::document::{CompiledDocument, StyleDocument};
use domaincover::{Compiler, CoverageError, Result, Settings};

struct Arguments {
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
}

const USAGE: &str = "usage: domaincover <rules.json> [--out <file>] [--config <settings.toml>]";

fn usage() -> CoverageError {
    CoverageError::Config(USAGE.into())
}

fn parse_arguments(mut args: impl Iterator<Item = String>) -> Result<Arguments> {
    let mut input = None;
    let mut output = None;
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" | "-o" => output = Some(PathBuf::from(args.next().ok_or_else(usage)?)),
            "--config" | "-c" => config = Some(PathBuf::from(args.next().ok_or_else(usage)?)),
            _ if input.is_none() => input = Some(PathBuf::from(&arg)),
            _ => return Err(CoverageError::Config(format!("Unexpected argument '{arg}'"))),
        }
    }
    let input = input.ok_or_else(usage)?;
    Ok(Arguments { input, output, config })
}

fn run(arguments: Arguments, settings: Settings) -> Result<()> {
    let text = std::fs::read_to_string(&arguments.input)?;
    let document = StyleDocument::from_json(&text)?;
    info!(input = %arguments.input.display(), rules = document.rules.len(), "compiling");
    let compiler = Compiler::new(document.schema(), settings);
    let compiled = CompiledDocument::from(compiler.compile(&document.to_rules())?);
    let json = compiled.to_json()?;
    match arguments.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            info!(output = %path.display(), rules = compiled.rules.len(), "written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> ExitCode {
    let arguments = match parse_arguments(std::env::args().skip(1)) {
        Ok(arguments) => arguments,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let settings = match Settings::load_from(arguments.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
    match run(arguments, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "compilation failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Arguments> {
        parse_arguments(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn reads_input_and_options() {
        let arguments = parse(&["rules.json", "--out", "out.json", "-c", "settings.toml"]).unwrap();
        assert_eq!(arguments.input, PathBuf::from("rules.json"));
        assert_eq!(arguments.output, Some(PathBuf::from("out.json")));
        assert_eq!(arguments.config, Some(PathBuf::from("settings.toml")));
    }

    #[test]
    fn option_without_value_is_a_usage_error() {
        for args in [&["rules.json", "--out"][..], &["rules.json", "--config"][..], &["rules.json", "-o"][..]] {
            let err = parse(args).err().unwrap();
            assert!(format!("{err}").contains("usage: domaincover"), "{args:?}");
        }
    }

    #[test]
    fn missing_input_and_extra_arguments_are_rejected() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
    }
}
