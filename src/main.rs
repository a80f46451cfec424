use serde::Serialize;
use smsplate::config::{Config, LogLevel, load_config, resolve_config_path};
use smsplate::style::{AnsiStyle, Color, Painter, colors_enabled};
use smsplate::{
    CharacterCounter, PreviewItem, RecipientRecord, Repertoire, TemplateError, ValidationIssue,
    Validator, has_errors, preview,
};
use std::fmt::Write as _;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const EXIT_ERRORS: u8 = 1;
const EXIT_FAILURE: u8 = 2;
const HELP: &str = "\
smsplate - SMS template linter and preview renderer

USAGE:
    smsplate [OPTIONS] [BODY]

ARGS:
    <BODY>                   Message body (read from stdin when omitted or '-')

OPTIONS:
    -f, --file <PATH>        Read the message body from a file
    -c, --config <PATH>      Config file (default: $SMSPLATE_CONFIG or the user config dir)
    -r, --recipients <PATH>  JSON array of sample recipients to preview
    -l, --limit <N>          Number of previews to render (default from config)
        --repertoire <NAME>  Standard character set: ascii, gsm7
        --json               Print the report as JSON
        --no-color           Disable colored output
    -d, --debug              Show debug logging and timing
    -h, --help               Print help
    -V, --version            Print version

EXIT STATUS:
    0 when no error was reported, 1 when the body has errors, 2 on failure
";

#[derive(Default)]
struct Cli {
    body: Option<String>,
    file: Option<PathBuf>,
    config: Option<PathBuf>,
    recipients: Option<PathBuf>,
    limit: Option<usize>,
    repertoire: Option<Repertoire>,
    json: bool,
    no_color: bool,
    debug: bool,
}

fn parse_args() -> Result<Cli, lexopt::Error> {
    use lexopt::prelude::*;

    let mut body = None;
    let mut file = None;
    let mut config = None;
    let mut recipients = None;
    let mut limit = None;
    let mut repertoire = None;
    let mut json = false;
    let mut no_color = false;
    let mut debug = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                print!("{}", HELP);
                std::process::exit(0);
            }
            Short('V') | Long("version") => {
                println!("smsplate {}", VERSION);
                std::process::exit(0);
            }
            Short('f') | Long("file") => {
                file = Some(PathBuf::from(parser.value()?));
            }
            Short('c') | Long("config") => {
                config = Some(PathBuf::from(parser.value()?));
            }
            Short('r') | Long("recipients") => {
                recipients = Some(PathBuf::from(parser.value()?));
            }
            Short('l') | Long("limit") => {
                limit = Some(parser.value()?.parse()?);
            }
            Long("repertoire") => {
                repertoire = Some(parser.value()?.parse()?);
            }
            Long("json") => {
                json = true;
            }
            Long("no-color") => {
                no_color = true;
            }
            Short('d') | Long("debug") => {
                debug = true;
            }
            Value(val) if body.is_none() => {
                body = Some(val.string()?);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Cli {
        body,
        file,
        config,
        recipients,
        limit,
        repertoire,
        json,
        no_color,
        debug,
    })
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Install the stderr subscriber before the config is read.
///
/// `RUST_LOG` wins, then `--debug`. Otherwise the filter starts at the default
/// level and the returned handle switches it to the configured one.
fn setup_logging(debug: bool, ansi: bool) -> Option<FilterHandle> {
    let (filter, follows_config) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, false),
        Err(_) if debug => (EnvFilter::new(LogLevel::Debug.as_str()), false),
        Err(_) => (EnvFilter::new(LogLevel::default().as_str()), true),
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(ansi))
        .init();

    follows_config.then_some(handle)
}

fn apply_config_level(handle: &FilterHandle, level: LogLevel) {
    if let Err(e) = handle.reload(EnvFilter::new(level.as_str())) {
        eprintln!("Error: failed to set log level: {}", e);
    }
}

fn exit_status(outcome: &smsplate::Result<(String, bool)>) -> u8 {
    match outcome {
        Ok((_, false)) => 0,
        Ok((_, true)) => EXIT_ERRORS,
        Err(_) => EXIT_FAILURE,
    }
}

fn main() -> ExitCode {
    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Try 'smsplate --help' for more information.");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let handle = setup_logging(cli.debug, colors_enabled(cli.no_color, &std::io::stderr()));

    let config_path = resolve_config_path(cli.config.as_deref());
    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    if let Some(handle) = &handle {
        apply_config_level(handle, config.general.log_level);
    }
    tracing::debug!(
        path = ?config_path,
        log_level = %config.general.log_level,
        repertoire = %config.encoding.repertoire,
        "using config"
    );

    let outcome = run(&cli, &config);
    match &outcome {
        Ok((output, _)) => print!("{}", output),
        Err(e) => eprintln!("Error: {}", e),
    }
    ExitCode::from(exit_status(&outcome))
}

#[derive(Serialize)]
struct Report<'a> {
    repertoire: Repertoire,
    counter: CharacterCounter,
    issues: &'a [ValidationIssue],
    previews: &'a [PreviewItem],
}

fn read_body(cli: &Cli) -> smsplate::Result<String> {
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path).map_err(|source| TemplateError::io(path, source));
    }

    match cli.body.as_deref() {
        Some(body) if body != "-" => Ok(body.to_string()),
        _ => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .map_err(|source| TemplateError::io("<stdin>", source))?;
            Ok(body)
        }
    }
}

fn read_recipients(cli: &Cli) -> smsplate::Result<Option<Vec<RecipientRecord>>> {
    let Some(path) = &cli.recipients else {
        return Ok(None);
    };

    let contents =
        std::fs::read_to_string(path).map_err(|source| TemplateError::io(path, source))?;
    let records = RecipientRecord::list_from_json(&contents)?;
    tracing::debug!(path = %path.display(), count = records.len(), "loaded recipients");
    Ok(Some(records))
}

fn run(cli: &Cli, config: &Config) -> smsplate::Result<(String, bool)> {
    let start = Instant::now();

    let body = read_body(cli)?;
    let recipients = read_recipients(cli)?;
    let repertoire = cli.repertoire.unwrap_or(config.encoding.repertoire);
    let limit = cli.limit.unwrap_or(config.preview.sample_size);
    let registry = config.registry();

    let issues = Validator::new(&registry)
        .with_repertoire(repertoire)
        .validate(&body);
    let counter = CharacterCounter::new(&body, repertoire);
    let previews = recipients
        .as_deref()
        .map(|records| preview(&body, records, limit))
        .unwrap_or_default();

    tracing::debug!(
        elapsed_us = start.elapsed().as_micros() as u64,
        issues = issues.len(),
        previews = previews.len(),
        "template checked"
    );

    let failed = has_errors(&issues);

    if cli.json {
        let report = Report {
            repertoire,
            counter,
            issues: &issues,
            previews: &previews,
        };
        let mut output = serde_json::to_string_pretty(&report)?;
        output.push('\n');
        return Ok((output, failed));
    }

    let painter = Painter::detect(cli.no_color);
    let output = format_text(
        &painter,
        repertoire,
        &counter,
        &issues,
        recipients.as_ref().map(|_| previews.as_slice()),
    );
    Ok((output, failed))
}

fn format_text(
    painter: &Painter,
    repertoire: Repertoire,
    counter: &CharacterCounter,
    issues: &[ValidationIssue],
    previews: Option<&[PreviewItem]>,
) -> String {
    let mut out = String::new();
    let heading = AnsiStyle {
        color: Some(Color::Cyan),
        bold: true,
        dim: false,
    };

    let _ = writeln!(out, "Encoding: {} ({})", counter.mode, repertoire);
    let counter_style = if counter.is_over_limit() {
        AnsiStyle::parse("red").unwrap_or_default()
    } else {
        AnsiStyle::default()
    };
    let _ = writeln!(out, "{}", painter.paint(counter_style, &counter.to_string()));

    if issues.is_empty() {
        let ok = AnsiStyle {
            color: Some(Color::Green),
            ..AnsiStyle::default()
        };
        let _ = writeln!(out, "{}", painter.paint(ok, "All checks passed!"));
    } else {
        for issue in issues {
            let label = painter.paint(
                AnsiStyle::severity(issue.severity),
                &issue.severity.to_string(),
            );
            let _ = writeln!(out, "{}: {}", label, issue.message);
        }
    }

    if let Some(previews) = previews {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", painter.paint(heading, "Preview"));
        if previews.is_empty() {
            let _ = writeln!(out, "No contact data to show preview.");
        }
        for item in previews {
            let index = AnsiStyle {
                dim: true,
                ..AnsiStyle::default()
            };
            let _ = writeln!(
                out,
                "{} {}",
                painter.paint(index, &format!("[{}]", item.index + 1)),
                item.rendered
            );
        }
    }

    out
}
