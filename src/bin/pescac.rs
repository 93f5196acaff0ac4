//! `pescac`: a small driver that exercises lexing and parsing end to end
//! (§6.5). Grounded in the teacher's `src/bin/why/cli.rs` +
//! `src/bin/why/main.rs` shape, trimmed to this crate's single `lex`/`parse`
//! pipeline (no subcommands, no typechecking or codegen stages).

use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use log::info;

use pesca_front::{lexer::lex, parser::parse, source::SourceFile};

/// CLI arguments for the `pescac` front-end driver.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// The path to the source file to lex and parse.
    file: PathBuf,

    /// Specify the log level of the driver.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    verbosity: LogLevel,

    /// Dump the parsed AST instead of only reporting success/failure.
    #[arg(long)]
    dump_parsed: bool,
}

#[derive(ValueEnum, Clone, Default, Debug)]
enum LogLevel {
    #[default]
    #[value(alias("0"))]
    Error,
    #[value(alias("1"))]
    Warn,
    #[value(alias("2"))]
    Info,
    #[value(alias("3"))]
    Debug,
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();

    simple_logger::init_with_level((&args.verbosity).into()).unwrap();

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("could not read {}: {err}", args.file.display());
            return ExitCode::FAILURE;
        }
    };

    let stream = lex(&source);
    if !stream.is_ok() {
        let source_file = SourceFile::new(&source);
        let (line, _) = source_file.line_and_column(stream.failure_offset);
        eprintln!(
            "lex error on line {}: {:?}",
            line + 1,
            stream.error
        );
        return ExitCode::FAILURE;
    }

    let ast = parse(&stream);

    if args.dump_parsed {
        match serde_json::to_string_pretty(&ast.root) {
            Ok(json) => info!("Parsed AST:\n{json}"),
            Err(err) => info!("Parsed AST (failed to serialize, falling back to Debug: {err}):\n{:#?}", ast.root),
        }
    }

    if !ast.is_ok() {
        let source_file = SourceFile::new(&source);
        let offset = stream
            .tokens
            .get(ast.failure_offset)
            .map(|t| t.span.offset)
            .unwrap_or(source.len());
        let (line, _) = source_file.line_and_column(offset);
        eprintln!(
            "parse error on line {}: {:?} ({})",
            line + 1,
            ast.error,
            ast.failure_explanation
        );
        return ExitCode::FAILURE;
    }

    if !args.dump_parsed {
        println!("{}: parsed {} bytes of source successfully", args.file.display(), source.len());
    }

    ExitCode::SUCCESS
}
