//! Command-line interface for pdfy
//! Compiles a pdfy file and prints one stage of the result.
//!
//! Usage:
//!   pdfy `<path>` [--stage tokens|ast|model] [--format json|yaml|echo|simple] [--config `<file>`]
//!
//! Diagnostics go to stderr. The exit code is 1 when the file cannot be read, the
//! configuration does not load, or the document has a syntax error.

use clap::{Arg, Command};
use pdfy::pdfy::config::Loader;
use pdfy::pdfy::diagnostics::Diagnostics;
use pdfy::pdfy::formats::{report, OutputFormat, ProcessingSpec, ProcessingStage};
use pdfy::Compiler;
use std::fs;
use std::process;

fn main() {
    env_logger::init();

    let matches = Command::new("pdfy")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile pdfy documents and inspect each stage")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the pdfy file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("stage")
                .long("stage")
                .short('s')
                .help("Stage to print")
                .value_parser(["tokens", "ast", "model"])
                .default_value("model"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format ('echo' is only available for the model stage)")
                .value_parser(["json", "yaml", "echo", "simple"])
                .default_value("simple"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .get_matches();

    // Both have defaults, and value_parser restricts them to parseable names
    let stage = matches
        .get_one::<String>("stage")
        .map(String::as_str)
        .unwrap_or("model");
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("simple");
    let Some(path) = matches.get_one::<String>("path") else {
        exit_with("Missing input path");
    };
    let config = matches.get_one::<String>("config");

    handle_compile_command(path, stage, format, config.map(String::as_str));
}

fn handle_compile_command(path: &str, stage: &str, format: &str, config_path: Option<&str>) {
    let spec = stage
        .parse::<ProcessingStage>()
        .and_then(|stage| ProcessingSpec::new(stage, format.parse::<OutputFormat>()?))
        .unwrap_or_else(|e| exit_with(&e.to_string()));

    let mut loader = Loader::new();
    if let Some(config_path) = config_path {
        loader = loader.with_file(config_path);
    }
    let config = loader
        .build()
        .unwrap_or_else(|e| exit_with(&format!("Configuration error: {}", e)));

    let source = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with(&format!("Error reading file '{}': {}", path, e)));

    let compiler = Compiler::new(config);

    // Tokens are printed without parsing, so a broken file can still be inspected
    if spec.stage == ProcessingStage::Tokens {
        let tokenized = compiler.tokenize(&source);
        let output = spec
            .render_tokens(&tokenized.tokens)
            .unwrap_or_else(|e| exit_with(&e.to_string()));
        eprint!("{}", report(&tokenized.errors, &Diagnostics::default()));
        print!("{}", output);
        return;
    }

    let compilation = compiler.compile(&source).unwrap_or_else(|e| {
        eprint!("{}", report(e.lex_errors(), &Diagnostics::default()));
        exit_with(&e.to_string())
    });
    log::info!(
        "compiled {}: {} tokens, {} items",
        path,
        compilation.tokens.len(),
        compilation.model.content.len()
    );
    if compilation.model.diagnostics.has_errors() {
        log::warn!(
            "{}: {} instructions rejected",
            path,
            compilation.model.diagnostics.errors.len()
        );
    }

    // The AST stage needs the instruction list, which the compilation does not keep
    let ast = match spec.stage {
        ProcessingStage::Ast => compiler
            .parse(&source)
            .unwrap_or_else(|e| exit_with(&e.to_string())),
        _ => Vec::new(),
    };

    let output = spec
        .render(&compilation, &ast)
        .unwrap_or_else(|e| exit_with(&e.to_string()));

    eprint!(
        "{}",
        report(&compilation.lex_errors, &compilation.model.diagnostics)
    );
    print!("{}", output);
}

fn exit_with(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}
