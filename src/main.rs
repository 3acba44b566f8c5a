use std::{fs::read_to_string, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use verve::{
    ast::ast::{walk, NodeKind},
    lexer::lexer::tokenize,
    parser::parser::parse,
    render_error,
    type_checker::type_checker::{type_check, CheckerOptions},
};

#[derive(Parser)]
#[command(name = "verve", about = "Type check a Verve source file")]
struct Cli {
    /// Path to the .vv source file
    file: PathBuf,
    /// Deepest expression nesting the checker accepts
    #[arg(long, default_value_t = CheckerOptions::default().max_depth)]
    max_depth: usize,
    /// Print the inferred type of every function and each dispatched call
    #[arg(long)]
    dump_types: bool,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file_name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| cli.file.to_string_lossy().to_string());

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: cannot read {}: {}", cli.file.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let tokens = match tokenize(source.clone(), Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("{}", render_error(&err, &source));
            return ExitCode::FAILURE;
        }
    };
    info!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let mut program = match parse(tokens, Rc::new(file_name)) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("{}", render_error(&err, &source));
            return ExitCode::FAILURE;
        }
    };
    info!("Parsed in {:?}", parse_start.elapsed());

    let type_check_start = Instant::now();
    let options = CheckerOptions {
        max_depth: cli.max_depth,
    };
    let root_type = match type_check(&mut program.body, &program.env, &source, options) {
        Ok(ty) => ty,
        Err(fatal) => {
            eprintln!("{}", fatal.report);
            return ExitCode::FAILURE;
        }
    };
    info!("Type checked in {:?}", type_check_start.elapsed());

    if cli.dump_types {
        walk(&program.body, &mut |node| match &node.kind {
            NodeKind::Function(function) => {
                if let Some(ty) = node.get_type() {
                    println!("{}: {}", function.name, ty);
                }
            }
            NodeKind::Call(call) => {
                if let Some(dispatch) = &call.dispatch {
                    println!("{} -> {}", call.callee.describe(), dispatch.symbol);
                }
            }
            _ => {}
        });
    }

    println!("{}", root_type);
    info!("Total time: {:?}", start.elapsed());
    ExitCode::SUCCESS
}
