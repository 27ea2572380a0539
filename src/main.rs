use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use argh::FromArgs;
use minish::config::{Config, ConfigLoader};
use minish::error::ShellError;
use minish::repl::Repl;

#[derive(FromArgs)]
/// Read shell command lines and print how they are tokenized and parsed.
struct Args {
    /// path to a key=value config file
    #[argh(option)]
    config: Option<PathBuf>,

    /// parse this line and exit
    #[argh(option, short = 'c')]
    command: Option<String>,

    /// do not print the token dump
    #[argh(switch)]
    quiet_tokens: bool,

    /// do not look programs up on PATH
    #[argh(switch)]
    no_resolve: bool,
}

fn load_config(args: &Args) -> Result<Config, ShellError> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::default_config(),
    };
    if args.quiet_tokens {
        config.show_tokens = false;
    }
    if args.no_resolve {
        config.resolve_paths = false;
    }
    Ok(config)
}

fn run(args: Args) -> Result<(), ShellError> {
    let config = load_config(&args)?;
    let mut repl = Repl::new(io::stdin().lock(), io::stdout().lock(), config);
    match &args.command {
        Some(line) => repl.run_line(line).map(|_| ()),
        None => repl.run(),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Args = argh::from_env();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("minish: {}", e);
            ExitCode::FAILURE
        }
    }
}
