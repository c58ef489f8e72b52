use std::{path::PathBuf, process::ExitCode};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use huf::{decompress_file, start_compressing};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Compress { verbose: bool },
    Decompress,
}

#[derive(Debug)]
struct Options {
    mode: Mode,
    path: Option<PathBuf>,
}

impl Options {
    fn from_matches(matches: &ArgMatches) -> Self {
        let mode = if matches.get_flag("decompress") {
            Mode::Decompress
        } else {
            Mode::Compress {
                verbose: matches.get_flag("verbose"),
            }
        };

        Self {
            mode,
            path: matches.get_one::<PathBuf>("path").cloned(),
        }
    }
}

fn command() -> Command {
    Command::new("huf")
        .about("Compress a file with a static Huffman code")
        .arg(
            Arg::new("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .conflicts_with("decompress")
                .help("Print the frequency table and the code for each byte"),
        )
        .arg(
            Arg::new("decompress")
                .short('d')
                .action(ArgAction::SetTrue)
                .help("Decompress a .huf file"),
        )
        .arg(
            Arg::new("path")
                .value_parser(value_parser!(PathBuf))
                .help("File to compress, or to decompress with -d"),
        )
}

/// `--help` and friends, which clap reports as errors but aren't failures.
fn is_help(e: &clap::Error) -> bool {
    !e.use_stderr()
}

fn run(mode: Mode, path: PathBuf) -> huf::Result<()> {
    match mode {
        Mode::Compress { verbose } => {
            let pending = start_compressing(&path)?;
            println!("Read in {} bytes", pending.bytes_read());

            let report = pending.finish()?;
            if verbose {
                print!("{report}");
            }
        }
        Mode::Decompress => {
            decompress_file(&path)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let matches = match command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) if is_help(&e) => e.exit(),
        Err(e) => {
            // Bad invocations exit successfully, like a missing path does.
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };
    let options = Options::from_matches(&matches);
    log::debug!("{options:?}");

    // A missing path isn't treated as a failure.
    let Some(path) = options.path else {
        println!("huf requires a file path");
        return ExitCode::SUCCESS;
    };

    match run(options.mode, path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{e}");
            log::debug!("{e:?}");
            if e.is_benign() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
