use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

use tilde::cli::{self, CliArgs, ScopeFiles};
use tilde::config::{self, Config};
use tilde::{logging, Expander, ScopeStack};

const USAGE: &str = "Usage: tilde [-f[<file>]]... [-c<text>] [-ds] [<name>=<value> ...]\n\
       (a scope file path containing '=' must be attached: -f<file>)";

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("tilde: {e}");
            eprintln!("{USAGE}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = logging::init(args.debug) {
        eprintln!("tilde: cannot initialise logging: {e}");
    }

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("tilde: {e}");
            ExitCode::from(1)
        }
    }
}

/// Build the scope stack, expand the requested text, and print it.
///
/// Returns `Ok(false)` when strict mode is on and a token stayed unresolved.
fn run(args: CliArgs) -> tilde::Result<bool> {
    let mut stack = ScopeStack::new();

    // ── Scope files: one frame each, outermost first ─────────────────────────
    let files: Vec<PathBuf> = match args.scope_files {
        ScopeFiles::Skip => Vec::new(),
        ScopeFiles::Explicit(paths) => paths,
        ScopeFiles::Search => config::find_default_scope_file().into_iter().collect(),
    };
    for path in &files {
        let (frame, errors) = Config::load_file(path)?;
        for e in &errors {
            tracing::warn!(path = %path.display(), "{e}");
        }
        stack.push(frame);
    }

    // ── Command-line definitions form the innermost frame ────────────────────
    stack.push(args.defines);

    let expander = Expander::new().with_trace(args.debug);
    let mut all_resolved = true;
    let mut emit = |line: &str| {
        let expansion = expander.expand_value(line, &stack);
        for name in &expansion.unresolved {
            tracing::warn!(identifier = %name, "unresolved token ~{{{name}}}");
        }
        all_resolved &= expansion.unresolved.is_empty();
        println!("{}", expansion.text);
    };

    match &args.text {
        Some(text) => emit(text),
        None => {
            for line in std::io::stdin().lock().lines() {
                let line = line.map_err(|source| tilde::Error::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
                emit(&line);
            }
        }
    }

    Ok(all_resolved || !args.strict)
}
