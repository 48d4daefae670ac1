//! Command-line argument parsing.
//!
//! Usage:
//!   tilde [-f[<file>]]... [-c<text>] [-ds] [<name>=<value> ...]
//!
//! `-f <file>` only takes the next argument as a file when it does not
//! start with `-` and holds no `=`; otherwise that argument is left to be
//! read as a flag or a `name=value` definition.  Use the attached form
//! `-f<file>` for such paths.

use std::path::PathBuf;

use crate::scope::Frame;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Scope files to load.
    pub scope_files: ScopeFiles,
    /// Text to expand (`-c<text>`); stdin lines are expanded when absent.
    pub text: Option<String>,
    /// Per-token trace on stderr (`-d`).
    pub debug: bool,
    /// Fail when tokens stay unresolved (`-s`).
    pub strict: bool,
    /// `name=value` definitions for the innermost frame.
    pub defines: Frame,
}

/// Which scope files to load.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum ScopeFiles {
    /// Use the default scope file, if one exists.
    #[default]
    Search,
    /// `-f` with no file argument: load nothing.
    Skip,
    /// `-f<file>`, possibly repeated: one frame per file, outermost first.
    Explicit(Vec<PathBuf>),
}

impl ScopeFiles {
    fn add(&mut self, path: PathBuf) {
        match self {
            ScopeFiles::Explicit(paths) => paths.push(path),
            _ => *self = ScopeFiles::Explicit(vec![path]),
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            positional.extend(argv[i + 1..].iter().cloned());
            break;
        }

        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'd' => args.debug = true,
                's' => args.strict = true,

                // -f[<file>]
                'f' => {
                    if j + 1 < chars.len() {
                        let file: String = chars[j + 1..].iter().collect();
                        args.scope_files.add(PathBuf::from(file));
                        j = chars.len();
                    } else if i + 1 < argv.len() && !argv[i + 1].starts_with('-') && !argv[i + 1].contains('=') {
                        i += 1;
                        args.scope_files.add(PathBuf::from(&argv[i]));
                    } else if !matches!(args.scope_files, ScopeFiles::Explicit(_)) {
                        args.scope_files = ScopeFiles::Skip;
                    }
                }

                // -c<text>
                'c' => {
                    let text = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err("-c requires a text argument".to_owned());
                    };
                    args.text = Some(text);
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    for def in positional {
        let Some((name, value)) = def.split_once('=') else {
            return Err(format!("expected <name>=<value>, got '{def}'"));
        };
        if name.is_empty() {
            return Err(format!("empty name in '{def}'"));
        }
        args.defines.set(name, value);
    }

    Ok(args)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn empty_args() {
        let a = parse_argv(&argv(&[])).unwrap();
        assert_eq!(a.scope_files, ScopeFiles::Search);
        assert!(a.text.is_none());
        assert!(a.defines.is_empty());
    }

    #[test]
    fn bool_flags() {
        let a = parse_argv(&argv(&["-d", "-s"])).unwrap();
        assert!(a.debug);
        assert!(a.strict);
    }

    #[test]
    fn combined_bool_flags() {
        let a = parse_argv(&argv(&["-ds"])).unwrap();
        assert!(a.debug && a.strict);
    }

    #[test]
    fn scope_file_skip() {
        let a = parse_argv(&argv(&["-f"])).unwrap();
        assert_eq!(a.scope_files, ScopeFiles::Skip);
    }

    #[test]
    fn scope_file_embedded() {
        let a = parse_argv(&argv(&["-fcluster.rc"])).unwrap();
        assert_eq!(a.scope_files, ScopeFiles::Explicit(vec![PathBuf::from("cluster.rc")]));
    }

    #[test]
    fn scope_files_repeat_in_order() {
        let a = parse_argv(&argv(&["-f", "cluster.rc", "-fdaemon.rc"])).unwrap();
        assert_eq!(
            a.scope_files,
            ScopeFiles::Explicit(vec![PathBuf::from("cluster.rc"), PathBuf::from("daemon.rc")])
        );
    }

    #[test]
    fn bare_f_before_define_does_not_eat_it() {
        let a = parse_argv(&argv(&["-f", "host=n1"])).unwrap();
        assert_eq!(a.scope_files, ScopeFiles::Skip);
        assert_eq!(a.defines.get("host"), Some("n1"));
    }

    #[test]
    fn path_with_equals_needs_attached_form() {
        let a = parse_argv(&argv(&["-f", "a=b.rc"])).unwrap();
        assert_eq!(a.scope_files, ScopeFiles::Skip);
        assert_eq!(a.defines.get("a"), Some("b.rc"));

        let a = parse_argv(&argv(&["-fa=b.rc"])).unwrap();
        assert_eq!(a.scope_files, ScopeFiles::Explicit(vec![PathBuf::from("a=b.rc")]));
        assert!(a.defines.is_empty());
    }

    #[test]
    fn text_embedded_and_separate() {
        let a = parse_argv(&argv(&["-c~{host}"])).unwrap();
        assert_eq!(a.text.as_deref(), Some("~{host}"));
        let a = parse_argv(&argv(&["-c", "~{host}:~{port}"])).unwrap();
        assert_eq!(a.text.as_deref(), Some("~{host}:~{port}"));
    }

    #[test]
    fn text_missing_argument() {
        assert!(parse_argv(&argv(&["-c"])).is_err());
    }

    #[test]
    fn defines_become_frame() {
        let a = parse_argv(&argv(&["host=n1", "tag=", "url=a=b"])).unwrap();
        assert_eq!(a.defines.get("host"), Some("n1"));
        assert_eq!(a.defines.get("tag"), Some(""));
        assert_eq!(a.defines.get("url"), Some("a=b"));
    }

    #[test]
    fn define_after_double_dash() {
        let a = parse_argv(&argv(&["--", "-odd=1"])).unwrap();
        assert_eq!(a.defines.get("-odd"), Some("1"));
    }

    #[test]
    fn positional_without_equals_is_error() {
        assert!(parse_argv(&argv(&["host"])).is_err());
        assert!(parse_argv(&argv(&["=v"])).is_err());
    }

    #[test]
    fn unknown_flag() {
        assert!(parse_argv(&argv(&["-z"])).is_err());
    }
}
