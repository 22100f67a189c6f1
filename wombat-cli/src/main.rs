//! Wombat CLI
//!
//! Parses an HTML document or fragment and prints the resulting tree.
//!
//! - `wombat page.html` prints the html5lib test-format dump
//! - `wombat --format json --html '<p>x'` prints the tree as JSON
//! - `wombat --fragment 'svg path' --errors --html '<circle/>'`

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use serde::Serialize;
use thiserror::Error;
use wombat_dom::{NodeRef, QuirksMode, print_tree};
use wombat_html::{FragmentContext, ParseError, ParseOpts, ParsedDocument, parse_document, parse_fragment};

/// Wombat: WHATWG HTML tree construction from the command line
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(name = "wombat")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Dump a file in html5lib test format
    wombat ./index.html

    # Parse inline HTML and show the parse errors
    wombat --errors --html '<table>x<tr>y</table>'

    # Parse a fragment in a table body context
    wombat --fragment tbody --html '<tr><td>1'

    # JSON output with scripting enabled
    wombat --format json --scripting --html '<noscript><p>x</noscript>'
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Parse as a fragment in this context, e.g. `td`, `svg path`, `math mi`
    #[arg(long, value_name = "CONTEXT")]
    fragment: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Dump)]
    format: Format,

    /// Print the parse error log after the tree
    #[arg(short, long)]
    errors: bool,

    /// Parse with the scripting flag enabled
    #[arg(long)]
    scripting: bool,

    /// Parse as an iframe srcdoc document
    #[arg(long)]
    srcdoc: bool,

    /// Also record informational parse errors
    #[arg(long)]
    exact_errors: bool,

    /// Read parser options from a JSON file; flags are applied on top
    #[arg(long, value_name = "FILE")]
    opts: Option<PathBuf>,

    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// How the tree is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// html5lib tree-construction test format
    Dump,
    /// JSON node table
    Json,
    /// Indented, human-oriented view
    Tree,
}

/// Failures outside the parser itself.
#[derive(Debug, Error)]
enum CliError {
    #[error("no input: pass a FILE or --html")]
    NoInput,
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid options file {path}: {source}")]
    Options {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Context(#[from] wombat_html::tree_builder::ContextParseError),
}

/// JSON output: the tree plus what the parse decided about it.
#[derive(Serialize)]
struct JsonOutput<'a> {
    quirks_mode: QuirksMode,
    tree: NodeRef<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [ParseError]>,
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Options file first, then the flags that were given.
fn load_opts(cli: &Cli) -> Result<ParseOpts, CliError> {
    let mut opts = match &cli.opts {
        Some(path) => serde_json::from_str(&read_file(path)?).map_err(|source| CliError::Options {
            path: path.clone(),
            source,
        })?,
        None => ParseOpts::default(),
    };
    opts.scripting_enabled |= cli.scripting;
    opts.iframe_srcdoc |= cli.srcdoc;
    opts.exact_errors |= cli.exact_errors;
    Ok(opts)
}

fn load_input(cli: &Cli) -> Result<String, CliError> {
    match (&cli.html, &cli.path) {
        (Some(html), _) => Ok(html.clone()),
        (None, Some(path)) => read_file(path),
        (None, None) => Err(CliError::NoInput),
    }
}

fn parse(cli: &Cli) -> Result<ParsedDocument, CliError> {
    let input = load_input(cli)?;
    let opts = load_opts(cli)?;
    log::debug!(target: "wombat", "parsing {} bytes with {opts:?}", input.len());
    Ok(match &cli.fragment {
        Some(context) => {
            let context: FragmentContext = context.parse()?;
            parse_fragment(&input, &context, opts)
        }
        None => parse_document(&input, opts),
    })
}

fn print_errors(doc: &ParsedDocument) {
    println!("\n=== Parse Errors ({}) ===", doc.errors.len());
    for error in &doc.errors {
        println!("  {} {error}", format!("#{}", error.token_index).dimmed());
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    wombat_common::logging::init(cli.verbose);

    let doc = parse(&cli)?;

    match cli.format {
        Format::Dump => {
            print!("{}", doc.dump());
            if cli.errors {
                print_errors(&doc);
            }
        }
        Format::Tree => {
            println!("{}", format!("quirks mode: {}", doc.quirks_mode).bold());
            print_tree(&doc.tree, doc.root, 0);
            if cli.errors {
                print_errors(&doc);
            }
        }
        Format::Json => {
            let output = JsonOutput {
                quirks_mode: doc.quirks_mode,
                tree: NodeRef::new(&doc.tree, doc.root),
                errors: cli.errors.then_some(doc.errors.as_slice()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("wombat").chain(args.iter().copied()))
    }

    #[test]
    fn flags_are_applied_over_defaults() {
        let opts = load_opts(&cli(&["--scripting", "--srcdoc", "--html", "x"])).expect("opts");
        assert!(opts.scripting_enabled);
        assert!(opts.iframe_srcdoc);
        assert!(!opts.exact_errors);
    }

    #[test]
    fn html_string_is_parsed_as_a_fragment() {
        let doc = parse(&cli(&["--fragment", "tr", "--html", "<td>1"])).expect("parse");
        assert_eq!(doc.dump(), "| <td>\n|   \"1\"\n");
    }

    #[test]
    fn missing_input_is_an_error() {
        assert!(matches!(parse(&cli(&[])), Err(CliError::NoInput)));
    }

    #[rstest]
    #[case("svg svg svg")]
    #[case("html body")]
    fn bad_fragment_context_is_reported(#[case] context: &str) {
        let result = parse(&cli(&["--fragment", context, "--html", "x"]));
        assert!(matches!(result, Err(CliError::Context(_))));
    }

    #[rstest]
    #[case("dump", Format::Dump)]
    #[case("json", Format::Json)]
    #[case("tree", Format::Tree)]
    fn output_formats_parse(#[case] value: &str, #[case] expected: Format) {
        assert_eq!(cli(&["--format", value, "--html", "x"]).format, expected);
    }
}
