//! Command-line front end: parse, check, pretty-print, and inspect markup
//! files.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use xmlarbor::encoding::decode_to_utf8;
use xmlarbor::parser::{self, ParseOptions, DEFAULT_MAX_DEPTH};
use xmlarbor::serial::{serialize_node, serialize_with_options, SerializeOptions};
use xmlarbor::tree::{Document, NodeId, NodeKind};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// xmlarbor -- parse, check, and pretty-print markup files.
#[derive(Parser, Debug)]
#[command(name = "xmlarbor", version, about, long_about = None)]
struct Cli {
    /// Files to process (use `-` for stdin).
    #[arg(required = true)]
    files: Vec<String>,

    /// Print progress and timing information on stderr.
    #[arg(long)]
    verbose: bool,

    /// Maximum element nesting depth.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: u32,

    /// Do not output the result tree; only check that it parses.
    #[arg(long)]
    noout: bool,

    /// Spaces per indentation level in the output.
    #[arg(long, value_name = "N", default_value_t = 2)]
    indent: usize,

    /// Print only the elements with this tag name (`*` for all elements).
    #[arg(long, value_name = "TAG")]
    select: Option<String>,

    /// Print an indented dump of node types, names, and values.
    #[arg(long)]
    tree: bool,

    /// Save output to a file instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<String>,
}

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

const EXIT_SUCCESS: u8 = 0;
const EXIT_PARSE_ERROR: u8 = 1;
const EXIT_IO_ERROR: u8 = 2;

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut worst_exit: u8 = EXIT_SUCCESS;

    for file in &cli.files {
        let exit = process_file(&cli, file);
        if exit > worst_exit {
            worst_exit = exit;
        }
    }

    ExitCode::from(worst_exit)
}

/// Processes a single input file and returns an exit code.
fn process_file(cli: &Cli, filename: &str) -> u8 {
    let start = Instant::now();

    let bytes = match read_input(filename) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("{filename}: failed to read: {e}");
            return EXIT_IO_ERROR;
        }
    };

    let doc = match parse_input(cli, &bytes) {
        Ok(d) => d,
        Err(msg) => {
            eprintln!("{filename}: {msg}");
            return EXIT_PARSE_ERROR;
        }
    };

    if cli.verbose {
        eprintln!(
            "{filename}: parsed {} bytes into {} nodes in {:?}",
            bytes.len(),
            doc.node_count(),
            start.elapsed()
        );
    }

    if cli.noout {
        return EXIT_SUCCESS;
    }

    let start_serial = Instant::now();
    let output = if cli.tree {
        format_tree(&doc)
    } else if let Some(tag) = &cli.select {
        format_selection(&doc, tag, cli.indent)
    } else {
        serialize_with_options(&doc, &SerializeOptions::default().indent_width(cli.indent))
    };

    if let Err(e) = write_output(cli, &output) {
        let target = cli.output.as_deref().unwrap_or("stdout");
        eprintln!("{target}: failed to write: {e}");
        return EXIT_IO_ERROR;
    }

    if cli.verbose {
        eprintln!("{filename}: wrote output in {:?}", start_serial.elapsed());
    }

    EXIT_SUCCESS
}

// ---------------------------------------------------------------------------
// Input / output
// ---------------------------------------------------------------------------

/// Reads input from a file or stdin (when filename is `-`).
fn read_input(filename: &str) -> io::Result<Vec<u8>> {
    if filename == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(filename)
    }
}

fn parse_input(cli: &Cli, bytes: &[u8]) -> Result<Document, String> {
    let text = decode_to_utf8(bytes).map_err(|e| e.to_string())?;
    let opts = ParseOptions::default().max_depth(cli.max_depth);
    parser::parse_str_with_options(&text, &opts).map_err(|e| e.to_string())
}

fn write_output(cli: &Cli, content: &str) -> io::Result<()> {
    if let Some(ref output_file) = cli.output {
        fs::write(output_file, content)
    } else {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()
    }
}

// ---------------------------------------------------------------------------
// Output formats
// ---------------------------------------------------------------------------

/// Serializes every element below the root element named `tag`.
fn format_selection(doc: &Document, tag: &str, indent: usize) -> String {
    let Some(root) = doc.root_element() else {
        return String::new();
    };
    doc.find_descendants_by_tag(root, tag)
        .into_iter()
        .map(|id| serialize_node(doc, id, indent, 0))
        .collect()
}

/// Formats the tree as one line per node: type, then name or value.
fn format_tree(doc: &Document) -> String {
    let mut out = String::new();
    for line in [doc.prolog(), doc.doctype()].into_iter().flatten() {
        let _ = writeln!(out, "# {line}");
    }
    format_tree_node(doc, doc.root(), 0, &mut out);
    out
}

fn format_tree_node(doc: &Document, id: NodeId, depth: usize, out: &mut String) {
    let mut stack = vec![(id, depth)];

    while let Some((id, depth)) = stack.pop() {
        let Some(data) = doc.get(id) else {
            continue;
        };
        let indent = "  ".repeat(depth);
        let node_type = data.kind.node_type();

        match &data.kind {
            NodeKind::Document => {
                let _ = writeln!(out, "{indent}{node_type}");
            }
            NodeKind::Element { name, attributes } => {
                let _ = writeln!(out, "{indent}{node_type} {name}");
                for (key, value) in attributes {
                    let _ = writeln!(out, "{indent}  @{key}={value:?}");
                }
            }
            NodeKind::Text { content }
            | NodeKind::CData { content }
            | NodeKind::Comment { content } => {
                let _ = writeln!(out, "{indent}{node_type} {content:?}");
            }
        }

        // Pushed last-first so they pop in document order.
        let mut child = data.last_child;
        while let Some(c) = child {
            stack.push((c, depth + 1));
            child = doc.prev_sibling(c);
        }
    }
}
