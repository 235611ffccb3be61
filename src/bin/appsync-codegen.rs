//! generate typed appsync operation bindings from a schema
//!
//! reads a graphql sdl schema and a set of operation documents, runs the
//! codegen engine once over all of them, and writes the resulting rust
//! source to disk — either as a single file or as a scaffolded consumer
//! crate.
//!
//! command help reference (kept in sync with `appsync-codegen --help`):
#[doc = concat!("```text\n", include_str!("appsync-codegen-help.txt"), "\n```")]
pub const CLI_HELP: &str = include_str!("appsync-codegen-help.txt");

use appsync::codegen::{generate, DocumentInput, GeneratorConfig, OperationKind};
use graphql_parser::query::Document;
use graphql_parser::{parse_query, parse_schema};
use std::fs;
use std::path::PathBuf;

#[derive(Debug)]
struct Args {
    schema_path: PathBuf,
    docs_dir: Option<PathBuf>,
    doc_files: Vec<PathBuf>,
    out: PathBuf,
    crate_name: Option<String>,
    appsync_path: Option<String>,
    only: Option<String>,
    reserved: Vec<String>,
    overrides: Vec<(String, String)>,
}

enum ParseArgsError {
    Help,
    Message(String),
}

fn main() {
    let args = match parse_args(std::env::args().collect()) {
        Ok(args) => args,
        Err(ParseArgsError::Help) => {
            print!("{CLI_HELP}");
            return;
        }
        Err(ParseArgsError::Message(err)) => {
            eprintln!("{err}\n\n{CLI_HELP}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&args) {
        eprintln!("codegen failed: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), String> {
    let schema_text = fs::read_to_string(&args.schema_path)
        .map_err(|err| format!("failed to read {}: {err}", args.schema_path.display()))?;
    let schema = parse_schema::<String>(&schema_text)
        .map_err(|err| format!("failed to parse schema: {err}"))?;

    let mut config = GeneratorConfig::default();
    for word in &args.reserved {
        config = config.with_reserved_word(word.clone());
    }
    for (signature, target) in &args.overrides {
        config = config.with_type_override(signature.clone(), target.clone());
    }
    if let Some(keyword) = &args.only {
        let kind = OperationKind::from_keyword(keyword).map_err(|err| err.to_string())?;
        config = config.with_only(kind);
    }

    let doc_paths = collect_document_paths(args)?;
    if doc_paths.is_empty() {
        return Err("no operation documents found; pass --docs or --doc".to_string());
    }

    let mut sources = Vec::new();
    for path in doc_paths {
        let text = fs::read_to_string(&path)
            .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
        sources.push((path, text));
    }

    let mut parsed: Vec<Document<'_, String>> = Vec::new();
    for (path, text) in &sources {
        let document = parse_query::<String>(text)
            .map_err(|err| format!("failed to parse {}: {err}", path.display()))?;
        parsed.push(document);
    }

    let inputs: Vec<DocumentInput<'_>> = sources
        .iter()
        .zip(&parsed)
        .map(|((path, source), document)| DocumentInput {
            path: path.as_path(),
            source: source.as_str(),
            document,
        })
        .collect();

    let output = generate(&schema, &inputs, &config).map_err(|err| err.to_string())?;

    match &args.crate_name {
        Some(crate_name) => write_crate(args, crate_name, &output),
        None => {
            if let Some(parent) = args.out.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| err.to_string())?;
                }
            }
            fs::write(&args.out, output).map_err(|err| err.to_string())
        }
    }
}

fn collect_document_paths(args: &Args) -> Result<Vec<PathBuf>, String> {
    let mut paths = Vec::new();
    if let Some(dir) = &args.docs_dir {
        let entries =
            fs::read_dir(dir).map_err(|err| format!("failed to read {}: {err}", dir.display()))?;
        for entry in entries {
            let entry = entry.map_err(|err| err.to_string())?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("graphql") {
                paths.push(path);
            }
        }
        paths.sort();
    }
    paths.extend(args.doc_files.iter().cloned());
    Ok(paths)
}

fn write_crate(args: &Args, crate_name: &str, output: &str) -> Result<(), String> {
    let out_dir = &args.out;
    let src_dir = out_dir.join("src");
    fs::create_dir_all(&src_dir).map_err(|err| err.to_string())?;

    let mut cargo = String::new();
    cargo.push_str("[package]\n");
    cargo.push_str(&format!("name = \"{}\"\n", crate_name));
    cargo.push_str("version = \"0.1.0\"\n");
    cargo.push_str("edition = \"2021\"\n\n");
    cargo.push_str("[dependencies]\n");
    if let Some(path) = &args.appsync_path {
        cargo.push_str(&format!("appsync = {{ path = \"{}\" }}\n", path));
    } else {
        cargo.push_str("appsync = \"0.1\"\n");
    }
    cargo.push_str("serde = { version = \"1\", features = [\"derive\"] }\n");
    cargo.push_str("serde_json = \"1\"\n");
    fs::write(out_dir.join("Cargo.toml"), cargo).map_err(|err| err.to_string())?;

    fs::write(src_dir.join("lib.rs"), output).map_err(|err| err.to_string())
}

fn parse_args(args: Vec<String>) -> Result<Args, ParseArgsError> {
    let mut schema_path = None;
    let mut docs_dir = None;
    let mut doc_files = Vec::new();
    let mut out = None;
    let mut crate_name = None;
    let mut appsync_path = None;
    let mut only = None;
    let mut reserved = Vec::new();
    let mut overrides = Vec::new();

    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--schema" => schema_path = iter.next().map(PathBuf::from),
            "--docs" => docs_dir = iter.next().map(PathBuf::from),
            "--doc" => doc_files.extend(iter.next().map(PathBuf::from)),
            "--out" => out = iter.next().map(PathBuf::from),
            "--crate-name" => crate_name = iter.next(),
            "--appsync-path" => appsync_path = iter.next(),
            "--only" => only = iter.next(),
            "--reserved" => reserved.extend(iter.next()),
            "--map" => {
                let entry = iter
                    .next()
                    .ok_or_else(|| ParseArgsError::Message("--map requires a value".to_string()))?;
                let (signature, target) = entry.split_once('=').ok_or_else(|| {
                    ParseArgsError::Message(format!("--map expects Sig=Type, got: {entry}"))
                })?;
                overrides.push((signature.to_string(), target.to_string()));
            }
            "--help" | "-h" => return Err(ParseArgsError::Help),
            _ => return Err(ParseArgsError::Message(format!("unknown argument: {arg}"))),
        }
    }

    let schema_path = schema_path
        .ok_or_else(|| ParseArgsError::Message("--schema is required".to_string()))?;
    let out = out.ok_or_else(|| ParseArgsError::Message("--out is required".to_string()))?;

    Ok(Args {
        schema_path,
        docs_dir,
        doc_files,
        out,
        crate_name,
        appsync_path,
        only,
        reserved,
        overrides,
    })
}
