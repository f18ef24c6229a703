//! Cast CLI - inspect, convert and verify Cast scene files.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use cast::format::FileHeader;
use cast::prelude::*;

/// Cast - scene file inspection tool
#[derive(Parser)]
#[command(name = "cast")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// First hash handed to nodes stored without one (decimal or 0x-prefixed hex)
    #[arg(long, global = true, env = "CAST_HASH_SEED", value_parser = parse_seed)]
    hash_seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show header fields and node counts
    Info {
        /// Input Cast file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the node hierarchy
    Tree {
        /// Input Cast file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Dump the node tree as JSON
    Json {
        /// Input Cast file
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load a file and write it back out
    Rewrite {
        /// Input Cast file
        #[arg(short, long)]
        input: PathBuf,

        /// Output Cast file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Check that files survive a load/save cycle unchanged
    Verify {
        /// Files or directories to scan for `.cast` files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let hashes = cli
        .hash_seed
        .map(HashGenerator::with_seed)
        .unwrap_or_default();

    match cli.command {
        Commands::Info { input } => cmd_info(&input, hashes)?,
        Commands::Tree { input } => cmd_tree(&input, hashes)?,
        Commands::Json { input, output } => cmd_json(&input, output.as_deref(), hashes)?,
        Commands::Rewrite { input, output } => cmd_rewrite(&input, &output, hashes)?,
        Commands::Verify { paths } => cmd_verify(&paths, hashes)?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn parse_seed(s: &str) -> std::result::Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid hash seed '{s}': {e}"))
}

fn load(path: &Path, hashes: HashGenerator) -> Result<(Vec<u8>, Cast)> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if !Cast::is_cast(&data) {
        anyhow::bail!("{} is not a Cast file", path.display());
    }
    let cast = Cast::load_with(&data[..], hashes)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok((data, cast))
}

fn cmd_info(input: &Path, hashes: HashGenerator) -> Result<()> {
    let start = Instant::now();
    let (data, cast) = load(input, hashes)?;
    let header = FileHeader::load(&mut &data[..])?;

    println!("File:    {}", input.display());
    println!("Size:    {} bytes", data.len());
    println!("Version: {}", header.version.get());
    println!("Roots:   {}", cast.root_count());
    println!("Nodes:   {} (parsed in {:?})", cast.node_count(), start.elapsed());

    let mut kinds: BTreeMap<String, usize> = BTreeMap::new();
    for node in cast.nodes() {
        *kinds.entry(node.kind().to_string()).or_default() += 1;
    }
    for (kind, count) in &kinds {
        println!("  {:<20} {:>8}", kind, count);
    }

    Ok(())
}

fn cmd_tree(input: &Path, hashes: HashGenerator) -> Result<()> {
    let (_, cast) = load(input, hashes)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for root in cast.roots() {
        write_tree(&mut out, root, 0)?;
    }
    out.flush()?;

    Ok(())
}

fn write_tree<W: Write>(out: &mut W, node: NodeRef<'_>, depth: usize) -> io::Result<()> {
    let mut pending = vec![(node, depth)];
    while let Some((node, depth)) = pending.pop() {
        write_node(out, node, depth)?;
        pending.extend(node.children().rev().map(|child| (child, depth + 1)));
    }
    Ok(())
}

fn write_node<W: Write>(out: &mut W, node: NodeRef<'_>, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    let name = node
        .property("n")
        .and_then(|p| p.first())
        .and_then(|v| v.as_str())
        .map(|name| format!(" \"{name}\""))
        .unwrap_or_default();

    writeln!(
        out,
        "{indent}{}{name} [{:#018x}] {} bytes",
        node.kind(),
        node.hash(),
        node.length()
    )?;

    for property in node.properties() {
        writeln!(
            out,
            "{indent}  .{} {} x{}",
            property.name(),
            property.property_type(),
            property.len()
        )?;
    }

    Ok(())
}

fn cmd_json(input: &Path, output: Option<&Path>, hashes: HashGenerator) -> Result<()> {
    let (_, cast) = load(input, hashes)?;

    match output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &cast).context("Failed to write JSON")?;
            writer.flush()?;
            info!(path = %path.display(), "wrote json");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            serde_json::to_writer_pretty(&mut writer, &cast).context("Failed to write JSON")?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}

fn cmd_rewrite(input: &Path, output: &Path, hashes: HashGenerator) -> Result<()> {
    println!("Rewriting: {} -> {}", input.display(), output.display());

    let (data, cast) = load(input, hashes)?;
    cast.write_to_file(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let written = fs::metadata(output)?.len();
    println!("Wrote {} bytes (input was {} bytes)", written, data.len());

    Ok(())
}

fn collect_cast_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let is_cast = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("cast"));
            if entry.file_type().is_file() && is_cast {
                files.push(entry.into_path());
            }
        }
    }
    files
}

/// Load, re-encode and compare one file.
fn verify_file(path: &Path, hashes: HashGenerator) -> Result<()> {
    let (data, cast) = load(path, hashes)?;

    let mut offset = FileHeader::SIZE;
    for (index, root) in cast.roots().enumerate() {
        let recorded = data
            .get(offset + 4..offset + 8)
            .and_then(|b| b.try_into().ok())
            .map(u32::from_le_bytes)
            .with_context(|| format!("root {index} header out of bounds"))?;
        if recorded != root.length() {
            anyhow::bail!(
                "root {index} records {recorded} bytes, computed {}",
                root.length()
            );
        }
        offset += recorded as usize;
    }
    if offset != data.len() {
        anyhow::bail!("{} trailing bytes after the last root", data.len().saturating_sub(offset));
    }

    let encoded = cast.to_bytes().context("Failed to re-encode")?;
    if encoded != data {
        let first_diff = encoded
            .iter()
            .zip(&data)
            .position(|(a, b)| a != b)
            .unwrap_or(encoded.len().min(data.len()));
        anyhow::bail!(
            "re-encoded output differs at byte {first_diff} ({} vs {} bytes)",
            encoded.len(),
            data.len()
        );
    }

    Ok(())
}

fn cmd_verify(paths: &[PathBuf], hashes: HashGenerator) -> Result<()> {
    let files = collect_cast_files(paths);
    println!("Verifying {} files...", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let failures: Vec<(PathBuf, anyhow::Error)> = files
        .par_iter()
        .filter_map(|path| {
            debug!(path = %path.display(), "verifying");
            let result = verify_file(path, hashes.clone());
            pb.inc(1);
            result.err().map(|e| (path.clone(), e))
        })
        .collect();
    pb.finish_with_message("Done");

    for (path, err) in &failures {
        eprintln!("FAIL {}: {:#}", path.display(), err);
    }
    println!(
        "Verified {} files in {:?} ({} failures)",
        files.len(),
        start.elapsed(),
        failures.len()
    );

    if !failures.is_empty() {
        anyhow::bail!("{} of {} files failed verification", failures.len(), files.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed("42"), Ok(42));
        assert_eq!(parse_seed("0x10"), Ok(16));
        assert_eq!(parse_seed("0x534E_4F44_0000_0001"), Ok(0x534E_4F44_0000_0001));
        assert!(parse_seed("seed").is_err());
    }

    #[test]
    fn test_verify_accepts_own_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.cast");

        let mut cast = Cast::new();
        let root = cast.create_root();
        let model = cast.add_child(root, NodeKind::Model);
        cast.node_mut(model).unwrap().set_str("n", "crate");
        cast.write_to_file(&path).unwrap();

        assert_eq!(collect_cast_files(&[dir.path().to_path_buf()]), [path.clone()]);
        verify_file(&path, HashGenerator::default()).unwrap();
    }

    #[test]
    fn test_verify_rejects_stale_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stale.cast");

        let mut cast = Cast::new();
        cast.create_root();
        let mut bytes = cast.to_bytes().unwrap();
        // Root node size field inflated past the real span.
        bytes[20..24].copy_from_slice(&64u32.to_le_bytes());
        fs::write(&path, bytes).unwrap();

        assert!(verify_file(&path, HashGenerator::default()).is_err());
    }

    #[test]
    fn test_tree_output() {
        let mut cast = Cast::new();
        let root = cast.create_root();
        cast.node_mut(root).unwrap().set_hash(1).set_str("n", "scene");

        let mut out = Vec::new();
        write_tree(&mut out, cast.roots().next().unwrap(), 0).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Root \"scene\" [0x0000000000000001]"));
        assert!(text.contains(".n s x1"));
    }

    #[test]
    fn test_tree_output_order() {
        let mut cast = Cast::new();
        let root = cast.create_root();
        let model = cast.add_child(root, NodeKind::Model);
        cast.node_mut(model).unwrap().set_str("n", "first");
        cast.add_child(model, NodeKind::Mesh);
        let second = cast.add_child(root, NodeKind::Model);
        cast.node_mut(second).unwrap().set_str("n", "second");

        let mut out = Vec::new();
        write_tree(&mut out, cast.roots().next().unwrap(), 0).unwrap();
        let text = String::from_utf8(out).unwrap();
        let kinds: Vec<_> = text
            .lines()
            .filter(|line| !line.trim_start().starts_with('.'))
            .map(|line| line.split(" [").next().unwrap_or_default())
            .collect();
        assert_eq!(kinds, ["Root", "  Model \"first\"", "    Mesh", "  Model \"second\""]);
    }

    #[test]
    fn test_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scene.cast");
        let output = dir.path().join("scene.json");

        let mut cast = Cast::new();
        let root = cast.create_root();
        cast.node_mut(root).unwrap().set_hash(5).set_value("fr", 30.0f32);
        cast.add_child(root, NodeKind::Generic(u32::from_le_bytes(*b"inst")));
        cast.write_to_file(&input).unwrap();

        cmd_json(&input, Some(&output), HashGenerator::default()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&fs::read(&output).unwrap()).unwrap();

        let root = &json[0];
        assert_eq!(root["kind"], "Root");
        assert_eq!(root["hash"], "0x0000000000000005");
        assert_eq!(root["properties"][0]["name"], "fr");
        assert_eq!(root["properties"][0]["type"], "f");
        assert_eq!(root["properties"][0]["values"][0], 30.0);
        assert_eq!(root["children"][0]["kind"], "Generic(inst)");
    }
}
