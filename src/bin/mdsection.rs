//! CLI binary for mdsection.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `NormalizeConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use mdsection::{normalize_dir, MissingImagePolicy, NormalizeConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Normalize one OCR output directory (summary to stderr, chunks to stdout)
  mdsection PDF_Extraction/my-paper

  # Emit the full document + chunks as JSON
  mdsection --json PDF_Extraction/my-paper > my-paper.json

  # Dry run: do not write the cleaned doc.md back
  mdsection --no-persist PDF_Extraction/my-paper

  # Tolerate an incomplete image set
  mdsection --allow-missing-images PDF_Extraction/my-paper

  # Recognize an extra reference heading
  mdsection --heading Bibliography PDF_Extraction/my-paper

EXPECTED LAYOUT:
  <DIR>/doc.md     Markdown produced by the OCR service
  <DIR>/imgs/…     images referenced from doc.md via <img src="imgs/…">
"#;

/// Normalize OCR-extracted Markdown into a chunked, self-contained document.
#[derive(Parser, Debug)]
#[command(
    name = "mdsection",
    version,
    about = "Normalize OCR-extracted Markdown into a chunked, self-contained document",
    long_about = "Normalize the per-PDF output of an OCR service (doc.md + imgs/) into a \
self-contained document: strip the references section, inline every referenced image as \
base64, and split the body into chunks along numbered section headings.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// OCR output directory containing doc.md and imgs/.
    dir: PathBuf,

    /// Write output to this file instead of stdout.
    #[arg(short, long, env = "MDSECTION_OUTPUT")]
    output: Option<PathBuf>,

    /// Output the full NormalizedDocument as JSON instead of a chunk listing.
    #[arg(long, env = "MDSECTION_JSON")]
    json: bool,

    /// Do not write the cleaned content back to doc.md.
    #[arg(long, env = "MDSECTION_NO_PERSIST")]
    no_persist: bool,

    /// Skip unresolvable image references instead of failing.
    #[arg(long, env = "MDSECTION_ALLOW_MISSING_IMAGES")]
    allow_missing_images: bool,

    /// Extra reference heading to recognize (repeatable).
    #[arg(long = "heading", value_name = "HEADING")]
    headings: Vec<String>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "MDSECTION_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "MDSECTION_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = NormalizeConfig::builder().persist(!cli.no_persist);
    if cli.allow_missing_images {
        builder = builder.missing_images(MissingImagePolicy::Skip);
    }
    for h in &cli.headings {
        builder = builder.reference_heading(h.as_str());
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run pipeline ─────────────────────────────────────────────────────
    let out = normalize_dir(&cli.dir, &config)
        .with_context(|| format!("Failed to normalize '{}'", cli.dir.display()))?;

    // ── Render output ────────────────────────────────────────────────────
    let rendered = if cli.json {
        serde_json::to_string_pretty(&out).context("Failed to serialize output")?
    } else {
        render_summary(&out)
    };

    match cli.output {
        Some(path) => {
            std::fs::write(&path, rendered.as_bytes())
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
        }
    }

    if !cli.quiet {
        eprintln!(
            "doc {}: {} chunk(s), {} image(s), {} byte(s) of references removed",
            &out.document.doc_id[..12.min(out.document.doc_id.len())],
            out.stats.chunk_count,
            out.stats.image_count,
            out.stats.bytes_removed,
        );
    }

    Ok(())
}

/// Human-readable chunk listing: index, length, and a one-line preview.
fn render_summary(out: &mdsection::NormalizedDocument) -> String {
    let mut s = String::new();
    for chunk in &out.chunks {
        let preview: String = chunk
            .content
            .chars()
            .take(80)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        s.push_str(&format!(
            "[{}] {} chars  {}\n",
            chunk.chunk_index,
            chunk.content.len(),
            preview.trim_end()
        ));
    }
    s
}
