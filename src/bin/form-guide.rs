//! Form guide CLI tool
//!
//! Fills the FCS requirements questionnaire with sample answers and turns it into
//! client-facing PDFs.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use form_guide::config::{FormPlan, GuideOptions, SampleData, SlideOptions};
use form_guide::form::AdvanceOutcome;
use form_guide::guide::{assemble_from_dir, generate_guide};
use form_guide::pdf::extract_metadata;
use form_guide::slides::render_slides;

/// Form Guide - Sample guides for the FCS website requirements form
#[derive(Parser)]
#[command(name = "form-guide")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Fill the live form and build the screenshot guide
    form-guide guide

    # Rebuild the guide from screenshots captured earlier
    form-guide assemble --screenshots-dir sample-guide-screenshots -o guide.pdf

    # Export the HTML slide deck
    form-guide slides --html filled-example-slides.html")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill the form, capture every page and build the guide PDF
    Guide {
        /// Form URL
        #[arg(long)]
        url: Option<String>,

        /// Directory for page screenshots
        #[arg(long)]
        screenshots_dir: Option<PathBuf>,

        /// Output PDF file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Build the guide PDF from existing screenshots
    Assemble {
        /// Directory holding page-NN.png screenshots
        #[arg(long)]
        screenshots_dir: Option<PathBuf>,

        /// Output PDF file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Export the HTML slide deck to PDF
    Slides {
        /// Slide deck HTML file
        #[arg(long)]
        html: Option<PathBuf>,

        /// Output PDF file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Guide { url, screenshots_dir, output, headed, open } => {
            cmd_guide(url, screenshots_dir, output, headed, open)
        }
        Commands::Assemble { screenshots_dir, output, open } => {
            cmd_assemble(screenshots_dir, output, open)
        }
        Commands::Slides { html, output, headed, open } => {
            cmd_slides(html, output, headed, open)
        }
        Commands::Info { input } => {
            cmd_info(input)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
}

/// Open a file with the system default application
fn open_file(path: &PathBuf) -> anyhow::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Fill the live form and build the guide
fn cmd_guide(
    url: Option<String>,
    screenshots_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    headed: bool,
    open: bool,
) -> anyhow::Result<()> {
    let mut options = GuideOptions::default();
    if let Some(url) = url {
        options.form_url = url;
    }
    if let Some(dir) = screenshots_dir {
        options.screenshots_dir = dir;
    }
    if let Some(output) = output {
        options.output_path = output;
    }
    options.browser.headed = headed;

    let plan = FormPlan::default();
    let data = SampleData::default();

    let report = runtime()?.block_on(generate_guide(&options, &plan, &data))?;

    let blocked: Vec<usize> = report
        .pages
        .iter()
        .filter(|p| p.outcome == AdvanceOutcome::Blocked)
        .map(|p| p.number)
        .collect();
    if !blocked.is_empty() {
        warn!("Pages that never advanced: {:?}", blocked);
    }

    info!(
        "Guide complete: {} pages, {} fields filled",
        report.assembly.page_count, report.fill.applied
    );
    println!("Output: {}", report.assembly.path.display());

    if open {
        open_file(&report.assembly.path)?;
    }

    Ok(())
}

/// Rebuild the guide from screenshots on disk
fn cmd_assemble(
    screenshots_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    open: bool,
) -> anyhow::Result<()> {
    let options = GuideOptions::default();
    let dir = screenshots_dir.unwrap_or_else(|| options.screenshots_dir.clone());
    let output = output.unwrap_or_else(|| options.output_path.clone());

    let report = assemble_from_dir(&options, &FormPlan::default(), &dir, &output)?;
    println!("Output: {} ({} pages)", report.path.display(), report.page_count);

    if open {
        open_file(&report.path)?;
    }

    Ok(())
}

/// Export the slide deck
fn cmd_slides(
    html: Option<PathBuf>,
    output: Option<PathBuf>,
    headed: bool,
    open: bool,
) -> anyhow::Result<()> {
    let mut options = SlideOptions::default();
    if let Some(html) = html {
        options.html_path = html;
    }
    if let Some(output) = output {
        options.output_path = output;
    }
    options.browser.headed = headed;

    let report = runtime()?.block_on(render_slides(&options))?;
    println!("Output: {}", report.path.display());

    if open {
        open_file(&report.path)?;
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> anyhow::Result<()> {
    let metadata = extract_metadata(&input)
        .with_context(|| format!("cannot read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some((w, h)) = metadata.page_size {
        println!("Page size: {:.2} x {:.2} pt ({:.3} x {:.3} in)", w, h, w / 72.0, h / 72.0);
    }
    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }
    if let Some(creator) = metadata.creator {
        println!("Creator: {}", creator);
    }
    if let Some(date) = metadata.creation_date {
        println!("Created: {}", date);
    }
    if !metadata.fonts.is_empty() {
        println!("Fonts: {}", metadata.fonts.join(", "));
    }

    Ok(())
}
