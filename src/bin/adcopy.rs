//! CLI binary for adcopy.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `GenerationConfig` and prints results.

use adcopy::{
    generate, generate_bulk_file, resolve_customizer, write_rows_to_file, write_template_to_file,
    AdGroupRequest, AdGroupResult, BatchProgressCallback, GenerationConfig, ProgressCallback,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const SPINNER_TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the batch plus a log line per row.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start time of the row in flight.
    row_started: Mutex<Option<Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(SPINNER_TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading bulk file…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            row_started: Mutex::new(None),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed_secs(&self) -> f64 {
        self.row_started
            .lock()
            .ok()
            .and_then(|mut t| t.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_rows: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} ad groups  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(SPINNER_TICKS);

        self.bar.set_length(total_rows as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Generating");
        self.bar.reset_eta();
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Generating assets for {total_rows} ad groups…"))
        ));
    }

    fn on_row_start(&self, row_num: usize, _total_rows: usize) {
        if let Ok(mut t) = self.row_started.lock() {
            *t = Some(Instant::now());
        }
        self.bar.set_message(format!("row {row_num}"));
    }

    fn on_row_complete(&self, row_num: usize, total_rows: usize, ad_group: &str) {
        let secs = self.elapsed_secs();
        self.bar.println(format!(
            "  {} Row {:>3}/{:<3}  {}  {}",
            green("✓"),
            row_num,
            total_rows,
            ad_group,
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_row_error(&self, row_num: usize, total_rows: usize, error: &str) {
        let secs = self.elapsed_secs();
        self.errors.fetch_add(1, Ordering::SeqCst);

        let msg: String = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Row {:>3}/{:<3}  {}  {}",
            red("✗"),
            row_num,
            total_rows,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_rows: usize, success_count: usize) {
        let failed = total_rows.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} ad groups generated",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} ad groups generated  ({} failed)",
                if failed == total_rows {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_rows,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # One ad group, preview in the terminal
  adcopy single --url https://example.com --category Semaglutide --ad-group "Semaglutide"

  # One ad group, exported to CSV
  adcopy single --url https://example.com --category casino -o casino.csv

  # Bulk run from a CSV or .xlsx (Campaign, Ad Group, Category, URL)
  adcopy bulk rows.csv -o adcopy_bulk.csv

  # Write an example bulk input file
  adcopy template -o bulk_template.csv

  # Use a specific model
  adcopy --provider openai --model gpt-4.1-mini single --url https://example.com

CATEGORY FALLBACKS:
  Category text containing      Fallback headlines
  ─────────────────────────     ──────────────────
  semaglutide, weight           weight-loss hooks
  voip, phone                   business telephony hooks
  casino, gambling              casino hooks
  anything else                 generic direct-response hooks

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (preferred when set)
  OPENAI_API_KEY          OpenAI API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (gemini, openai, anthropic, ollama)
  EDGEQUAKE_MODEL         Override model ID
  RUST_LOG                Log filter, e.g. adcopy=debug
"#;

/// Generate search-ad headlines and descriptions from landing pages.
#[derive(Parser, Debug)]
#[command(
    name = "adcopy",
    version,
    about = "Generate search-ad headlines and descriptions from landing pages",
    long_about = "Scrape a landing page, ask an LLM for responsive search-ad copy, and \
post-process it into 15 headlines (≤30 chars) and 4 descriptions (80–90 chars) ready for \
import. Supports Google Gemini, OpenAI, Anthropic and any provider edgequake-llm knows.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// LLM model ID (e.g. gemini-2.5-pro, gpt-4.1-mini).
    #[arg(long, global = true, env = "ADCOPY_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama.
    #[arg(long, global = true, env = "ADCOPY_PROVIDER")]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, global = true, env = "ADCOPY_TEMPERATURE", default_value_t = 0.5)]
    temperature: f32,

    /// Max LLM output tokens per ad group.
    #[arg(long, global = true, env = "ADCOPY_MAX_TOKENS", default_value_t = 2048)]
    max_tokens: usize,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, global = true, env = "ADCOPY_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Landing-page fetch timeout in seconds.
    #[arg(long, global = true, env = "ADCOPY_FETCH_TIMEOUT", default_value_t = 5)]
    fetch_timeout: u64,

    /// Characters of landing-page text sent to the model.
    #[arg(long, global = true, env = "ADCOPY_CONTEXT_CHARS", default_value_t = 1800)]
    context_chars: usize,

    /// Optional LLM call timeout in seconds.
    #[arg(long, global = true, env = "ADCOPY_API_TIMEOUT")]
    api_timeout: Option<u64>,

    /// Pause between model calls in bulk mode, in milliseconds.
    #[arg(long, global = true, env = "ADCOPY_DELAY_MS", default_value_t = 1500)]
    delay_ms: u64,

    /// Disable progress bar.
    #[arg(long, global = true, env = "ADCOPY_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "ADCOPY_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "ADCOPY_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate assets for one ad group and preview them.
    Single {
        /// Landing page URL.
        #[arg(long)]
        url: String,

        /// Campaign name written to the export.
        #[arg(long, default_value = "Search_Campaign_2026")]
        campaign: String,

        /// Category / offer, e.g. "Semaglutide" or "Business VoIP".
        #[arg(long, default_value = "")]
        category: String,

        /// Ad group name.
        #[arg(long, default_value = "")]
        ad_group: String,

        /// Also write the export row to this CSV file.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full result as JSON instead of the preview.
        #[arg(long)]
        json: bool,
    },

    /// Generate assets for every row of a bulk CSV or spreadsheet.
    Bulk {
        /// CSV or .xlsx with columns Campaign, Ad Group, Category, URL.
        input: PathBuf,

        /// Export CSV path.
        #[arg(short, long, env = "ADCOPY_OUTPUT", default_value = "adcopy_bulk.csv")]
        output: PathBuf,
    },

    /// Write an example bulk input file.
    Template {
        #[arg(short, long, default_value = "bulk_template.csv")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs during bulk runs.
    let is_bulk = matches!(cli.command, Command::Bulk { .. });
    let show_progress = is_bulk && !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Command::Template { output } => {
            write_template_to_file(output).context("Failed to write template")?;
            if !cli.quiet {
                eprintln!("{} Template written to {}", green("✔"), bold(&output.display().to_string()));
            }
        }

        Command::Single {
            url,
            campaign,
            category,
            ad_group,
            output,
            json,
        } => {
            let config = build_config(&cli, None).await?;
            let request = AdGroupRequest {
                campaign: campaign.clone(),
                ad_group: ad_group.clone(),
                category: category.clone(),
                url: url.clone(),
            };

            let result = generate(&request, &config)
                .await
                .context("Generation failed")?;

            if *json {
                let json =
                    serde_json::to_string_pretty(&result).context("Failed to serialise output")?;
                println!("{json}");
            } else if result.error.is_none() {
                print_preview(&result);
            }

            if let Some(err) = &result.error {
                anyhow::bail!("{err}");
            }

            if let Some(path) = output {
                let rows: Vec<_> = result.to_export_row().into_iter().collect();
                write_rows_to_file(path, &rows).context("Failed to write export")?;
                if !cli.quiet {
                    eprintln!("{} Exported to {}", green("✔"), bold(&path.display().to_string()));
                }
            }
        }

        Command::Bulk { input, output } => {
            let progress_cb: Option<ProgressCallback> = if show_progress {
                Some(CliProgressCallback::new() as Arc<dyn BatchProgressCallback>)
            } else {
                None
            };
            let config = build_config(&cli, progress_cb).await?;

            let stats = generate_bulk_file(input, output, &config)
                .await
                .context("Bulk generation failed")?;

            if !cli.quiet {
                eprintln!(
                    "{}  {}/{} rows  {} skipped  {}ms  →  {}",
                    if stats.failed_rows == 0 {
                        green("✔")
                    } else {
                        cyan("⚠")
                    },
                    stats.generated_rows,
                    stats.total_rows,
                    stats.skipped_rows,
                    stats.total_duration_ms,
                    bold(&output.display().to_string()),
                );
                eprintln!(
                    "   {} tokens in  /  {} tokens out",
                    dim(&stats.total_input_tokens.to_string()),
                    dim(&stats.total_output_tokens.to_string()),
                );
            }
        }
    }

    Ok(())
}

/// Show the first headlines (customizer resolved for today) and all descriptions.
fn print_preview(result: &AdGroupResult) {
    let today = chrono::Local::now().date_naive();
    println!("{}", bold(&format!("{} / {}", result.campaign, result.ad_group)));
    println!("{}", dim(&format!("model: {}", result.model)));
    println!();
    for (i, h) in result.assets.headlines.iter().take(3).enumerate() {
        println!("  {}  {}", dim(&format!("H{}", i + 1)), resolve_customizer(h, today));
    }
    println!();
    for (i, d) in result.assets.descriptions.iter().enumerate() {
        println!(
            "  {}  {}  {}",
            dim(&format!("D{}", i + 1)),
            d,
            dim(&format!("({})", d.chars().count()))
        );
    }
    for w in &result.assets.warnings {
        eprintln!("{} {:?}", cyan("⚠"), w);
    }
}

/// Map CLI args to `GenerationConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<GenerationConfig> {
    let system_prompt = if let Some(ref path) = cli.system_prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let mut builder = GenerationConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .fetch_timeout_secs(cli.fetch_timeout)
        .context_char_budget(cli.context_chars)
        .bulk_delay_ms(cli.delay_ms);

    if let Some(secs) = cli.api_timeout {
        builder = builder.api_timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    let mut config = builder.build().context("Invalid configuration")?;
    config.model = cli.model.clone();
    config.provider_name = cli.provider.clone();
    config.system_prompt = system_prompt;

    Ok(config)
}
