#![deny(missing_docs)]

//! # Generate Command
//!
//! Loads a spec, shows the expected cost, generates docs for every endpoint
//! and writes the rendered result.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use apidoc_core::generation::orchestrator::DEFAULT_MAX_TOKENS;
use apidoc_core::generation::{
    format_cost, preflight_estimate, GenerationClient, CREDENTIAL_ENV, DEFAULT_MODEL,
};
use apidoc_core::{
    load_spec, render, AppError, AppResult, Generator, GeneratorConfig, OutputFormat,
    PricingTable, Specification,
};
use tracing::{debug, info};

use crate::anthropic::DEFAULT_BASE_URL;
#[cfg(feature = "client")]
use crate::anthropic::AnthropicClient;
use crate::error::CliResult;
#[cfg(not(feature = "client"))]
use crate::error::CliError;

/// Default output location.
pub const DEFAULT_OUTPUT: &str = "output/docs.md";

/// Rendered document format.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    /// Markdown document.
    Markdown,
    /// Standalone HTML page.
    Html,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Html => OutputFormat::Html,
        }
    }
}

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the OpenAPI spec file (JSON or YAML).
    pub spec: PathBuf,

    /// Output file path.
    #[clap(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Output format.
    #[clap(short, long, value_enum, default_value_t = FormatArg::Markdown)]
    pub format: FormatArg,

    /// Model used for generation.
    #[clap(short, long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Stream generated text to the terminal as it arrives.
    #[clap(long)]
    pub stream: bool,

    /// Upper bound on generated tokens per request.
    #[clap(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Skip the cost confirmation prompt.
    #[clap(short = 'y', long)]
    pub yes: bool,

    /// Service credential.
    #[clap(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Service root URL.
    #[clap(long, env = "ANTHROPIC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

/// Returns the credential, or a configuration error naming the variable.
pub fn require_api_key(value: Option<&str>) -> AppResult<&str> {
    match value.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(AppError::Configuration(format!(
            "{} is not set. Add it to your .env file or export it as an environment variable.",
            CREDENTIAL_ENV
        ))),
    }
}

/// Executes the generate command against the live service.
#[cfg(feature = "client")]
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    let api_key = require_api_key(args.api_key.as_deref())?;
    let spec = load_spec(&args.spec)?;

    let mut client = AnthropicClient::new(api_key, &args.base_url);
    if args.stream {
        client = client.with_delta_sink(Box::new(|text| {
            print!("{}", text);
            let _ = io::stdout().flush();
        }));
    }
    debug!("Generation endpoint: {}", client.endpoint());

    let stdin = io::stdin();
    run(args, &spec, client, &mut stdin.lock(), &mut io::stdout())?;
    Ok(())
}

/// Without the HTTP client there is nothing to generate with.
#[cfg(not(feature = "client"))]
pub fn execute(args: &GenerateArgs) -> CliResult<()> {
    require_api_key(args.api_key.as_deref())?;
    Err(CliError::General(
        "apidoc was built without the `client` feature".to_string(),
    ))
}

/// Runs the command body with injected client and terminal streams.
///
/// Returns `false` if the user declined at the confirmation prompt.
pub fn run<C: GenerationClient>(
    args: &GenerateArgs,
    spec: &Specification,
    client: C,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> CliResult<bool> {
    writeln!(
        out,
        "{} v{} - {} endpoints found",
        spec.title,
        spec.version,
        spec.endpoints.len()
    )?;

    let pricing = PricingTable::default();
    if pricing.lookup(&args.model).is_err() {
        let known: Vec<&str> = pricing.models().collect();
        writeln!(out, "Known models: {}", known.join(", "))?;
    }
    let estimate = preflight_estimate(spec, &args.model, &pricing)?;
    writeln!(
        out,
        "Estimated cost: ~{} (~{} tokens)",
        format_cost(estimate.cost_usd),
        group_thousands(estimate.total_tokens())
    )?;

    if !args.yes && !confirm(input, out)? {
        writeln!(out, "Aborted.")?;
        return Ok(false);
    }

    let start = Instant::now();
    let config = GeneratorConfig {
        model: args.model.clone(),
        stream: args.stream,
        max_tokens: args.max_tokens,
    };
    let generator = Generator::new(client, config).with_pricing(pricing);

    let overview = generator.generate_overview(spec)?;
    let result = generator.generate_full_docs(spec)?;
    let rendered = render(&result, &overview, args.format.into());

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.output, rendered)?;
    info!("Wrote {}", args.output.display());

    writeln!(out, "\nDone! Output written to: {}", args.output.display())?;
    writeln!(
        out,
        "  Tokens: {}  |  Cost: {}  |  Time: {:.1}s",
        group_thousands(result.total_tokens),
        format_cost(result.total_cost_usd),
        start.elapsed().as_secs_f64()
    )?;

    Ok(true)
}

fn confirm(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    write!(out, "Proceed? [y/N]: ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Formats a count with `,` thousands separators.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
