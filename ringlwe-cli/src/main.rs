//! ringlwe CLI - Ring-LWE key exchange command-line tool.

use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use rand::rng;
use ringlwe::newhope::encode::{BuildLayout, WireLayout};
use ringlwe::newhope::{
    newhope_simple_types, newhope_types, ExchangeConfig, KeyExchange, NewHope, NewHopeSimple,
    ReconciliationMode,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use zeroize::Zeroizing;

const INITIATOR_MESSAGE_SIZE: usize = NewHope::INITIATOR_MESSAGE_SIZE;
const PRIVATE_KEY_SIZE: usize = ringlwe::newhope::params::newhope::PRIVATE_KEY_SIZE;
const NEWHOPE_RESPONSE_SIZE: usize = NewHope::RESPONDER_MESSAGE_SIZE;
const NEWHOPE_SIMPLE_RESPONSE_SIZE: usize = NewHopeSimple::RESPONDER_MESSAGE_SIZE;
const SHARED_SECRET_SIZE: usize = NewHope::SHARED_SECRET_SIZE;

/// Ring-LWE key exchange CLI tool
#[derive(Parser)]
#[command(name = "ringlwe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an initiator key pair
    Keygen {
        /// Output file prefix (creates `<prefix>.pub` and `<prefix>.sec`)
        #[arg(short, long)]
        output: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "hex")]
        format: OutputFormat,
    },

    /// Answer an initiator message and derive the shared secret
    Respond {
        /// Path to the initiator message
        #[arg(long = "pub")]
        pubkey: PathBuf,

        /// Protocol variant
        #[arg(long, value_enum, default_value = "newhope")]
        variant: Variant,

        /// Use the hardened reconciliation dither
        #[arg(long)]
        hardened: bool,

        /// Output file for the response (writes to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "hex")]
        format: OutputFormat,
    },

    /// Derive the shared secret from a response
    Finish {
        /// Path to the initiator private key
        #[arg(long = "key")]
        key: PathBuf,

        /// Path to the response (reads from stdin if not specified)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output format for the shared secret
        #[arg(short, long, value_enum, default_value = "hex")]
        format: OutputFormat,
    },

    /// Display information about supported variants
    Info,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Run performance benchmarks
    Bench {
        /// Variant to benchmark (defaults to both)
        #[arg(long, value_enum)]
        variant: Option<Variant>,

        /// Use the hardened reconciliation dither
        #[arg(long)]
        hardened: bool,

        /// Number of iterations
        #[arg(short, long, default_value = "1000")]
        iterations: u64,

        /// Output file for results (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        report: ReportFormat,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    /// Human-readable text
    Text,
    /// Markdown table
    Markdown,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Variant {
    /// NewHope with a reconciliation hint
    #[value(name = "newhope")]
    NewHope,
    /// NewHope-Simple with an encrypted message
    #[value(name = "newhope-simple")]
    NewHopeSimple,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::NewHope => write!(f, "NewHope"),
            Variant::NewHopeSimple => write!(f, "NewHope-Simple"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Hexadecimal encoding
    Hex,
    /// Base64 encoding
    Base64,
    /// PEM format
    Pem,
}

fn exchange_config(hardened: bool) -> ExchangeConfig {
    if hardened {
        ExchangeConfig::hardened()
    } else {
        ExchangeConfig::default()
    }
}

/// Encode bytes to the specified format
fn encode_output(data: &[u8], format: OutputFormat, label: &str) -> String {
    match format {
        OutputFormat::Hex => hex::encode(data),
        OutputFormat::Base64 => BASE64.encode(data),
        OutputFormat::Pem => {
            let b64 = BASE64.encode(data);
            let wrapped: String = b64
                .as_bytes()
                .chunks(64)
                .map(String::from_utf8_lossy)
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "-----BEGIN {}-----\n{}\n-----END {}-----",
                label, wrapped, label
            )
        }
    }
}

/// Check if a string is valid hexadecimal
fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Decode bytes with auto-detection of format.
/// Detection order: PEM (by header) -> Hex (if all hex chars) -> Base64.
fn decode_input(data: &str) -> Result<Vec<u8>> {
    let data = data.trim();

    if data.starts_with("-----BEGIN") {
        let lines: Vec<&str> = data.lines().collect();
        if lines.len() < 3 {
            bail!("Invalid PEM format");
        }
        let b64: String = lines[1..lines.len() - 1].join("");
        return BASE64
            .decode(&b64)
            .context("Failed to decode PEM base64 content");
    }

    if is_hex(data) && data.len() % 2 == 0 {
        return hex::decode(data).context("Failed to decode hex");
    }

    BASE64.decode(data).context("Failed to decode base64")
}

fn read_encoded(path: &Path, what: &str) -> Result<Vec<u8>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} from {}", what, path.display()))?;
    decode_input(&data)
}

/// Pick the variant from the size of a response.
fn detect_variant(response_size: usize) -> Result<Variant> {
    match response_size {
        NEWHOPE_RESPONSE_SIZE => Ok(Variant::NewHope),
        NEWHOPE_SIMPLE_RESPONSE_SIZE => Ok(Variant::NewHopeSimple),
        _ => bail!(
            "Unknown response size: {} bytes. Expected {} or {}.",
            response_size,
            NEWHOPE_RESPONSE_SIZE,
            NEWHOPE_SIMPLE_RESPONSE_SIZE
        ),
    }
}

/// Generate an initiator key pair.
///
/// The initiator message is the same for both variants.
fn cmd_keygen(output: &str, format: OutputFormat) -> Result<()> {
    info!("generating initiator key pair");

    let (sk, pk) = NewHope::keygen(&mut rng()).map_err(|e| anyhow!("Key generation failed: {}", e))?;
    let sk_bytes = sk.to_bytes();

    let pk_encoded = encode_output(pk.as_bytes(), format, "NEWHOPE PUBLIC KEY");
    let sk_encoded = Zeroizing::new(encode_output(&sk_bytes[..], format, "NEWHOPE PRIVATE KEY"));

    let pub_path = format!("{}.pub", output);
    let sec_path = format!("{}.sec", output);

    fs::write(&pub_path, &pk_encoded).context("Failed to write public key")?;
    fs::write(&sec_path, sk_encoded.as_bytes()).context("Failed to write private key")?;

    debug!(public = pk.as_bytes().len(), private = sk_bytes.len(), "key sizes");

    println!("Public key written to: {}", pub_path);
    println!("Private key written to: {}", sec_path);

    Ok(())
}

/// Answer an initiator message
fn cmd_respond(
    pubkey: &Path,
    variant: Variant,
    hardened: bool,
    output: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let pk_bytes = read_encoded(pubkey, "public key")?;
    if pk_bytes.len() != INITIATOR_MESSAGE_SIZE {
        bail!(
            "Unknown public key size: {} bytes. Expected {}.",
            pk_bytes.len(),
            INITIATOR_MESSAGE_SIZE
        );
    }

    let config = exchange_config(hardened);
    info!(variant = %variant, mode = config.mode.name(), "responding");

    let (msg_bytes, ss_bytes): (Vec<u8>, Zeroizing<Vec<u8>>) = match variant {
        Variant::NewHope => {
            let pk = newhope_types::PublicKeyAlice::from_bytes(&pk_bytes)
                .map_err(|e| anyhow!("Invalid public key: {}", e))?;
            let (msg, ss) = NewHope::respond(&pk, &config, &mut rng())
                .map_err(|e| anyhow!("Respond failed: {}", e))?;
            (msg.as_bytes().to_vec(), Zeroizing::new(ss.as_ref().to_vec()))
        }
        Variant::NewHopeSimple => {
            if config.mode == ReconciliationMode::Hardened {
                warn!("--hardened has no effect on newhope-simple");
            }
            let pk = newhope_simple_types::PublicKeyAlice::from_bytes(&pk_bytes)
                .map_err(|e| anyhow!("Invalid public key: {}", e))?;
            let (msg, ss) = NewHopeSimple::respond(&pk, &config, &mut rng())
                .map_err(|e| anyhow!("Respond failed: {}", e))?;
            (msg.as_bytes().to_vec(), Zeroizing::new(ss.as_ref().to_vec()))
        }
    };

    let msg_encoded = encode_output(&msg_bytes, format, "NEWHOPE RESPONSE");

    if let Some(out_path) = output {
        fs::write(out_path, &msg_encoded).context("Failed to write response")?;
        debug!(path = %out_path.display(), size = msg_bytes.len(), "response written");
    } else {
        println!("{}", msg_encoded);
    }

    // Keep stdout clean for the response when it is piped
    let ss_encoded = Zeroizing::new(encode_output(&ss_bytes, format, "SHARED SECRET"));
    if output.is_some() {
        println!("Shared secret: {}", ss_encoded.as_str());
    } else {
        eprintln!("Shared secret: {}", ss_encoded.as_str());
    }

    Ok(())
}

/// Derive the shared secret on the initiator side
fn cmd_finish(key: &Path, input: Option<&PathBuf>, format: OutputFormat) -> Result<()> {
    let sk_bytes = Zeroizing::new(read_encoded(key, "private key")?);
    if sk_bytes.len() != PRIVATE_KEY_SIZE {
        bail!(
            "Unknown private key size: {} bytes. Expected {}.",
            sk_bytes.len(),
            PRIVATE_KEY_SIZE
        );
    }

    let msg_data = if let Some(path) = input {
        fs::read_to_string(path).context("Failed to read response file")?
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read response from stdin")?;
        buf
    };
    let msg_bytes = decode_input(&msg_data)?;

    let variant = detect_variant(msg_bytes.len())?;
    info!(variant = %variant, "finishing");

    let ss_bytes: Zeroizing<Vec<u8>> = match variant {
        Variant::NewHope => {
            let sk = newhope_types::PrivateKey::from_bytes(&sk_bytes)
                .map_err(|e| anyhow!("Invalid private key: {}", e))?;
            let msg = newhope_types::PublicKeyBob::from_bytes(&msg_bytes)
                .map_err(|e| anyhow!("Invalid response: {}", e))?;
            let ss = NewHope::finish(sk, &msg).map_err(|e| anyhow!("Finish failed: {}", e))?;
            Zeroizing::new(ss.as_ref().to_vec())
        }
        Variant::NewHopeSimple => {
            let sk = newhope_simple_types::PrivateKey::from_bytes(&sk_bytes)
                .map_err(|e| anyhow!("Invalid private key: {}", e))?;
            let msg = newhope_simple_types::PublicKeyBob::from_bytes(&msg_bytes)
                .map_err(|e| anyhow!("Invalid response: {}", e))?;
            let ss =
                NewHopeSimple::finish(sk, &msg).map_err(|e| anyhow!("Finish failed: {}", e))?;
            Zeroizing::new(ss.as_ref().to_vec())
        }
    };

    let ss_encoded = Zeroizing::new(encode_output(&ss_bytes, format, "SHARED SECRET"));
    println!("{}", ss_encoded.as_str());

    Ok(())
}

fn cmd_info() {
    println!("ringlwe - Ring-LWE Key Exchange");
    println!();
    println!("Ring: Z_12289[X]/(X^1024 + 1), binomial noise k = 16");
    println!(
        "Wire layout: {} ({} bytes per ring element)",
        <BuildLayout as WireLayout>::NAME,
        <BuildLayout as WireLayout>::POLY_BYTES
    );
    println!();
    println!("Variants:");
    println!(
        "    newhope         Reconciliation   A->B: {}B  B->A: {}B  SK: {}B  SS: {}B",
        INITIATOR_MESSAGE_SIZE, NEWHOPE_RESPONSE_SIZE, PRIVATE_KEY_SIZE, SHARED_SECRET_SIZE
    );
    println!(
        "    newhope-simple  Encrypted message A->B: {}B  B->A: {}B  SK: {}B  SS: {}B",
        INITIATOR_MESSAGE_SIZE, NEWHOPE_SIMPLE_RESPONSE_SIZE, PRIVATE_KEY_SIZE, SHARED_SECRET_SIZE
    );
    println!();
    println!("Reconciliation modes (newhope, chosen by the responder):");
    println!("    standard - 1 dither bit per group (default)");
    println!("    hardened - 3 dither bits per group (--hardened)");
    println!();
    println!("Output formats:");
    println!("    hex    - Hexadecimal encoding (default)");
    println!("    base64 - Base64 encoding");
    println!("    pem    - PEM format with headers");
}

/// Generate shell completions
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "ringlwe", &mut io::stdout());
}

// ============================================================================
// Benchmarks
// ============================================================================

/// Timing summary for one operation
struct BenchmarkResult {
    variant: String,
    operation: &'static str,
    iterations: u64,
    mean: Duration,
    median: Duration,
    min: Duration,
}

impl BenchmarkResult {
    fn new(variant: &str, operation: &'static str, times: &mut [Duration]) -> Self {
        times.sort_unstable();
        let total: Duration = times.iter().sum();
        Self {
            variant: variant.to_string(),
            operation,
            iterations: times.len() as u64,
            mean: total / times.len().max(1) as u32,
            median: times.get(times.len() / 2).copied().unwrap_or_default(),
            min: times.first().copied().unwrap_or_default(),
        }
    }

    fn ops_per_sec(&self) -> f64 {
        let secs = self.mean.as_secs_f64();
        if secs > 0.0 {
            1.0 / secs
        } else {
            0.0
        }
    }

    fn format(&self) -> String {
        format!(
            "{:<16} {:<8} mean {:>10.2?}  median {:>10.2?}  min {:>10.2?}  ({:.0} ops/s, n={})",
            self.variant,
            self.operation,
            self.mean,
            self.median,
            self.min,
            self.ops_per_sec(),
            self.iterations
        )
    }
}

fn run_benchmark<F>(iterations: u64, mut f: F) -> Vec<Duration>
where
    F: FnMut(),
{
    // Warmup
    for _ in 0..10 {
        f();
    }

    let mut times = Vec::with_capacity(iterations as usize);
    for _ in 0..iterations {
        let start = Instant::now();
        f();
        times.push(start.elapsed());
    }
    times
}

/// Generic benchmark for one variant
fn bench_variant<K>(name: &str, config: &K::Config, iterations: u64) -> Result<Vec<BenchmarkResult>>
where
    K: KeyExchange,
{
    let mut results = Vec::new();

    {
        let mut bench_rng = rng();
        let mut times = run_benchmark(iterations, || {
            let _ = K::keygen(&mut bench_rng);
        });
        results.push(BenchmarkResult::new(name, "keygen", &mut times));
    }

    let (_, pk) = K::keygen(&mut rng()).map_err(|e| anyhow!("Key generation failed: {}", e))?;
    {
        let mut bench_rng = rng();
        let mut times = run_benchmark(iterations, || {
            let _ = K::respond(&pk, config, &mut bench_rng);
        });
        results.push(BenchmarkResult::new(name, "respond", &mut times));
    }

    // finish consumes the key, so each run gets a fresh one outside the timer
    {
        let mut setup_rng = rng();
        let mut times = Vec::with_capacity(iterations as usize);
        for _ in 0..iterations {
            let (sk, pk) =
                K::keygen(&mut setup_rng).map_err(|e| anyhow!("Key generation failed: {}", e))?;
            let (msg, _) = K::respond(&pk, config, &mut setup_rng)
                .map_err(|e| anyhow!("Respond failed: {}", e))?;
            let start = Instant::now();
            let _ = K::finish(sk, &msg);
            times.push(start.elapsed());
        }
        results.push(BenchmarkResult::new(name, "finish", &mut times));
    }

    Ok(results)
}

fn to_markdown(results: &[BenchmarkResult]) -> String {
    let mut md = String::new();
    md.push_str("| Variant | Operation | Mean | Median | Min | Ops/sec |\n");
    md.push_str("|---------|-----------|------|--------|-----|---------|\n");
    for r in results {
        md.push_str(&format!(
            "| {} | {} | {:.2?} | {:.2?} | {:.2?} | {:.0} |\n",
            r.variant,
            r.operation,
            r.mean,
            r.median,
            r.min,
            r.ops_per_sec()
        ));
    }
    md
}

fn cmd_bench(
    variant: Option<Variant>,
    hardened: bool,
    iterations: u64,
    output: Option<&PathBuf>,
    report_format: ReportFormat,
) -> Result<()> {
    if iterations == 0 {
        bail!("Iterations must be at least 1");
    }

    let config = exchange_config(hardened);
    info!(iterations, mode = config.mode.name(), "running benchmarks");

    let variants = match variant {
        Some(v) => vec![v],
        None => vec![Variant::NewHope, Variant::NewHopeSimple],
    };

    let mut results = Vec::new();
    for v in &variants {
        debug!(variant = %v, "benchmarking");
        let name = v.to_string();
        let r = match v {
            Variant::NewHope => bench_variant::<NewHope>(&name, &config, iterations)?,
            Variant::NewHopeSimple => bench_variant::<NewHopeSimple>(&name, &config, iterations)?,
        };
        results.extend(r);
    }

    let output_content = match report_format {
        ReportFormat::Text => {
            let mut text = String::new();
            text.push_str("ringlwe Benchmark Results\n");
            text.push_str("=========================\n\n");
            for result in &results {
                text.push_str(&result.format());
                text.push('\n');
            }
            text
        }
        ReportFormat::Markdown => to_markdown(&results),
    };

    if let Some(out_path) = output {
        fs::write(out_path, &output_content).context("Failed to write benchmark report")?;
        println!("Benchmark report written to: {}", out_path.display());
    } else {
        println!("{}", output_content);
    }

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match cli.command {
        Commands::Keygen { output, format } => cmd_keygen(&output, format),

        Commands::Respond {
            pubkey,
            variant,
            hardened,
            output,
            format,
        } => cmd_respond(&pubkey, variant, hardened, output.as_ref(), format),

        Commands::Finish { key, input, format } => cmd_finish(&key, input.as_ref(), format),

        Commands::Info => {
            cmd_info();
            Ok(())
        }

        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }

        Commands::Bench {
            variant,
            hardened,
            iterations,
            output,
            report,
        } => cmd_bench(variant, hardened, iterations, output.as_ref(), report),
    }
}
