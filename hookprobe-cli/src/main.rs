//! hookprobe: manual test client for the Rounded webhook route
//!
//! Sends the sample `call.transcript.ready` event once and prints what the
//! endpoint answered:
//!
//! ```text
//! Status Code: 200
//! Response: ok
//! ```
//!
//! A transport failure prints a single `Error: <description>` line. The exit
//! code stays 0 either way unless `--strict` is given.

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use hookprobe_core::{run_probe, CallTranscriptEvent, ProbeConfig, ProbeOutcome, WebhookProber};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_CONFIG: &str = "hookprobe.toml";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "hookprobe",
    version,
    about = "Send a sample Rounded call.transcript.ready webhook and report the response"
)]
struct Cli {
    /// Optional TOML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    config: String,

    /// Webhook URL (overrides config)
    #[arg(long, env = "HOOKPROBE_URL")]
    url: Option<String>,

    /// Value for the x-rounded-signature header (overrides config)
    #[arg(long, env = "HOOKPROBE_SIGNATURE")]
    signature: Option<String>,

    /// Request timeout in seconds, 0 for none (overrides config)
    #[arg(long)]
    timeout: Option<u64>,

    /// Exit with status 1 when the request could not be delivered
    #[arg(long)]
    strict: bool,

    /// Print the JSON body instead of sending it
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Flags win over file and environment configuration.
    fn apply_overrides(&self, config: &mut ProbeConfig) {
        if let Some(url) = &self.url {
            config.target.url = url.clone();
        }
        if let Some(signature) = &self.signature {
            config.target.signature = signature.clone();
        }
        if let Some(timeout) = self.timeout {
            config.http.timeout_seconds = timeout;
        }
    }
}

fn exit_code(outcome: &ProbeOutcome, strict: bool) -> i32 {
    if strict && outcome.is_failure() {
        1
    } else {
        0
    }
}

// ============================================================================
// Commands
// ============================================================================

fn print_payload<W: Write>(event: &CallTranscriptEvent, out: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, event)?;
    writeln!(out)?;
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let mut config = ProbeConfig::load(&cli.config)
        .with_context(|| format!("failed to load config from {}", cli.config))?;
    cli.apply_overrides(&mut config);
    tracing::debug!(?config, "Resolved configuration");

    let event = CallTranscriptEvent::sample();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.dry_run {
        print_payload(&event, &mut out)?;
        return Ok(0);
    }

    let prober = WebhookProber::new(&config.target, &config.http)?;
    let outcome = run_probe(&prober, &event, &mut out)?;

    Ok(exit_code(&outcome, cli.strict))
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the report.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("hookprobe: {:#}", e);
            1
        }
    };

    std::process::exit(code);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hookprobe_core::config::DEFAULT_URL;
    use hookprobe_core::ProbeResponse;
    use std::sync::{Mutex, MutexGuard};

    // Tests that set HOOKPROBE_* variables hold ENV_LOCK.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: [&str; 4] = [
        "HOOKPROBE_URL",
        "HOOKPROBE_SIGNATURE",
        "HOOKPROBE_TARGET__URL",
        "HOOKPROBE_HTTP__TIMEOUT_SECONDS",
    ];

    fn lock_env() -> MutexGuard<'static, ()> {
        let guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        guard
    }

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["hookprobe"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("args should parse")
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = parse(&[]);
        assert_eq!(cli.config, DEFAULT_CONFIG);
        assert!(!cli.strict);
        assert!(!cli.dry_run);
        assert!(cli.timeout.is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = parse(&[
            "--url",
            "http://localhost:3000/api/webhooks/rounded",
            "--signature",
            "sig-123",
            "--timeout",
            "0",
        ]);
        let mut config = ProbeConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.target.url, "http://localhost:3000/api/webhooks/rounded");
        assert_eq!(config.target.signature, "sig-123");
        assert_eq!(config.http.timeout(), None);
    }

    #[test]
    fn test_env_fills_flags_and_flags_win() {
        let _guard = lock_env();
        std::env::set_var("HOOKPROBE_URL", "http://env.example/hook");
        std::env::set_var("HOOKPROBE_SIGNATURE", "env-signature");

        let from_env = parse(&[]);
        let from_flag = parse(&["--url", "http://flag.example/hook"]);
        clear_env();

        assert_eq!(from_env.url.as_deref(), Some("http://env.example/hook"));
        assert_eq!(from_env.signature.as_deref(), Some("env-signature"));
        assert_eq!(from_flag.url.as_deref(), Some("http://flag.example/hook"));
        assert_eq!(from_flag.signature.as_deref(), Some("env-signature"));
    }

    #[test]
    fn test_layering_defaults_file_env_flags() {
        let _guard = lock_env();
        let path = std::env::temp_dir().join(format!("hookprobe-cli-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[target]\nurl = \"http://file.example/hook\"\nsignature = \"file-signature\"\n\
             [http]\ntimeout_seconds = 7\n",
        )
        .unwrap();
        std::env::set_var("HOOKPROBE_TARGET__URL", "http://env.example/hook");
        std::env::set_var("HOOKPROBE_HTTP__TIMEOUT_SECONDS", "12");
        std::env::set_var("HOOKPROBE_SIGNATURE", "env-signature");

        let path_arg = path.to_str().unwrap().to_string();
        let cli = parse(&["--config", &path_arg, "--url", "http://flag.example/hook"]);
        let loaded = ProbeConfig::load(&cli.config);
        clear_env();
        std::fs::remove_file(&path).ok();

        let mut config = loaded.unwrap();
        assert_eq!(config.target.url, "http://env.example/hook");
        assert_eq!(config.http.timeout_seconds, 12);
        assert_eq!(config.target.signature, "file-signature");

        cli.apply_overrides(&mut config);
        assert_eq!(config.target.url, "http://flag.example/hook");
        assert_eq!(config.target.signature, "env-signature");
        assert_eq!(config.http.timeout_seconds, 12);
    }

    #[test]
    fn test_no_flags_leave_config_untouched() {
        let cli = Cli {
            config: DEFAULT_CONFIG.to_string(),
            url: None,
            signature: None,
            timeout: None,
            strict: false,
            dry_run: false,
        };
        let mut config = ProbeConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config, ProbeConfig::default());
        assert_eq!(config.target.url, DEFAULT_URL);
    }

    #[test]
    fn test_failure_exits_zero_unless_strict() {
        let failed = ProbeOutcome::Failed("connection refused".to_string());
        assert_eq!(exit_code(&failed, false), 0);
        assert_eq!(exit_code(&failed, true), 1);
    }

    #[test]
    fn test_delivered_exits_zero_even_when_strict() {
        let delivered = ProbeOutcome::Delivered(ProbeResponse {
            status: 500,
            body: "boom".to_string(),
        });
        assert_eq!(exit_code(&delivered, true), 0);
    }

    #[test]
    fn test_dry_run_prints_sample_payload() {
        let mut out = Vec::new();
        print_payload(&CallTranscriptEvent::sample(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["type"], "call.transcript.ready");
        assert_eq!(parsed["direction"], "inbound");
        assert!(text.ends_with('\n'));
    }
}
