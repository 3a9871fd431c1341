use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use secrecy::SecretString;
use serde::Serialize;
use svc_pwd_policy::{Denylist, PolicyRegistry, ValidationReport, ValidationRequest};

#[derive(Parser, Debug)]
#[command(name = "pwd-policy", version, about = "Check a password against a service's password policy")]
struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[arg(long, global = true, help = "TOML policy file (overrides PWD_POLICY_PATH)")]
    policies: Option<PathBuf>,
    #[arg(long, global = true, help = "Extra denylist file (overrides PWD_DENYLIST_PATH)")]
    denylist: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Log progress to stderr")]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the known services
    List,
    /// Check a password read from stdin
    Check {
        #[arg(long, help = "Service number (as shown by `list`) or name")]
        policy: String,
        #[arg(long)]
        login: Option<String>,
        #[arg(long, default_value_t = false)]
        skip_login_check: bool,
    },
}

#[derive(Serialize)]
struct JsonOut<T: Serialize> {
    ok: bool,
    data: T,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_registry(cli: &Cli) -> Result<PolicyRegistry> {
    let registry = match &cli.policies {
        Some(path) => PolicyRegistry::from_path(path)?,
        None => PolicyRegistry::load()?,
    };
    let denylist = match &cli.denylist {
        Some(path) => Denylist::from_path(path)?,
        None => Denylist::load()?,
    };
    Ok(registry.with_denylist(denylist))
}

fn run(cli: Cli) -> Result<ExitCode> {
    let registry = load_registry(&cli)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();

    match cli.command {
        Some(Commands::List) => {
            let entries = registry.entries();
            if cli.json {
                print_json(&entries)?;
            } else {
                for e in &entries {
                    println!("{}. {}", e.index + 1, e.name);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Check {
            policy,
            login,
            skip_login_check,
        }) => {
            let index = resolve_policy(&registry, &policy)?;
            let password = read_line(&mut input)?.context("no password on stdin")?;
            check(&registry, index, password, login.as_deref(), skip_login_check, cli.json)
        }
        None => interactive(&registry, &mut input, cli.json),
    }
}

/// Accepts a 1-based menu number or a service name.
fn resolve_policy(registry: &PolicyRegistry, selector: &str) -> Result<usize> {
    if let Ok(number) = selector.trim().parse::<usize>() {
        if number == 0 || number > registry.len() {
            bail!("invalid choice {number}: pick 1..={}", registry.len());
        }
        return Ok(number - 1);
    }
    registry
        .find(selector)
        .map(|(index, _)| index)
        .with_context(|| format!("unknown service '{selector}'"))
}

fn interactive(registry: &PolicyRegistry, input: &mut impl BufRead, json: bool) -> Result<ExitCode> {
    println!("Choose a service to check the password against:");
    for e in registry.entries() {
        println!("{}. {}", e.index + 1, e.name);
    }
    let choice = prompt(input, "> ")?.context("no choice given")?;
    let index = resolve_policy(registry, &choice)?;

    let login = if registry.get(index)?.check_login_similarity {
        prompt(input, "Enter your login (for the similarity check): ")?
    } else {
        None
    };
    let password = prompt(input, "Enter password: ")?.context("no password given")?;

    check(registry, index, password, login.as_deref(), false, json)
}

fn check(
    registry: &PolicyRegistry,
    index: usize,
    password: String,
    login: Option<&str>,
    skip_login_check: bool,
    json: bool,
) -> Result<ExitCode> {
    let password = SecretString::new(password.into());
    let mut request = ValidationRequest::new(&password);
    if let Some(login) = login {
        request = request.with_login(login);
    }
    if skip_login_check {
        request = request.skip_login_check();
    }

    tracing::debug!(policy = %registry.get(index)?.name, "checking password");
    let report = registry.validate(index, &request)?;
    if json {
        print_json(&report)?;
    } else {
        render(&report);
    }

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn render(report: &ValidationReport<'_>) {
    println!();
    println!("Checking password for \"{}\"", report.policy_name());
    for f in report.graded().chain(report.informational()) {
        println!("{} {}", if f.passed { "+" } else { "-" }, f.message);
    }

    println!();
    if report.passed() {
        println!("✅ The password meets this service's requirements.");
    } else {
        println!("❌ The password does NOT meet this service's requirements!");
    }

    println!();
    println!("ℹ️  Security policy of {}:", report.policy_name());
    println!("{}", report.notes());
    if report.check_compromised() {
        println!("The service checks passwords against leaked-password databases.");
    }
    println!();
    println!("Recommendations:");
    for r in report.recommendations() {
        println!("- {r}");
    }

    if let Some(mfa) = report.mfa_guidance() {
        println!();
        println!("🔒 {}", mfa.message());
    }
}

fn print_json<T: Serialize>(data: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&JsonOut { ok: true, data })?);
    Ok(())
}

fn prompt(input: &mut impl BufRead, label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    read_line(input)
}

/// One line without its line terminator; `None` at end of input.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}
