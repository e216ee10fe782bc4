//! Entry point for the jetmon dashboard. Parses args, resolves the profile and runs the App.

use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use tracing::info;

use jetmon::app::App;
use jetmon::http::{metrics_url, HttpSource};
use jetmon::logging;
use jetmon::poller::PollInterval;
use jetmon::profiles::{load_profiles, save_profiles, ProfileEntry, ProfileRequest, ResolveProfile};
use jetmon::session::Session;

const USAGE_ARGS: &str = "[--tls-ca CERT_PEM|-t CERT_PEM] [--profile NAME|-P NAME] [--save] [--interval SECS|-i SECS] [--dry-run] [http://HOST:PORT]";

struct ParsedArgs {
    url: Option<String>,
    tls_ca: Option<String>,
    profile: Option<String>,
    interval: Option<u64>,
    save: bool,
    dry_run: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<ParsedArgs, String> {
    let mut it = args.into_iter();
    let prog = it.next().unwrap_or_else(|| "jetmon".into());
    let mut url: Option<String> = None;
    let mut tls_ca: Option<String> = None;
    let mut profile: Option<String> = None;
    let mut interval: Option<u64> = None;
    let mut save = false; // --save
    let mut dry_run = false; // --dry-run

    let parse_interval = |v: &str| -> Result<u64, String> {
        PollInterval::parse(v)
            .map(PollInterval::secs)
            .map_err(|e| e.to_string())
    };

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                return Err(format!("Usage: {prog} {USAGE_ARGS}"));
            }
            "--tls-ca" | "-t" => {
                tls_ca = it.next();
            }
            "--profile" | "-P" => {
                profile = it.next();
            }
            "--interval" | "-i" => {
                let v = it.next().ok_or_else(|| "missing value for --interval".to_string())?;
                interval = Some(parse_interval(&v)?);
            }
            "--save" => {
                save = true;
            }
            "--dry-run" => {
                dry_run = true;
            }
            _ if arg.starts_with("--tls-ca=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        tls_ca = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--profile=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    if !v.is_empty() {
                        profile = Some(v.to_string());
                    }
                }
            }
            _ if arg.starts_with("--interval=") => {
                if let Some((_, v)) = arg.split_once('=') {
                    interval = Some(parse_interval(v)?);
                }
            }
            _ => {
                if url.is_none() {
                    url = Some(arg);
                } else {
                    return Err(format!("Unexpected argument. Usage: {prog} {USAGE_ARGS}"));
                }
            }
        }
    }
    Ok(ParsedArgs {
        url,
        tls_ca,
        profile,
        interval,
        save,
        dry_run,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = match parse_args(env::args()) {
        Ok(v) => v,
        Err(msg) => {
            eprintln!("{msg}");
            if msg.starts_with("Usage:") {
                return Ok(());
            }
            std::process::exit(2);
        }
    };

    let profiles_file = load_profiles();
    let req = ProfileRequest {
        profile_name: parsed.profile.clone(),
        url: parsed.url.clone(),
        tls_ca: parsed.tls_ca.clone(),
        interval_secs: parsed.interval,
    };

    // Determine final connection parameters (and maybe mutated profiles to persist)
    let mut profiles_mut = profiles_file.clone();
    let entry = match req.resolve(&profiles_file) {
        ResolveProfile::Direct(entry) => {
            if let Some(name) = parsed.profile.as_ref() {
                match profiles_mut.profiles.get(name) {
                    None => {
                        // New profile: auto-save immediately
                        profiles_mut.profiles.insert(name.clone(), entry.clone());
                        let _ = save_profiles(&profiles_mut);
                    }
                    Some(existing) if *existing != entry => {
                        let overwrite = parsed.save
                            || (!parsed.dry_run
                                && prompt_yes_no(&format!(
                                    "Overwrite existing profile '{name}'? [y/N]: "
                                )));
                        if overwrite {
                            profiles_mut.profiles.insert(name.clone(), entry.clone());
                            let _ = save_profiles(&profiles_mut);
                        }
                    }
                    Some(_) => {}
                }
            }
            entry
        }
        ResolveProfile::Loaded(entry) => entry,
        ResolveProfile::PromptSelect(names) => {
            eprintln!("Select profile:");
            for (i, n) in names.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, n);
            }
            let line = prompt_string("Enter number (or blank to abort): ")?;
            let picked = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| idx.checked_sub(1))
                .and_then(|idx| names.get(idx))
                .and_then(|name| profiles_mut.profiles.get(name));
            match picked {
                Some(entry) => entry.clone(),
                None => return Ok(()),
            }
        }
        ResolveProfile::PromptCreate(name) => {
            eprintln!("Profile '{name}' does not exist yet.");
            let url = prompt_string("Enter URL (http://HOST:PORT or https://...): ")?;
            if url.trim().is_empty() {
                return Ok(());
            }
            let ca = prompt_string("Enter TLS CA path (or leave blank): ")?;
            let entry = ProfileEntry {
                url: url.trim().to_string(),
                tls_ca: Some(ca.trim().to_string()).filter(|s| !s.is_empty()),
                interval_secs: parsed.interval,
            };
            profiles_mut.profiles.insert(name, entry.clone());
            let _ = save_profiles(&profiles_mut);
            entry
        }
        ResolveProfile::None => {
            eprintln!("No URL provided and no profiles to select.");
            return Ok(());
        }
    };

    let url = metrics_url(&entry.url)?;
    let interval = match entry.interval_secs {
        Some(secs) => PollInterval::from_secs(secs)?,
        None => PollInterval::default(),
    };

    if parsed.dry_run {
        println!(
            "jetmon would poll {url} every {}s{}",
            interval.secs(),
            entry
                .tls_ca
                .as_deref()
                .map(|ca| format!(" (CA: {ca})"))
                .unwrap_or_default()
        );
        return Ok(());
    }

    if let Some(path) = logging::init()? {
        eprintln!("logging to {}", path.display());
    }
    let source = Arc::new(HttpSource::new(url, entry.tls_ca.as_deref())?);
    info!(url = %source.url(), secs = interval.secs(), "starting dashboard");
    let mut app = App::new(Session::new(interval));
    app.run(source).await
}

fn prompt_yes_no(prompt: &str) -> bool {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_ok() {
        matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

fn prompt_string(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    let _ = io::stderr().flush();
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
