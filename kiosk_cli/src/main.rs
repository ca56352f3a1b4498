#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod cli;
mod detect;
mod error_fmt;

use std::path::Path;

use clap::Parser;
use eyre::{Result, WrapErr};
use kiosk_config::{Config, ConfigStore};
use serde_json::json;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::{Cli, Commands, ConfigAction, FILE_GUARD, JSON_MODE};
use crate::detect::{DetectOpts, DetectReport, failure_name};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    let res = run(cli);
    flush_logs();
    if let Err(err) = res {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn flush_logs() {
    if let Ok(mut slot) = FILE_GUARD.lock() {
        drop(slot.take());
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = ConfigStore::new(&cli.config);

    // `config set` must work even when the stored file is currently invalid
    // for the value being fixed, so it bypasses the initial load.
    if let Commands::Config {
        action: ConfigAction::Set { key, value },
    } = &cli.cmd
    {
        init_tracing(&cli, &Config::default())?;
        store.set(key, value)?;
        tracing::info!(%key, %value, "config updated");
        println!("{key} = {value}");
        return Ok(());
    }

    let mut cfg = store.load()?;
    if let Some(path) = &cli.parcels {
        cfg.parcels = load_parcels(path)?;
    }
    init_tracing(&cli, &cfg)?;

    match cli.cmd {
        Commands::Detect {
            tapped,
            sim,
            auto_continue,
            long_timeout_ms,
            short_timeout_ms,
        } => {
            let opts = DetectOpts {
                tapped,
                sim,
                auto_continue,
                long_timeout_ms,
                short_timeout_ms,
            };
            let ranges = kiosk_core::ranges_from_config(&cfg.parcels);
            let report = detect::run_detect(&cfg, ranges, opts)?;
            print_report(&report, cli.json);
            report.into_result().map(|_| ())
        }
        Commands::Config {
            action: ConfigAction::Show,
        } => {
            let text = toml::to_string_pretty(&cfg).wrap_err("serialize config")?;
            print!("{text}");
            Ok(())
        }
        Commands::Config {
            action: ConfigAction::Set { .. },
        } => Ok(()),
        Commands::SelfCheck => {
            cfg.validate().wrap_err("invalid configuration")?;
            let ranges = kiosk_core::ranges_from_config(&cfg.parcels);
            kiosk_core::DetectionEngine::builder()
                .with_config((&cfg.detection).into())
                .with_ranges(ranges)
                .build()?;
            println!("ok");
            Ok(())
        }
        Commands::Health => {
            if cli.json {
                println!(
                    "{}",
                    json!({
                        "status": "ok",
                        "config": cli.config.display().to_string(),
                        "parcels": cfg.parcels.len(),
                        "weight_endpoint": cfg.endpoints.weight,
                        "classifier_endpoint": cfg.endpoints.detect_parcel,
                    })
                );
            } else {
                println!(
                    "ok: {} parcel ranges, weight={}, classifier={}",
                    cfg.parcels.len(),
                    cfg.endpoints.weight,
                    cfg.endpoints.detect_parcel
                );
            }
            Ok(())
        }
    }
}

fn load_parcels(path: &Path) -> Result<Vec<kiosk_config::ParcelRange>> {
    let ranges = kiosk_config::load_parcel_ranges_csv(path)?;
    tracing::debug!(path = %path.display(), count = ranges.len(), "loaded parcel ranges");
    Ok(ranges)
}

fn print_report(report: &DetectReport, json_mode: bool) {
    let outcome = &report.outcome;
    let weight_kg = outcome.parcel.as_ref().map(|p| p.weight_kg);
    let size = outcome.parcel.as_ref().and_then(|p| p.size.clone());
    if json_mode {
        let line = json!({
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "route": outcome.route.map(|r| r.as_str()),
            "status": outcome.status.as_str(),
            "weight_kg": weight_kg,
            "size": size,
            "item_id": report.item.as_ref().map(|i| i.id.clone()),
            "duration_ms": report.duration_ms,
            "failure": report.failure().map(failure_name),
        });
        println!("{line}");
        return;
    }
    match (size, weight_kg) {
        (Some(size), Some(w)) => println!("Parcel detected: {size} ({w:.2} kg)"),
        (None, Some(w)) => println!("Parcel detected: no size fits ({w:.2} kg)"),
        _ => println!("No parcel detected"),
    }
    if let Some(route) = outcome.route {
        println!("Next screen: {route}");
    } else if report.detected_only() {
        println!("Not accepted; rerun with --auto-continue to move on");
    }
}

fn init_tracing(cli: &Cli, cfg: &Config) -> Result<()> {
    let level = cfg
        .logging
        .level
        .clone()
        .filter(|_| cli.log_level == "info")
        .unwrap_or_else(|| cli.log_level.clone());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .wrap_err_with(|| format!("invalid log level {level:?}"))?;

    // Console logs go to stderr so stdout stays machine-readable.
    let console = if cli.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file = match cfg.logging.file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map_or_else(|| "kiosk.log".into(), |n| n.to_string_lossy().into_owned());
            let appender = match cfg.logging.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            if let Ok(mut slot) = FILE_GUARD.lock() {
                *slot = Some(guard);
            }
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed(),
            )
        }
        None => None,
    };

    // A second init (tests, re-entry) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init();
    Ok(())
}
