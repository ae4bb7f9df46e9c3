//! Symptom intake client.
//!
//! Usage:
//!   symptom-intake <command> [options]
//!
//! Commands:
//!   predict --symptoms=<text> --severity=<level> [--symptom=<label>]... [--feature=<name>=<value>]... [--dashboard]
//!   history                          - Show the results dashboard
//!   clear                            - Delete all stored results
//!   contact --name=<n> --email=<e> --message=<m>
//!   theme [dark|light|toggle]        - Show or change the color theme
//!   ask <question>                   - Ask the built-in assistant

use anyhow::{anyhow, bail, Result};
use std::io::stdout;

use symptom_intake::api::client::HttpBackend;
use symptom_intake::api::types::{IntakeForm, FEATURE_NAMES};
use symptom_intake::assistant;
use symptom_intake::config::Config;
use symptom_intake::dashboard::{DashboardSink, NullSink, TerminalDashboard};
use symptom_intake::history::SystemClock;
use symptom_intake::intake::{describe, submit_contact, submit_intake};
use symptom_intake::logging::{self, obj, v_str, Domain};
use symptom_intake::recorder::Recorder;
use symptom_intake::storage::SqliteStore;
use symptom_intake::theme::{self, Theme};

fn print_usage() {
    eprintln!("Usage: symptom-intake <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  predict --symptoms=<text> --severity=<level> [--symptom=<label>]... [--feature=<name>=<value>]... [--dashboard]");
    eprintln!("  history");
    eprintln!("  clear");
    eprintln!("  contact --name=<name> --email=<email> --message=<message>");
    eprintln!("  theme [dark|light|toggle]");
    eprintln!("  ask <question>");
    eprintln!();
    eprintln!("Features: {}", FEATURE_NAMES.join(", "));
}

fn open_store(cfg: &Config) -> Result<SqliteStore> {
    let mut store = SqliteStore::new(&cfg.db_path)?;
    store.init()?;
    Ok(store)
}

fn parse_form(args: &[String]) -> Result<(IntakeForm, bool)> {
    let mut form = IntakeForm::default();
    let mut show_dashboard = false;
    for arg in args {
        if let Some(v) = arg.strip_prefix("--symptoms=") {
            form.symptom_text = v.to_string();
        } else if let Some(v) = arg.strip_prefix("--severity=") {
            form.severity = v.to_string();
        } else if let Some(v) = arg.strip_prefix("--symptom=") {
            form.common_symptoms.push(v.to_string());
        } else if let Some(v) = arg.strip_prefix("--feature=") {
            let (name, value) = v.split_once('=').ok_or_else(|| anyhow!("expected --feature=<name>=<value>, got {}", arg))?;
            form.features.set(name.trim(), value)?;
        } else if arg == "--dashboard" {
            show_dashboard = true;
        } else {
            bail!("unknown option: {}", arg);
        }
    }
    Ok((form, show_dashboard))
}

fn flag<'a>(args: &'a [String], name: &str) -> &'a str {
    let prefix = format!("--{}=", name);
    args.iter().find_map(|a| a.strip_prefix(prefix.as_str())).unwrap_or("")
}

fn themed_dashboard(store: &SqliteStore) -> TerminalDashboard<std::io::Stdout> {
    TerminalDashboard::new(stdout(), Some(theme::effective_theme(store, Theme::system_default())))
}

async fn cmd_predict(cfg: &Config, args: &[String]) -> Result<()> {
    let (form, show_dashboard) = parse_form(args)?;
    let store = open_store(cfg)?;
    let sink: Box<dyn DashboardSink> = if show_dashboard { Box::new(themed_dashboard(&store)) } else { Box::new(NullSink) };
    let mut recorder = Recorder::new(store, SystemClock, sink).with_chart_limit(cfg.chart_limit);
    let backend = HttpBackend::new(cfg.api_base.clone());

    let result = submit_intake(&backend, &mut recorder, &form)
        .await
        .map_err(|e| anyhow!("Error connecting to backend: {}", e))?;
    println!("{}", describe(&result.prediction));
    Ok(())
}

fn cmd_history(cfg: &Config) -> Result<()> {
    let store = open_store(cfg)?;
    let sink = themed_dashboard(&store);
    let mut recorder = Recorder::new(store, SystemClock, sink).with_chart_limit(cfg.chart_limit);
    recorder.refresh();
    Ok(())
}

fn cmd_clear(cfg: &Config) -> Result<()> {
    let mut recorder = Recorder::new(open_store(cfg)?, SystemClock, NullSink);
    recorder.clear();
    println!("History cleared.");
    Ok(())
}

async fn cmd_contact(cfg: &Config, args: &[String]) -> Result<()> {
    let backend = HttpBackend::new(cfg.api_base.clone());
    submit_contact(&backend, flag(args, "name"), flag(args, "email"), flag(args, "message"))
        .await
        .map_err(|e| anyhow!("Failed to send your message: {}", e))?;
    println!("Message sent successfully! Thank you for contacting us.");
    Ok(())
}

fn cmd_theme(cfg: &Config, args: &[String]) -> Result<()> {
    let mut store = open_store(cfg)?;
    let system = Theme::system_default();
    let current = match args.first().map(String::as_str) {
        None => theme::effective_theme(&store, system),
        Some("toggle") => theme::toggle_theme(&mut store, system),
        Some(raw) => {
            let chosen = Theme::parse(raw).ok_or_else(|| anyhow!("unknown theme: {}", raw))?;
            theme::save_theme(&mut store, chosen);
            chosen
        }
    };
    println!("{}", current.as_str());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let cfg = Config::from_env()?;
    logging::log(
        logging::Level::Debug,
        Domain::System,
        "startup",
        obj(&[("command", v_str(&args[1])), ("api_base", v_str(cfg.api_base.as_str())), ("db_path", v_str(&cfg.db_path))]),
    );

    let rest = &args[2..];
    match args[1].as_str() {
        "predict" => cmd_predict(&cfg, rest).await,
        "history" => cmd_history(&cfg),
        "clear" => cmd_clear(&cfg),
        "contact" => cmd_contact(&cfg, rest).await,
        "theme" => cmd_theme(&cfg, rest),
        "ask" => {
            println!("{}", assistant::reply(&rest.join(" ")));
            Ok(())
        }
        _ => {
            print_usage();
            std::process::exit(1);
        }
    }
}
