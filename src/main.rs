#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{error, info, warn};

mod clipboard;
mod config;
mod error;
mod history;
mod languages;
mod logger;
mod notifier;
mod poll;
mod translator;
mod ui;

use clipboard::SystemClipboard;
use config::Config;
use history::TranslationLog;
use languages::LanguageSelection;
use notifier::DesktopNotifier;
use poll::{NotificationSettings, PollCommand, PollLoop};
use translator::GoogleTranslator;

const APP_NAME: &str = "ClipTrans";

/// Owns the poll loop for the life of the process; ticks run on this thread.
fn run_worker(
    cfg: Config,
    language: LanguageSelection,
    log: TranslationLog,
    commands: UnboundedReceiver<PollCommand>,
) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let translator = GoogleTranslator::new(cfg.translate_endpoint.clone(), cfg.request_timeout())?;
    let clipboard = SystemClipboard::new()?;
    let notifier = DesktopNotifier::new(APP_NAME);
    let notification = NotificationSettings {
        title: cfg.notification_title.clone(),
        timeout: cfg.notification_timeout(),
    };

    let poll = PollLoop::new(clipboard, translator, notifier, log, language, notification);
    rt.block_on(poll::run(poll, commands, cfg.poll_interval()));
    Ok(())
}

/// Block until the worker exits; false if it panicked.
fn wait_for_worker(worker: JoinHandle<()>) -> bool {
    let ok = worker.join().is_ok();
    if !ok {
        error!("poll worker panicked");
    }
    ok
}

fn main() {
    logger::init();
    info!("cliptrans starting");

    let mut cfg = Config::load();
    cfg.apply_overrides(|key| std::env::var(key).ok());
    let language_name = match languages::display_name_for(&cfg.target_lang) {
        Some(name) => name,
        None => {
            let fallback = Config::default().target_lang;
            warn!(configured = %cfg.target_lang, %fallback, "unknown target language");
            languages::display_name_for(&fallback).unwrap_or("english")
        }
    };
    info!(language = language_name, interval_ms = cfg.poll_interval().as_millis() as u64, "config loaded");

    let language = LanguageSelection::new(language_name);
    let log = TranslationLog::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let autostart = cfg.autostart;
    if autostart {
        let _ = tx.send(PollCommand::Start);
    }

    let worker = {
        let language = language.clone();
        let log = log.clone();
        thread::spawn(move || {
            if let Err(e) = run_worker(cfg, language, log, rx) {
                error!(error = %e, "poll worker failed");
            }
        })
    };

    // Held so a headless run keeps the command channel open.
    let keepalive = tx.clone();
    let panel = ui::ControlPanel::new(language, log, tx, autostart);
    match ui::run(panel) {
        Ok(()) => info!("exiting"),
        Err(e) if autostart => {
            warn!(error = %e, "no control panel, continuing headless");
            wait_for_worker(worker);
            drop(keepalive);
        }
        Err(e) => error!(error = %e, "no control panel and autostart is off, exiting"),
    }
}
