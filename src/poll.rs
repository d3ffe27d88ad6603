//! The clipboard poll loop.
//!
//! [`PollLoop`] is a two-state machine (idle / active) driven by a fixed
//! cadence timer. While active, every tick compares the clipboard against the
//! last value it saw; a difference runs one poll cycle: translate, notify,
//! append to the history. [`run`] drives it from a tokio interval and applies
//! start/stop commands between ticks, so ticks never overlap.

use crate::clipboard::ClipboardReader;
use crate::history::{TranslationLog, TranslationRecord};
use crate::languages::LanguageSelection;
use crate::notifier::{notification_text, NotificationSink};
use crate::translator::Translator;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollCommand {
    Start,
    Stop,
}

#[derive(Debug, Clone)]
pub struct NotificationSettings {
    pub title: String,
    pub timeout: Duration,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            title: "Translation".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Unchanged,
    ClipboardUnavailable,
    Translated(TranslationRecord),
}

pub struct PollLoop<C, T, N> {
    clipboard: C,
    translator: T,
    notifier: N,
    log: TranslationLog,
    language: LanguageSelection,
    notification: NotificationSettings,
    running: bool,
    last_seen: String,
}

impl<C, T, N> PollLoop<C, T, N>
where
    C: ClipboardReader,
    T: Translator,
    N: NotificationSink,
{
    pub fn new(
        clipboard: C,
        translator: T,
        notifier: N,
        log: TranslationLog,
        language: LanguageSelection,
        notification: NotificationSettings,
    ) -> Self {
        Self {
            clipboard,
            translator,
            notifier,
            log,
            language,
            notification,
            running: false,
            last_seen: String::new(),
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            info!("clipboard polling started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            info!("clipboard polling stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_seen(&self) -> &str {
        &self.last_seen
    }

    /// One timer tick. A no-op unless running and the clipboard changed.
    pub async fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        let current = match self.clipboard.read_text() {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "skipping tick");
                return TickOutcome::ClipboardUnavailable;
            }
        };
        if current == self.last_seen {
            return TickOutcome::Unchanged;
        }
        self.last_seen.clone_from(&current);

        let target = self.language.get();
        debug!(chars = current.chars().count(), language = %target, "clipboard changed");

        let translated = match self.translator.translate(&current, &target).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, language = %target, "translation failed");
                format!("translation error: {e}")
            }
        };

        let message = notification_text(&translated);
        if let Err(e) = self.notifier.notify(
            &self.notification.title,
            &message,
            self.notification.timeout,
        ) {
            warn!(error = %e, "notification not shown");
        }

        let record = TranslationRecord::new(current, translated, target);
        self.log.append(record.clone());
        TickOutcome::Translated(record)
    }
}

/// Drive `poll` every `period` until the command channel closes.
///
/// Each tick is awaited in full before the next can fire; ticks that fall due
/// meanwhile are skipped rather than queued. Pending commands always win over
/// a due tick.
pub async fn run<C, T, N>(
    mut poll: PollLoop<C, T, N>,
    mut commands: UnboundedReceiver<PollCommand>,
    period: Duration,
) where
    C: ClipboardReader,
    T: Translator,
    N: NotificationSink,
{
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(period_ms = period.as_millis() as u64, "poll loop running");

    loop {
        // Commands queued while a tick was running apply before the next tick.
        tokio::select! {
            biased;
            command = commands.recv() => match command {
                Some(PollCommand::Start) => poll.start(),
                Some(PollCommand::Stop) => poll.stop(),
                None => break,
            },
            _ = ticker.tick() => {
                poll.tick().await;
            }
        }
    }
    info!("command channel closed, poll loop exiting");
}
