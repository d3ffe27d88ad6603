use std::time::Duration;
use tracing::debug;

/// Longest message handed to the platform, in characters.
pub const NOTIFICATION_LIMIT: usize = 256;
const ELLIPSIS: &str = "...";

/// A place to show short messages outside the application window.
///
/// Best effort: an `Err` only means the platform refused the message.
pub trait NotificationSink {
    fn notify(&self, title: &str, message: &str, timeout: Duration) -> anyhow::Result<()>;
}

/// Cut `text` down to [`NOTIFICATION_LIMIT`] characters, marking the cut.
pub fn notification_text(text: &str) -> String {
    if text.chars().count() <= NOTIFICATION_LIMIT {
        return text.to_string();
    }
    let keep = NOTIFICATION_LIMIT - ELLIPSIS.chars().count();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Native desktop notifications: WinRT toasts on Windows, the freedesktop /
/// macOS notification service elsewhere.
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl NotificationSink for DesktopNotifier {
    #[cfg(windows)]
    fn notify(&self, title: &str, message: &str, timeout: Duration) -> anyhow::Result<()> {
        use winrt_notification::{Duration as ToastDuration, Toast};

        debug!(title, chars = message.chars().count(), "showing toast");
        // Toasts only know two lengths; "short" is about seven seconds.
        let duration = if timeout > Duration::from_secs(7) {
            ToastDuration::Long
        } else {
            ToastDuration::Short
        };
        Toast::new(&self.app_name)
            .title(title)
            .text1(message)
            .duration(duration)
            .show()
            .map_err(|e| anyhow::anyhow!("toast failed: {e:?}"))
    }

    #[cfg(not(windows))]
    fn notify(&self, title: &str, message: &str, timeout: Duration) -> anyhow::Result<()> {
        use notify_rust::{Notification, Timeout};

        debug!(title, chars = message.chars().count(), "showing notification");
        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        Notification::new()
            .appname(&self.app_name)
            .summary(title)
            .body(message)
            .timeout(Timeout::Milliseconds(millis))
            .show()
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("notification failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(notification_text(""), "");
        assert_eq!(notification_text("bonjour"), "bonjour");

        let exact = "x".repeat(NOTIFICATION_LIMIT);
        assert_eq!(notification_text(&exact), exact);
    }

    #[test]
    fn long_text_is_cut_to_limit() {
        let long = "abcdefghij".repeat(30);
        let out = notification_text(&long);
        assert_eq!(out.chars().count(), NOTIFICATION_LIMIT);
        assert!(out.ends_with("..."));
        assert_eq!(&out[..253], &long[..253]);

        let just_over = "y".repeat(NOTIFICATION_LIMIT + 1);
        let out = notification_text(&just_over);
        assert_eq!(out, format!("{}...", "y".repeat(253)));
    }

    #[test]
    fn cuts_on_characters_not_bytes() {
        let long = "çğüşö".repeat(60);
        let out = notification_text(&long);
        assert_eq!(out.chars().count(), NOTIFICATION_LIMIT);
        assert!(out.starts_with("çğüşö"));
        assert!(out.ends_with("..."));
    }
}
