use crate::history::TranslationLog;
use crate::languages::{self, LanguageSelection};
use crate::poll::PollCommand;
use eframe::egui;
use std::fs;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

const WINDOW_TITLE: &str = "ClipTrans";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Translate,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Waiting,
    Running,
    Stopped,
}

impl Status {
    fn label(self) -> &'static str {
        match self {
            Status::Waiting => "Status: Waiting",
            Status::Running => "Status: Running",
            Status::Stopped => "Status: Stopped",
        }
    }

    fn color(self) -> egui::Color32 {
        match self {
            Status::Waiting => egui::Color32::GRAY,
            Status::Running => egui::Color32::from_rgb(0x2e, 0xcc, 0x71),
            Status::Stopped => egui::Color32::from_rgb(0xe7, 0x4c, 0x3c),
        }
    }
}

// Room left under the log for the clear button.
const CLEAR_BUTTON_HEIGHT: f32 = 36.0;

fn history_height(available: f32) -> f32 {
    (available - CLEAR_BUTTON_HEIGHT).max(0.0)
}

/// Controls for the poll loop: target language, start/stop and the history.
pub struct ControlPanel {
    language: LanguageSelection,
    log: TranslationLog,
    commands: UnboundedSender<PollCommand>,
    status: Status,
    tab: Tab,
}

impl ControlPanel {
    pub fn new(
        language: LanguageSelection,
        log: TranslationLog,
        commands: UnboundedSender<PollCommand>,
        running: bool,
    ) -> Self {
        Self {
            language,
            log,
            commands,
            status: if running { Status::Running } else { Status::Waiting },
            tab: Tab::Translate,
        }
    }

    fn running(&self) -> bool {
        self.status == Status::Running
    }

    fn send(&mut self, command: PollCommand, status: Status) {
        if self.commands.send(command).is_err() {
            warn!(?command, "poll loop is gone");
            return;
        }
        self.status = status;
    }

    fn translate_tab(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Target language:").strong());
            let mut selected = self.language.get();
            egui::ComboBox::from_id_source("target_language")
                .selected_text(selected.as_str())
                .width(220.0)
                .show_ui(ui, |ui| {
                    for name in languages::display_names() {
                        ui.selectable_value(&mut selected, name.to_string(), name);
                    }
                });
            if selected != self.language.get() {
                info!(language = %selected, "target language changed");
                self.language.set(selected);
            }
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let running = self.running();
            if ui.add_enabled(!running, egui::Button::new("Start")).clicked() {
                self.send(PollCommand::Start, Status::Running);
            }
            if ui.add_enabled(running, egui::Button::new("Stop")).clicked() {
                self.send(PollCommand::Stop, Status::Stopped);
            }
        });

        ui.add_space(8.0);
        ui.vertical_centered(|ui| {
            ui.colored_label(self.status.color(), self.status.label());
        });
    }

    fn history_tab(&mut self, ui: &mut egui::Ui) {
        if self.log.is_empty() {
            ui.weak("No translations yet.");
        }
        let text = self.log.render();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .max_height(history_height(ui.available_height()))
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut text.as_str())
                        .desired_rows(16)
                        .desired_width(f32::INFINITY),
                );
            });
        if ui.button("Clear log").clicked() {
            let cleared = self.log.len();
            self.log.clear();
            info!(cleared, "translation log cleared");
        }
    }
}

impl eframe::App for ControlPanel {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // New log entries arrive from the worker thread without any UI event.
        ctx.request_repaint_after(Duration::from_millis(250));

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Translate, "Translate");
                ui.selectable_value(&mut self.tab, Tab::History, "History");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Translate => self.translate_tab(ui),
            Tab::History => self.history_tab(ui),
        });
    }
}

/// Translations into CJK scripts render as boxes with egui's bundled fonts;
/// borrow the first system font that covers them.
fn install_cjk_font(ctx: &egui::Context) {
    let candidates = [
        r"C:\Windows\Fonts\msyh.ttc",
        r"C:\Windows\Fonts\simsun.ttc",
        "/System/Library/Fonts/PingFang.ttc",
        "/System/Library/Fonts/Hiragino Sans GB.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    ];
    let Some((path, bytes)) = candidates
        .iter()
        .find_map(|path| fs::read(path).ok().map(|bytes| (*path, bytes)))
    else {
        info!("no CJK font found; some scripts may not render");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("cjk".to_owned(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push("cjk".to_owned());
    }
    ctx.set_fonts(fonts);
    info!(path, "loaded CJK fallback font");
}

/// Run the control panel on the calling thread until the window closes.
pub fn run(panel: ControlPanel) -> anyhow::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([600.0, 400.0]),
        ..Default::default()
    };
    info!("control panel starting");
    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(|cc: &eframe::CreationContext<'_>| {
            install_cjk_font(&cc.egui_ctx);
            Box::new(panel) as Box<dyn eframe::App>
        }),
    )
    .map_err(|e| anyhow::anyhow!("control panel failed: {e}"))?;
    info!("control panel closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_height_never_goes_negative() {
        assert_eq!(history_height(400.0), 364.0);
        assert_eq!(history_height(CLEAR_BUTTON_HEIGHT), 0.0);
        assert_eq!(history_height(10.0), 0.0);
        assert_eq!(history_height(0.0), 0.0);
    }
}
