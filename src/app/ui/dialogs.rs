// src/app/ui/dialogs.rs: log and details windows
use eframe::egui as eg;

use crate::app::types::{LogMode, MovieRef};
use crate::app::ui::stars::star_picker;

impl crate::app::CineVaultApp {
    pub(crate) fn ui_render_log_dialog(&mut self, ctx: &eg::Context) {
        let Some(draft) = self.active_log.as_mut() else {
            return;
        };

        let title = match draft.mode {
            LogMode::Add => format!("Log {}", draft.movie.title),
            LogMode::Edit => format!("Edit {}", draft.movie.title),
        };

        let mut open = true;
        let mut save = false;
        let mut cancel = false;
        eg::Window::new(title)
            .id(eg::Id::new("log_dialog"))
            .collapsible(false)
            .resizable(false)
            .anchor(eg::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label("Your rating");
                if let Some(r) = star_picker(ui, draft.rating, 22.0) {
                    draft.rating = r;
                }
                ui.add_space(6.0);
                ui.label("Notes");
                ui.add(
                    eg::TextEdit::multiline(&mut draft.notes)
                        .hint_text("What stood out?")
                        .desired_rows(4)
                        .desired_width(320.0),
                );
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    save = ui.button("Save").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });

        if save {
            self.save_log();
        } else if cancel || !open {
            self.cancel_log();
        }
    }

    pub(crate) fn ui_render_details_dialog(&mut self, ctx: &eg::Context) {
        let Some(details) = self.active_details.clone() else {
            return;
        };
        let status = self.status_of(details.id);

        let mut open = true;
        let mut close = false;
        let mut log = false;
        let mut uploads_left = 1usize;
        let tex = details
            .poster
            .as_deref()
            .and_then(|url| self.posters.texture(ctx, url, &mut uploads_left));

        eg::Window::new(details.title.as_str())
            .id(eg::Id::new("details_dialog"))
            .collapsible(false)
            .resizable(false)
            .anchor(eg::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.horizontal_top(|ui| {
                    let (rect, _) = ui.allocate_exact_size(eg::vec2(120.0, 180.0), eg::Sense::hover());
                    crate::app::gfx::paint_poster(ui, rect, tex.as_ref(), 6.0);

                    ui.vertical(|ui| {
                        ui.set_max_width(320.0);
                        if let Some(year) = &details.year {
                            ui.label(year);
                        }
                        if !details.genres.is_empty() {
                            ui.weak(details.genres.join(", "));
                        }
                        ui.label(format!("Status: {}", status.label()));
                        ui.add_space(6.0);
                        ui.add(eg::Label::new(&details.overview).wrap());
                    });
                });
                ui.separator();
                ui.horizontal(|ui| {
                    log = ui.button("Log Watched").clicked();
                    close = ui.button("Close").clicked();
                });
            });

        if log {
            self.close_details();
            self.open_log(MovieRef::from(&details), LogMode::Add);
        } else if close || !open {
            self.close_details();
        }
    }
}
