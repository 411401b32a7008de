// src/app/ui/library.rs
use eframe::egui as eg;

use crate::app::gfx::paint_poster;
use crate::app::library::{LibraryFilter, LibraryStatus};
use crate::app::mapping::format_date;
use crate::app::types::{LogMode, MovieRef};
use crate::app::ui::grid::{wrapped_grid, CARD_W};
use crate::app::ui::stars::stars_ui;

pub const EMPTY_LIBRARY_MSG: &str = "No titles match these filters yet.";

const TEXT_H: f32 = 120.0;

impl crate::app::CineVaultApp {
    pub(crate) fn ui_render_library_controls(&mut self, ui: &mut eg::Ui) {
        ui.horizontal(|ui| {
            for filter in LibraryFilter::ALL {
                ui.selectable_value(&mut self.library_filter, filter, filter.label());
            }
            ui.separator();
            ui.add(
                eg::TextEdit::singleline(&mut self.library_query)
                    .hint_text("Search your library…")
                    .desired_width(220.0),
            );
            if !self.library_query.is_empty() && ui.small_button("Clear").clicked() {
                self.library_query.clear();
            }
        });
    }

    pub(crate) fn ui_render_library(
        &mut self,
        ui: &mut eg::Ui,
        ctx: &eg::Context,
        uploads_left: &mut usize,
    ) {
        self.ui_render_library_controls(ui);
        ui.add_space(6.0);

        let items = self.library_items();
        if items.is_empty() {
            ui.weak(EMPTY_LIBRARY_MSG);
            return;
        }

        wrapped_grid(ui, items.len(), CARD_W * 1.5 + TEXT_H, |ui, idx| {
            let item = &items[idx];

            let (rect, resp) =
                ui.allocate_exact_size(eg::vec2(CARD_W, CARD_W * 1.5), eg::Sense::click());
            let tex = self.posters.texture(ctx, &item.poster, uploads_left);
            paint_poster(ui, rect, tex.as_ref(), 8.0);
            if resp.clicked() {
                self.open_details(&MovieRef::from(item));
            }

            ui.add(eg::Label::new(eg::RichText::new(&item.title).strong()).truncate());
            let when = match item.status {
                LibraryStatus::Watched => format!("Watched {}", format_date(&item.date)),
                LibraryStatus::Plan => format!("Added {}", format_date(&item.date)),
            };
            ui.label(eg::RichText::new(when).small());

            if let Some(rating) = item.user_rating {
                stars_ui(ui, rating, 12.0);
            }
            if let Some(notes) = &item.notes {
                ui.add(eg::Label::new(eg::RichText::new(notes).italics().small()).truncate());
            }

            ui.horizontal(|ui| {
                match item.status {
                    LibraryStatus::Plan => {
                        if ui.small_button("Mark Watched").clicked() {
                            self.open_log(MovieRef::from(item), LogMode::Add);
                        }
                    }
                    LibraryStatus::Watched => {
                        if ui.small_button("Edit Notes").clicked() {
                            self.open_log(MovieRef::from(item), LogMode::Edit);
                        }
                    }
                }
                if item.overview.is_some() && ui.small_button("Details").clicked() {
                    self.open_details(&MovieRef::from(item));
                }
            });
        });
    }
}
