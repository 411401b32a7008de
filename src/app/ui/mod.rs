// src/app/ui/mod.rs
pub mod dialogs;
pub mod grid;
pub mod library;
pub mod stars;

use eframe::egui as eg;

use crate::app::library::LibraryFilter;
use crate::app::posters::MAX_UPLOADS_PER_FRAME;
use crate::app::types::{LogMode, MovieRef};
use crate::tmdb::SortBy;

const RATINGS_SHOWN: usize = 2;

impl crate::app::CineVaultApp {
    // ---------- TOP BAR ----------
    pub(crate) fn ui_render_topbar(&mut self, ctx: &eg::Context) {
        eg::TopBottomPanel::top("topbar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("CineVault");
                ui.separator();
                if ui.button("Plan to Watch").clicked() {
                    self.jump_to_library(LibraryFilter::Plan);
                }
                if ui.button("Watched").clicked() {
                    self.jump_to_library(LibraryFilter::Watched);
                }
                ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                    if ui.button(self.theme.label()).clicked() {
                        self.toggle_theme();
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    // ---------- RATINGS PANEL ----------
    pub(crate) fn ui_render_ratings_panel(&mut self, ctx: &eg::Context) {
        eg::SidePanel::right("ratings_panel")
            .resizable(false)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.heading("Your Ratings");
                ui.separator();

                let recent: Vec<_> = self
                    .tracker
                    .watched()
                    .iter()
                    .take(RATINGS_SHOWN)
                    .cloned()
                    .collect();
                if recent.is_empty() {
                    ui.weak("Nothing rated yet.");
                }
                for item in &recent {
                    ui.label(eg::RichText::new(&item.title).strong());
                    stars::stars_ui(ui, item.user_rating, 14.0);
                    if let Some(notes) = &item.notes {
                        ui.add(eg::Label::new(eg::RichText::new(notes).italics()).wrap());
                    }
                    if ui.small_button("Edit").clicked() {
                        let movie = MovieRef {
                            id: item.id,
                            title: item.title.clone(),
                            poster: item.poster.clone(),
                            genres: item.genres.clone(),
                            year: item.year.clone(),
                            overview: item.overview.clone(),
                        };
                        self.open_log(movie, LogMode::Edit);
                    }
                    ui.add_space(8.0);
                }
            });
    }

    // ---------- MAIN COLUMN ----------
    pub(crate) fn ui_render_dashboard(&mut self, ui: &mut eg::Ui, ctx: &eg::Context) {
        let mut uploads_left = MAX_UPLOADS_PER_FRAME;

        eg::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                self.ui_render_hero(ui);
                ui.add_space(8.0);
                self.ui_render_stats(ui);

                if let Some(err) = &self.error {
                    ui.add_space(6.0);
                    ui.colored_label(ui.visuals().error_fg_color, err);
                }

                ui.add_space(12.0);
                ui.heading("Recommended for you");
                ui.add_space(6.0);
                self.ui_render_recommended(ui, ctx, &mut uploads_left);

                ui.add_space(12.0);
                ui.heading("Upcoming releases");
                ui.add_space(6.0);
                self.ui_render_upcoming(ui, ctx, &mut uploads_left);

                ui.add_space(12.0);
                let heading = ui.heading("Your Library");
                if self.scroll_to_library {
                    heading.scroll_to_me(Some(eg::Align::TOP));
                    self.scroll_to_library = false;
                }
                ui.add_space(6.0);
                self.ui_render_library(ui, ctx, &mut uploads_left);
            });
    }

    fn ui_render_hero(&mut self, ui: &mut eg::Ui) {
        ui.add_space(8.0);
        ui.heading("Track what you watch. Find what's next.");
        ui.add_space(6.0);

        ui.horizontal_wrapped(|ui| {
            let resp = ui.add(
                eg::TextEdit::singleline(&mut self.query)
                    .hint_text("Search titles…")
                    .desired_width(260.0),
            );
            let submitted = resp.lost_focus() && ui.input(|i| i.key_pressed(eg::Key::Enter));
            if ui.button("Search").clicked() || submitted {
                self.run_search();
            }

            ui.separator();

            let mut genre = self.selected_genre;
            let genre_text = genre
                .and_then(|id| self.genres.iter().find(|g| g.id == id))
                .map_or("All Genres", |g| g.name.as_str())
                .to_string();
            eg::ComboBox::from_id_source("genre_combo")
                .selected_text(genre_text)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut genre, None, "All Genres");
                    for g in &self.genres {
                        ui.selectable_value(&mut genre, Some(g.id), g.name.as_str());
                    }
                });
            self.set_genre(genre);

            let mut sort = self.sort_by;
            eg::ComboBox::from_id_source("sort_combo")
                .selected_text(sort.label())
                .show_ui(ui, |ui| {
                    for s in SortBy::ALL {
                        ui.selectable_value(&mut sort, s, s.label());
                    }
                });
            self.set_sort(sort);

            if ui.button("Refresh").clicked() {
                self.run_search();
            }
            if ui.button("Advanced Filters").clicked() {
                self.run_search();
            }
            if self.loading {
                ui.add(eg::Spinner::new());
            }
        });
    }

    fn ui_render_stats(&self, ui: &mut eg::Ui) {
        let stats = self.stats();
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 18.0;
            ui.label(format!("Watched: {}", stats.watched_count));
            if let Some(last) = &stats.last_watched {
                ui.label(format!("Last watched: {last}"));
            }
            ui.label(format!("Avg rating: {}", stats.average_rating));
            ui.label(format!("Up next: {}", stats.next_plan));
            ui.label(format!("Plan to watch: {}", stats.plan_count));
        });
    }
}
