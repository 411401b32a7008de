// src/app/ui/grid.rs
use eframe::egui as eg;

use crate::app::gfx::paint_poster;
use crate::app::types::{LogMode, MovieCard, MovieRef, WatchStatus};
use crate::app::ui::stars::stars_ui;

pub const CARD_W: f32 = 160.0;
pub const H_SPACING: f32 = 12.0;
pub const V_SPACING: f32 = 14.0;
pub const SKELETON_CARDS: usize = 4;

const TEXT_H: f32 = 96.0;
const ROW_POSTER_W: f32 = 46.0;

/// Columns that fit `avail` and the left pad that centers them.
pub fn grid_columns(avail: f32, card_w: f32) -> (usize, f32) {
    let cols = ((avail + H_SPACING) / (card_w + H_SPACING)).floor().max(1.0) as usize;
    let used = cols as f32 * card_w + cols.saturating_sub(1) as f32 * H_SPACING;
    (cols, ((avail - used) * 0.5).max(0.0))
}

/// Run `cell` once per index, wrapped into centered rows.
pub fn wrapped_grid(ui: &mut eg::Ui, count: usize, card_h: f32, mut cell: impl FnMut(&mut eg::Ui, usize)) {
    let (cols, left_pad) = grid_columns(ui.available_width(), CARD_W);
    for row_start in (0..count).step_by(cols) {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing = eg::vec2(H_SPACING, V_SPACING);
            if left_pad > 0.0 {
                ui.add_space(left_pad);
            }
            for idx in row_start..(row_start + cols).min(count) {
                ui.allocate_ui_with_layout(
                    eg::vec2(CARD_W, card_h),
                    eg::Layout::top_down(eg::Align::Min),
                    |ui| {
                        ui.set_min_size(eg::vec2(CARD_W, card_h));
                        ui.set_max_width(CARD_W);
                        cell(ui, idx);
                    },
                );
            }
        });
        ui.add_space(V_SPACING);
    }
}

impl crate::app::CineVaultApp {
    pub(crate) fn ui_render_recommended(
        &mut self,
        ui: &mut eg::Ui,
        ctx: &eg::Context,
        uploads_left: &mut usize,
    ) {
        let card_h = CARD_W * 1.5 + TEXT_H;

        if self.loading {
            wrapped_grid(ui, SKELETON_CARDS, card_h, |ui, _| {
                let fill = ui.visuals().faint_bg_color.gamma_multiply(2.0);
                let (rect, _) =
                    ui.allocate_exact_size(eg::vec2(CARD_W, CARD_W * 1.5), eg::Sense::hover());
                ui.painter().rect_filled(rect, 8.0, fill);
                let (line, _) = ui.allocate_exact_size(eg::vec2(CARD_W * 0.8, 14.0), eg::Sense::hover());
                ui.painter().rect_filled(line, 4.0, fill);
                let (line, _) = ui.allocate_exact_size(eg::vec2(CARD_W * 0.5, 12.0), eg::Sense::hover());
                ui.painter().rect_filled(line, 4.0, fill);
            });
            return;
        }

        if self.recommended.is_empty() {
            ui.weak("No titles to show yet.");
            return;
        }

        let cards = self.recommended.clone();
        wrapped_grid(ui, cards.len(), card_h, |ui, idx| {
            let card = &cards[idx];

            let (poster_rect, poster_resp) =
                ui.allocate_exact_size(eg::vec2(CARD_W, CARD_W * 1.5), eg::Sense::click());
            let tex = self.posters.texture(ctx, &card.poster, uploads_left);
            paint_poster(ui, poster_rect, tex.as_ref(), 8.0);
            if poster_resp.clicked() {
                self.open_details(&MovieRef::from(card));
            }

            ui.add(eg::Label::new(eg::RichText::new(&card.title).strong()).truncate());
            ui.add(
                eg::Label::new(eg::RichText::new(format!("{} · {}", card.year, card.genres.join(", "))).small())
                    .truncate(),
            );
            stars_ui(ui, card.rating, 12.0);
            self.ui_render_card_actions(ui, card);
        });
    }

    /// Plan / log / details buttons shared by recommended and upcoming.
    fn ui_render_card_actions(&mut self, ui: &mut eg::Ui, card: &MovieCard) {
        ui.horizontal(|ui| {
            match self.status_of(card.id) {
                WatchStatus::Untracked => {
                    if ui.small_button("+ Plan").clicked() {
                        self.add_to_plan(card);
                    }
                }
                WatchStatus::Planned => {
                    ui.weak("Planned");
                }
                WatchStatus::Watched => {
                    ui.weak("Watched");
                }
            }
            if ui.small_button("Log").clicked() {
                self.open_log(MovieRef::from(card), LogMode::Add);
            }
            if card.overview.is_some() && ui.small_button("Details").clicked() {
                self.open_details(&MovieRef::from(card));
            }
        });
    }

    pub(crate) fn ui_render_upcoming(
        &mut self,
        ui: &mut eg::Ui,
        ctx: &eg::Context,
        uploads_left: &mut usize,
    ) {
        if self.upcoming.is_empty() {
            ui.weak(if self.loading { "Loading…" } else { "Nothing announced right now." });
            return;
        }

        let cards = self.upcoming.clone();
        for card in &cards {
            ui.horizontal(|ui| {
                let (rect, resp) = ui
                    .allocate_exact_size(eg::vec2(ROW_POSTER_W, ROW_POSTER_W * 1.5), eg::Sense::click());
                let tex = self.posters.texture(ctx, &card.poster, uploads_left);
                paint_poster(ui, rect, tex.as_ref(), 4.0);
                if resp.clicked() {
                    self.open_details(&MovieRef::from(card));
                }

                ui.vertical(|ui| {
                    ui.label(eg::RichText::new(&card.title).strong());
                    ui.label(eg::RichText::new(&card.runtime).small());
                    ui.weak(card.genres.join(", "));
                });

                ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                    self.ui_render_card_actions(ui, card);
                });
            });
            ui.separator();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_fit_and_center() {
        let (cols, pad) = grid_columns(CARD_W * 3.0 + H_SPACING * 2.0 + 40.0, CARD_W);
        assert_eq!(cols, 3);
        assert!((pad - 20.0).abs() < 1e-3);
    }

    #[test]
    fn narrow_space_still_has_one_column() {
        assert_eq!(grid_columns(10.0, CARD_W), (1, 0.0));
    }
}
