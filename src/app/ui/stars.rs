// src/app/ui/stars.rs: five-star rating display and picker
use eframe::egui as eg;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StarState {
    Full,
    Half,
    Empty,
}

/// Full below floor(value); the star at floor(value) is half when the
/// fraction is at least .5.
pub fn star_states(value: f64) -> [StarState; 5] {
    let value = if value.is_finite() { value.clamp(0.0, 5.0) } else { 0.0 };
    let whole = value.floor();
    let half = value - whole >= 0.5;
    let whole = whole as usize;

    let mut out = [StarState::Empty; 5];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = if i < whole {
            StarState::Full
        } else if i == whole && half {
            StarState::Half
        } else {
            StarState::Empty
        };
    }
    out
}

const GOLD: eg::Color32 = eg::Color32::from_rgb(245, 197, 24);

fn star_points(center: eg::Pos2, outer: f32) -> Vec<eg::Pos2> {
    let inner = outer * 0.45;
    (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = -std::f32::consts::FRAC_PI_2 + i as f32 * std::f32::consts::PI / 5.0;
            center + eg::vec2(a.cos() * r, a.sin() * r)
        })
        .collect()
}

/// Star shapes are not convex, so fill them as a fan of triangles.
fn fill_star(painter: &eg::Painter, center: eg::Pos2, outer: f32, color: eg::Color32) {
    let pts = star_points(center, outer);
    for i in 0..pts.len() {
        let next = pts[(i + 1) % pts.len()];
        painter.add(eg::Shape::convex_polygon(
            vec![center, pts[i], next],
            color,
            eg::Stroke::NONE,
        ));
    }
}

fn paint_star(painter: &eg::Painter, rect: eg::Rect, state: StarState, empty: eg::Color32) {
    let center = rect.center();
    let outer = rect.width().min(rect.height()) * 0.5;
    fill_star(painter, center, outer, empty);
    match state {
        StarState::Full => fill_star(painter, center, outer, GOLD),
        StarState::Half => {
            let left = eg::Rect::from_min_max(rect.min, eg::pos2(center.x, rect.max.y));
            fill_star(&painter.with_clip_rect(left), center, outer, GOLD);
        }
        StarState::Empty => {}
    }
}

/// Read-only stars followed by the value to one decimal.
pub fn stars_ui(ui: &mut eg::Ui, value: f64, size: f32) {
    let empty = ui.visuals().widgets.inactive.bg_fill;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 2.0;
        for state in star_states(value) {
            let (rect, _) = ui.allocate_exact_size(eg::vec2(size, size), eg::Sense::hover());
            paint_star(ui.painter(), rect, state, empty);
        }
        ui.add_space(4.0);
        ui.label(eg::RichText::new(format!("{value:.1}")).size(size * 0.8));
    });
}

/// Clickable stars; returns the whole rating 1..=5 the user picked.
pub fn star_picker(ui: &mut eg::Ui, value: f64, size: f32) -> Option<f64> {
    let empty = ui.visuals().widgets.inactive.bg_fill;
    let mut picked = None;
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;
        for (i, state) in star_states(value).into_iter().enumerate() {
            let (rect, resp) = ui.allocate_exact_size(eg::vec2(size, size), eg::Sense::click());
            let state = if resp.hovered() { StarState::Full } else { state };
            paint_star(ui.painter(), rect, state, empty);
            if resp.clicked() {
                picked = Some((i + 1) as f64);
            }
        }
        ui.label(format!("{value:.1}"));
    });
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::StarState::{Empty as E, Full as F, Half as H};

    #[test]
    fn whole_values() {
        assert_eq!(star_states(0.0), [E, E, E, E, E]);
        assert_eq!(star_states(3.0), [F, F, F, E, E]);
        assert_eq!(star_states(5.0), [F, F, F, F, F]);
    }

    #[test]
    fn half_needs_at_least_point_five() {
        assert_eq!(star_states(4.5), [F, F, F, F, H]);
        assert_eq!(star_states(3.7), [F, F, F, H, E]);
        assert_eq!(star_states(3.4), [F, F, F, E, E]);
        assert_eq!(star_states(0.5), [H, E, E, E, E]);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(star_states(7.0), [F, F, F, F, F]);
        assert_eq!(star_states(-1.0), [E, E, E, E, E]);
        assert_eq!(star_states(f64::NAN), [E, E, E, E, E]);
    }
}
