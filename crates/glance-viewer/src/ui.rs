//! Control panel using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use glance_core::panel::{INTENSITY_MAX, INTENSITY_MIN, INTENSITY_STEP};
use glance_core::{BackgroundTheme, GraphicsLevel, PanelState, ViewerAction};
use glance_scene::Session;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
        app.add_systems(EguiPrimaryContextPass, ui_system);
    }
}

fn ui_system(mut contexts: EguiContexts, mut session: ResMut<Session>) {
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let actions = draw_panel(ctx, &session.panel);
    if actions.is_empty() {
        return;
    }

    for action in actions {
        // Rejected actions are already logged by the session
        if let Err(e) = session.dispatch(action) {
            tracing::debug!(action = action.name(), "{}", e);
        }
    }
}

/// Lay out the panel for `panel` and return what the user asked for this frame
pub fn draw_panel(ctx: &egui::Context, panel: &PanelState) -> Vec<ViewerAction> {
    let mut actions = Vec::new();

    egui::Area::new(egui::Id::new("viewer_panel"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                    let glyph = egui::RichText::new(panel.menu_glyph()).size(18.0);
                    if ui.button(glyph).clicked() {
                        actions.push(ViewerAction::ToggleMenu);
                    }
                });

                if panel.menu_collapsed {
                    return;
                }

                ui.set_min_width(180.0);
                ui.separator();
                panel_controls(ui, panel, &mut actions);
            });
        });

    actions
}

fn panel_controls(ui: &mut egui::Ui, panel: &PanelState, actions: &mut Vec<ViewerAction>) {
    ui.horizontal(|ui| {
        ui.label("Graphics");
        let mut graphics = panel.graphics;
        egui::ComboBox::from_id_salt("graphics_level")
            .selected_text(graphics.label())
            .show_ui(ui, |ui| {
                for level in GraphicsLevel::ALL {
                    ui.selectable_value(&mut graphics, level, level.label());
                }
            });
        if graphics != panel.graphics {
            actions.push(ViewerAction::SetGraphicsLevel(graphics));
        }
    });

    ui.add_space(4.0);

    if ui
        .add(egui::Button::new("Light").selected(panel.light_button_active))
        .clicked()
    {
        actions.push(ViewerAction::ToggleLight);
    }

    ui.horizontal(|ui| {
        ui.label("Intensity");
        let mut intensity = panel.intensity;
        let slider = egui::Slider::new(&mut intensity, INTENSITY_MIN..=INTENSITY_MAX)
            .step_by(INTENSITY_STEP as f64);
        if ui.add(slider).changed() {
            actions.push(ViewerAction::SetLightIntensity(snap_intensity(intensity)));
        }
    });

    ui.add_space(4.0);

    ui.horizontal(|ui| {
        ui.label("Background");
        let mut background = panel.background;
        for theme in [BackgroundTheme::Light, BackgroundTheme::Dark] {
            ui.radio_value(&mut background, theme, theme.label());
        }
        if background != panel.background {
            actions.push(ViewerAction::SetBackground(background));
        }
    });

    ui.add_space(4.0);

    ui.horizontal(|ui| {
        if ui
            .add(egui::Button::new("Bounding box").selected(panel.bbox_button_active))
            .clicked()
        {
            actions.push(ViewerAction::ToggleBoundingBox);
        }
        if ui.button("Reset camera").clicked() {
            actions.push(ViewerAction::ResetCamera);
        }
    });
}

/// Slider values land on the 0.1 grid inside the allowed range
pub fn snap_intensity(value: f32) -> f32 {
    let steps = (value / INTENSITY_STEP).round();
    (steps * INTENSITY_STEP).clamp(INTENSITY_MIN, INTENSITY_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_intensity() {
        assert!((snap_intensity(0.73) - 0.7).abs() < 1e-6);
        assert!((snap_intensity(1.05001) - 1.1).abs() < 1e-6);
        assert_eq!(snap_intensity(-0.4), 0.0);
        assert_eq!(snap_intensity(2.6), 2.0);
    }

    #[test]
    fn test_idle_frame_produces_no_actions() {
        let ctx = egui::Context::default();
        for collapsed in [false, true] {
            let panel = PanelState {
                menu_collapsed: collapsed,
                ..PanelState::default()
            };
            let mut actions = Vec::new();
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                actions = draw_panel(ctx, &panel);
            });
            assert!(actions.is_empty());
        }
    }
}
