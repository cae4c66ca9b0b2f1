use eframe::egui::{
    self, Align2, Color32, FontId, Key, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, vec2,
};

use crate::board::{ArgumentId, Selection, interaction, physics};

use super::LibraApp;
use super::editor::LabelEditor;
use super::render_utils::{
    ASPECT_SELECTION_STROKE, ASPECT_STROKE, MAX_NODE_SIZE, NODE_CORNER, NODE_PADDING,
    SELECTION_STROKE, argument_color, center_color, node_size,
};

const BACKGROUND: Color32 = Color32::from_rgb(0x22, 0x22, 0x22);
const NODE_FONT: f32 = 15.0;
const CENTER_FONT: f32 = 16.0;

fn to_screen(rect: Rect, pos: Pos2) -> Pos2 {
    rect.min + pos.to_vec2()
}

fn to_board(rect: Rect, pos: Pos2) -> Pos2 {
    (pos - rect.min).to_pos2()
}

impl LibraApp {
    pub(super) fn draw_board(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);

        if self.canvas != Some(rect.size()) {
            self.canvas = Some(rect.size());
            self.board.view = rect.size();
            self.board.redistribute_centers();
        }

        let now = ui.input(|input| input.time);
        if self
            .last_step
            .is_none_or(|last| now - last >= physics::STEP_INTERVAL)
        {
            physics::step(&mut self.board);
            self.last_step = Some(now);
        }
        ui.ctx().request_repaint();

        self.handle_pointer(ui, rect, &response);
        self.handle_keys(ui);

        let link_stroke = Stroke::new(3.0, Color32::from_white_alpha(110));
        for center in &self.board.centers {
            for argument in &center.arguments {
                painter.line_segment(
                    [to_screen(rect, center.pos), to_screen(rect, argument.pos)],
                    link_stroke,
                );
            }
        }

        let mut order: Vec<ArgumentId> = self.board.arguments().map(|argument| argument.id).collect();
        order.sort_by_key(|id| {
            let selected = self.board.selection.contains_argument(*id);
            let z = self.board.argument(*id).map_or(0, |argument| argument.z);
            (selected, z)
        });
        let wrap = MAX_NODE_SIZE.x - NODE_PADDING * 2.0;
        for id in &order {
            let Some(argument) = self.board.argument(*id) else {
                continue;
            };
            let (pos, coef, label, aspect) =
                (argument.pos, argument.coef, argument.label.clone(), argument.aspect);
            let galley = ui.fonts(|fonts| {
                fonts.layout(label, FontId::proportional(NODE_FONT), Color32::WHITE, wrap)
            });
            let size = node_size(galley.size());
            if let Some(argument) = self.board.argument_mut(*id) {
                argument.size = size;
            }

            let box_rect = Rect::from_center_size(to_screen(rect, pos), size);
            painter.rect_filled(box_rect, NODE_CORNER, argument_color(coef));

            let selected = self.board.selection.contains_argument(*id);
            let settled_member = aspect
                .and_then(|aspect_id| self.board.aspect(aspect_id))
                .is_some_and(|aspect| !aspect.is_animating());
            let stroke = if selected && aspect.is_some() {
                Some(Stroke::new(3.0, ASPECT_SELECTION_STROKE))
            } else if selected {
                Some(Stroke::new(3.0, SELECTION_STROKE))
            } else if settled_member {
                Some(Stroke::new(2.0, ASPECT_STROKE))
            } else {
                None
            };
            if let Some(stroke) = stroke {
                painter.rect_stroke(box_rect, NODE_CORNER, stroke, StrokeKind::Outside);
            }
            painter.galley(
                box_rect.center() - galley.size() / 2.0,
                galley,
                Color32::WHITE,
            );
        }

        let mut center_order: Vec<usize> = (0..self.board.centers.len()).collect();
        center_order.sort_by_key(|index| self.board.centers[*index].z);
        for index in center_order {
            let center = &self.board.centers[index];
            let (id, pos, coef, label) =
                (center.id, center.pos, center.coef, center.label.clone());
            let galley = ui.fonts(|fonts| {
                fonts.layout(label, FontId::proportional(CENTER_FONT), Color32::WHITE, wrap)
            });
            let size = node_size(galley.size());
            self.board.centers[index].size = size;

            let box_rect = Rect::from_center_size(to_screen(rect, pos), size);
            painter.rect_filled(box_rect, NODE_CORNER, center_color(coef));
            if self.board.selection == Selection::Center(id) {
                painter.rect_stroke(
                    box_rect,
                    NODE_CORNER,
                    Stroke::new(3.0, SELECTION_STROKE),
                    StrokeKind::Outside,
                );
            }
            painter.galley(
                box_rect.center() - galley.size() / 2.0,
                galley,
                Color32::WHITE,
            );
        }

        let ids = self.board.selection.argument_ids();
        if !ids.is_empty() {
            let sum = self.board.sum_coef(ids);
            let indicator = Rect::from_center_size(rect.right_top() + vec2(-70.0, 50.0), vec2(60.0, 40.0));
            painter.rect_filled(indicator, NODE_CORNER, Color32::from_rgb(0x33, 0x33, 0x33));
            painter.text(
                indicator.center(),
                Align2::CENTER_CENTER,
                sum.to_string(),
                FontId::proportional(16.0),
                Color32::WHITE,
            );
        }
    }

    fn handle_pointer(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        let multi = ui.input(|input| input.modifiers.shift || input.modifiers.command);

        if response.double_clicked() {
            if let Some(pos) = response.interact_pointer_pos()
                && let Some(target) = interaction::entity_at(&self.board, to_board(rect, pos))
                && let Some(anchor) = self.board.entity_pos(target)
            {
                self.editor = LabelEditor::open(&self.board, target, to_screen(rect, anchor));
            }
            return;
        }

        let (pressed, released, pointer) = ui.input(|input| {
            (
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.interact_pos(),
            )
        });

        if pressed
            && response.hovered()
            && let Some(pos) = pointer
        {
            interaction::pointer_down(&mut self.board, to_board(rect, pos), multi);
        }

        if self.board.drag.is_some() {
            if let Some(pos) = pointer {
                interaction::pointer_move(&mut self.board, to_board(rect, pos));
            }
            if released || ui.input(|input| !input.pointer.any_down()) {
                interaction::pointer_up(&mut self.board);
            }
        }
    }

    fn handle_keys(&mut self, ui: &Ui) {
        if ui.ctx().wants_keyboard_input() {
            return;
        }
        let (delete, up, down) = ui.input(|input| {
            (
                input.key_pressed(Key::Delete),
                input.key_pressed(Key::ArrowUp),
                input.key_pressed(Key::ArrowDown),
            )
        });
        if delete {
            interaction::delete_pressed(&mut self.board);
        }
        if up {
            interaction::adjust_pressed(&mut self.board, 1);
        }
        if down {
            interaction::adjust_pressed(&mut self.board, -1);
        }
    }
}
