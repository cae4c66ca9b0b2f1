use eframe::egui::{self, Align2, Context, Key, Pos2};

use crate::board::{Board, EntityRef};

pub(super) struct LabelEditor {
    target: EntityRef,
    text: String,
    anchor: Pos2,
    just_opened: bool,
}

impl LabelEditor {
    pub(super) fn open(board: &Board, target: EntityRef, anchor: Pos2) -> Option<Self> {
        let text = board.entity_label(target)?.to_owned();
        Some(Self {
            target,
            text,
            anchor,
            just_opened: true,
        })
    }

    pub(super) fn show(&mut self, ctx: &Context, board: &mut Board) -> bool {
        let mut open = true;
        egui::Area::new(egui::Id::new("label-editor"))
            .pivot(Align2::CENTER_CENTER)
            .fixed_pos(self.anchor)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    let response = ui.add(
                        egui::TextEdit::multiline(&mut self.text)
                            .desired_width(220.0)
                            .desired_rows(3),
                    );
                    if self.just_opened {
                        response.request_focus();
                        self.just_opened = false;
                    }

                    let (enter, shift, escape) = ui.input(|input| {
                        (
                            input.key_pressed(Key::Enter),
                            input.modifiers.shift,
                            input.key_pressed(Key::Escape),
                        )
                    });
                    if escape {
                        open = false;
                    } else if (enter && !shift && response.has_focus()) || response.lost_focus() {
                        let trimmed = self.text.trim();
                        if !trimmed.is_empty() {
                            board.set_label(self.target, trimmed.to_owned());
                        }
                        open = false;
                    }
                });
            });
        open
    }
}
