use eframe::egui::{self, Align, Layout, RichText, Ui};

use crate::board::{Selection, aspect};

use super::LibraApp;

impl LibraApp {
    pub(super) fn top_bar(&mut self, ui: &mut Ui) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Agenda:");
            ui.add(
                egui::TextEdit::singleline(&mut self.board.agenda)
                    .desired_width(280.0)
                    .hint_text("What is being decided?"),
            );
            ui.separator();
            ui.label("Project:");
            ui.add(
                egui::TextEdit::singleline(&mut self.project_path)
                    .desired_width(240.0)
                    .hint_text("path/to/project.json"),
            );
            let has_path = !self.project_path.trim().is_empty();
            if ui.add_enabled(has_path, egui::Button::new("Save")).clicked() {
                self.save_project();
            }
            if ui.add_enabled(has_path, egui::Button::new("Load")).clicked() {
                self.load_project();
            }
        });

        ui.add_space(2.0);
        ui.horizontal(|ui| {
            if ui.button("Add option").clicked() {
                self.board.add_center();
            }

            let selected_center = match self.board.selection {
                Selection::Center(id) => Some(id),
                _ => None,
            };
            let delete = ui
                .add_enabled(selected_center.is_some(), egui::Button::new("Delete option"))
                .on_hover_text("Removes the selected option and all of its arguments");
            if delete.clicked()
                && let Some(id) = selected_center
                && !self.board.delete_center(id)
            {
                self.status = Some("The last option cannot be deleted".to_owned());
            }
            let add_argument = ui
                .add_enabled(selected_center.is_some(), egui::Button::new("Add argument"));
            if add_argument.clicked()
                && let Some(id) = selected_center
            {
                self.board.add_argument(id);
            }

            ui.separator();
            let merge = ui
                .add_enabled(aspect::can_merge(&self.board), egui::Button::new("Merge"))
                .on_hover_text("Group the selected arguments into one aspect");
            if merge.clicked() {
                aspect::merge(&mut self.board);
            }
            let selected_aspect = self
                .board
                .selection
                .argument_ids()
                .iter()
                .find_map(|id| self.board.argument(*id).and_then(|argument| argument.aspect));
            let split = ui
                .add_enabled(selected_aspect.is_some(), egui::Button::new("Split"))
                .on_hover_text("Release the selected aspect back to ordinary physics");
            if split.clicked()
                && let Some(id) = selected_aspect
            {
                aspect::split(&mut self.board, id);
            }

            let ids = self.board.selection.argument_ids();
            if !ids.is_empty() {
                ui.separator();
                ui.label(
                    RichText::new(format!("Weight: {}", self.board.sum_coef(ids))).strong(),
                );
            }
        });
        ui.add_space(4.0);
    }

    pub(super) fn status_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            if let Some(line) = &self.status {
                ui.label(line.as_str());
            }
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(format!(
                    "{} options, {} arguments, {} aspects",
                    self.board.centers.len(),
                    self.board.arguments().count(),
                    self.board.aspects.len()
                ));
            });
        });
    }
}
