use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use eframe::egui::{self, Context, Vec2, vec2};

use crate::board::{Board, persist};

mod editor;
mod render_utils;
mod ui;
mod view;

use editor::LabelEditor;

pub struct LibraApp {
    board: Board,
    project_path: String,
    status: Option<String>,
    editor: Option<LabelEditor>,
    last_step: Option<f64>,
    canvas: Option<Vec2>,
}

impl LibraApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, project: Option<PathBuf>) -> Self {
        let mut app = Self {
            board: Board::new(vec2(1440.0, 920.0)),
            project_path: String::new(),
            status: None,
            editor: None,
            last_step: None,
            canvas: None,
        };
        if let Some(path) = project {
            app.project_path = path.display().to_string();
            app.load_project();
        }
        app
    }

    fn save_project(&mut self) {
        match self.try_save() {
            Ok(()) => {
                log::info!("saved project to {}", self.project_path);
                self.status = Some(format!("Saved {}", self.project_path));
            }
            Err(error) => {
                log::warn!("save failed: {error:#}");
                self.status = Some(format!("Save failed: {error:#}"));
            }
        }
    }

    fn try_save(&self) -> anyhow::Result<()> {
        let json = persist::encode(&self.board)?;
        fs::write(&self.project_path, json)
            .with_context(|| format!("writing {}", self.project_path))?;
        Ok(())
    }

    fn load_project(&mut self) {
        match self.try_load() {
            Ok(board) => {
                log::info!(
                    "loaded project from {} ({} options)",
                    self.project_path,
                    board.centers.len()
                );
                self.board = board;
                self.editor = None;
                self.status = Some(format!("Loaded {}", self.project_path));
            }
            Err(error) => {
                log::warn!("load failed: {error:#}");
                self.status = Some(format!("Load failed: {error:#}"));
            }
        }
    }

    fn try_load(&self) -> anyhow::Result<Board> {
        let raw = fs::read_to_string(&self.project_path)
            .with_context(|| format!("reading {}", self.project_path))?;
        let board = persist::decode(&raw, self.board.view)?;
        Ok(board)
    }
}

impl eframe::App for LibraApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("chrome").show(ctx, |ui| self.top_bar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.draw_board(ui));

        if let Some(mut editor) = self.editor.take()
            && editor.show(ctx, &mut self.board)
        {
            self.editor = Some(editor);
        }
    }
}
