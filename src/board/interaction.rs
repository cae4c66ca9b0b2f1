use eframe::egui::{Pos2, Vec2};

use super::geometry::point_in_box;
use super::{ArgumentId, Board, CenterId, DragState, EntityRef, Selection, aspect};

pub fn entity_at(board: &Board, pos: Pos2) -> Option<EntityRef> {
    if let Some(member) = aspect_member_at(board, pos) {
        return Some(EntityRef::Argument(member));
    }
    if let Some(center) = center_at(board, pos) {
        return Some(EntityRef::Center(center));
    }
    argument_at(board, pos).map(EntityRef::Argument)
}

fn aspect_member_at(board: &Board, pos: Pos2) -> Option<ArgumentId> {
    for aspect in &board.aspects {
        for member in &aspect.members {
            if let Some(argument) = board.argument(*member)
                && point_in_box(pos, argument.pos, argument.size)
            {
                return Some(*member);
            }
        }
    }
    None
}

fn center_at(board: &Board, pos: Pos2) -> Option<CenterId> {
    board
        .centers
        .iter()
        .find(|center| point_in_box(pos, center.pos, center.size))
        .map(|center| center.id)
}

fn argument_at(board: &Board, pos: Pos2) -> Option<ArgumentId> {
    board
        .arguments()
        .find(|argument| point_in_box(pos, argument.pos, argument.size))
        .map(|argument| argument.id)
}

fn toggle(board: &mut Board, id: ArgumentId) {
    let mut ids = match std::mem::take(&mut board.selection) {
        Selection::Arguments(ids) => ids,
        _ => Vec::new(),
    };
    if let Some(index) = ids.iter().position(|other| *other == id) {
        ids.remove(index);
    } else {
        ids.push(id);
    }
    board.selection = if ids.is_empty() {
        Selection::None
    } else {
        Selection::Arguments(ids)
    };
}

pub fn pointer_down(board: &mut Board, pos: Pos2, multi: bool) {
    if let Some(member) = aspect_member_at(board, pos) {
        if multi {
            toggle(board, member);
        } else {
            let members = board
                .argument(member)
                .and_then(|argument| argument.aspect)
                .and_then(|id| board.aspect(id))
                .map(|aspect| aspect.members.clone())
                .unwrap_or_else(|| vec![member]);
            board.selection = Selection::Arguments(members);
            board.drag = Some(DragState {
                anchor: member,
                last: pos,
            });
        }
        return;
    }

    if let Some(center) = center_at(board, pos) {
        board.selection = Selection::Center(center);
        return;
    }

    if let Some(id) = argument_at(board, pos) {
        if multi {
            toggle(board, id);
        } else {
            board.selection = Selection::Arguments(vec![id]);
            board.drag = Some(DragState {
                anchor: id,
                last: pos,
            });
        }
        return;
    }

    if !multi {
        board.selection = Selection::None;
    }
}

pub fn pointer_move(board: &mut Board, pos: Pos2) {
    let Some(mut drag) = board.drag else {
        return;
    };
    let delta = pos - drag.last;
    drag.last = pos;
    board.drag = Some(drag);
    if delta == Vec2::ZERO {
        return;
    }

    if let Some(aspect_id) = board.argument(drag.anchor).and_then(|argument| argument.aspect) {
        if let Some(aspect) = board.aspect_mut(aspect_id) {
            aspect.pos += delta;
            aspect.vel = Vec2::ZERO;
            aspect.animation = None;
        }
        aspect::layout_strip(board, aspect_id);
        return;
    }

    let selected = board.selection.argument_ids().to_vec();
    if selected.len() > 1 {
        for id in selected {
            translate(board, id, delta);
        }
    } else {
        translate(board, drag.anchor, delta);
    }
}

fn translate(board: &mut Board, id: ArgumentId, delta: Vec2) {
    if let Some(argument) = board.argument_mut(id) {
        argument.pos += delta;
        argument.vel = Vec2::ZERO;
    }
    board.refresh_polar(id);
}

pub fn pointer_up(board: &mut Board) {
    let Some(drag) = board.drag.take() else {
        return;
    };
    if let Some(aspect_id) = board.argument(drag.anchor).and_then(|argument| argument.aspect) {
        let members = board
            .aspect(aspect_id)
            .map(|aspect| aspect.members.clone())
            .unwrap_or_default();
        for member in members {
            board.refresh_polar(member);
        }
    } else {
        for id in board.selection.argument_ids().to_vec() {
            board.refresh_polar(id);
        }
    }
}

pub fn delete_pressed(board: &mut Board) {
    let ids = board.selection.argument_ids().to_vec();
    if ids.is_empty() {
        return;
    }
    board.delete_arguments(&ids);
    board.selection = Selection::None;
    log::info!("deleted {} arguments", ids.len());
}

pub fn adjust_pressed(board: &mut Board, delta: i32) {
    let ids = board.selection.argument_ids().to_vec();
    match ids.len() {
        0 => {}
        1 => {
            if let Some(argument) = board.argument_mut(ids[0]) {
                argument.adjust_coef(delta);
            }
        }
        _ => {
            let aspect_wide = board
                .aspects
                .iter()
                .any(|aspect| same_set(&aspect.members, &ids));
            if aspect_wide {
                for id in ids {
                    if let Some(argument) = board.argument_mut(id) {
                        argument.adjust_coef(delta);
                    }
                }
            }
        }
    }
}

fn same_set(a: &[ArgumentId], b: &[ArgumentId]) -> bool {
    a.len() == b.len() && a.iter().all(|id| b.contains(id))
}
