use eframe::egui::{Vec2, vec2};

use super::aspect;
use super::{BUOYANCY_STEP, Board, CENTER_RADIUS, NODE_RADIUS};

pub const STEP_INTERVAL: f64 = 1.0 / 60.0;

const CENTER_SPRING_GAIN: f32 = 0.05;
const CENTER_VERTICAL_DAMPING: f32 = 0.7;
const CENTER_REPULSION_GAIN: f32 = 0.05;
const CENTER_HORIZONTAL_DAMPING: f32 = 0.8;

const NODE_SPRING_GAIN: f32 = 0.09;
const NODE_DAMPING: f32 = 0.85;
const CENTER_COLLISION_GAIN: f32 = 0.08;
const NODE_REPULSION_GAIN: f32 = 0.1;

fn safe_direction(delta: Vec2) -> Vec2 {
    let distance = delta.length();
    if distance > 0.0001 {
        delta / distance
    } else {
        vec2(1.0, 0.0)
    }
}

pub fn step(board: &mut Board) {
    let mid_height = board.view.y / 2.0;
    let center_count = board.centers.len();

    for center in &mut board.centers {
        center.coef = center.arguments.iter().map(|argument| argument.coef).sum();
    }

    for center in &mut board.centers {
        let target_y = mid_height - center.coef as f32 * BUOYANCY_STEP;
        center.vel.y += (target_y - center.pos.y) * CENTER_SPRING_GAIN;
        center.vel.y *= CENTER_VERTICAL_DAMPING;
        center.pos.y += center.vel.y;
    }

    for i in 0..center_count {
        for j in 0..center_count {
            if i == j {
                continue;
            }
            let delta = board.centers[i].pos - board.centers[j].pos;
            let distance = delta.length();
            let min_distance = CENTER_RADIUS * 2.5;
            if distance < min_distance {
                let push = safe_direction(delta) * ((min_distance - distance) * CENTER_REPULSION_GAIN);
                board.centers[i].vel += push;
                board.centers[j].vel -= push;
            }
        }
    }

    for center in &mut board.centers {
        center.vel.x *= CENTER_HORIZONTAL_DAMPING;
        center.pos.x += center.vel.x;
    }

    for ci in 0..center_count {
        let argument_count = board.centers[ci].arguments.len();
        for ai in 0..argument_count {
            let (id, aspect_ref) = {
                let argument = &board.centers[ci].arguments[ai];
                (argument.id, argument.aspect)
            };
            let dragged = board
                .drag
                .is_some_and(|drag| drag.anchor == id || board.selection.contains_argument(id));
            let aspect_animating = aspect_ref
                .and_then(|aspect_id| board.aspect(aspect_id))
                .map(|aspect| aspect.is_animating());
            if dragged || aspect_animating == Some(true) {
                continue;
            }

            let center_pos = board.centers[ci].pos;
            let (mut pos, mut vel, coef, angle, distance) = {
                let argument = &board.centers[ci].arguments[ai];
                (
                    argument.pos,
                    argument.vel,
                    argument.coef,
                    argument.angle,
                    argument.distance,
                )
            };

            if aspect_animating == Some(false) {
                vel *= NODE_DAMPING;
                pos += vel;
            } else {
                let ideal_y = center_pos.y - coef as f32 * BUOYANCY_STEP;
                vel.y += (ideal_y - pos.y) * NODE_SPRING_GAIN;
                vel.y *= NODE_DAMPING;
                pos.y += vel.y;

                let ideal_x = center_pos.x + angle.cos() * distance;
                vel.x += (ideal_x - pos.x) * NODE_SPRING_GAIN;
                vel.x *= NODE_DAMPING;
                pos.x += vel.x;
            }

            let to_center = pos - center_pos;
            let center_gap = to_center.length();
            let min_center_gap = CENTER_RADIUS + NODE_RADIUS;
            if center_gap < min_center_gap {
                let push =
                    safe_direction(to_center) * ((min_center_gap - center_gap) * CENTER_COLLISION_GAIN);
                vel += push;
                board.centers[ci].vel -= push * 0.5;
            }

            for cj in 0..center_count {
                let other_count = board.centers[cj].arguments.len();
                for aj in 0..other_count {
                    if cj == ci && aj == ai {
                        continue;
                    }
                    let other_pos = board.centers[cj].arguments[aj].pos;
                    let delta = pos - other_pos;
                    let gap = delta.length();
                    let min_gap = NODE_RADIUS * 2.0;
                    if gap < min_gap {
                        let push = safe_direction(delta) * ((min_gap - gap) * NODE_REPULSION_GAIN);
                        vel += push;
                        board.centers[cj].arguments[aj].vel -= push;
                    }
                }
            }

            let argument = &mut board.centers[ci].arguments[ai];
            argument.pos = pos;
            argument.vel = vel;
        }
    }

    aspect::advance_animations(board, STEP_INTERVAL as f32);
    aspect::maintain_strips(board);
}
