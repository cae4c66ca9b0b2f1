use eframe::egui::{Pos2, Vec2, pos2};

use super::geometry;
use super::{Aspect, AspectId, ArgumentId, Board, MergeAnimation, Selection};

pub const MERGE_DURATION: f32 = 1.0;

const STRIP_DAMPING: f32 = 0.85;

pub fn can_merge(board: &Board) -> bool {
    let ids = board.selection.argument_ids();
    ids.len() >= 2
        && ids
            .iter()
            .all(|id| board.argument(*id).is_some_and(|argument| argument.aspect.is_none()))
}

pub fn merge(board: &mut Board) -> Option<AspectId> {
    if !can_merge(board) {
        log::warn!("merge rejected: need at least two ungrouped arguments");
        return None;
    }

    let mut members = board.selection.argument_ids().to_vec();
    members.sort_by(|a, b| {
        let key = |id: ArgumentId| {
            let owner_x = board
                .owner_of(id)
                .and_then(|center_id| board.center(center_id))
                .map_or(0.0, |center| center.pos.x);
            let own_x = board.argument(id).map_or(0.0, |argument| argument.pos.x);
            (owner_x, own_x)
        };
        let (ka, kb) = (key(*a), key(*b));
        ka.0.total_cmp(&kb.0).then(ka.1.total_cmp(&kb.1))
    });

    let centroid = {
        let sum = members
            .iter()
            .filter_map(|id| board.argument(*id))
            .fold(Vec2::ZERO, |acc, argument| acc + argument.pos.to_vec2());
        (sum / members.len() as f32).to_pos2()
    };

    let id = board.alloc_aspect_id();
    let mut start = Vec::with_capacity(members.len());
    for member in &members {
        if let Some(argument) = board.argument_mut(*member) {
            start.push(argument.pos);
            argument.vel = Vec2::ZERO;
            argument.aspect = Some(id);
        }
    }
    let target = strip_positions(board, &members, centroid);

    board.aspects.push(Aspect {
        id,
        members: members.clone(),
        pos: centroid,
        vel: Vec2::ZERO,
        animation: Some(MergeAnimation {
            elapsed: 0.0,
            duration: MERGE_DURATION,
            start,
            target,
        }),
    });
    log::info!("merged {} arguments into aspect {id:?}", members.len());
    board.selection = Selection::Arguments(members);
    Some(id)
}

pub fn split(board: &mut Board, id: AspectId) -> bool {
    let Some(index) = board.aspects.iter().position(|aspect| aspect.id == id) else {
        return false;
    };
    let aspect = board.aspects.remove(index);
    for member in &aspect.members {
        if let Some(argument) = board.argument_mut(*member) {
            argument.aspect = None;
        }
        board.refresh_polar(*member);
    }
    board.selection = Selection::None;
    log::info!("split aspect {id:?} ({} members)", aspect.members.len());
    true
}

pub(super) fn strip_positions(board: &Board, members: &[ArgumentId], centroid: Pos2) -> Vec<Pos2> {
    let widths: Vec<f32> = members
        .iter()
        .map(|id| board.argument(*id).map_or(super::DEFAULT_NODE_SIZE.x, |argument| argument.size.x))
        .collect();
    let total: f32 = widths.iter().sum();
    let mut cursor = centroid.x - total / 2.0;
    widths
        .iter()
        .map(|width| {
            let slot = pos2(cursor + width / 2.0, centroid.y);
            cursor += width;
            slot
        })
        .collect()
}

pub(super) fn layout_strip(board: &mut Board, id: AspectId) {
    let Some(aspect) = board.aspect(id) else {
        return;
    };
    let members = aspect.members.clone();
    let slots = strip_positions(board, &members, aspect.pos);
    for (member, slot) in members.iter().zip(slots) {
        if let Some(argument) = board.argument_mut(*member) {
            argument.pos = slot;
            argument.vel = Vec2::ZERO;
        }
        board.refresh_polar(*member);
    }
}

pub(super) fn advance_animations(board: &mut Board, dt: f32) {
    for index in 0..board.aspects.len() {
        let Some(animation) = board.aspects[index].animation.clone() else {
            continue;
        };
        let elapsed = animation.elapsed + dt;
        let t = geometry::ease_in_out_cubic(elapsed / animation.duration);
        let members = board.aspects[index].members.clone();
        for (slot, member) in members.iter().enumerate() {
            let (Some(start), Some(target)) = (animation.start.get(slot), animation.target.get(slot))
            else {
                continue;
            };
            if let Some(argument) = board.argument_mut(*member) {
                argument.pos = start.lerp(*target, t);
                argument.vel = Vec2::ZERO;
            }
            board.refresh_polar(*member);
        }

        let aspect = &mut board.aspects[index];
        if elapsed >= animation.duration {
            aspect.animation = None;
        } else if let Some(animation) = &mut aspect.animation {
            animation.elapsed = elapsed;
        }
    }
}

pub(super) fn maintain_strips(board: &mut Board) {
    let settled: Vec<AspectId> = board
        .aspects
        .iter()
        .filter(|aspect| !aspect.is_animating())
        .map(|aspect| aspect.id)
        .collect();
    for id in settled {
        if let Some(aspect) = board.aspect_mut(id) {
            aspect.vel *= STRIP_DAMPING;
            aspect.pos += aspect.vel;
        }
        layout_strip(board, id);
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::super::test_support::board_with;
    use super::super::{CenterId, physics};
    use super::*;

    fn merged_board() -> (Board, AspectId, ArgumentId, ArgumentId) {
        let mut board = board_with(vec2(1200.0, 800.0), &[1, 1]);
        let first = board.centers[0].arguments[0].id;
        let second = board.centers[1].arguments[0].id;
        board.selection = Selection::Arguments(vec![first, second]);
        let id = merge(&mut board).expect("merge should succeed");
        (board, id, first, second)
    }

    fn settle(board: &mut Board, steps: usize) {
        for _ in 0..steps {
            physics::step(board);
        }
    }

    #[test]
    fn merge_requires_two_ungrouped_arguments() {
        let mut board = board_with(vec2(1200.0, 800.0), &[2]);
        let first = board.centers[0].arguments[0].id;
        let second = board.centers[0].arguments[1].id;

        board.selection = Selection::Arguments(vec![first]);
        assert!(merge(&mut board).is_none());

        board.selection = Selection::Center(CenterId(1));
        assert!(merge(&mut board).is_none());

        board.selection = Selection::Arguments(vec![first, second]);
        assert!(merge(&mut board).is_some());

        board.selection = Selection::Arguments(vec![first, second]);
        assert!(merge(&mut board).is_none());
        assert_eq!(board.aspects.len(), 1);
    }

    #[test]
    fn merge_orders_members_by_owner_then_position() {
        let mut board = board_with(vec2(1200.0, 800.0), &[1, 1]);
        let left = board.centers[0].arguments[0].id;
        let right = board.centers[1].arguments[0].id;
        board.selection = Selection::Arguments(vec![right, left]);
        let id = merge(&mut board).unwrap();
        assert_eq!(board.aspect(id).unwrap().members, vec![left, right]);
    }

    #[test]
    fn merge_animates_members_into_a_strip() {
        let (mut board, id, first, second) = merged_board();
        assert!(board.aspect(id).unwrap().is_animating());
        assert!(board.argument(first).unwrap().aspect == Some(id));

        settle(&mut board, 70);
        assert!(!board.aspect(id).unwrap().is_animating());

        let a = board.argument(first).unwrap();
        let b = board.argument(second).unwrap();
        assert!((a.pos.y - b.pos.y).abs() < 1e-3, "strip is not horizontal");
        let gap = b.pos.x - a.pos.x;
        assert!(
            (gap - (a.size.x + b.size.x) / 2.0).abs() < 1e-3,
            "members are not edge to edge, gap = {gap}"
        );
    }

    #[test]
    fn owners_keep_counting_members_during_the_transition() {
        let mut board = board_with(vec2(1200.0, 800.0), &[1, 1]);
        let first = board.centers[0].arguments[0].id;
        let second = board.centers[1].arguments[0].id;
        board.argument_mut(first).unwrap().coef = 4;
        board.argument_mut(second).unwrap().coef = -3;
        board.selection = Selection::Arguments(vec![first, second]);
        merge(&mut board).unwrap();

        physics::step(&mut board);
        assert_eq!(board.centers[0].coef, 4);
        assert_eq!(board.centers[1].coef, -3);
        assert_eq!(board.sum_coef(board.selection.argument_ids()), 1);
    }

    #[test]
    fn split_restores_owners_without_a_snap() {
        let (mut board, id, first, second) = merged_board();
        settle(&mut board, 70);
        assert!(split(&mut board, id));

        assert!(board.aspects.is_empty());
        assert_eq!(board.selection, Selection::None);
        for member in [first, second] {
            let owner = board.owner_of(member).expect("owner survives the split");
            let origin = board.center(owner).unwrap().pos;
            let argument = board.argument(member).unwrap();
            assert!(argument.aspect.is_none());
            let rest = geometry::polar_point(origin, argument.angle, argument.distance);
            assert!(
                (rest - argument.pos).length() < 1e-3,
                "polar offset is stale after split"
            );
        }
    }

    #[test]
    fn split_is_safe_mid_animation() {
        let (mut board, id, first, _) = merged_board();
        settle(&mut board, 10);
        assert!(board.aspect(id).unwrap().is_animating());

        assert!(split(&mut board, id));
        assert!(board.aspects.is_empty());
        assert!(board.argument(first).unwrap().aspect.is_none());

        let before = board.argument(first).unwrap().pos;
        settle(&mut board, 5);
        let after = board.argument(first).unwrap().pos;
        assert!(after.x.is_finite() && after.y.is_finite());
        assert!((after - before).length() < 20.0, "node snapped after split");
    }

    #[test]
    fn settled_strip_survives_collision_pressure() {
        let (mut board, id, first, second) = merged_board();
        settle(&mut board, 70);
        let centroid = board.aspect(id).unwrap().pos;

        let crowd = board.centers[0].id;
        for _ in 0..3 {
            board.add_argument(crowd);
        }
        settle(&mut board, 120);

        let a = board.argument(first).unwrap().pos;
        let b = board.argument(second).unwrap().pos;
        assert!((a.y - b.y).abs() < 1e-3);
        assert!((board.aspect(id).unwrap().pos - centroid).length() < 1e-3);
    }
}
