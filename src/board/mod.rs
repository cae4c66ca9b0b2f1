use eframe::egui::{Pos2, Vec2, pos2, vec2};

pub mod aspect;
pub mod geometry;
pub mod interaction;
pub mod persist;
pub mod physics;

pub const COEF_MIN: i32 = -5;
pub const COEF_MAX: i32 = 5;

pub const CENTER_RADIUS: f32 = 50.0;
pub const NODE_RADIUS: f32 = 45.0;
pub const LINK_LENGTH: f32 = 170.0;

pub const BUOYANCY_STEP: f32 = 18.0;

const DEFAULT_NODE_SIZE: Vec2 = vec2(60.0, 40.0);

const GOLDEN_ANGLE: f32 = 2.399_963;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct CenterId(pub u64);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ArgumentId(pub u64);

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AspectId(pub u64);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EntityRef {
    Center(CenterId),
    Argument(ArgumentId),
}

#[derive(Clone, Debug)]
pub struct Center {
    pub id: CenterId,
    pub pos: Pos2,
    pub vel: Vec2,
    pub coef: i32,
    pub label: String,
    pub arguments: Vec<Argument>,
    pub z: i32,
    pub size: Vec2,
}

#[derive(Clone, Debug)]
pub struct Argument {
    pub id: ArgumentId,
    pub pos: Pos2,
    pub vel: Vec2,
    pub coef: i32,
    pub label: String,
    pub angle: f32,
    pub distance: f32,
    pub aspect: Option<AspectId>,
    pub z: i32,
    pub size: Vec2,
}

impl Argument {
    pub fn adjust_coef(&mut self, delta: i32) {
        self.coef = (self.coef + delta).clamp(COEF_MIN, COEF_MAX);
    }
}

#[derive(Clone, Debug)]
pub struct MergeAnimation {
    pub elapsed: f32,
    pub duration: f32,
    pub start: Vec<Pos2>,
    pub target: Vec<Pos2>,
}

#[derive(Clone, Debug)]
pub struct Aspect {
    pub id: AspectId,
    pub members: Vec<ArgumentId>,
    pub pos: Pos2,
    pub vel: Vec2,
    pub animation: Option<MergeAnimation>,
}

impl Aspect {
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum Selection {
    #[default]
    None,
    Center(CenterId),
    Arguments(Vec<ArgumentId>),
}

impl Selection {
    pub fn argument_ids(&self) -> &[ArgumentId] {
        match self {
            Selection::Arguments(ids) => ids,
            _ => &[],
        }
    }

    pub fn contains_argument(&self, id: ArgumentId) -> bool {
        self.argument_ids().contains(&id)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct DragState {
    pub anchor: ArgumentId,
    pub last: Pos2,
}

#[derive(Clone, Debug)]
pub struct Board {
    pub agenda: String,
    pub centers: Vec<Center>,
    pub aspects: Vec<Aspect>,
    pub selection: Selection,
    pub drag: Option<DragState>,
    pub view: Vec2,
    next_center: u64,
    next_argument: u64,
    next_aspect: u64,
}

impl Board {
    pub(crate) fn empty(view: Vec2) -> Self {
        Self {
            agenda: String::new(),
            centers: Vec::new(),
            aspects: Vec::new(),
            selection: Selection::None,
            drag: None,
            view,
            next_center: 0,
            next_argument: 0,
            next_aspect: 0,
        }
    }

    pub fn new(view: Vec2) -> Self {
        let mut board = Self::empty(view);
        board.spawn_center("Do it".to_owned(), pos2(view.x / 3.0, view.y / 2.0));
        board.spawn_center(
            "Don't do it".to_owned(),
            pos2(view.x * 2.0 / 3.0, view.y / 2.0),
        );
        board
    }

    pub(crate) fn alloc_center_id(&mut self) -> CenterId {
        self.next_center += 1;
        CenterId(self.next_center)
    }

    pub(crate) fn alloc_argument_id(&mut self) -> ArgumentId {
        self.next_argument += 1;
        ArgumentId(self.next_argument)
    }

    pub(crate) fn alloc_aspect_id(&mut self) -> AspectId {
        self.next_aspect += 1;
        AspectId(self.next_aspect)
    }

    fn spawn_center(&mut self, label: String, pos: Pos2) -> CenterId {
        let id = self.alloc_center_id();
        self.centers.push(Center {
            id,
            pos,
            vel: Vec2::ZERO,
            coef: 0,
            label,
            arguments: Vec::new(),
            z: 100,
            size: DEFAULT_NODE_SIZE,
        });
        id
    }

    pub fn center(&self, id: CenterId) -> Option<&Center> {
        self.centers.iter().find(|center| center.id == id)
    }

    pub fn center_mut(&mut self, id: CenterId) -> Option<&mut Center> {
        self.centers.iter_mut().find(|center| center.id == id)
    }

    pub(crate) fn locate(&self, id: ArgumentId) -> Option<(usize, usize)> {
        for (ci, center) in self.centers.iter().enumerate() {
            for (ai, argument) in center.arguments.iter().enumerate() {
                if argument.id == id {
                    return Some((ci, ai));
                }
            }
        }
        None
    }

    pub fn argument(&self, id: ArgumentId) -> Option<&Argument> {
        self.centers
            .iter()
            .flat_map(|center| center.arguments.iter())
            .find(|argument| argument.id == id)
    }

    pub fn argument_mut(&mut self, id: ArgumentId) -> Option<&mut Argument> {
        self.centers
            .iter_mut()
            .flat_map(|center| center.arguments.iter_mut())
            .find(|argument| argument.id == id)
    }

    pub fn owner_of(&self, id: ArgumentId) -> Option<CenterId> {
        self.centers
            .iter()
            .find(|center| center.arguments.iter().any(|argument| argument.id == id))
            .map(|center| center.id)
    }

    pub fn aspect(&self, id: AspectId) -> Option<&Aspect> {
        self.aspects.iter().find(|aspect| aspect.id == id)
    }

    pub fn aspect_mut(&mut self, id: AspectId) -> Option<&mut Aspect> {
        self.aspects.iter_mut().find(|aspect| aspect.id == id)
    }

    pub fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.centers.iter().flat_map(|center| center.arguments.iter())
    }

    pub fn add_center(&mut self) -> CenterId {
        let label = format!("Option {}", self.centers.len() + 1);
        let id = self.spawn_center(label, pos2(0.0, self.view.y / 2.0));
        self.redistribute_centers();
        log::info!("added option {id:?}");
        id
    }

    pub fn delete_center(&mut self, id: CenterId) -> bool {
        if self.centers.len() <= 1 {
            log::warn!("refusing to delete the last option");
            return false;
        }
        let Some(index) = self.centers.iter().position(|center| center.id == id) else {
            return false;
        };

        let orphaned: Vec<ArgumentId> = self.centers[index]
            .arguments
            .iter()
            .map(|argument| argument.id)
            .collect();
        for argument_id in &orphaned {
            self.detach_from_aspect(*argument_id);
        }

        let removed = self.centers.remove(index);
        log::info!(
            "deleted option {:?} ({} arguments)",
            removed.id,
            removed.arguments.len()
        );

        match &mut self.selection {
            Selection::Center(selected) if *selected == id => self.selection = Selection::None,
            Selection::Arguments(ids) => {
                ids.retain(|selected| !orphaned.contains(selected));
                if ids.is_empty() {
                    self.selection = Selection::None;
                }
            }
            _ => {}
        }
        if let Some(drag) = self.drag
            && orphaned.contains(&drag.anchor)
        {
            self.drag = None;
        }

        self.redistribute_centers();
        true
    }

    pub fn add_argument(&mut self, center_id: CenterId) -> Option<ArgumentId> {
        let id = self.alloc_argument_id();
        let Some(center) = self.center_mut(center_id) else {
            return None;
        };
        let count = center.arguments.len();
        let angle = count as f32 * GOLDEN_ANGLE;
        let pos = geometry::polar_point(center.pos, angle, LINK_LENGTH);
        center.arguments.push(Argument {
            id,
            pos,
            vel: Vec2::ZERO,
            coef: 0,
            label: format!("Argument {}", count + 1),
            angle,
            distance: LINK_LENGTH,
            aspect: None,
            z: 10 + count as i32,
            size: DEFAULT_NODE_SIZE,
        });
        Some(id)
    }

    pub fn delete_arguments(&mut self, ids: &[ArgumentId]) {
        for &id in ids {
            self.detach_from_aspect(id);
            if let Some((ci, ai)) = self.locate(id) {
                self.centers[ci].arguments.remove(ai);
            }
            if let Some(drag) = self.drag
                && drag.anchor == id
            {
                self.drag = None;
            }
        }
    }

    pub fn detach_from_aspect(&mut self, id: ArgumentId) {
        let Some(aspect_id) = self.argument(id).and_then(|argument| argument.aspect) else {
            return;
        };
        if let Some(aspect) = self.aspect_mut(aspect_id) {
            aspect.members.retain(|member| *member != id);
        }
        if let Some(argument) = self.argument_mut(id) {
            argument.aspect = None;
        }

        let undersized = self
            .aspect(aspect_id)
            .is_some_and(|aspect| aspect.members.len() < 2);
        if undersized {
            let survivors = self
                .aspect(aspect_id)
                .map(|aspect| aspect.members.clone())
                .unwrap_or_default();
            self.aspects.retain(|aspect| aspect.id != aspect_id);
            for survivor in survivors {
                if let Some(argument) = self.argument_mut(survivor) {
                    argument.aspect = None;
                }
                self.refresh_polar(survivor);
            }
            log::info!("dissolved undersized aspect {aspect_id:?}");
        }
    }

    pub fn refresh_polar(&mut self, id: ArgumentId) {
        let Some((ci, ai)) = self.locate(id) else {
            return;
        };
        let origin = self.centers[ci].pos;
        let argument = &mut self.centers[ci].arguments[ai];
        let (angle, distance) = geometry::polar_offset(origin, argument.pos);
        argument.angle = angle;
        argument.distance = distance;
    }

    pub fn redistribute_centers(&mut self) {
        let spacing = self.view.x / (self.centers.len() + 1) as f32;
        for (index, center) in self.centers.iter_mut().enumerate() {
            center.pos.x = spacing * (index + 1) as f32;
            center.pos.y = self.view.y / 2.0;
        }
    }

    pub fn set_label(&mut self, target: EntityRef, label: String) {
        match target {
            EntityRef::Center(id) => {
                if let Some(center) = self.center_mut(id) {
                    center.label = label;
                }
            }
            EntityRef::Argument(id) => {
                if let Some(argument) = self.argument_mut(id) {
                    argument.label = label;
                }
            }
        }
    }

    pub fn entity_pos(&self, target: EntityRef) -> Option<Pos2> {
        match target {
            EntityRef::Center(id) => self.center(id).map(|center| center.pos),
            EntityRef::Argument(id) => self.argument(id).map(|argument| argument.pos),
        }
    }

    pub fn entity_label(&self, target: EntityRef) -> Option<&str> {
        match target {
            EntityRef::Center(id) => self.center(id).map(|center| center.label.as_str()),
            EntityRef::Argument(id) => self.argument(id).map(|argument| argument.label.as_str()),
        }
    }

    pub fn sum_coef(&self, ids: &[ArgumentId]) -> i32 {
        ids.iter()
            .filter_map(|id| self.argument(*id))
            .map(|argument| argument.coef)
            .sum()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub(crate) fn board_with(view: Vec2, arguments_per_center: &[usize]) -> Board {
        let mut board = Board::empty(view);
        for (index, count) in arguments_per_center.iter().enumerate() {
            let label = format!("Option {}", index + 1);
            let id = board.spawn_center(label, pos2(0.0, view.y / 2.0));
            for _ in 0..*count {
                board.add_argument(id);
            }
        }
        board.redistribute_centers();
        board
    }
}
