use eframe::egui::{Color32, Vec2, vec2};

pub(super) const MIN_NODE_SIZE: Vec2 = vec2(60.0, 40.0);
pub(super) const MAX_NODE_SIZE: Vec2 = vec2(220.0, 120.0);
pub(super) const NODE_PADDING: f32 = 14.0;
pub(super) const NODE_CORNER: f32 = 10.0;

pub(super) const SELECTION_STROKE: Color32 = Color32::WHITE;
pub(super) const ASPECT_STROKE: Color32 = Color32::from_rgb(246, 206, 104);
pub(super) const ASPECT_SELECTION_STROKE: Color32 = Color32::from_rgb(106, 198, 255);

pub(super) fn center_color(coef: i32) -> Color32 {
    if coef > 2 {
        Color32::from_rgb(0x4c, 0xff, 0x4c)
    } else if coef > 0 {
        Color32::from_rgb(0x3c, 0xa0, 0x3c)
    } else if coef == 0 {
        Color32::from_rgb(0x4a, 0x4a, 0x4a)
    } else if coef > -2 {
        Color32::from_rgb(0xa0, 0x4c, 0x4c)
    } else {
        Color32::from_rgb(0xff, 0x4c, 0x4c)
    }
}

pub(super) fn argument_color(coef: i32) -> Color32 {
    if coef > 0 {
        let level = (0x33 + 0x11 * (coef.min(5) - 1)) as u8;
        Color32::from_rgb(0, level, 0)
    } else if coef < 0 {
        let level = (0x33 + 0x11 * ((-coef).min(5) - 1)) as u8;
        Color32::from_rgb(level, 0, 0)
    } else {
        Color32::from_rgb(0x33, 0x33, 0x33)
    }
}

pub(super) fn node_size(text: Vec2) -> Vec2 {
    vec2(
        (text.x + NODE_PADDING * 2.0).clamp(MIN_NODE_SIZE.x, MAX_NODE_SIZE.x),
        (text.y + NODE_PADDING * 2.0).clamp(MIN_NODE_SIZE.y, MAX_NODE_SIZE.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_ramp_darkens_toward_zero() {
        assert_eq!(argument_color(0), Color32::from_rgb(0x33, 0x33, 0x33));
        assert_eq!(argument_color(1), Color32::from_rgb(0, 0x33, 0));
        assert_eq!(argument_color(5), Color32::from_rgb(0, 0x77, 0));
        assert_eq!(argument_color(-1), Color32::from_rgb(0x33, 0, 0));
        assert_eq!(argument_color(-5), Color32::from_rgb(0x77, 0, 0));
    }

    #[test]
    fn node_size_is_padded_and_clamped() {
        assert_eq!(node_size(vec2(10.0, 10.0)), MIN_NODE_SIZE);
        assert_eq!(node_size(vec2(100.0, 20.0)), vec2(128.0, 48.0));
        assert_eq!(node_size(vec2(500.0, 300.0)), MAX_NODE_SIZE);
    }
}
