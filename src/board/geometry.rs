use eframe::egui::{Pos2, Vec2, pos2};

pub fn point_in_box(point: Pos2, center: Pos2, size: Vec2) -> bool {
    let delta = point - center;
    delta.x.abs() < size.x / 2.0 && delta.y.abs() < size.y / 2.0
}

pub fn polar_offset(origin: Pos2, point: Pos2) -> (f32, f32) {
    let delta = point - origin;
    (delta.y.atan2(delta.x), delta.length())
}

pub fn polar_point(origin: Pos2, angle: f32, distance: f32) -> Pos2 {
    pos2(
        origin.x + angle.cos() * distance,
        origin.y + angle.sin() * distance,
    )
}

pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let back = -2.0 * t + 2.0;
        1.0 - back * back * back / 2.0
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    #[test]
    fn point_in_box_uses_half_extents() {
        let center = pos2(100.0, 100.0);
        let size = vec2(60.0, 40.0);
        assert!(point_in_box(pos2(100.0, 100.0), center, size));
        assert!(point_in_box(pos2(129.0, 119.0), center, size));
        assert!(!point_in_box(pos2(131.0, 100.0), center, size));
        assert!(!point_in_box(pos2(100.0, 121.0), center, size));
    }

    #[test]
    fn polar_round_trip() {
        let origin = pos2(50.0, 80.0);
        let point = pos2(-30.0, 140.0);
        let (angle, distance) = polar_offset(origin, point);
        let back = polar_point(origin, angle, distance);
        assert!((back.x - point.x).abs() < 1e-3);
        assert!((back.y - point.y).abs() < 1e-3);
    }

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
        assert!(ease_in_out_cubic(0.25) < 0.25);
        assert!(ease_in_out_cubic(0.75) > 0.75);
    }
}
