//! Collision detection between the pig and the pipes
//!
//! Everything is an axis-aligned rectangle in playfield space (y down).

use glam::Vec2;

use super::config::SimConfig;
use super::state::Obstacle;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Shrink (or grow) around the center
    pub fn scaled(&self, factor: f32) -> Self {
        let size = self.size * factor;
        Self {
            min: self.center() - size * 0.5,
            size,
        }
    }

    /// Strict overlap test; rectangles that only touch do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Nominal pig box at the given vertical position
pub fn character_box(character_y: f32, config: &SimConfig) -> Rect {
    Rect::new(config.pig_x, character_y, config.pig_width, config.pig_height)
}

/// Pig hitbox: the nominal box shrunk around its center
pub fn character_hitbox(character_y: f32, config: &SimConfig) -> Rect {
    character_box(character_y, config).scaled(config.hitbox_scale)
}

/// Top and bottom pipe segments of an obstacle
pub fn pipe_segments(obstacle: &Obstacle, config: &SimConfig) -> [Rect; 2] {
    let half_gap = config.pipe_gap_height / 2.0;
    let gap_top = obstacle.gap_center_y - half_gap;
    let gap_bottom = obstacle.gap_center_y + half_gap;
    [
        Rect::new(obstacle.x, 0.0, config.pipe_width, gap_top.max(0.0)),
        Rect::new(
            obstacle.x,
            gap_bottom,
            config.pipe_width,
            (config.floor_y() - gap_bottom).max(0.0),
        ),
    ]
}

/// Does the pig at `character_y` touch either segment of `obstacle`?
pub fn hits_obstacle(character_y: f32, obstacle: &Obstacle, config: &SimConfig) -> bool {
    let hitbox = character_hitbox(character_y, config);
    pipe_segments(obstacle, config)
        .iter()
        .any(|segment| hitbox.overlaps(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn pipe_at(x: f32, gap_center_y: f32) -> Obstacle {
        Obstacle {
            id: 1,
            x,
            gap_center_y,
            scored: false,
        }
    }

    #[test]
    fn test_hitbox_is_centered() {
        let config = SimConfig::default();
        let nominal = character_box(100.0, &config);
        let hitbox = character_hitbox(100.0, &config);
        assert!(hitbox.center().distance(nominal.center()) < 1e-4);
        assert!((hitbox.size.x - PIG_WIDTH * HITBOX_SCALE).abs() < 1e-4);
        assert!((hitbox.size.y - PIG_HEIGHT * HITBOX_SCALE).abs() < 1e-4);
        assert!((hitbox.min.x - (PIG_X + PIG_WIDTH * 0.1)).abs() < 1e-4);
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Rect::new(9.9, 9.9, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_segments_frame_the_gap() {
        let config = SimConfig::default();
        let [top, bottom] = pipe_segments(&pipe_at(200.0, 260.0), &config);
        assert_eq!(top.min.y, 0.0);
        assert_eq!(top.max().y, 260.0 - PIPE_GAP_HEIGHT / 2.0);
        assert_eq!(bottom.min.y, 260.0 + PIPE_GAP_HEIGHT / 2.0);
        assert_eq!(bottom.max().y, config.floor_y());
        assert_eq!(top.size.x, PIPE_WIDTH);
    }

    #[test]
    fn test_pig_inside_gap_is_safe() {
        let config = SimConfig::default();
        // Pig centered on the gap, pipe directly over it
        let pipe = pipe_at(PIG_X - 10.0, 300.0);
        let y = 300.0 - PIG_HEIGHT / 2.0;
        assert!(!hits_obstacle(y, &pipe, &config));
    }

    #[test]
    fn test_pig_hits_top_and_bottom() {
        let config = SimConfig::default();
        let pipe = pipe_at(PIG_X - 10.0, 300.0);
        assert!(hits_obstacle(150.0, &pipe, &config));
        assert!(hits_obstacle(400.0, &pipe, &config));
    }

    #[test]
    fn test_hitbox_margin_forgives_graze() {
        let config = SimConfig::default();
        // Nominal box overlaps the pipe's left edge by 3px, hitbox does not
        let pipe = pipe_at(PIG_X + PIG_WIDTH - 3.0, 300.0);
        assert!(character_box(100.0, &config).overlaps(&pipe_segments(&pipe, &config)[0]));
        assert!(!hits_obstacle(100.0, &pipe, &config));
    }
}
