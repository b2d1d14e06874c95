//! Turns a game state snapshot into a triangle list
//!
//! Purely a function of the snapshot: nothing here feeds back into the
//! simulation.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::WING_FLAP_TICKS;
use crate::sim::{GameState, Rect, SimConfig, character_box, pipe_segments};

/// Pipe lip overhang and height
const LIP_OVERHANG: f32 = 4.0;
const LIP_HEIGHT: f32 = 12.0;
const GROUND_EDGE: f32 = 4.0;

/// Wing angles in degrees
const WING_UP: f32 = -45.0;
const WING_REST: f32 = 15.0;

/// Build all scene vertices (back to front); the sky is the clear color
pub fn build(state: &GameState, config: &SimConfig) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(256);

    for obstacle in &state.obstacles {
        let [top, bottom] = pipe_segments(obstacle, config);
        vertices.extend(shapes::rect(&top, colors::PIPE));
        vertices.extend(shapes::rect(&bottom, colors::PIPE));

        let lip_x = obstacle.x - LIP_OVERHANG;
        let lip_w = config.pipe_width + LIP_OVERHANG * 2.0;
        let top_lip = Rect::new(lip_x, top.max().y - LIP_HEIGHT, lip_w, LIP_HEIGHT);
        let bottom_lip = Rect::new(lip_x, bottom.min.y, lip_w, LIP_HEIGHT);
        vertices.extend(shapes::rect(&top_lip, colors::PIPE_LIP));
        vertices.extend(shapes::rect(&bottom_lip, colors::PIPE_LIP));
    }

    let floor_y = config.floor_y();
    vertices.extend(shapes::rect(
        &Rect::new(0.0, floor_y, config.game_width, config.ground_height),
        colors::GROUND,
    ));
    vertices.extend(shapes::rect(
        &Rect::new(0.0, floor_y, config.game_width, GROUND_EDGE),
        colors::GROUND_EDGE,
    ));

    pig(&mut vertices, state, config);
    vertices
}

/// Pig drawn in a 60x48 local space stretched over its nominal box
fn pig(vertices: &mut Vec<Vertex>, state: &GameState, config: &SimConfig) {
    let bounds = character_box(state.character_y, config);
    let scale = bounds.size / Vec2::new(60.0, 48.0);
    let local = |x: f32, y: f32| bounds.min + Vec2::new(x, y) * scale;
    let pivot = bounds.center();
    let tilt = state.rotation;

    let ellipse = |vertices: &mut Vec<Vertex>, x, y, rx, ry, color, segments| {
        let radii = Vec2::new(rx, ry) * scale;
        vertices.extend(shapes::ellipse(local(x, y), radii, pivot, tilt, color, segments));
    };

    ellipse(vertices, 30.0, 24.0, 22.0, 16.0, colors::PIG_BODY, 24);
    ellipse(vertices, 50.0, 24.0, 8.0, 6.0, colors::PIG_SNOUT, 12);
    ellipse(vertices, 38.0, 18.0, 4.0, 5.0, colors::EYE_WHITE, 10);
    ellipse(vertices, 39.0, 18.0, 1.5, 1.5, colors::EYE_PUPIL, 8);

    let wing_angle = if state.wing_raised(WING_FLAP_TICKS) {
        WING_UP
    } else {
        WING_REST
    };
    let root = local(28.0, 25.0);
    let wing = [root, local(6.0, 14.0), local(28.0, 8.0)]
        .map(|p| shapes::rotate_about(p, root, wing_angle));
    vertices.extend(shapes::triangle(wing, pivot, tilt, colors::PIG_WING));
}
