//! Shape generation for 2D primitives
//!
//! All shapes are emitted as triangle lists in playfield coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let min = rect.min;
    let max = rect.max();
    if rect.size.x <= 0.0 || rect.size.y <= 0.0 {
        return Vec::new();
    }
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Rotate `point` around `pivot` by `degrees` (clockwise on screen, y down)
pub fn rotate_about(point: Vec2, pivot: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = point - pivot;
    pivot + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Generate vertices for a filled ellipse, rotated around `pivot`
pub fn ellipse(
    center: Vec2,
    radii: Vec2,
    pivot: Vec2,
    degrees: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    let c = rotate_about(center, pivot, degrees);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        let p1 = center + Vec2::new(radii.x * theta1.cos(), radii.y * theta1.sin());
        let p2 = center + Vec2::new(radii.x * theta2.cos(), radii.y * theta2.sin());
        let p1 = rotate_about(p1, pivot, degrees);
        let p2 = rotate_about(p2, pivot, degrees);

        // Triangle from center to edge
        vertices.push(Vertex::new(c.x, c.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }

    vertices
}

/// Generate vertices for a triangle, rotated around `pivot`
pub fn triangle(points: [Vec2; 3], pivot: Vec2, degrees: f32, color: [f32; 4]) -> Vec<Vertex> {
    points
        .iter()
        .map(|&p| {
            let p = rotate_about(p, pivot, degrees);
            Vertex::new(p.x, p.y, color)
        })
        .collect()
}
