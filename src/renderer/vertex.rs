//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const SKY: [f32; 4] = [0.22, 0.74, 0.97, 1.0];
    pub const PIPE: [f32; 4] = [0.13, 0.70, 0.30, 1.0];
    pub const PIPE_LIP: [f32; 4] = [0.09, 0.50, 0.22, 1.0];
    pub const GROUND: [f32; 4] = [0.40, 0.64, 0.05, 1.0];
    pub const GROUND_EDGE: [f32; 4] = [0.09, 0.40, 0.20, 1.0];
    pub const PIG_BODY: [f32; 4] = [0.96, 0.45, 0.71, 1.0];
    pub const PIG_SNOUT: [f32; 4] = [0.98, 0.66, 0.83, 1.0];
    pub const PIG_WING: [f32; 4] = [0.98, 0.81, 0.91, 1.0];
    pub const EYE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const EYE_PUPIL: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}
