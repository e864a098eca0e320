//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::color::Rgba;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Rgba) -> Self {
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
    use crate::color::{Rgba, hex};

    /// Pipe palette, indexed by `Obstacle::color`
    pub const PIPES: [Rgba; 4] = [hex(0x228b22), hex(0x32cd32), hex(0x006400), hex(0x90ee90)];
    pub const PIPE_HIGHLIGHT: Rgba = [1.0, 1.0, 1.0, 0.3];
    pub const PIPE_SHADOW: Rgba = [0.0, 0.0, 0.0, 0.3];
    pub const CLOUD: Rgba = [1.0, 1.0, 1.0, 0.3];

    pub const SPEED: Rgba = hex(0x00ffff);
    pub const SHIELD: Rgba = hex(0xffff00);
    pub const POINTS: Rgba = hex(0xff00ff);

    pub const CLASSIC: Rgba = hex(0xffff00);
    pub const BEAK: Rgba = hex(0xff8800);
    pub const FIRE: Rgba = hex(0xff4500);
    pub const ICE: Rgba = hex(0x87ceeb);
    pub const ELECTRIC: Rgba = hex(0xffff00);
    pub const SHIELD_RING: Rgba = hex(0xffff00);
}
