//! Shape generation for 2D primitives
//!
//! Everything is emitted as triangle lists in playfield pixels (y down).
//! Rotations are in degrees, clockwise on screen.

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;
use crate::color::Rgba;

fn push_quad(vertices: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [Rgba; 4]) {
    let [a, b, c, d] = corners;
    let [ca, cb, cc, cd] = colors;
    vertices.push(Vertex::new(a.x, a.y, ca));
    vertices.push(Vertex::new(b.x, b.y, cb));
    vertices.push(Vertex::new(c.x, c.y, cc));

    vertices.push(Vertex::new(c.x, c.y, cc));
    vertices.push(Vertex::new(d.x, d.y, cd));
    vertices.push(Vertex::new(a.x, a.y, ca));
}

fn on_circle(center: Vec2, radius: f32, theta: f32) -> Vec2 {
    center + radius * Vec2::from_angle(theta)
}

/// Axis-aligned filled rectangle
pub fn rect(min: Vec2, size: Vec2, color: Rgba) -> Vec<Vertex> {
    vertical_gradient(min, size, color, color)
}

/// Rectangle blending from `top` to `bottom`
pub fn vertical_gradient(min: Vec2, size: Vec2, top: Rgba, bottom: Rgba) -> Vec<Vertex> {
    let max = min + size;
    let mut vertices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)],
        [top, top, bottom, bottom],
    );
    vertices
}

/// Rectangle given in a local frame centered on `origin` and rotated with it
pub fn rotated_rect(
    origin: Vec2,
    rotation_deg: f32,
    local_min: Vec2,
    size: Vec2,
    color: Rgba,
) -> Vec<Vertex> {
    let rot = Vec2::from_angle(rotation_deg.to_radians());
    let local_max = local_min + size;
    let corners = [
        local_min,
        Vec2::new(local_max.x, local_min.y),
        local_max,
        Vec2::new(local_min.x, local_max.y),
    ]
    .map(|p| origin + rot.rotate(p));

    let mut vertices = Vec::with_capacity(6);
    push_quad(&mut vertices, corners, [color; 4]);
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgba, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let t1 = i as f32 / segments as f32 * TAU;
        let t2 = (i + 1) as f32 / segments as f32 * TAU;
        let p1 = on_circle(center, radius, t1);
        let p2 = on_circle(center, radius, t2);
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }
    vertices
}

/// Ring band; when `dashed`, every other segment is left out
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: Rgba,
    segments: u32,
    dashed: bool,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);
    for i in 0..segments {
        if dashed && i % 2 == 1 {
            continue;
        }
        let t1 = i as f32 / segments as f32 * TAU;
        let t2 = (i + 1) as f32 / segments as f32 * TAU;
        push_quad(
            &mut vertices,
            [
                on_circle(center, inner_radius, t1),
                on_circle(center, outer_radius, t1),
                on_circle(center, outer_radius, t2),
                on_circle(center, inner_radius, t2),
            ],
            [color; 4],
        );
    }
    vertices
}

/// Five-pointed star, one point up before rotation
pub fn star(center: Vec2, outer_radius: f32, inner_radius: f32, rotation_deg: f32, color: Rgba) -> Vec<Vertex> {
    const POINTS: u32 = 5;
    let start = rotation_deg.to_radians() - TAU / 4.0;
    let step = TAU / (POINTS * 2) as f32;

    let mut vertices = Vec::with_capacity((POINTS * 2 * 3) as usize);
    for i in 0..POINTS * 2 {
        let r1 = if i % 2 == 0 { outer_radius } else { inner_radius };
        let r2 = if i % 2 == 0 { inner_radius } else { outer_radius };
        let p1 = on_circle(center, r1, start + i as f32 * step);
        let p2 = on_circle(center, r2, start + (i + 1) as f32 * step);
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(p1.x, p1.y, color));
        vertices.push(Vertex::new(p2.x, p2.y, color));
    }
    vertices
}
