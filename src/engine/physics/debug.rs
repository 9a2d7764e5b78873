// In-process physics debugger: per-step capture of contacts and scene queries,
// plus wireframe geometry of every collider for an external renderer.

use crate::core::math::{from_point, from_vector, to_point};
use crate::engine::config::DebuggerConfig;
use glam::Vec3;
use rapier3d::prelude::*;
use std::collections::VecDeque;

/// Contact between two named actors, as captured by the debugger
#[derive(Debug, Clone, PartialEq)]
pub struct ContactRecord {
    pub started: bool,
    pub first: String,
    pub second: String,
}

/// A ray cast and its outcome
#[derive(Debug, Clone, PartialEq)]
pub struct SceneQueryRecord {
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_distance: f32,
    /// Name of the actor hit and distance along the ray
    pub hit: Option<(String, f32)>,
}

/// Everything captured during one simulation step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugFrame {
    pub step: u64,
    pub contacts: Vec<ContactRecord>,
    pub queries: Vec<SceneQueryRecord>,
}

/// Bounded history of debug frames
#[derive(Debug)]
pub struct DebugRecorder {
    config: DebuggerConfig,
    frames: VecDeque<DebugFrame>,
}

impl DebugRecorder {
    pub fn new(config: DebuggerConfig) -> Self {
        if config.enabled {
            log::info!(
                "Physics debugger capturing (contacts: {}, scene queries: {}, history: {})",
                config.transmit_contacts,
                config.transmit_scene_queries,
                config.history
            );
        }
        Self {
            config,
            frames: VecDeque::with_capacity(config.history.max(1)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Whether contact events are being recorded
    pub fn captures_contacts(&self) -> bool {
        self.config.enabled && self.config.transmit_contacts
    }

    pub fn record_contacts(&mut self, step: u64, contacts: Vec<ContactRecord>) {
        if !self.captures_contacts() || contacts.is_empty() {
            return;
        }
        self.frame_mut(step).contacts.extend(contacts);
    }

    pub fn record_query(&mut self, step: u64, query: SceneQueryRecord) {
        if !self.config.enabled || !self.config.transmit_scene_queries {
            return;
        }
        self.frame_mut(step).queries.push(query);
    }

    /// Captured frames, oldest first
    pub fn frames(&self) -> impl Iterator<Item = &DebugFrame> {
        self.frames.iter()
    }

    pub fn latest(&self) -> Option<&DebugFrame> {
        self.frames.back()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    fn frame_mut(&mut self, step: u64) -> &mut DebugFrame {
        let is_current = self.frames.back().map(|f| f.step == step).unwrap_or(false);
        if !is_current {
            let capacity = self.config.history.max(1);
            while self.frames.len() >= capacity {
                self.frames.pop_front();
            }
            self.frames.push_back(DebugFrame {
                step,
                ..DebugFrame::default()
            });
        }
        // A frame for `step` was just ensured
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DebugVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

const DYNAMIC_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 0.8];
const SLEEPING_COLOR: [f32; 4] = [0.0, 0.4, 0.0, 0.8];
const FIXED_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 0.8];
const KINEMATIC_COLOR: [f32; 4] = [0.0, 0.5, 1.0, 0.8];
const ORPHAN_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.8];

const CIRCLE_SEGMENTS: u32 = 16;

/// Half size of the square drawn for an infinite plane
const PLANE_EXTENT: f32 = 10.0;

/// Line-list wireframe of all colliders in a world
#[derive(Debug, Default, Clone)]
pub struct DebugLines {
    vertices: Vec<DebugVertex>,
    indices: Vec<u32>,
}

impl DebugLines {
    /// Build wireframes for every collider, colored by body type
    pub fn from_world(bodies: &RigidBodySet, colliders: &ColliderSet) -> Self {
        let mut lines = Self::default();

        for (_handle, collider) in colliders.iter() {
            let parent = collider.parent().and_then(|h| bodies.get(h));
            let color = match parent {
                Some(body) => match body.body_type() {
                    RigidBodyType::Dynamic if body.is_sleeping() => SLEEPING_COLOR,
                    RigidBodyType::Dynamic => DYNAMIC_COLOR,
                    RigidBodyType::Fixed => FIXED_COLOR,
                    RigidBodyType::KinematicPositionBased
                    | RigidBodyType::KinematicVelocityBased => KINEMATIC_COLOR,
                },
                None => ORPHAN_COLOR,
            };
            lines.draw_shape(collider.shape(), collider.position(), color);
        }

        lines
    }

    pub fn vertices(&self) -> &[DebugVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertex data ready for a GPU upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn line_count(&self) -> usize {
        self.indices.len() / 2
    }

    fn draw_shape(&mut self, shape: &dyn Shape, pose: &Isometry<Real>, color: [f32; 4]) {
        if let Some(cuboid) = shape.as_cuboid() {
            self.draw_box(pose, cuboid.half_extents, color);
        } else if let Some(ball) = shape.as_ball() {
            self.draw_sphere(pose, ball.radius, color);
        } else if let Some(plane) = shape.as_halfspace() {
            self.draw_plane(pose, from_vector(&plane.normal), color);
        } else {
            self.draw_cross(pose, 0.5, color);
        }
    }

    fn push_vertex(&mut self, pose: &Isometry<Real>, local: Vec3, color: [f32; 4]) -> u32 {
        let world = from_point(&(pose * to_point(local)));
        self.vertices.push(DebugVertex {
            position: world.to_array(),
            color,
        });
        (self.vertices.len() - 1) as u32
    }

    fn draw_box(&mut self, pose: &Isometry<Real>, half: Vector<Real>, color: [f32; 4]) {
        let start = self.vertices.len() as u32;
        for i in 0..8u32 {
            let corner = Vec3::new(
                if i & 1 == 0 { -half.x } else { half.x },
                if i & 2 == 0 { -half.y } else { half.y },
                if i & 4 == 0 { -half.z } else { half.z },
            );
            self.push_vertex(pose, corner, color);
        }

        // Corners differing in exactly one bit share an edge
        for a in 0..8u32 {
            for bit in [1u32, 2, 4] {
                let b = a | bit;
                if b != a {
                    self.indices.extend_from_slice(&[start + a, start + b]);
                }
            }
        }
    }

    fn draw_sphere(&mut self, pose: &Isometry<Real>, radius: Real, color: [f32; 4]) {
        // One great circle per principal plane
        let planes = [(Vec3::X, Vec3::Y), (Vec3::Y, Vec3::Z), (Vec3::Z, Vec3::X)];
        for (u, v) in planes {
            let start = self.vertices.len() as u32;
            for i in 0..CIRCLE_SEGMENTS {
                let angle = (i as f32 / CIRCLE_SEGMENTS as f32) * std::f32::consts::TAU;
                let local = (u * angle.cos() + v * angle.sin()) * radius;
                self.push_vertex(pose, local, color);

                let next = (i + 1) % CIRCLE_SEGMENTS;
                self.indices.extend_from_slice(&[start + i, start + next]);
            }
        }
    }

    /// A square patch of the plane around the body origin plus its normal
    fn draw_plane(&mut self, pose: &Isometry<Real>, normal: Vec3, color: [f32; 4]) {
        let (u, v) = normal.any_orthonormal_pair();
        let corners = [u + v, u - v, -u - v, -u + v].map(|c| self.push_vertex(pose, c * PLANE_EXTENT, color));
        for i in 0..4 {
            self.indices.extend_from_slice(&[corners[i], corners[(i + 1) % 4]]);
        }

        let base = self.push_vertex(pose, Vec3::ZERO, color);
        let tip = self.push_vertex(pose, normal, color);
        self.indices.extend_from_slice(&[base, tip]);
    }

    fn draw_cross(&mut self, pose: &Isometry<Real>, size: Real, color: [f32; 4]) {
        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            let a = self.push_vertex(pose, -axis * size, color);
            let b = self.push_vertex(pose, axis * size, color);
            self.indices.extend_from_slice(&[a, b]);
        }
    }
}
