use crate::gfx::anim::{Ease, Tween};
use crate::gfx::math::Vec2;
use std::collections::VecDeque;

struct Shape {
    x: Tween,
    y: Tween,
    /// Targets waiting for this shape's stagger delay, oldest first.
    pending: VecDeque<(f64, Vec2)>,
}

/// A chain of shapes chasing the pointer. Every move sends each shape
/// toward the pointer; the last shape leaves at once and each earlier one
/// `stagger` seconds after the one behind it.
pub struct ShapeTrail {
    shapes: Vec<Shape>,
    stagger: f64,
    duration: f64,
}

impl ShapeTrail {
    pub fn new(count: usize, stagger: f64, duration: f64) -> Self {
        let shapes = (0..count)
            .map(|_| Shape {
                x: Tween::settled(0.0),
                y: Tween::settled(0.0),
                pending: VecDeque::new(),
            })
            .collect();
        Self {
            shapes,
            stagger: stagger.max(0.0),
            duration,
        }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        let last = self.shapes.len().saturating_sub(1);
        let (stagger, duration) = (self.stagger, self.duration);
        for (i, shape) in self.shapes.iter_mut().enumerate() {
            let delay = (last - i) as f64 * stagger;
            if delay <= 0.0 {
                shape.x.retarget(pos.x, duration, Ease::Power2Out);
                shape.y.retarget(pos.y, duration, Ease::Power2Out);
            } else {
                shape.pending.push_back((delay, pos));
            }
        }
    }

    pub fn update(&mut self, dt: f64) {
        let duration = self.duration;
        for shape in &mut self.shapes {
            for (delay, _) in shape.pending.iter_mut() {
                *delay -= dt;
            }
            while let Some(&(delay, target)) = shape.pending.front() {
                if delay > 0.0 {
                    break;
                }
                shape.pending.pop_front();
                shape.x.retarget(target.x, duration, Ease::Power2Out);
                shape.y.retarget(target.y, duration, Ease::Power2Out);
            }
            shape.x.advance(dt);
            shape.y.advance(dt);
        }
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.shapes
            .iter()
            .map(|shape| Vec2::new(shape.x.value(), shape.y.value()))
            .collect()
    }
}
