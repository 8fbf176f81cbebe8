use super::capabilities::{Capability, CapabilityTable, NodeId};
use super::trail::ShapeTrail;
use crate::config::CursorSettings;
use crate::gfx::anim::{Ease, Tween};
use crate::gfx::math::{Rect, Vec2};
use log::debug;
use std::collections::BTreeMap;

// Velocity (px) at which the gelly stretch reaches its cap.
const STRETCH_DISTANCE: f64 = 735.0;
const MAX_STRETCH: f64 = 0.35;

/// Gelly stretch for a velocity; `None` unless both components are non-zero.
pub fn stretch(velocity: Vec2) -> Option<f64> {
    if velocity.x != 0.0 && velocity.y != 0.0 {
        Some((velocity.length() / STRETCH_DISTANCE).min(MAX_STRETCH))
    } else {
        None
    }
}

/// Direction of travel in degrees; `None` unless both components are non-zero.
pub fn heading(velocity: Vec2) -> Option<f64> {
    if velocity.x != 0.0 && velocity.y != 0.0 {
        Some(velocity.y.atan2(velocity.x).to_degrees())
    } else {
        None
    }
}

/// Everything a host needs to paint the cursor this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorFrame {
    pub position: Vec2,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub inner_rotation: f64,
    pub opacity: f64,
    pub inner_scale: f64,
    pub background: String,
    /// Colour being faded out, and how far the fade has gone (0..=1).
    pub previous_background: String,
    pub background_mix: f64,
    pub exclusion: bool,
    pub text: Option<String>,
    pub background_image: Option<String>,
    /// Translation applied to magnetic nodes that are still pulled or settling.
    pub magnets: Vec<(NodeId, Vec2)>,
    /// Trail shape positions, first shape first.
    pub trail: Vec<Vec2>,
}

struct Magnet {
    x: Tween,
    y: Tween,
}

impl Magnet {
    fn offset(&self) -> Vec2 {
        Vec2::new(self.x.value(), self.y.value())
    }
}

struct Hover {
    node: NodeId,
    capabilities: Vec<Capability>,
}

/// A pointer follower with hover effects driven by a [`CapabilityTable`].
pub struct Cursor {
    settings: CursorSettings,
    target: Vec2,
    x: Tween,
    y: Tween,
    velocity: Vec2,
    size: Tween,
    opacity: Tween,
    inner_scale: Tween,
    background: String,
    previous_background: String,
    background_fade: Tween,
    exclusion: bool,
    had_exclusion: bool,
    text: Option<String>,
    background_image: Option<String>,
    // Outermost first.
    hover: Vec<Hover>,
    magnets: BTreeMap<NodeId, Magnet>,
    trail: ShapeTrail,
}

impl Cursor {
    pub fn new(settings: CursorSettings) -> Self {
        Self {
            target: Vec2::ZERO,
            x: Tween::settled(0.0),
            y: Tween::settled(0.0),
            velocity: Vec2::ZERO,
            size: Tween::settled(settings.size),
            opacity: Tween::settled(1.0),
            inner_scale: Tween::settled(0.0),
            background: settings.background.clone(),
            previous_background: settings.background.clone(),
            background_fade: Tween::settled(1.0),
            exclusion: false,
            had_exclusion: false,
            text: None,
            background_image: None,
            hover: Vec::new(),
            magnets: BTreeMap::new(),
            trail: ShapeTrail::new(
                settings.trail_shapes,
                settings.trail_stagger,
                settings.trail_duration,
            ),
            settings,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x.value(), self.y.value())
    }

    /// The innermost hovered node.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hover.last().map(|h| h.node)
    }

    /// Every hovered node, outermost first.
    pub fn hovered_nodes(&self) -> Vec<NodeId> {
        self.hover.iter().map(|h| h.node).collect()
    }

    fn is_hovering(&self, node: NodeId) -> bool {
        self.hover.iter().any(|h| h.node == node)
    }

    pub fn pointer_move(&mut self, pos: Vec2, table: &CapabilityTable) {
        let follow = self.settings.follow_duration;
        self.target = pos;
        self.x.retarget(pos.x, follow, Ease::ExpoOut);
        self.y.retarget(pos.y, follow, Ease::ExpoOut);
        self.trail.pointer_move(pos);

        let hits: Vec<_> = table.hits(pos).collect();
        // Innermost nodes are left first, outermost nodes entered first.
        let gone: Vec<NodeId> = self
            .hover
            .iter()
            .rev()
            .filter(|h| !hits.iter().any(|b| b.node == h.node))
            .map(|h| h.node)
            .collect();
        for node in gone {
            self.leave(node);
        }
        for binding in &hits {
            if !self.is_hovering(binding.node) {
                self.enter(binding.node, binding.capabilities.clone());
            }
        }
        self.hover.sort_by_key(|h| table.position(h.node));

        for binding in &hits {
            if binding.capabilities.contains(&Capability::Magnetic) {
                self.pull(binding.node, binding.bounds, pos);
            }
        }
    }

    /// Call after the table has been re-synced so removed or changed nodes
    /// release their effects.
    pub fn sync(&mut self, table: &CapabilityTable) {
        let stale: Vec<(NodeId, Option<Vec<Capability>>)> = self
            .hover
            .iter()
            .rev()
            .filter_map(|h| match table.get(h.node) {
                None => Some((h.node, None)),
                Some(binding) if binding.capabilities != h.capabilities => {
                    Some((h.node, Some(binding.capabilities.clone())))
                }
                Some(_) => None,
            })
            .collect();
        if stale.is_empty() {
            return;
        }
        for (node, _) in &stale {
            self.leave(*node);
        }
        for (node, capabilities) in stale.into_iter().rev() {
            if let Some(capabilities) = capabilities {
                self.enter(node, capabilities);
            }
        }
        self.hover.sort_by_key(|h| table.position(h.node));
    }

    fn leave_all(&mut self) {
        while let Some(node) = self.hovered() {
            self.leave(node);
        }
    }

    pub fn pointer_entered_window(&mut self) {
        self.opacity
            .retarget(1.0, self.settings.follow_duration, Ease::ExpoOut);
    }

    pub fn pointer_left_window(&mut self) {
        self.leave_all();
        self.opacity
            .retarget(0.0, self.settings.follow_duration, Ease::ExpoOut);
    }

    fn enter(&mut self, node: NodeId, capabilities: Vec<Capability>) {
        debug!("cursor entered {:?} ({} effects)", node, capabilities.len());
        for capability in &capabilities {
            match capability {
                Capability::Size(size) => {
                    self.size
                        .retarget(*size, self.settings.size_duration, Ease::ExpoOut);
                }
                Capability::Text(text) => {
                    self.text = Some(text.clone());
                    self.inner_scale
                        .retarget(1.0, self.settings.text_duration, Ease::ExpoOut);
                }
                Capability::Color(color) => self.fade_to(color.clone()),
                Capability::BackgroundImage(url) => {
                    self.had_exclusion = self.exclusion;
                    self.exclusion = true;
                    self.background_image = Some(url.clone());
                    self.inner_scale.retarget(
                        1.0,
                        self.settings.background_image_duration,
                        Ease::None,
                    );
                }
                Capability::Exclusion => {
                    self.exclusion = true;
                    self.fade_to(self.settings.exclusion_background.clone());
                }
                Capability::Magnetic => {}
            }
        }
        self.hover.push(Hover { node, capabilities });
    }

    fn leave(&mut self, node: NodeId) {
        let Some(index) = self.hover.iter().position(|h| h.node == node) else {
            return;
        };
        let hover = self.hover.remove(index);
        debug!("cursor left {:?}", hover.node);
        for capability in &hover.capabilities {
            match capability {
                Capability::Size(_) => {
                    self.size.retarget(
                        self.settings.size,
                        self.settings.size_duration,
                        Ease::ExpoOut,
                    );
                }
                Capability::Text(_) => {
                    self.text = None;
                    self.inner_scale
                        .retarget(0.0, self.settings.text_duration, Ease::ExpoOut);
                }
                Capability::Color(_) => self.fade_to(self.settings.background.clone()),
                Capability::BackgroundImage(_) => {
                    if self.had_exclusion {
                        self.fade_to(self.settings.exclusion_background.clone());
                    } else {
                        self.exclusion = false;
                        self.fade_to(self.settings.background.clone());
                    }
                    self.background_image = None;
                    self.inner_scale.retarget(
                        0.0,
                        self.settings.background_image_duration,
                        Ease::None,
                    );
                }
                Capability::Exclusion => {
                    self.exclusion = false;
                    self.fade_to(self.settings.background.clone());
                }
                Capability::Magnetic => self.release(hover.node),
            }
        }
    }

    fn fade_to(&mut self, color: String) {
        if color == self.background {
            return;
        }
        self.previous_background = std::mem::replace(&mut self.background, color);
        self.background_fade =
            Tween::new(0.0, 1.0, self.settings.color_duration, Ease::Power4Out);
    }

    fn pull(&mut self, node: NodeId, bounds: Rect, pointer: Vec2) {
        let offset = (pointer - bounds.center()) * self.settings.magnetic_amount;
        let duration = self.settings.magnetic_duration;
        let magnet = self.magnets.entry(node).or_insert_with(|| Magnet {
            x: Tween::settled(0.0),
            y: Tween::settled(0.0),
        });
        magnet.x.retarget(offset.x, duration, Ease::Power4Out);
        magnet.y.retarget(offset.y, duration, Ease::Power4Out);
    }

    fn release(&mut self, node: NodeId) {
        let duration = self.settings.magnetic_duration;
        if let Some(magnet) = self.magnets.get_mut(&node) {
            magnet.x.retarget(0.0, duration, Ease::Power4Out);
            magnet.y.retarget(0.0, duration, Ease::Power4Out);
        }
    }

    pub fn update(&mut self, dt: f64) {
        self.x.advance(dt);
        self.y.advance(dt);
        self.velocity = self.target - self.position();
        self.size.advance(dt);
        self.opacity.advance(dt);
        self.inner_scale.advance(dt);
        self.background_fade.advance(dt);
        self.trail.update(dt);

        let hover = &self.hover;
        self.magnets.retain(|node, magnet| {
            magnet.x.advance(dt);
            magnet.y.advance(dt);
            let settled = magnet.x.is_complete() && magnet.y.is_complete();
            let hovered = hover.iter().any(|h| h.node == *node);
            !(settled && magnet.offset() == Vec2::ZERO && !hovered)
        });
    }

    pub fn frame(&self) -> CursorFrame {
        let size = self.size.value();
        let gelly = self.settings.gelly;
        let (width, rotation, scale_x, scale_y, inner_rotation) =
            match (stretch(self.velocity), heading(self.velocity)) {
                (Some(scale), Some(angle)) if gelly => (
                    size + scale * self.settings.gelly_amount,
                    angle,
                    1.0 + scale,
                    1.0 - scale,
                    -angle,
                ),
                _ => (size, 0.0, 1.0, 1.0, 0.0),
            };

        CursorFrame {
            position: self.position(),
            width,
            height: size,
            rotation,
            scale_x,
            scale_y,
            inner_rotation,
            opacity: self.opacity.value(),
            inner_scale: self.inner_scale.value(),
            background: self.background.clone(),
            previous_background: self.previous_background.clone(),
            background_mix: self.background_fade.value(),
            exclusion: self.exclusion,
            text: self.text.clone(),
            background_image: self.background_image.clone(),
            magnets: self
                .magnets
                .iter()
                .map(|(node, magnet)| (*node, magnet.offset()))
                .collect(),
            trail: self.trail.positions(),
        }
    }
}
