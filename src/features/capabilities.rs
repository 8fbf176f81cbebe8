//! Declarative cursor capabilities.
//!
//! Host nodes opt into cursor effects through `data-cursor-*` attributes.
//! Instead of wiring enter/leave handlers per node, the host hands the table a
//! fresh snapshot after every DOM mutation and the table reports what changed.

use crate::gfx::math::{Rect, Vec2};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Capability {
    /// Cursor diameter in px while hovering.
    Size(f64),
    Text(String),
    Color(String),
    BackgroundImage(String),
    Magnetic,
    Exclusion,
}

type Parser = fn(&str) -> Option<Capability>;

/// Attribute name and how to read its value, in the order effects apply.
pub const CAPABILITIES: &[(&str, Parser)] = &[
    ("data-cursor-size", parse_size),
    ("data-cursor-text", parse_text),
    ("data-cursor-color", parse_color),
    ("data-cursor-background-image", parse_background_image),
    ("data-cursor-magnetic", parse_magnetic),
    ("data-cursor-exclusion", parse_exclusion),
];

fn parse_size(value: &str) -> Option<Capability> {
    let size = value.trim().trim_end_matches("px").trim().parse::<f64>().ok()?;
    (size.is_finite() && size >= 0.0).then_some(Capability::Size(size))
}

fn parse_text(value: &str) -> Option<Capability> {
    Some(Capability::Text(value.to_string()))
}

fn parse_color(value: &str) -> Option<Capability> {
    let value = value.trim();
    (!value.is_empty()).then(|| Capability::Color(value.to_string()))
}

fn parse_background_image(value: &str) -> Option<Capability> {
    let value = value.trim();
    (!value.is_empty()).then(|| Capability::BackgroundImage(value.to_string()))
}

// Boolean attributes: present means on, unless explicitly "false".
fn parse_magnetic(value: &str) -> Option<Capability> {
    (value.trim() != "false").then_some(Capability::Magnetic)
}

fn parse_exclusion(value: &str) -> Option<Capability> {
    (value.trim() != "false").then_some(Capability::Exclusion)
}

pub fn capabilities_of(attributes: &BTreeMap<String, String>) -> Vec<Capability> {
    CAPABILITIES
        .iter()
        .filter_map(|(name, parse)| attributes.get(*name).and_then(|value| parse(value)))
        .collect()
}

/// One element as the host sees it after layout.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub bounds: Rect,
    pub attributes: BTreeMap<String, String>,
}

impl NodeSnapshot {
    pub fn new(id: u64, bounds: Rect) -> Self {
        Self {
            id: NodeId(id),
            bounds,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub node: NodeId,
    pub bounds: Rect,
    pub capabilities: Vec<Capability>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableChange {
    Bound {
        node: NodeId,
        capabilities: Vec<Capability>,
    },
    Rebound {
        node: NodeId,
        capabilities: Vec<Capability>,
    },
    Unbound {
        node: NodeId,
    },
}

#[derive(Debug, Clone, Default)]
pub struct CapabilityTable {
    // Document order; later entries paint on top.
    bindings: Vec<Binding>,
}

impl CapabilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn get(&self, node: NodeId) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.node == node)
    }

    /// Document-order position of a bound node.
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.bindings.iter().position(|b| b.node == node)
    }

    /// Replaces the bindings with those found in `nodes` and reports the
    /// difference. Bounds are refreshed silently.
    pub fn sync(&mut self, nodes: &[NodeSnapshot]) -> Vec<TableChange> {
        let mut next: Vec<Binding> = Vec::with_capacity(nodes.len());
        let mut changes = Vec::new();

        for node in nodes {
            if next.iter().any(|b| b.node == node.id) {
                continue;
            }
            let capabilities = capabilities_of(&node.attributes);
            if capabilities.is_empty() {
                continue;
            }
            match self.get(node.id) {
                None => changes.push(TableChange::Bound {
                    node: node.id,
                    capabilities: capabilities.clone(),
                }),
                Some(old) if old.capabilities != capabilities => {
                    changes.push(TableChange::Rebound {
                        node: node.id,
                        capabilities: capabilities.clone(),
                    })
                }
                Some(_) => {}
            }
            next.push(Binding {
                node: node.id,
                bounds: node.bounds,
                capabilities,
            });
        }

        for old in &self.bindings {
            if !next.iter().any(|b| b.node == old.node) {
                changes.push(TableChange::Unbound { node: old.node });
            }
        }

        self.bindings = next;
        changes
    }

    /// The top-most bound node under `pos`.
    pub fn hit(&self, pos: Vec2) -> Option<&Binding> {
        self.bindings.iter().rev().find(|b| b.bounds.contains(pos))
    }

    /// Every bound node under `pos`, outermost first.
    pub fn hits(&self, pos: Vec2) -> impl Iterator<Item = &Binding> + '_ {
        self.bindings.iter().filter(move |b| b.bounds.contains(pos))
    }
}
