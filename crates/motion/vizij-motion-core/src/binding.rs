//! Target resolution: name → mutable node transform.
//!
//! The host owns its scene graph. The engine only needs a way to look up a
//! node's transform by name, which is what [`TargetResolver`] provides.
//! [`NodeIndex`] is a ready-made resolver built from a [`SceneNode`] tree.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Local transform of a scene node. Rotation is Euler XYZ in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeTransform {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

/// Trait for resolving target names to node transforms.
/// Adapters implement this and hand it to `MotionEngine::new`.
pub trait TargetResolver {
    fn resolve(&mut self, target: &str) -> Option<&mut NodeTransform>;
}

impl TargetResolver for HashMap<String, NodeTransform> {
    fn resolve(&mut self, target: &str) -> Option<&mut NodeTransform> {
        self.get_mut(target)
    }
}

/// Minimal scene-graph node used to build a [`NodeIndex`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub transform: NodeTransform,
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_transform(mut self, transform: NodeTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Clone, Debug)]
struct IndexedNode {
    current: NodeTransform,
    rest: NodeTransform,
}

/// Name-indexed node transforms plus the rest pose each node had when indexed.
#[derive(Clone, Debug, Default)]
pub struct NodeIndex {
    nodes: HashMap<String, IndexedNode>,
}

impl NodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every named node in `root`, depth first. On duplicate names the
    /// node visited last wins. Unnamed and empty-named nodes are skipped.
    pub fn from_scene(root: &SceneNode) -> Self {
        let mut index = Self::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if let Some(name) = node.name.as_deref().filter(|n| !n.is_empty()) {
                index.insert(name, node.transform);
            }
            // Reverse so children are visited in declaration order.
            stack.extend(node.children.iter().rev());
        }
        index
    }

    /// Register (or replace) a node; `transform` also becomes its rest pose.
    pub fn insert(&mut self, name: impl Into<String>, transform: NodeTransform) {
        self.nodes.insert(
            name.into(),
            IndexedNode {
                current: transform,
                rest: transform,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&NodeTransform> {
        self.nodes.get(name).map(|n| &n.current)
    }

    pub fn rest_pose(&self, name: &str) -> Option<&NodeTransform> {
        self.nodes.get(name).map(|n| &n.rest)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Put every node back to its rest pose.
    pub fn reset_to_rest(&mut self) {
        for node in self.nodes.values_mut() {
            node.current = node.rest;
        }
    }
}

impl TargetResolver for NodeIndex {
    fn resolve(&mut self, target: &str) -> Option<&mut NodeTransform> {
        self.nodes.get_mut(target).map(|n| &mut n.current)
    }
}
