//! Platform abstraction layer
//!
//! The core never draws anything. It talks to the presentation side through:
//! - `Presenter`: add/remove visual nodes bound to layout rectangles
//! - `Viewport`: unproject screen pixels into layout coordinates

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{APP_HEIGHT, APP_WIDTH};

/// Axis-aligned rectangle in layout coordinates (origin bottom-left, y up)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive on the min edges, exclusive on the max edges
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Screen-to-layout conversion
pub trait Viewport {
    /// Convert screen pixels (origin top-left, y down) to layout coordinates
    fn unproject(&self, screen_x: f32, screen_y: f32) -> Vec2;

    /// Layout size the unprojected coordinates live in
    fn layout_size(&self) -> Vec2;
}

/// Stretches the fixed layout over the whole screen, ignoring aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StretchViewport {
    pub layout: Vec2,
    pub screen: Vec2,
}

impl Default for StretchViewport {
    fn default() -> Self {
        let size = Vec2::new(APP_WIDTH, APP_HEIGHT);
        Self {
            layout: size,
            screen: size,
        }
    }
}

impl StretchViewport {
    pub fn new(layout: Vec2, screen: Vec2) -> Self {
        Self { layout, screen }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.screen = Vec2::new(width, height);
    }
}

impl Viewport for StretchViewport {
    fn unproject(&self, screen_x: f32, screen_y: f32) -> Vec2 {
        let sx = self.layout.x / self.screen.x;
        let sy = self.layout.y / self.screen.y;
        Vec2::new(screen_x * sx, (self.screen.y - screen_y) * sy)
    }

    fn layout_size(&self) -> Vec2 {
        self.layout
    }
}

/// Handle for a node added to the presenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Everything the core asks the presentation side to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Background,
    Ground,
    Runner,
    Enemy,
    Score,
    GameLabel,
    AboutLabel,
    PausedLabel,
    TutorialLeft,
    TutorialRight,
    StartButton,
    LeaderboardButton,
    AboutButton,
    ShareButton,
    AchievementsButton,
    PauseButton,
    SoundButton,
    MusicButton,
}

/// Scene-graph side of the presentation layer
pub trait Presenter {
    /// Remove every node
    fn clear(&mut self);

    fn add_node(&mut self, node: Node, bounds: Rect) -> NodeId;

    fn remove_node(&mut self, id: NodeId);
}

/// Presenter that only hands out ids (headless runs)
#[derive(Debug, Default)]
pub struct NullPresenter {
    next_id: u32,
}

impl Presenter for NullPresenter {
    fn clear(&mut self) {}

    fn add_node(&mut self, _node: Node, _bounds: Rect) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    fn remove_node(&mut self, _id: NodeId) {}
}

/// One presenter call, in the order it was made
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresenterOp {
    Clear,
    Add(Node, NodeId),
    Remove(NodeId),
}

/// Presenter that keeps the live node set in memory
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    next_id: u32,
    nodes: Vec<(NodeId, Node, Rect)>,
    /// Number of `clear` calls
    pub clears: u32,
    /// Every call since creation
    pub ops: Vec<PresenterOp>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes of the given kind
    pub fn count(&self, node: Node) -> usize {
        self.nodes.iter().filter(|(_, n, _)| *n == node).count()
    }

    pub fn contains(&self, node: Node) -> bool {
        self.count(node) > 0
    }

    pub fn bounds_of(&self, node: Node) -> Option<Rect> {
        self.nodes
            .iter()
            .find(|(_, n, _)| *n == node)
            .map(|(_, _, r)| *r)
    }

    /// Position of the first logged call matching `op`
    pub fn op_index(&self, op: PresenterOp) -> Option<usize> {
        self.ops.iter().position(|o| *o == op)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Presenter for RecordingPresenter {
    fn clear(&mut self) {
        self.nodes.clear();
        self.clears += 1;
        self.ops.push(PresenterOp::Clear);
    }

    fn add_node(&mut self, node: Node, bounds: Rect) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.push((id, node, bounds));
        self.ops.push(PresenterOp::Add(node, id));
        id
    }

    fn remove_node(&mut self, id: NodeId) {
        self.nodes.retain(|(nid, _, _)| *nid != id);
        self.ops.push(PresenterOp::Remove(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(r.contains(Vec2::new(10.0, 20.0)));
        assert!(r.contains(Vec2::new(39.9, 59.9)));
        assert!(!r.contains(Vec2::new(40.0, 30.0)));
        assert!(!r.contains(Vec2::new(9.9, 30.0)));
    }

    #[test]
    fn test_stretch_viewport_flips_y() {
        let vp = StretchViewport::new(Vec2::new(800.0, 480.0), Vec2::new(1600.0, 960.0));
        let p = vp.unproject(0.0, 0.0);
        assert_eq!(p, Vec2::new(0.0, 480.0));
        let p = vp.unproject(1600.0, 960.0);
        assert_eq!(p, Vec2::new(800.0, 0.0));
        let p = vp.unproject(400.0, 480.0);
        assert_eq!(p, Vec2::new(200.0, 240.0));
    }

    #[test]
    fn test_recording_presenter_tracks_nodes() {
        let mut p = RecordingPresenter::new();
        let a = p.add_node(Node::Enemy, Rect::new(0.0, 0.0, 1.0, 1.0));
        p.add_node(Node::Enemy, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(p.count(Node::Enemy), 2);
        p.remove_node(a);
        assert_eq!(p.count(Node::Enemy), 1);
        p.clear();
        assert!(p.is_empty());
        assert_eq!(p.clears, 1);
        assert_eq!(p.op_index(PresenterOp::Remove(a)), Some(2));
        assert_eq!(p.ops.last(), Some(&PresenterOp::Clear));
    }
}
