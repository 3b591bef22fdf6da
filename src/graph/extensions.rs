use crate::graph::{mix::DryWet, node::GraphNode, through::Through};

pub trait NodeExt: GraphNode + Sized {
    fn through<F: GraphNode>(self, effect: F) -> Through<Self, F> {
        Through::new(self, effect)
    }

    fn dry_wet<W: GraphNode>(self, wet: W, wet_fraction: f32) -> DryWet<Self, W> {
        DryWet::new(self, wet, wet_fraction)
    }
}

impl<T: GraphNode> NodeExt for T {}
