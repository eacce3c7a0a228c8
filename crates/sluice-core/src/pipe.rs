//! The [`Pipe`] entity: the flow-state portion of a directed edge.
//!
//! Rendering geometry (polyline routing, colors, stroke widths) lives
//! in the scene crate keyed by [`PipeId`](crate::PipeId); the core only
//! tracks whether the edge carried flow during the most recent tick.

/// Flow indicator for one directed edge of the network.
///
/// The flag reflects only the most recently completed tick: the engine
/// resets it to false at the start of every tick and sets it true only
/// if that tick moved liquid along the edge (subject to the documented
/// guard-passes boundary quirk).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pipe {
    flowing: bool,
}

impl Pipe {
    /// A pipe that is not currently flowing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flow indicator. Pure state setter, idempotent.
    pub fn set_flowing(&mut self, flowing: bool) {
        self.flowing = flowing;
    }

    /// Whether the most recently completed tick moved liquid along
    /// this edge.
    pub fn is_flowing(&self) -> bool {
        self.flowing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pipe_is_not_flowing() {
        assert!(!Pipe::new().is_flowing());
    }

    #[test]
    fn set_flowing_is_idempotent() {
        let mut pipe = Pipe::new();
        pipe.set_flowing(true);
        pipe.set_flowing(true);
        assert!(pipe.is_flowing());
        pipe.set_flowing(false);
        pipe.set_flowing(false);
        assert!(!pipe.is_flowing());
    }
}
