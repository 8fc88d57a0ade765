use std::fmt;

use uuid::Uuid;

use crate::query_tree::QueryTree;

/// Handle to a node stored in a [`QueryTree`].
///
/// The generation changes whenever a slot is freed, so a handle to a destroyed
/// node never resolves to whatever reuses the slot later. The tree id keeps
/// handles from one tree from resolving in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    tree_id: Uuid,
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) fn new(tree_id: Uuid, index: u32, generation: u32) -> Self {
        Self { tree_id, index, generation }
    }

    pub fn tree_id(&self) -> Uuid {
        self.tree_id
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Non-owning reference to a node.
///
/// Holding a `WeakNodeRef` never keeps its target alive. Use
/// [`WeakNodeRef::upgrade`] to check that the target still exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeakNodeRef(Option<NodeId>);

impl WeakNodeRef {
    pub fn new(id: NodeId) -> Self {
        Self(Some(id))
    }

    pub fn empty() -> Self {
        Self(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Raw target, live or not.
    pub fn id(&self) -> Option<NodeId> {
        self.0
    }

    /// Target id if it is still alive in `tree`.
    pub fn upgrade(&self, tree: &QueryTree) -> Option<NodeId> {
        self.0.filter(|id| tree.contains(*id))
    }

    pub(crate) fn repoint(&mut self, id: NodeId) {
        self.0 = Some(id);
    }
}

impl From<NodeId> for WeakNodeRef {
    fn from(id: NodeId) -> Self {
        WeakNodeRef::new(id)
    }
}
