use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::{
    ast::Identifier,
    query_tree::{
        ArrayJoinNode, ColumnNode, ConstantNode, FunctionNode, LambdaNode, ListNode, NodeId, QueryTreeError,
        QueryTreeNode, QueryTreeResult, TableNode, TreeNode, WeakNodeRef,
    },
    types::DataType,
};

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    /// Number of parent child slots holding this node.
    owners: u32,
    node: Option<QueryTreeNode>,
}

/// Arena owning every node of a query tree.
///
/// A node is owned by the parent slots that hold its id. `add` inserts a
/// detached node (no owners) and takes ownership of the children already set
/// on it. Destroying a node releases its children, and a child left without
/// owners is destroyed as well. Weak references never count as owners.
///
/// Nodes are read through shared references only. Child slots change through
/// `set_child` and `set_column_expression`, and local state through the
/// `set_*` methods, so owner counts always match the parent slots.
///
/// ```compile_fail
/// use qtree::{query_tree::TableNode, QueryTree};
///
/// let mut tree = QueryTree::new();
/// let table = tree.add(TableNode::new("default", "t")).unwrap();
/// *tree.get_mut(table).unwrap() = TableNode::new("default", "other").into();
/// ```
#[derive(Debug)]
pub struct QueryTree {
    tree_id: Uuid,
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl Default for QueryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryTree {
    pub fn new() -> Self {
        Self {
            tree_id: Uuid::new_v4(),
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn tree_id(&self) -> Uuid {
        self.tree_id
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    pub fn upgrade(&self, weak: WeakNodeRef) -> Option<NodeId> {
        weak.upgrade(self)
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        if id.tree_id() != self.tree_id {
            return None;
        }
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation() && slot.node.is_some())
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        if id.tree_id() != self.tree_id {
            return None;
        }
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation() && slot.node.is_some())
    }

    fn invalid_node(&self, id: NodeId) -> QueryTreeError {
        if id.tree_id() != self.tree_id {
            QueryTreeError::logical(format!("Node {} belongs to another query tree", id))
        } else {
            QueryTreeError::logical(format!("Node {} is no longer valid", id))
        }
    }

    pub fn get(&self, id: NodeId) -> QueryTreeResult<&QueryTreeNode> {
        self.slot(id)
            .and_then(|slot| slot.node.as_ref())
            .ok_or_else(|| self.invalid_node(id))
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> QueryTreeResult<&mut QueryTreeNode> {
        self.live_slot_mut(id)?
            .node
            .as_mut()
            .ok_or_else(|| QueryTreeError::logical(format!("Node {} is no longer valid", id)))
    }

    /// How many parent slots currently own `id`.
    pub fn owners(&self, id: NodeId) -> QueryTreeResult<u32> {
        self.slot(id).map(|slot| slot.owners).ok_or_else(|| self.invalid_node(id))
    }

    /// Insert a detached node and take ownership of its children.
    pub fn add(&mut self, node: impl Into<QueryTreeNode>) -> QueryTreeResult<NodeId> {
        let node = node.into();
        for child in node.children().iter().flatten() {
            if !self.contains(*child) {
                return QueryTreeError::logical(format!(
                    "Child {} of new {} node is not a valid node",
                    child,
                    node.node_type()
                ))
                .err();
            }
        }
        node.validate(self)?;

        let children: Vec<NodeId> = node.children().iter().flatten().copied().collect();
        let node_type = node.node_type();
        let id = self.insert(node);
        for child in children {
            self.acquire(child)?;
        }

        trace!(node = %id, node_type = %node_type, "added query tree node");
        Ok(id)
    }

    pub(crate) fn insert(&mut self, node: QueryTreeNode) -> NodeId {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                slot.owners = 0;
                NodeId::new(self.tree_id, index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, owners: 0, node: Some(node) });
                NodeId::new(self.tree_id, index, 0)
            }
        }
    }

    fn live_slot_mut(&mut self, id: NodeId) -> QueryTreeResult<&mut Slot> {
        if !self.contains(id) {
            return Err(self.invalid_node(id));
        }
        self.slot_mut(id)
            .ok_or_else(|| QueryTreeError::logical(format!("Node {} is no longer valid", id)))
    }

    fn acquire(&mut self, id: NodeId) -> QueryTreeResult<()> {
        let slot = self.live_slot_mut(id)?;
        slot.owners += 1;
        Ok(())
    }

    fn release(&mut self, id: NodeId) -> QueryTreeResult<()> {
        let slot = self.live_slot_mut(id)?;
        if slot.owners == 0 {
            return QueryTreeError::logical(format!("Node {} has no owner to release", id)).err();
        }
        slot.owners -= 1;
        if slot.owners == 0 {
            self.destroy(id);
        }
        Ok(())
    }

    fn destroy(&mut self, id: NodeId) {
        let mut to_destroy = vec![id];
        while let Some(id) = to_destroy.pop() {
            let Some(slot) = self.slot_mut(id) else {
                continue;
            };
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            slot.owners = 0;
            self.free.push(id.index());
            self.len -= 1;
            trace!(node = %id, node_type = %node.node_type(), "destroyed query tree node");

            for child in node.children().iter().flatten() {
                if let Some(child_slot) = self.slot_mut(*child) {
                    child_slot.owners = child_slot.owners.saturating_sub(1);
                    if child_slot.owners == 0 {
                        to_destroy.push(*child);
                    }
                }
            }
        }
    }

    /// Destroy a detached node together with every child it solely owns.
    ///
    /// Weak references to destroyed nodes stay in place and fail when
    /// dereferenced.
    pub fn remove(&mut self, id: NodeId) -> QueryTreeResult<()> {
        let owners = self.owners(id)?;
        if owners > 0 {
            return QueryTreeError::logical(format!(
                "Cannot remove node {}: it is still owned by {} parent slot(s)",
                id, owners
            ))
            .err();
        }
        self.destroy(id);
        Ok(())
    }

    /// Replace child slot `index` of `parent`. The previous child is released.
    pub fn set_child(&mut self, parent: NodeId, index: usize, child: Option<NodeId>) -> QueryTreeResult<()> {
        let parent_node = self.get(parent)?;
        let children_size = parent_node.children().len();
        if index >= children_size {
            return QueryTreeError::logical(format!(
                "{} node {} has {} child slot(s), index {} is out of range",
                parent_node.node_type(),
                parent,
                children_size,
                index
            ))
            .err();
        }

        if let Some(child) = child {
            if !self.contains(child) {
                return Err(self.invalid_node(child));
            }
            if self.subtree_contains(child, parent)? {
                return QueryTreeError::logical(format!(
                    "Attaching node {} under {} would create an ownership cycle",
                    child, parent
                ))
                .err();
            }
            self.acquire(child)?;
        }

        let previous = std::mem::replace(&mut self.get_mut(parent)?.children_mut()[index], child);
        if let Some(previous) = previous {
            self.release(previous)?;
        }
        Ok(())
    }

    /// Set or clear the expression of a column node.
    pub fn set_column_expression(&mut self, column: NodeId, expression: Option<NodeId>) -> QueryTreeResult<()> {
        let column_node = self.column(column)?;
        if expression.is_none() && column_node.column_source_weak().upgrade(self).is_none() {
            warn!(column = %column, "column without expression would be left without a valid source");
            return QueryTreeError::logical(format!(
                "Column '{}' without expression must have a valid column source",
                column_node.column_name()
            ))
            .err();
        }
        self.set_child(column, ColumnNode::EXPRESSION_CHILD_INDEX, expression)
    }

    /// Whether `target` is `root` or one of its owned descendants.
    pub fn subtree_contains(&self, root: NodeId, target: NodeId) -> QueryTreeResult<bool> {
        let mut to_visit = vec![root];
        while let Some(id) = to_visit.pop() {
            if id == target {
                return Ok(true);
            }
            to_visit.extend(self.get(id)?.children().iter().flatten().copied());
        }
        Ok(false)
    }

    /// Refine the type of a column node.
    pub fn set_column_type(&mut self, column: NodeId, column_type: DataType) -> QueryTreeResult<()> {
        self.column_mut(column)?.set_column_type(column_type);
        Ok(())
    }

    pub fn set_display_identifier(&mut self, column: NodeId, display_identifier: Identifier) -> QueryTreeResult<()> {
        self.column_mut(column)?.set_display_identifier(display_identifier);
        Ok(())
    }

    pub fn set_table_alias(&mut self, table: NodeId, alias: Option<String>) -> QueryTreeResult<()> {
        self.table_mut(table)?.set_alias(alias);
        Ok(())
    }

    pub fn set_function_result_type(
        &mut self,
        function: NodeId,
        result_type: Option<DataType>,
    ) -> QueryTreeResult<()> {
        self.function_mut(function)?.set_result_type(result_type);
        Ok(())
    }

    /// Destroy every node of `created` left without owners, keeping `pinned`
    /// nodes alive even when a destroyed node was their only owner.
    pub(crate) fn discard_detached(&mut self, created: &[NodeId], pinned: &[NodeId]) {
        for id in pinned {
            if let Some(slot) = self.slot_mut(*id) {
                slot.owners += 1;
            }
        }
        for id in created {
            if self.owners(*id).is_ok_and(|owners| owners == 0) {
                self.destroy(*id);
            }
        }
        for id in pinned {
            if let Some(slot) = self.slot_mut(*id) {
                slot.owners -= 1;
            }
        }
        debug!(created = created.len(), pinned = pinned.len(), "discarded detached query tree nodes");
    }
}

macro_rules! typed_accessors {
    ($($get:ident, $as_ref:ident, $ty:ty, $tag:literal;)*) => {
        impl QueryTree {
            $(
                pub fn $get(&self, id: NodeId) -> QueryTreeResult<&$ty> {
                    let node = self.get(id)?;
                    node.$as_ref().ok_or_else(|| {
                        QueryTreeError::logical(format!("Expected {} node, got {} for {}", $tag, node.node_type(), id))
                    })
                }
            )*
        }
    };
}

macro_rules! typed_mut_accessors {
    ($($get_mut:ident, $as_mut:ident, $ty:ty, $tag:literal;)*) => {
        impl QueryTree {
            $(
                fn $get_mut(&mut self, id: NodeId) -> QueryTreeResult<&mut $ty> {
                    let node = self.get_mut(id)?;
                    let node_type = node.node_type();
                    node.$as_mut().ok_or_else(|| {
                        QueryTreeError::logical(format!("Expected {} node, got {} for {}", $tag, node_type, id))
                    })
                }
            )*
        }
    };
}

typed_accessors! {
    column, as_column, ColumnNode, "COLUMN";
    constant, as_constant, ConstantNode, "CONSTANT";
    function, as_function, FunctionNode, "FUNCTION";
    list, as_list, ListNode, "LIST";
    lambda, as_lambda, LambdaNode, "LAMBDA";
    table, as_table, TableNode, "TABLE";
    array_join, as_array_join, ArrayJoinNode, "ARRAY_JOIN";
}

typed_mut_accessors! {
    column_mut, as_column_mut, ColumnNode, "COLUMN";
    function_mut, as_function_mut, FunctionNode, "FUNCTION";
    table_mut, as_table_mut, TableNode, "TABLE";
}
