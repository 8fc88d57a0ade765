use indexmap::IndexMap;

use crate::query_tree::{NodeId, QueryTree, QueryTreeResult, TreeHash, TreeHashState, TreeNode};

impl QueryTree {
    /// Structural equality of two subtrees of this tree.
    pub fn is_equal(&self, lhs: NodeId, rhs: NodeId) -> QueryTreeResult<bool> {
        QueryTree::is_equal_across(self, lhs, self, rhs)
    }

    /// Structural equality of `lhs` in `lhs_tree` and `rhs` in `rhs_tree`.
    ///
    /// Both subtrees are walked as pairs, following owned children and live
    /// weak references in slot order. Each visited pair is recorded in a
    /// one-to-one correspondence: a pair seen before is accepted without
    /// walking it again, and a node already paired with a different partner
    /// makes the trees unequal. Column sources therefore compare by position:
    /// two columns match when their sources are corresponding nodes, whether
    /// that is the same node of one tree or a node and its copy.
    pub fn is_equal_across(lhs_tree: &QueryTree, lhs: NodeId, rhs_tree: &QueryTree, rhs: NodeId) -> QueryTreeResult<bool> {
        let mut lhs_to_rhs: IndexMap<NodeId, NodeId> = IndexMap::new();
        let mut rhs_to_lhs: IndexMap<NodeId, NodeId> = IndexMap::new();
        let mut nodes_to_compare = vec![(lhs, rhs)];

        while let Some((lhs, rhs)) = nodes_to_compare.pop() {
            match (lhs_to_rhs.get(&lhs), rhs_to_lhs.get(&rhs)) {
                (Some(paired), Some(_)) if *paired == rhs => continue,
                (None, None) => {}
                _ => return Ok(false),
            }

            let lhs_node = lhs_tree.get(lhs)?;
            let rhs_node = rhs_tree.get(rhs)?;
            if lhs_node.node_type() != rhs_node.node_type() || !lhs_node.is_equal_impl(rhs_node) {
                return Ok(false);
            }

            let lhs_children = lhs_node.children();
            let rhs_children = rhs_node.children();
            if lhs_children.len() != rhs_children.len() {
                return Ok(false);
            }
            for (lhs_child, rhs_child) in lhs_children.iter().zip(rhs_children) {
                match (lhs_child, rhs_child) {
                    (Some(lhs_child), Some(rhs_child)) => nodes_to_compare.push((*lhs_child, *rhs_child)),
                    (None, None) => {}
                    _ => return Ok(false),
                }
            }

            let lhs_weak = lhs_node.weak_pointers();
            let rhs_weak = rhs_node.weak_pointers();
            if lhs_weak.len() != rhs_weak.len() {
                return Ok(false);
            }
            for (lhs_pointer, rhs_pointer) in lhs_weak.iter().zip(rhs_weak) {
                match (lhs_pointer.upgrade(lhs_tree), rhs_pointer.upgrade(rhs_tree)) {
                    (Some(lhs_target), Some(rhs_target)) => nodes_to_compare.push((lhs_target, rhs_target)),
                    (None, None) => {}
                    _ => return Ok(false),
                }
            }

            lhs_to_rhs.insert(lhs, rhs);
            rhs_to_lhs.insert(rhs, lhs);
        }

        Ok(true)
    }

    /// Hash of the subtree at `root`, consistent with [`QueryTree::is_equal`].
    ///
    /// Walks the same edges in the same order as the equality check. A node
    /// reached a second time contributes only its first-visit number.
    pub fn tree_hash(&self, root: NodeId) -> QueryTreeResult<TreeHash> {
        let mut state = TreeHashState::new();
        let mut node_to_identifier: IndexMap<NodeId, usize> = IndexMap::new();
        let mut nodes_to_process = vec![root];

        while let Some(id) = nodes_to_process.pop() {
            if let Some(identifier) = node_to_identifier.get(&id) {
                state.update(identifier);
                continue;
            }
            let identifier = node_to_identifier.len();
            node_to_identifier.insert(id, identifier);

            let node = self.get(id)?;
            state.update(&node.node_type().hash_seed());
            node.update_tree_hash_impl(&mut state);

            let children = node.children();
            state.update(&children.len());
            for child in children {
                state.update(&child.is_some());
                if let Some(child) = child {
                    nodes_to_process.push(*child);
                }
            }

            let weak_pointers = node.weak_pointers();
            state.update(&weak_pointers.len());
            for pointer in weak_pointers {
                let target = pointer.upgrade(self);
                state.update(&target.is_some());
                if let Some(target) = target {
                    nodes_to_process.push(target);
                }
            }
        }

        Ok(state.finish())
    }
}
