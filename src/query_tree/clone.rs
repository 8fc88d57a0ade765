use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use crate::query_tree::{NodeId, QueryTree, QueryTreeError, QueryTreeResult, TreeNode};

/// Nodes to substitute during a clone: old node -> node to use instead.
pub type ReplacementMap = IndexMap<NodeId, NodeId>;

/// Weak reference slot of a freshly cloned node that may need repointing.
#[derive(Debug, Clone, Copy)]
struct PointerToUpdate {
    node: NodeId,
    slot: usize,
    old_target: NodeId,
}

impl QueryTree {
    /// Deep copy of the subtree at `root`. The copy is detached.
    ///
    /// Weak references to nodes inside the subtree are redirected to their
    /// copies. Weak references to nodes outside of it keep pointing at the
    /// original node. A node owned twice within the subtree is copied once and
    /// stays shared in the copy.
    pub fn clone_subtree(&mut self, root: NodeId) -> QueryTreeResult<NodeId> {
        self.clone_and_replace(root, &ReplacementMap::new())
    }

    /// Like [`QueryTree::clone_subtree`], but nodes found in `replacements`
    /// are not copied: their replacement is attached in their place, and weak
    /// references to them are redirected to the replacement.
    pub fn clone_and_replace(&mut self, root: NodeId, replacements: &ReplacementMap) -> QueryTreeResult<NodeId> {
        for replacement in replacements.values() {
            if !self.contains(*replacement) {
                return QueryTreeError::logical(format!("Replacement node {} is not a valid node", replacement)).err();
            }
        }

        let subtree = self.collect_clone_subtree(root, replacements)?;
        debug!(root = %root, nodes = subtree.len(), replacements = replacements.len(), "cloning query tree subtree");

        let mut old_to_new: IndexMap<NodeId, NodeId> = IndexMap::new();
        let mut created: Vec<NodeId> = Vec::new();
        let mut pointers_to_update: Vec<PointerToUpdate> = Vec::new();
        let result = self
            .duplicate(root, replacements, &mut old_to_new, &mut created, &mut pointers_to_update)
            .and_then(|new_root| {
                self.repoint(&subtree, &old_to_new, &pointers_to_update)?;
                Ok(new_root)
            });

        let new_root = match result {
            Ok(new_root) => new_root,
            Err(error) => {
                let pinned: Vec<NodeId> = replacements.values().copied().collect();
                self.discard_detached(&created, &pinned);
                return Err(error);
            }
        };

        debug!(root = %root, new_root = %new_root, cloned = old_to_new.len(), repointed = pointers_to_update.len(), "cloned query tree subtree");
        Ok(new_root)
    }

    /// Old nodes that take part in the clone: owned descendants of `root`,
    /// without descending below replaced nodes.
    fn collect_clone_subtree(&self, root: NodeId, replacements: &ReplacementMap) -> QueryTreeResult<IndexSet<NodeId>> {
        let mut subtree = IndexSet::new();
        let mut to_visit = vec![root];
        while let Some(id) = to_visit.pop() {
            if !subtree.insert(id) || replacements.contains_key(&id) {
                continue;
            }
            to_visit.extend(self.get(id)?.children().iter().flatten().copied());
        }
        Ok(subtree)
    }

    /// Copy every owned node, recording old -> new ids, the copies made and
    /// the weak slots of the copies. Weak references still hold their old
    /// targets afterwards.
    fn duplicate(
        &mut self,
        root: NodeId,
        replacements: &ReplacementMap,
        old_to_new: &mut IndexMap<NodeId, NodeId>,
        created: &mut Vec<NodeId>,
        pointers_to_update: &mut Vec<PointerToUpdate>,
    ) -> QueryTreeResult<NodeId> {
        let mut new_root = None;
        let mut nodes_to_clone: Vec<(NodeId, Option<(NodeId, usize)>)> = vec![(root, None)];

        while let Some((old, place)) = nodes_to_clone.pop() {
            let new = match (old_to_new.get(&old), replacements.get(&old)) {
                (Some(new), _) => *new,
                (None, Some(replacement)) => {
                    old_to_new.insert(old, *replacement);
                    *replacement
                }
                (None, None) => {
                    let old_node = self.get(old)?;
                    let children: Vec<(usize, NodeId)> = old_node
                        .children()
                        .iter()
                        .enumerate()
                        .filter_map(|(slot, child)| child.map(|child| (slot, child)))
                        .collect();
                    let copy = old_node.clone_impl();
                    let weak_targets: Vec<(usize, NodeId)> = copy
                        .weak_pointers()
                        .iter()
                        .enumerate()
                        .filter_map(|(slot, pointer)| pointer.id().map(|target| (slot, target)))
                        .collect();

                    let new = self.insert(copy);
                    created.push(new);
                    old_to_new.insert(old, new);
                    pointers_to_update.extend(
                        weak_targets
                            .into_iter()
                            .map(|(slot, old_target)| PointerToUpdate { node: new, slot, old_target }),
                    );
                    for (slot, child) in children.into_iter().rev() {
                        nodes_to_clone.push((child, Some((new, slot))));
                    }
                    new
                }
            };

            match place {
                Some((parent, slot)) => self.set_child(parent, slot, Some(new))?,
                None => new_root = Some(new),
            }
        }

        new_root.ok_or_else(|| QueryTreeError::logical(format!("Clone of node {} produced no root", root)))
    }

    /// Redirect weak references whose target was part of the cloned subtree.
    fn repoint(
        &mut self,
        subtree: &IndexSet<NodeId>,
        old_to_new: &IndexMap<NodeId, NodeId>,
        pointers_to_update: &[PointerToUpdate],
    ) -> QueryTreeResult<()> {
        for pointer in pointers_to_update {
            if !subtree.contains(&pointer.old_target) {
                trace!(node = %pointer.node, target = %pointer.old_target, "weak reference points outside of cloned subtree, keeping it");
                continue;
            }
            // `duplicate` copies every node of `subtree`, so a miss here means
            // the two walks disagree.
            let new_target = old_to_new.get(&pointer.old_target).copied().ok_or_else(|| {
                QueryTreeError::logical(format!(
                    "Node {} was cloned but has no copy to repoint {} to",
                    pointer.old_target, pointer.node
                ))
            })?;

            let node = self.get_mut(pointer.node)?;
            let slot = node.weak_pointers_mut().get_mut(pointer.slot).ok_or_else(|| {
                QueryTreeError::logical(format!("Node {} has no weak reference slot {}", pointer.node, pointer.slot))
            })?;
            slot.repoint(new_target);
            trace!(node = %pointer.node, from = %pointer.old_target, to = %new_target, "repointed weak reference");
        }
        Ok(())
    }
}
