use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::{
    query_tree::{NodeId, NodeType, QueryTree, QueryTreeError, QueryTreeResult, TreeNode},
    types::DataType,
};

/// Numbers nodes in the order a dump first mentions them, so a column's
/// `source_id` matches the `id` printed for its source.
#[derive(Debug, Default)]
pub struct FormatState {
    node_to_id: IndexMap<NodeId, usize>,
}

impl FormatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_id(&mut self, node: NodeId) -> usize {
        let next_id = self.node_to_id.len() + 1;
        *self.node_to_id.entry(node).or_insert(next_id)
    }
}

/// Structured dump of a subtree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeDump {
    pub id: usize,
    pub node_type: NodeType,
    pub name: String,
    pub result_type: Option<DataType>,
    /// Dump ids of weak reference targets, `None` when dangling or empty.
    pub weak_references: Vec<Option<usize>>,
    pub children: Vec<NodeDump>,
}

impl QueryTree {
    /// Indented text dump of the subtree at `root`, one line per node.
    pub fn dump_tree(&self, root: NodeId) -> QueryTreeResult<String> {
        let mut buffer = String::new();
        let mut state = FormatState::new();
        self.dump_tree_into(root, &mut buffer, &mut state, 0)?;
        Ok(buffer)
    }

    pub fn dump_tree_into(
        &self,
        id: NodeId,
        buffer: &mut String,
        state: &mut FormatState,
        indent: usize,
    ) -> QueryTreeResult<()> {
        self.get(id)?.dump_tree_impl(id, self, buffer, state, indent)
    }

    pub fn dump_node(&self, root: NodeId) -> QueryTreeResult<NodeDump> {
        let mut state = FormatState::new();
        self.dump_node_with_state(root, &mut state)
    }

    fn dump_node_with_state(&self, id: NodeId, state: &mut FormatState) -> QueryTreeResult<NodeDump> {
        let node = self.get(id)?;
        let dump_id = state.node_id(id);
        let weak_references = node
            .weak_pointers()
            .iter()
            .map(|pointer| pointer.upgrade(self).map(|target| state.node_id(target)))
            .collect();
        let children = node
            .children()
            .iter()
            .flatten()
            .map(|child| self.dump_node_with_state(*child, state))
            .collect::<QueryTreeResult<Vec<_>>>()?;

        Ok(NodeDump {
            id: dump_id,
            node_type: node.node_type(),
            name: node.name(),
            result_type: node.result_type(),
            weak_references,
            children,
        })
    }

    /// JSON form of [`QueryTree::dump_node`].
    pub fn dump_tree_json(&self, root: NodeId) -> QueryTreeResult<Value> {
        let dump = self.dump_node(root)?;
        serde_json::to_value(&dump)
            .map_err(|err| QueryTreeError::logical(format!("Cannot serialize dump of node {}: {}", root, err)))
    }
}
