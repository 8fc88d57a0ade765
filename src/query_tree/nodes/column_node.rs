use tracing::warn;

use crate::{
    ast::{AstNode, ConvertToAstOptions, Identifier},
    query_tree::{
        FormatState, NodeId, NodeType, QueryTree, QueryTreeError, QueryTreeResult, TreeHashState, TreeNode,
        WeakNodeRef,
    },
    types::{DataType, NameAndTypePair},
};

const EXPRESSION_CHILD_INDEX: usize = 0;
const CHILDREN_SIZE: usize = EXPRESSION_CHILD_INDEX + 1;

/// Column reference in the query tree.
///
/// Every column has a column source: the table, lambda or array join node
/// that produces it. The source is held through a [`WeakNodeRef`] and must
/// stay alive as long as the column is used. Several columns can point to the
/// same source; none of them owns it.
///
/// Table ALIAS columns and ARRAY JOIN expression columns also own an
/// expression subtree in their single child slot.
///
/// The display identifier keeps the qualification written by the user
/// (`t1.id` in `SELECT t1.id, t2.id FROM a AS t1, b AS t2`) so conversion back
/// to syntax stays valid. It takes no part in equality, hashing or cloning
/// decisions.
#[derive(Debug, Clone)]
pub struct ColumnNode {
    column: NameAndTypePair,
    column_source: WeakNodeRef,
    display_identifier: Identifier,
    children: [Option<NodeId>; CHILDREN_SIZE],
}

impl ColumnNode {
    pub const EXPRESSION_CHILD_INDEX: usize = EXPRESSION_CHILD_INDEX;

    /// Construct column node with column name, type and column source.
    pub fn new(column: NameAndTypePair, column_source: impl Into<WeakNodeRef>) -> Self {
        Self {
            column,
            column_source: column_source.into(),
            display_identifier: Identifier::default(),
            children: [None],
        }
    }

    /// Construct expression column node with column name, type, column
    /// expression and column source.
    pub fn with_expression(
        column: NameAndTypePair,
        expression: NodeId,
        column_source: impl Into<WeakNodeRef>,
    ) -> Self {
        Self {
            column,
            column_source: column_source.into(),
            display_identifier: Identifier::default(),
            children: [Some(expression)],
        }
    }

    pub fn column(&self) -> &NameAndTypePair {
        &self.column
    }

    pub fn column_name(&self) -> &str {
        &self.column.name
    }

    pub fn column_type(&self) -> &DataType {
        &self.column.ty
    }

    /// Replace the column type. Any type is accepted; callers refining types
    /// are responsible for their correctness.
    pub fn set_column_type(&mut self, column_type: DataType) {
        self.column.ty = column_type;
    }

    pub fn display_identifier(&self) -> &Identifier {
        &self.display_identifier
    }

    /// Set the qualifier rendered in front of the column name during conversion
    /// to syntax.
    pub fn set_display_identifier(&mut self, display_identifier: Identifier) {
        self.display_identifier = display_identifier;
    }

    pub fn has_expression(&self) -> bool {
        self.children[EXPRESSION_CHILD_INDEX].is_some()
    }

    pub fn expression(&self) -> Option<NodeId> {
        self.children[EXPRESSION_CHILD_INDEX]
    }

    pub fn expression_or_err(&self) -> QueryTreeResult<NodeId> {
        self.children[EXPRESSION_CHILD_INDEX]
            .ok_or_else(|| QueryTreeError::logical(format!("Column '{}' expression is not initialized", self.column.name)))
    }

    /// Resolve the column source in `tree`.
    ///
    /// Fails if the source was destroyed; a column must never outlive it.
    pub fn column_source(&self, tree: &QueryTree) -> QueryTreeResult<NodeId> {
        match self.column_source.upgrade(tree) {
            Some(source) => Ok(source),
            None => {
                warn!(column = %self.column, source = ?self.column_source.id(), "column source is no longer valid");
                QueryTreeError::logical(format!(
                    "Column '{}' {} source is no longer valid",
                    self.column.name, self.column.ty
                ))
                .err()
            }
        }
    }

    pub fn column_source_weak(&self) -> WeakNodeRef {
        self.column_source
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Option<NodeId>] {
        &mut self.children
    }
}

impl TreeNode for ColumnNode {
    fn node_type(&self) -> NodeType {
        NodeType::Column
    }

    fn name(&self) -> String {
        self.column.name.clone()
    }

    fn result_type(&self) -> Option<DataType> {
        Some(self.column.ty.clone())
    }

    fn children(&self) -> &[Option<NodeId>] {
        &self.children
    }

    fn weak_pointers(&self) -> &[WeakNodeRef] {
        std::slice::from_ref(&self.column_source)
    }

    fn weak_pointers_mut(&mut self) -> &mut [WeakNodeRef] {
        std::slice::from_mut(&mut self.column_source)
    }

    fn is_equal_impl(&self, rhs: &Self) -> bool {
        self.column == rhs.column
    }

    fn update_tree_hash_impl(&self, state: &mut TreeHashState) {
        state.update_str(&self.column.name);
        state.update(&self.column.ty);
    }

    fn validate(&self, tree: &QueryTree) -> QueryTreeResult<()> {
        if !self.has_expression() && self.column_source.upgrade(tree).is_none() {
            return QueryTreeError::logical(format!(
                "Column '{}' without expression must have a valid column source",
                self.column.name
            ))
            .err();
        }
        Ok(())
    }

    fn dump_tree_impl(
        &self,
        id: NodeId,
        tree: &QueryTree,
        buffer: &mut String,
        state: &mut FormatState,
        indent: usize,
    ) -> QueryTreeResult<()> {
        buffer.push_str(&format!(
            "{}COLUMN id: {}, column_name: {}, result_type: {}",
            " ".repeat(indent),
            state.node_id(id),
            self.column.name,
            self.column.ty
        ));

        match self.column_source.upgrade(tree) {
            Some(source) => buffer.push_str(&format!(", source_id: {}", state.node_id(source))),
            None if !self.column_source.is_empty() => buffer.push_str(", source_id: <dangling>"),
            None => {}
        }

        if let Some(expression) = self.expression() {
            buffer.push_str(&format!("\n{}EXPRESSION\n", " ".repeat(indent + 2)));
            tree.dump_tree_into(expression, buffer, state, indent + 4)?;
        }
        Ok(())
    }

    fn to_ast_impl(&self, tree: &QueryTree, options: &ConvertToAstOptions) -> QueryTreeResult<AstNode> {
        if !self.display_identifier.is_empty() {
            let mut identifier = self.display_identifier.clone();
            identifier.push(self.column.name.clone());
            return Ok(AstNode::Identifier(identifier));
        }

        if options.fully_qualified_identifiers {
            if let Some(source) = self.column_source.upgrade(tree) {
                if let Some(table) = tree.get(source)?.as_table() {
                    let mut identifier = table.qualifier(options.qualify_with_database);
                    identifier.push(self.column.name.clone());
                    return Ok(AstNode::Identifier(identifier));
                }
            }
        }

        Ok(AstNode::Identifier(Identifier::from_parts([self.column.name.clone()])))
    }
}
