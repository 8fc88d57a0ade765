use crate::{
    ast::{AstNode, ConvertToAstOptions, Identifier},
    query_tree::{FormatState, NodeId, NodeType, QueryTree, QueryTreeResult, TreeHashState, TreeNode},
    types::DataType,
};

/// Table read by the query. Columns read from it use it as column source.
#[derive(Debug, Clone)]
pub struct TableNode {
    database: String,
    table: String,
    alias: Option<String>,
    children: [Option<NodeId>; 0],
}

impl TableNode {
    pub fn new(database: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            alias: None,
            children: [],
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn set_alias(&mut self, alias: Option<String>) {
        self.alias = alias;
    }

    /// Prefix used to qualify columns of this table: the alias when present,
    /// otherwise the table name, optionally with its database.
    pub fn qualifier(&self, with_database: bool) -> Identifier {
        match (&self.alias, with_database) {
            (Some(alias), _) => Identifier::from_parts([alias.clone()]),
            (None, true) => Identifier::from_parts([self.database.clone(), self.table.clone()]),
            (None, false) => Identifier::from_parts([self.table.clone()]),
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut [Option<NodeId>] {
        &mut self.children
    }
}

impl TreeNode for TableNode {
    fn node_type(&self) -> NodeType {
        NodeType::Table
    }

    fn name(&self) -> String {
        format!("{}.{}", self.database, self.table)
    }

    fn result_type(&self) -> Option<DataType> {
        None
    }

    fn children(&self) -> &[Option<NodeId>] {
        &self.children
    }

    fn is_equal_impl(&self, rhs: &Self) -> bool {
        self.database == rhs.database && self.table == rhs.table && self.alias == rhs.alias
    }

    fn update_tree_hash_impl(&self, state: &mut TreeHashState) {
        state.update_str(&self.database);
        state.update_str(&self.table);
        match &self.alias {
            Some(alias) => {
                state.update(&true);
                state.update_str(alias);
            }
            None => state.update(&false),
        }
    }

    fn dump_tree_impl(
        &self,
        id: NodeId,
        _tree: &QueryTree,
        buffer: &mut String,
        state: &mut FormatState,
        indent: usize,
    ) -> QueryTreeResult<()> {
        buffer.push_str(&format!(
            "{}TABLE id: {}, table_name: {}.{}",
            " ".repeat(indent),
            state.node_id(id),
            self.database,
            self.table
        ));
        if let Some(alias) = &self.alias {
            buffer.push_str(&format!(", alias: {}", alias));
        }
        Ok(())
    }

    fn to_ast_impl(&self, _tree: &QueryTree, _options: &ConvertToAstOptions) -> QueryTreeResult<AstNode> {
        Ok(AstNode::Table {
            name: Identifier::from_parts([self.database.clone(), self.table.clone()]),
            alias: self.alias.clone(),
        })
    }
}
