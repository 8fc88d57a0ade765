#[cfg(test)]
pub mod fixtures {
    use crate::{
        query_tree::{ColumnNode, ConstantNode, FunctionNode, LambdaNode, ListNode, NodeId, QueryTree, TableNode},
        types::{DataType, Literal, NameAndTypePair},
    };

    pub struct LambdaFixture {
        pub table: NodeId,
        pub lambda: NodeId,
        pub argument: NodeId,
        pub body_column: NodeId,
        pub array_column: NodeId,
        pub array_map: NodeId,
    }

    pub fn id_column() -> NameAndTypePair {
        NameAndTypePair::new("id", DataType::Int32)
    }

    /// `[table, column id from table]`
    pub fn create_table_with_column(tree: &mut QueryTree) -> (NodeId, NodeId, NodeId) {
        let table = tree.add(TableNode::new("default", "test_table")).unwrap();
        let column = tree.add(ColumnNode::new(id_column(), table)).unwrap();
        let list = tree.add(ListNode::new([table, column])).unwrap();
        (list, table, column)
    }

    /// `arrayMap(x -> plus(x, 1), arr)` with `arr` read from `default.t`.
    pub fn create_array_map(tree: &mut QueryTree) -> LambdaFixture {
        let x = NameAndTypePair::new("x", DataType::Int32);
        let table = tree.add(TableNode::new("default", "t")).unwrap();

        let lambda = tree.add(LambdaNode::new(["x"])).unwrap();
        let argument = tree.add(ColumnNode::new(x.clone(), lambda)).unwrap();
        let arguments = tree.add(ListNode::new([argument])).unwrap();
        tree.set_child(lambda, LambdaNode::ARGUMENTS_CHILD_INDEX, Some(arguments)).unwrap();

        let body_column = tree.add(ColumnNode::new(x, lambda)).unwrap();
        let one = tree.add(ConstantNode::new(Literal::Int(1))).unwrap();
        let plus_arguments = tree.add(ListNode::new([body_column, one])).unwrap();
        let plus = tree
            .add(FunctionNode::new("plus", plus_arguments).with_result_type(DataType::Int32))
            .unwrap();
        tree.set_child(lambda, LambdaNode::EXPRESSION_CHILD_INDEX, Some(plus)).unwrap();

        let array_column = tree
            .add(ColumnNode::new(NameAndTypePair::new("arr", DataType::array(DataType::Int32)), table))
            .unwrap();
        let map_arguments = tree.add(ListNode::new([lambda, array_column])).unwrap();
        let array_map = tree
            .add(FunctionNode::new("arrayMap", map_arguments).with_result_type(DataType::array(DataType::Int32)))
            .unwrap();

        LambdaFixture { table, lambda, argument, body_column, array_column, array_map }
    }

    /// First item of the arguments list of function `function`.
    pub fn first_argument(tree: &QueryTree, function: NodeId) -> NodeId {
        let arguments = tree.function(function).unwrap().arguments().unwrap();
        tree.list(arguments).unwrap().items().next().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{ConvertToAstOptions, Identifier},
        query_tree::{
            ArrayJoinNode, ColumnNode, ConstantNode, ListNode, NodeId, QueryTree, QueryTreeError, ReplacementMap, TableNode,
            TreeNode, _tests::fixtures::*,
        },
        types::{DataType, Literal, NameAndTypePair},
    };

    #[test]
    pub fn test_display_identifier_does_not_change_identity() {
        let mut tree = QueryTree::new();
        let table = tree.add(TableNode::new("default", "test_table")).unwrap();
        let c1 = tree.add(ColumnNode::new(id_column(), table)).unwrap();
        let mut column = ColumnNode::new(id_column(), table);
        column.set_display_identifier(Identifier::new("t1"));
        let c2 = tree.add(column).unwrap();

        assert!(tree.is_equal(c1, c2).unwrap());
        assert!(tree.is_equal(c2, c1).unwrap());
        assert_eq!(tree.tree_hash(c1).unwrap(), tree.tree_hash(c2).unwrap());

        let options = ConvertToAstOptions::default();
        assert_eq!(tree.to_ast(c1, &options).unwrap().to_string(), "id");
        assert_eq!(tree.to_ast(c2, &options).unwrap().to_string(), "t1.id");
    }

    #[test]
    pub fn test_changing_display_identifier_keeps_hash() {
        let mut tree = QueryTree::new();
        let (_, _, column) = create_table_with_column(&mut tree);
        let before = tree.tree_hash(column).unwrap();

        tree.set_display_identifier(column, Identifier::new("alias")).unwrap();

        assert_eq!(tree.tree_hash(column).unwrap(), before);
    }

    #[test]
    pub fn test_equality_is_reflexive() {
        let mut tree = QueryTree::new();
        let fixture = create_array_map(&mut tree);

        assert!(tree.is_equal(fixture.array_map, fixture.array_map).unwrap());
        assert!(tree.is_equal(fixture.lambda, fixture.lambda).unwrap());
    }

    #[test]
    pub fn test_columns_with_different_name_or_type_differ() {
        let mut tree = QueryTree::new();
        let table = tree.add(TableNode::new("default", "test_table")).unwrap();
        let id = tree.add(ColumnNode::new(id_column(), table)).unwrap();
        let id64 = tree.add(ColumnNode::new(NameAndTypePair::new("id", DataType::Int64), table)).unwrap();
        let value = tree.add(ColumnNode::new(NameAndTypePair::new("value", DataType::Int32), table)).unwrap();

        assert!(!tree.is_equal(id, id64).unwrap());
        assert!(!tree.is_equal(id64, id).unwrap());
        assert!(!tree.is_equal(id, value).unwrap());
    }

    #[test]
    pub fn test_columns_with_different_sources_differ() {
        let mut tree = QueryTree::new();
        let first = tree.add(TableNode::new("default", "first")).unwrap();
        let second = tree.add(TableNode::new("default", "second")).unwrap();
        let c1 = tree.add(ColumnNode::new(id_column(), first)).unwrap();
        let c2 = tree.add(ColumnNode::new(id_column(), second)).unwrap();

        assert!(!tree.is_equal(c1, c2).unwrap());
    }

    #[test]
    pub fn test_expression_presence_matters() {
        let mut tree = QueryTree::new();
        let table = tree.add(TableNode::new("default", "test_table")).unwrap();
        let plain = tree.add(ColumnNode::new(id_column(), table)).unwrap();
        let literal = tree.add(ConstantNode::new(Literal::Int(1))).unwrap();
        let alias = tree.add(ColumnNode::with_expression(id_column(), literal, table)).unwrap();

        assert!(!tree.is_equal(plain, alias).unwrap());
        assert!(!tree.is_equal(alias, plain).unwrap());
    }

    #[test]
    pub fn test_node_types_hash_apart() {
        let mut tree = QueryTree::new();
        let empty_list = tree.add(ListNode::new(Vec::<NodeId>::new())).unwrap();
        let other_list = tree.add(ListNode::new(Vec::<NodeId>::new())).unwrap();
        let literal = tree.add(ConstantNode::new(Literal::Null)).unwrap();

        assert_eq!(tree.tree_hash(empty_list).unwrap(), tree.tree_hash(other_list).unwrap());
        assert_ne!(tree.tree_hash(empty_list).unwrap(), tree.tree_hash(literal).unwrap());
        assert!(!tree.is_equal(empty_list, literal).unwrap());
    }

    #[test]
    pub fn test_equality_across_trees() {
        let mut lhs = QueryTree::new();
        let mut rhs = QueryTree::new();
        let lhs_fixture = create_array_map(&mut lhs);
        let rhs_fixture = create_array_map(&mut rhs);

        assert!(QueryTree::is_equal_across(&lhs, lhs_fixture.array_map, &rhs, rhs_fixture.array_map).unwrap());
        assert_eq!(
            lhs.tree_hash(lhs_fixture.array_map).unwrap(),
            rhs.tree_hash(rhs_fixture.array_map).unwrap()
        );

        rhs.set_column_type(rhs_fixture.body_column, DataType::Int64).unwrap();
        assert!(!QueryTree::is_equal_across(&lhs, lhs_fixture.array_map, &rhs, rhs_fixture.array_map).unwrap());
        assert_ne!(
            lhs.tree_hash(lhs_fixture.array_map).unwrap(),
            rhs.tree_hash(rhs_fixture.array_map).unwrap()
        );
    }

    #[test]
    pub fn test_clone_is_equal_and_independent() {
        let mut tree = QueryTree::new();
        let (list, _, column) = create_table_with_column(&mut tree);

        let cloned = tree.clone_subtree(list).unwrap();

        assert_ne!(cloned, list);
        assert_eq!(tree.owners(cloned).unwrap(), 0);
        assert!(tree.is_equal(list, cloned).unwrap());
        assert_eq!(tree.tree_hash(list).unwrap(), tree.tree_hash(cloned).unwrap());

        let cloned_items: Vec<_> = tree.list(cloned).unwrap().items().collect();
        let cloned_column = cloned_items[1];
        assert_ne!(cloned_column, column);

        tree.set_column_type(cloned_column, DataType::UInt64).unwrap();
        assert_eq!(tree.column(column).unwrap().column_type(), &DataType::Int32);
        assert!(!tree.is_equal(list, cloned).unwrap());
    }

    #[test]
    pub fn test_clone_repoints_source_inside_subtree() {
        let mut tree = QueryTree::new();
        let (list, table, _) = create_table_with_column(&mut tree);

        let cloned = tree.clone_subtree(list).unwrap();

        let cloned_items: Vec<_> = tree.list(cloned).unwrap().items().collect();
        let (cloned_table, cloned_column) = (cloned_items[0], cloned_items[1]);
        assert_ne!(cloned_table, table);
        assert_eq!(tree.column(cloned_column).unwrap().column_source(&tree).unwrap(), cloned_table);
    }

    #[test]
    pub fn test_clone_keeps_source_outside_subtree() {
        let mut tree = QueryTree::new();
        let (_, table, column) = create_table_with_column(&mut tree);

        let cloned = tree.clone_subtree(column).unwrap();

        assert_ne!(cloned, column);
        assert_eq!(tree.column(cloned).unwrap().column_source(&tree).unwrap(), table);
        assert!(tree.is_equal(column, cloned).unwrap());
    }

    #[test]
    pub fn test_clone_alias_column() {
        let mut tree = QueryTree::new();
        let table = tree.add(TableNode::new("default", "test_table")).unwrap();
        let literal = tree.add(ConstantNode::new(Literal::Int(1))).unwrap();
        let alias_column = tree
            .add(ColumnNode::with_expression(NameAndTypePair::new("x", DataType::Int32), literal, table))
            .unwrap();

        let cloned = tree.clone_subtree(alias_column).unwrap();

        let cloned_column = tree.column(cloned).unwrap();
        assert!(cloned_column.has_expression());
        let cloned_literal = cloned_column.expression_or_err().unwrap();
        assert_ne!(cloned_literal, literal);
        assert_eq!(tree.constant(cloned_literal).unwrap().value(), &Literal::Int(1));
        assert_eq!(cloned_column.column_source(&tree).unwrap(), table);

        tree.remove(alias_column).unwrap();
        assert!(!tree.contains(literal));
        assert!(tree.contains(cloned_literal));
    }

    #[test]
    pub fn test_clone_lambda_repoints_arguments_to_copy() {
        let mut tree = QueryTree::new();
        let fixture = create_array_map(&mut tree);

        let cloned = tree.clone_subtree(fixture.array_map).unwrap();

        assert!(tree.is_equal(fixture.array_map, cloned).unwrap());
        assert_eq!(tree.tree_hash(fixture.array_map).unwrap(), tree.tree_hash(cloned).unwrap());

        let cloned_lambda = first_argument(&tree, cloned);
        assert_ne!(cloned_lambda, fixture.lambda);

        let plus = tree.lambda(cloned_lambda).unwrap().expression_or_err().unwrap();
        let cloned_body_column = first_argument(&tree, plus);
        assert_ne!(cloned_body_column, fixture.body_column);
        assert_eq!(tree.column(cloned_body_column).unwrap().column_source(&tree).unwrap(), cloned_lambda);

        let cloned_arguments = tree.lambda(cloned_lambda).unwrap().arguments().unwrap();
        let cloned_argument = tree.list(cloned_arguments).unwrap().items().next().unwrap();
        assert_ne!(cloned_argument, fixture.argument);
        assert_eq!(tree.column(cloned_argument).unwrap().column_source(&tree).unwrap(), cloned_lambda);

        let map_arguments = tree.function(cloned).unwrap().arguments().unwrap();
        let cloned_array_column = tree.list(map_arguments).unwrap().items().nth(1).unwrap();
        assert_ne!(cloned_array_column, fixture.array_column);
        assert_eq!(tree.column(cloned_array_column).unwrap().column_source(&tree).unwrap(), fixture.table);
    }

    #[test]
    pub fn test_clone_of_lambda_alone_is_self_contained() {
        let mut tree = QueryTree::new();
        let fixture = create_array_map(&mut tree);

        let cloned = tree.clone_subtree(fixture.lambda).unwrap();
        tree.remove(fixture.array_map).unwrap();

        assert!(!tree.contains(fixture.lambda));
        let plus = tree.lambda(cloned).unwrap().expression_or_err().unwrap();
        let body_column = first_argument(&tree, plus);
        assert_eq!(tree.column(body_column).unwrap().column_source(&tree).unwrap(), cloned);
        assert_eq!(tree.result_type(cloned).unwrap(), Some(DataType::Int32));
    }

    #[test]
    pub fn test_clone_keeps_shared_children_shared() {
        let mut tree = QueryTree::new();
        let literal = tree.add(ConstantNode::new(Literal::Int(7))).unwrap();
        let list = tree.add(ListNode::new([literal, literal])).unwrap();
        assert_eq!(tree.owners(literal).unwrap(), 2);

        let cloned = tree.clone_subtree(list).unwrap();

        let items: Vec<_> = tree.list(cloned).unwrap().items().collect();
        assert_eq!(items[0], items[1]);
        assert_ne!(items[0], literal);
        assert_eq!(tree.owners(items[0]).unwrap(), 2);
        assert!(tree.is_equal(list, cloned).unwrap());
    }

    #[test]
    pub fn test_shared_and_duplicated_children_are_not_equal() {
        let mut tree = QueryTree::new();
        let literal = tree.add(ConstantNode::new(Literal::Int(7))).unwrap();
        let shared = tree.add(ListNode::new([literal, literal])).unwrap();
        let first = tree.add(ConstantNode::new(Literal::Int(7))).unwrap();
        let second = tree.add(ConstantNode::new(Literal::Int(7))).unwrap();
        let duplicated = tree.add(ListNode::new([first, second])).unwrap();

        assert!(!tree.is_equal(shared, duplicated).unwrap());
        assert!(!tree.is_equal(duplicated, shared).unwrap());
    }

    #[test]
    pub fn test_clone_and_replace_redirects_source() {
        let mut tree = QueryTree::new();
        let (list, table, _) = create_table_with_column(&mut tree);
        let replacement = tree.add(TableNode::new("default", "other_table")).unwrap();
        let mut replacements = ReplacementMap::new();
        replacements.insert(table, replacement);

        let cloned = tree.clone_and_replace(list, &replacements).unwrap();

        let items: Vec<_> = tree.list(cloned).unwrap().items().collect();
        assert_eq!(items[0], replacement);
        assert_eq!(tree.owners(replacement).unwrap(), 1);
        assert_eq!(tree.column(items[1]).unwrap().column_source(&tree).unwrap(), replacement);
        assert!(!tree.is_equal(list, cloned).unwrap());

        let original_items: Vec<_> = tree.list(list).unwrap().items().collect();
        assert_eq!(tree.column(original_items[1]).unwrap().column_source(&tree).unwrap(), table);
    }

    #[test]
    pub fn test_clone_and_replace_rejects_dead_replacement() {
        let mut tree = QueryTree::new();
        let (list, table, _) = create_table_with_column(&mut tree);
        let replacement = tree.add(TableNode::new("default", "other_table")).unwrap();
        tree.remove(replacement).unwrap();
        let mut replacements = ReplacementMap::new();
        replacements.insert(table, replacement);
        let nodes_before = tree.len();

        let result = tree.clone_and_replace(list, &replacements);

        assert!(matches!(result, Err(QueryTreeError::LogicalError(_))));
        assert_eq!(tree.len(), nodes_before);
    }

    #[test]
    pub fn test_discard_partial_copy_keeps_replacement() {
        let mut tree = QueryTree::new();
        let replacement = tree.add(TableNode::new("default", "other_table")).unwrap();
        let attached = tree.add(ConstantNode::new(Literal::Int(1))).unwrap();
        let partial_root = tree.add(ListNode::new([replacement, attached])).unwrap();
        let unattached = tree.add(ConstantNode::new(Literal::Int(2))).unwrap();
        assert_eq!(tree.owners(replacement).unwrap(), 1);

        tree.discard_detached(&[partial_root, attached, unattached], &[replacement]);

        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(partial_root));
        assert!(!tree.contains(attached));
        assert!(!tree.contains(unattached));
        assert_eq!(tree.owners(replacement).unwrap(), 0);
    }

    #[test]
    pub fn test_setters_keep_owner_counts() {
        let mut tree = QueryTree::new();
        let fixture = create_array_map(&mut tree);
        let nodes_before = tree.len();
        let plus = tree.lambda(fixture.lambda).unwrap().expression().unwrap();

        tree.set_column_type(fixture.array_column, DataType::array(DataType::Int64)).unwrap();
        tree.set_display_identifier(fixture.array_column, Identifier::new("t")).unwrap();
        tree.set_table_alias(fixture.table, Some("t".into())).unwrap();
        tree.set_function_result_type(plus, Some(DataType::Int64)).unwrap();

        assert_eq!(tree.len(), nodes_before);
        assert_eq!(tree.owners(fixture.array_column).unwrap(), 1);
        assert_eq!(tree.owners(plus).unwrap(), 1);
        assert_eq!(tree.function(plus).unwrap().result_type(), Some(DataType::Int64));
        assert_eq!(tree.table(fixture.table).unwrap().alias(), Some("t"));
        assert_eq!(
            tree.to_ast(fixture.array_map, &ConvertToAstOptions::default()).unwrap().to_string(),
            "arrayMap(x -> plus(x, 1), t.arr)"
        );
    }

    #[test]
    pub fn test_dangling_source_after_remove() {
        let mut tree = QueryTree::new();
        let table = tree.add(TableNode::new("default", "test_table")).unwrap();
        let column = tree.add(ColumnNode::new(id_column(), table)).unwrap();

        tree.remove(table).unwrap();

        let result = tree.column(column).unwrap().column_source(&tree);
        assert!(matches!(result, Err(QueryTreeError::LogicalError(_))));

        let dump = tree.dump_tree(column).unwrap();
        assert!(dump.ends_with("source_id: <dangling>"));
    }

    #[test]
    pub fn test_stale_id_does_not_resolve_after_slot_reuse() {
        let mut tree = QueryTree::new();
        let table = tree.add(TableNode::new("default", "test_table")).unwrap();
        let column = tree.add(ColumnNode::new(id_column(), table)).unwrap();
        tree.remove(table).unwrap();

        let reused = tree.add(TableNode::new("default", "reused")).unwrap();

        assert_eq!(reused.index(), table.index());
        assert_ne!(reused.generation(), table.generation());
        assert!(tree.get(table).is_err());
        assert!(tree.column(column).unwrap().column_source(&tree).is_err());
    }

    #[test]
    pub fn test_remove_releases_owned_subtree() {
        let mut tree = QueryTree::new();
        let fixture = create_array_map(&mut tree);
        assert_eq!(tree.len(), 11);

        tree.remove(fixture.array_map).unwrap();

        assert_eq!(tree.len(), 1);
        assert!(tree.contains(fixture.table));
        assert!(!tree.contains(fixture.lambda));
    }

    #[test]
    pub fn test_remove_owned_node_fails() {
        let mut tree = QueryTree::new();
        let (_, _, column) = create_table_with_column(&mut tree);

        match tree.remove(column) {
            Ok(_) => panic!(),
            Err(err) => assert!(err.message().contains("still owned")),
        }
        assert!(tree.contains(column));
    }

    #[test]
    pub fn test_node_from_other_tree_is_rejected() {
        let mut tree = QueryTree::new();
        let mut other = QueryTree::new();
        let table = other.add(TableNode::new("default", "test_table")).unwrap();

        match tree.get(table) {
            Ok(_) => panic!(),
            Err(err) => assert!(err.message().contains("another query tree")),
        }
        assert!(tree.add(ColumnNode::new(id_column(), table)).is_err());
    }

    #[test]
    pub fn test_set_child_rejects_cycle() {
        let mut tree = QueryTree::new();
        let fixture = create_array_map(&mut tree);
        let plus = tree.lambda(fixture.lambda).unwrap().expression().unwrap();
        let plus_arguments = tree.function(plus).unwrap().arguments().unwrap();

        let result = tree.set_child(plus_arguments, 1, Some(fixture.lambda));

        assert!(matches!(result, Err(QueryTreeError::LogicalError(_))));
        assert!(tree.set_child(plus_arguments, 5, None).is_err());
    }

    #[test]
    pub fn test_render_array_map() {
        let mut tree = QueryTree::new();
        let fixture = create_array_map(&mut tree);

        let ast = tree.to_ast(fixture.array_map, &ConvertToAstOptions::default()).unwrap();

        assert_eq!(ast.to_string(), "arrayMap(x -> plus(x, 1), arr)");
        assert_eq!(
            tree.to_ast(fixture.array_map, &ConvertToAstOptions::fully_qualified()).unwrap().to_string(),
            "arrayMap(x -> plus(x, 1), t.arr)"
        );
    }

    #[test]
    pub fn test_array_join_columns() {
        let mut tree = QueryTree::new();
        let table = tree.add(TableNode::new("default", "t")).unwrap();
        let array_join = tree.add(ArrayJoinNode::new(table, false)).unwrap();
        let arr = tree
            .add(ColumnNode::new(NameAndTypePair::new("arr", DataType::array(DataType::Int32)), table))
            .unwrap();
        let elem = tree
            .add(ColumnNode::with_expression(NameAndTypePair::new("elem", DataType::Int32), arr, array_join))
            .unwrap();
        let join_expressions = tree.add(ListNode::new([elem])).unwrap();
        tree.set_child(array_join, ArrayJoinNode::JOIN_EXPRESSIONS_CHILD_INDEX, Some(join_expressions))
            .unwrap();

        let ast = tree.to_ast(array_join, &ConvertToAstOptions::default()).unwrap();
        assert_eq!(ast.to_string(), "default.t ARRAY JOIN arr AS elem");

        let cloned = tree.clone_subtree(array_join).unwrap();
        let cloned_node = tree.array_join(cloned).unwrap();
        let cloned_table = cloned_node.table_expression().unwrap();
        let cloned_list = cloned_node.join_expressions().unwrap();
        let cloned_elem = tree.list(cloned_list).unwrap().items().next().unwrap();
        let cloned_arr = tree.column(cloned_elem).unwrap().expression_or_err().unwrap();

        assert_eq!(tree.column(cloned_elem).unwrap().column_source(&tree).unwrap(), cloned);
        assert_eq!(tree.column(cloned_arr).unwrap().column_source(&tree).unwrap(), cloned_table);
        assert_ne!(cloned_table, table);
        assert!(tree.is_equal(array_join, cloned).unwrap());
    }

    #[test]
    pub fn test_node_names_and_types() {
        let mut tree = QueryTree::new();
        let fixture = create_array_map(&mut tree);

        assert_eq!(tree.get(fixture.array_map).unwrap().name(), "arrayMap");
        assert_eq!(tree.get(fixture.table).unwrap().name(), "default.t");
        assert_eq!(tree.get(fixture.lambda).unwrap().name(), "lambda(x)");
        assert_eq!(tree.get(fixture.lambda).unwrap().result_type(), None);
        assert_eq!(tree.result_type(fixture.lambda).unwrap(), Some(DataType::Int32));
        assert_eq!(
            tree.result_type(fixture.array_column).unwrap(),
            Some(DataType::array(DataType::Int32))
        );
    }
}
