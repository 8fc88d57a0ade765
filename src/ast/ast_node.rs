use std::fmt;

use crate::{ast::Identifier, types::Literal};

/// Syntax produced from a query tree.
///
/// This is the output side of tree conversion; `Display` renders SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    Identifier(Identifier),
    Literal(Literal),
    Function { name: String, arguments: Vec<AstNode> },
    Lambda { arguments: Vec<String>, body: Box<AstNode> },
    Table { name: Identifier, alias: Option<String> },
    ArrayJoin { table_expression: Box<AstNode>, is_left: bool, expressions: Vec<AstNode> },
    Alias { node: Box<AstNode>, alias: String },
    ExpressionList(Vec<AstNode>),
}

impl AstNode {
    pub fn identifier(parts: Identifier) -> Self {
        AstNode::Identifier(parts)
    }

    pub fn alias(node: AstNode, alias: impl Into<String>) -> Self {
        AstNode::Alias { node: Box::new(node), alias: alias.into() }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, nodes: &[AstNode]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::Identifier(identifier) => write!(f, "{}", identifier),
            AstNode::Literal(literal) => write!(f, "{}", literal),
            AstNode::Function { name, arguments } => {
                write!(f, "{}(", name)?;
                write_list(f, arguments)?;
                write!(f, ")")
            }
            AstNode::Lambda { arguments, body } => {
                let quoted: Vec<String> = arguments.iter().map(|arg| Identifier::quote_part(arg)).collect();
                match quoted.len() {
                    1 => write!(f, "{} -> {}", quoted[0], body),
                    _ => write!(f, "({}) -> {}", quoted.join(", "), body),
                }
            }
            AstNode::Table { name, alias } => match alias {
                Some(alias) => write!(f, "{} AS {}", name, Identifier::quote_part(alias)),
                None => write!(f, "{}", name),
            },
            AstNode::ArrayJoin { table_expression, is_left, expressions } => {
                write!(f, "{} ", table_expression)?;
                if *is_left {
                    write!(f, "LEFT ")?;
                }
                write!(f, "ARRAY JOIN ")?;
                write_list(f, expressions)
            }
            AstNode::Alias { node, alias } => write!(f, "{} AS {}", node, Identifier::quote_part(alias)),
            AstNode::ExpressionList(nodes) => write_list(f, nodes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_render_function_with_lambda() {
        let lambda = AstNode::Lambda {
            arguments: vec!["x".into()],
            body: Box::new(AstNode::Function {
                name: "plus".into(),
                arguments: vec![
                    AstNode::identifier(Identifier::new("x")),
                    AstNode::Literal(Literal::Int(1)),
                ],
            }),
        };
        let call = AstNode::Function {
            name: "arrayMap".into(),
            arguments: vec![lambda, AstNode::identifier(Identifier::new("arr"))],
        };

        assert_eq!(call.to_string(), "arrayMap(x -> plus(x, 1), arr)");
    }

    #[test]
    pub fn test_render_array_join() {
        let node = AstNode::ArrayJoin {
            table_expression: Box::new(AstNode::Table { name: Identifier::new("db.t"), alias: Some("a".into()) }),
            is_left: true,
            expressions: vec![AstNode::alias(AstNode::identifier(Identifier::new("arr")), "elem")],
        };

        assert_eq!(node.to_string(), "db.t AS a LEFT ARRAY JOIN arr AS elem");
    }

    #[test]
    pub fn test_render_multi_argument_lambda() {
        let lambda = AstNode::Lambda {
            arguments: vec!["x".into(), "y".into()],
            body: Box::new(AstNode::identifier(Identifier::new("x"))),
        };

        assert_eq!(lambda.to_string(), "(x, y) -> x");
    }
}
