//! Pre-order walk that turns a parse tree into entities and symbol references.
//!
//! The walk runs off an explicit stack of pending nodes. Each pending node
//! carries the index of its enclosing entity, so nesting depth is limited by
//! the heap and not by the thread stack.

use tree_sitter::Node;

use super::result::{ExtractedNode, Extraction, SymbolRef};
use super::rules::{CallShape, LanguageRules};
use super::treesitter::TreeSitterParser;
use crate::knowledge::models::{CodeNode, NodeKind};

/// An entity opened during the walk.
struct Scope {
    id: String,
    kind: NodeKind,
}

/// A node waiting to be visited.
struct Frame<'t> {
    node: Node<'t>,
    /// Index into the opened scopes, `None` at file scope.
    scope: Option<usize>,
    capture_usages: bool,
}

pub(super) struct Walker<'a> {
    rules: &'static LanguageRules,
    path: &'a str,
    content: &'a str,
    scopes: Vec<Scope>,
    out: Extraction,
}

impl<'a> Walker<'a> {
    pub(super) fn new(rules: &'static LanguageRules, path: &'a str, content: &'a str) -> Self {
        Self {
            rules,
            path,
            content,
            scopes: Vec::new(),
            out: Extraction::default(),
        }
    }

    pub(super) fn run(mut self, root: Node<'_>) -> Extraction {
        let mut stack = vec![Frame {
            node: root,
            scope: None,
            capture_usages: true,
        }];
        while let Some(frame) = stack.pop() {
            self.visit(frame, &mut stack);
        }
        self.out
    }

    /// Record `frame`'s node and queue its children.
    fn visit<'t>(&mut self, frame: Frame<'t>, stack: &mut Vec<Frame<'t>>) {
        let Frame {
            node,
            scope,
            capture_usages,
        } = frame;
        let mut current = scope;
        let mut name_node: Option<usize> = None;
        let mut callee_node: Option<usize> = None;
        let mut capture = capture_usages;

        if let Some((entity, name_id)) = self.entity(&node, scope.map(|i| &self.scopes[i])) {
            name_node = name_id;
            capture = true;
            self.scopes.push(Scope {
                id: entity.node_id.clone(),
                kind: entity.kind,
            });
            current = Some(self.scopes.len() - 1);
            self.out.push_node(entity);
        } else if let Some(owner) = scope {
            if let Some(shape) = self.rules.call_shape(node.kind()) {
                let callee = node.child_by_field_name(shape.callee);
                if let Some(symbol) = callee.and_then(|c| self.callee_symbol(&node, &c, shape)) {
                    self.out.calls.push(SymbolRef {
                        owner_id: self.scopes[owner].id.clone(),
                        symbol,
                        provenance: node.kind(),
                    });
                }
                callee_node = callee.map(|c| c.id());
            } else if capture_usages && self.rules.is_usage(node.kind()) {
                let symbol = self.text(&node).trim();
                if !symbol.is_empty() {
                    self.out.usages.push(SymbolRef {
                        owner_id: self.scopes[owner].id.clone(),
                        symbol: symbol.to_string(),
                        provenance: node.kind(),
                    });
                }
            }
        }

        // Reversed so the first child is popped first
        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
        for child in children.into_iter().rev() {
            if Some(child.id()) == name_node {
                continue;
            }
            stack.push(Frame {
                node: child,
                scope: current,
                capture_usages: capture && Some(child.id()) != callee_node,
            });
        }
    }

    /// Build the entity for `node` if its grammar kind is structural.
    fn entity(&self, node: &Node, scope: Option<&Scope>) -> Option<(ExtractedNode, Option<usize>)> {
        let table_kind = self.rules.structural_kind(node.kind())?;
        let mut kind = (self.rules.refine)(node, table_kind)?;

        let start_line = TreeSitterParser::node_line(node);
        let end_line = TreeSitterParser::node_end_line(node);
        let (name, name_id) = match self.entity_name(node) {
            Some((name, id)) => (name, Some(id)),
            None => (format!("unnamed_{}", start_line), None),
        };

        let in_type = scope.is_some_and(|s| s.kind.is_type_like());
        if kind == NodeKind::Function && in_type {
            kind = NodeKind::Method;
        }
        if kind == NodeKind::Method && self.rules.constructor_names.contains(&name.as_str()) {
            kind = NodeKind::Constructor;
        }

        let entity = ExtractedNode {
            node_id: CodeNode::make_id(self.path, &name, start_line),
            kind,
            name,
            start_line,
            end_line,
            parent_id: scope.map(|s| s.id.clone()),
            code: self.text(node).to_string(),
        };
        Some((entity, name_id))
    }

    /// The `name` field, else the first identifier-shaped child.
    fn entity_name(&self, node: &Node) -> Option<(String, usize)> {
        let name_node = match node.child_by_field_name("name") {
            Some(n) => n,
            None => {
                let mut cursor = node.walk();
                let found = node
                    .children(&mut cursor)
                    .find(|child| self.rules.is_name_kind(child.kind()));
                found?
            }
        };

        let name = self.text(&name_node).trim();
        if name.is_empty() {
            return None;
        }
        Some((name.to_string(), name_node.id()))
    }

    fn callee_symbol(&self, call: &Node, callee: &Node, shape: &CallShape) -> Option<String> {
        let raw = strip_type_arguments(self.text(callee).trim());
        if raw.is_empty() {
            return None;
        }

        let qualifier = shape
            .qualifier
            .and_then(|field| call.child_by_field_name(field))
            .map(|q| self.text(&q).trim())
            .filter(|q| is_simple_path(q));

        Some(match qualifier {
            Some(q) => format!("{}.{}", q, raw),
            None => raw.to_string(),
        })
    }

    fn text(&self, node: &Node) -> &'a str {
        self.content.get(node.byte_range()).unwrap_or("")
    }
}

fn strip_type_arguments(text: &str) -> &str {
    match text.find('<') {
        Some(pos) => text[..pos].trim_end(),
        None => text,
    }
}

fn is_simple_path(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_type_arguments() {
        assert_eq!(strip_type_arguments("ArrayList<String>"), "ArrayList");
        assert_eq!(strip_type_arguments("Foo"), "Foo");
    }

    #[test]
    fn test_is_simple_path() {
        assert!(is_simple_path("this.repo"));
        assert!(is_simple_path("Util"));
        assert!(!is_simple_path("build().repo"));
        assert!(!is_simple_path(""));
    }
}
