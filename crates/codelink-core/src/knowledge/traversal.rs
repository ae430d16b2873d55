//! Bounded relationship queries over the code graph.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::error::KnowledgeError;
use super::models::{CodeNode, Direction, EdgeSelector, LinkType};
use super::store::GraphStore;

/// A named traversal over one family of edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Structural children via CONTAINS.
    Structure,
    /// Callees.
    Calls,
    /// Callers.
    CalledBy,
    Uses,
    /// Everything reached through USES or CALLS.
    Dependencies,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Structure => "structure",
            Operation::Calls => "calls",
            Operation::CalledBy => "called_by",
            Operation::Uses => "uses",
            Operation::Dependencies => "dependencies",
        }
    }

    /// Edges followed and the direction they are followed in.
    pub fn edges(self) -> (EdgeSelector, Direction) {
        match self {
            Operation::Structure => (EdgeSelector::Contains, Direction::Forward),
            Operation::Calls => (EdgeSelector::Links(&[LinkType::Calls]), Direction::Forward),
            Operation::CalledBy => (EdgeSelector::Links(&[LinkType::Calls]), Direction::Reverse),
            Operation::Uses => (EdgeSelector::Links(&[LinkType::Uses]), Direction::Forward),
            Operation::Dependencies => (
                EdgeSelector::Links(&[LinkType::Uses, LinkType::Calls]),
                Direction::Forward,
            ),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = KnowledgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "structure" => Ok(Operation::Structure),
            "calls" => Ok(Operation::Calls),
            "called_by" => Ok(Operation::CalledBy),
            "uses" => Ok(Operation::Uses),
            "dependencies" => Ok(Operation::Dependencies),
            other => Err(KnowledgeError::InvalidOperation(other.to_string())),
        }
    }
}

/// Breadth-first traversal engine.
pub struct TraversalEngine {
    store: Arc<dyn GraphStore>,
}

impl TraversalEngine {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Nodes reachable from `start` within `max_depth` hops, in discovery
    /// order. The start node itself is never returned.
    pub async fn traverse(
        &self,
        start: &str,
        operation: Operation,
        max_depth: usize,
    ) -> Result<Vec<CodeNode>, KnowledgeError> {
        let (selector, direction) = operation.edges();

        let mut visited: HashSet<String> = HashSet::from([start.to_string()]);
        let mut order: Vec<String> = Vec::new();
        let mut frontier = vec![start.to_string()];

        for depth in 0..max_depth {
            if frontier.is_empty() {
                break;
            }

            let mut next: Vec<String> = self
                .store
                .neighbors(&frontier, selector, direction)
                .await?
                .into_iter()
                .filter(|id| visited.insert(id.clone()))
                .collect();
            next.sort();

            tracing::debug!(start, operation = %operation, depth = depth + 1, found = next.len(), "traversal hop");
            order.extend(next.iter().cloned());
            frontier = next;
        }

        if order.is_empty() {
            return Ok(Vec::new());
        }

        // The store returns nodes unordered; restore discovery order
        let mut nodes = self.store.get_nodes(&order).await?;
        let position: std::collections::HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.as_str(), i))
            .collect();
        nodes.sort_by_key(|n| position.get(n.node_id.as_str()).copied().unwrap_or(usize::MAX));
        Ok(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operations() {
        for op in ["structure", "calls", "called_by", "uses", "dependencies"] {
            let parsed: Operation = op.parse().unwrap();
            assert_eq!(parsed.as_str(), op);
        }
    }

    #[test]
    fn test_unknown_operation() {
        let err = "callers".parse::<Operation>().unwrap_err();
        assert!(matches!(err, KnowledgeError::InvalidOperation(ref op) if op == "callers"));
    }

    #[test]
    fn test_called_by_reverses_calls() {
        let (calls, forward) = Operation::Calls.edges();
        let (called_by, reverse) = Operation::CalledBy.edges();
        assert_eq!(calls, called_by);
        assert_eq!(forward, Direction::Forward);
        assert_eq!(reverse, Direction::Reverse);
    }

    #[test]
    fn test_dependencies_follow_uses_and_calls() {
        let (selector, _) = Operation::Dependencies.edges();
        assert_eq!(selector, EdgeSelector::Links(&[LinkType::Uses, LinkType::Calls]));
    }
}
