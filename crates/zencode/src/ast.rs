//! The AST (`spec.md` §3/§4.2): the ordered, bound sequence of steps
//! produced by parsing and consumed by execution.

use crate::phase::Phase;
use crate::registry::BoundHandler;

/// One bound step: `{ id, source, args, handler }` (`spec.md` §3).
#[derive(Clone)]
pub struct AstNode {
    /// Monotonically increasing, assigned in source order; breaks ties
    /// among structurally equal entries.
    pub id: u64,
    /// The original, unmodified source line.
    pub source: String,
    /// The quoted arguments extracted from the line, in source order.
    pub args: Vec<String>,
    /// The handler this line was bound to.
    pub handler: BoundHandler,
    /// The phase this step executes under.
    pub phase: Phase,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn nodes_carry_their_source_order() {
        let node = AstNode {
            id: 1,
            source: "Given I am 'Alice'".to_string(),
            args: vec!["Alice".to_string()],
            handler: BoundHandler::Given(Arc::new(|_, _| Ok(()))),
            phase: Phase::Given,
        };
        assert_eq!(node.id, 1);
        assert_eq!(node.args, vec!["Alice".to_string()]);
    }
}
