//! Property-based invariant tests for the headless document.
//!
//! Random sequences of create / append / detach / destroy must keep the tree
//! consistent:
//!
//! 1. Every child's parent link points back at the node listing it.
//! 2. A node appears in at most one children list.
//! 3. Destroyed nodes never appear as children.
//! 4. Live node count equals created minus destroyed.

use clockface_core::dom::{Document, NodeId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create,
    Append(usize, usize),
    Detach(usize),
    Destroy(usize),
    Clear(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Create),
        4 => (0usize..32, 0usize..32).prop_map(|(a, b)| Op::Append(a, b)),
        1 => (0usize..32).prop_map(Op::Detach),
        1 => (0usize..32).prop_map(Op::Destroy),
        1 => (0usize..32).prop_map(Op::Clear),
    ]
}

fn pick(ids: &[NodeId], i: usize) -> Option<NodeId> {
    if ids.is_empty() {
        None
    } else {
        Some(ids[i % ids.len()])
    }
}

fn check_consistency(doc: &Document, ids: &[NodeId]) -> Result<(), TestCaseError> {
    let mut seen = std::collections::HashSet::new();
    for &id in ids.iter().filter(|&&id| doc.contains(id)) {
        for &child in doc.children(id) {
            prop_assert!(doc.contains(child), "dead child {child:?} under {id:?}");
            prop_assert_eq!(doc.parent(child), Some(id));
            prop_assert!(seen.insert(child), "{child:?} listed twice");
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn tree_links_stay_consistent(ops in proptest::collection::vec(op_strategy(), 1..80)) {
        let mut doc = Document::new();
        let mut ids: Vec<NodeId> = vec![doc.create_element("root")];

        for op in ops {
            match op {
                Op::Create => ids.push(doc.create_element("div")),
                Op::Append(a, b) => {
                    if let (Some(parent), Some(child)) = (pick(&ids, a), pick(&ids, b)) {
                        doc.append_child(parent, child);
                    }
                }
                Op::Detach(a) => {
                    if let Some(id) = pick(&ids, a) {
                        doc.detach(id);
                    }
                }
                Op::Destroy(a) => {
                    if let Some(id) = pick(&ids, a) {
                        doc.destroy(id);
                    }
                }
                Op::Clear(a) => {
                    if let Some(id) = pick(&ids, a) {
                        doc.clear_children(id);
                    }
                }
            }
            ids.retain(|&id| doc.contains(id));
            check_consistency(&doc, &ids)?;
        }

        let stats = doc.stats();
        prop_assert_eq!(doc.len() as u64, stats.created - stats.destroyed);
    }
}
