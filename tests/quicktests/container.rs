use balanced_bst::{OrderedTree, Strategy};

use std::collections::BTreeSet;

use crate::Op;

/// Runs the same operations against every strategy and a `BTreeSet`; all of them must agree
/// on every answer.
#[quickcheck]
fn strategies_agree(ops: Vec<Op<i8>>) -> bool {
    let mut trees: Vec<_> = Strategy::ALL.iter().map(|&s| OrderedTree::new(s)).collect();
    let mut set = BTreeSet::new();

    for op in &ops {
        let expected = match op {
            Op::Insert(k) => set.insert(*k),
            Op::Remove(k) => set.remove(k),
        };
        for tree in &mut trees {
            let actual = match op {
                Op::Insert(k) => tree.insert(*k),
                Op::Remove(k) => tree.remove(k),
            };
            if actual != expected {
                return false;
            }
        }
    }

    let expected: Vec<_> = set.iter().collect();
    trees
        .iter()
        .all(|tree| tree.validate().is_ok() && tree.traverse() == expected)
}

#[quickcheck]
fn traversal_strictly_increasing(xs: Vec<i16>) -> bool {
    Strategy::ALL.iter().all(|&strategy| {
        let mut tree = OrderedTree::new(strategy);
        for x in &xs {
            tree.insert(*x);
        }
        let keys = tree.traverse();
        keys.windows(2).all(|w| w[0] < w[1])
    })
}
