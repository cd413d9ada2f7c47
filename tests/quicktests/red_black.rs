use balanced_bst::red_black::{Color, Tree};

use std::collections::BTreeMap;

use crate::Op;

/// Applies a set of operations to a tree and a map, storing each key's negation as its value.
fn do_ops(ops: &[Op<i8>], bst: &mut Tree<i8, i16>, map: &mut BTreeMap<i8, i16>) {
    for op in ops {
        match op {
            Op::Insert(k) => {
                assert_eq!(bst.insert(*k, -i16::from(*k)), map.insert(*k, -i16::from(*k)));
            }
            Op::Remove(k) => {
                assert_eq!(bst.remove(k), map.remove(k).is_some());
            }
        }
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut map = BTreeMap::new();

    do_ops(&ops, &mut tree, &mut map);
    tree.validate().is_ok() && tree.size() == map.len() && tree.iter().eq(map.iter())
}

#[quickcheck]
fn colors_valid_after_every_operation(ops: Vec<Op<i16>>) -> bool {
    let mut tree = Tree::new();
    ops.iter().all(|op| {
        match op {
            Op::Insert(k) => {
                tree.insert(*k, ());
            }
            Op::Remove(k) => {
                tree.remove(k);
            }
        }
        tree.validate().is_ok() && tree.root_color() != Some(Color::Red)
    })
}

#[quickcheck]
fn round_trip(xs: Vec<i8>, k: i8) -> bool {
    let mut tree: Tree<_, _> = xs.into_iter().map(|x| (x, x)).collect();
    tree.insert(k, k);
    let found = tree.search(&k);
    tree.remove(&k);

    found && !tree.search(&k) && tree.get(&k).is_none()
}

#[quickcheck]
fn size_counts_distinct_keys(xs: Vec<i8>) -> bool {
    let tree: Tree<_, _> = xs.iter().map(|&x| (x, ())).collect();
    let mut distinct = xs;
    distinct.sort_unstable();
    distinct.dedup();

    tree.size() == distinct.len()
}
