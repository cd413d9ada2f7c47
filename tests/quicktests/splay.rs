use balanced_bst::splay::Tree;

use std::collections::BTreeSet;

use crate::Op;

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    for op in &ops {
        let agrees = match op {
            Op::Insert(k) => tree.insert(*k) == set.insert(*k),
            Op::Remove(k) => tree.remove(k) == set.remove(k),
        };
        if !agrees {
            return false;
        }
    }
    tree.validate().is_ok() && tree.traverse().eq(set.iter())
}

#[quickcheck]
fn found_key_is_root(xs: Vec<i8>, lookups: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.into_iter().collect();
    lookups
        .iter()
        .all(|k| !tree.contains(k) || tree.root() == Some(k))
}

#[quickcheck]
fn failed_lookup_keeps_keys(xs: Vec<i8>, lookups: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.into_iter().collect();
    let before: Vec<_> = tree.traverse().copied().collect();
    for k in &lookups {
        tree.contains(k);
    }

    tree.validate().is_ok() && tree.traverse().copied().eq(before)
}

#[quickcheck]
fn duplicate_insert_keeps_length(xs: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    let len = tree.len();
    for x in &xs {
        tree.insert(*x);
    }

    tree.len() == len && tree.traverse().count() == len
}

#[quickcheck]
fn round_trip(xs: Vec<i8>, k: i8) -> bool {
    let mut tree: Tree<_> = xs.into_iter().collect();
    tree.insert(k);
    let found = tree.contains(&k);
    tree.remove(&k);

    found && !tree.contains(&k)
}
