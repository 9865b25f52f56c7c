use crate::domain::model::OrderedSet;

/// Union of two ordered sets.
///
/// `existing` keeps its order; entries of `incoming` that are not present yet are
/// appended in their own order. The second value is how many were appended.
pub fn merge<T: PartialEq + Clone>(
    existing: &OrderedSet<T>,
    incoming: &OrderedSet<T>,
) -> (OrderedSet<T>, usize) {
    let mut merged = existing.clone();
    let added = incoming
        .iter()
        .filter(|item| merged.insert((*item).clone()))
        .count();
    (merged, added)
}
