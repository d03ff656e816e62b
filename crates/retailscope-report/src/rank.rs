use std::collections::BTreeMap;

/// Competition ranks ("1224") for rows already sorted by `key`.
///
/// Tied neighbours share a rank; the next distinct key skips ahead by the
/// size of the tie.
pub fn competition_ranks<T, K: PartialEq>(sorted: &[T], key: impl Fn(&T) -> K) -> Vec<usize> {
    let mut ranks = Vec::with_capacity(sorted.len());
    let mut previous: Option<K> = None;
    let mut current = 0;

    for (idx, row) in sorted.iter().enumerate() {
        let value = key(row);
        if previous.as_ref() != Some(&value) {
            current = idx + 1;
        }
        ranks.push(current);
        previous = Some(value);
    }

    ranks
}

/// Keep every rank-1 row of each partition, like
/// `RANK() OVER (PARTITION BY partition ORDER BY order) = 1`.
///
/// Partitions come out in key order. Within a partition the input order of
/// tied rows is preserved, so callers control the tie layout by sorting first.
pub fn top_ranked<T, P: Ord, K: Ord>(
    rows: Vec<T>,
    partition: impl Fn(&T) -> P,
    order: impl Fn(&T) -> K,
) -> Vec<T> {
    let mut partitions: BTreeMap<P, Vec<T>> = BTreeMap::new();
    for row in rows {
        partitions.entry(partition(&row)).or_default().push(row);
    }

    let mut winners = Vec::new();
    for (_, mut members) in partitions {
        members.sort_by_key(|row| order(row));
        let ranks = competition_ranks(&members, &order);
        winners.extend(
            members
                .into_iter()
                .zip(ranks)
                .filter(|(_, rank)| *rank == 1)
                .map(|(row, _)| row),
        );
    }
    winners
}

#[cfg(test)]
mod tests {
    use std::cmp::Reverse;

    use super::*;

    #[test]
    fn ties_share_rank_and_skip() {
        let values = [10, 20, 20, 30];
        assert_eq!(competition_ranks(&values, |v| *v), vec![1, 2, 2, 4]);
        assert!(competition_ranks::<i32, i32>(&[], |v| *v).is_empty());
    }

    #[test]
    fn top_ranked_keeps_all_ties_per_partition() {
        let rows = vec![("a", 5), ("b", 1), ("a", 9), ("a", 9), ("b", 3)];
        let top = top_ranked(rows, |row| row.0, |row| Reverse(row.1));
        assert_eq!(top, vec![("a", 9), ("a", 9), ("b", 3)]);
    }

    #[test]
    fn ascending_order_picks_minimum() {
        let rows = vec![("x", 4), ("x", 2), ("y", 7)];
        let top = top_ranked(rows, |row| row.0, |row| row.1);
        assert_eq!(top, vec![("x", 2), ("y", 7)]);
    }
}
