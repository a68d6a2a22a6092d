/// Seed numbers (1-based) in bracket line order for a power-of-two size.
///
/// Adjacent entries meet in the first round and the top two seeds land in
/// opposite halves: `[1, 4, 2, 3]` for four, `[1, 8, 4, 5, 2, 7, 3, 6]` for eight.
pub fn seed_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let span = order.len() * 2 + 1;
        order = order.iter().flat_map(|&seed| [seed, span - seed]).collect();
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_orders() {
        assert_eq!(seed_order(1), vec![1]);
        assert_eq!(seed_order(2), vec![1, 2]);
        assert_eq!(seed_order(4), vec![1, 4, 2, 3]);
        assert_eq!(seed_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
    }

    #[test]
    fn test_first_round_pairs_sum_to_size_plus_one() {
        let order = seed_order(16);
        for pair in order.chunks(2) {
            assert_eq!(pair[0] + pair[1], 17);
        }
    }
}
