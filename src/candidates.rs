use crate::config::SearchConfig;
use crate::geometry::ratio_score;
use crate::types::GridShape;

/// Every `(rows, columns)` factorization of `box_count` with `rows >= columns`,
/// closest to the target ratio first.
pub fn generate_candidates(box_count: usize, config: &SearchConfig) -> Vec<GridShape> {
    let mut candidates: Vec<GridShape> = (1..=box_count)
        .filter(|rows| box_count % rows == 0)
        .map(|rows| GridShape::new(rows, box_count / rows))
        .filter(|shape| shape.rows >= shape.columns)
        .collect();

    // Area is always `box_count` here; it only pins the tie-break order.
    candidates.sort_by(|a, b| {
        let score_a = ratio_score(a.rows, a.columns, config.target_ratio);
        let score_b = ratio_score(b.rows, b.columns, config.target_ratio);
        score_a
            .total_cmp(&score_b)
            .then_with(|| a.cells().cmp(&b.cells()))
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_candidates_valid(n: usize, candidates: &[GridShape], config: &SearchConfig) {
        for shape in candidates {
            assert_eq!(shape.cells(), n, "{shape} does not hold {n} boxes");
            assert!(shape.rows >= shape.columns, "{shape} is wider than tall");
        }
        for pair in candidates.windows(2) {
            let a = ratio_score(pair[0].rows, pair[0].columns, config.target_ratio);
            let b = ratio_score(pair[1].rows, pair[1].columns, config.target_ratio);
            assert!(a <= b, "{} scored {a} but precedes {} with {b}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_candidates_for_six() {
        let config = SearchConfig::default();
        let candidates = generate_candidates(6, &config);
        assert_eq!(candidates, vec![GridShape::new(3, 2), GridShape::new(6, 1)]);
        assert!(!candidates.contains(&GridShape::new(2, 3)));
        assert!(!candidates.contains(&GridShape::new(1, 6)));
    }

    #[test]
    fn test_candidates_for_twenty_four() {
        let config = SearchConfig::default();
        let candidates = generate_candidates(24, &config);
        assert_eq!(candidates[0], GridShape::new(6, 4));
        assert_eq!(
            candidates,
            vec![
                GridShape::new(6, 4),
                GridShape::new(8, 3),
                GridShape::new(12, 2),
                GridShape::new(24, 1),
            ]
        );
        assert_candidates_valid(24, &candidates, &config);
    }

    #[test]
    fn test_prime_and_one_have_trivial_factorization() {
        let config = SearchConfig::default();
        assert_eq!(generate_candidates(7, &config), vec![GridShape::new(7, 1)]);
        assert_eq!(generate_candidates(1, &config), vec![GridShape::new(1, 1)]);
    }

    #[test]
    fn test_zero_yields_nothing() {
        assert!(generate_candidates(0, &SearchConfig::default()).is_empty());
    }

    #[test]
    fn test_sorted_for_many_counts() {
        let config = SearchConfig::default();
        for n in 1..=120 {
            let candidates = generate_candidates(n, &config);
            assert!(!candidates.is_empty(), "no candidates for {n}");
            assert_candidates_valid(n, &candidates, &config);
        }
    }

    #[test]
    fn test_target_ratio_changes_order() {
        let config = SearchConfig {
            target_ratio: 4.0,
            ..SearchConfig::default()
        };
        let candidates = generate_candidates(36, &config);
        // 12/3 = 4 matches exactly.
        assert_eq!(candidates[0], GridShape::new(12, 3));
        assert_candidates_valid(36, &candidates, &config);
    }
}
