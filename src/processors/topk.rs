//! Top-k selection over a score vector.

use crate::core::errors::{VisionError, VisionResult};

/// Indexes and scores of the best entries, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct TopkResult {
    /// Positions in the original score vector.
    pub indexes: Vec<usize>,
    /// Scores at those positions.
    pub scores: Vec<f32>,
}

/// Ranks `scores` in descending order and keeps the first `k`.
///
/// The sort is stable, so equal scores keep ascending index order. When `k`
/// exceeds the number of scores every entry is returned.
///
/// # Errors
///
/// Returns a configuration error if `k` is 0.
pub fn topk(scores: &[f32], k: usize) -> VisionResult<TopkResult> {
    if k == 0 {
        return Err(VisionError::config_error("k must be greater than 0"));
    }

    let mut indexed_scores: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    sort_descending_stable(&mut indexed_scores, |(_, score)| *score);
    indexed_scores.truncate(k);

    let (indexes, scores) = indexed_scores.into_iter().unzip();
    Ok(TopkResult { indexes, scores })
}

/// Index of the largest score; the lowest index wins ties and NaN never wins
/// over a number.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, score)| match best {
            Some((_, best_score)) if best_score >= score || score.is_nan() => best,
            _ => Some((i, score)),
        })
}

/// NaN ranks below every number.
fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}

/// Sorts by a float key in descending order, keeping emission order for ties.
pub(crate) fn sort_descending_stable<T>(items: &mut [T], key: impl Fn(&T) -> f32) {
    items.sort_by(|a, b| rank_key(key(b)).total_cmp(&rank_key(key(a))));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_prefer_lower_index() {
        let result = topk(&[0.2, 0.2, 0.5], 2).unwrap();
        assert_eq!(result.indexes, vec![2, 0]);
        assert_eq!(result.scores, vec![0.5, 0.2]);
    }

    #[test]
    fn test_k_larger_than_input() {
        let result = topk(&[0.1, 0.9], 10).unwrap();
        assert_eq!(result.indexes, vec![1, 0]);
    }

    #[test]
    fn test_zero_k_rejected() {
        assert!(topk(&[1.0], 0).unwrap_err().is_configuration());
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.3, 0.7, 0.7]), Some((1, 0.7)));
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[f32::NAN, 0.2, f32::NAN]), Some((1, 0.2)));
    }

    #[test]
    fn test_nan_scores_rank_last() {
        let scores: Vec<f32> = (0..64)
            .map(|i| if i % 3 == 0 { f32::NAN } else { i as f32 / 64.0 })
            .collect();
        let result = topk(&scores, 5).unwrap();
        assert_eq!(result.indexes, vec![62, 61, 59, 58, 56]);

        let all = topk(&[f32::NAN, 0.1], 2).unwrap();
        assert_eq!(all.indexes, vec![1, 0]);
    }
}
