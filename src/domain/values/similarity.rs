//! Cosine similarity and top-k ranking shared by every vector store backend.

/// Cosine similarity of two vectors in `[-1, 1]`.
///
/// Returns 0.0 when the lengths differ, either vector is empty, or either
/// has zero norm. Each vector is scaled by its largest magnitude first, so
/// finite inputs of any size compare by direction alone.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let scale_a = max_abs(a);
    let scale_b = max_abs(b);
    if scale_a == 0.0 || scale_b == 0.0 || !scale_a.is_finite() || !scale_b.is_finite() {
        return 0.0;
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (x / scale_a, y / scale_b);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if score.is_finite() {
        score.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(0.0_f64, |m, x| m.max(x.abs()))
}

/// Scores every candidate against `query` and keeps the best `top_k`.
///
/// Candidates must be supplied in insertion order: the sort is stable, so
/// equal scores keep that order and the earlier insert ranks first.
pub fn rank_top_k<T, E, I>(query: &[f64], candidates: I, top_k: usize) -> Vec<(T, f64)>
where
    E: AsRef<[f64]>,
    I: IntoIterator<Item = (T, E)>,
{
    if top_k == 0 {
        return Vec::new();
    }
    let mut scored: Vec<(T, f64)> = candidates
        .into_iter()
        .map(|(item, embedding)| {
            let score = cosine_similarity(query, embedding.as_ref());
            (item, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_k);
    scored
}

pub fn l2_normalize(v: &mut [f64]) {
    let scale = max_abs(v);
    if scale == 0.0 || !scale.is_finite() {
        return;
    }
    let norm = scale * v.iter().map(|x| (x / scale).powi(2)).sum::<f64>().sqrt();
    for x in v.iter_mut() {
        *x /= norm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((sim - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-12);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_norm_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_extreme_magnitudes_compare_by_direction() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1e200, 0.0]) - 1.0).abs() < 1e-12);
        assert!((cosine_similarity(&[1.0, 0.0], &[1e-200, 0.0]) - 1.0).abs() < 1e-12);
        assert!((cosine_similarity(&[1e200, 0.0], &[1e-200, 0.0]) - 1.0).abs() < 1e-12);
        assert!((cosine_similarity(&[1e200, 1e200], &[1.0, 0.0]) - 0.5_f64.sqrt()).abs() < 1e-12);
        assert!((cosine_similarity(&[f64::MAX, -f64::MAX], &[-1.0, 1.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rank_orders_descending_and_truncates() {
        let candidates = vec![
            ("b", vec![0.0, 1.0, 0.0]),
            ("a", vec![1.0, 0.0, 0.0]),
            ("c", vec![0.7, 0.7, 0.0]),
        ];
        let ranked = rank_top_k(&[1.0, 0.0, 0.0], candidates, 2);
        let ids: Vec<_> = ranked.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(ranked[0].1 > ranked[1].1);
    }

    #[test]
    fn test_rank_ties_keep_insertion_order() {
        let candidates = vec![
            ("first", vec![1.0, 0.0]),
            ("second", vec![2.0, 0.0]),
            ("third", vec![0.5, 0.0]),
        ];
        let ranked = rank_top_k(&[1.0, 0.0], candidates, 3);
        let ids: Vec<_> = ranked.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_rank_zero_k() {
        let ranked = rank_top_k(&[1.0], vec![("a", vec![1.0])], 0);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_normalize() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-12);
        assert!((v[1] - 0.8).abs() < 1e-12);

        let mut huge = vec![3e200, 4e200];
        l2_normalize(&mut huge);
        assert!((huge[0] - 0.6).abs() < 1e-12);
        assert!((huge[1] - 0.8).abs() < 1e-12);

        let mut zero = vec![0.0, 0.0];
        l2_normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }
}
