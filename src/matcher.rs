use crate::embedding::Embedder;
use crate::knowledge::{Category, KnowledgeBase};
use std::sync::Arc;
use tracing::debug;

/// A category is only matched when its score is strictly above this.
pub const SIMILARITY_THRESHOLD: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMatch<'a> {
    pub category: &'a Category,
    pub score: f32,
}

pub struct CategoryMatcher {
    knowledge: Arc<KnowledgeBase>,
    embedder: Arc<dyn Embedder>,
}

impl CategoryMatcher {
    pub fn new(knowledge: Arc<KnowledgeBase>, embedder: Arc<dyn Embedder>) -> Self {
        Self { knowledge, embedder }
    }

    /// Scores `message` against every category key and returns the best one
    /// if it clears [`SIMILARITY_THRESHOLD`].
    ///
    /// Category keys are embedded on every call. Any embedding failure aborts
    /// the whole scan.
    pub async fn best_match(&self, message: &str) -> anyhow::Result<Option<CategoryMatch<'_>>> {
        let message_embedding = self.embedder.embed(message).await?;

        let mut best: Option<CategoryMatch<'_>> = None;
        for category in self.knowledge.categories() {
            let category_embedding = self.embedder.embed(&category.name).await?;
            let score = cosine_similarity(&message_embedding, &category_embedding)
                .map_err(|e| anyhow::anyhow!("Scoring category '{}' failed: {}", category.name, e))?;

            // Strictly greater: the first category wins a tie.
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(CategoryMatch { category, score });
            }
        }

        if let Some(b) = &best {
            debug!("Best category '{}' scored {:.3}", b.category.name, b.score);
        }

        Ok(best.filter(|b| b.score > SIMILARITY_THRESHOLD))
    }
}

/// Cosine of the angle between two vectors. A zero vector scores 0.0.
///
/// Empty or mismatched vectors, non-finite components, and a non-finite
/// result are errors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> anyhow::Result<f32> {
    if a.is_empty() || b.is_empty() {
        anyhow::bail!("empty embedding");
    }
    if a.len() != b.len() {
        anyhow::bail!("embedding dimensions differ ({} vs {})", a.len(), b.len());
    }
    if !a.iter().chain(b.iter()).all(|x| x.is_finite()) {
        anyhow::bail!("embedding contains non-finite values");
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    let score = dot_product / (magnitude_a * magnitude_b);
    if !score.is_finite() {
        anyhow::bail!("similarity is not finite");
    }
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::testing::{FailingEmbedder, StaticEmbedder};
    use crate::embedding::HashingEmbedder;

    fn kb(names: &[&str]) -> Arc<KnowledgeBase> {
        Arc::new(KnowledgeBase::new(
            names
                .iter()
                .map(|n| Category {
                    name: (*n).to_string(),
                    responses: vec![format!("about {}", n)],
                })
                .collect(),
        ))
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c).unwrap() - 0.0).abs() < 0.001);

        let d = vec![-2.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d).unwrap() + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_rejects_bad_vectors() {
        assert!(cosine_similarity(&[], &[]).is_err());
        assert!(cosine_similarity(&[1.0, 2.0], &[1.0]).is_err());
        assert!(cosine_similarity(&[f32::INFINITY, 1.0], &[1.0, 0.0]).is_err());
        assert!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 0.0]).is_err());
        // Finite inputs whose product overflows
        assert!(cosine_similarity(&[f32::MAX, f32::MAX], &[f32::MAX, f32::MAX]).is_err());
    }

    #[tokio::test]
    async fn test_exact_key_selects_category() {
        let knowledge = Arc::new(KnowledgeBase::builtin());
        let matcher = CategoryMatcher::new(knowledge, Arc::new(HashingEmbedder::new(384)));

        let m = matcher.best_match("What is your name?").await.unwrap().unwrap();
        assert_eq!(m.category.name, "What is your name?");
        assert!(m.score > 0.99);
    }

    #[tokio::test]
    async fn test_below_threshold_is_no_match() {
        let embedder = StaticEmbedder::new(
            &[("nutrition", vec![1.0, 0.0]), ("sleep_health", vec![0.0, 1.0])],
            vec![-1.0, -1.0],
        );
        let matcher = CategoryMatcher::new(kb(&["nutrition", "sleep_health"]), Arc::new(embedder));
        assert!(matcher.best_match("zxqv blorp").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_threshold_boundary() {
        let above = vec![0.31, (1.0f32 - 0.31 * 0.31).sqrt()];
        let below = vec![0.29, (1.0f32 - 0.29 * 0.29).sqrt()];
        let embedder = StaticEmbedder::new(
            &[("nutrition", vec![1.0, 0.0]), ("above", above), ("below", below)],
            vec![0.0, 0.0],
        );
        let matcher = CategoryMatcher::new(kb(&["nutrition"]), Arc::new(embedder));

        let m = matcher.best_match("above").await.unwrap().unwrap();
        assert!((m.score - 0.31).abs() < 1e-4);
        assert!(matcher.best_match("below").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_first_category_wins_tie() {
        let embedder = StaticEmbedder::new(
            &[
                ("a", vec![1.0, 0.0]),
                ("b", vec![1.0, 0.0]),
                ("c", vec![0.0, 1.0]),
                ("msg", vec![1.0, 0.0]),
            ],
            vec![0.0, 0.0],
        );
        let matcher = CategoryMatcher::new(kb(&["c", "a", "b"]), Arc::new(embedder));
        let m = matcher.best_match("msg").await.unwrap().unwrap();
        assert_eq!(m.category.name, "a");
    }

    #[tokio::test]
    async fn test_picks_highest_score() {
        let embedder = StaticEmbedder::new(
            &[
                ("a", vec![1.0, 1.0]),
                ("b", vec![1.0, 0.1]),
                ("msg", vec![1.0, 0.0]),
            ],
            vec![0.0, 0.0],
        );
        let matcher = CategoryMatcher::new(kb(&["a", "b"]), Arc::new(embedder));
        let m = matcher.best_match("msg").await.unwrap().unwrap();
        assert_eq!(m.category.name, "b");
    }

    #[tokio::test]
    async fn test_empty_table_is_no_match() {
        let matcher = CategoryMatcher::new(kb(&[]), Arc::new(HashingEmbedder::new(8)));
        assert!(matcher.best_match("anything").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_finite_embedding_aborts_scan() {
        let embedder = StaticEmbedder::new(
            &[
                ("a", vec![f32::INFINITY, 1.0]),
                ("b", vec![1.0, 0.0]),
                ("msg", vec![1.0, 0.0]),
            ],
            vec![0.0, 0.0],
        );
        let matcher = CategoryMatcher::new(kb(&["a", "b"]), Arc::new(embedder));
        assert!(matcher.best_match("msg").await.is_err());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_aborts_scan() {
        let embedder = StaticEmbedder::new(
            &[("a", vec![1.0, 0.0, 0.0]), ("b", vec![1.0, 0.0]), ("msg", vec![1.0, 0.0])],
            vec![0.0, 0.0],
        );
        let matcher = CategoryMatcher::new(kb(&["a", "b"]), Arc::new(embedder));
        assert!(matcher.best_match("msg").await.is_err());
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let matcher = CategoryMatcher::new(
            kb(&["nutrition", "sleep_health"]),
            Arc::new(FailingEmbedder {
                only: Some("sleep_health".to_string()),
            }),
        );
        assert!(matcher.best_match("nutrition").await.is_err());
    }
}
