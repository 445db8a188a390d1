//! Post-fetch clip transform: shuffle, then drop clips that are too recent.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::api::Clip;

/// Clips younger than this are not eligible for playback.
pub const DEFAULT_MIN_CLIP_AGE_DAYS: i64 = 21;

/// Shuffles a clip batch and filters out recent clips.
#[derive(Debug, Clone, Copy)]
pub struct ClipCurator {
    min_age: Duration,
}

impl Default for ClipCurator {
    fn default() -> Self {
        Self::new(Duration::days(DEFAULT_MIN_CLIP_AGE_DAYS))
    }
}

impl ClipCurator {
    pub fn new(min_age: Duration) -> Self {
        Self { min_age }
    }

    pub fn min_age(&self) -> Duration {
        self.min_age
    }

    /// Shuffle, then keep only clips created strictly before `now - min_age`.
    ///
    /// Survivors keep their shuffled order.
    pub fn curate<R: Rng + ?Sized>(
        &self,
        clips: Vec<Clip>,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Vec<Clip> {
        let fetched = clips.len();
        let clips = self.filter_recent(shuffle(clips, rng), now);
        tracing::debug!(fetched, kept = clips.len(), "Curated clips");
        clips
    }

    /// Drop every clip with `created_at >= now - min_age`.
    pub fn filter_recent(&self, clips: Vec<Clip>, now: DateTime<Utc>) -> Vec<Clip> {
        let cutoff = now - self.min_age;
        clips
            .into_iter()
            .filter(|clip| clip.created_at < cutoff)
            .collect()
    }
}

/// Uniform random permutation (Fisher–Yates).
pub fn shuffle<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    items.shuffle(rng);
    items
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::Map;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn clip(id: &str, created_at: DateTime<Utc>) -> Clip {
        Clip {
            id: id.into(),
            title: format!("clip {id}"),
            url: String::new(),
            broadcaster_id: "1".into(),
            broadcaster_name: "someone".into(),
            creator_name: String::new(),
            view_count: 0,
            duration: 30.0,
            thumbnail_url: String::new(),
            created_at,
            extra: Map::new(),
        }
    }

    fn aged(id: &str, days: i64) -> Clip {
        clip(id, now() - Duration::days(days))
    }

    fn ids(clips: &[Clip]) -> HashSet<String> {
        clips.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn mixed_ages_keep_only_old_clips() {
        let mut rng = StdRng::seed_from_u64(7);
        let batch = vec![aged("1", 30), aged("2", 40), aged("3", 10)];

        let result = ClipCurator::default().curate(batch, now(), &mut rng);

        assert_eq!(result.len(), 2);
        assert_eq!(ids(&result), ids(&[aged("1", 30), aged("2", 40)]));
    }

    #[test]
    fn all_old_clips_form_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let batch: Vec<Clip> = (0..20).map(|i| aged(&i.to_string(), 22 + i)).collect();

        let result = ClipCurator::default().curate(batch.clone(), now(), &mut rng);

        assert_eq!(result.len(), batch.len());
        assert_eq!(ids(&result), ids(&batch));
    }

    #[test]
    fn cutoff_boundary_is_dropped() {
        let cutoff = now() - Duration::days(21);
        let batch = vec![
            clip("at", cutoff),
            clip("before", cutoff - Duration::seconds(1)),
            clip("after", cutoff + Duration::seconds(1)),
        ];

        let kept = ClipCurator::default().filter_recent(batch, now());

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "before");
    }

    #[test]
    fn filter_is_idempotent() {
        let curator = ClipCurator::default();
        let batch = vec![aged("1", 5), aged("2", 25), aged("3", 21), aged("4", 100)];

        let once = curator.filter_recent(batch, now());
        let twice = curator.filter_recent(once.clone(), now());

        assert_eq!(once, twice);
    }

    #[test]
    fn empty_and_fully_filtered_batches_are_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let curator = ClipCurator::default();

        assert!(curator.curate(Vec::new(), now(), &mut rng).is_empty());
        assert!(
            curator
                .curate(vec![aged("1", 0), aged("2", 20)], now(), &mut rng)
                .is_empty()
        );
    }

    #[test]
    fn survivors_keep_shuffled_order() {
        let batch: Vec<Clip> = (0..10).map(|i| aged(&i.to_string(), 30 + i)).collect();

        let expected = shuffle(batch.clone(), &mut StdRng::seed_from_u64(99));
        let curated = ClipCurator::default().curate(batch, now(), &mut StdRng::seed_from_u64(99));

        assert_eq!(curated, expected);
    }

    #[test]
    fn shuffle_is_deterministic_for_a_seed() {
        let items: Vec<u32> = (0..16).collect();

        let a = shuffle(items.clone(), &mut StdRng::seed_from_u64(3));
        let b = shuffle(items.clone(), &mut StdRng::seed_from_u64(3));

        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, items);
    }

    #[test]
    fn shuffle_reaches_every_ordering_of_three() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut seen = HashSet::new();
        for _ in 0..600 {
            seen.insert(shuffle(vec![1, 2, 3], &mut rng));
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn custom_min_age_is_honored() {
        let curator = ClipCurator::new(Duration::days(7));
        let kept = curator.filter_recent(vec![aged("1", 5), aged("2", 8)], now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "2");
    }
}
