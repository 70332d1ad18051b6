use indexmap::IndexMap;
use log::debug;

use crate::peaks::PeakMatch;

/// One candidate that survived deduplication and minimum-match filtering,
/// with its cosine score and the injective set of matches that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// Local index into the scan's [`CandidateSet`](super::CandidateSet)
    pub candidate: usize,
    pub cosine_score: f64,
    pub matches: Vec<PeakMatch>,
}

impl ScoredCandidate {
    pub fn matched_peaks(&self) -> usize {
        self.matches.len()
    }

    /// The composite MACC score for this candidate
    pub fn macc_score(&self) -> f64 {
        macc_score(self.matches.len(), self.cosine_score)
    }

    /// Summed matched query intensity, rounded to three decimals
    pub fn ion_count(&self) -> f64 {
        let total: f64 = self.matches.iter().map(|m| m.query_intensity).sum();
        (total * 1000.0).round() / 1000.0
    }
}

/// The key used to rank candidates when no candidate clears the cosine
/// threshold and a single fallback identification must be chosen.
///
/// Exposed as an explicit policy because the two keys order candidates
/// differently once matched-peak counts diverge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RankingPolicy {
    /// Rank by cosine similarity alone
    #[default]
    CosineScore,
    /// Rank by the composite MACC score
    MaccScore,
}

impl RankingPolicy {
    pub fn key(&self, scored: &ScoredCandidate) -> f64 {
        match self {
            Self::CosineScore => scored.cosine_score,
            Self::MaccScore => scored.macc_score(),
        }
    }
}

/// The cosine of the angle between two index-aligned intensity vectors.
///
/// NaN when either vector has zero norm; callers must guard before using
/// the value.
pub fn cosine_similarity(u: &[f64], v: &[f64]) -> f64 {
    let dot: f64 = u.iter().zip(v.iter()).map(|(a, b)| a * b).sum();
    let norm_u = u.iter().map(|a| a * a).sum::<f64>().sqrt();
    let norm_v = v.iter().map(|b| b * b).sum::<f64>().sqrt();
    dot / (norm_u * norm_v)
}

/// The composite MACC score, weighing the cosine score by the number of
/// matched fragment peaks: `matched_peaks^(1/5) * cosine_score`
pub fn macc_score(matched_peaks: usize, cosine_score: f64) -> f64 {
    (matched_peaks as f64).powf(1.0 / 5.0) * cosine_score
}

/// Reduce one candidate's raw matches to an injective pairing.
///
/// Two passes, each keeping the first-seen maximum query intensity under
/// strict greater-than so ties favor the earlier match: first one survivor
/// per target peak, then one survivor per query peak among those. The
/// result shares no query-peak or target-peak identity between matches.
pub fn deduplicate(matches: Vec<PeakMatch>) -> Vec<PeakMatch> {
    let mut by_target: IndexMap<u64, PeakMatch> = IndexMap::new();
    for m in matches {
        let key = m.target_mz.to_bits();
        match by_target.get(&key) {
            Some(best) if m.query_intensity > best.query_intensity => {
                by_target.insert(key, m);
            }
            Some(_) => {}
            None => {
                by_target.insert(key, m);
            }
        }
    }

    let mut by_query: IndexMap<u64, PeakMatch> = IndexMap::new();
    for m in by_target.into_values() {
        let key = m.query_mz.to_bits();
        match by_query.get(&key) {
            Some(best) if m.query_intensity > best.query_intensity => {
                by_query.insert(key, m);
            }
            Some(_) => {}
            None => {
                by_query.insert(key, m);
            }
        }
    }
    by_query.into_values().collect()
}

/// Group raw matches by candidate, deduplicate each group, and score the
/// candidates that retain at least `min_matched_peaks` matches.
///
/// Candidates whose deduplicated intensity vectors have zero norm cannot
/// be scored and are dropped.
pub fn score_candidates(matches: Vec<PeakMatch>, min_matched_peaks: usize) -> Vec<ScoredCandidate> {
    let mut groups: IndexMap<usize, Vec<PeakMatch>> = IndexMap::new();
    for m in matches {
        groups.entry(m.candidate).or_default().push(m);
    }

    let mut scored = Vec::new();
    for (candidate, group) in groups {
        let deduped = deduplicate(group);
        if deduped.len() < min_matched_peaks {
            debug!(
                "Dropping candidate {candidate}: {} matched peaks after deduplication",
                deduped.len()
            );
            continue;
        }
        let query: Vec<f64> = deduped.iter().map(|m| m.query_intensity).collect();
        let target: Vec<f64> = deduped.iter().map(|m| m.target_intensity).collect();
        let cosine_score = cosine_similarity(&query, &target);
        if !cosine_score.is_finite() {
            debug!("Dropping candidate {candidate}: degenerate intensity vector");
            continue;
        }
        scored.push(ScoredCandidate {
            candidate,
            cosine_score,
            matches: deduped,
        });
    }
    scored
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::peaks::{PeakMatch, QueryPeak, TargetPeak};

    fn mk(query_mz: f64, query_intensity: f64, target_mz: f64, candidate: usize) -> PeakMatch {
        PeakMatch::new(
            QueryPeak::new(query_mz, query_intensity, 0),
            TargetPeak::new(target_mz, 100.0, candidate),
        )
    }

    #[test]
    fn test_cosine_self_similarity_is_one() {
        let v = vec![3.0, 4.0, 5.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_is_commutative() {
        let u = vec![1.0, 2.0, 3.0];
        let v = vec![9.0, 1.0, 4.0];
        assert_eq!(cosine_similarity(&u, &v), cosine_similarity(&v, &u));
    }

    #[test]
    fn test_cosine_zero_norm_is_nan() {
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).is_nan());
        assert!(cosine_similarity(&[], &[]).is_nan());
    }

    #[test]
    fn test_macc_score() {
        assert!((macc_score(1, 0.9) - 0.9).abs() < 1e-12);
        let expected = 2f64.powf(0.2) * 0.5;
        assert!((macc_score(2, 0.5) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_deduplicate_is_injective() {
        let matches = vec![
            // two query peaks claiming the same target; the stronger wins
            mk(100.0, 500.0, 200.0, 0),
            mk(101.0, 900.0, 200.0, 0),
            // one query peak claiming two targets; survives only once
            mk(101.0, 900.0, 201.0, 0),
            mk(150.0, 50.0, 250.0, 0),
        ];
        let deduped = deduplicate(matches);
        let mut queries: Vec<u64> = deduped.iter().map(|m| m.query_mz.to_bits()).collect();
        let mut targets: Vec<u64> = deduped.iter().map(|m| m.target_mz.to_bits()).collect();
        queries.sort_unstable();
        targets.sort_unstable();
        queries.dedup();
        targets.dedup();
        assert_eq!(queries.len(), deduped.len());
        assert_eq!(targets.len(), deduped.len());
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_deduplicate_ties_favor_first_seen() {
        let first = mk(100.0, 500.0, 200.0, 0);
        let second = mk(101.0, 500.0, 200.0, 0);
        let deduped = deduplicate(vec![first, second]);
        assert_eq!(deduped, vec![first]);
    }

    #[test]
    fn test_score_candidates_groups_by_candidate() {
        let matches = vec![
            mk(100.0, 500.0, 100.0005, 0),
            mk(200.0, 1000.0, 200.001, 0),
            mk(100.0, 500.0, 100.0004, 1),
            mk(200.0, 1000.0, 200.0008, 1),
        ];
        let scored = score_candidates(matches, 2);
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].candidate, 0);
        assert_eq!(scored[1].candidate, 1);
        assert_eq!(scored[0].matched_peaks(), 2);
    }

    #[test]
    fn test_score_candidates_enforces_minimum_matches() {
        let matches = vec![mk(100.0, 500.0, 100.0005, 0), mk(200.0, 1000.0, 200.001, 0)];
        assert_eq!(score_candidates(matches.clone(), 2).len(), 1);
        assert!(score_candidates(matches, 3).is_empty());
    }

    #[test]
    fn test_score_candidates_drops_degenerate_vectors() {
        let matches = vec![mk(100.0, 0.0, 100.0005, 0), mk(200.0, 0.0, 200.001, 0)];
        assert!(score_candidates(matches, 2).is_empty());
    }

    #[test]
    fn test_ion_count_rounding() {
        let scored = ScoredCandidate {
            candidate: 0,
            cosine_score: 1.0,
            matches: vec![mk(100.0, 500.1234, 100.0, 0), mk(200.0, 1000.111, 200.0, 0)],
        };
        assert_eq!(scored.ion_count(), 1500.234);
    }

    #[test]
    fn test_ranking_policies_diverge() {
        let few_strong = ScoredCandidate {
            candidate: 0,
            cosine_score: 0.95,
            matches: vec![mk(100.0, 1.0, 100.0, 0)],
        };
        let many_weaker = ScoredCandidate {
            candidate: 1,
            cosine_score: 0.80,
            matches: (0..6).map(|i| mk(100.0 + i as f64, 1.0, 100.0 + i as f64, 1)).collect(),
        };
        assert!(RankingPolicy::CosineScore.key(&few_strong) > RankingPolicy::CosineScore.key(&many_weaker));
        assert!(RankingPolicy::MaccScore.key(&many_weaker) > RankingPolicy::MaccScore.key(&few_strong));
    }
}
