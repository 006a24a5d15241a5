use crate::matching::orientation::Orientation;
use crate::shared::error::RedactError;
use crate::shared::rect::Rect;

/// A scored match for one (mask, input orientation, mask orientation)
/// combination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub rect: Rect,
    pub score: f64,
    pub mask_index: usize,
    pub input: Orientation,
    pub mask: Orientation,
}

/// Reduction step for the running best: the challenger replaces the
/// incumbent only with a strictly higher score, so ties keep the earliest.
pub fn keep_better(best: Option<Candidate>, challenger: Candidate) -> Option<Candidate> {
    match best {
        Some(current) if challenger.score <= current.score || challenger.score.is_nan() => {
            Some(current)
        }
        _ => Some(challenger),
    }
}

/// Best candidate of a sequence, in iteration order.
pub fn select_best(candidates: impl IntoIterator<Item = Candidate>) -> Option<Candidate> {
    candidates.into_iter().fold(None, keep_better)
}

/// Final check before any destructive edit: the best score must be
/// strictly above `min_similarity`.
pub fn accept(best: Option<Candidate>, min_similarity: f64) -> Result<Candidate, RedactError> {
    match best {
        Some(c) if c.score > min_similarity => Ok(c),
        _ => Err(RedactError::NoConfidentMatch {
            best: best.map(|c| c.score),
            min_similarity,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(score: f64, mask_index: usize) -> Candidate {
        Candidate {
            rect: Rect::new(mask_index as i32, 0, 10, 10),
            score,
            mask_index,
            input: Orientation::Normal,
            mask: Orientation::Normal,
        }
    }

    #[test]
    fn test_select_best_picks_highest() {
        let best = select_best([candidate(0.2, 0), candidate(0.9, 1), candidate(0.5, 2)]).unwrap();
        assert_eq!(best.mask_index, 1);
    }

    #[test]
    fn test_ties_keep_first_found() {
        let best = select_best([candidate(0.7, 0), candidate(0.7, 1), candidate(0.7, 2)]).unwrap();
        assert_eq!(best.mask_index, 0);
    }

    #[test]
    fn test_empty_sequence_has_no_best() {
        assert!(select_best(std::iter::empty()).is_none());
    }

    #[test]
    fn test_nan_never_displaces() {
        let best = select_best([candidate(0.3, 0), candidate(f64::NAN, 1)]).unwrap();
        assert_eq!(best.mask_index, 0);
    }

    #[test]
    fn test_negative_scores_are_still_candidates() {
        let best = select_best([candidate(-0.4, 0), candidate(-0.1, 1)]).unwrap();
        assert_eq!(best.mask_index, 1);
    }

    #[test]
    fn test_accept_above_floor() {
        let c = candidate(0.95, 3);
        assert_eq!(accept(Some(c), 0.1).unwrap(), c);
    }

    #[test]
    fn test_accept_rejects_score_equal_to_floor() {
        let err = accept(Some(candidate(0.1, 0)), 0.1).unwrap_err();
        assert!(matches!(
            err,
            RedactError::NoConfidentMatch { best: Some(s), .. } if s == 0.1
        ));
    }

    #[test]
    fn test_accept_without_candidate() {
        let err = accept(None, 0.0).unwrap_err();
        assert!(matches!(err, RedactError::NoConfidentMatch { best: None, .. }));
    }
}
