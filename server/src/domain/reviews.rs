//! Rating summary derivation

use crate::data::types::RatingSummary;

/// Lowest accepted review rating
pub const MIN_RATING: i64 = 1;
/// Highest accepted review rating
pub const MAX_RATING: i64 = 5;

impl RatingSummary {
    /// Summary of a product's current reviews: mean rating and count.
    ///
    /// An empty slice yields a rating of 0.
    pub fn from_ratings(ratings: &[i64]) -> Self {
        let count = ratings.len() as i64;
        let mean = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().sum::<i64>() as f64 / ratings.len() as f64
        };
        Self {
            ratings: mean,
            num_of_reviews: count,
        }
    }
}

pub fn is_valid_rating(rating: i64) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&rating)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ratings_are_zero() {
        let summary = RatingSummary::from_ratings(&[]);
        assert_eq!(summary.ratings, 0.0);
        assert_eq!(summary.num_of_reviews, 0);
    }

    #[test]
    fn test_mean_of_ratings() {
        let summary = RatingSummary::from_ratings(&[5, 4, 3]);
        assert_eq!(summary.ratings, 4.0);
        assert_eq!(summary.num_of_reviews, 3);

        let summary = RatingSummary::from_ratings(&[5, 2]);
        assert_eq!(summary.ratings, 3.5);
    }

    #[test]
    fn test_rating_bounds() {
        assert!(is_valid_rating(1));
        assert!(is_valid_rating(5));
        assert!(!is_valid_rating(0));
        assert!(!is_valid_rating(6));
    }
}
