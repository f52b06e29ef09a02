use serde::Serialize;

use crate::error::ValidationError;

/// One rated aspect of how an issue was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingAspect {
    ResolutionSatisfaction,
    SpeedOfWork,
    CommunicationQuality,
    OverallExperience,
}

impl RatingAspect {
    pub const ALL: [RatingAspect; 4] = [
        RatingAspect::ResolutionSatisfaction,
        RatingAspect::SpeedOfWork,
        RatingAspect::CommunicationQuality,
        RatingAspect::OverallExperience,
    ];

    pub fn label_key(&self) -> &'static str {
        match self {
            RatingAspect::ResolutionSatisfaction => "resolutionQuality",
            RatingAspect::SpeedOfWork => "speedOfWork",
            RatingAspect::CommunicationQuality => "communication",
            RatingAspect::OverallExperience => "overallExperience",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            RatingAspect::ResolutionSatisfaction => {
                "How satisfied are you with how the issue was resolved?"
            }
            RatingAspect::SpeedOfWork => "How would you rate the time taken to resolve the issue?",
            RatingAspect::CommunicationQuality => {
                "How well were you kept informed about the progress?"
            }
            RatingAspect::OverallExperience => "How would you rate your overall experience?",
        }
    }

    fn index(&self) -> usize {
        match self {
            RatingAspect::ResolutionSatisfaction => 0,
            RatingAspect::SpeedOfWork => 1,
            RatingAspect::CommunicationQuality => 2,
            RatingAspect::OverallExperience => 3,
        }
    }
}

pub const MAX_STARS: u8 = 5;

/// Star ratings in progress; 0 means not rated yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ratings {
    stars: [u8; 4],
}

impl Ratings {
    pub fn get(&self, aspect: RatingAspect) -> u8 {
        self.stars[aspect.index()]
    }

    /// Values outside 1..=5 are ignored.
    pub fn set(&mut self, aspect: RatingAspect, stars: u8) {
        if (1..=MAX_STARS).contains(&stars) {
            self.stars[aspect.index()] = stars;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stars.iter().all(|s| (1..=MAX_STARS).contains(s))
    }
}

/// Insert payload for the issue_feedback table
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewFeedback {
    pub issue_id: String,
    pub user_id: String,
    pub resolution_satisfaction: u8,
    pub speed_of_work: u8,
    pub communication_quality: u8,
    pub overall_experience: u8,
    pub comments: Option<String>,
}

impl NewFeedback {
    pub fn new(
        issue_id: impl Into<String>,
        user_id: impl Into<String>,
        ratings: &Ratings,
        comments: &str,
    ) -> Result<Self, ValidationError> {
        if !ratings.is_complete() {
            return Err(ValidationError::IncompleteRatings);
        }

        let comments = comments.trim();

        Ok(Self {
            issue_id: issue_id.into(),
            user_id: user_id.into(),
            resolution_satisfaction: ratings.get(RatingAspect::ResolutionSatisfaction),
            speed_of_work: ratings.get(RatingAspect::SpeedOfWork),
            communication_quality: ratings.get(RatingAspect::CommunicationQuality),
            overall_experience: ratings.get(RatingAspect::OverallExperience),
            comments: (!comments.is_empty()).then(|| comments.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_ratings_rejected() {
        let mut ratings = Ratings::default();
        ratings.set(RatingAspect::SpeedOfWork, 4);
        assert_eq!(
            NewFeedback::new("i1", "u1", &ratings, ""),
            Err(ValidationError::IncompleteRatings)
        );
    }

    #[test]
    fn test_out_of_range_star_ignored() {
        let mut ratings = Ratings::default();
        ratings.set(RatingAspect::OverallExperience, 3);
        ratings.set(RatingAspect::OverallExperience, 9);
        assert_eq!(ratings.get(RatingAspect::OverallExperience), 3);
        ratings.set(RatingAspect::OverallExperience, 0);
        assert_eq!(ratings.get(RatingAspect::OverallExperience), 3);
    }

    #[test]
    fn test_feedback_payload() {
        let mut ratings = Ratings::default();
        for (i, aspect) in RatingAspect::ALL.into_iter().enumerate() {
            ratings.set(aspect, i as u8 + 2);
        }

        let feedback = NewFeedback::new("i1", "u1", &ratings, "   ").unwrap();
        assert_eq!(feedback.comments, None);

        let json = serde_json::to_value(&feedback).unwrap();
        assert_eq!(json["resolution_satisfaction"], 2);
        assert_eq!(json["overall_experience"], 5);
        assert!(json["comments"].is_null());
    }
}
