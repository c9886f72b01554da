use serde::Serialize;

use crate::Fragment;

fn owned(text: Option<&str>) -> Option<String> {
    text.map(str::to_string)
}

/// One row of a name search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeacherSummary {
    /// The teacher's legacy id, the one detail lookups take.
    pub id: Option<u64>,
    pub rating: Option<f64>,
    pub rating_count: Option<u64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    pub difficulty: Option<f64>,
    pub would_take_again_percent: Option<f64>,
    pub school_name: Option<String>,
}

impl TeacherSummary {
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.clone(),
            (None, None) => String::new(),
        }
    }
}

/// A single teacher with every reference followed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeacherDetail {
    /// Relay store id of the teacher fragment.
    pub relay_id: Option<String>,
    pub summary: TeacherSummary,
    pub school: Option<SchoolRecord>,
    pub ratings_distribution: Option<RatingsDistribution>,
    pub courses: Vec<CourseRecord>,
    pub ratings: Vec<RatingRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRecord {
    pub id: Option<String>,
    pub legacy_id: Option<u64>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub avg_rating: Option<f64>,
    pub num_ratings: Option<u64>,
}

impl SchoolRecord {
    pub fn from_fragment(school: &Fragment<'_>) -> Self {
        Self {
            id: owned(school.str_field("id")),
            legacy_id: school.u64_field("legacyId"),
            name: owned(school.str_field("name")),
            city: owned(school.str_field("city")),
            state: owned(school.str_field("state")),
            country: owned(school.str_field("country")),
            avg_rating: school.f64_field("avgRating"),
            num_ratings: school.u64_field("numRatings"),
        }
    }

    /// "name, city, state" with absent parts left out.
    pub fn location(&self) -> String {
        [&self.name, &self.city, &self.state]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourseRecord {
    pub course_name: Option<String>,
    pub course_rating_count: Option<u64>,
}

impl CourseRecord {
    pub fn from_fragment(course: &Fragment<'_>) -> Self {
        Self {
            course_name: owned(course.str_field("courseName")),
            course_rating_count: course.u64_field("courseCount"),
        }
    }
}

const DISTRIBUTION_LABELS: [&str; 5] = ["Awful", "Okay", "Good", "Great", "Awesome"];

/// Number of ratings per score bucket, `r1` being the worst.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatingsDistribution {
    pub r1: u64,
    pub r2: u64,
    pub r3: u64,
    pub r4: u64,
    pub r5: u64,
    pub total: Option<u64>,
}

impl RatingsDistribution {
    /// Absent or mistyped buckets count as empty.
    pub fn from_fragment(distribution: &Fragment<'_>) -> Self {
        let bucket = |name: &str| distribution.u64_field(name).unwrap_or(0);
        Self {
            r1: bucket("r1"),
            r2: bucket("r2"),
            r3: bucket("r3"),
            r4: bucket("r4"),
            r5: bucket("r5"),
            total: distribution.u64_field("total"),
        }
    }

    pub fn buckets(&self) -> [u64; 5] {
        [self.r1, self.r2, self.r3, self.r4, self.r5]
    }

    /// Buckets paired with their display labels, worst first.
    pub fn labeled(&self) -> [(&'static str, u64); 5] {
        let buckets = self.buckets();
        std::array::from_fn(|i| (DISTRIBUTION_LABELS[i], buckets[i]))
    }

    /// Sum of the buckets unless the store carried its own total.
    pub fn total(&self) -> u64 {
        self.total.unwrap_or_else(|| self.buckets().iter().sum())
    }

    pub fn has_ratings(&self) -> bool {
        self.total() > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub id: Option<String>,
    pub legacy_id: Option<u64>,
    pub comment: Option<String>,
    pub class: Option<String>,
    pub date: Option<String>,
    pub clarity_rating: Option<f64>,
    pub helpful_rating: Option<f64>,
    pub difficulty_rating: Option<f64>,
    pub grade: Option<String>,
    pub would_take_again: Option<bool>,
    pub attendance_mandatory: Option<String>,
    pub is_for_online_class: Option<bool>,
    pub is_for_credit: Option<bool>,
    pub rating_tags: Option<String>,
    pub thumbs_up_total: Option<u64>,
    pub thumbs_down_total: Option<u64>,
}

impl RatingRecord {
    /// Every field is read on its own, so one mistyped field leaves the rest.
    pub fn from_fragment(rating: &Fragment<'_>) -> Self {
        Self {
            id: owned(rating.str_field("id")),
            legacy_id: rating.u64_field("legacyId"),
            comment: owned(rating.str_field("comment")),
            class: owned(rating.str_field("class")),
            date: owned(rating.str_field("date")),
            clarity_rating: rating.f64_field("clarityRating"),
            helpful_rating: rating.f64_field("helpfulRating"),
            difficulty_rating: rating.f64_field("difficultyRating"),
            grade: owned(rating.str_field("grade")),
            // 1/0 upstream, but a plain boolean reads the same.
            would_take_again: rating
                .bool_field("wouldTakeAgain")
                .or_else(|| rating.i64_field("wouldTakeAgain").map(|flag| flag != 0)),
            attendance_mandatory: owned(rating.str_field("attendanceMandatory")),
            is_for_online_class: rating.bool_field("isForOnlineClass"),
            is_for_credit: rating.bool_field("isForCredit"),
            rating_tags: owned(rating.str_field("ratingTags")),
            thumbs_up_total: rating.u64_field("thumbsUpTotal"),
            thumbs_down_total: rating.u64_field("thumbsDownTotal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_labels_follow_buckets() {
        let distribution = RatingsDistribution {
            r1: 1,
            r2: 0,
            r3: 2,
            r4: 3,
            r5: 4,
            total: None,
        };
        assert_eq!(
            distribution.labeled(),
            [("Awful", 1), ("Okay", 0), ("Good", 2), ("Great", 3), ("Awesome", 4)]
        );
        assert_eq!(distribution.total(), 10);
        assert!(distribution.has_ratings());
        assert!(!RatingsDistribution::default().has_ratings());
    }

    fn fragment_fields(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(fields) => fields,
            other => panic!("fragment must be an object, got {other}"),
        }
    }

    #[test]
    fn rating_keeps_fields_around_a_mistyped_one() {
        let fields = fragment_fields(serde_json::json!({
            "__typename": "Rating",
            "comment": "Hard exams",
            "wouldTakeAgain": "maybe",
            "clarityRating": 4,
            "thumbsUpTotal": "lots"
        }));
        let rating = RatingRecord::from_fragment(&Fragment::new(&fields));
        assert_eq!(rating.comment.as_deref(), Some("Hard exams"));
        assert_eq!(rating.clarity_rating, Some(4.0));
        assert!(rating.would_take_again.is_none());
        assert!(rating.thumbs_up_total.is_none());
    }

    #[test]
    fn would_take_again_reads_flag_or_boolean() {
        let numeric = fragment_fields(serde_json::json!({"wouldTakeAgain": 0}));
        let boolean = fragment_fields(serde_json::json!({"wouldTakeAgain": true}));
        assert_eq!(
            RatingRecord::from_fragment(&Fragment::new(&numeric)).would_take_again,
            Some(false)
        );
        assert_eq!(
            RatingRecord::from_fragment(&Fragment::new(&boolean)).would_take_again,
            Some(true)
        );
    }

    #[test]
    fn distribution_treats_bad_buckets_as_empty() {
        let fields = fragment_fields(serde_json::json!({"r1": "x", "r5": 3}));
        let distribution = RatingsDistribution::from_fragment(&Fragment::new(&fields));
        assert_eq!(distribution.buckets(), [0, 0, 0, 0, 3]);
        assert_eq!(distribution.total(), 3);
    }

    #[test]
    fn school_location_skips_missing_parts() {
        let school = SchoolRecord {
            name: Some("Acme U".to_string()),
            state: Some("WA".to_string()),
            ..Default::default()
        };
        assert_eq!(school.location(), "Acme U, WA");
    }

    #[test]
    fn full_name_joins_available_parts() {
        let teacher = TeacherSummary {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            ..Default::default()
        };
        assert_eq!(teacher.full_name(), "Jane Doe");
        assert_eq!(TeacherSummary::default().full_name(), "");
    }
}
