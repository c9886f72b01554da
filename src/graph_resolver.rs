//! Reassembles teachers out of a [`FlatStore`]. Pure and synchronous: no
//! network access happens here.

use log::debug;

use crate::{
    CourseRecord, FlatStore, Fragment, RatingRecord, RatingsDistribution, SchoolRecord,
    TeacherDetail, TeacherSummary,
};

const TEACHER_TYPENAME: &str = "Teacher";

// The first page of ratings is stored under a field whose name carries the
// connection arguments. If upstream changes the page size this stops
// resolving and the rating list comes back empty.
pub const RATINGS_FIRST_PAGE_FIELD: &str = "ratings(first:20)";

/// Every teacher fragment in payload order, with the school name filled in.
pub fn resolve_search_results(store: &FlatStore) -> Vec<TeacherSummary> {
    store
        .fragments_of_type(TEACHER_TYPENAME)
        .map(|(_, teacher)| summarize(store, &teacher))
        .collect()
}

/// The teacher of a detail page, or `None` if the store holds no teacher.
pub fn resolve_teacher_detail(store: &FlatStore) -> Option<TeacherDetail> {
    let mut teachers = store.fragments_of_type(TEACHER_TYPENAME);
    let (key, teacher) = teachers.next()?;
    if teachers.next().is_some() {
        debug!("detail store has more than one teacher, using {key}");
    }

    Some(TeacherDetail {
        relay_id: teacher.str_field("id").map(str::to_string),
        summary: summarize(store, &teacher),
        school: store
            .resolve_field(&teacher, "school")
            .map(|school| SchoolRecord::from_fragment(&school)),
        ratings_distribution: store
            .resolve_field(&teacher, "ratingsDistribution")
            .map(|distribution| RatingsDistribution::from_fragment(&distribution)),
        courses: resolve_courses(store, &teacher),
        ratings: resolve_ratings(store, &teacher),
    })
}

fn summarize(store: &FlatStore, teacher: &Fragment<'_>) -> TeacherSummary {
    TeacherSummary {
        id: teacher.u64_field("legacyId"),
        rating: teacher.f64_field("avgRating"),
        rating_count: teacher.u64_field("numRatings"),
        first_name: teacher.str_field("firstName").map(str::to_string),
        last_name: teacher.str_field("lastName").map(str::to_string),
        department: teacher.str_field("department").map(str::to_string),
        difficulty: teacher.f64_field("avgDifficulty"),
        would_take_again_percent: teacher.f64_field("wouldTakeAgainPercent"),
        school_name: store
            .resolve_field(teacher, "school")
            .and_then(|school| school.str_field("name"))
            .map(str::to_string),
    }
}

fn resolve_courses(store: &FlatStore, teacher: &Fragment<'_>) -> Vec<CourseRecord> {
    teacher
        .ref_list_field("courseCodes")
        .iter()
        .filter_map(|key| store.resolve(key))
        .map(|course| CourseRecord::from_fragment(&course))
        .collect()
}

// teacher -> rating connection -> edges -> edge.node -> rating
fn resolve_ratings(store: &FlatStore, teacher: &Fragment<'_>) -> Vec<RatingRecord> {
    let Some(connection) = store.resolve_field(teacher, RATINGS_FIRST_PAGE_FIELD) else {
        return Vec::new();
    };

    connection
        .ref_list_field("edges")
        .iter()
        .filter_map(|edge_key| store.resolve(edge_key))
        .filter_map(|edge| store.resolve_field(&edge, "node"))
        .map(|rating| RatingRecord::from_fragment(&rating))
        .collect()
}
