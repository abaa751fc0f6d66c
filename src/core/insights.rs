//! Summary statistics over a course collection

use crate::core::models::course::base_faculty;
use crate::core::models::Course;
use std::collections::HashMap;

/// A record holding an extreme value
#[derive(Debug, Clone, PartialEq)]
pub struct Extremum<V> {
    /// Course code
    pub code: String,
    /// Course name
    pub name: String,
    /// The extreme value
    pub value: V,
}

impl<V> Extremum<V> {
    fn of(course: &Course, value: V) -> Self {
        Self {
            code: course.code.clone(),
            name: course.name.clone(),
            value,
        }
    }

    /// `"CODE - Name"` as shown on the insights page
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}

/// Aggregate figures for one base faculty
#[derive(Debug, Clone, PartialEq)]
pub struct FacultyStats {
    /// Base faculty name
    pub faculty: String,
    /// Number of courses with grades
    pub courses: usize,
    /// Summed enrollment
    pub students: u64,
    /// Enrollment-weighted average
    pub average: f64,
}

/// Summary statistics of a course collection.
///
/// Only courses with a positive average and positive enrollment count.
/// Fields that need at least one such course are `None` without one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insights {
    /// Enrollment-weighted average of all counted courses
    pub overall_average: Option<f64>,
    /// Course with the highest average (first one on ties)
    pub highest_average: Option<Extremum<f64>>,
    /// Course with the lowest average (first one on ties)
    pub lowest_average: Option<Extremum<f64>>,
    /// Course with the most students (first one on ties)
    pub most_enrolled: Option<Extremum<u32>>,
    /// Number of counted courses
    pub total_courses: usize,
    /// Summed enrollment of counted courses
    pub total_students: u64,
    /// Per-faculty figures in order of first appearance
    pub faculties: Vec<FacultyStats>,
}

#[derive(Default)]
struct Accumulator {
    courses: usize,
    students: u64,
    weighted_total: f64,
}

impl Accumulator {
    fn add(&mut self, course: &Course) {
        self.courses += 1;
        self.students += u64::from(course.reported);
        self.weighted_total += course.average * f64::from(course.reported);
    }

    #[allow(clippy::cast_precision_loss)]
    fn average(&self) -> Option<f64> {
        (self.students > 0).then(|| self.weighted_total / self.students as f64)
    }
}

/// Compute insights in a single pass
#[must_use]
pub fn calculate<'a>(courses: impl IntoIterator<Item = &'a Course>) -> Insights {
    let mut insights = Insights::default();
    let mut overall = Accumulator::default();
    let mut by_faculty: Vec<(String, Accumulator)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for course in courses.into_iter().filter(|c| c.has_grades()) {
        if insights
            .highest_average
            .as_ref()
            .map_or(true, |best| course.average > best.value)
        {
            insights.highest_average = Some(Extremum::of(course, course.average));
        }
        if insights
            .lowest_average
            .as_ref()
            .map_or(true, |worst| course.average < worst.value)
        {
            insights.lowest_average = Some(Extremum::of(course, course.average));
        }
        if insights
            .most_enrolled
            .as_ref()
            .map_or(true, |most| course.reported > most.value)
        {
            insights.most_enrolled = Some(Extremum::of(course, course.reported));
        }

        overall.add(course);

        let faculty = base_faculty(&course.faculty);
        let slot = match index.get(faculty) {
            Some(&i) => i,
            None => {
                index.insert(faculty.to_string(), by_faculty.len());
                by_faculty.push((faculty.to_string(), Accumulator::default()));
                by_faculty.len() - 1
            }
        };
        by_faculty[slot].1.add(course);
    }

    insights.total_courses = overall.courses;
    insights.total_students = overall.students;
    insights.overall_average = overall.average();
    insights.faculties = by_faculty
        .into_iter()
        .map(|(faculty, acc)| FacultyStats {
            average: acc.average().unwrap_or(0.0),
            courses: acc.courses,
            students: acc.students,
            faculty,
        })
        .collect();
    insights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(code: &str, faculty: &str, average: f64, reported: u32) -> Course {
        Course::new(
            code.to_string(),
            format!("{code} name"),
            String::new(),
            faculty.to_string(),
        )
        .with_grades(average, reported)
    }

    #[test]
    fn test_weighted_overall_average() {
        let courses = vec![
            course("A 100", "Faculty of Arts", 92.0, 100),
            course("B 100", "Faculty of Arts", 80.0, 300),
        ];
        let insights = calculate(&courses);
        assert!((insights.overall_average.unwrap() - 83.0).abs() < 1e-9);
        assert_eq!(insights.total_students, 400);
        assert_eq!(insights.total_courses, 2);
    }

    #[test]
    fn test_equal_enrollment_is_simple_mean() {
        let courses = vec![
            course("A 100", "F", 70.0, 50),
            course("B 100", "F", 80.0, 50),
            course("C 100", "F", 93.0, 50),
        ];
        let insights = calculate(&courses);
        assert!((insights.overall_average.unwrap() - 81.0).abs() < 1e-9);
    }

    #[test]
    fn test_extrema_first_occurrence_wins() {
        let courses = vec![
            course("A 100", "F", 90.0, 200),
            course("B 100", "F", 90.0, 200),
            course("C 100", "F", 60.0, 10),
            course("D 100", "F", 60.0, 10),
        ];
        let insights = calculate(&courses);
        assert_eq!(insights.highest_average.unwrap().code, "A 100");
        assert_eq!(insights.lowest_average.unwrap().code, "C 100");
        assert_eq!(insights.most_enrolled.unwrap().code, "A 100");
    }

    #[test]
    fn test_ungraded_courses_are_ignored() {
        let courses = vec![
            course("A 100", "F", 0.0, 100),
            course("B 100", "F", 75.0, 0),
        ];
        let insights = calculate(&courses);
        assert_eq!(insights, Insights::default());
        assert!(insights.overall_average.is_none());
    }

    #[test]
    fn test_faculty_grouping_strips_cross_credit() {
        let courses = vec![
            course("GEOG 100", "Faculty of Arts (Honorary Science Credit)", 80.0, 100),
            course("ENGL 100", "Faculty of Arts", 70.0, 100),
            course("CPSC 100", "Faculty of Science", 90.0, 10),
        ];
        let insights = calculate(&courses);
        assert_eq!(insights.faculties.len(), 2);
        let arts = &insights.faculties[0];
        assert_eq!(arts.faculty, "Faculty of Arts");
        assert_eq!(arts.courses, 2);
        assert!((arts.average - 75.0).abs() < 1e-9);
        assert_eq!(insights.highest_average.unwrap().title(), "CPSC 100 - CPSC 100 name");
    }
}
