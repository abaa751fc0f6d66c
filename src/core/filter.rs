//! Filter predicates over courses, instructors and programs
//!
//! Every dimension is a [`Selection`]: `All` imposes no restriction, `None`
//! matches nothing, and `Subset` matches the listed values. A record is kept
//! only if every dimension and the free-text search accept it.

use crate::core::models::course::{base_faculty, short_faculty_label, year_level, CROSS_CREDIT_FACULTY};
use crate::core::models::{Course, Instructor, Program};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Year levels offered as filter options
pub const YEAR_LEVELS: [u16; 6] = [100, 200, 300, 400, 500, 600];

/// Credit filter options; `0` stands for "unknown or zero"
pub const CREDIT_OPTIONS: [(u32, &str); 5] = [
    (4, "4 credits"),
    (3, "3 credits"),
    (2, "2 credits"),
    (1, "1 credit"),
    (0, "Unknown"),
];

/// Tri-state choice for one filter dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection<T: Ord> {
    /// No restriction
    All,
    /// Nothing selected: matches no record
    None,
    /// Only the listed values
    Subset(BTreeSet<T>),
}

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: Ord> Selection<T> {
    /// Build a selection from checkbox state.
    ///
    /// A checked select-all box means `All`. Otherwise the checked values form
    /// the subset, and no checked values means `None`.
    pub fn from_checkboxes(checked: impl IntoIterator<Item = T>, select_all: bool) -> Self {
        if select_all {
            return Self::All;
        }
        let values: BTreeSet<T> = checked.into_iter().collect();
        if values.is_empty() {
            Self::None
        } else {
            Self::Subset(values)
        }
    }

    /// Selection of exactly these values (`None` if empty)
    pub fn only(values: impl IntoIterator<Item = T>) -> Self {
        Self::from_checkboxes(values, false)
    }

    /// Whether the dimension imposes no restriction
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether `value` is accepted
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::None => false,
            Self::Subset(values) => values.contains(value),
        }
    }

    /// Whether any of `values` is accepted (`All` accepts even an empty list)
    pub fn matches_any<'a>(&self, values: impl IntoIterator<Item = &'a T>) -> bool
    where
        T: 'a,
    {
        match self {
            Self::All => true,
            Self::None => false,
            Self::Subset(selected) => values.into_iter().any(|v| selected.contains(v)),
        }
    }
}

/// Average-grade band, named by its lower bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AverageBand {
    /// Below 60
    Below60,
    /// 60 to 69.99
    From60,
    /// 70 to 79.99
    From70,
    /// 80 to 84.99
    From80,
    /// 85 to 89.99
    From85,
    /// 90 and above
    From90,
}

impl AverageBand {
    /// Bands in display order (highest first)
    pub const ALL: [Self; 6] = [
        Self::From90,
        Self::From85,
        Self::From80,
        Self::From70,
        Self::From60,
        Self::Below60,
    ];

    /// Inclusive lower bound, also the band's option token
    #[must_use]
    pub const fn lower_bound(self) -> u32 {
        match self {
            Self::Below60 => 0,
            Self::From60 => 60,
            Self::From70 => 70,
            Self::From80 => 80,
            Self::From85 => 85,
            Self::From90 => 90,
        }
    }

    /// Option label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Below60 => "<60",
            Self::From60 => "60-69",
            Self::From70 => "70-79",
            Self::From80 => "80-84",
            Self::From85 => "85-89",
            Self::From90 => ">90",
        }
    }

    /// The band an average falls in
    #[must_use]
    pub fn of(average: f64) -> Self {
        if average >= 90.0 {
            Self::From90
        } else if average >= 85.0 {
            Self::From85
        } else if average >= 80.0 {
            Self::From80
        } else if average >= 70.0 {
            Self::From70
        } else if average >= 60.0 {
            Self::From60
        } else {
            Self::Below60
        }
    }
}

impl FromStr for AverageBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|band| band.lower_bound().to_string() == s.trim())
            .ok_or_else(|| format!("Unknown average band '{s}' (expected 90, 85, 80, 70, 60 or 0)"))
    }
}

impl fmt::Display for AverageBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lower_bound())
    }
}

/// Enrollment band, named by its lower bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnrollmentBand {
    /// Fewer than 50 students
    Below50,
    /// 50 to 99
    From50,
    /// 100 to 399
    From100,
    /// 400 to 799
    From400,
    /// 800 or more
    From800,
}

impl EnrollmentBand {
    /// Bands in display order (largest first)
    pub const ALL: [Self; 5] = [
        Self::From800,
        Self::From400,
        Self::From100,
        Self::From50,
        Self::Below50,
    ];

    /// Inclusive lower bound, also the band's option token
    #[must_use]
    pub const fn lower_bound(self) -> u32 {
        match self {
            Self::Below50 => 0,
            Self::From50 => 50,
            Self::From100 => 100,
            Self::From400 => 400,
            Self::From800 => 800,
        }
    }

    /// Option label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Below50 => "<50",
            Self::From50 => "50-99",
            Self::From100 => "100-399",
            Self::From400 => "400-799",
            Self::From800 => ">800",
        }
    }

    /// The band an enrollment falls in
    #[must_use]
    pub const fn of(students: u32) -> Self {
        match students {
            800.. => Self::From800,
            400..=799 => Self::From400,
            100..=399 => Self::From100,
            50..=99 => Self::From50,
            _ => Self::Below50,
        }
    }
}

impl FromStr for EnrollmentBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|band| band.lower_bound().to_string() == s.trim())
            .ok_or_else(|| format!("Unknown enrollment band '{s}' (expected 800, 400, 100, 50 or 0)"))
    }
}

impl fmt::Display for EnrollmentBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lower_bound())
    }
}

/// The complete filter state of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    /// Faculties (base faculty names)
    pub faculties: Selection<String>,
    /// Year levels (100, 200, ...)
    pub year_levels: Selection<u16>,
    /// Average bands
    pub averages: Selection<AverageBand>,
    /// Enrollment bands
    pub enrollments: Selection<EnrollmentBand>,
    /// Credit counts; `0` matches unknown or zero credits
    pub credits: Selection<u32>,
    /// Free-text search
    pub search: String,
}

/// Lowercased search term, or `None` when blank
fn normalized_term(search: &str) -> Option<String> {
    let term = search.trim();
    (!term.is_empty()).then(|| term.to_lowercase())
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

impl FilterSelection {
    /// Whether a course passes every dimension
    #[must_use]
    pub fn matches_course(&self, course: &Course) -> bool {
        if let Some(term) = normalized_term(&self.search) {
            let code = course.code.to_lowercase();
            let hit = code.contains(&term)
                || strip_whitespace(&code).contains(&strip_whitespace(&term))
                || course.subject.to_lowercase().contains(&term)
                || course.name.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }

        if let Selection::Subset(faculties) = &self.faculties {
            let base_hit = faculties.contains(course.base_faculty());
            let cross_hit = course.has_cross_credit() && faculties.contains(CROSS_CREDIT_FACULTY);
            if !base_hit && !cross_hit {
                return false;
            }
        } else if matches!(self.faculties, Selection::None) {
            return false;
        }

        let level_ok = match &self.year_levels {
            Selection::All => true,
            restricted => course
                .year_level()
                .is_some_and(|level| restricted.matches(&level)),
        };

        level_ok
            && self.averages.matches(&AverageBand::of(course.average))
            && self.enrollments.matches(&EnrollmentBand::of(course.reported))
            && self.credits.matches(&course.credits.unwrap_or(0))
    }

    /// Whether an instructor passes the search, faculty, year-level and
    /// average dimensions (enrollment and credits do not apply)
    #[must_use]
    pub fn matches_instructor(&self, instructor: &Instructor) -> bool {
        if let Some(term) = normalized_term(&self.search) {
            if !instructor.name.to_lowercase().contains(&term) {
                return false;
            }
        }

        let levels: Vec<u16> = instructor
            .courses
            .iter()
            .filter_map(|c| year_level(&c.code))
            .collect();

        self.faculties.matches_any(&instructor.faculties)
            && self.year_levels.matches_any(&levels)
            && self
                .averages
                .matches(&AverageBand::of(instructor.overall_average()))
    }

    /// Whether a program passes the search and faculty dimensions
    #[must_use]
    pub fn matches_program(&self, program: &Program) -> bool {
        if let Some(term) = normalized_term(&self.search) {
            if !program.name.to_lowercase().contains(&term) {
                return false;
            }
        }
        self.faculties.matches(&program.faculty)
    }

    /// The filter as a single predicate over courses
    pub fn course_predicate(&self) -> impl Fn(&Course) -> bool + '_ {
        move |course| self.matches_course(course)
    }

    /// Courses passing the filter, in their original order
    #[must_use]
    pub fn filter_courses<'a>(&self, courses: &'a [Course]) -> Vec<&'a Course> {
        let keep = self.course_predicate();
        courses.iter().filter(|&c| keep(c)).collect()
    }

    /// Instructors passing the filter, in their original order
    #[must_use]
    pub fn filter_instructors<'a>(&self, instructors: &'a [Instructor]) -> Vec<&'a Instructor> {
        instructors
            .iter()
            .filter(|i| self.matches_instructor(i))
            .collect()
    }

    /// Programs passing the filter, in their original order
    #[must_use]
    pub fn filter_programs<'a>(&self, programs: &'a [Program]) -> Vec<&'a Program> {
        programs.iter().filter(|p| self.matches_program(p)).collect()
    }
}

/// One faculty checkbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacultyOption {
    /// Faculty name used for matching
    pub value: String,
    /// Short display label
    pub label: String,
    /// Number of records under this faculty
    pub count: usize,
}

/// Faculty checkboxes for a collection, most common faculty first.
///
/// The cross-credit faculty is always offered, even with no records.
#[must_use]
pub fn faculty_options<'a>(faculties: impl IntoIterator<Item = &'a str>) -> Vec<FacultyOption> {
    let mut options: Vec<FacultyOption> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for faculty in faculties {
        let base = base_faculty(faculty);
        if let Some(&i) = index.get(base) {
            options[i].count += 1;
        } else {
            index.insert(base.to_string(), options.len());
            options.push(FacultyOption {
                value: base.to_string(),
                label: short_faculty_label(base),
                count: 1,
            });
        }
    }

    if !index.contains_key(CROSS_CREDIT_FACULTY) {
        options.push(FacultyOption {
            value: CROSS_CREDIT_FACULTY.to_string(),
            label: short_faculty_label(CROSS_CREDIT_FACULTY),
            count: 0,
        });
    }

    options.sort_by(|a, b| b.count.cmp(&a.count));
    options
}

/// Faculty options of a course collection
#[must_use]
pub fn course_faculty_options(courses: &[Course]) -> Vec<FacultyOption> {
    faculty_options(courses.iter().map(|c| c.faculty.as_str()))
}

/// Faculty options of an instructor collection (each listed faculty counts)
#[must_use]
pub fn instructor_faculty_options(instructors: &[Instructor]) -> Vec<FacultyOption> {
    faculty_options(
        instructors
            .iter()
            .flat_map(|i| i.faculties.iter().map(String::as_str)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::course::CROSS_CREDIT_SUFFIX;
    use crate::core::models::Offering;

    fn course(code: &str, faculty: &str, average: f64, reported: u32) -> Course {
        Course::new(
            code.to_string(),
            "Some Course".to_string(),
            "Some Subject".to_string(),
            faculty.to_string(),
        )
        .with_grades(average, reported)
    }

    #[test]
    fn test_from_checkboxes() {
        assert_eq!(Selection::from_checkboxes([1u16], true), Selection::All);
        assert_eq!(
            Selection::<u16>::from_checkboxes(Vec::new(), false),
            Selection::None
        );
        assert_eq!(
            Selection::from_checkboxes([300u16, 100], false),
            Selection::Subset(BTreeSet::from([100, 300]))
        );
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(AverageBand::of(59.99), AverageBand::Below60);
        assert_eq!(AverageBand::of(60.0), AverageBand::From60);
        assert_eq!(AverageBand::of(84.99), AverageBand::From80);
        assert_eq!(AverageBand::of(85.0), AverageBand::From85);
        assert_eq!(AverageBand::of(100.0), AverageBand::From90);
        assert_eq!(EnrollmentBand::of(49), EnrollmentBand::Below50);
        assert_eq!(EnrollmentBand::of(50), EnrollmentBand::From50);
        assert_eq!(EnrollmentBand::of(399), EnrollmentBand::From100);
        assert_eq!(EnrollmentBand::of(800), EnrollmentBand::From800);
        assert_eq!("85".parse::<AverageBand>(), Ok(AverageBand::From85));
        assert!("75".parse::<AverageBand>().is_err());
        assert_eq!("0".parse::<EnrollmentBand>(), Ok(EnrollmentBand::Below50));
    }

    #[test]
    fn test_search_ignores_case_and_spaces() {
        let c = course("CPSC 110", "Faculty of Science", 75.0, 100);
        let mut filter = FilterSelection {
            search: "cpsc110".to_string(),
            ..FilterSelection::default()
        };
        assert!(filter.matches_course(&c));
        filter.search = "  Some sub ".to_string();
        assert!(filter.matches_course(&c));
        filter.search = "math".to_string();
        assert!(!filter.matches_course(&c));
    }

    #[test]
    fn test_cross_credit_matches_science() {
        let c = course(
            "GEOG 310",
            &format!("Faculty of Arts{CROSS_CREDIT_SUFFIX}"),
            75.0,
            100,
        );
        let science = FilterSelection {
            faculties: Selection::only(["Faculty of Science".to_string()]),
            ..FilterSelection::default()
        };
        let arts = FilterSelection {
            faculties: Selection::only(["Faculty of Arts".to_string()]),
            ..FilterSelection::default()
        };
        let forestry = FilterSelection {
            faculties: Selection::only(["Faculty of Forestry".to_string()]),
            ..FilterSelection::default()
        };
        assert!(science.matches_course(&c));
        assert!(arts.matches_course(&c));
        assert!(!forestry.matches_course(&c));
    }

    #[test]
    fn test_year_level_requires_three_digits() {
        let odd = course("EPSE 5", "Faculty of Education", 80.0, 10);
        let restricted = FilterSelection {
            year_levels: Selection::only([100u16, 500]),
            ..FilterSelection::default()
        };
        assert!(!restricted.matches_course(&odd));
        assert!(FilterSelection::default().matches_course(&odd));
    }

    #[test]
    fn test_credit_zero_matches_unknown() {
        let mut c = course("CPSC 110", "Faculty of Science", 75.0, 100);
        let unknown = FilterSelection {
            credits: Selection::only([0u32]),
            ..FilterSelection::default()
        };
        assert!(unknown.matches_course(&c));
        c.credits = Some(4);
        assert!(!unknown.matches_course(&c));
        c.credits = Some(0);
        assert!(unknown.matches_course(&c));
    }

    #[test]
    fn test_none_dimension_matches_nothing() {
        let courses = vec![
            course("CPSC 110", "Faculty of Science", 75.0, 100),
            course("MATH 200", "Faculty of Science", 65.0, 40),
        ];
        let nothing = FilterSelection {
            enrollments: Selection::None,
            ..FilterSelection::default()
        };
        assert!(nothing.filter_courses(&courses).is_empty());
        assert_eq!(FilterSelection::default().filter_courses(&courses).len(), 2);
    }

    fn instructor(name: &str, faculties: &[&str], offerings: &[(&str, f64)]) -> Instructor {
        Instructor {
            name: name.to_string(),
            faculties: faculties.iter().map(ToString::to_string).collect(),
            courses: offerings
                .iter()
                .map(|&(code, average)| Offering {
                    code: code.to_string(),
                    average,
                    reported: 50,
                    ..Offering::default()
                })
                .collect(),
        }
    }

    fn program(name: &str, faculty: &str) -> Program {
        Program {
            name: name.to_string(),
            faculty: faculty.to_string(),
            length: "4".to_string(),
            program_link: String::new(),
            requirements_link: String::new(),
        }
    }

    #[test]
    fn test_instructor_faculty_matches_any_listed() {
        let both = instructor("Ada Lovelace", &["Faculty of Arts", "Faculty of Science"], &[("MATH 100", 75.0)]);
        let arts = instructor("Mary Shelley", &["Faculty of Arts"], &[("ENGL 100", 75.0)]);
        let science = FilterSelection {
            faculties: Selection::only(["Faculty of Science".to_string()]),
            ..FilterSelection::default()
        };
        assert!(science.matches_instructor(&both));
        assert!(!science.matches_instructor(&arts));

        let instructors = vec![both, arts];
        let kept = science.filter_instructors(&instructors);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Ada Lovelace");
    }

    #[test]
    fn test_instructor_year_level_from_any_offering() {
        let teaches = instructor(
            "Alan Turing",
            &["Faculty of Science"],
            &[("CPSC 110", 70.0), ("CPSC 421", 80.0), ("EPSE 5", 90.0)],
        );
        let fourth_year = FilterSelection {
            year_levels: Selection::only([400u16]),
            ..FilterSelection::default()
        };
        let second_year = FilterSelection {
            year_levels: Selection::only([200u16]),
            ..FilterSelection::default()
        };
        assert!(fourth_year.matches_instructor(&teaches));
        assert!(!second_year.matches_instructor(&teaches));

        let no_offerings = instructor("New Hire", &["Faculty of Science"], &[]);
        assert!(!fourth_year.matches_instructor(&no_offerings));
        assert!(FilterSelection::default().matches_instructor(&no_offerings));
    }

    #[test]
    fn test_instructor_average_band_uses_overall_average() {
        let graded = instructor("Grace Hopper", &[], &[("CPSC 110", 80.0), ("CPSC 210", 90.0)]);
        let ungraded = instructor("Nobody Graded", &[], &[("CPSC 110", 0.0)]);
        let great = FilterSelection {
            averages: Selection::only([AverageBand::From85]),
            ..FilterSelection::default()
        };
        let failing = FilterSelection {
            averages: Selection::only([AverageBand::Below60]),
            ..FilterSelection::default()
        };
        assert!(great.matches_instructor(&graded));
        assert!(!failing.matches_instructor(&graded));
        assert!(failing.matches_instructor(&ungraded));
        assert!(!great.matches_instructor(&ungraded));
    }

    #[test]
    fn test_instructor_search_is_name_only() {
        let i = instructor("Grace Hopper", &["Faculty of Science"], &[("CPSC 110", 80.0)]);
        let mut filter = FilterSelection {
            search: "  HOPPER ".to_string(),
            ..FilterSelection::default()
        };
        assert!(filter.matches_instructor(&i));
        filter.search = "cpsc".to_string();
        assert!(!filter.matches_instructor(&i));
    }

    #[test]
    fn test_instructor_none_dimension_matches_nothing() {
        let instructors = vec![instructor("Grace Hopper", &["Faculty of Science"], &[("CPSC 110", 80.0)])];
        for nothing in [
            FilterSelection {
                faculties: Selection::None,
                ..FilterSelection::default()
            },
            FilterSelection {
                year_levels: Selection::None,
                ..FilterSelection::default()
            },
            FilterSelection {
                averages: Selection::None,
                ..FilterSelection::default()
            },
        ] {
            assert!(nothing.filter_instructors(&instructors).is_empty());
        }
        // enrollment and credits do not apply to instructors
        let ignored = FilterSelection {
            enrollments: Selection::None,
            credits: Selection::None,
            ..FilterSelection::default()
        };
        assert_eq!(ignored.filter_instructors(&instructors).len(), 1);
    }

    #[test]
    fn test_program_filter() {
        let programs = vec![
            program("Bachelor of Science in Biology", "Faculty of Science"),
            program("Bachelor of Arts in History", "Faculty of Arts"),
            program("Bachelor of Science in Forestry", "Faculty of Forestry"),
        ];
        let science = FilterSelection {
            faculties: Selection::only(["Faculty of Science".to_string()]),
            ..FilterSelection::default()
        };
        let kept = science.filter_programs(&programs);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Bachelor of Science in Biology");

        // exact faculty name, no prefix or shortened-label matching
        let short = FilterSelection {
            faculties: Selection::only(["Science".to_string()]),
            ..FilterSelection::default()
        };
        assert!(short.filter_programs(&programs).is_empty());

        let searched = FilterSelection {
            search: "science in".to_string(),
            ..FilterSelection::default()
        };
        assert_eq!(searched.filter_programs(&programs).len(), 2);
        let by_faculty_text = FilterSelection {
            search: "forestry".to_string(),
            faculties: Selection::only(["Faculty of Arts".to_string()]),
            ..FilterSelection::default()
        };
        assert!(by_faculty_text.filter_programs(&programs).is_empty());

        let nothing = FilterSelection {
            faculties: Selection::None,
            ..FilterSelection::default()
        };
        assert!(nothing.filter_programs(&programs).is_empty());
        assert_eq!(FilterSelection::default().filter_programs(&programs).len(), 3);
    }

    #[test]
    fn test_faculty_options_order_and_science() {
        let courses = vec![
            course("ENGL 100", "Faculty of Arts", 70.0, 10),
            course("HIST 100", "Faculty of Arts", 70.0, 10),
            course("COMM 100", "Sauder School of Business", 70.0, 10),
            course("GEOG 100", &format!("Faculty of Arts{CROSS_CREDIT_SUFFIX}"), 70.0, 10),
        ];
        let options = course_faculty_options(&courses);
        assert_eq!(options[0].value, "Faculty of Arts");
        assert_eq!(options[0].count, 3);
        assert_eq!(options[0].label, "Arts");
        let science = options.iter().find(|o| o.value == "Faculty of Science").unwrap();
        assert_eq!(science.count, 0);
        assert_eq!(options.last().unwrap().value, "Faculty of Science");
    }
}
