//! Sort keys and stable comparators
//!
//! Every sort is stable, so records that compare equal keep the order they
//! arrived in.

use crate::core::insights::FacultyStats;
use crate::core::models::{Course, CourseInstructor, Instructor};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Case-insensitive comparison without allocating
fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Declares a sort-key enum with its option tokens and labels
macro_rules! sort_keys {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident {
            $($variant:ident => ($token:tt, $label:tt)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[doc = $label]
                #[serde(rename = $token)]
                $variant,
            )+
        }

        impl $name {
            /// All keys in option order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Option token
            #[must_use]
            pub const fn token(self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)+
                }
            }

            /// Option label
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($token => Ok(Self::$variant),)+
                    other => Err(format!(
                        "Unknown sort key '{other}' (expected one of: {})",
                        Self::ALL.iter().map(|k| k.token()).collect::<Vec<_>>().join(", ")
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }
    };
}

sort_keys! {
    /// Course table ordering
    CourseSort, default = Code {
        Code => ("code", "Course Code"),
        AverageDesc => ("average", "Average ↓"),
        AverageAsc => ("average-asc", "Average ↑"),
        StudentsDesc => ("students", "Students ↓"),
        StudentsAsc => ("students-asc", "Students ↑"),
        Name => ("name", "Course Name"),
    }
}

sort_keys! {
    /// Instructor table ordering
    InstructorSort, default = Name {
        Name => ("name", "Name A-Z"),
        NameDesc => ("name-desc", "Name Z-A"),
        AverageDesc => ("average", "Average ↓"),
        AverageAsc => ("average-asc", "Average ↑"),
        CoursesDesc => ("courses", "Courses ↓"),
        CoursesAsc => ("courses-asc", "Courses ↑"),
        StudentsDesc => ("students", "Students ↓"),
        StudentsAsc => ("students-asc", "Students ↑"),
    }
}

sort_keys! {
    /// Faculty statistics ordering
    FacultySort, default = StudentsDesc {
        StudentsDesc => ("students-desc", "Sort by Students ↓"),
        CoursesDesc => ("courses-desc", "Sort by Courses ↓"),
        CoursesAsc => ("courses-asc", "Sort by Courses ↑"),
        AverageDesc => ("average-desc", "Sort by Average ↓"),
        AverageAsc => ("average-asc", "Sort by Average ↑"),
    }
}

sort_keys! {
    /// Ordering of the instructors listed on a course page
    OfferingSort, default = AverageDesc {
        AverageDesc => ("average-desc", "Average ↓"),
        AverageAsc => ("average-asc", "Average ↑"),
        NameAsc => ("name-asc", "Name"),
        NameDesc => ("name-desc", "Name ↓"),
    }
}

impl CourseSort {
    /// Compare two courses under this key
    #[must_use]
    pub fn compare(self, a: &Course, b: &Course) -> Ordering {
        match self {
            Self::Code => a.code.cmp(&b.code),
            Self::AverageDesc => b.average.total_cmp(&a.average),
            Self::AverageAsc => a.average.total_cmp(&b.average),
            Self::StudentsDesc => b.reported.cmp(&a.reported),
            Self::StudentsAsc => a.reported.cmp(&b.reported),
            Self::Name => cmp_ignore_case(&a.name, &b.name),
        }
    }

    /// Stable in-place sort
    pub fn sort<T: Borrow<Course>>(self, courses: &mut [T]) {
        courses.sort_by(|a, b| self.compare(a.borrow(), b.borrow()));
    }
}

impl InstructorSort {
    /// Compare two instructors under this key
    #[must_use]
    pub fn compare(self, a: &Instructor, b: &Instructor) -> Ordering {
        match self {
            Self::Name => cmp_ignore_case(&a.name, &b.name),
            Self::NameDesc => cmp_ignore_case(&b.name, &a.name),
            Self::AverageDesc => b.overall_average().total_cmp(&a.overall_average()),
            Self::AverageAsc => a.overall_average().total_cmp(&b.overall_average()),
            Self::CoursesDesc => b.course_count().cmp(&a.course_count()),
            Self::CoursesAsc => a.course_count().cmp(&b.course_count()),
            Self::StudentsDesc => b.total_students().cmp(&a.total_students()),
            Self::StudentsAsc => a.total_students().cmp(&b.total_students()),
        }
    }

    /// Stable in-place sort
    pub fn sort<T: Borrow<Instructor>>(self, instructors: &mut [T]) {
        instructors.sort_by(|a, b| self.compare(a.borrow(), b.borrow()));
    }
}

impl FacultySort {
    /// Stable in-place sort
    pub fn sort(self, stats: &mut [FacultyStats]) {
        stats.sort_by(|a, b| match self {
            Self::StudentsDesc => b.students.cmp(&a.students),
            Self::CoursesDesc => b.courses.cmp(&a.courses),
            Self::CoursesAsc => a.courses.cmp(&b.courses),
            Self::AverageDesc => b.average.total_cmp(&a.average),
            Self::AverageAsc => a.average.total_cmp(&b.average),
        });
    }
}

impl OfferingSort {
    /// Stable in-place sort
    pub fn sort(self, taught: &mut [CourseInstructor<'_>]) {
        taught.sort_by(|a, b| match self {
            Self::AverageDesc => b.offering.average.total_cmp(&a.offering.average),
            Self::AverageAsc => a.offering.average.total_cmp(&b.offering.average),
            Self::NameAsc => cmp_ignore_case(a.name, b.name),
            Self::NameDesc => cmp_ignore_case(b.name, a.name),
        });
    }
}
