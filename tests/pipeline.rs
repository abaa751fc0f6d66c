//! Filter → sort → paginate over a generated course list

use grade_finder::core::filter::{AverageBand, FilterSelection, Selection};
use grade_finder::core::models::Course;
use grade_finder::core::render::table::{PageSize, Paginator};
use grade_finder::core::sort::CourseSort;

const FACULTIES: [&str; 3] = ["Faculty of Science", "Faculty of Arts", "Faculty of Applied Science"];

/// 237 courses with distinct averages spread over every band and level
fn catalogue() -> Vec<Course> {
    (0..237u32)
        .map(|i| {
            let level = 100 * (i % 5 + 1);
            let mut course = Course::new(
                format!("SUBJ {}", level + i % 100),
                format!("Course {i}"),
                "Subject".to_string(),
                FACULTIES[(i % 3) as usize].to_string(),
            )
            .with_grades(40.0 + f64::from(i) * 0.25, 10 + i * 7);
            course.credits = match i % 4 {
                0 => None,
                n => Some(n),
            };
            course
        })
        .collect()
}

fn codes(courses: &[&Course]) -> Vec<String> {
    courses.iter().map(|c| c.code.clone()).collect()
}

#[test]
fn test_default_selection_keeps_everything_in_order() {
    let courses = catalogue();
    let kept = FilterSelection::default().filter_courses(&courses);
    assert_eq!(kept.len(), courses.len());
    assert!(kept.iter().zip(&courses).all(|(a, b)| std::ptr::eq(*a, b)));
}

#[test]
fn test_empty_dimension_matches_nothing() {
    let courses = catalogue();
    for selection in [
        FilterSelection {
            faculties: Selection::None,
            ..FilterSelection::default()
        },
        FilterSelection {
            averages: Selection::None,
            ..FilterSelection::default()
        },
        FilterSelection {
            credits: Selection::None,
            ..FilterSelection::default()
        },
    ] {
        assert!(selection.filter_courses(&courses).is_empty());
    }
}

#[test]
fn test_every_kept_record_satisfies_every_dimension() {
    let courses = catalogue();
    let selection = FilterSelection {
        year_levels: Selection::only([200, 400]),
        averages: Selection::only([AverageBand::From70, AverageBand::From80]),
        credits: Selection::only([0, 3]),
        ..FilterSelection::default()
    };
    let kept = selection.filter_courses(&courses);
    assert!(!kept.is_empty());
    for course in &kept {
        assert!(matches!(course.year_level(), Some(200 | 400)));
        assert!((70.0..85.0).contains(&course.average));
        assert!(matches!(course.credits, None | Some(3)));
    }
    let rejected = courses.len() - kept.len();
    assert_eq!(
        rejected,
        courses.iter().filter(|c| !selection.matches_course(c)).count()
    );
}

#[test]
fn test_search_is_case_insensitive_and_ignores_code_spacing() {
    let courses = catalogue();
    let spaced = FilterSelection {
        search: "subj 1".to_string(),
        ..FilterSelection::default()
    };
    let packed = FilterSelection {
        search: "SUBJ1".to_string(),
        ..FilterSelection::default()
    };
    assert_eq!(
        codes(&spaced.filter_courses(&courses)),
        codes(&packed.filter_courses(&courses))
    );
}

#[test]
fn test_average_sort_directions_are_reverses() {
    let courses = catalogue();
    let mut descending = FilterSelection::default().filter_courses(&courses);
    let mut ascending = descending.clone();
    CourseSort::AverageDesc.sort(&mut descending);
    CourseSort::AverageAsc.sort(&mut ascending);

    ascending.reverse();
    assert_eq!(codes(&descending), codes(&ascending));
    assert!(descending.windows(2).all(|w| w[0].average >= w[1].average));
}

#[test]
fn test_pages_cover_the_result_exactly_once() {
    let courses = catalogue();
    let mut kept = FilterSelection::default().filter_courses(&courses);
    CourseSort::Code.sort(&mut kept);

    for size in PageSize::ALL {
        let mut paginator = Paginator::new(size);
        let pages = paginator.total_pages(kept.len());
        let expected = size.rows().map_or(1, |rows| kept.len().div_ceil(rows));
        assert_eq!(pages, expected, "page count for {size}");

        let mut seen = Vec::new();
        for page in 1..=pages {
            paginator.go_to(page, kept.len());
            let window = paginator.window(&kept);
            if page < pages {
                assert_eq!(Some(window.len()), size.rows());
            }
            seen.extend_from_slice(window);
        }
        assert_eq!(codes(&seen), codes(&kept));
    }
}

#[test]
fn test_page_is_clamped_to_the_result() {
    let courses = catalogue();
    let mut paginator = Paginator::new(PageSize::Fifty);
    paginator.go_to(99, courses.len());
    assert_eq!(paginator.page(), 5);
    paginator.go_to(0, courses.len());
    assert_eq!(paginator.page(), 1);

    paginator.last(courses.len());
    paginator.set_size(PageSize::Hundred);
    assert_eq!(paginator.page(), 1);
    assert_eq!(paginator.total_pages(0), 0);
}
