//! Course detail views: header, grades, requisites and instructors

use super::{detail_href, escape_html, instructor_href, AverageTier};
use crate::core::models::distribution::BUCKET_LABELS;
use crate::core::models::{
    Context, Course, CourseInstructor, DetailQuery, GradeSummary, PrereqRecord, Requisite,
};
use crate::core::sort::OfferingSort;
use std::fmt::Write;

/// Identity of the course a detail page is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseHeader<'a> {
    /// Course code
    pub code: &'a str,
    /// Course name, may be empty
    pub name: &'a str,
    /// Subject title, may be empty
    pub subject: &'a str,
    /// Offering faculty, may be empty
    pub faculty: &'a str,
}

impl<'a> CourseHeader<'a> {
    /// Header taken from a course record
    #[must_use]
    pub fn of(course: &'a Course) -> Self {
        Self {
            code: &course.code,
            name: &course.name,
            subject: &course.subject,
            faculty: &course.faculty,
        }
    }

    /// Header with nothing but the code
    #[must_use]
    pub const fn bare(code: &'a str) -> Self {
        Self {
            code,
            name: "",
            subject: "",
            faculty: "",
        }
    }
}

/// Code, name, subject, description and the credits/faculty line
#[must_use]
pub fn header_html(header: &CourseHeader<'_>, prereq: Option<&PrereqRecord>) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<div class=\"course-header\">");
    let _ = writeln!(
        html,
        "  <h2><span class=\"course-code\">{}</span> <span class=\"course-name\">{}</span></h2>",
        escape_html(header.code),
        escape_html(header.name)
    );
    if !header.subject.is_empty() {
        let _ = writeln!(
            html,
            "  <p class=\"course-meta\">Subject: {}</p>",
            escape_html(header.subject)
        );
    }

    let description = prereq
        .and_then(|p| p.description.as_deref())
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No description available");
    let credits = match prereq {
        Some(p) => p
            .credits
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or("Data unavailable."),
        None => "No information available",
    };
    let _ = writeln!(
        html,
        "  <p class=\"course-description\">{}</p>",
        escape_html(description)
    );
    let _ = writeln!(
        html,
        "  <p class=\"course-meta\">Credits: {} - {}</p>",
        escape_html(credits),
        escape_html(header.faculty)
    );
    let _ = writeln!(html, "</div>");
    html
}

/// Stats boxes and histogram for one grade summary.
///
/// `viewing` names the instructor whose offering is shown; `None` is the
/// overall course record.
#[must_use]
pub fn grades_html(summary: &GradeSummary, viewing: Option<&str>) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<section class=\"grades\">");
    let _ = writeln!(html, "<h3>Course Grades</h3>");
    match viewing {
        None => {
            let _ = writeln!(
                html,
                "<div class=\"view-status\"><span>Viewing overall data</span></div>"
            );
        }
        Some(name) => {
            let _ = writeln!(
                html,
                "<div class=\"view-status\"><span>Viewing data for: {}</span></div>",
                escape_html(name)
            );
        }
    }

    let average_tier = AverageTier::of(summary.average).class();
    let median_tier = AverageTier::of(summary.weighted_median).class();
    let _ = writeln!(html, "<div class=\"stats-container\">");
    stat_box(
        &mut html,
        "Average",
        &format!("average-value {average_tier}"),
        &format!("{:.1}%", summary.average),
    );
    stat_box(&mut html, "Enrolled", "enrolled-value", &summary.reported.to_string());
    stat_box(
        &mut html,
        "Weighted Median",
        &format!("median-value {median_tier}"),
        &format!("{:.1}%", summary.weighted_median),
    );
    stat_box(&mut html, "High", "high-value", &format!("{}%", summary.high.round()));
    stat_box(&mut html, "Low", "low-value", &format!("{}%", summary.low.round()));
    let _ = writeln!(html, "</div>");

    let _ = writeln!(html, "<h4>Grade Distribution</h4>");
    html.push_str(&distribution_html(summary));
    let _ = writeln!(html, "</section>");
    html
}

fn stat_box(html: &mut String, label: &str, class: &str, value: &str) {
    let _ = writeln!(html, "  <div class=\"stat-box\">");
    let _ = writeln!(html, "    <div class=\"stat-label\">{label}</div>");
    let _ = writeln!(html, "    <div class=\"stat-value {class}\">{value}</div>");
    let _ = writeln!(html, "  </div>");
}

/// Bars scaled to the largest bucket of this record
#[must_use]
pub fn distribution_html(summary: &GradeSummary) -> String {
    let distribution = &summary.distribution;
    if distribution.is_empty() {
        return "<p>No distribution data available.</p>\n".to_string();
    }
    let max = f64::from(distribution.max_count());
    let mut html = String::new();
    let _ = writeln!(html, "<div class=\"distribution-chart\">");
    for (count, label) in distribution.counts().into_iter().zip(BUCKET_LABELS) {
        let height = f64::from(count) / max * 100.0;
        let _ = writeln!(html, "  <div class=\"bar-column\">");
        let _ = writeln!(
            html,
            "    <div class=\"bar-wrapper\"><div class=\"bar\" style=\"height: {height:.1}%;\" title=\"{count} students\"></div></div>"
        );
        let _ = writeln!(html, "    <div class=\"bar-label\">{}</div>", escape_html(label));
        let _ = writeln!(html, "  </div>");
    }
    let _ = writeln!(html, "</div>");
    html
}

/// Grades view replacement when the course has no record for the session
#[must_use]
pub fn not_offered_html(code: &str, context: &Context) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<section class=\"grades\">");
    let _ = writeln!(html, "<h3>Course Grades</h3>");
    let _ = writeln!(
        html,
        "<div class=\"not-found-message-inline\"><p>{} was not offered in {}.</p></div>",
        escape_html(code),
        context.session
    );
    let _ = writeln!(html, "</section>");
    html
}

/// Body of the page shown when course data could not be loaded at all
#[must_use]
pub fn not_found_html() -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<div class=\"not-found-container\">");
    let _ = writeln!(html, "  <div class=\"not-found-404\">404</div>");
    let _ = writeln!(html, "  <h2 class=\"not-found-title\">Data Not Available</h2>");
    let _ = writeln!(
        html,
        "  <p class=\"not-found-message\">The data for this course is currently unavailable.</p>"
    );
    let _ = writeln!(
        html,
        "  <a href=\"index.html\" class=\"not-found-button\">← Back to Course List</a>"
    );
    let _ = writeln!(html, "</div>");
    html
}

/// Prerequisites, corequisites and dependents.
///
/// Without a record every section reads "Data unavailable".
#[must_use]
pub fn requisites_html(prereq: Option<&PrereqRecord>, context: &Context) -> String {
    let sections: [(&str, Option<Requisite<'_>>); 3] = [
        ("Prerequisites", prereq.map(PrereqRecord::prerequisites)),
        ("Corequisites", prereq.map(PrereqRecord::corequisites)),
        ("Dependent Courses", prereq.map(PrereqRecord::dependents)),
    ];

    let mut html = String::new();
    let _ = writeln!(html, "<section class=\"requisites\">");
    for (title, requisite) in sections {
        let content = requisite.map_or_else(
            || "Data unavailable".to_string(),
            |r| requisite_text(r, context),
        );
        let _ = writeln!(html, "<h3>{title}</h3>");
        let _ = writeln!(html, "<p>{content}</p>");
    }
    let _ = writeln!(html, "</section>");
    html
}

fn requisite_text(requisite: Requisite<'_>, context: &Context) -> String {
    match requisite {
        Requisite::Text(text) => link_course_codes(text, context),
        Requisite::Codes(codes) => codes
            .iter()
            .map(|code| course_link(code, context))
            .collect::<Vec<_>>()
            .join(", "),
        Requisite::Nothing => "None".to_string(),
        Requisite::Unknown => "No information available".to_string(),
    }
}

fn course_link(code: &str, context: &Context) -> String {
    let query = DetailQuery {
        code: code.to_string(),
        campus: context.campus,
        session: None,
    };
    format!(
        "<a href=\"{}\" class=\"course-link\">{}</a>",
        escape_html(&detail_href(&query)),
        escape_html(code)
    )
}

/// Tidy requisite prose: drop empty list slots (`, ,`), collapse
/// whitespace, trim.
#[must_use]
pub fn clean_requisite_text(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut merged = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ',' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && chars[j] == ',' {
                merged.push(',');
                i = j + 1;
                continue;
            }
        }
        merged.push(chars[i]);
        i += 1;
    }
    merged.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A course code starting at `start` (2-4 capitals, optional whitespace,
/// three digits, optional capital) as its end index, department and number.
/// Longer departments are tried first.
fn match_course_code(chars: &[char], start: usize) -> Option<(usize, String, String)> {
    let capitals = chars[start..]
        .iter()
        .take(4)
        .take_while(|c| c.is_ascii_uppercase())
        .count();
    for dept_len in (2..=capitals).rev() {
        let mut i = start + dept_len;
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        let digits_end = i + 3;
        if digits_end > chars.len() || !chars[i..digits_end].iter().all(char::is_ascii_digit) {
            continue;
        }
        let mut end = digits_end;
        if end < chars.len() && chars[end].is_ascii_uppercase() {
            end += 1;
        }
        let dept: String = chars[start..start + dept_len].iter().collect();
        let number: String = chars[digits_end - 3..end].iter().collect();
        return Some((end, dept, number));
    }
    None
}

/// Requisite prose with every course code turned into a detail link
#[must_use]
pub fn link_course_codes(text: &str, context: &Context) -> String {
    let cleaned = clean_requisite_text(text);
    let chars: Vec<char> = cleaned.chars().collect();
    let mut html = String::with_capacity(cleaned.len());
    let mut plain = String::new();
    let mut i = 0;
    while i < chars.len() {
        if let Some((end, dept, number)) = match_course_code(&chars, i) {
            html.push_str(&escape_html(&plain));
            plain.clear();
            html.push_str(&course_link(&format!("{dept} {number}"), context));
            i = end;
        } else {
            plain.push(chars[i]);
            i += 1;
        }
    }
    html.push_str(&escape_html(&plain));
    html
}

/// Anchor of an instructor's grades section on the course page
#[must_use]
pub fn instructor_anchor(index: usize) -> String {
    format!("instructor-{index}")
}

/// Instructors who taught the course, already sorted.
///
/// `None` means the instructor dataset could not be loaded.
#[must_use]
pub fn professors_html(taught: Option<&[CourseInstructor<'_>]>, sort: OfferingSort) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<section class=\"professors\">");
    let _ = writeln!(html, "<h3>Professors</h3>");
    match taught {
        None => {
            let _ = writeln!(html, "<p>Error loading professor information</p>");
        }
        Some([]) => {
            let _ = writeln!(html, "<p>No professor information available</p>");
        }
        Some(taught) => {
            let _ = writeln!(
                html,
                "<p class=\"sort-container\">Sorted by: {}</p>",
                sort.label()
            );
            let _ = writeln!(html, "<table>");
            let _ = writeln!(
                html,
                "<thead><tr><th>Instructor</th><th>Grades</th><th>Avg</th></tr></thead>"
            );
            let _ = writeln!(html, "<tbody>");
            for (index, entry) in taught.iter().enumerate() {
                let average = entry.offering.average;
                let _ = writeln!(html, "<tr>");
                let _ = writeln!(
                    html,
                    "  <td><a href=\"{}\" class=\"course-link\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></td>",
                    escape_html(&instructor_href(entry.name)),
                    escape_html(entry.name)
                );
                let _ = writeln!(
                    html,
                    "  <td><a href=\"#{}\" class=\"view-grades-btn\">View</a></td>",
                    instructor_anchor(index)
                );
                let _ = writeln!(
                    html,
                    "  <td class=\"{} monospace\">{average:.2}</td>",
                    AverageTier::of(average).class()
                );
                let _ = writeln!(html, "</tr>");
            }
            let _ = writeln!(html, "</tbody>");
            let _ = writeln!(html, "</table>");
        }
    }
    let _ = writeln!(html, "</section>");
    html
}

/// Everything a course detail page shows
#[derive(Debug, Clone)]
pub struct CoursePage<'a> {
    /// Campus and session being viewed
    pub context: &'a Context,
    /// Who the page is about
    pub header: CourseHeader<'a>,
    /// The course record for the session, if it was offered
    pub course: Option<&'a Course>,
    /// Prerequisite record, if any
    pub prereq: Option<&'a PrereqRecord>,
    /// Instructors of the course this session; `None` if they could not be
    /// loaded
    pub taught: Option<Vec<CourseInstructor<'a>>>,
    /// Order of [`taught`](Self::taught)
    pub sort: OfferingSort,
    /// Instructor whose offering the main grades view shows
    pub focus: Option<&'a str>,
}

impl CoursePage<'_> {
    /// The page body
    #[must_use]
    pub fn render(&self) -> String {
        let mut html = header_html(&self.header, self.prereq);
        let _ = writeln!(html, "<div class=\"course-details-container\">");

        match self.course {
            None => html.push_str(&not_offered_html(self.header.code, self.context)),
            Some(course) => {
                let focused = self.focus.and_then(|name| {
                    self.taught
                        .as_deref()
                        .unwrap_or_default()
                        .iter()
                        .find(|t| t.name.eq_ignore_ascii_case(name))
                });
                match focused {
                    Some(entry) => {
                        html.push_str(&grades_html(&entry.offering.grade_summary(), Some(entry.name)));
                    }
                    None => {
                        if let Some(name) = self.focus {
                            crate::warn!("{name} did not teach {} in {}", course.code, self.context.session);
                        }
                        html.push_str(&grades_html(&course.grade_summary(), None));
                    }
                }
            }
        }

        html.push_str(&requisites_html(self.prereq, self.context));

        let taught = if self.course.is_some() {
            self.taught.as_deref()
        } else {
            Some(&[][..])
        };
        html.push_str(&professors_html(taught, self.sort));

        if let Some(taught) = taught.filter(|t| !t.is_empty()) {
            let _ = writeln!(html, "<section class=\"instructor-grades\">");
            for (index, entry) in taught.iter().enumerate() {
                let _ = writeln!(html, "<div id=\"{}\">", instructor_anchor(index));
                html.push_str(&grades_html(&entry.offering.grade_summary(), Some(entry.name)));
                let _ = writeln!(html, "</div>");
            }
            let _ = writeln!(html, "</section>");
        }

        let _ = writeln!(html, "</div>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Campus, GradeDistribution, Offering};

    fn context() -> Context {
        Context::new(Campus::Main, "2023W".parse().unwrap())
    }

    fn summary(counts: [u32; 11]) -> GradeSummary {
        GradeSummary {
            average: 84.56,
            reported: 120,
            weighted_median: 86.04,
            high: 99.0,
            low: 41.4,
            distribution: GradeDistribution::from_counts(counts),
        }
    }

    #[test]
    fn test_grades_stats_boxes() {
        let html = grades_html(&summary([0, 0, 0, 0, 0, 0, 0, 0, 40, 60, 20]), None);
        assert!(html.contains("Viewing overall data"));
        assert!(html.contains("average-value good-average\">84.6%"));
        assert!(html.contains("median-value great-average\">86.0%"));
        assert!(html.contains("enrolled-value\">120<"));
        assert!(html.contains("high-value\">99%"));
        assert!(html.contains("low-value\">41%"));
    }

    #[test]
    fn test_histogram_is_relative_to_max_bucket() {
        let html = distribution_html(&summary([0, 0, 0, 0, 0, 0, 0, 0, 40, 80, 20]));
        assert!(html.contains("height: 50.0%;\" title=\"40 students\""));
        assert!(html.contains("height: 100.0%;\" title=\"80 students\""));
        assert!(html.contains("height: 25.0%;\" title=\"20 students\""));
        assert!(html.contains("height: 0.0%;\" title=\"0 students\""));
        assert!(html.contains("&lt; 50"));
        assert_eq!(html.matches("bar-column").count(), 11);
    }

    #[test]
    fn test_empty_histogram_placeholder() {
        let html = grades_html(&summary([0; 11]), Some("Jane Doe"));
        assert!(html.contains("No distribution data available."));
        assert!(html.contains("Viewing data for: Jane Doe"));
        assert!(!html.contains("bar-column"));
    }

    #[test]
    fn test_header_credit_line() {
        let course = Course::new(
            "CPSC 110".into(),
            "Computation".into(),
            "Computer Science".into(),
            "Faculty of Science".into(),
        );
        let header = CourseHeader::of(&course);

        let html = header_html(&header, None);
        assert!(html.contains("Subject: Computer Science"));
        assert!(html.contains("No description available"));
        assert!(html.contains("Credits: No information available - Faculty of Science"));

        let record = PrereqRecord {
            code: "CPSC 110".into(),
            description: Some("Intro <programming>".into()),
            ..PrereqRecord::default()
        };
        let html = header_html(&header, Some(&record));
        assert!(html.contains("Intro &lt;programming&gt;"));
        assert!(html.contains("Credits: Data unavailable. - Faculty of Science"));
    }

    #[test]
    fn test_clean_requisite_text() {
        assert_eq!(clean_requisite_text("  One of A,  , B\n and   C "), "One of A, B and C");
        assert_eq!(clean_requisite_text(",,,"), ",,");
    }

    #[test]
    fn test_link_course_codes() {
        let html = link_course_codes("Either CPSC110 or MATH 100A, & BIOL 1", &context());
        assert!(html.starts_with("Either <a href=\"course-details.html?code=CPSC%20110&amp;campus=v\""));
        assert!(html.contains(">CPSC 110</a> or "));
        assert!(html.contains("code=MATH%20100A&amp;campus=v\" class=\"course-link\">MATH 100A</a>"));
        assert!(html.ends_with(", &amp; BIOL 1"));
    }

    #[test]
    fn test_link_course_codes_backtracks_department() {
        let html = link_course_codes("XCPSC 210", &context());
        assert!(html.starts_with("X<a "));
        assert!(html.contains(">CPSC 210</a>"));

        let html = link_course_codes("ABCDE 110", &context());
        assert!(html.starts_with("A<a "));
        assert!(html.contains(">BCDE 110</a>"));
    }

    #[test]
    fn test_requisites_sections() {
        let html = requisites_html(None, &context());
        assert_eq!(html.matches("<p>Data unavailable</p>").count(), 3);

        let record = PrereqRecord {
            code: "CPSC 210".into(),
            prerequisite_codes: Some(vec!["CPSC 110".into(), "CPSC 107".into()]),
            corequisite_codes: Some(vec![]),
            ..PrereqRecord::default()
        };
        let html = requisites_html(Some(&record), &context());
        assert!(html.contains(">CPSC 110</a>, <a "));
        assert!(html.contains("<h3>Corequisites</h3>\n<p>None</p>"));
        assert!(html.contains("<h3>Dependent Courses</h3>\n<p>No information available</p>"));

        let record = PrereqRecord {
            dependents: Some(vec![]),
            ..record
        };
        let html = requisites_html(Some(&record), &context());
        assert!(html.contains("<h3>Dependent Courses</h3>\n<p>None</p>"));
    }

    #[test]
    fn test_professors_view() {
        assert!(professors_html(Some(&[][..]), OfferingSort::default())
            .contains("No professor information available"));
        assert!(professors_html(None, OfferingSort::default())
            .contains("Error loading professor information"));

        let offering = Offering {
            code: "CPSC 110".into(),
            average: 72.349,
            ..Offering::default()
        };
        let taught = [CourseInstructor {
            name: "Grace Hopper",
            offering: &offering,
        }];
        let html = professors_html(Some(&taught[..]), OfferingSort::AverageDesc);
        assert!(html.contains("q=Grace%20Hopper"));
        assert!(html.contains("href=\"#instructor-0\""));
        assert!(html.contains("<td class=\"fair-average monospace\">72.35</td>"));
    }

    #[test]
    fn test_not_offered_keeps_header() {
        let context = context();
        let page = CoursePage {
            context: &context,
            header: CourseHeader::bare("PHIL 999"),
            course: None,
            prereq: None,
            taught: None,
            sort: OfferingSort::default(),
            focus: None,
        };
        let html = page.render();
        assert!(html.contains("<span class=\"course-code\">PHIL 999</span>"));
        assert!(html.contains("PHIL 999 was not offered in 2023W."));
        assert!(html.contains("No professor information available"));
        assert!(!html.contains("Viewing overall data"));
    }
}
