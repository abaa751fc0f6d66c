//! HTML rendering
//!
//! Fragments are assembled with [`std::fmt::Write`]; the surrounding page
//! (head, navigation, theme) comes from the `page.html` askama template.
//! All dataset text passes through [`escape_html`] before it reaches a page.

pub mod detail;
pub mod filters;
pub mod insights;
pub mod table;

use crate::config::Theme;
use crate::core::models::{Context, DetailQuery};
use askama::{Html, MarkupDisplay, Template};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Stylesheet inlined into every page
const STYLESHEET: &str = include_str!("../../assets/style.css");

/// External instructor search
const INSTRUCTOR_SEARCH_URL: &str = "https://www.ratemyprofessors.com/search/professors?q=";

/// Six-step quality scale of a course average
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AverageTier {
    /// 90 and above
    Excellent,
    /// 85 and above
    Great,
    /// 80 and above
    Good,
    /// 70 and above
    Fair,
    /// 60 and above
    Bad,
    /// Below 60
    Horrible,
}

impl AverageTier {
    /// Tier of an average
    #[must_use]
    pub fn of(average: f64) -> Self {
        if average >= 90.0 {
            Self::Excellent
        } else if average >= 85.0 {
            Self::Great
        } else if average >= 80.0 {
            Self::Good
        } else if average >= 70.0 {
            Self::Fair
        } else if average >= 60.0 {
            Self::Bad
        } else {
            Self::Horrible
        }
    }

    /// CSS class
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Excellent => "excellent-average",
            Self::Great => "great-average",
            Self::Good => "good-average",
            Self::Fair => "fair-average",
            Self::Bad => "bad-average",
            Self::Horrible => "horrible-average",
        }
    }

    /// Text color used where a class cannot be attached
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#4361ee",
            Self::Great => "#009c1f",
            Self::Good => "#79ff00",
            Self::Fair => "#ffef00",
            Self::Bad => "#f0883e",
            Self::Horrible => "#f85149",
        }
    }
}

/// Escape text for use in element content and quoted attributes, with the
/// same escaper the page template applies
#[must_use]
pub fn escape_html(text: &str) -> String {
    MarkupDisplay::new_unsafe(text, Html).to_string()
}

/// `12345` → `12,345`
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Relative link to a course detail page
#[must_use]
pub fn detail_href(query: &DetailQuery) -> String {
    format!("{}?{}", PageKind::Course.file_name(), query.to_query_string())
}

/// External search link for an instructor name
#[must_use]
pub fn instructor_href(name: &str) -> String {
    format!("{INSTRUCTOR_SEARCH_URL}{}", urlencoding::encode(name))
}

/// The generated pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Course table
    Courses,
    /// Course detail
    Course,
    /// Instructor table
    Professors,
    /// Program table
    Programs,
    /// Summary statistics
    Insights,
}

impl PageKind {
    /// Pages listed in the navigation bar
    pub const NAV: [Self; 4] = [Self::Courses, Self::Professors, Self::Programs, Self::Insights];

    /// Output file name
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Courses => "index.html",
            Self::Course => "course-details.html",
            Self::Professors => "professors.html",
            Self::Programs => "programs.html",
            Self::Insights => "data.html",
        }
    }

    /// Navigation label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Courses => "Courses",
            Self::Course => "Course Details",
            Self::Professors => "Professors",
            Self::Programs => "Programs",
            Self::Insights => "Insights",
        }
    }
}

/// One navigation link
#[derive(Debug, Clone)]
pub struct NavItem {
    /// Target file
    pub href: &'static str,
    /// Link text
    pub label: &'static str,
    /// Whether this is the current page
    pub active: bool,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    title: &'a str,
    theme: &'a str,
    context: String,
    nav: Vec<NavItem>,
    body: &'a str,
    css: &'a str,
}

/// Wrap a rendered body in the page shell
///
/// # Errors
/// Returns an error if the template fails to render.
pub fn render_page(
    kind: PageKind,
    title: &str,
    context: &Context,
    theme: Theme,
    body: &str,
) -> Result<String, askama::Error> {
    let nav = PageKind::NAV
        .iter()
        .map(|&page| NavItem {
            href: page.file_name(),
            label: page.label(),
            active: page == kind,
        })
        .collect();
    PageTemplate {
        title,
        theme: theme.as_str(),
        context: format!("{} · {}", context.campus.name(), context.session),
        nav,
        body,
        css: STYLESHEET,
    }
    .render()
}

/// Write a rendered page under `site_dir`, creating the directory if needed
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
pub fn write_page(site_dir: &Path, file_name: &str, html: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(site_dir)?;
    let path = site_dir.join(file_name);
    fs::write(&path, html)?;
    crate::debug!("Wrote {}", path.display());
    Ok(path)
}
