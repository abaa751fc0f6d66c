//! Paginated tables
//!
//! [`Paginator`] slices an already filtered and sorted collection into
//! pages; it never reorders or filters. Each record type renders its own row
//! through [`TableRow`].

use super::{detail_href, escape_html, instructor_href, AverageTier, PageKind};
use crate::core::models::{Context, Course, DetailQuery, Instructor, Program};
use std::fmt::{self, Write};
use std::str::FromStr;

/// Rows per page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageSize {
    /// 50 rows
    #[default]
    Fifty,
    /// 100 rows
    Hundred,
    /// 1000 rows
    Thousand,
    /// Everything on one page
    All,
}

impl PageSize {
    /// Choices in menu order
    pub const ALL: [Self; 4] = [Self::Fifty, Self::Hundred, Self::Thousand, Self::All];

    /// Row limit, `None` for unlimited
    #[must_use]
    pub const fn rows(self) -> Option<usize> {
        match self {
            Self::Fifty => Some(50),
            Self::Hundred => Some(100),
            Self::Thousand => Some(1000),
            Self::All => None,
        }
    }

    /// Option value (`-1` stands for unlimited)
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Fifty => "50",
            Self::Hundred => "100",
            Self::Thousand => "1000",
            Self::All => "-1",
        }
    }

    /// Option label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fifty => "50",
            Self::Hundred => "100",
            Self::Thousand => "1000",
            Self::All => "Show all",
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "50" => Ok(Self::Fifty),
            "100" => Ok(Self::Hundred),
            "1000" => Ok(Self::Thousand),
            "all" | "-1" => Ok(Self::All),
            other => Err(format!(
                "Invalid page size '{other}' (expected 50, 100, 1000 or all)"
            )),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current page and page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    size: PageSize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl Paginator {
    /// Start on page 1
    #[must_use]
    pub const fn new(size: PageSize) -> Self {
        Self { page: 1, size }
    }

    /// Current page (1-based)
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Current page size
    #[must_use]
    pub const fn size(&self) -> PageSize {
        self.size
    }

    /// Change the page size and return to page 1
    pub fn set_size(&mut self, size: PageSize) {
        self.size = size;
        self.page = 1;
    }

    /// Number of pages for `len` records: zero only when there are none
    #[must_use]
    pub const fn total_pages(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match self.size.rows() {
            Some(rows) => len.div_ceil(rows),
            None => 1,
        }
    }

    /// Jump to `page`, clamped to the pages that exist for `len` records
    pub fn go_to(&mut self, page: usize, len: usize) {
        self.page = page.clamp(1, self.total_pages(len).max(1));
    }

    /// First page
    pub fn first(&mut self) {
        self.page = 1;
    }

    /// Previous page, if any
    pub fn previous(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Next page, if any
    pub fn next(&mut self, len: usize) {
        self.go_to(self.page + 1, len);
    }

    /// Last page
    pub fn last(&mut self, len: usize) {
        self.go_to(self.total_pages(len), len);
    }

    /// Records on the current page
    #[must_use]
    pub fn window<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let Some(rows) = self.size.rows() else {
            return items;
        };
        let start = (self.page - 1).saturating_mul(rows).min(items.len());
        let end = start.saturating_add(rows).min(items.len());
        &items[start..end]
    }

    /// Page-size menu, first/previous/next/last links and "Page X of Y".
    ///
    /// `href` maps a page number to its link. Without records the block
    /// only says so.
    #[must_use]
    pub fn controls_html(&self, len: usize, href: impl Fn(usize) -> String) -> String {
        let mut html = String::new();
        let _ = writeln!(html, "<div class=\"pagination-controls\">");
        if len == 0 {
            let _ = writeln!(html, "  <p>No results found</p>");
            let _ = writeln!(html, "</div>");
            return html;
        }

        let _ = writeln!(html, "  <select class=\"page-size-select\" disabled>");
        for size in PageSize::ALL {
            let selected = if size == self.size { " selected" } else { "" };
            let _ = writeln!(
                html,
                "    <option value=\"{}\"{selected}>{}</option>",
                size.token(),
                size.label()
            );
        }
        let _ = writeln!(html, "  </select>");

        let total = self.total_pages(len);
        if total > 1 {
            let at_start = self.page <= 1;
            let at_end = self.page >= total;
            write_control(&mut html, "First", (!at_start).then(|| href(1)));
            write_control(&mut html, "Previous", (!at_start).then(|| href(self.page - 1)));
            let _ = writeln!(
                html,
                "  <span class=\"page-info\">Page {} of {total}</span>",
                self.page
            );
            write_control(&mut html, "Next", (!at_end).then(|| href(self.page + 1)));
            write_control(&mut html, "Last", (!at_end).then(|| href(total)));
        } else {
            let _ = writeln!(html, "  <span class=\"page-info\">Page 1 of 1</span>");
        }
        let _ = writeln!(html, "</div>");
        html
    }
}

fn write_control(html: &mut String, label: &str, href: Option<String>) {
    match href {
        Some(href) => {
            let _ = writeln!(
                html,
                "  <a class=\"control-button\" href=\"{}\">{label}</a>",
                escape_html(&href)
            );
        }
        None => {
            let _ = writeln!(
                html,
                "  <span class=\"control-button disabled\">{label}</span>"
            );
        }
    }
}

/// Output file of one page of a listing: `index.html`, `index-2.html`, …
#[must_use]
pub fn page_file_name(kind: PageKind, page: usize) -> String {
    let file = kind.file_name();
    if page <= 1 {
        return file.to_string();
    }
    let stem = file.strip_suffix(".html").unwrap_or(file);
    format!("{stem}-{page}.html")
}

/// A record that renders as one table row
pub trait TableRow {
    /// Column headings
    const HEADERS: &'static [&'static str];

    /// Append this record's `<tr>`
    fn write_row(&self, html: &mut String, context: &Context);
}

impl TableRow for Course {
    const HEADERS: &'static [&'static str] = &["Course Code", "Course Name", "Students", "Average"];

    fn write_row(&self, html: &mut String, context: &Context) {
        let href = detail_href(&DetailQuery::for_course(&self.code, context));
        let _ = writeln!(html, "<tr>");
        let _ = writeln!(
            html,
            "  <td><a href=\"{}\" class=\"course-link\">{}</a></td>",
            escape_html(&href),
            escape_html(&self.code)
        );
        let _ = writeln!(html, "  <td>{}</td>", escape_html(&self.name));
        let _ = writeln!(html, "  <td class=\"monospace text-right\">{}</td>", self.reported);
        let _ = writeln!(
            html,
            "  <td class=\"{}\">{:.2}</td>",
            AverageTier::of(self.average).class(),
            self.average
        );
        let _ = writeln!(html, "</tr>");
    }
}

impl TableRow for Instructor {
    const HEADERS: &'static [&'static str] = &["Instructor", "Courses", "Students", "Average"];

    fn write_row(&self, html: &mut String, context: &Context) {
        let mut codes = String::new();
        let mut students = String::new();
        let mut averages = String::new();
        for offering in &self.courses {
            let href = detail_href(&DetailQuery::for_course(&offering.code, context));
            let _ = write!(
                codes,
                "<div class=\"course-row\"><a href=\"{}\" class=\"course-link\" title=\"{}\">{}</a></div>",
                escape_html(&href),
                escape_html(&offering.title),
                escape_html(&offering.code)
            );
            let _ = write!(
                students,
                "<div class=\"course-row\"><span class=\"monospace\">{}</span></div>",
                offering.reported
            );
            let _ = write!(
                averages,
                "<div class=\"course-row\"><span class=\"{} monospace\">{:.2}</span></div>",
                AverageTier::of(offering.average).class(),
                offering.average
            );
        }

        let _ = writeln!(html, "<tr>");
        let _ = writeln!(
            html,
            "  <td><a href=\"{}\" class=\"course-link\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></td>",
            escape_html(&instructor_href(&self.name)),
            escape_html(&self.name)
        );
        let _ = writeln!(html, "  <td>{codes}</td>");
        let _ = writeln!(html, "  <td>{students}</td>");
        let _ = writeln!(html, "  <td>{averages}</td>");
        let _ = writeln!(html, "</tr>");
    }
}

impl TableRow for Program {
    const HEADERS: &'static [&'static str] = &["Program", "Faculty", "Length", "Requirements"];

    fn write_row(&self, html: &mut String, _context: &Context) {
        let _ = writeln!(html, "<tr>");
        let _ = writeln!(
            html,
            "  <td><a href=\"{}\" class=\"course-link\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></td>",
            escape_html(&self.program_link),
            escape_html(&self.name)
        );
        let _ = writeln!(html, "  <td>{}</td>", escape_html(&self.faculty));
        let _ = writeln!(html, "  <td>{}</td>", escape_html(&self.length));
        let _ = writeln!(
            html,
            "  <td><a href=\"{}\" class=\"course-link\" target=\"_blank\" rel=\"noopener noreferrer\">View</a></td>",
            escape_html(&self.requirements_link)
        );
        let _ = writeln!(html, "</tr>");
    }
}

/// Current page of `records` as a table followed by its pagination controls
#[must_use]
pub fn render_table<T: TableRow>(
    records: &[&T],
    paginator: &Paginator,
    context: &Context,
    href: impl Fn(usize) -> String,
) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<div class=\"table-wrapper\">");
    let _ = writeln!(html, "<table>");
    let _ = writeln!(html, "<thead><tr>");
    for heading in T::HEADERS {
        let _ = writeln!(html, "  <th>{heading}</th>");
    }
    let _ = writeln!(html, "</tr></thead>");
    let _ = writeln!(html, "<tbody>");
    for record in paginator.window(records) {
        record.write_row(&mut html, context);
    }
    let _ = writeln!(html, "</tbody>");
    let _ = writeln!(html, "</table>");
    let _ = writeln!(html, "</div>");
    html.push_str(&paginator.controls_html(records.len(), href));
    html
}
