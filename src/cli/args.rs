//! CLI argument definitions for `GradeFinder`

use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use grade_finder::config::ConfigOverrides;
use grade_finder::core::filter::{AverageBand, EnrollmentBand, FilterSelection, Selection};
use grade_finder::core::models::{Campus, Session};
use grade_finder::core::render::table::PageSize;
use grade_finder::core::sort::{CourseSort, FacultySort, InstructorSort, OfferingSort};
use grade_finder::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to
/// `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

/// A filter dimension, for `--exclude-all`
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum Dimension {
    /// Faculty checkboxes
    Faculty,
    /// Year-level checkboxes
    Year,
    /// Average-band checkboxes
    Average,
    /// Enrollment-band checkboxes
    Enrollment,
    /// Credit checkboxes
    Credits,
}

/// Campus and session selection shared by the data commands
#[derive(Debug, Clone, Default, Args)]
pub struct ContextArgs {
    /// Campus (`v` or `o`); remembered as the new default when given
    #[arg(long, value_name = "CAMPUS")]
    pub campus: Option<Campus>,

    /// Academic session such as 2023W (defaults to the configured session)
    #[arg(long, value_name = "SESSION")]
    pub session: Option<Session>,
}

/// Filter checkboxes and search text
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Free-text search over code, subject and name
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Only these faculties (repeatable)
    #[arg(long = "faculty", value_name = "NAME")]
    pub faculties: Vec<String>,

    /// Only these year levels, e.g. 100 (repeatable)
    #[arg(long = "year", value_name = "LEVEL")]
    pub years: Vec<u16>,

    /// Only these average bands by lower bound: 0, 60, 70, 80, 85, 90 (repeatable)
    #[arg(long = "average", value_name = "BAND")]
    pub averages: Vec<AverageBand>,

    /// Only these enrollment bands by lower bound: 0, 50, 100, 400, 800 (repeatable)
    #[arg(long = "enrollment", value_name = "BAND")]
    pub enrollments: Vec<EnrollmentBand>,

    /// Only these credit counts; 0 selects unknown credits (repeatable)
    #[arg(long = "credits", value_name = "N")]
    pub credits: Vec<u32>,

    /// Untick every box of a dimension so it matches nothing (repeatable)
    #[arg(long = "exclude-all", value_enum, value_name = "DIMENSION")]
    pub exclude_all: Vec<Dimension>,
}

/// The selection one dimension's flags describe, or `None` when the
/// dimension was not mentioned on the command line
fn given<T: Ord + Clone>(values: &[T], excluded: bool) -> Option<Selection<T>> {
    if !values.is_empty() {
        Some(Selection::only(values.iter().cloned()))
    } else if excluded {
        Some(Selection::None)
    } else {
        None
    }
}

impl FilterArgs {
    /// Whether any filter flag was given
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.faculties.is_empty()
            && self.years.is_empty()
            && self.averages.is_empty()
            && self.enrollments.is_empty()
            && self.credits.is_empty()
            && self.exclude_all.is_empty()
    }

    fn excluded(&self, dimension: Dimension) -> bool {
        self.exclude_all.contains(&dimension)
    }

    /// Build the filter selection these flags describe
    pub fn to_selection(&self) -> FilterSelection {
        self.apply_to(FilterSelection::default())
    }

    /// Replace the dimensions mentioned on the command line, keeping the
    /// rest of `base`
    pub fn apply_to(&self, base: FilterSelection) -> FilterSelection {
        FilterSelection {
            faculties: given(&self.faculties, self.excluded(Dimension::Faculty))
                .unwrap_or(base.faculties),
            year_levels: given(&self.years, self.excluded(Dimension::Year))
                .unwrap_or(base.year_levels),
            averages: given(&self.averages, self.excluded(Dimension::Average))
                .unwrap_or(base.averages),
            enrollments: given(&self.enrollments, self.excluded(Dimension::Enrollment))
                .unwrap_or(base.enrollments),
            credits: given(&self.credits, self.excluded(Dimension::Credits))
                .unwrap_or(base.credits),
            search: self.search.clone().unwrap_or(base.search),
        }
    }
}

/// Instructor filter flags: the dimensions that apply to instructors
#[derive(Debug, Clone, Default, Args)]
pub struct InstructorFilterArgs {
    /// Search instructor names
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Only instructors listed under these faculties (repeatable)
    #[arg(long = "faculty", value_name = "NAME")]
    pub faculties: Vec<String>,

    /// Only instructors teaching a course at these year levels (repeatable)
    #[arg(long = "year", value_name = "LEVEL")]
    pub years: Vec<u16>,

    /// Only these overall-average bands by lower bound: 0, 60, 70, 80, 85, 90 (repeatable)
    #[arg(long = "average", value_name = "BAND")]
    pub averages: Vec<AverageBand>,

    /// Untick every box of a dimension so it matches nothing: faculty, year or average (repeatable)
    #[arg(long = "exclude-all", value_enum, value_name = "DIMENSION")]
    pub exclude_all: Vec<Dimension>,
}

impl InstructorFilterArgs {
    /// Build the instructor filter selection these flags describe
    pub fn to_selection(&self) -> FilterSelection {
        FilterArgs {
            search: self.search.clone(),
            faculties: self.faculties.clone(),
            years: self.years.clone(),
            averages: self.averages.clone(),
            exclude_all: self
                .exclude_all
                .iter()
                .copied()
                .filter(|d| matches!(d, Dimension::Faculty | Dimension::Year | Dimension::Average))
                .collect(),
            ..FilterArgs::default()
        }
        .to_selection()
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `theme`, `data_root`, `site_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Filter, sort and paginate the course table.
    ///
    /// Writes every page of the result to the site directory and remembers
    /// the filters for `--resume`.
    Courses {
        #[command(flatten)]
        context: ContextArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Sort key: code, average, average-asc, students, students-asc, name
        #[arg(long, value_name = "KEY")]
        sort: Option<CourseSort>,

        /// Rows per page: 50, 100, 1000 or all
        #[arg(long, value_name = "N", default_value = "50")]
        page_size: PageSize,

        /// Start from the filters and sort key saved by the previous run
        #[arg(long)]
        resume: bool,
    },
    /// Render one course's detail page.
    Course {
        /// Course code, e.g. "CPSC 110"
        #[arg(value_name = "CODE", required_unless_present = "link")]
        code: Option<String>,

        /// Deep link query string (`code=…&campus=…&session=…`)
        #[arg(long, value_name = "QUERY", conflicts_with = "code")]
        link: Option<String>,

        #[command(flatten)]
        context: ContextArgs,

        /// Show this instructor's offering in the grades view
        #[arg(long, value_name = "NAME")]
        instructor: Option<String>,

        /// Instructor order: average-desc, average-asc, name-asc, name-desc
        #[arg(long, value_name = "KEY", default_value = "average-desc")]
        sort: OfferingSort,
    },
    /// Summary statistics for a campus and session.
    Insights {
        #[command(flatten)]
        context: ContextArgs,

        /// Faculty table order: students-desc, courses-desc, courses-asc, average-desc, average-asc
        #[arg(long, value_name = "KEY", default_value = "students-desc")]
        faculty_sort: FacultySort,
    },
    /// Filter, sort and paginate the instructor table.
    Professors {
        #[command(flatten)]
        context: ContextArgs,

        #[command(flatten)]
        filters: InstructorFilterArgs,

        /// Sort key: name, name-desc, average, average-asc, courses, courses-asc, students, students-asc
        #[arg(long, value_name = "KEY", default_value = "name")]
        sort: InstructorSort,

        /// Rows per page: 50, 100, 1000 or all
        #[arg(long, value_name = "N", default_value = "50")]
        page_size: PageSize,
    },
    /// Filter and paginate the program table.
    Programs {
        /// Campus (`v` or `o`); remembered as the new default when given
        #[arg(long, value_name = "CAMPUS")]
        campus: Option<Campus>,

        /// Search program names
        #[arg(short, long, value_name = "TEXT")]
        search: Option<String>,

        /// Only these faculties (repeatable)
        #[arg(long = "faculty", value_name = "NAME")]
        faculties: Vec<String>,

        /// Rows per page: 50, 100, 1000 or all
        #[arg(long, value_name = "N", default_value = "50")]
        page_size: PageSize,
    },
    /// Look up a subject code.
    Subjects {
        /// Subject code to look up, e.g. CPSC
        #[arg(value_name = "CODE")]
        query: String,

        /// Campus (`v` or `o`)
        #[arg(long, value_name = "CAMPUS")]
        campus: Option<Campus>,
    },
    /// Forget the saved filters and sort key.
    Reset,
}

#[derive(Parser, Debug)]
#[command(
    name = "gradefinder",
    about = "Explore course grade distributions and publish them as static pages",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Dataset directory or http(s) base URL
    #[arg(long = "data-root", value_name = "DIR|URL")]
    pub data_root: Option<String>,

    /// HTTP timeout in seconds (0 disables it)
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Page theme for this run (light|dark)
    #[arg(long = "theme", value_name = "THEME")]
    pub theme: Option<String>,

    /// Directory generated pages are written to
    #[arg(long = "site-dir", value_name = "DIR")]
    pub site_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// `None` means no override. Nothing here is written back to the config
    /// file.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: None,
            verbose: self.config_verbose,
            data_root: self.data_root.clone(),
            timeout_secs: self.timeout,
            theme: self.theme.clone(),
            site_dir: self
                .site_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
