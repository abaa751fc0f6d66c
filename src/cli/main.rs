//! Command-line interface entry point for `GradeFinder`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use grade_finder::config::Config;
use grade_finder::logger::{self, enable_debug, enable_verbose, init_file_logging, set_level, Level};
use grade_finder::{debug, info};

/// Layer the runtime log flags over the `[logging]` config section
fn configure_logging(args: &Cli, config: &Config) {
    logger::init(&config.logging);

    if let Some(level) = args.log_level {
        set_level(level.into());
    }
    if args.debug_flag {
        set_level(Level::Debug);
        enable_debug();
    }
    if args.verbose {
        enable_verbose();
    }

    if let Some(path) = &args.log_file {
        let shown = path.to_string_lossy();
        if init_file_logging(path) {
            info!("File logging initialized at: {shown}");
        } else {
            eprintln!("✗ Failed to initialize file logging at: {shown}");
        }
    }
}

async fn dispatch(command: Command, config: &mut Config, defaults: &Config) -> Result<(), String> {
    match command {
        Command::Config { subcommand } => commands::config::run(subcommand, config, defaults),
        Command::Courses {
            context,
            filters,
            sort,
            page_size,
            resume,
        } => {
            let request = commands::courses::CoursesRequest {
                context,
                filters,
                sort,
                page_size,
                resume,
            };
            commands::courses::run(request, config).await
        }
        Command::Course {
            code,
            link,
            context,
            instructor,
            sort,
        } => {
            let request = commands::course::CourseRequest {
                code,
                link,
                context,
                instructor,
                sort,
            };
            commands::course::run(request, config).await
        }
        Command::Insights {
            context,
            faculty_sort,
        } => commands::insights::run(&context, faculty_sort, config).await,
        Command::Professors {
            context,
            filters,
            sort,
            page_size,
        } => {
            let request = commands::professors::ProfessorsRequest {
                context,
                filters,
                sort,
                page_size,
            };
            commands::professors::run(request, config).await
        }
        Command::Programs {
            campus,
            search,
            faculties,
            page_size,
        } => {
            let request = commands::programs::ProgramsRequest {
                campus,
                search,
                faculties,
                page_size,
            };
            commands::programs::run(request, config).await
        }
        Command::Subjects { query, campus } => commands::subjects::run(&query, campus, config).await,
        Command::Reset => commands::reset::run(config),
    }
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    configure_logging(&args, &config);
    debug!("GradeFinder {}", grade_finder::core::get_version());

    if let Err(message) = dispatch(args.command, &mut config, &defaults).await {
        eprintln!("{message}");
        std::process::exit(1);
    }
}
