mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use orario_sync_core::ProviderConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "orario-sync")]
#[command(about = "Export University of Bologna timetables to iCalendar")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Upstream request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// List departments
    Departments,

    /// List the courses of a department
    Courses {
        /// Department index, as printed by `departments`
        #[arg(short, long)]
        school: usize,
    },

    /// List the curricula of a course for one year
    Curricula {
        /// Course website
        #[arg(short, long)]
        course_url: String,

        /// Course year
        #[arg(short, long)]
        year: u32,
    },

    /// List the classes of a timetable with their selection bits
    Classes {
        #[arg(short, long)]
        course_url: String,

        #[arg(short, long)]
        year: u32,

        /// Curriculum code, e.g. 947-000
        #[arg(long, default_value = "")]
        curriculum: String,
    },

    /// Fetch a timetable and write the selected classes to an ICS file
    Generate {
        #[arg(short, long)]
        course_url: String,

        /// Course code, used in the file name
        #[arg(long)]
        code: String,

        /// Course name, used in the file name
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        year: u32,

        #[arg(long, default_value = "")]
        curriculum: String,

        /// Selection mask: bit i selects the i-th class listed by `classes`.
        /// A 64-bit mask, so only the first 64 classes can be selected
        #[arg(long)]
        classes: u64,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,

        /// Calendar name
        #[arg(long)]
        calendar_name: Option<String>,

        /// Leave teachers out of event descriptions
        #[arg(long)]
        no_teacher: bool,

        /// Reminder before each lesson, in minutes
        #[arg(long)]
        reminder_minutes: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("orario_sync_cli={log_level},orario_sync_core={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ProviderConfig {
        timeout: Some(cli.timeout),
        ..ProviderConfig::default()
    };

    match cli.command {
        Commands::Departments => commands::departments_command(config).await,

        Commands::Courses { school } => commands::courses_command(config, school).await,

        Commands::Curricula { course_url, year } => {
            commands::curricula_command(config, course_url, year).await
        }

        Commands::Classes {
            course_url,
            year,
            curriculum,
        } => commands::classes_command(config, course_url, year, curriculum).await,

        Commands::Generate {
            course_url,
            code,
            name,
            year,
            curriculum,
            classes,
            output,
            calendar_name,
            no_teacher,
            reminder_minutes,
        } => {
            commands::generate_command(
                config,
                commands::GenerateParams {
                    course_url,
                    code,
                    name,
                    year,
                    curriculum,
                    classes,
                    output,
                    calendar_name,
                    include_teacher: !no_teacher,
                    reminder_minutes,
                },
            )
            .await
        }
    }
}
