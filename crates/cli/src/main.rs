//! EduQuest CLI - course progress and achievements.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use eduquest_core::{CourseId, Level, Role, User, UserId};
use eduquest_enrollment::{
    BasicEnrollmentManager, Clock, CourseSpec, EngineConfig, EnrollmentManager, ManualClock,
    SystemClock,
};
use eduquest_progress::Dashboard;
use eduquest_storage::{JsonStorage, Storage};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eduquest")]
#[command(about = "Course progress, streaks and achievements", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Storage path for EduQuest data
    #[arg(short, long, default_value = ".eduquest")]
    storage: PathBuf,

    /// SQLite database URL, used instead of the JSON store
    #[cfg(feature = "sqlite")]
    #[arg(long)]
    database: Option<String>,

    /// Engine configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat this RFC 3339 timestamp as the current time
    #[arg(long)]
    at: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage users
    #[command(subcommand)]
    User(UserCommands),
    /// Manage courses
    #[command(subcommand)]
    Course(CourseCommands),
    /// Enroll a student in a course
    Enroll {
        /// User ID
        user: String,
        /// Course ID
        course: String,
    },
    /// Record course progress (0-100)
    Progress {
        /// User ID
        user: String,
        /// Course ID
        course: String,
        /// Percentage complete
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Leave a course
    Unenroll {
        /// User ID
        user: String,
        /// Course ID
        course: String,
    },
    /// List a user's achievements
    Achievements {
        /// User ID
        user: String,
    },
    /// Show a user's dashboard
    Dashboard {
        /// User ID
        user: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a user
    Add {
        /// Display name
        name: String,
        /// Email address
        email: String,
        /// Role (student, instructor, admin)
        #[arg(long, default_value = "student")]
        role: String,
    },
}

#[derive(Subcommand)]
enum CourseCommands {
    /// Publish a course as an instructor
    Create {
        /// Instructor user ID
        instructor: String,
        /// Course title
        title: String,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
        /// Category
        #[arg(long, default_value = "General")]
        category: String,
        /// Level (beginner, intermediate, advanced)
        #[arg(long, default_value = "beginner")]
        level: String,
        /// Expected effort in hours
        #[arg(long)]
        hours: Option<u32>,
        /// Number of lessons
        #[arg(long)]
        lessons: Option<u32>,
    },
    /// List courses
    List,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let clock: Arc<dyn Clock> = match &cli.at {
        Some(at) => Arc::new(ManualClock::new(parse_time(at)?)),
        None => Arc::new(SystemClock),
    };

    #[cfg(feature = "sqlite")]
    if let Some(url) = &cli.database {
        let storage = eduquest_storage::SqliteStorage::new(url).await?;
        return run(storage, &config, clock, cli.command).await;
    }

    let storage = JsonStorage::new(&cli.storage).await?;
    run(storage, &config, clock, cli.command).await
}

async fn run<S: Storage + 'static>(
    storage: S,
    config: &EngineConfig,
    clock: Arc<dyn Clock>,
    command: Commands,
) -> Result<()> {
    let manager = BasicEnrollmentManager::new(storage)
        .with_config(config)?
        .with_clock(Arc::clone(&clock));

    match command {
        Commands::User(UserCommands::Add { name, email, role }) => {
            let role: Role = role.parse()?;
            let mut user = User::new(name, email, role);
            user.created_at = clock.now();
            manager.storage().lock().await.save_user(&user).await?;
            println!("Added user: {} - {} ({})", user.id, user.name, user.role);
        }
        Commands::Course(CourseCommands::Create {
            instructor,
            title,
            description,
            category,
            level,
            hours,
            lessons,
        }) => {
            let level: Level = level.parse()?;
            let course = manager
                .create_course(
                    parse_user(&instructor)?,
                    CourseSpec {
                        title,
                        description,
                        category,
                        level,
                        duration_hours: hours,
                        lessons,
                    },
                )
                .await?;
            println!("Created course: {} - {}", course.id, course.title);
        }
        Commands::Course(CourseCommands::List) => {
            let courses = manager.storage().lock().await.list_courses().await?;
            println!("Courses ({})", courses.len());
            for course in courses {
                println!(
                    "  {} | {:?} | {} enrolled | {}",
                    course.id, course.level, course.students_enrolled, course.title,
                );
            }
        }
        Commands::Enroll { user, course } => {
            let enrollment = manager.enroll(parse_user(&user)?, parse_course(&course)?).await?;
            println!("Enrolled: {} ({})", enrollment.id, enrollment.status);
        }
        Commands::Progress { user, course, value } => {
            let enrollment = manager
                .update_progress(parse_user(&user)?, parse_course(&course)?, value)
                .await?;
            println!("Progress: {}% ({})", enrollment.progress, enrollment.status);
        }
        Commands::Unenroll { user, course } => {
            let enrollment = manager.unenroll(parse_user(&user)?, parse_course(&course)?).await?;
            println!("Unenrolled: {} (was {}%)", enrollment.id, enrollment.progress);
        }
        Commands::Achievements { user } => {
            let achievements = manager
                .storage()
                .lock()
                .await
                .list_achievements(parse_user(&user)?)
                .await?;
            println!("Achievements ({})", achievements.len());
            for achievement in achievements {
                println!(
                    "  {} | {} | {}",
                    achievement.earned_at.format("%Y-%m-%d"),
                    achievement.kind,
                    achievement.title,
                );
            }
        }
        Commands::Dashboard { user, json } => {
            let dashboard = manager.dashboard(parse_user(&user)?).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
            } else {
                print_dashboard(&dashboard);
            }
        }
    }

    Ok(())
}

fn print_dashboard(dashboard: &Dashboard) {
    println!("Dashboard: {}", dashboard.user_name);
    println!("  Enrolled: {}", dashboard.total_enrolled_courses);
    println!("  Completed: {}", dashboard.completed_courses);
    println!("  In progress: {}", dashboard.in_progress_courses);
    println!("  Hours: {}", dashboard.total_hours);
    println!("  Streak: {} days", dashboard.current_streak);
    println!("  Achievements: {}", dashboard.total_achievements);
    if let Some(last) = dashboard.last_activity {
        println!("  Last activity: {}", last);
    }
    for enrollment in &dashboard.recent_enrollments {
        println!(
            "    {} | {:>3}% | {}",
            enrollment.course_id, enrollment.progress, enrollment.status
        );
    }
    for achievement in &dashboard.recent_achievements {
        println!("    {} | {}", achievement.kind, achievement.title);
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    debug!(?config, "Loaded config");
    Ok(config)
}

fn parse_time(s: &str) -> Result<DateTime<Utc>> {
    let t = DateTime::parse_from_rfc3339(s).with_context(|| format!("Invalid timestamp: {}", s))?;
    Ok(t.with_timezone(&Utc))
}

fn parse_user(s: &str) -> Result<UserId> {
    s.parse().map_err(|_| anyhow::anyhow!("Invalid user ID: {}", s))
}

fn parse_course(s: &str) -> Result<CourseId> {
    s.parse().map_err(|_| anyhow::anyhow!("Invalid course ID: {}", s))
}
