use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use eduboard_core::agenda::AgendaItem;
use eduboard_core::calendar::CalendarDay;
use eduboard_core::config::EduboardConfig;
use eduboard_core::filter::{
    AssignmentFilter, AssignmentStanding, CourseFilter, SortDirection, UserFilter, UserSortField,
};
use eduboard_core::model::*;
use eduboard_core::stats::{self, StatCard, Trend};
use eduboard_core::store::{create_campus, Campus};
use eduboard_core::views::{AnalyticsView, DashboardView, MonthCalendar, WeekAgenda};
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "eduboard", about = "Eduboard: education dashboard over a seeded campus", version)]
enum Cli {
    /// Show the dashboard for a role
    Dashboard {
        /// Role to render for (admin, manager, user). Defaults to viewer.role from config
        #[arg(short, long)]
        role: Option<String>,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Show enrollment and course analytics
    Analytics {
        /// Role to render for (admin, manager, user). Defaults to viewer.role from config
        #[arg(short, long)]
        role: Option<String>,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the week agenda or the month grid
    Calendar {
        /// Week agenda (default)
        #[arg(long, conflicts_with = "month")]
        week: bool,
        /// Month grid
        #[arg(long)]
        month: bool,
        /// Anchor date, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        date: Option<String>,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// List courses
    Courses {
        /// Match title or description
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by status (draft, active, archived)
        #[arg(long)]
        status: Option<String>,
        /// Filter by instructor id
        #[arg(long)]
        instructor: Option<String>,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// List assignments with the viewer's standing
    Assignments {
        /// Match title
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by course Id
        #[arg(short, long)]
        course: Option<u32>,
        /// Filter by type (homework, project, quiz, exam, discussion, presentation, essay)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Role to render for. Defaults to viewer.role from config
        #[arg(short, long)]
        role: Option<String>,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// List users
    Users {
        /// Match email or full name
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by role (admin, manager, user)
        #[arg(short, long)]
        role: Option<String>,
        /// Filter by institution id
        #[arg(long)]
        institution: Option<String>,
        /// Sort by name, role or last_active
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("eduboard=info")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = EduboardConfig::load(Some(&std::env::current_dir()?))
        .unwrap_or_else(|_| EduboardConfig::default_config());
    let campus = create_campus(&config).context("failed to seed campus")?;

    run(cli, &config, &campus).await
}

async fn run(cli: Cli, config: &EduboardConfig, campus: &Campus) -> Result<()> {
    let now = Utc::now();
    tracing::debug!(viewer = %config.viewer.id, role = %config.viewer.role, "running command");
    match cli {
        Cli::Dashboard { role, json } => {
            let role = resolve_role(role.as_deref(), config)?;
            cmd_dashboard(campus, role, &config.viewer.id, now, json).await
        }
        Cli::Analytics { role, json } => {
            let role = resolve_role(role.as_deref(), config)?;
            cmd_analytics(campus, role, json).await
        }
        Cli::Calendar {
            week: _,
            month,
            date,
            json,
        } => {
            let anchor = match date.as_deref() {
                Some(s) => parse_date(s)?,
                None => now.date_naive(),
            };
            if month {
                cmd_month(campus, anchor, now.date_naive(), json).await
            } else {
                cmd_week(campus, anchor, json).await
            }
        }
        Cli::Courses {
            search,
            status,
            instructor,
            json,
        } => {
            let filter = CourseFilter {
                search,
                status: parse_opt::<CourseStatus>(status.as_deref(), "course status")?,
                instructor_id: instructor,
            };
            cmd_courses(campus, &filter, json).await
        }
        Cli::Assignments {
            search,
            course,
            kind,
            role,
            json,
        } => {
            let filter = AssignmentFilter {
                search,
                course_id: course,
                kind: parse_opt::<AssignmentType>(kind.as_deref(), "assignment type")?,
            };
            let role = resolve_role(role.as_deref(), config)?;
            cmd_assignments(campus, &filter, role, &config.viewer.id, now, json).await
        }
        Cli::Users {
            search,
            role,
            institution,
            sort,
            desc,
            json,
        } => {
            let filter = UserFilter {
                search,
                role: parse_opt::<Role>(role.as_deref(), "role")?,
                institution_id: institution,
                sort: parse_opt::<UserSortField>(sort.as_deref(), "sort field")?,
                direction: if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
            };
            cmd_users(campus, &filter, json).await
        }
    }
}

// -- Argument helpers --

fn parse_opt<T: std::str::FromStr>(value: Option<&str>, what: &str) -> Result<Option<T>> {
    value
        .map(|s| {
            s.parse::<T>()
                .map_err(|_| anyhow::anyhow!("unknown {what}: {s}"))
        })
        .transpose()
}

fn resolve_role(role: Option<&str>, config: &EduboardConfig) -> Result<Role> {
    Ok(parse_opt::<Role>(role, "role")?.unwrap_or(config.viewer.role))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fmt_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_rule() {
    println!("{}", "─".repeat(78).dimmed());
}

fn print_stat_cards(cards: &[StatCard]) {
    for card in cards {
        let change = format!("{:+}%", card.change);
        let change = match card.change_type {
            Trend::Positive => change.green().to_string(),
            Trend::Negative => change.red().to_string(),
        };
        println!(
            "  {:<24} {:>10}  {}",
            card.title,
            card.value.to_string().bold(),
            change
        );
    }
}

fn print_agenda_item(item: &AgendaItem) {
    println!(
        "  {}  {:<10}  {}",
        fmt_date(item.date).cyan(),
        item.kind.to_string().magenta(),
        item.title
    );
}

// -- Commands --

async fn cmd_dashboard(
    campus: &Campus,
    role: Role,
    viewer_id: &str,
    now: DateTime<Utc>,
    json: bool,
) -> Result<()> {
    let view = DashboardView::load(campus, role, viewer_id, now).await;
    if json {
        return print_json(&view);
    }

    println!("{} {}", "Dashboard".bold(), format!("({})", role.label()).dimmed());
    print_rule();
    print_stat_cards(&view.stats);
    print_rule();

    println!("{}", "Upcoming assignments".bold());
    if view.upcoming_assignments.is_empty() {
        println!("  {}", "Nothing due.".dimmed());
    }
    for assignment in &view.upcoming_assignments {
        let days = stats::days_until_due(assignment, now).unwrap_or_default();
        println!(
            "  {:<32} {:<12} {}",
            assignment.title,
            assignment.kind.to_string().magenta(),
            format!("due in {days}d").yellow()
        );
    }

    println!("{}", "Recent AI jobs".bold());
    for job in &view.recent_ai_jobs {
        println!(
            "  #{:<3} {:<20} {:<11} {:>3}%",
            job.id,
            job.kind,
            job.status.to_string().cyan(),
            job.rounded_progress()
        );
    }
    Ok(())
}

async fn cmd_analytics(campus: &Campus, role: Role, json: bool) -> Result<()> {
    let view = AnalyticsView::load(campus, role).await;
    if json {
        return print_json(&view);
    }

    println!("{}", "Analytics".bold());
    print_rule();
    print_stat_cards(&view.stats);
    print_rule();

    println!("{}", "Course status".bold());
    for share in &view.course_status {
        println!(
            "  {:<10} {:>3}  {}",
            share.key.to_string(),
            share.count,
            format!("{}%", share.percent).dimmed()
        );
    }

    println!("{}", "Top courses".bold());
    for (rank, course) in view.top_courses.iter().enumerate() {
        println!(
            "  #{} {:<36} {} students",
            rank + 1,
            course.title,
            course.enrollments
        );
    }

    if role == Role::Admin {
        println!(
            "  {} users, {} assignments",
            view.users.len(),
            view.assignment_count
        );
    }
    Ok(())
}

async fn cmd_week(campus: &Campus, anchor: NaiveDate, json: bool) -> Result<()> {
    let agenda = WeekAgenda::load(campus, anchor).await;
    if json {
        return print_json(&agenda);
    }

    println!(
        "{} {} to {}",
        "Week".bold(),
        agenda.window.start.format("%a %Y-%m-%d"),
        agenda.window.end.format("%a %Y-%m-%d")
    );
    print_rule();
    if agenda.items.is_empty() {
        println!("  {}", "Nothing scheduled this week.".dimmed());
    }
    for item in &agenda.items {
        print_agenda_item(item);
    }
    Ok(())
}

async fn cmd_month(campus: &Campus, anchor: NaiveDate, today: NaiveDate, json: bool) -> Result<()> {
    let month = MonthCalendar::load(campus, anchor, today).await;
    if json {
        return print_json(&month);
    }

    println!("{}", anchor.format("%B %Y").to_string().bold());
    print_rule();
    println!("  Sun  Mon  Tue  Wed  Thu  Fri  Sat");
    for week in month.days.chunks(7) {
        let cells: Vec<String> = week.iter().map(format_grid_cell).collect();
        println!("  {}", cells.join(""));
    }
    print_rule();

    for day in month.days.iter().filter(|d| d.in_month && !d.items.is_empty()) {
        println!("{}", day.date.format("%a %d").to_string().bold());
        for item in &day.items {
            let course = item
                .course_id
                .and_then(|id| month.course_title(id))
                .map(|t| format!(" ({t})"))
                .unwrap_or_default();
            println!(
                "  {:<10} {}{}",
                item.kind.to_string().magenta(),
                item.title,
                course.dimmed()
            );
        }
    }
    Ok(())
}

fn format_grid_cell(day: &CalendarDay) -> String {
    let marker = if day.items.is_empty() { ' ' } else { '*' };
    let label = format!("{:>3}{marker} ", day.date.format("%d").to_string());
    if day.is_today {
        label.reversed().to_string()
    } else if day.in_month {
        label
    } else {
        label.dimmed().to_string()
    }
}

async fn cmd_courses(campus: &Campus, filter: &CourseFilter, json: bool) -> Result<()> {
    let courses = filter.apply(&campus.courses.get_all().await);
    if json {
        return print_json(&courses);
    }
    if courses.is_empty() {
        println!("No courses found.");
        return Ok(());
    }

    println!(
        "  {}  {}  {}  {}",
        format!("{:<4}", "ID").dimmed(),
        format!("{:<9}", "Status").dimmed(),
        format!("{:>6}", "Enr").dimmed(),
        "Title".dimmed(),
    );
    print_rule();
    for course in &courses {
        println!(
            "  {:<4}  {:<9}  {:>6}  {}",
            course.id.to_string().cyan(),
            course.status.to_string().magenta(),
            course.enrollments,
            course.title
        );
    }
    print_rule();
    println!(
        "  {} course{}",
        courses.len(),
        if courses.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

#[derive(Serialize)]
struct AssignmentRow {
    #[serde(flatten)]
    assignment: Assignment,
    standing: AssignmentStanding,
}

async fn cmd_assignments(
    campus: &Campus,
    filter: &AssignmentFilter,
    role: Role,
    viewer_id: &str,
    now: DateTime<Utc>,
    json: bool,
) -> Result<()> {
    let rows: Vec<AssignmentRow> = filter
        .apply(&campus.assignments.get_all().await)
        .into_iter()
        .map(|assignment| AssignmentRow {
            standing: AssignmentStanding::for_viewer(&assignment, role, viewer_id, now),
            assignment,
        })
        .collect();
    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No assignments found.");
        return Ok(());
    }

    print_rule();
    for row in &rows {
        let standing = match row.standing {
            AssignmentStanding::Submitted => row.standing.to_string().green().to_string(),
            AssignmentStanding::Overdue => row.standing.to_string().red().to_string(),
            AssignmentStanding::Pending => row.standing.to_string().yellow().to_string(),
            AssignmentStanding::Submissions(_) => row.standing.to_string().dimmed().to_string(),
        };
        println!(
            "  {:<4}  {:<12}  {}  {:<32}  {}",
            row.assignment.id.to_string().cyan(),
            row.assignment.kind.to_string().magenta(),
            fmt_date(row.assignment.due_date),
            row.assignment.title,
            standing
        );
    }
    print_rule();
    Ok(())
}

async fn cmd_users(campus: &Campus, filter: &UserFilter, json: bool) -> Result<()> {
    let users = filter.apply(&campus.users.get_all().await);
    if json {
        return print_json(&users);
    }
    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    print_rule();
    for user in &users {
        println!(
            "  {:<4}  {:<22}  {:<8}  {:<32}  {}",
            user.id.to_string().cyan(),
            user.display_name(),
            user.role.to_string().magenta(),
            user.email,
            fmt_date(user.last_active).dimmed()
        );
    }
    print_rule();
    Ok(())
}
