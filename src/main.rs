use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{LevelFilter, error, warn};
use profscrape::{ScrapingContext, TeacherDetail, TeacherSummary};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "profscrape", about = "Look up professors on RateMyProfessors")]
struct Cli {
    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search teachers by name. Several names are looked up concurrently.
    Search {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Show one teacher by legacy id.
    Teacher { legacy_id: u64 },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialise result")?
    );
    Ok(())
}

fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "-".to_string(), |score| format!("{score:.1}"))
}

fn print_summaries(name: &str, teachers: &[TeacherSummary]) {
    println!("{name}: {} match(es)", teachers.len());
    for teacher in teachers {
        println!(
            "  [{}] {} - {} at {} (rating {} / 5.0, difficulty {} / 5.0, {} ratings)",
            teacher.id.map_or_else(|| "?".to_string(), |id| id.to_string()),
            teacher.full_name(),
            teacher.department.as_deref().unwrap_or("unknown department"),
            teacher.school_name.as_deref().unwrap_or("unknown school"),
            format_score(teacher.rating),
            format_score(teacher.difficulty),
            teacher.rating_count.unwrap_or(0),
        );
    }
}

fn print_detail(ctx: &ScrapingContext, teacher: &TeacherDetail) {
    let summary = &teacher.summary;
    println!("{}", summary.full_name());
    match &teacher.school {
        Some(school) => println!(
            "  teaches {} at {}",
            summary.department.as_deref().unwrap_or("unknown department"),
            school.location()
        ),
        None => println!(
            "  teaches {}",
            summary.department.as_deref().unwrap_or("unknown department")
        ),
    }
    println!("  rating:     {} / 5.0", format_score(summary.rating));
    println!("  ratings:    {}", summary.rating_count.unwrap_or(0));
    println!("  difficulty: {} / 5.0", format_score(summary.difficulty));

    if !teacher.courses.is_empty() {
        let courses: Vec<_> = teacher
            .courses
            .iter()
            .filter_map(|course| course.course_name.as_deref())
            .collect();
        println!("  courses:    {}", courses.join(", "));
    }

    if let Some(distribution) = teacher.ratings_distribution.as_ref().filter(|d| d.has_ratings()) {
        for (label, count) in distribution.labeled() {
            println!("  {label:>8}: {count} ratings");
        }
    }

    for rating in &teacher.ratings {
        println!(
            "  - {} ({}): {}",
            rating.class.as_deref().unwrap_or("?"),
            rating.date.as_deref().unwrap_or("?"),
            rating.comment.as_deref().unwrap_or("")
        );
    }

    if let Some(legacy_id) = summary.id {
        println!("  profile: {}", ctx.teacher_url(legacy_id));
    }
    if let Some(school_id) = teacher.school.as_ref().and_then(|school| school.legacy_id) {
        println!("  school:  {}", ctx.school_url(school_id));
    }
}

async fn run_search(ctx: &ScrapingContext, names: Vec<String>, json: bool) -> anyhow::Result<bool> {
    let mut all_found = true;
    let mut lookups: FuturesUnordered<_> = names
        .into_iter()
        .map(|name| async move {
            let result = ctx.search_teachers(&name).await;
            (name, result)
        })
        .collect();

    while let Some((name, result)) = lookups.next().await {
        match result {
            Ok(Some(teachers)) if !teachers.is_empty() => {
                if json {
                    print_json(&teachers)?;
                } else {
                    print_summaries(&name, &teachers);
                }
            }
            Ok(_) => {
                all_found = false;
                println!("{name}: Failed to retrieve the list of teachers.");
            }
            Err(e) => {
                all_found = false;
                error!("search for {name:?} failed: {e}");
                println!("{name}: Failed to retrieve the list of teachers.");
            }
        }
    }
    Ok(all_found)
}

async fn run_teacher(ctx: &ScrapingContext, legacy_id: u64, json: bool) -> anyhow::Result<bool> {
    match ctx.get_teacher_detail(legacy_id).await {
        Ok(Some(teacher)) => {
            if json {
                print_json(&teacher)?;
            } else {
                print_detail(ctx, &teacher);
            }
            Ok(true)
        }
        Ok(None) => {
            warn!("no teacher found for legacy id {legacy_id}");
            println!("Failed to retrieve teacher with ID `{legacy_id}`.");
            Ok(false)
        }
        Err(e) => {
            error!("lookup of teacher {legacy_id} failed: {e}");
            println!("Failed to retrieve teacher with ID `{legacy_id}`.");
            Ok(false)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before the logger, so RUST_LOG can come from .env too. Missing file is fine.
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let ctx = ScrapingContext::new()?;

    let found = match cli.command {
        Command::Search { names } => run_search(&ctx, names, cli.json).await?,
        Command::Teacher { legacy_id } => run_teacher(&ctx, legacy_id, cli.json).await?,
    };
    if !found {
        std::process::exit(1);
    }
    Ok(())
}
