mod config;

use anyhow::{Context, Result, bail};
use api_client::ApiClient;
use clap::{Parser, Subcommand};
use colored::Colorize;
use config::AppConfig;
use profile_data::{Candidate, CandidateFilter, MatchRecord, Tab, UserId};
use queue::{
    ApiDecisionEffector, Collaborators, DecideOutcome, DecisionEffector, FetchOutcome,
    IgnoreReason, JsonFileStore, OfflineEffector, ProfileStore, QueueConfig, QueueController,
    QueueSnapshot, StoredMatches, TimedAnimator,
};
use sources::{DiscoverSource, FallbackSource, IncomingLikesSource, StaticSource};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

/// swipe-connect - browse and swipe candidate profiles from the terminal
#[derive(Parser)]
#[command(name = "swipe-connect")]
#[command(about = "Swipe through candidate profiles and keep your matches", long_about = None)]
struct Cli {
    /// Backend base URL (overrides API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Viewer user id (overrides VIEWER_ID); without one the queue runs offline
    #[arg(long)]
    viewer_id: Option<UserId>,

    /// Local store file (overrides STORE_PATH)
    #[arg(long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Swipe through candidates matching a filter
    Browse {
        /// Only candidates from this city
        #[arg(long)]
        city: Option<String>,

        /// Only candidates from this university
        #[arg(long)]
        university: Option<String>,

        /// Only candidates sharing at least one of these interests
        #[arg(long = "interest")]
        interests: Vec<String>,
    },

    /// Answer people who already liked you
    Incoming,

    /// List your mutual matches
    Matches,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Failed to read configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.api_base_url = api_client::normalize_base_url(base_url);
    }
    if cli.viewer_id.is_some() {
        config.viewer_id = cli.viewer_id;
    }
    if let Some(store_path) = cli.store_path {
        config.store_path = store_path;
    }

    if config.viewer_id.is_none() {
        println!(
            "{} No viewer id, running offline on placeholder profiles",
            "!".yellow()
        );
    }

    let app = App::new(&config)?;

    match cli.command {
        Commands::Browse {
            city,
            university,
            interests,
        } => {
            let filter = build_filter(city, university, interests);
            handle_browse(&app, Tab::Discover, filter).await?
        }
        Commands::Incoming => handle_browse(&app, Tab::IncomingLikes, None).await?,
        Commands::Matches => handle_matches(&app, &config).await?,
    }

    Ok(())
}

/// Wired-up controller plus the handles the commands need directly.
struct App {
    client: ApiClient,
    controller: Arc<QueueController>,
    stored_matches: StoredMatches,
}

impl App {
    fn new(config: &AppConfig) -> Result<Self> {
        let client = ApiClient::new(&config.api_base_url, config.request_timeout)
            .context("Failed to create API client")?
            .with_token(config.api_token.clone());

        let store: Arc<dyn ProfileStore> = Arc::new(JsonFileStore::new(&config.store_path));
        let stored_matches = StoredMatches::new(Arc::clone(&store));

        let effector: Arc<dyn DecisionEffector> = match config.viewer_id {
            Some(viewer_id) => Arc::new(ApiDecisionEffector::new(client.clone(), viewer_id)),
            None => Arc::new(OfflineEffector),
        };

        let collaborators = Collaborators {
            discover: Arc::new(FallbackSource::new(
                DiscoverSource::new(client.clone()),
                StaticSource::placeholder(),
            )),
            incoming_likes: Arc::new(IncomingLikesSource::new(client.clone())),
            effector,
            animator: Arc::new(TimedAnimator::new(config.like_effect, config.pass_effect)),
            matches: Arc::new(stored_matches.clone()),
            store,
        };

        let queue_config = QueueConfig::default()
            .with_submit_timeout(config.request_timeout)
            .with_transition_timeout(config.transition_timeout);

        Ok(Self {
            client,
            controller: Arc::new(QueueController::new(
                collaborators,
                config.viewer_id,
                queue_config,
            )),
            stored_matches,
        })
    }
}

/// Handle the 'browse' and 'incoming' commands
async fn handle_browse(app: &App, tab: Tab, filter: Option<CandidateFilter>) -> Result<()> {
    let controller = &app.controller;

    if tab != Tab::Discover {
        controller.switch_tab(tab);
    }
    if let Some(filter) = filter {
        controller.set_filter(filter);
    }
    report_fetch(controller.refresh().await);

    print_help();
    print_current(&controller.snapshot());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let line = line.trim();
        let (command, args) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => continue,
            "l" | "like" => report_decision(controller.like_current().await),
            "p" | "pass" => report_decision(controller.pass_current().await),
            "f" | "filter" => match parse_filter(args) {
                Ok(filter) => {
                    let refresh = controller.set_filter_and_refresh(filter);
                    report_fetch(refresh.await.context("Refresh task failed")?);
                }
                Err(e) => println!("{} {}", "✗".red(), e),
            },
            "r" | "reset" => {
                controller.reset_filters();
                report_fetch(controller.refresh().await);
            }
            "m" | "more" => report_fetch(controller.load_more().await),
            "n" | "reload" => report_fetch(controller.refresh().await),
            "d" | "discover" => {
                controller.switch_tab(Tab::Discover);
                report_fetch(controller.refresh().await);
            }
            "i" | "incoming" => {
                controller.switch_tab(Tab::IncomingLikes);
                report_fetch(controller.refresh().await);
            }
            "q" | "quit" => break,
            _ => {
                print_help();
                continue;
            }
        }
        print_current(&controller.snapshot());
    }

    Ok(())
}

/// Handle the 'matches' command
async fn handle_matches(app: &App, config: &AppConfig) -> Result<()> {
    if let Some(viewer_id) = config.viewer_id {
        match app.client.matches(viewer_id).await {
            Ok(records) => {
                print_matches(&records);
                return Ok(());
            }
            Err(e) => warn!("Backend matches unavailable, showing local list: {}", e),
        }
    }

    let local: Vec<MatchRecord> = app
        .stored_matches
        .list()?
        .into_iter()
        .map(|profile| MatchRecord {
            match_id: None,
            profile,
            matched_at: None,
        })
        .collect();
    print_matches(&local);
    Ok(())
}

fn build_filter(
    city: Option<String>,
    university: Option<String>,
    interests: Vec<String>,
) -> Option<CandidateFilter> {
    if city.is_none() && university.is_none() && interests.is_empty() {
        return None;
    }
    let mut filter = CandidateFilter::new();
    if let Some(city) = city {
        filter = filter.with_city(city);
    }
    if let Some(university) = university {
        filter = filter.with_university(university);
    }
    for interest in interests {
        filter = filter.with_interest(interest);
    }
    Some(filter)
}

/// Parse `city=Moscow uni=MSU interests=IT,Sport`. An empty string clears
/// the filter.
fn parse_filter(args: &str) -> Result<CandidateFilter> {
    let mut filter = CandidateFilter::new();
    for pair in args.split_whitespace() {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Expected key=value, got {:?}", pair);
        };
        let value = value.replace('_', " ");
        filter = match key {
            "city" => filter.with_city(value),
            "uni" | "university" => filter.with_university(value),
            "interests" | "interest" => value
                .split(',')
                .fold(filter, |filter, interest| filter.with_interest(interest.trim())),
            _ => bail!("Unknown filter {:?} (use city, uni, interests)", key),
        };
    }
    Ok(filter)
}

fn report_decision(outcome: DecideOutcome) {
    match outcome {
        DecideOutcome::Completed(decision) if decision.is_match() => {
            println!("{} It's a match!", "♥".magenta().bold())
        }
        DecideOutcome::Completed(decision) => {
            println!("{} {}", "✓".green(), decision.kind)
        }
        DecideOutcome::Stale(_) => println!("{} Queue changed before the decision settled", "!".yellow()),
        DecideOutcome::Ignored(IgnoreReason::EmptyQueue) => {
            println!("{} Nobody left to decide on", "!".yellow())
        }
        DecideOutcome::Ignored(_) => println!("{} Still busy with the last decision", "!".yellow()),
    }
}

fn report_fetch<E: std::fmt::Display>(result: std::result::Result<FetchOutcome, E>) {
    match result {
        Ok(FetchOutcome::Applied { fetched, available }) => println!(
            "{} Fetched {} profiles, {} to go",
            "✓".green(),
            fetched,
            available
        ),
        Ok(FetchOutcome::Stale) => {}
        Err(e) => println!("{} Could not load profiles: {}", "✗".red(), e),
    }
}

fn print_help() {
    println!(
        "{}",
        "Commands: l(ike) p(ass) f(ilter) city=.. uni=.. interests=a,b  r(eset) m(ore) n (reload) d(iscover) i(ncoming) q(uit)"
            .dimmed()
    );
}

fn print_current(snapshot: &QueueSnapshot) {
    let Some(candidate) = &snapshot.current else {
        println!(
            "{}",
            format!("No more profiles in {}. Try another filter or 'm' for more.", snapshot.tab)
                .bold()
                .blue()
        );
        return;
    };

    println!();
    println!(
        "{} {}",
        format!("[{}/{}]", snapshot.cursor + 1, snapshot.available_len).dimmed(),
        describe(candidate).bold()
    );
    print_candidate_details(candidate);
}

fn describe(candidate: &Candidate) -> String {
    match candidate.age {
        Some(age) => format!("{}, {}", candidate.name, age),
        None => candidate.name.clone(),
    }
}

fn print_candidate_details(candidate: &Candidate) {
    if !candidate.city.is_empty() {
        println!("{}City: {}", "• ".green(), candidate.city);
    }
    if !candidate.university.is_empty() {
        println!("{}University: {}", "• ".green(), candidate.university);
    }
    if !candidate.interests.is_empty() {
        let interests: Vec<&str> = candidate.interests.iter().map(String::as_str).collect();
        println!("{}Interests: {}", "• ".cyan(), interests.join(", "));
    }
    if !candidate.goals.is_empty() {
        let goals: Vec<&str> = candidate.goals.iter().map(String::as_str).collect();
        println!("{}Looking for: {}", "• ".cyan(), goals.join(", "));
    }
    if !candidate.bio.is_empty() {
        println!("  {}", candidate.bio.italic());
    }
}

fn print_matches(records: &[MatchRecord]) {
    print!("{}", "Matches:\n".bold().blue());
    if records.is_empty() {
        println!("  nobody yet");
        return;
    }
    for (rank, record) in records.iter().enumerate() {
        let when = record
            .matched_at
            .as_deref()
            .map(|at| format!(" (since {})", at))
            .unwrap_or_default();
        println!(
            "{}. {}{}",
            (rank + 1).to_string().green(),
            describe(&record.profile),
            when
        );
        print_candidate_details(&record.profile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        let filter = parse_filter("city=Saint_Petersburg interests=IT,Sport").unwrap();

        assert_eq!(filter.city.as_deref(), Some("Saint Petersburg"));
        assert_eq!(filter.university, None);
        assert!(filter.interests.contains("IT"));
        assert!(filter.interests.contains("Sport"));
    }

    #[test]
    fn test_parse_filter_rejects_unknown_keys() {
        assert!(parse_filter("").unwrap().is_empty());
        assert!(parse_filter("age=20").is_err());
        assert!(parse_filter("Moscow").is_err());
    }

    #[test]
    fn test_build_filter_without_flags_keeps_saved_filter() {
        assert!(build_filter(None, None, Vec::new()).is_none());
        let filter = build_filter(Some("Kazan".into()), None, vec!["IT".into()]).unwrap();
        assert_eq!(filter.city.as_deref(), Some("Kazan"));
    }
}
