use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rai_advising::{
    admin::{self, export, AdminPanel},
    auth,
    config::Config,
    models::internal::ConversationId,
    orchestrator::ChatOrchestrator,
    render,
    services::{MockResponder, Mode, ResponseGenerator, Variant, VariantProfile},
    storage::{self, ConversationStore, FileStorage},
};

#[derive(Parser)]
#[command(name = "rai", version, about = "R-AI competency evaluation chat")]
struct Cli {
    /// Chat variant, overrides the configured one
    #[arg(long, global = true, value_enum)]
    variant: Option<Variant>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Chat(ChatCommand),
    /// Faculty panel
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Subcommand)]
enum ChatCommand {
    /// Interactive chat session
    Chat,
    /// Send a single message and print the reply
    Send {
        /// Request a competency evaluation instead of a plain reply
        #[arg(long)]
        eval: bool,
        text: String,
    },
    /// List saved conversations
    History,
    /// Delete one conversation from the history
    Delete { id: String },
    /// Delete the whole history
    Clear,
    /// Forget the signed-in user and the history
    Logout,
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Usage statistics
    Stats,
    /// Evaluation analytics
    Analytics,
    /// Preview records for a date range
    Preview(RangeArgs),
    /// Export records for a date range as CSV
    Export {
        #[command(flatten)]
        range: RangeArgs,
        /// Output directory, defaults to the configured export_dir
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Discard the faculty token
    Logout,
}

#[derive(clap::Args)]
struct RangeArgs {
    /// Start of the range (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_instant)]
    start: Option<DateTime<Utc>>,
    /// End of the range (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_instant)]
    end: Option<DateTime<Utc>>,
    /// Use evaluation exchanges from the local history instead of mock records
    #[arg(long)]
    from_history: bool,
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("invalid date: {}", raw))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Load config
    let mut config = Config::load()?;
    if let Some(variant) = cli.variant {
        config.variant = variant;
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_directive().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let profile = config.variant.profile();
    tracing::info!("Starting R-AI ({})", profile.variant);

    match cli.command {
        Command::Admin { command } => run_admin(&config, &profile, command).await,
        Command::Chat(command) => {
            let mut orchestrator = build_orchestrator(&config, profile)?;
            run_chat_command(&mut orchestrator, command).await
        }
    }
}

fn build_orchestrator(
    config: &Config,
    profile: VariantProfile,
) -> anyhow::Result<ChatOrchestrator> {
    let mut storage = FileStorage::open(&config.data_dir)
        .with_context(|| format!("opening {}", config.data_dir.display()))?;
    let label = auth::header_label(&mut storage, &profile)?;

    let store =
        ConversationStore::open(Box::new(storage), profile.storage_key, profile.id_prefix);
    let generator = match config.seed {
        Some(seed) => ResponseGenerator::seeded(profile, seed),
        None => ResponseGenerator::from_entropy(profile),
    };
    let responder = Arc::new(MockResponder::new(generator, config.mock_delay()));

    Ok(
        ChatOrchestrator::new(store, responder, profile, config.max_message_length)
            .with_user_label(label),
    )
}

async fn run_chat_command(
    orchestrator: &mut ChatOrchestrator,
    command: ChatCommand,
) -> anyhow::Result<()> {
    match command {
        ChatCommand::Chat => repl(orchestrator).await?,
        ChatCommand::Send { eval, text } => {
            let mode = if eval { Mode::Evaluation } else { Mode::Plain };
            let outcome = orchestrator.send(&text, mode).await?;
            println!("{}", outcome.reply);
        }
        ChatCommand::History => print_history(orchestrator),
        ChatCommand::Delete { id } => {
            if !orchestrator.delete(&ConversationId::new(id.clone()))? {
                println!("not found: {}", id);
            }
        }
        ChatCommand::Clear => orchestrator.clear_all()?,
        ChatCommand::Logout => orchestrator.logout()?,
    }
    Ok(())
}

fn print_history(orchestrator: &ChatOrchestrator) {
    let index = orchestrator.store().index();
    if index.is_empty() {
        println!("{}", render::EMPTY_HISTORY);
    }
    for conv in index.iter() {
        println!(
            "{}  {}{}  {}",
            conv.id,
            if conv.has_evaluation { "[評価] " } else { "" },
            conv.title,
            conv.updated_at
                .with_timezone(&chrono::Local)
                .format("%Y/%-m/%-d %H:%M")
        );
    }
}

fn show(orchestrator: &ChatOrchestrator) {
    let view = render::project(
        orchestrator.state(),
        orchestrator.store().index(),
        orchestrator.store().current(),
        orchestrator.profile(),
        "",
    );
    print!("{}", view);
}

async fn repl(orchestrator: &mut ChatOrchestrator) -> anyhow::Result<()> {
    show(orchestrator);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        let result = match command {
            "/quit" => break,
            "/new" => {
                orchestrator.new_chat();
                Ok(())
            }
            "/open" => orchestrator.open(&ConversationId::from(arg)).map(|_| ()),
            "/delete" => orchestrator.delete(&ConversationId::from(arg)).map(|_| ()),
            "/clear" => orchestrator.clear_all(),
            "/history" => {
                print_history(orchestrator);
                continue;
            }
            "/eval" => send_line(orchestrator, arg, Mode::Evaluation).await,
            _ => send_line(orchestrator, line, Mode::Plain).await,
        };

        match result {
            Ok(()) => show(orchestrator),
            Err(e) => eprintln!("{}", e),
        }
    }
    Ok(())
}

async fn send_line(
    orchestrator: &mut ChatOrchestrator,
    text: &str,
    mode: Mode,
) -> Result<(), rai_advising::ChatError> {
    let pending = orchestrator.begin_send(text, mode)?;
    show(orchestrator);
    let result = pending.reply().await;
    let outcome = orchestrator.complete_send(pending, result)?;
    if outcome.failed {
        tracing::warn!("Reply for {} is the failure message", outcome.conversation_id);
    }
    Ok(())
}

async fn run_admin(
    config: &Config,
    profile: &VariantProfile,
    command: AdminCommand,
) -> anyhow::Result<()> {
    let mut storage = FileStorage::open(&config.data_dir)?;
    if let AdminCommand::Logout = command {
        auth::logout_faculty(&mut storage)?;
        return Ok(());
    }
    let faculty = auth::resolve_faculty(&mut storage)?;
    let panel = AdminPanel::new(faculty, config.mock_delay());
    println!("{}", panel.user().display_name());

    match command {
        AdminCommand::Stats => {
            let stats = panel.usage_statistics().await;
            println!("総メッセージ数: {}", stats.total_messages);
            println!("コンピテンシー評価数: {}", stats.competency_evaluations);
            println!("アクティブユーザー数: {}", stats.active_users);
            let updated = stats.updated_at.with_timezone(&chrono::Local);
            println!("最終更新: {}", updated.format("%Y/%-m/%-d %H:%M:%S"));
        }
        AdminCommand::Analytics => {
            let analytics = panel.analytics().await;
            println!("平均評価時間: {}", analytics.avg_evaluation_time);
            println!("最多コンピテンシー: {}", analytics.top_competency);
            println!("平均メッセージ長: {}", analytics.avg_message_length);
        }
        AdminCommand::Preview(range) => {
            let records = collect_records(&panel, &storage, profile, &range).await?;
            for row in admin::preview(&records) {
                println!(
                    "{}  {}  {}\n  入力: {}\n  評価: {}",
                    row.timestamp,
                    row.subject_id,
                    row.conversation_id,
                    row.input_excerpt,
                    row.output_excerpt
                );
            }
            println!("{}件", records.len());
        }
        AdminCommand::Export { range, out } => {
            let records = collect_records(&panel, &storage, profile, &range).await?;
            let dir = out.unwrap_or_else(|| config.export_dir.clone());
            let path = export::write_csv(&dir, &records, chrono::Local::now().date_naive())?;
            println!("{}", path.display());
        }
        AdminCommand::Logout => {}
    }
    Ok(())
}

async fn collect_records(
    panel: &AdminPanel,
    storage: &FileStorage,
    profile: &VariantProfile,
    range: &RangeArgs,
) -> anyhow::Result<Vec<admin::dto::ExportRecord>> {
    let (start, end) = match (range.start, range.end) {
        (None, None) => {
            let default = admin::default_range(Utc::now());
            (Some(default.start), Some(default.end))
        }
        given => given,
    };

    if range.from_history {
        admin::validate_range(start, end)?;
        let index = storage::load_index(storage, profile.storage_key);
        let subject = subject_id(storage);
        let records = admin::records_from_history(&index, &subject);
        tracing::info!("{} evaluation exchanges in local history", records.len());
        return Ok(records);
    }
    Ok(panel.fetch_records(start, end).await?)
}

/// Stored student id, or the mock one when nobody is signed in.
fn subject_id(storage: &FileStorage) -> String {
    use rai_advising::storage::LocalStorage;
    storage
        .get_item(auth::USER_KEY)
        .ok()
        .flatten()
        .and_then(|raw| serde_json::from_str::<auth::Identity>(&raw).ok())
        .map(|identity| identity.id)
        .unwrap_or_else(|| auth::Identity::mock_student().id)
}
