mod main_lib;
mod questionnaire;
mod render;

use std::ffi::OsString;
use std::path::Path;

use clap::{Parser, Subcommand};
use plan1q_connect::ClientConfig;
use plan1q_core::errors::ErrorKind;
use plan1q_core::goals::{GoalDraft, GoalId};
use plan1q_core::subscription::PaymentDay;

use main_lib::{build_services, init_tracing, Services};
use questionnaire::prompt_line;

#[derive(Parser)]
#[command(name = "plan1q", version, about = "Plan1Q - goal planning for couples")]
struct Cli {
    /// API base URL (overrides PLAN1Q_API_URL)
    #[arg(long, env = "PLAN1Q_API_URL")]
    api_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the investment profile, running the questionnaire if needed
    Profile,
    /// Get a product recommendation for a new goal
    Plan {
        /// Goal title (e.g. "신혼집")
        #[arg(long)]
        title: String,
        /// Target amount in KRW
        #[arg(long)]
        amount: i64,
        /// Target period in months
        #[arg(long)]
        period: i32,
        /// Free-form description
        #[arg(long, default_value = "")]
        detail: String,
        /// Create the goal from the recommendation
        #[arg(long)]
        commit: bool,
    },
    /// List goals
    Goals,
    /// Show one goal with payment tracking
    Goal { goal_id: i64 },
    /// Subscribe one product of a goal, funded from the shared account
    Subscribe {
        goal_id: i64,
        product_id: i64,
        /// Payment day of the month (1, 5, 10, 15, 20 or 25)
        #[arg(long)]
        day: PaymentDay,
        /// 6-digit PIN; prompted for when omitted
        #[arg(long)]
        pin: Option<String>,
    },
    /// Delete a goal
    DeleteGoal { goal_id: i64 },
}

/// Loads `.env` (or `env_file`) before parsing so `env` bindings see its
/// values.
fn parse_args<I, T>(env_file: Option<&Path>, args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match env_file {
        Some(path) => {
            dotenvy::from_path(path).ok();
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }
    Cli::try_parse_from(args)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = parse_args(None, std::env::args_os()).unwrap_or_else(|e| e.exit());
    init_tracing();

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = cli.api_url.as_deref() {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }
    let services = build_services(&config)?;

    let result = run(&services, cli.command, cli.json).await;
    if let Err(err) = &result {
        match err.downcast_ref::<plan1q_core::Error>() {
            Some(core_err) => match core_err.notice() {
                Some(notice) => render::print_notice(&notice),
                None => eprintln!("[{}] {}", ErrorKind::Validation, core_err),
            },
            None => eprintln!("{:#}", err),
        }
        std::process::exit(1);
    }
    Ok(())
}

async fn run(services: &Services, command: Commands, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Profile => {
            let profile = services.profile_gate.ensure_profile().await?;
            if json {
                render::print_json(&profile)?;
            } else {
                render::print_profile(&profile);
            }
        }
        Commands::Plan {
            title,
            amount,
            period,
            detail,
            commit,
        } => {
            let snapshot = services
                .wizard
                .request_recommendation(GoalDraft::new(title, detail, amount, period))
                .await?;
            if json {
                render::print_json(&snapshot)?;
            } else {
                render::print_snapshot(&snapshot);
            }

            if commit {
                let goal_id = services.wizard.commit().await?;
                println!("목표가 생성되었습니다: #{}", goal_id);
            }
        }
        Commands::Goals => {
            let goals = services.aggregator.list_goals().await?;
            if json {
                render::print_json(&goals)?;
            } else {
                render::print_goal_list(&goals);
            }
        }
        Commands::Goal { goal_id } => {
            let view = services.aggregator.load_goal(GoalId(goal_id)).await?;
            if json {
                render::print_json(view.as_ref())?;
            } else {
                render::print_goal_view(&view);
            }
        }
        Commands::Subscribe {
            goal_id,
            product_id,
            day,
            pin,
        } => subscribe(services, GoalId(goal_id), product_id, day, pin, json).await?,
        Commands::DeleteGoal { goal_id } => {
            services.aggregator.delete_goal(GoalId(goal_id)).await?;
            println!("목표 #{}가 삭제되었습니다.", goal_id);
        }
    }
    Ok(())
}

async fn subscribe(
    services: &Services,
    goal_id: GoalId,
    product_id: i64,
    day: PaymentDay,
    pin: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let orchestrator = &services.orchestrator;
    let view = services.aggregator.load_goal(goal_id).await?;
    let mut flow = orchestrator.start(&view, product_id)?;

    let funding = orchestrator.resolve_funding(&mut flow).await?;
    println!(
        "출금 계좌: {} {} (잔액 {})",
        funding.bank_name,
        funding.account_number,
        render::won(funding.balance)
    );
    orchestrator.choose_payment_day(&mut flow, day)?;
    println!(
        "{} · {}개월 · 월 {}",
        day,
        flow.period_months(),
        render::won(flow.monthly_amount())
    );

    let pin = match pin {
        Some(pin) => pin,
        None => prompt_line("비밀번호 6자리: ").await?,
    };
    let receipt = orchestrator.submit(&mut flow, &pin).await?;
    tracing::info!(
        "Subscribed product {} of goal {} ({})",
        product_id,
        goal_id,
        receipt.subscription_id
    );

    match services.aggregator.store().current() {
        Some(view) if json => render::print_json(view.as_ref())?,
        Some(view) => render::print_goal_view(&view),
        None => println!("가입이 완료되었습니다. 계좌번호: {}", receipt.account_number),
    }
    Ok(())
}
