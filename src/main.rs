mod api;
mod cli_messages;
mod config;
mod consts;
mod dashboard;
mod environment;
mod error_classifier;
mod events;
mod ids;
mod logging;
mod model;
mod polling;
mod runtime;
mod session;
mod workers;

use crate::config::{Config, get_config_path};
use crate::consts::cli_consts::polling as polling_consts;
use crate::dashboard::DashboardAggregator;
use crate::environment::Environment;
use crate::ids::ResourceId;
use crate::model::{InvestorFilter, MentorFilter};
use crate::polling::PollState;
use crate::session::{connect, drain_events, run_watch_mode, setup_session};
use clap::{Parser, Subcommand};
use std::error::Error;
use tokio::time::Instant;

#[derive(Parser)]
#[command(author, version, about = "Venture marketplace dashboard", long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load and print the dashboard once
    Dashboard,
    /// Keep the dashboard refreshed and poll for unread messages
    Watch,
    /// List investors in the marketplace directory
    Investors {
        /// Free-text search on name or firm
        #[arg(long)]
        search: Option<String>,
        /// Only investors active at this stage (e.g. SEED)
        #[arg(long)]
        stage: Option<String>,
    },
    /// List mentors
    Mentors {
        /// Free-text search on name or expertise
        #[arg(long)]
        search: Option<String>,
    },
    /// Share the current pitch deck with an investor
    Share {
        /// Investor ID
        #[arg(long, value_name = "INVESTOR_ID")]
        investor: String,
    },
    /// Accept an investor's commitment
    Accept {
        /// Product the commitment was made on
        #[arg(long, value_name = "PRODUCT_ID")]
        product: String,
        #[arg(long, value_name = "COMMITMENT_ID")]
        commitment: String,
    },
    /// Ask an investor to revise a commitment
    Renegotiate {
        #[arg(long, value_name = "PRODUCT_ID")]
        product: String,
        #[arg(long, value_name = "COMMITMENT_ID")]
        commitment: String,
        /// Message sent to the investor
        #[arg(long)]
        message: String,
    },
    /// Save an API token to the config file
    Login {
        #[arg(long, value_name = "TOKEN")]
        token: String,
    },
    /// Clear the saved configuration and logout
    Logout,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init_max_level();

    let args = Args::parse();
    let config_path = get_config_path()?;

    match args.command {
        Command::Login { token } => {
            let token = token.trim();
            if token.is_empty() {
                print_cmd_error!("Login failed", "The token must not be empty");
                return Err(Box::from("empty token"));
            }
            let mut config = Config::load_or_default(&config_path)?;
            config.api_token = Some(token.to_string());
            config.save(&config_path)?;
            print_cmd_success!("Logged in", "Token saved to {}", config_path.display());
            Ok(())
        }
        Command::Logout => {
            print_cmd_info!("Logging out", "Clearing {}", config_path.display());
            Config::clear(&config_path).map_err(Into::into)
        }
        command => {
            // Validate user input before anything touches the network
            if let Command::Share { investor } = &command {
                if let Err(e) = ResourceId::parse("investor_id", investor) {
                    print_cmd_error!("Invalid investor ID", e.to_string().as_str());
                    return Err(e.into());
                }
            }

            let config = Config::load_or_default(&config_path)?;
            let environment = Environment::from_env(config.environment.as_deref());
            if matches!(command, Command::Watch) {
                let session = setup_session(&config, config_path, environment)?;
                return run_watch_mode(session).await;
            }

            let (aggregator, mut receiver, _events) = connect(&config, &environment)?;
            let result = run_command(&aggregator, command).await;
            drain_events(&mut receiver);
            if let Err(e) = &result {
                print_cmd_error!("Command failed", e.to_string().as_str());
            }
            result
        }
    }
}

/// One-shot commands that talk to the marketplace API.
async fn run_command(
    aggregator: &DashboardAggregator,
    command: Command,
) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Dashboard => {
            let mut poll_state = PollState::new(
                Instant::now(),
                polling_consts::unread_interval(),
                polling_consts::rate_limit_cooldown(),
            );
            let (_, unread) = tokio::join!(
                aggregator.refresh(),
                aggregator.poll_unread_count(&mut poll_state)
            );
            log::debug!("unread messages: {}", unread);
            println!("{}", dashboard::render_dashboard(&aggregator.view().await));
        }
        Command::Investors { search, stage } => {
            let section = aggregator.load_investors(&InvestorFilter { search, stage }).await;
            match section.notice() {
                Some(notice) if section.is_pending_approval() => {
                    print_cmd_info!("Awaiting approval", "{}", notice)
                }
                Some(notice) => print_cmd_warn!("Investors unavailable", "{}", notice),
                None => {
                    for investor in section.items() {
                        println!("{}  {}  {}", investor.id, investor, investor.stages.join(","));
                    }
                }
            }
        }
        Command::Mentors { search } => {
            let section = aggregator.load_mentors(&MentorFilter { search }).await;
            match section.notice() {
                Some(notice) => print_cmd_warn!("Mentors unavailable", "{}", notice),
                None => {
                    for mentor in section.items() {
                        println!("{}  {}  {}", mentor.id, mentor.name, mentor.expertise.join(", "));
                    }
                }
            }
        }
        Command::Share { investor } => {
            // The pitch deck to share is resolved by a refresh
            aggregator.refresh().await;
            let share = aggregator.share_pitch_deck(&investor).await?;
            print_cmd_success!(
                "Pitch deck shared",
                "with {} at {}",
                share.investor_id,
                share.shared_at.format("%Y-%m-%d %H:%M")
            );
        }
        Command::Accept {
            product,
            commitment,
        } => {
            let commitment = aggregator.accept_commitment(&product, &commitment).await?;
            print_cmd_success!(
                "Commitment accepted",
                "{} ({:.2})",
                commitment.id,
                commitment.amount
            );
        }
        Command::Renegotiate {
            product,
            commitment,
            message,
        } => {
            let commitment = aggregator
                .renegotiate_commitment(&product, &commitment, &message)
                .await?;
            print_cmd_success!(
                "Renegotiation requested",
                "{} is now {}",
                commitment.id,
                commitment.venture_response
            );
        }
        Command::Watch | Command::Login { .. } | Command::Logout => {}
    }
    Ok(())
}
