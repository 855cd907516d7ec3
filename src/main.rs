use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use smartcareer::{
    AppConfig, AppState, FileStorage, Fixtures, MemoryStorage, SessionContext,
    SimulatedSubmission, handlers,
    models::{ApplicationKind, LoginRequest, ProfileUpdate, ReviewDecision, SignupRequest},
    role_switch::{SwitchOutcome, SwitchTarget},
    routes::Navigation,
};
use uuid::Uuid;

/// A terminal "browser tab" for the SmartCareer client.
///
/// localStorage is a JSON file shared by every invocation; sessionStorage
/// lives only for one invocation, so only remembered logins persist.
#[derive(Parser)]
#[command(name = "smartcareer", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with an email or username.
    Login {
        identifier: String,
        password: String,
        /// Keep the session in localStorage.
        #[arg(long)]
        remember: bool,
    },
    /// Sign out and clear stored credentials.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Open a path and report what the guard decides.
    Visit { path: String },
    /// Switch between student, mentor and career_counselor.
    Switch { role: SwitchTarget },
    /// Create a student account.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long)]
        accept_terms: bool,
    },
    /// Request a password reset link.
    ResetPassword { email: String },
    /// Edit the signed-in user's profile.
    EditProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        headline: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Comma-separated.
        #[arg(long, value_delimiter = ',')]
        skills: Option<Vec<String>>,
    },
    /// Today's career tip.
    Tip,
    /// List notifications.
    Notifications {
        #[arg(long)]
        mark_all_read: bool,
    },
    /// Mark one notification read.
    Read { id: Uuid },
    /// List conversations, or show one.
    Messages { conversation: Option<Uuid> },
    /// Send a message to a conversation.
    Send { conversation: Uuid, body: String },
    /// Browse learning roadmaps.
    Roadmaps {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Apply to become a mentor or counsellor.
    Apply { kind: ApplicationKind },
    /// Admin: list pending applications.
    Pending,
    /// Admin: approve or reject an application.
    Review {
        user_id: Uuid,
        kind: ApplicationKind,
        decision: ReviewDecision,
    },
    /// Admin: dashboard counters.
    Stats,
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    smartcareer::init_tracing(config.env);

    let fixtures = match &config.fixtures_path {
        Some(path) => Fixtures::from_path(path)
            .with_context(|| format!("loading fixtures from {}", path.display()))?,
        None => Fixtures::embedded()?,
    };
    let local = FileStorage::open(&config.storage_path)
        .with_context(|| format!("opening {}", config.storage_path.display()))?;

    let state = AppState::from_fixtures(
        fixtures,
        Arc::new(local),
        Arc::new(MemoryStorage::new()),
        Arc::new(SimulatedSubmission::new(config.submit_delay)),
        config,
    );

    // Mount: bring back a remembered session, if any.
    let mut session = SessionContext::signed_out();
    handlers::restore_session(&state, &mut session);

    match cli.command {
        Command::Login {
            identifier,
            password,
            remember,
        } => {
            let req = LoginRequest {
                identifier,
                password,
                remember_me: remember,
            };
            match handlers::login(&state, &mut session, &req) {
                Ok(success) => {
                    println!("Welcome, {}!", success.profile.name);
                    println!("-> {}", success.redirect_to.path());
                    if !remember {
                        println!("(not remembered: this session ends with this command)");
                    }
                }
                Err(smartcareer::error::AuthError::Validation(fields)) => {
                    for (field, msg) in fields {
                        println!("{field}: {msg}");
                    }
                }
                Err(e) => println!("{e}"),
            }
        }
        Command::Logout => {
            handlers::logout(&state, &mut session)?;
            println!("Signed out.");
        }
        Command::Whoami => match handlers::current_profile(&session) {
            Ok(profile) => print_json(&profile)?,
            Err(e) => {
                println!("{e}");
                if let Some(email) = handlers::remembered_email(&state) {
                    println!("Remembered email: {email}");
                }
            }
        },
        Command::Visit { path } => match handlers::navigate(&session, &path) {
            Navigation::Render(route) => println!("render {}", route.path()),
            Navigation::Redirect { from, to } => {
                println!("redirect {} -> {}", from.path(), to.path())
            }
            Navigation::NotFound(path) => println!("404 {path}"),
        },
        Command::Switch { role } => {
            let outcome = handlers::switch_role(&state, &mut session, role);
            println!("{}", outcome.message());
            if let SwitchOutcome::Switched(switch) = outcome
                && let Some(route) = switch.navigate_to
            {
                println!("-> {}", route.path());
            }
        }
        Command::Signup {
            name,
            username,
            email,
            password,
            confirm_password,
            accept_terms,
        } => {
            let req = SignupRequest {
                name,
                username,
                email,
                password,
                confirm_password,
                accepted_terms: accept_terms,
            };
            match handlers::signup(&state, &req).await {
                Ok(profile) => print_json(&profile)?,
                Err(smartcareer::error::AuthError::Validation(fields)) => {
                    for (field, msg) in fields {
                        println!("{field}: {msg}");
                    }
                }
                Err(e) => println!("{e}"),
            }
        }
        Command::ResetPassword { email } => {
            match handlers::request_password_reset(&state, &email).await {
                Ok(sent) => println!("{}", sent.message),
                Err(e) => println!("{e}"),
            }
        }
        Command::EditProfile {
            name,
            headline,
            bio,
            location,
            skills,
        } => {
            let update = ProfileUpdate {
                name,
                headline,
                bio,
                location,
                skills,
            };
            match handlers::update_profile(&state, &mut session, &update).await {
                Ok(profile) => print_json(&profile)?,
                Err(smartcareer::error::ProfileError::Validation(fields)) => {
                    for (field, msg) in fields {
                        println!("{field}: {msg}");
                    }
                }
                Err(e) => println!("{e}"),
            }
        }
        Command::Tip => match handlers::career_tip_of_the_day(&state, Local::now().date_naive())? {
            Some(today) if today.first_view_today => {
                println!("Career tip of the day ({}): {}", today.tip.category, today.tip.text)
            }
            Some(today) => println!("{}", today.tip.text),
            None => println!("No tips available."),
        },
        Command::Notifications { mark_all_read } => {
            if mark_all_read {
                let changed = handlers::mark_all_notifications_read(&state, &session)?;
                println!("Marked {changed} notification(s) read.");
            }
            print_json(&handlers::get_notifications(&state, &session)?)?;
        }
        Command::Read { id } => {
            if handlers::mark_notification_read(&state, &session, id)? {
                println!("Marked read.");
            } else {
                println!("Notification not found.");
            }
        }
        Command::Messages { conversation } => match conversation {
            Some(id) => print_json(&handlers::get_conversation(&state, &session, id)?)?,
            None => print_json(&handlers::list_conversations(&state, &session)?)?,
        },
        Command::Send { conversation, body } => {
            let message = handlers::send_message(&state, &session, conversation, &body)?;
            print_json(&message)?;
        }
        Command::Roadmaps { category, search } => {
            let list =
                handlers::list_roadmaps(&state, category.as_deref(), search.as_deref());
            print_json(&list)?;
        }
        Command::Apply { kind } => {
            let profile = handlers::apply_for_role(&state, &mut session, kind).await?;
            print_json(&profile)?;
        }
        Command::Pending => print_json(&handlers::pending_applications(&state, &session)?)?,
        Command::Review {
            user_id,
            kind,
            decision,
        } => {
            let profile =
                handlers::review_application(&state, &session, user_id, kind, decision)?;
            print_json(&profile)?;
        }
        Command::Stats => print_json(&handlers::get_admin_stats(&state, &session)?)?,
    }

    Ok(())
}
