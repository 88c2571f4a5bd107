use anyhow::{anyhow, Context};
use chirper_tool::social_client::SocialClient;
use chirper_tool::store::Session;
use chirper_tool::token_store::FileTokenStore;
use chirper_tool::ui::bottom_bar::BottomBar;
use chirper_tool::ui::feed_pane::{feed_line, FeedPane};
use chirper_tool::ui::forms::{ComposeForm, LoginForm, SignupForm};
use chirper_tool::ui::messages::{login_error_message, signup_error_message};
use chirper_tool::ui::tweet_pane::TweetPane;
use chirper_tool::ui::user_pane::{UserListPane, UserPane};
use chirper_tool::ui_framework::line_buffer::LineBuffer;
use chirper_tool::ui_framework::Render;
use chirper_tool::user_config::{UserConfig, ENV_API_BASE_URL, ENV_TOKEN_PATH};
use clap::{Parser, Subcommand};
use crossterm::terminal;
use dotenvy::dotenv;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

const FALLBACK_WIDTH: usize = 80;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base url of the chirper API
    #[arg(long, env = ENV_API_BASE_URL, global = true)]
    api: Option<String>,

    /// Where the session token is kept between runs
    #[arg(long, env = ENV_TOKEN_PATH, global = true)]
    token_path: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in; prompts for the password if not given
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: Option<String>,
    },
    Logout,
    Whoami,
    /// List tweets, newest first
    Feed {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long)]
        per_page: Option<u64>,
        #[arg(long)]
        search: Option<String>,
        /// Show tweet ids
        #[arg(long)]
        ids: bool,
    },
    /// Show a tweet with its comments
    Tweet { id: String },
    Post { content: String },
    Comment { tweet_id: String, content: String },
    DeleteTweet { id: String },
    DeleteComment { id: String },
    /// Show a user and their tweets
    User { id: String },
    Users {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
}

fn prompt(label: &str) -> anyhow::Result<String> {
    let mut out = stdout();
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    stdin().read_line(&mut line).context("could not read from stdin")?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let config = UserConfig::from_env().with_overrides(args.api, args.token_path);
    tracing::debug!(?config, "loaded config");

    let tokens = Arc::new(FileTokenStore::new(config.token_path.clone()));
    let client = SocialClient::with_hyper(&config.api_base_url, tokens)
        .with_context(|| format!("bad api base url: {}", config.api_base_url))?;
    let session = Session::new(client.clone());
    session.initialize().await;

    let width = terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(FALLBACK_WIDTH);
    let mut out = stdout();

    match args.command {
        Command::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password: ")?,
            };
            let credentials = LoginForm { email, password }.validate()?;
            session.login(&credentials).await.map_err(|err| {
                tracing::debug!("login failed: {err}");
                anyhow!(login_error_message(&err))
            })?;
            BottomBar::new(&session.state()).render(width).render(&mut out)?;
        }
        Command::Signup {
            email,
            username,
            password,
        } => {
            let (password, confirm_password) = match password {
                Some(password) => (password.clone(), password),
                None => (prompt("Password: ")?, prompt("Confirm password: ")?),
            };
            let signup = SignupForm {
                email,
                username,
                password,
                confirm_password,
            }
            .validate()?;
            session.signup(&signup).await.map_err(|err| {
                tracing::debug!("signup failed: {err}");
                anyhow!(signup_error_message(&err))
            })?;
            BottomBar::new(&session.state()).render(width).render(&mut out)?;
        }
        Command::Logout => {
            session.logout()?;
            BottomBar::new(&session.state()).render(width).render(&mut out)?;
        }
        Command::Whoami => {
            BottomBar::new(&session.state()).render(width).render(&mut out)?;
        }
        Command::Feed {
            page,
            per_page,
            search,
            ids,
        } => {
            let mut pane = FeedPane::new(&client).with_ids(ids);
            if let Some(per_page) = per_page {
                pane = pane.with_per_page(per_page);
            }
            if let Some(term) = &search {
                pane = pane.with_search(term);
            }
            pane.set_viewer(session.current_user().as_ref());
            pane.load_page(page).await?;
            pane.render(width).render(&mut out)?;
        }
        Command::Tweet { id } => {
            TweetPane::load(&client, &id)
                .await?
                .render(width)
                .render(&mut out)?;
        }
        Command::Post { content } => {
            let mut pane = FeedPane::new(&client);
            let tweet = pane.publish(&session, &ComposeForm::new(&content)).await?;

            let mut buffer = LineBuffer::new();
            buffer.push(feed_line(tweet, width, true));
            buffer.render(&mut out)?;
        }
        Command::Comment { tweet_id, content } => {
            let mut pane = TweetPane::load(&client, &tweet_id).await?;
            pane.comment(&session, &ComposeForm::new(&content)).await?;
            pane.render(width).render(&mut out)?;
        }
        Command::DeleteTweet { id } => {
            let deleted = client.delete_tweet(&id).await?;
            writeln!(out, "deleted tweet {}", deleted.id)?;
        }
        Command::DeleteComment { id } => {
            let deleted = client.delete_comment(&id).await?;
            writeln!(out, "deleted comment {}", deleted.id)?;
        }
        Command::User { id } => {
            UserPane::load(&client, &id)
                .await?
                .render(width)
                .render(&mut out)?;
        }
        Command::Users { search, page } => {
            UserListPane::search(&client, search.as_deref(), page)
                .await?
                .render(width)
                .render(&mut out)?;
        }
    }

    Ok(())
}
