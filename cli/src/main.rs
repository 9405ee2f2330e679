mod api;
mod cart;
mod chat;

use clap::{Parser, Subcommand};
use protocol::{
    CheckUsernameRequest, CheckUsernameResponse, LoginRequest, LoginResponse, MenuItem, MessageBody, RegisterRequest,
    UserProfile,
};
use serde::Serialize;

use api::ApiClient;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("missing token; run `login` and pass --token or set MENUCHAT_TOKEN")]
    MissingToken,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{message} (HTTP {status})")]
    Server { status: u16, message: String },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "menuchat-cli", about = "Menu ordering and consultation client")]
struct Cli {
    #[arg(long, env = "MENUCHAT_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "MENUCHAT_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server is up.
    Ping,
    Register {
        username: String,
        email: String,
        #[arg(long, env = "MENUCHAT_PASSWORD")]
        password: String,
    },
    /// Log in and print a bearer token.
    Login {
        username: String,
        #[arg(long, env = "MENUCHAT_PASSWORD")]
        password: String,
    },
    CheckUsername {
        username: String,
    },
    /// Show the logged-in profile.
    Me,
    Menu,
    /// Clear server-side chat history.
    Logout,
    /// Interactive consultation with a local cart.
    Chat,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut client = ApiClient::new(&cli.base_url, None);

    match cli.command {
        Command::Ping => {
            client.health().await?;
            println!("ok");
        }
        Command::Register { username, email, password } => {
            let body: MessageBody = client.post("/register", &RegisterRequest { username, email, password }).await?;
            println!("{}", body.message);
        }
        Command::Login { username, password } => {
            let body: LoginResponse = client.post("/login", &LoginRequest { username, password }).await?;
            eprintln!("logged in as {} ({})", body.user.username, body.user.id);
            println!("{}", body.token);
        }
        Command::CheckUsername { username } => {
            let body: CheckUsernameResponse = client.post("/check-username", &CheckUsernameRequest { username }).await?;
            println!("{}", if body.available { "available" } else { "taken" });
        }
        Command::Me => {
            client.set_token(Some(require_token(cli.token)?));
            let profile: UserProfile = client.get("/dashboard").await?;
            print_json(&profile)?;
        }
        Command::Menu => {
            client.set_token(Some(require_token(cli.token)?));
            let menu: Vec<MenuItem> = client.get("/menu").await?;
            print!("{}", chat::render_menu(&menu));
        }
        Command::Logout => {
            client.set_token(Some(require_token(cli.token)?));
            let body: MessageBody = client.post_empty("/logout").await?;
            println!("{}", body.message);
        }
        Command::Chat => {
            client.set_token(Some(require_token(cli.token)?));
            chat::run(&client).await?;
        }
    }
    Ok(())
}

fn require_token(token: Option<String>) -> Result<String, CliError> {
    token.filter(|t| !t.trim().is_empty()).ok_or(CliError::MissingToken)
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
