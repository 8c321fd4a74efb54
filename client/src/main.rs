//! # market-cli
//!
//! Command-line front end for the marketplace client.
//!
//! ```text
//! market-cli whoami
//! market-cli login <username> <password>
//! market-cli logout
//! market-cli requests [keyword]
//! market-cli ping
//! ```

use lib_utils::{format_price, format_time, now_utc, truncate_text};
use market_client::app::MarketApp;
use market_client::config::init_config;
use market_client::logging::{self, LogConfig};
use market_client::services::http::DEFAULT_CONNECTIVITY_PROBE;
use market_client::store::init_session;
use market_client::utils::validation::validate_login;
use market_client::Result;
use shared::{LoginRequest, RequestItem, RequestQuery};
use std::process::ExitCode;

const USAGE: &str = "usage: market-cli <whoami | login <username> <password> | logout | requests [keyword] | ping>";

/// Parsed command line.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Whoami,
    Login { username: &'a str, password: &'a str },
    Logout,
    Requests { keyword: Option<&'a str> },
    Ping,
}

fn parse_command(args: &[String]) -> Option<Command<'_>> {
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["whoami"] => Some(Command::Whoami),
        ["login", username, password] => Some(Command::Login {
            username: *username,
            password: *password,
        }),
        ["logout"] => Some(Command::Logout),
        ["requests"] => Some(Command::Requests { keyword: None }),
        ["requests", keyword] => Some(Command::Requests { keyword: Some(*keyword) }),
        ["ping"] => Some(Command::Ping),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let log_guard = match logging::init(&LogConfig::from_env()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: {}", e.user_message());
            None
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = match parse_command(&args) {
        Some(command) => match run(command).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "Command failed");
                eprintln!("{}", e.user_message());
                ExitCode::FAILURE
            }
        },
        None => {
            eprintln!("{}", USAGE);
            ExitCode::from(2)
        }
    };

    // Flush buffered log lines before the process exits.
    drop(log_guard);
    code
}

async fn run(command: Command<'_>) -> Result<()> {
    let config = init_config()?;
    let app = MarketApp::from_config(config)?;
    let session = init_session(app.session.clone())?;

    match command {
        Command::Whoami => match session.initialize_user().await? {
            Some(user) => {
                let role = if user.is_admin() { "管理员" } else { "用户" };
                println!("{} ({}) [{}]", user.username, user.nickname, role);
            }
            None => println!("未登录"),
        },
        Command::Login { username, password } => {
            let credentials = LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            };
            validate_login(&credentials).into_result()?;
            let user = session.login(&credentials).await?;
            app.notifications.success(format!("登录成功，欢迎 {}", user.username));
            println!("登录成功: {}", user.username);
        }
        Command::Logout => {
            session.logout().await;
            println!("已退出登录");
        }
        Command::Requests { keyword } => {
            let loading = app.notifications.show_loading(None);
            let page = match keyword {
                Some(keyword) => app.api.search_requests(keyword, None).await,
                None => app.api.get_requests(Some(&RequestQuery::default().page(1, 20))).await,
            };
            app.notifications.hide_loading(&loading);

            let page = page.inspect_err(|e| {
                app.notifications.client_error(e);
            })?;
            println!("共 {} 条求购", page.total);
            for item in &page.items {
                print_request(item);
            }
        }
        Command::Ping => {
            let backend = app.api.http().check_network_connection(app.api.http().base_url()).await;
            let internet = app.api.http().check_network_connection(DEFAULT_CONNECTIVITY_PROBE).await;
            println!("backend: {}", if backend { "reachable" } else { "unreachable" });
            println!("internet: {}", if internet { "reachable" } else { "unreachable" });
        }
    }

    Ok(())
}

fn print_request(item: &RequestItem) {
    let price = match item.price_range {
        Some(range) => format!("{} - {}", format_price(range.min), format_price(range.max)),
        None => "面议".to_string(),
    };
    let posted = item
        .created_at_utc()
        .map(|created| format_time(&created, &now_utc(), None))
        .unwrap_or_default();
    println!(
        "[{}] {}  {}  {}  {}",
        item.id,
        truncate_text(&item.title, 24, "..."),
        price,
        lib_utils::labels::status_text(item.status.as_deref().unwrap_or("")),
        posted
    );
}
