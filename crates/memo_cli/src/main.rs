//! Command-line front end for the memo store.
//!
//! # Responsibility
//! - Resolve configuration (environment, then flags) and open the store.
//! - Drive the v1 handlers and print wire messages as JSON.
//!
//! Exit status is non-zero when a handler returns a status or the store
//! cannot be opened.

use clap::{Parser, Subcommand, ValueEnum};
use log::error;
use memo_api::{
    ApiV1Service, CreateMemoCommentRequest, CreateMemoRequest, GetMemoRequest,
    ListMemoCommentsRequest, MemoDraft, RequestContext, StoreIdentityResolver, Visibility,
};
use memo_core::db::open_db;
use memo_core::{
    init_logging, CoreConfig, NewUser, Role, SqliteMemoRepository, SqliteUserRepository,
    UserRepository,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "memo", version, about = "Memos and memo comments over a SQLite store")]
struct Cli {
    /// SQLite database file (overrides MEMO_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files (overrides MEMO_LOG_DIR).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
    /// Log level (overrides MEMO_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Acting user id, as set by an authenticating transport.
    #[arg(long, global = true)]
    user: Option<i64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Creates a user and prints its id.
    CreateUser {
        username: String,
        #[arg(long, value_enum, default_value_t = RoleArg::User)]
        role: RoleArg,
    },
    /// Creates a top-level memo.
    CreateMemo {
        content: String,
        #[arg(long, value_enum)]
        visibility: Option<VisibilityArg>,
    },
    /// Prints one memo by `memos/{uid}`.
    GetMemo { name: String },
    /// Comments on the memo named `memos/{uid}`.
    Comment { parent: String, content: String },
    /// Lists comments of the memo named `memos/{uid}`.
    Comments { parent: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Host,
    Admin,
    User,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Host => Role::Host,
            RoleArg::Admin => Role::Admin,
            RoleArg::User => Role::User,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VisibilityArg {
    Private,
    Protected,
    Public,
}

impl From<VisibilityArg> for Visibility {
    fn from(value: VisibilityArg) -> Self {
        match value {
            VisibilityArg::Private => Visibility::Private,
            VisibilityArg::Protected => Visibility::Protected,
            VisibilityArg::Public => Visibility::Public,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = resolve_config(&cli)?;
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(config.log_level, &log_dir.to_string_lossy()).map_err(|err| err.to_string())?;
    }

    let conn = open_db(&config.db_path).map_err(|err| {
        error!("event=cli_open module=cli status=error error={err}");
        format!("failed to open {}: {err}", config.db_path.display())
    })?;
    let memos = SqliteMemoRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let users = SqliteUserRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let api = ApiV1Service::new(memos, StoreIdentityResolver::new(users));
    let ctx = RequestContext {
        user_id: cli.user,
    };

    match cli.command {
        Command::CreateUser { username, role } => {
            let user = users
                .create_user(&NewUser::new(username, role.into()))
                .map_err(|err| err.to_string())?;
            print_json(&user)
        }
        Command::CreateMemo {
            content,
            visibility,
        } => {
            let request = CreateMemoRequest {
                memo: MemoDraft {
                    content,
                    visibility: visibility.map(Into::into),
                },
            };
            print_json(&api.create_memo(&ctx, request).map_err(|err| err.to_string())?)
        }
        Command::GetMemo { name } => {
            print_json(&api.get_memo(GetMemoRequest { name }).map_err(|err| err.to_string())?)
        }
        Command::Comment { parent, content } => {
            let request = CreateMemoCommentRequest {
                parent,
                comment: MemoDraft::new(content),
            };
            print_json(
                &api.create_memo_comment(&ctx, request)
                    .map_err(|err| err.to_string())?,
            )
        }
        Command::Comments { parent } => print_json(
            &api.list_memo_comments(ListMemoCommentsRequest { parent })
                .map_err(|err| err.to_string())?,
        ),
    }
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig, String> {
    let mut config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = cli.db.as_ref() {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = cli.log_dir.as_ref() {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = cli.log_level.as_deref() {
        config = config
            .with_log_level(level)
            .map_err(|err| err.to_string())?;
    }
    Ok(config)
}

fn print_json(value: &impl Serialize) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{resolve_config, Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn flags_override_configuration() {
        let cli = Cli::parse_from([
            "memo",
            "--db",
            "/tmp/cli.db",
            "--log-level",
            "WARNING",
            "--user",
            "3",
            "comments",
            "memos/p1",
        ]);
        assert_eq!(cli.user, Some(3));
        assert!(matches!(cli.command, Command::Comments { ref parent } if parent == "memos/p1"));

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/cli.db"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn bad_log_level_flag_is_rejected() {
        let cli = Cli::parse_from(["memo", "--log-level", "loud", "comments", "memos/p1"]);
        assert!(resolve_config(&cli).is_err());
    }
}
