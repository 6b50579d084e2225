use clap::{Parser, Subcommand};
use domain::AuthorRef;
use importer::db;
use importer::services::{process_import, process_refresh_all, ImportTask, SettingsService};
use importer::{AppState, Config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "importer")]
#[command(version = env!("APP_VERSION"))]
#[command(about = "Import GitHub repositories as CMS posts", long_about = None)]
struct Cli {
    /// Directory holding the database, settings and media
    #[arg(long, env = "IMPORTER_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Database URL, defaults to a SQLite file in the data directory
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import repositories, each given as URL or URL=REDIRECT
    Import {
        #[arg(required = true)]
        repos: Vec<String>,

        /// Kind of the actor the imports are attributed to
        #[arg(long, requires = "author_id")]
        author_kind: Option<String>,

        /// Id of the actor the imports are attributed to
        #[arg(long, requires = "author_kind")]
        author_id: Option<i64>,

        /// Admin panel the imports belong to
        #[arg(long)]
        panel: Option<String>,
    },
    /// Refresh every imported post once
    Refresh,
    /// Refresh imported posts periodically until interrupted
    Run,
}

/// Split `URL=REDIRECT` into its parts
fn parse_repo_arg(arg: &str) -> (String, Option<String>) {
    match arg.split_once('=') {
        Some((url, redirect)) if !redirect.is_empty() => (url.to_string(), Some(redirect.to_string())),
        Some((url, _)) => (url.to_string(), None),
        None => (arg.to_string(), None),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::new(cli.data_dir);
    if let Some(database_url) = cli.database_url {
        config = config.with_database_url(database_url);
    }
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let settings = SettingsService::new(&config).await?.get().await;
    let pool = db::create_pool(&config.database_url, config.max_connections).await?;
    let state = AppState::new(pool, config, settings)?;

    match cli.command {
        Command::Import {
            repos,
            author_kind,
            author_id,
            panel,
        } => {
            let author = AuthorRef::from_parts(author_kind.as_deref(), author_id);
            let tasks: Vec<ImportTask> = repos
                .iter()
                .map(|arg| {
                    let (url, redirect) = parse_repo_arg(arg);
                    let task = ImportTask::new(url)
                        .with_redirect(redirect)
                        .with_author(author.clone());
                    match &panel {
                        Some(panel) => task.with_panel(panel.clone()),
                        None => task,
                    }
                })
                .collect();

            futures::future::join_all(tasks.iter().map(|task| {
                process_import(&state.import, state.events.as_ref(), &state.settings.admin, task)
            }))
            .await;
        }
        Command::Refresh => {
            process_refresh_all(&state.import).await;
        }
        Command::Run => {
            state.scheduler.start();
            tracing::info!("Importer running, press Ctrl+C to stop");
            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_arg() {
        assert_eq!(
            parse_repo_arg("https://github.com/acme/widget"),
            ("https://github.com/acme/widget".to_string(), None)
        );
        assert_eq!(
            parse_repo_arg("https://github.com/acme/widget=/admin/posts"),
            (
                "https://github.com/acme/widget".to_string(),
                Some("/admin/posts".to_string())
            )
        );
        assert_eq!(
            parse_repo_arg("https://github.com/acme/widget="),
            ("https://github.com/acme/widget".to_string(), None)
        );
    }

    #[test]
    fn test_cli_parses_import() {
        let cli = Cli::try_parse_from([
            "importer",
            "import",
            "https://github.com/acme/widget",
            "--author-kind",
            "admin",
            "--author-id",
            "1",
        ])
        .unwrap();

        match cli.command {
            Command::Import {
                repos, author_id, ..
            } => {
                assert_eq!(repos.len(), 1);
                assert_eq!(author_id, Some(1));
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn test_author_parts_are_required_together() {
        let result = Cli::try_parse_from([
            "importer",
            "import",
            "https://github.com/acme/widget",
            "--author-id",
            "1",
        ]);
        assert!(result.is_err());
    }
}
