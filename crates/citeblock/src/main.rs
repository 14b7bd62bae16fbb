mod cli;

use anyhow::{bail, Context, Result};
use citeblock::{AppState, Config};
use citeblock_core::{StyleUpload, UploadedFile};
use citeblock_processor::resolve_default_style;
use clap::Parser;
use cli::{Cli, Command, OutputFormat, StylesCommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "citeblock=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = Config::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            citeblock::serve(&config).await?;
        }

        Command::Styles { command } => {
            let state = AppState::from_config(&config)?;
            run_styles(&state, command)?;
        }

        Command::Render { item, style, mode } => {
            if let Some(mode) = mode {
                config.render.mode = mode;
            }
            let state = AppState::from_config(&config)?;
            let content = state
                .items
                .load_item(&item)?
                .with_context(|| format!("content item {} not found", item))?;

            let style = match style {
                Some(style) => style,
                None => resolve_default_style(&config.block, &state.helper.list_styles()?)
                    .context("no citation styles are stored")?,
            };

            let outcome =
                state
                    .helper
                    .render_item(&content, &style, config.block.default_csl_type());
            if outcome.is_failed() {
                bail!("{}", outcome.markup());
            }
            println!("{}", outcome.markup());
        }
    }

    Ok(())
}

fn run_styles(state: &AppState, command: StylesCommand) -> Result<()> {
    match command {
        StylesCommand::List { format } => {
            let styles = state.helper.list_styles()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&styles)?),
                OutputFormat::Text => {
                    if styles.is_empty() {
                        println!("No citation styles stored.");
                    }
                    for (id, label) in &styles {
                        println!("{:<24} {}", id, label);
                    }
                }
            }
        }

        StylesCommand::Show { id } => {
            let style = state.helper.load_style(&id)?;
            println!("{}", style.xml);
        }

        StylesCommand::Add { file, label, id } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut upload = StyleUpload::new(label.unwrap_or_default(), UploadedFile::new(name, bytes));
            if let Some(id) = id {
                upload = upload.with_id(id);
            }
            let outcome = state.upload.submit(upload)?;
            println!("{}", outcome.message);
        }

        StylesCommand::Delete { id } => {
            let style = state.repository.delete(&id)?;
            println!("Deleted citation style {}.", style.label);
        }
    }
    Ok(())
}
