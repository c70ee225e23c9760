use std::sync::Arc;

use crate::api::{HttpSermonApi, SermonApi};
use crate::cache::SermonCache;
use crate::cli::commands::{Cli, Commands, MoveArgs, OutlineArgs};
use crate::cli::output::{self, OutlineJson, SermonJson};
use crate::commit::OutlineEditor;
use crate::config::{ClientConfig, DEFAULT_CONFIG_PATH};
use crate::error::{Error, Result};
use crate::model::Bucket;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = ClientConfig::load(cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH))?;
    let api: Arc<dyn SermonApi> =
        Arc::new(HttpSermonApi::new(&config.base_url, config.request_timeout())?);
    match cli.command {
        Commands::Sermons => cmd_sermons(api, &config, cli.json).await,
        Commands::Outline(args) => cmd_outline(api, &config, args, cli.json).await,
        Commands::Move(args) => cmd_move(api, &config, args).await,
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn cmd_sermons(api: Arc<dyn SermonApi>, config: &ClientConfig, json: bool) -> Result<()> {
    let cache = SermonCache::new(api);
    cache.refresh(&config.user_id).await?;
    let sermons = cache.sermons();
    if json {
        let rows: Vec<SermonJson> = sermons.iter().map(SermonJson::from).collect();
        println!("{}", serde_json::to_string_pretty(&rows).map_err(to_config_err)?);
    } else {
        output::print_sermons(&sermons);
    }
    Ok(())
}

async fn cmd_outline(
    api: Arc<dyn SermonApi>,
    config: &ClientConfig,
    args: OutlineArgs,
    json: bool,
) -> Result<()> {
    let editor = load_editor(api, config, &args.sermon_id).await?;
    let board = editor.board();
    if json {
        let outline = OutlineJson::from(&board);
        println!("{}", serde_json::to_string_pretty(&outline).map_err(to_config_err)?);
    } else {
        output::print_outline(&board);
    }
    Ok(())
}

async fn cmd_move(api: Arc<dyn SermonApi>, config: &ClientConfig, args: MoveArgs) -> Result<()> {
    let bucket = Bucket::from_key(&args.bucket)
        .ok_or_else(|| Error::NotFound(format!("bucket '{}'", args.bucket)))?;
    let editor = load_editor(api, config, &args.sermon_id).await?;
    let moved = editor.move_thought(&args.thought_id, bucket)?;
    // One-shot process: push the debounced saves out before exiting
    editor.flush().await;
    if moved {
        println!("moved {} to {}", args.thought_id, bucket);
    } else {
        println!("{} is already in {}", args.thought_id, bucket);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_editor(
    api: Arc<dyn SermonApi>,
    config: &ClientConfig,
    sermon_id: &str,
) -> Result<OutlineEditor> {
    let editor = OutlineEditor::load(
        api,
        sermon_id,
        &config.user_id,
        config.thought_window(),
        config.structure_window(),
    )
    .await?;
    Ok(editor)
}

fn to_config_err(e: serde_json::Error) -> Error {
    Error::Config(format!("cannot render output: {e}"))
}
