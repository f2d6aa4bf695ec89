#![warn(clippy::pedantic, clippy::all, clippy::nursery)]

use snafu::ResultExt;
use std::{path::Path, sync::Arc};
use student_editor::{
    Collaborators, EditorCommand, EditorController, EditorResult,
    api::InMemoryStudentApi,
    config::RuntimeConfiguration,
    data::{FileInput, StudentField},
    diagnostics::TracingDiagnostics,
    editor::view::render_page,
    error::{IoSnafu, JsonSnafu},
    feedback::{ConsoleNotifier, RouteNavigator},
    form::StudentDetailsForm,
    route::ParamMap,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc::UnboundedSender, oneshot, watch},
};
use tokio_stream::wrappers::WatchStream;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

const HELP: &str = "commands: open <id|add>, set <field> <value>, save, add, update, delete, upload <path>, show [html|json], genders, quit";

#[tokio::main]
async fn main() {
    let dotenv_result = dotenvy::dotenv();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");
    if let Err(e) = dotenv_result {
        debug!(?e, "no .env loaded");
    }

    let config = RuntimeConfiguration::new().expect("unable to create config");
    let settings = config.editor_settings();
    let api = Arc::new(InMemoryStudentApi::with_default_genders(config.api_config()));

    let initial_route = std::env::args().nth(1).unwrap_or_else(|| "add".to_string());
    let (route_tx, route_rx) = watch::channel(ParamMap::with_id(initial_route));
    let (command_tx, command_rx) = tokio::sync::mpsc::unbounded_channel();

    let collaborators = Collaborators {
        students: api.clone(),
        genders: api,
        navigator: Arc::new(RouteNavigator::new(
            route_tx.clone(),
            command_tx.clone(),
            settings.collection_path.clone(),
        )),
        notifier: Arc::new(ConsoleNotifier),
        diagnostics: Arc::new(TracingDiagnostics),
    };
    let controller = EditorController::new(collaborators, settings).with_form(StudentDetailsForm);

    let session = tokio::spawn(controller.run(WatchStream::new(route_rx), command_rx));

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(?e, "unable to read stdin");
                break;
            }
        };

        match handle_line(line.trim(), &command_tx, &route_tx).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("!! {e}"),
        }
        if session.is_finished() {
            break;
        }
    }

    let _ = command_tx.send(EditorCommand::Deactivate);
    let last = session.await.expect("unable to join editor task");
    info!(phase = ?last.phase, "editor closed");
}

/// Returns `Ok(false)` once the session should end.
async fn handle_line(
    line: &str,
    commands: &UnboundedSender<EditorCommand>,
    route: &watch::Sender<ParamMap>,
) -> EditorResult<bool> {
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb {
        "" => return Ok(true),
        "quit" | "exit" => return Ok(false),
        "help" => {
            println!("{HELP}");
            return Ok(true);
        }
        "open" => return Ok(route.send(ParamMap::with_id(rest)).is_ok()),
        "set" => {
            let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
            EditorCommand::SetField(field.parse::<StudentField>()?, value.trim().to_string())
        }
        "save" => EditorCommand::Save,
        "add" => EditorCommand::Create,
        "update" => EditorCommand::Update,
        "delete" => EditorCommand::Delete,
        "upload" => {
            let path = Path::new(rest);
            let bytes = tokio::fs::read(path).await.context(IoSnafu)?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            EditorCommand::UploadImage(FileInput::single(name, bytes))
        }
        "show" | "genders" => {
            let (reply_tx, reply_rx) = oneshot::channel();
            if commands.send(EditorCommand::Snapshot(reply_tx)).is_err() {
                return Ok(false);
            }
            let Ok(snapshot) = reply_rx.await else {
                return Ok(false);
            };

            match (verb, rest) {
                ("genders", _) => {
                    for gender in &snapshot.genders {
                        println!("{}  {}", gender.id, gender.description);
                    }
                }
                (_, "html") => println!("{}", render_page(&snapshot).into_string()),
                (_, "json") => println!(
                    "{}",
                    serde_json::to_string_pretty(&snapshot.student).context(JsonSnafu)?
                ),
                _ => println!(
                    "{} [{:?}] id={:?} image={} valid={}",
                    snapshot.header,
                    snapshot.phase,
                    snapshot.student.id,
                    snapshot.display_image_url,
                    snapshot.form_is_valid
                ),
            }
            return Ok(true);
        }
        other => {
            println!("unknown command {other:?}, {HELP}");
            return Ok(true);
        }
    };

    Ok(commands.send(command).is_ok())
}
