//! User-facing side effects the editor asks for but never performs itself.

use crate::{
    editor::EditorCommand,
    route::{ParamMap, RouteTarget},
};
use std::time::Duration;
use tokio::sync::{mpsc::UnboundedSender, watch};

/// Performs navigation by logical path, e.g. `students/42`.
pub trait Navigator: Send + Sync {
    fn navigate_by_url(&self, url: &str);
}

/// Shows a transient message for roughly `duration`.
pub trait Notifier: Send + Sync {
    fn open(&self, message: &str, duration: Duration);
}

/// Prints notifications on stdout, for terminal sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn open(&self, message: &str, duration: Duration) {
        info!(%message, ?duration, "notification");
        println!("** {message}");
    }
}

/// Feeds record navigation back into the route the editor listens to, and
/// closes the editor when navigation leaves for the collection.
pub struct RouteNavigator {
    route: watch::Sender<ParamMap>,
    commands: UnboundedSender<EditorCommand>,
    collection: String,
}

impl RouteNavigator {
    pub fn new(
        route: watch::Sender<ParamMap>,
        commands: UnboundedSender<EditorCommand>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            route,
            commands,
            collection: collection.into(),
        }
    }
}

impl Navigator for RouteNavigator {
    fn navigate_by_url(&self, url: &str) {
        println!("-> {url}");
        match RouteTarget::from_url(url, &self.collection) {
            Some(RouteTarget::Detail(params)) => {
                if self.route.send(params).is_err() {
                    warn!(%url, "editor no longer listening to the route");
                }
            }
            Some(RouteTarget::Collection) => {
                info!(%url, "left the editor");
                if self.commands.send(EditorCommand::Deactivate).is_err() {
                    debug!(%url, "editor already gone");
                }
            }
            None => warn!(%url, "navigation outside the editor"),
        }
    }
}
