use std::{
    io::{self, BufRead},
    ops::ControlFlow,
    thread,
    time::Duration,
};
use tokio::{
    sync::mpsc,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use super::Poller;
use crate::{
    fetch::CsvSource,
    present::{CustomerDetails, NotificationQueue, Presenter, RecordKind, Snapshot},
    sync::{SyncStatus, Syncer},
};

/// User actions fed into the watch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    Sync { url: Option<String> },
    ShowNotifications,
    /// Open the notification at this queue position and remove it.
    OpenNotification(usize),
    ClearNotifications,
    Details { kind: RecordKind, index: usize },
    Search(Option<String>),
    Shutdown,
}

impl Command {
    /// Parse one line of interactive input, e.g. `r`, `s https://…`, `o 0`,
    /// `d orders 3`, `/ada`, `q`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if let Some(query) = line.strip_prefix('/') {
            let query = query.trim();
            return Some(Command::Search(
                (!query.is_empty()).then(|| query.to_string()),
            ));
        }

        let mut parts = line.split_whitespace();
        let cmd = match parts.next()? {
            "r" | "refresh" => Command::Refresh,
            "s" | "sync" => Command::Sync {
                url: parts.next().map(str::to_string),
            },
            "n" | "notifications" => Command::ShowNotifications,
            "o" | "open" => Command::OpenNotification(parts.next()?.parse().ok()?),
            "c" | "clear" => Command::ClearNotifications,
            "d" | "details" => {
                let kind = RecordKind::from_str(parts.next()?)?;
                let index = parts.next()?.parse().ok()?;
                Command::Details { kind, index }
            }
            "q" | "quit" | "exit" => Command::Shutdown,
            _ => return None,
        };
        Some(cmd)
    }
}

pub const COMMAND_HELP: &str = "commands: r(efresh) | s(ync) [url] | n(otifications) | o(pen) <n> | c(lear) | d(etails) <leads|orders> <n> | /<search> | q(uit)";

/// Forward parsed lines from `input` to the watch loop.
///
/// Reads on a plain OS thread, so a read still blocked when the loop stops
/// does not keep the process alive. The thread ends at end of input or once
/// the receiver is gone.
pub fn spawn_command_reader<R>(
    input: R,
    tx: mpsc::Sender<Command>,
) -> io::Result<thread::JoinHandle<()>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name("command-reader".to_string())
        .spawn(move || {
            for line in input.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("stdin read failed: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                match Command::parse(&line) {
                    Some(cmd) => {
                        if tx.blocking_send(cmd).is_err() {
                            break;
                        }
                    }
                    None => println!("{}", COMMAND_HELP),
                }
            }
            debug!("command reader finished");
        })
}

/// The dashboard session: one poller, its presenter, and the pending
/// notifications. Polls and commands are handled strictly one at a time.
pub struct Watcher<S, P> {
    poller: Poller<S>,
    presenter: P,
    notifications: NotificationQueue,
    snapshot: Snapshot,
    syncer: Option<Syncer>,
}

impl<S: CsvSource, P: Presenter> Watcher<S, P> {
    pub fn new(poller: Poller<S>, presenter: P) -> Self {
        Self {
            poller,
            presenter,
            notifications: NotificationQueue::new(),
            snapshot: Snapshot::default(),
            syncer: None,
        }
    }

    pub fn with_syncer(mut self, syncer: Syncer) -> Self {
        self.syncer = Some(syncer);
        self
    }

    pub fn poller(&self) -> &Poller<S> {
        &self.poller
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Poll once and push the result to the presenter. Returns whether new
    /// data arrived.
    pub async fn refresh(&mut self) -> bool {
        let Some(cycle) = self.poller.poll().await else {
            return false;
        };

        self.snapshot = Snapshot::from_records(cycle.records);
        self.presenter
            .render_records(RecordKind::Leads, self.snapshot.leads());
        self.presenter
            .render_records(RecordKind::Orders, self.snapshot.orders());
        self.presenter.render_summary(&self.snapshot.summary());

        for ev in &cycle.events {
            self.presenter.notify(ev);
        }
        self.notifications.push_all(cycle.events);
        self.presenter.render_notifications(&self.notifications);
        true
    }

    pub async fn handle(&mut self, cmd: Command) -> ControlFlow<()> {
        debug!(?cmd, "command");
        match cmd {
            Command::Refresh => {
                self.refresh().await;
            }
            Command::Sync { url } => {
                let status = self.sync(url.as_deref()).await;
                self.presenter.show_status(status.message());
            }
            Command::ShowNotifications => {
                self.presenter.render_notifications(&self.notifications);
            }
            Command::OpenNotification(pos) => {
                if let Some(ev) = self.notifications.dismiss(pos) {
                    // looked up by index in the *current* orders, which may have shifted
                    self.show_details(RecordKind::Orders, ev.index);
                    self.presenter.render_notifications(&self.notifications);
                }
            }
            Command::ClearNotifications => {
                self.notifications.clear();
                self.presenter.render_notifications(&self.notifications);
            }
            Command::Details { kind, index } => self.show_details(kind, index),
            Command::Search(query) => {
                self.presenter.set_filter(query);
                self.presenter
                    .render_records(RecordKind::Leads, self.snapshot.leads());
                self.presenter
                    .render_records(RecordKind::Orders, self.snapshot.orders());
            }
            Command::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    async fn sync(&mut self, url: Option<&str>) -> SyncStatus {
        let Some(syncer) = self.syncer.as_mut() else {
            return SyncStatus::MissingUrl;
        };
        self.presenter.show_status("Syncing data to CRM...");
        match syncer.sync(url, &self.snapshot).await {
            Ok(status) => status,
            Err(e) => {
                error!("saving webhook url failed: {:#}", e);
                SyncStatus::Failed
            }
        }
    }

    fn show_details(&mut self, kind: RecordKind, index: usize) {
        match self.snapshot.record(kind, index) {
            Some(rec) => {
                let details = CustomerDetails::from(rec);
                self.presenter.show_details(kind, &details);
            }
            None => debug!(kind = kind.as_str(), index, "no such record"),
        }
    }

    /// Poll now and then every `every`, handling commands in between, until
    /// `Shutdown` arrives. Ticks that fall due during a slow fetch are
    /// skipped, never run alongside it. A closed command channel only stops
    /// command handling; polling carries on.
    pub async fn run(&mut self, every: Duration, mut commands: mpsc::Receiver<Command>) {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut commands_open = true;

        info!(every = ?every, "watching");
        // the first tick completes immediately
        ticker.tick().await;
        self.refresh().await;

        loop {
            // commands first, so a due tick after a slow fetch cannot starve them
            tokio::select! {
                biased;
                cmd = commands.recv(), if commands_open => match cmd {
                    Some(cmd) => {
                        if self.handle(cmd).await.is_break() {
                            break;
                        }
                    }
                    None => {
                        debug!("command channel closed");
                        commands_open = false;
                    }
                },
                _ = ticker.tick() => {
                    self.refresh().await;
                }
            }
        }
        info!("watch loop stopped");
    }
}
