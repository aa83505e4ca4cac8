use std::{
    path::Path,
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use rusqlite::Connection;
use tokio::sync::oneshot;

mod migrations;
mod repositories;
pub mod store;

pub use store::{MemoryStore, StateStore};

type Job = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

/// Owns the SQLite connection thread. Dropping the last handle closes the
/// job channel, which ends the thread, and then joins it.
struct Worker {
    jobs: Mutex<Option<mpsc::Sender<Job>>>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl Worker {
    fn submit(&self, job: Job) -> Result<()> {
        let jobs = self
            .jobs
            .lock()
            .map_err(|_| anyhow!("database job queue lock poisoned"))?;
        let sender = jobs
            .as_ref()
            .ok_or_else(|| anyhow!("database worker already shut down"))?;
        sender
            .send(job)
            .map_err(|_| anyhow!("database worker is no longer running"))
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        match self.jobs.lock() {
            Ok(mut jobs) => drop(jobs.take()),
            Err(poisoned) => drop(poisoned.into_inner().take()),
        }
        let handle = match self.thread.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if let Err(err) = handle.join() {
                error!("briefing database thread panicked: {err:?}");
            }
        }
    }
}

/// SQLite-backed `StateStore`. Statements run on one dedicated thread and
/// callers await the result over a oneshot channel.
#[derive(Clone)]
pub struct Database {
    worker: Arc<Worker>,
}

impl Database {
    /// Open (or create) the database at `path` and bring its schema up to
    /// date before returning.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();
        let thread_path = path.clone();

        let thread = thread::Builder::new()
            .name("briefing-db".into())
            .spawn(move || {
                let mut conn = match open_connection(&thread_path) {
                    Ok(conn) => conn,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                if ready_tx.send(Ok(())).is_err() {
                    return;
                }

                for job in job_rx {
                    job(&mut conn);
                }
                info!("briefing database thread stopped");
            })
            .context("failed to spawn database thread")?;

        ready_rx
            .recv()
            .context("database thread exited during startup")??;
        info!("briefing state database ready at {}", path.display());

        Ok(Self {
            worker: Arc::new(Worker {
                jobs: Mutex::new(Some(job_tx)),
                thread: Mutex::new(Some(thread)),
            }),
        })
    }

    /// Run `task` against the connection on the database thread.
    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.worker.submit(Box::new(move |conn| {
            let _ = reply_tx.send(task(conn));
        }))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("database thread dropped the request"))?
    }
}

fn open_connection(path: &Path) -> Result<Connection> {
    let mut conn = Connection::open(path)
        .with_context(|| format!("failed to open SQLite database {}", path.display()))?;
    if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
        error!("failed to enable WAL journal: {err}");
    }
    migrations::migrate(&mut conn).context("failed to migrate briefing database")?;
    Ok(conn)
}
