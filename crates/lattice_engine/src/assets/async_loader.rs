//! Background geometry loading
//!
//! Large meshes load on a worker thread so the pulse never stalls on
//! disk. The exchange is strictly message-passing: the pulse submits
//! paths, the worker parses them, and finished results wait in a channel
//! until the next [`AsyncGeometryLoader::drain`] on the engine thread.
//! Element registration always happens on the engine thread, never on
//! the worker.

use super::geometry::{load_geometry, GeometryData};
use super::AssetError;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::PathBuf;
use std::thread;

/// Token identifying one submitted geometry load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryTicket(u64);

struct LoadJob {
    ticket: GeometryTicket,
    path: PathBuf,
}

/// One finished background load.
#[derive(Debug)]
pub struct LoadedGeometry {
    /// Ticket returned by the submit call
    pub ticket: GeometryTicket,
    /// Path the job was submitted with
    pub path: PathBuf,
    /// Parsed mesh or the load failure
    pub result: Result<GeometryData, AssetError>,
}

/// Worker-thread mesh loader with a pull-based completion queue.
pub struct AsyncGeometryLoader {
    jobs: Option<Sender<LoadJob>>,
    results: Receiver<LoadedGeometry>,
    worker: Option<thread::JoinHandle<()>>,
    next_ticket: u64,
    in_flight: usize,
}

impl Default for AsyncGeometryLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AsyncGeometryLoader {
    /// Spawn the worker thread.
    #[must_use]
    pub fn new() -> Self {
        let (job_tx, job_rx) = unbounded::<LoadJob>();
        let (result_tx, result_rx) = unbounded::<LoadedGeometry>();
        let worker = thread::spawn(move || {
            while let Ok(job) = job_rx.recv() {
                let result = load_geometry(&job.path);
                let done = LoadedGeometry {
                    ticket: job.ticket,
                    path: job.path,
                    result,
                };
                if result_tx.send(done).is_err() {
                    break;
                }
            }
        });
        Self {
            jobs: Some(job_tx),
            results: result_rx,
            worker: Some(worker),
            next_ticket: 0,
            in_flight: 0,
        }
    }

    /// Queue a mesh for background loading.
    pub fn submit(&mut self, path: PathBuf) -> GeometryTicket {
        let ticket = GeometryTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight += 1;
        log::debug!("queued background load of {} as {ticket:?}", path.display());
        if let Some(jobs) = &self.jobs {
            if jobs.send(LoadJob { ticket, path }).is_err() {
                log::error!("geometry loader worker is gone; {ticket:?} will never finish");
            }
        }
        ticket
    }

    /// Collect every load finished since the last drain.
    pub fn drain(&mut self) -> Vec<LoadedGeometry> {
        let done: Vec<LoadedGeometry> = self.results.try_iter().collect();
        self.in_flight -= done.len();
        done
    }

    /// Number of submitted loads that have not been drained yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl Drop for AsyncGeometryLoader {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop.
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("geometry loader worker panicked");
            }
        }
    }
}
