//! Background threads: the one catalog fetch and flag image downloads

use countries_core::model::CountryRecord;
use countries_core::{CatalogSource, FetchFailure, fetch_flag_image};
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

pub type CatalogResult = Result<Vec<CountryRecord>, FetchFailure>;

/// Fetch the whole catalog once and hand the outcome back to the UI thread
pub fn spawn_fetch_worker(
    source: Box<dyn CatalogSource>,
    tx: Sender<CatalogResult>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let result = source.fetch_all();
        if let Err(e) = &result {
            log::warn!("{}: {:?}", e, e);
        }
        // The UI may already be gone
        let _ = tx.send(result);
    })
}

#[derive(Debug, Clone)]
pub struct FlagRequest {
    pub key: String,
    pub url: String,
}

#[derive(Debug)]
pub struct FlagResponse {
    pub key: String,
    pub bytes: Option<Vec<u8>>,
}

/// Serve flag downloads one at a time, dropping requests superseded while busy
pub fn spawn_flag_worker(
    req_rx: Receiver<FlagRequest>,
    resp_tx: Sender<FlagResponse>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(mut req) = req_rx.recv() {
            while let Ok(next) = req_rx.try_recv() {
                req = next;
            }

            let bytes = match fetch_flag_image(&req.url) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    log::debug!("Flag download for {} failed: {:#}", req.key, e);
                    None
                }
            };

            if resp_tx.send(FlagResponse { key: req.key, bytes }).is_err() {
                break;
            }
        }
    })
}
