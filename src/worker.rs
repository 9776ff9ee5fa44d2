//! Single request / single response filter worker.
//!
//! A [`FilterRequest`] names a filter, carries the source grid as JSON and up
//! to four optional positional arguments, each JSON-encoded on its own. The
//! answer is a [`FilterResponse`] holding the filtered grid and the selector
//! echoed back so that callers with several requests in flight can match
//! replies to requests.
//!
//! Field names on the wire are `func`, `pixelPanels` and `arg2`..`arg5`:
//!
//! ```json
//! {"func": "threshold", "pixelPanels": "[[{\"red\":0,...}]]", "arg2": "100"}
//! ```
//!
//! Three ways to run requests:
//! - [`handle_request`] / [`handle_message`] evaluate on the calling thread
//! - [`Worker`] owns a background thread fed through a bounded channel
//! - [`process_batch`] evaluates independent requests in parallel

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use flume::{Receiver, Sender};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::{FilterOptions, WorkerConfig};
use crate::error::{FilterError, WorkerError};
use crate::filters::{self, Filter, FilterArgs};
use crate::grid::PixelGrid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(rename = "func")]
    pub selector: String,
    /// Serialized source grid.
    #[serde(rename = "pixelPanels")]
    pub grid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg5: Option<String>,
}

impl FilterRequest {
    /// Request with no arguments; the grid is serialized here.
    pub fn new(selector: impl Into<String>, grid: &PixelGrid) -> Result<Self, WorkerError> {
        Ok(Self {
            selector: selector.into(),
            grid: serde_json::to_string(grid)?,
            arg2: None,
            arg3: None,
            arg4: None,
            arg5: None,
        })
    }

    /// Set positional argument `position` (2 to 5) to the JSON form of `value`.
    pub fn arg<T>(mut self, position: usize, value: &T) -> Result<Self, WorkerError>
    where
        T: Serialize + ?Sized,
    {
        let encoded = Some(serde_json::to_string(value)?);
        match position {
            2 => self.arg2 = encoded,
            3 => self.arg3 = encoded,
            4 => self.arg4 = encoded,
            5 => self.arg5 = encoded,
            _ => {
                return Err(WorkerError::Filter {
                    selector: self.selector,
                    source: FilterError::InvalidArgument {
                        position,
                        reason: "positions run from 2 to 5".to_string(),
                    },
                })
            }
        }
        Ok(self)
    }

    /// Decode each argument independently; blank strings count as absent.
    fn args(&self) -> Result<FilterArgs, WorkerError> {
        let decode = |raw: &Option<String>| -> Result<Option<Value>, WorkerError> {
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(text) => Ok(Some(serde_json::from_str(text)?)),
            }
        };
        Ok(FilterArgs::new([
            decode(&self.arg2)?,
            decode(&self.arg3)?,
            decode(&self.arg4)?,
            decode(&self.arg5)?,
        ]))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterResponse {
    /// Serialized result grid.
    #[serde(rename = "pixelPanels")]
    pub grid: String,
    /// Selector of the request this answers.
    #[serde(rename = "func")]
    pub selector: String,
}

impl FilterResponse {
    pub fn decode_grid(&self) -> Result<PixelGrid, WorkerError> {
        Ok(serde_json::from_str(&self.grid)?)
    }
}

/// Evaluate one request on the calling thread.
///
/// The selector is resolved before anything else is decoded, so an unknown
/// filter is always reported as [`WorkerError::UnknownFilter`].
pub fn handle_request(
    request: &FilterRequest,
    options: &FilterOptions,
) -> Result<FilterResponse, WorkerError> {
    let filter = Filter::from_name(&request.selector)
        .ok_or_else(|| WorkerError::UnknownFilter(request.selector.clone()))?;

    let input: PixelGrid = serde_json::from_str(&request.grid)?;
    let args = request.args()?;

    tracing::debug!(
        filter = %filter,
        width = input.width(),
        height = input.height(),
        "applying filter"
    );

    let output = filters::apply(filter, &input, &args, options).map_err(|source| {
        WorkerError::Filter {
            selector: request.selector.clone(),
            source,
        }
    })?;

    Ok(FilterResponse {
        grid: serde_json::to_string(&output)?,
        selector: request.selector.clone(),
    })
}

/// JSON in, JSON out. Always answers.
///
/// On success the reply is a serialized [`FilterResponse`]; on failure it is
/// `{"func": <selector>, "error": {"kind": <variant>, "message": <text>}}`.
pub fn handle_message(message: &str, options: &FilterOptions) -> String {
    let request: FilterRequest = match serde_json::from_str(message) {
        Ok(request) => request,
        Err(e) => return error_reply("", &WorkerError::from(e)),
    };

    match handle_request_isolated(&request, options) {
        Ok(response) => json!({
            "pixelPanels": response.grid,
            "func": response.selector,
        })
        .to_string(),
        Err(e) => error_reply(&request.selector, &e),
    }
}

fn error_reply(selector: &str, error: &WorkerError) -> String {
    tracing::warn!(selector, kind = error.kind(), error = %error, "filter request failed");
    json!({
        "func": selector,
        "error": {
            "kind": error.kind(),
            "message": error.to_string(),
        },
    })
    .to_string()
}

/// [`handle_request`], with a panic inside the filter turned into
/// [`WorkerError::Panicked`] for this request alone.
fn handle_request_isolated(request: &FilterRequest, options: &FilterOptions) -> Reply {
    isolate(&request.selector, || handle_request(request, options))
}

fn isolate<F>(selector: &str, evaluate: F) -> Reply
where
    F: FnOnce() -> Reply,
{
    panic::catch_unwind(AssertUnwindSafe(evaluate)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::error!(selector, %message, "filter panicked");
        Err(WorkerError::Panicked {
            selector: selector.to_string(),
            message,
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        text.to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Evaluate independent requests in parallel. Results keep the input order.
pub fn process_batch(
    requests: &[FilterRequest],
    options: &FilterOptions,
) -> Vec<Result<FilterResponse, WorkerError>> {
    requests
        .par_iter()
        .map(|request| handle_request_isolated(request, options))
        .collect()
}

type Reply = Result<FilterResponse, WorkerError>;

struct Job {
    request: FilterRequest,
    reply: Sender<Reply>,
}

/// Background filter thread.
///
/// Requests are processed one at a time, in submission order. A request whose
/// filter panics is answered with [`WorkerError::Panicked`] and the thread
/// keeps serving later requests. Dropping the
/// worker closes the queue, lets queued requests finish and joins the thread.
pub struct Worker {
    jobs: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub fn spawn(config: WorkerConfig) -> std::io::Result<Self> {
        let (jobs_tx, jobs_rx) = flume::bounded(config.queue_capacity);
        let options = config.filters;

        let handle = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || run_loop(jobs_rx, options))?;

        tracing::info!(
            thread = %config.thread_name,
            queue_capacity = config.queue_capacity,
            "filter worker started"
        );

        Ok(Self {
            jobs: Some(jobs_tx),
            handle: Some(handle),
        })
    }

    /// Queue a request. Blocks while the queue is full.
    pub fn submit(&self, request: FilterRequest) -> Result<PendingReply, WorkerError> {
        let jobs = self.jobs.as_ref().ok_or(WorkerError::Disconnected)?;
        let (reply_tx, reply_rx) = flume::bounded(1);
        let selector = request.selector.clone();

        jobs.send(Job {
            request,
            reply: reply_tx,
        })
        .map_err(|_| WorkerError::Disconnected)?;

        Ok(PendingReply {
            selector,
            reply: reply_rx,
        })
    }

    /// Submit and wait for the answer.
    pub fn call(&self, request: FilterRequest) -> Result<FilterResponse, WorkerError> {
        self.submit(request)?.wait()
    }

    /// Stop accepting requests and wait for queued ones to finish.
    pub fn shutdown(mut self) {
        self.close();
    }

    fn close(&mut self) {
        drop(self.jobs.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("filter worker panicked");
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.close();
    }
}

fn run_loop(jobs: Receiver<Job>, options: FilterOptions) {
    for job in jobs.iter() {
        let reply = handle_request_isolated(&job.request, &options);
        if let Err(e) = &reply {
            tracing::debug!(selector = %job.request.selector, error = %e, "request failed");
        }
        if job.reply.send(reply).is_err() {
            tracing::debug!(selector = %job.request.selector, "reply dropped, caller went away");
        }
    }
    tracing::info!("filter worker stopped");
}

/// Answer to a submitted request, not yet received.
pub struct PendingReply {
    selector: String,
    reply: Receiver<Reply>,
}

impl PendingReply {
    /// Selector of the submitted request.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Block until the worker answers.
    pub fn wait(self) -> Result<FilterResponse, WorkerError> {
        self.reply.recv().map_err(|_| WorkerError::Disconnected)?
    }

    /// Non-blocking poll; `None` while the request is still queued or running.
    pub fn try_wait(&self) -> Option<Result<FilterResponse, WorkerError>> {
        match self.reply.try_recv() {
            Ok(reply) => Some(reply),
            Err(flume::TryRecvError::Empty) => None,
            Err(flume::TryRecvError::Disconnected) => Some(Err(WorkerError::Disconnected)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::Pixel;

    fn red_grid() -> PixelGrid {
        PixelGrid::new(3, 3, Pixel::new(255, 0, 0, 255)).unwrap()
    }

    fn reply_json(message: &str) -> Value {
        serde_json::from_str(&handle_message(message, &FilterOptions::default())).unwrap()
    }

    #[test]
    fn test_handle_request_grayscale() {
        let request = FilterRequest::new("grayscale", &red_grid()).unwrap();
        let response = handle_request(&request, &FilterOptions::default()).unwrap();

        assert_eq!(response.selector, "grayscale");
        let grid = response.decode_grid().unwrap();
        assert!(grid.iter().all(|(_, _, p)| *p == Pixel::new(54, 54, 54, 255)));
    }

    #[test]
    fn test_unknown_filter_is_distinct() {
        let request = FilterRequest {
            selector: "emboss".to_string(),
            grid: "not even json".to_string(),
            arg2: None,
            arg3: None,
            arg4: None,
            arg5: None,
        };
        let result = handle_request(&request, &FilterOptions::default());
        assert!(matches!(result, Err(WorkerError::UnknownFilter(name)) if name == "emboss"));
    }

    #[test]
    fn test_filter_error_carries_selector() {
        let request = FilterRequest::new("resizeCanvas", &red_grid())
            .unwrap()
            .arg(2, &1)
            .unwrap()
            .arg(3, &1)
            .unwrap();

        match handle_request(&request, &FilterOptions::default()) {
            Err(WorkerError::Filter { selector, source }) => {
                assert_eq!(selector, "resizeCanvas");
                assert!(matches!(source, FilterError::UnsupportedOperation(_)));
            }
            other => panic!("expected filter error, got {:?}", other),
        }
    }

    #[test]
    fn test_arg_position_range() {
        let request = FilterRequest::new("add", &red_grid()).unwrap();
        assert!(request.clone().arg(5, &1).is_ok());
        assert!(request.arg(6, &1).is_err());
    }

    #[test]
    fn test_blank_and_null_args_are_absent() {
        let mut request = FilterRequest::new("threshold", &red_grid()).unwrap();
        request.arg2 = Some("  ".to_string());
        request.arg3 = Some("null".to_string());

        let args = request.args().unwrap();
        assert_eq!(args, FilterArgs::default());
    }

    #[test]
    fn test_malformed_argument() {
        let mut request = FilterRequest::new("add", &red_grid()).unwrap();
        request.arg2 = Some("{oops".to_string());
        assert!(matches!(
            handle_request(&request, &FilterOptions::default()),
            Err(WorkerError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_handle_message_wire_names() {
        let grid = serde_json::to_string(&red_grid()).unwrap();
        let message = json!({"func": "invert", "pixelPanels": grid}).to_string();

        let reply = reply_json(&message);

        assert_eq!(reply["func"], "invert");
        let encoded = reply["pixelPanels"].as_str().unwrap();
        let grid: PixelGrid = serde_json::from_str(encoded).unwrap();
        assert_eq!(grid[(0, 0)], Pixel::new(0, 255, 255, 255));
    }

    #[test]
    fn test_handle_message_error_reply() {
        let grid = serde_json::to_string(&red_grid()).unwrap();
        let message = json!({"func": "fill", "pixelPanels": grid, "arg2": "\"#12\""}).to_string();

        let reply = reply_json(&message);

        assert_eq!(reply["func"], "fill");
        assert_eq!(reply["error"]["kind"], "InvalidColorFormat");

        let garbage = reply_json("{");
        assert_eq!(garbage["error"]["kind"], "MalformedMessage");
    }

    #[test]
    fn test_oversized_resize_is_rejected() {
        let side = u32::MAX;
        let request = FilterRequest::new("resize", &red_grid())
            .unwrap()
            .arg(2, &side)
            .unwrap()
            .arg(3, &side)
            .unwrap();
        let reply = reply_json(&serde_json::to_string(&request).unwrap());
        assert_eq!(reply["func"], "resize");
        assert_eq!(reply["error"]["kind"], "InvalidDimension");

        let request = FilterRequest::new("resize", &red_grid())
            .unwrap()
            .arg(2, &(u64::MAX / 2))
            .unwrap()
            .arg(3, &4)
            .unwrap();
        let reply = reply_json(&serde_json::to_string(&request).unwrap());
        assert_eq!(reply["error"]["kind"], "InvalidArgument");
    }

    #[test]
    fn test_extreme_channels_through_message() {
        let extreme = PixelGrid::new(1, 1, Pixel::new(i32::MAX, i32::MIN, 0, 255)).unwrap();
        let request = FilterRequest::new("combine", &extreme)
            .unwrap()
            .arg(2, &extreme)
            .unwrap();

        let reply = reply_json(&serde_json::to_string(&request).unwrap());

        let encoded = reply["pixelPanels"].as_str().unwrap();
        let grid: PixelGrid = serde_json::from_str(encoded).unwrap();
        assert_eq!(grid[(0, 0)].to_rgba8(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_panic_becomes_error_reply() {
        let reply = isolate("resize", || panic!("shape too large"));
        match reply {
            Err(WorkerError::Panicked { selector, message }) => {
                assert_eq!(selector, "resize");
                assert_eq!(message, "shape too large");
            }
            other => panic!("expected panic error, got {:?}", other),
        }

        let owned = isolate("invert", || panic!("{} rows", 3));
        assert!(matches!(owned, Err(WorkerError::Panicked { message, .. }) if message == "3 rows"));

        let request = FilterRequest::new("invert", &red_grid()).unwrap();
        assert!(isolate("invert", || handle_request(&request, &FilterOptions::default())).is_ok());
    }

    #[test]
    fn test_process_batch_keeps_order() {
        let grid = red_grid();
        let requests = vec![
            FilterRequest::new("invert", &grid).unwrap(),
            FilterRequest::new("nope", &grid).unwrap(),
            FilterRequest::new("rotate", &grid).unwrap(),
        ];

        let results = process_batch(&requests, &FilterOptions::default());

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().selector, "invert");
        assert!(matches!(results[1], Err(WorkerError::UnknownFilter(_))));
        assert_eq!(results[2].as_ref().unwrap().decode_grid().unwrap(), grid);
    }
}
