use std::io::{self, Write};
use std::sync::Arc;

use sheetsync_client::{ClientError, RecordService, UploadFile};
use sheetsync_view::{Completion, Effect, Step, ViewConfig, ViewController};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::command::{self, Command, HELP};
use crate::render;

enum Flow {
    Continue,
    Wait,
    Quit,
}

struct Console<'a, S, W> {
    view: ViewController,
    service: Arc<S>,
    completions: mpsc::UnboundedSender<Completion>,
    out: &'a mut W,
}

/// Reads commands from `input` until it ends or `quit`, runs every remote
/// call on the blocking pool, and writes tables and messages to `out`.
///
/// Calls overlap freely; late or superseded page responses are settled by
/// the view's ordering rule. Returns once input is done and nothing is in
/// flight.
pub async fn run<S, R, W>(
    config: &ViewConfig,
    service: Arc<S>,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    S: RecordService + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut console = Console {
        view: ViewController::new(config),
        service,
        completions: tx,
        out,
    };
    let mut lines = input.lines();
    let mut input_done = false;
    let mut waiting = false;

    loop {
        let idle = console.view.in_flight() == 0;
        if input_done && idle {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if !input_done && (idle || !waiting) => {
                match line? {
                    Some(line) => match console.command(&line)? {
                        Flow::Continue => waiting = false,
                        Flow::Wait => waiting = true,
                        Flow::Quit => input_done = true,
                    },
                    None => input_done = true,
                }
            }
            Some(completion) = rx.recv() => console.completion(completion)?,
            else => break,
        }
    }
    console.out.flush()
}

impl<S, W> Console<'_, S, W>
where
    S: RecordService + 'static,
    W: Write,
{
    fn command(&mut self, line: &str) -> io::Result<Flow> {
        let command = match command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(self.out, "{e}")?;
                return Ok(Flow::Continue);
            }
        };

        let step = match command {
            Command::File(path) => {
                self.pick(&path)?;
                return Ok(Flow::Continue);
            }
            Command::Upload(path) => {
                if let Some(path) = path {
                    if !self.pick(&path)? {
                        return Ok(Flow::Continue);
                    }
                }
                match self.view.upload() {
                    Ok(step) => step,
                    Err(e) => {
                        writeln!(self.out, "{e}")?;
                        return Ok(Flow::Continue);
                    }
                }
            }
            Command::View => self.view.view_data(),
            Command::Search(term) => self.view.search(&term),
            Command::Next => self.view.next(),
            Command::Prev => self.view.prev(),
            Command::Delete(position) => {
                let snapshot = self.view.snapshot();
                match snapshot.record_ids.get(position - 1) {
                    Some(record_id) => self.view.delete(record_id.clone()),
                    None => {
                        writeln!(self.out, "No row {position} on this page.")?;
                        return Ok(Flow::Continue);
                    }
                }
            }
            Command::Show => {
                self.show()?;
                return Ok(Flow::Continue);
            }
            Command::Json => {
                let text = serde_json::to_string_pretty(&self.view.snapshot())
                    .map_err(io::Error::other)?;
                writeln!(self.out, "{text}")?;
                return Ok(Flow::Continue);
            }
            Command::Wait => return Ok(Flow::Wait),
            Command::Help => {
                writeln!(self.out, "{HELP}")?;
                return Ok(Flow::Continue);
            }
            Command::Quit => return Ok(Flow::Quit),
        };

        // Filtering and no-op navigation change the view without a call.
        let local_only = step.effects.is_empty();
        self.apply(step)?;
        if local_only && self.view.in_flight() == 0 {
            self.show()?;
        }
        Ok(Flow::Continue)
    }

    fn pick(&mut self, path: &str) -> io::Result<bool> {
        match UploadFile::from_path(path) {
            Ok(file) => {
                writeln!(self.out, "Selected {} ({} bytes).", file.name, file.bytes.len())?;
                self.view.select_file(Some(file));
                Ok(true)
            }
            Err(e) => {
                writeln!(self.out, "Could not read {path}: {e}")?;
                Ok(false)
            }
        }
    }

    fn completion(&mut self, completion: Completion) -> io::Result<()> {
        let failure = match &completion {
            Completion::Uploaded(..) => "Upload failed",
            Completion::Fetched(..) => "Error fetching data",
            Completion::Deleted(..) => "Error deleting record",
        };
        match self.view.complete(completion) {
            Ok(step) => self.apply(step)?,
            Err(e) => {
                warn!(error = %e, "{failure}");
                writeln!(self.out, "{failure}: {e}")?;
            }
        }
        if self.view.in_flight() == 0 {
            self.show()?;
        }
        Ok(())
    }

    fn apply(&mut self, step: Step) -> io::Result<()> {
        for notice in &step.notices {
            for line in render::notice(notice) {
                writeln!(self.out, "{line}")?;
            }
        }
        for effect in step.effects {
            self.dispatch(effect);
        }
        Ok(())
    }

    fn dispatch(&self, effect: Effect) {
        match &effect {
            Effect::Upload(request) => debug!(file = %request.file.name, "dispatching upload"),
            Effect::Fetch(request) => debug!(seq = request.seq, offset = request.offset, "dispatching fetch"),
            Effect::Delete(request) => debug!(record_id = %request.record_id, "dispatching delete"),
        }
        let service = Arc::clone(&self.service);
        let completions = self.completions.clone();
        let fallback = effect.clone();
        let call = tokio::task::spawn_blocking(move || effect.run(service.as_ref()));
        tokio::spawn(async move {
            let completion = match call.await {
                Ok(completion) => completion,
                Err(e) => {
                    warn!(error = %e, "request task did not finish");
                    fallback.fail(ClientError::Connection(format!("request task failed: {e}")))
                }
            };
            // The receiver only goes away once the loop has returned.
            let _ = completions.send(completion);
        });
    }

    fn show(&mut self) -> io::Result<()> {
        let table = render::table(&self.view.snapshot());
        write!(self.out, "{table}")
    }
}
