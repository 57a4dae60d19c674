use std::{
    io,
    sync::{Arc, Mutex, PoisonError},
};

use rsync_command::logging::LOG_ENV;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

/// A shared byte buffer; every clone appends to the same log.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Captures everything logged on the current thread while it is alive.
///
/// The log level is set through [`LOG_ENV`]; its previous value is put back on drop.
pub struct MemorySubscriber {
    buffer: LogBuffer,
    previous_level: Option<String>,
    _guard: DefaultGuard,
}

impl MemorySubscriber {
    pub fn new(log_level: tracing::Level) -> Self {
        let previous_level = std::env::var(LOG_ENV).ok();
        std::env::set_var(LOG_ENV, log_level.to_string());

        let buffer = LogBuffer::default();
        let subscriber = rsync_command::logging::get_subscriber_with_writer(buffer.clone());
        Self {
            buffer,
            previous_level,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn output_string(&self) -> String {
        self.buffer.contents()
    }
}

impl Drop for MemorySubscriber {
    fn drop(&mut self) {
        match &self.previous_level {
            Some(level) => std::env::set_var(LOG_ENV, level),
            None => std::env::remove_var(LOG_ENV),
        }
    }
}

impl Default for MemorySubscriber {
    fn default() -> Self {
        Self::new(tracing::Level::INFO)
    }
}
