use embassy_time::Duration;

/// Receives the raw text of every read pass together with the time it took.
///
/// Used for link diagnostics, e.g. persisting a transcript to storage.
pub trait Observer {
    fn record(&mut self, raw: &str, elapsed: Duration);
}

/// Discards every pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn record(&mut self, _raw: &str, _elapsed: Duration) {}
}

/// Forwards every pass to the crate's `log`/`defmt` output at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn record(&mut self, raw: &str, elapsed: Duration) {
        trace!("[{} ms] {:?}", elapsed.as_millis(), raw);
    }
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn record(&mut self, raw: &str, elapsed: Duration) {
        (**self).record(raw, elapsed)
    }
}
