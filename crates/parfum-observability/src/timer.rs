//! Operation timing.

use std::time::{Duration, Instant};

/// Measures one operation and logs its duration when finished.
///
/// ```rust,ignore
/// let timer = OperationTimer::start("list_orders");
/// let orders = backend.list_orders(&filter).await?;
/// timer.finish_with(orders.len());
/// ```
#[derive(Debug)]
pub struct OperationTimer {
    operation: &'static str,
    started: Instant,
    finished: bool,
}

impl OperationTimer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            started: Instant::now(),
            finished: false,
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Log the duration and return it.
    pub fn finish(mut self) -> Duration {
        self.finished = true;
        let elapsed = self.elapsed();
        tracing::debug!(
            operation = self.operation,
            elapsed_ms = elapsed.as_millis() as u64,
            "operation finished"
        );
        elapsed
    }

    /// Log the duration together with a result count.
    pub fn finish_with(mut self, count: usize) -> Duration {
        self.finished = true;
        let elapsed = self.elapsed();
        tracing::debug!(
            operation = self.operation,
            elapsed_ms = elapsed.as_millis() as u64,
            count,
            "operation finished"
        );
        elapsed
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        // Dropped without finish(): the operation bailed out early.
        if !self.finished {
            tracing::debug!(
                operation = self.operation,
                elapsed_ms = self.elapsed().as_millis() as u64,
                "operation aborted"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_returns_elapsed() {
        let timer = OperationTimer::start("test");
        assert_eq!(timer.operation(), "test");
        std::thread::sleep(Duration::from_millis(2));
        assert!(timer.finish() >= Duration::from_millis(2));
    }

    #[test]
    fn test_drop_without_finish() {
        let timer = OperationTimer::start("bail");
        drop(timer);
    }
}
