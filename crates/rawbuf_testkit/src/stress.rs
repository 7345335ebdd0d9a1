//! Stress tests for RawBuf.
//!
//! These tests verify behavior under heavy sharing and concurrent access.

use crate::fixtures::tracked_buffer;
use rawbuf_core::{Buffer, GrowableBuffer, ReadingOptions, SearchOptions, WritingOptions};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }

    /// Prints a summary of the test.
    pub fn print_summary(&self, name: &str) {
        println!("\n=== {} ===", name);
        println!("Total operations: {}", self.total_ops);
        println!("Successful: {}", self.successful_ops);
        println!("Failed: {}", self.failed_ops);
        println!("Duration: {:?}", self.duration);
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of operations to perform.
    pub operations: usize,
    /// Number of concurrent threads.
    pub threads: usize,
    /// Size of each payload in bytes.
    pub payload_size: usize,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 10_000,
            threads: 4,
            payload_size: 256,
        }
    }
}

impl StressConfig {
    /// Creates a configuration small enough for unit tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            operations: 400,
            threads: 4,
            payload_size: 64,
        }
    }
}

fn payload(config: &StressConfig, fill: u8) -> Vec<u8> {
    let mut bytes = vec![fill; config.payload_size];
    bytes.extend_from_slice(b"marker");
    bytes
}

/// Run a sequential append stress test.
///
/// Each operation appends one payload; the final length is checked.
pub fn stress_sequential_appends(config: &StressConfig) -> StressTestResult {
    let chunk = payload(config, 0xAB);
    let mut buffer = GrowableBuffer::new();

    let start = Instant::now();
    for _ in 0..config.operations {
        buffer.append(&chunk);
    }
    let frozen = buffer.freeze();
    let elapsed = start.elapsed();

    if frozen.len() == chunk.len() * config.operations {
        StressTestResult::new(config.operations, 0, elapsed)
    } else {
        StressTestResult::new(0, config.operations, elapsed)
    }
}

/// Run a concurrent read stress test.
///
/// Every thread holds its own clone of one shared buffer and searches it.
pub fn stress_concurrent_reads(config: &StressConfig) -> StressTestResult {
    let buffer = Buffer::from_vec(payload(config, 0xCD));
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let ops_per_thread = config.operations / config.threads.max(1);

    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|_| {
            let buffer = buffer.clone();
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);

            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let options = SearchOptions::new().backwards(i % 2 == 0);
                    match buffer.find(b"marker", options) {
                        Some(range) if range.location == buffer.len() - 6 => {
                            successful.fetch_add(1, Ordering::Relaxed);
                        }
                        _ => {
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Run a clone-and-drop stress test across threads.
///
/// Counts as failed if the bytes are released before every clone is gone or
/// are released more than once.
pub fn stress_shared_release(config: &StressConfig) -> StressTestResult {
    let (buffer, probe) = tracked_buffer(&payload(config, 0xEF));
    let ops_per_thread = config.operations / config.threads.max(1);
    let failed = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|_| {
            let buffer = buffer.clone();
            let probe = probe.clone();
            let failed = Arc::clone(&failed);

            thread::spawn(move || {
                for _ in 0..ops_per_thread {
                    let clone = buffer.clone();
                    drop(clone);
                    if probe.released() {
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    drop(buffer);
    let elapsed = start.elapsed();
    let mut failed = failed.load(Ordering::Relaxed);
    if probe.releases() != 1 {
        failed += 1;
    }

    let total = ops_per_thread * config.threads;
    StressTestResult::new(total.saturating_sub(failed), failed, elapsed)
}

/// Run a concurrent atomic write stress test against one target file.
///
/// Writers replace `target` with whole payloads while readers check that
/// every read sees exactly one complete payload.
pub fn stress_atomic_replace(target: &Path, config: &StressConfig) -> StressTestResult {
    let first = Buffer::from_vec(payload(config, 0));
    first
        .write_to(target, WritingOptions::new().atomic(true))
        .expect("Failed to write initial payload");

    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let ops_per_thread = config.operations / config.threads.max(1);
    let expected_len = config.payload_size + 6;

    let start = Instant::now();

    let handles: Vec<_> = (0..config.threads)
        .map(|t| {
            let target = target.to_path_buf();
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let fill = u8::try_from(t % 255 + 1).unwrap_or(1);
            let writer = Buffer::from_vec(payload(config, fill));

            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let ok = if (t + i) % 2 == 0 {
                        writer.write_to(&target, WritingOptions::new().atomic(true)).is_ok()
                    } else {
                        Buffer::read_from(&target, ReadingOptions::new())
                            .map(|read| is_whole_payload(&read, expected_len))
                            .unwrap_or(false)
                    };
                    let counter = if ok { &successful } else { &failed };
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

fn is_whole_payload(read: &Buffer, expected_len: usize) -> bool {
    let bytes = read.as_bytes();
    match bytes.split_last_chunk::<6>() {
        Some((body, b"marker")) if bytes.len() == expected_len => {
            body.iter().all(|&b| Some(&b) == body.first())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TempWorkspace;

    #[test]
    fn test_sequential_appends() {
        let result = stress_sequential_appends(&StressConfig::quick());
        assert_eq!(result.failed_ops, 0);
        assert_eq!(result.successful_ops, 400);
    }

    #[test]
    fn test_concurrent_reads() {
        let result = stress_concurrent_reads(&StressConfig::quick());
        assert_eq!(result.failed_ops, 0);
        assert_eq!(result.successful_ops, 400);
    }

    #[test]
    fn test_shared_release() {
        let result = stress_shared_release(&StressConfig::quick());
        assert_eq!(result.failed_ops, 0);
    }

    #[test]
    fn test_atomic_replace() {
        let workspace = TempWorkspace::new();
        let config = StressConfig {
            operations: 80,
            ..StressConfig::quick()
        };
        let result = stress_atomic_replace(&workspace.path("target.bin"), &config);
        assert_eq!(result.failed_ops, 0);
        assert_eq!(workspace.entries(), vec!["target.bin"]);
    }
}
