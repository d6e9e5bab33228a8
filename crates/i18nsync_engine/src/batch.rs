//! Fixed-size batching of remote writes.

use crate::config::{DEFAULT_BATCH_DELAY, MAX_BATCH_SIZE};
use crate::error::SyncResult;
use std::time::Duration;
use tracing::info;

/// Pauses between batches.
pub trait Sleeper {
    /// Blocks for `duration`.
    fn sleep(&self, duration: Duration);
}

/// A [`Sleeper`] that blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Applies an operation to a sequence in fixed-size chunks.
///
/// Chunks run one after another, never concurrently, with a pause between
/// consecutive chunks. The first failing chunk stops the run; chunks already
/// applied are not rolled back.
#[derive(Debug, Clone)]
pub struct BatchWriter<S: Sleeper = ThreadSleeper> {
    batch_size: usize,
    delay: Duration,
    sleeper: S,
}

impl BatchWriter<ThreadSleeper> {
    /// Creates a writer with the given chunk size, clamped to
    /// `1..=MAX_BATCH_SIZE`, and inter-chunk delay.
    pub fn new(batch_size: usize, delay: Duration) -> Self {
        Self {
            batch_size: batch_size.clamp(1, MAX_BATCH_SIZE),
            delay,
            sleeper: ThreadSleeper,
        }
    }
}

impl Default for BatchWriter<ThreadSleeper> {
    fn default() -> Self {
        Self::new(MAX_BATCH_SIZE, DEFAULT_BATCH_DELAY)
    }
}

impl<S: Sleeper> BatchWriter<S> {
    /// Replaces the sleeper.
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> BatchWriter<T> {
        BatchWriter {
            batch_size: self.batch_size,
            delay: self.delay,
            sleeper,
        }
    }

    /// Returns the chunk size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the pause between chunks.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `op` over `items` chunk by chunk and collects the results.
    ///
    /// # Errors
    ///
    /// The first error from `op` is returned as
    /// [`SyncError::BatchOperation`](crate::SyncError::BatchOperation)
    /// carrying the 1-based chunk number.
    pub fn run<T, R, F>(&self, items: &[T], mut op: F) -> SyncResult<Vec<R>>
    where
        F: FnMut(&[T]) -> SyncResult<Vec<R>>,
    {
        let total = items.len();
        let mut results = Vec::with_capacity(total);
        let mut processed = 0usize;

        for (index, chunk) in items.chunks(self.batch_size).enumerate() {
            if index > 0 {
                self.sleeper.sleep(self.delay);
            }

            let output = op(chunk).map_err(|e| e.into_batch(index + 1))?;
            results.extend(output);

            processed += chunk.len();
            info!("processed {processed}/{total} records");
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Call(usize),
        Pause(Duration),
    }

    #[derive(Clone, Default)]
    struct RecordingSleeper {
        events: Rc<RefCell<Vec<Event>>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.events.borrow_mut().push(Event::Pause(duration));
        }
    }

    fn writer(events: &Rc<RefCell<Vec<Event>>>) -> BatchWriter<RecordingSleeper> {
        BatchWriter::new(10, Duration::from_millis(200)).with_sleeper(RecordingSleeper {
            events: Rc::clone(events),
        })
    }

    #[test]
    fn twenty_three_items_make_three_calls_with_two_pauses() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let items: Vec<u32> = (0..23).collect();

        let results = writer(&events)
            .run(&items, |chunk| {
                events.borrow_mut().push(Event::Call(chunk.len()));
                Ok(chunk.to_vec())
            })
            .unwrap();

        assert_eq!(results, items);
        let pause = Event::Pause(Duration::from_millis(200));
        assert_eq!(
            *events.borrow(),
            vec![
                Event::Call(10),
                pause.clone(),
                Event::Call(10),
                pause,
                Event::Call(3),
            ]
        );
    }

    #[test]
    fn single_chunk_has_no_pause() {
        let events = Rc::new(RefCell::new(Vec::new()));
        writer(&events)
            .run(&[1, 2, 3], |chunk| {
                events.borrow_mut().push(Event::Call(chunk.len()));
                Ok(Vec::<()>::new())
            })
            .unwrap();

        assert_eq!(*events.borrow(), vec![Event::Call(3)]);
    }

    #[test]
    fn empty_input_makes_no_calls() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let results = writer(&events)
            .run(&Vec::<u8>::new(), |_| -> SyncResult<Vec<u8>> {
                panic!("must not be called")
            })
            .unwrap();

        assert!(results.is_empty());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn failure_aborts_remaining_chunks() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let items: Vec<u32> = (0..30).collect();

        let err = writer(&events)
            .run(&items, |chunk| {
                let call = events
                    .borrow()
                    .iter()
                    .filter(|e| matches!(e, Event::Call(_)))
                    .count();
                events.borrow_mut().push(Event::Call(chunk.len()));
                if call == 1 {
                    Err(SyncError::remote(422, "INVALID_VALUE_FOR_COLUMN"))
                } else {
                    Ok(chunk.to_vec())
                }
            })
            .unwrap_err();

        assert!(matches!(
            err,
            SyncError::BatchOperation {
                batch: 2,
                status: Some(422),
                ..
            }
        ));
        let calls = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Call(_)))
            .count();
        assert_eq!(calls, 2);
    }

    #[test]
    fn zero_batch_size_is_treated_as_one() {
        let writer = BatchWriter::new(0, Duration::ZERO);
        assert_eq!(writer.batch_size(), 1);
    }

    #[test]
    fn oversized_batches_are_capped_at_the_request_limit() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let writer = BatchWriter::new(50, Duration::ZERO).with_sleeper(RecordingSleeper {
            events: Rc::clone(&events),
        });
        assert_eq!(writer.batch_size(), MAX_BATCH_SIZE);

        let items: Vec<u32> = (0..25).collect();
        writer
            .run(&items, |chunk| {
                events.borrow_mut().push(Event::Call(chunk.len()));
                Ok(Vec::<()>::new())
            })
            .unwrap();

        let calls: Vec<Event> = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Event::Call(_)))
            .cloned()
            .collect();
        assert_eq!(calls, vec![Event::Call(10), Event::Call(10), Event::Call(5)]);
    }
}
