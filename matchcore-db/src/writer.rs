//! Chunked upsert writer: halves its batch size on a transient/serialization
//! failure and grows it back geometrically after a run of clean batches,
//! bottoming out at a configured floor rather than degenerating to
//! one-row-at-a-time forever.

use log::warn;

/// Tracks the writer's current batch size across calls to `write_all`.
pub struct BatchSizer {
    current: usize,
    ceiling: usize,
    floor: usize,
    clean_streak: u32,
}

impl BatchSizer {
    pub fn new(initial: usize, floor: usize) -> BatchSizer {
        BatchSizer { current: initial.max(floor), ceiling: initial.max(floor), floor, clean_streak: 0 }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    fn on_success(&mut self) {
        self.clean_streak += 1;
        if self.clean_streak >= 3 && self.current < self.ceiling {
            self.current = (self.current * 2).min(self.ceiling);
            self.clean_streak = 0;
        }
    }

    fn on_failure(&mut self) {
        self.clean_streak = 0;
        self.current = (self.current / 2).max(self.floor);
    }
}

/// Write every item in `items` through `write_batch`, shrinking/growing the
/// batch size per `BatchSizer`'s policy. `write_batch` returns `Ok(n)` for
/// `n` rows written, or `Err` on a transient failure that should trigger a
/// retry at a smaller batch size.
pub fn write_all<T, E>(
    items: &[T],
    sizer: &mut BatchSizer,
    mut write_batch: impl FnMut(&[T]) -> Result<usize, E>,
) -> Result<usize, E>
where
    E: std::fmt::Display,
{
    let mut offset = 0;
    let mut written = 0;
    while offset < items.len() {
        let end = (offset + sizer.current()).min(items.len());
        let batch = &items[offset..end];
        match write_batch(batch) {
            Ok(n) => {
                written += n;
                offset = end;
                sizer.on_success();
            }
            Err(e) => {
                if sizer.current() <= sizer.floor {
                    return Err(e);
                }
                warn!("batch write failed at size {}, retrying smaller: {e}", sizer.current());
                sizer.on_failure();
            }
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn shrinks_on_failure_and_eventually_succeeds() {
        let mut sizer = BatchSizer::new(8, 2);
        let items: Vec<i32> = (0..8).collect();
        let attempts = Cell::new(0);

        let result = write_all(&items, &mut sizer, |batch: &[i32]| -> Result<usize, String> {
            attempts.set(attempts.get() + 1);
            if batch.len() > 2 {
                Err("serialization failure".to_string())
            } else {
                Ok(batch.len())
            }
        });

        assert_eq!(result.unwrap(), 8);
        assert_eq!(sizer.current(), 2);
    }

    #[test]
    fn grows_back_after_a_clean_streak() {
        let mut sizer = BatchSizer::new(8, 1);
        sizer.current = 1;
        for _ in 0..3 {
            sizer.on_success();
        }
        assert_eq!(sizer.current(), 2);
    }

    #[test]
    fn never_shrinks_below_floor() {
        let mut sizer = BatchSizer::new(4, 2);
        sizer.on_failure();
        sizer.on_failure();
        sizer.on_failure();
        assert_eq!(sizer.current(), 2);
    }

    #[test]
    fn errors_out_once_floor_size_batch_fails() {
        let mut sizer = BatchSizer::new(2, 2);
        let items = vec![1, 2];
        let result = write_all(&items, &mut sizer, |_: &[i32]| -> Result<usize, String> {
            Err("permanent failure".to_string())
        });
        assert!(result.is_err());
    }
}
