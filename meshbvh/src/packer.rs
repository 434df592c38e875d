//! Splitting of flattened arrays into chunks that fit within a single
//! storage buffer.
//!
//! Consumers bind each chunk separately and redirect reads at or past
//! [`BufferChunks::split()`] into the second one (see `gpu::ChunkedView`).

use std::mem;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferChunks<'a, T> {
    first: &'a [T],
    second: &'a [T],
}

impl<'a, T> BufferChunks<'a, T> {
    pub fn first(&self) -> &'a [T] {
        self.first
    }

    pub fn second(&self) -> &'a [T] {
        self.second
    }

    /// Number of records in the first chunk.
    pub fn split(&self) -> u32 {
        self.first.len() as u32
    }

    /// Fails if either chunk on its own exceeds `max_bytes`.
    pub fn check_limit(
        &self,
        label: &'static str,
        max_bytes: u64,
    ) -> Result<()> {
        check_limit::<T>(label, self.first.len(), max_bytes)?;
        check_limit::<T>(label, self.second.len(), max_bytes)?;

        Ok(())
    }
}

/// Splits `records` into two halves, with the first one getting the extra
/// record for odd lengths.
pub fn pack<T>(records: &[T]) -> BufferChunks<'_, T> {
    let half = records.len().div_ceil(2);
    let (first, second) = records.split_at(half);

    BufferChunks { first, second }
}

/// Splits `records` into as few chunks as needed for each of them to take at
/// most `max_bytes`, keeping the chunks as equal as possible; like in
/// [`pack()`], the leading chunks get the extra records.
pub fn pack_with_limit<T>(
    records: &[T],
    max_bytes: u64,
) -> Result<Vec<&[T]>> {
    let record_size = mem::size_of::<T>() as u64;
    let records_per_chunk = max_bytes / record_size.max(1);

    if records_per_chunk == 0 {
        return Err(Error::BufferTooLarge {
            label: "record",
            size: record_size,
            limit: max_bytes,
        });
    }

    let chunk_count = records.len().div_ceil(records_per_chunk as usize);
    let mut chunks = Vec::with_capacity(chunk_count);
    let mut rest = records;

    for chunk_id in 0..chunk_count {
        let len = records.len() / chunk_count
            + usize::from(chunk_id < records.len() % chunk_count);

        let (chunk, tail) = rest.split_at(len);

        chunks.push(chunk);
        rest = tail;
    }

    Ok(chunks)
}

fn check_limit<T>(
    label: &'static str,
    len: usize,
    max_bytes: u64,
) -> Result<()> {
    let size = (len * mem::size_of::<T>()) as u64;

    if size > max_bytes {
        Err(Error::BufferTooLarge {
            label,
            size,
            limit: max_bytes,
        })
    } else {
        Ok(())
    }
}

pub(crate) fn check_single_buffer<T>(
    label: &'static str,
    records: &[T],
    max_bytes: u64,
) -> Result<()> {
    check_limit::<T>(label, records.len(), max_bytes)
}

#[cfg(test)]
mod tests {
    use glam::{vec4, Vec4};

    use super::*;

    fn records(count: usize) -> Vec<Vec4> {
        (0..count).map(|i| vec4(i as f32, 0.0, 0.0, 1.0)).collect()
    }

    #[test]
    fn pack_even() {
        let records = records(100);
        let target = pack(&records);

        assert_eq!(50, target.split());
        assert_eq!(50, target.first().len());
        assert_eq!(50, target.second().len());
        assert_eq!(records, [target.first(), target.second()].concat());
    }

    #[test]
    fn pack_odd() {
        let records = records(7);
        let target = pack(&records);

        assert_eq!(4, target.split());
        assert_eq!(3, target.second().len());
        assert_eq!(records, [target.first(), target.second()].concat());

        let records = records[..1].to_vec();
        let target = pack(&records);

        assert_eq!(1, target.split());
        assert!(target.second().is_empty());
    }

    #[test]
    fn check_limit() {
        let records = records(100);
        let target = pack(&records);

        assert_eq!(Ok(()), target.check_limit("positions", 50 * 16));

        assert_eq!(
            Err(Error::BufferTooLarge {
                label: "positions",
                size: 50 * 16,
                limit: 50 * 16 - 1,
            }),
            target.check_limit("positions", 50 * 16 - 1)
        );
    }

    #[test]
    fn pack_with_limit() {
        let records = records(10);

        let chunks = super::pack_with_limit(&records, 4 * 16).unwrap();

        let lens: Vec<_> = chunks.iter().map(|chunk| chunk.len()).collect();

        assert_eq!(vec![4, 3, 3], lens);
        assert_eq!(records, chunks.concat());

        // Two chunks split exactly like `pack()` does
        let records = records[..7].to_vec();
        let chunks = super::pack_with_limit(&records, 4 * 16).unwrap();

        assert_eq!(pack(&records).first(), chunks[0]);
        assert_eq!(pack(&records).second(), chunks[1]);

        let records: Vec<Vec4> = Vec::new();

        assert!(super::pack_with_limit(&records, 16).unwrap().is_empty());

        let records = self::records(10);

        let chunks = super::pack_with_limit(&records, 1024).unwrap();

        assert_eq!(1, chunks.len());

        assert_eq!(
            Err(Error::BufferTooLarge {
                label: "record",
                size: 16,
                limit: 15,
            }),
            super::pack_with_limit(&records, 15)
        );
    }
}
