//! Codec comparison on real imagery.
//!
//! Writes one buffer through each codec into a store, reads it back, checks
//! the bytes survived, and records sizes and timings.

use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::info;

use crate::codec::Compression;
use crate::error::{CodecError, PipelineError};
use crate::io::TileStore;

/// Outcome of benchmarking one codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecReport {
    pub codec: Compression,

    /// Uncompressed size in bytes
    pub raw_bytes: usize,

    /// Size as stored
    pub stored_bytes: usize,

    /// Compress + write
    pub write_time: Duration,

    /// Read + decompress
    pub read_time: Duration,
}

impl CodecReport {
    /// Stored size relative to the input, e.g. `0.25` for 4:1.
    pub fn ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            return 1.0;
        }
        self.stored_bytes as f64 / self.raw_bytes as f64
    }
}

/// Key a benchmark file is written under, e.g. `dat.snp`.
pub fn bench_key(stem: &str, codec: Compression) -> String {
    format!("{}.{}", stem, codec.extension())
}

/// Write `data` with `codec`, read it back and verify it.
pub async fn bench_codec<S: TileStore>(
    store: &S,
    stem: &str,
    data: &[u8],
    codec: Compression,
) -> Result<CodecReport, PipelineError> {
    let key = bench_key(stem, codec);

    let start = Instant::now();
    let packed = codec.compress(data)?;
    let stored_bytes = packed.len();
    store.write(&key, Bytes::from(packed)).await?;
    let write_time = start.elapsed();

    let start = Instant::now();
    let unpacked = codec.decompress(&store.read(&key).await?)?;
    let read_time = start.elapsed();

    if unpacked != data {
        return Err(CodecError::RoundTrip {
            codec: codec.name(),
            written: data.len(),
            read: unpacked.len(),
        }
        .into());
    }

    info!(
        %codec,
        raw = data.len(),
        stored = stored_bytes,
        ?write_time,
        ?read_time,
        "Benchmarked codec"
    );

    Ok(CodecReport {
        codec,
        raw_bytes: data.len(),
        stored_bytes,
        write_time,
        read_time,
    })
}

/// Benchmark every codec in `codecs`, in order.
pub async fn bench_codecs<S: TileStore>(
    store: &S,
    stem: &str,
    data: &[u8],
    codecs: &[Compression],
) -> Result<Vec<CodecReport>, PipelineError> {
    let mut reports = Vec::with_capacity(codecs.len());
    for &codec in codecs {
        reports.push(bench_codec(store, stem, data, codec).await?);
    }
    Ok(reports)
}
