//! End-to-end tests: persist grids, stitch composites, encode output.

use raster_tiler::error::{CodecError, GridError, PipelineError, StoreError, TileError};
use raster_tiler::{
    decode_image, encode_gray_png, encode_interleaved_png, Compression, FsTileStore, GridCell,
    Tile, TileGrid, TileStore, TilingService, MANIFEST_KEY,
};

use super::test_utils::{gradient, rgb_image, scratch_dir, TrackingMockStore};

// =============================================================================
// Grid Persistence
// =============================================================================

#[tokio::test]
async fn test_every_codec_reproduces_the_source_row() {
    let source = gradient(120, 60);
    let grid = TileGrid::square(120, 60, 20).unwrap();

    for codec in Compression::ALL {
        let store = TrackingMockStore::new(format!("mock://{}", codec));
        let service = TilingService::new(store.clone());

        let manifest = service.write_grid(&source, grid, codec).await.unwrap();
        assert_eq!(store.write_count(), 6 * 3 + 1, "codec {}", codec);

        let composite = service.assemble_row(&manifest, 1, 2, 5).await.unwrap();
        let expected = source
            .subset_region(grid.row_span(1, 2, 5).unwrap())
            .unwrap();
        assert_eq!(composite, expected, "codec {}", codec);
    }
}

#[tokio::test]
async fn test_tile_keys_follow_naming_scheme() {
    let store = TrackingMockStore::new("mock://names");
    let service = TilingService::new(store.clone());
    let grid = TileGrid::square(30, 20, 10).unwrap();

    service
        .write_grid(&gradient(30, 20), grid, Compression::Snappy)
        .await
        .unwrap();

    assert_eq!(
        store.keys().await,
        vec![
            MANIFEST_KEY.to_string(),
            "tile_00_00.snp".to_string(),
            "tile_00_01.snp".to_string(),
            "tile_01_00.snp".to_string(),
            "tile_01_01.snp".to_string(),
            "tile_02_00.snp".to_string(),
            "tile_02_01.snp".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_write_grid_rejects_foreign_grid() {
    let service = TilingService::new(TrackingMockStore::new("mock://foreign"));
    let grid = TileGrid::square(40, 40, 10).unwrap();

    let result = service
        .write_grid(&gradient(30, 40), grid, Compression::Raw)
        .await;
    assert!(matches!(
        result,
        Err(PipelineError::Grid(GridError::ImageMismatch {
            grid_width: 40,
            width: 30,
            ..
        }))
    ));
}

// =============================================================================
// Cache Reuse
// =============================================================================

#[tokio::test]
async fn test_overlapping_composites_reuse_decoded_tiles() {
    let store = TrackingMockStore::new("mock://cache");
    let service = TilingService::new(store.clone());
    let grid = TileGrid::square(80, 40, 10).unwrap();

    let manifest = service
        .write_grid(&gradient(80, 40), grid, Compression::Lz4)
        .await
        .unwrap();
    store.reset_tracking();

    service.assemble_row(&manifest, 2, 0, 4).await.unwrap();
    assert_eq!(store.read_count(), 4);

    // Columns 2 and 3 are already decoded
    service.assemble_row(&manifest, 2, 2, 6).await.unwrap();
    assert_eq!(store.read_count(), 6);

    let fetch = service
        .fetch_tile(&manifest, GridCell::new(5, 2))
        .await
        .unwrap();
    assert!(fetch.cache_hit);

    let (size, _, entries) = service.cache_stats().await;
    assert_eq!(entries, 6);
    assert_eq!(size, 6 * 10 * 10);

    service.clear_cache().await;
    let fetch = service
        .fetch_tile(&manifest, GridCell::new(5, 2))
        .await
        .unwrap();
    assert!(!fetch.cache_hit);
    assert_eq!(store.read_count(), 7);
}

#[tokio::test]
async fn test_rewriting_a_grid_invalidates_decoded_tiles() {
    let store = TrackingMockStore::new("mock://rewrite");
    let service = TilingService::new(store.clone());
    let fine = TileGrid::square(40, 20, 10).unwrap();

    let manifest = service
        .write_grid(&gradient(40, 20), fine, Compression::Gzip)
        .await
        .unwrap();
    service.assemble_row(&manifest, 0, 0, 4).await.unwrap();

    let flat = Tile::new(vec![9; 800], 40, 20).unwrap();
    let manifest = service
        .write_grid(&flat, fine, Compression::Gzip)
        .await
        .unwrap();
    store.reset_tracking();

    let row = service.assemble_row(&manifest, 0, 0, 4).await.unwrap();
    assert_eq!(store.read_count(), 4);
    assert!(row.data().iter().all(|&v| v == 9));

    let coarse = TileGrid::square(40, 20, 20).unwrap();
    let manifest = service
        .write_grid(&flat, coarse, Compression::Snappy)
        .await
        .unwrap();

    let strip = service.assemble_row(&manifest, 0, 0, 2).await.unwrap();
    assert_eq!(strip, flat);
}

// =============================================================================
// Failure Paths
// =============================================================================

#[tokio::test]
async fn test_missing_tile_is_reported() {
    let store = TrackingMockStore::new("mock://missing");
    let service = TilingService::new(store.clone());
    let grid = TileGrid::square(40, 10, 10).unwrap();
    let manifest = service
        .write_grid(&gradient(40, 10), grid, Compression::Raw)
        .await
        .unwrap();

    store.remove("tile_02_00.raw").await;

    let result = service.assemble_row(&manifest, 0, 0, 4).await;
    match result {
        Err(PipelineError::Store(StoreError::NotFound(key))) => assert_eq!(key, "tile_02_00.raw"),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_corrupt_tile_is_reported() {
    let store = TrackingMockStore::new("mock://corrupt");
    let service = TilingService::new(store.clone());
    let grid = TileGrid::square(20, 10, 10).unwrap();
    let manifest = service
        .write_grid(&gradient(20, 10), grid, Compression::Snappy)
        .await
        .unwrap();

    store.overwrite("tile_01_00.snp", vec![0x0A, 0x00]).await;

    let result = service.read_tile(&manifest, GridCell::new(1, 0)).await;
    assert!(matches!(
        result,
        Err(PipelineError::Codec(CodecError::Decompress { codec: "snappy", .. }))
    ));
}

#[tokio::test]
async fn test_truncated_raw_tile_is_reported() {
    let store = TrackingMockStore::new("mock://truncated");
    let service = TilingService::new(store.clone());
    let grid = TileGrid::square(20, 10, 10).unwrap();
    let manifest = service
        .write_grid(&gradient(20, 10), grid, Compression::Raw)
        .await
        .unwrap();

    store.overwrite("tile_00_00.raw", vec![0; 60]).await;

    let result = service.read_tile(&manifest, GridCell::new(0, 0)).await;
    assert!(matches!(
        result,
        Err(PipelineError::Tile(TileError::BufferSizeMismatch {
            expected: 100,
            actual: 60,
            ..
        }))
    ));
}

#[tokio::test]
async fn test_clipped_edge_cell_cannot_join_full_cells() {
    let service = TilingService::new(TrackingMockStore::new("mock://ragged"));
    let grid = TileGrid::square(25, 10, 10).unwrap();
    let manifest = service
        .write_grid(&gradient(25, 10), grid, Compression::Raw)
        .await
        .unwrap();

    let result = service.assemble_row(&manifest, 0, 1, 3).await;
    assert!(matches!(
        result,
        Err(PipelineError::Tile(TileError::DimensionMismatch {
            index: 1,
            width: 5,
            ..
        }))
    ));
}

// =============================================================================
// Filesystem + PNG
// =============================================================================

#[tokio::test]
async fn test_filesystem_grid_to_png_composite() {
    let dir = scratch_dir("fs_png");
    let source = gradient(200, 100);
    let grid = TileGrid::square(200, 100, 40).unwrap();

    {
        let service = TilingService::new(FsTileStore::new(&dir));
        service
            .write_grid(&source, grid, Compression::Gzip)
            .await
            .unwrap();
    }

    assert!(dir.join(MANIFEST_KEY).exists());
    assert!(dir.join("tile_04_02.gz").exists());

    // A fresh service only knows the directory
    let service = TilingService::new(FsTileStore::new(&dir));
    assert!(service.store().exists(MANIFEST_KEY).await.unwrap());
    let manifest = service.load_manifest().await.unwrap();
    assert_eq!(manifest.compression, Compression::Gzip);

    let composite = service.assemble_row(&manifest, 1, 1, 4).await.unwrap();
    assert_eq!(composite.dimensions(), (120, 40));

    let png = encode_gray_png(&composite).unwrap();
    let decoded = decode_image(&png).unwrap();
    assert_eq!(decoded.channels, 1);
    assert_eq!(decoded.channel_tile(0).unwrap(), composite);
    assert_eq!(
        composite,
        source
            .subset_region(grid.row_span(1, 1, 4).unwrap())
            .unwrap()
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn test_rgb_channel_grid_round_trip() {
    let dir = scratch_dir("rgb_channel");
    let (width, height) = (60, 30);

    let png = encode_interleaved_png(&rgb_image(width, height), width, height, 3).unwrap();
    let image = decode_image(&png).unwrap();
    assert_eq!(image.channels, 3);

    // Channel 1 holds the x coordinate
    let green = image.channel_tile(1).unwrap();
    assert_eq!(green.pixel(42, 17), Some(42));

    let grid = TileGrid::square(width, height, 15).unwrap();
    let service = TilingService::new(FsTileStore::new(&dir));
    let manifest = service
        .write_grid(&green, grid, Compression::Lz4)
        .await
        .unwrap();

    let row = service.assemble_row(&manifest, 1, 0, 4).await.unwrap();
    assert_eq!(row, green.subset(0, 15, 60, 30).unwrap());

    let _ = std::fs::remove_dir_all(&dir);
}
