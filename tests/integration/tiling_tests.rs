//! Properties of subset and concat, and grid geometry.

use raster_tiler::{concat, GridCell, Region, Tile, TileError, TileGrid};

use super::test_utils::{gradient, gradient_value};

// =============================================================================
// Subset
// =============================================================================

#[test]
fn test_full_subset_is_identity() {
    let source = gradient(37, 23);
    let copy = source.subset(0, 0, 37, 23).unwrap();
    assert_eq!(copy, source);
}

#[test]
fn test_subset_matches_source_pixels() {
    let source = gradient(50, 40);
    let (x0, y0, x1, y1) = (13, 7, 31, 29);
    let tile = source.subset(x0, y0, x1, y1).unwrap();

    assert_eq!(tile.dimensions(), (x1 - x0, y1 - y0));
    for j in 0..tile.height() {
        for i in 0..tile.width() {
            assert_eq!(tile.pixel(i, j), Some(gradient_value(x0 + i, y0 + j)));
        }
    }
}

#[test]
fn test_subset_composition() {
    let source = gradient(64, 48);

    let outer = source.subset(10, 5, 50, 40).unwrap();
    let nested = outer.subset(4, 6, 20, 30).unwrap();
    let direct = source.subset(14, 11, 30, 35).unwrap();

    assert_eq!(nested, direct);
}

#[test]
fn test_subset_boundaries_of_10x10() {
    let source = gradient(10, 10);

    let corner = source.subset(8, 8, 10, 10).unwrap();
    assert_eq!(corner.dimensions(), (2, 2));
    assert_eq!(corner.pixel(1, 1), Some(gradient_value(9, 9)));

    for (x0, y0, x1, y1) in [(8, 8, 11, 10), (8, 8, 10, 11), (5, 0, 5, 10), (0, 5, 10, 5), (6, 0, 4, 10)] {
        let err = source.subset(x0, y0, x1, y1).unwrap_err();
        match err {
            TileError::InvalidRegion {
                region,
                width,
                height,
            } => {
                assert_eq!(region, Region::new(x0, y0, x1, y1));
                assert_eq!((width, height), (10, 10));
            }
            other => panic!("Expected InvalidRegion for {:?}, got {:?}", (x0, y0, x1, y1), other),
        }
    }
}

#[test]
fn test_subset_output_is_independent() {
    let source = gradient(20, 20);
    let mut tile = source.subset(0, 0, 5, 5).unwrap();
    tile.data_mut().fill(0);

    assert_eq!(source.pixel(0, 0), Some(gradient_value(0, 0)));
    assert_eq!(source, gradient(20, 20));
}

// =============================================================================
// Concat
// =============================================================================

#[test]
fn test_single_tile_concat_is_a_copy() {
    let tile = gradient(12, 9);
    let mut out = concat(&[tile.clone()]).unwrap();
    assert_eq!(out, tile);

    out.data_mut()[0] ^= 0xFF;
    assert_ne!(out, tile);
    assert_eq!(tile, gradient(12, 9));
}

#[test]
fn test_split_then_concat_round_trip() {
    let (width, height, n) = (60, 17, 4);
    let source = gradient(width, height);
    let w = width / n;

    let pieces: Vec<Tile> = (0..n)
        .map(|k| source.subset(k * w, 0, (k + 1) * w, height).unwrap())
        .collect();

    assert_eq!(concat(&pieces).unwrap(), source);
}

#[test]
fn test_concat_places_pixels_side_by_side() {
    let a = Tile::from_fn(3, 2, |x, y| (10 * y + x) as u8).unwrap();
    let b = Tile::from_fn(3, 2, |x, y| (100 + 10 * y + x) as u8).unwrap();

    let out = concat(&[&a, &b]).unwrap();
    assert_eq!(out.dimensions(), (6, 2));
    assert_eq!(out.data(), &[0, 1, 2, 100, 101, 102, 10, 11, 12, 110, 111, 112]);

    for k in 0..2 {
        let src = if k == 0 { &a } else { &b };
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(out.pixel(k * 3 + x, y), src.pixel(x, y));
            }
        }
    }
}

#[test]
fn test_concat_rejects_mismatched_heights() {
    let tall = gradient(400, 400);
    let short = gradient(400, 300);

    let err = concat(&[tall, short]).unwrap_err();
    assert_eq!(
        err,
        TileError::DimensionMismatch {
            index: 1,
            expected_width: 400,
            expected_height: 400,
            width: 400,
            height: 300,
        }
    );
}

#[test]
fn test_concat_rejects_empty_input() {
    let tiles: [Tile; 0] = [];
    assert_eq!(concat(&tiles).unwrap_err(), TileError::EmptyInput);
}

#[test]
fn test_concat_leaves_inputs_untouched() {
    let tiles = vec![gradient(8, 8), gradient(8, 8)];
    let before = tiles.clone();
    let _ = concat(&tiles).unwrap();
    assert_eq!(tiles, before);
}

// =============================================================================
// Grid Geometry
// =============================================================================

#[test]
fn test_world_grid_geometry() {
    // Geometry only; the 21600x10800 raster itself is never allocated.
    let grid = TileGrid::square(21_600, 10_800, 400).unwrap();

    assert_eq!(grid.columns(), 54);
    assert_eq!(grid.rows(), 27);
    assert!(grid.is_exact());

    assert_eq!(
        grid.cell_region(GridCell::new(26, 7)).unwrap(),
        Region::new(10_400, 2_800, 10_800, 3_200)
    );
    assert_eq!(
        grid.row_span(7, 26, 30).unwrap(),
        Region::new(10_400, 2_800, 12_000, 3_200)
    );
}

#[test]
fn test_scaled_world_composite_matches_direct_subset() {
    // Same 54x27 grid as the world image at 1/20 scale.
    let source = gradient(1_080, 540);
    let grid = TileGrid::square(1_080, 540, 20).unwrap();
    assert_eq!((grid.columns(), grid.rows()), (54, 27));

    let tiles: Vec<Tile> = (26..30)
        .map(|col| {
            source
                .subset_region(grid.cell_region(GridCell::new(col, 7)).unwrap())
                .unwrap()
        })
        .collect();

    let composite = concat(&tiles).unwrap();
    assert_eq!(composite.dimensions(), (80, 20));

    let span = grid.row_span(7, 26, 30).unwrap();
    assert_eq!(span, Region::new(520, 140, 600, 160));
    assert_eq!(composite, source.subset_region(span).unwrap());
}

#[test]
fn test_ragged_grid_clips_edge_cells() {
    let source = gradient(25, 13);
    let grid = TileGrid::square(25, 13, 10).unwrap();

    assert_eq!((grid.columns(), grid.rows()), (3, 2));
    assert!(!grid.is_exact());

    let covered: usize = grid
        .cells()
        .map(|cell| grid.cell_region(cell).unwrap().area())
        .sum();
    assert_eq!(covered, 25 * 13);

    let corner = grid.cell_region(GridCell::new(2, 1)).unwrap();
    assert_eq!(corner, Region::new(20, 10, 25, 13));
    assert_eq!(source.subset_region(corner).unwrap().dimensions(), (5, 3));
}

#[test]
fn test_views_agree_with_subsets() {
    let source = gradient(30, 30);
    let region = Region::new(3, 4, 17, 21);

    let view = source.view(region).unwrap();
    let copy = source.subset_region(region).unwrap();

    assert_eq!(view.to_tile(), copy);
    for (view_row, copy_row) in view.rows().zip(copy.rows()) {
        assert_eq!(view_row, copy_row);
    }
}
