#![allow(dead_code)]

use axum_test::TestServer;
use image::{GrayImage, Luma, Rgba, RgbaImage, imageops};
use tempfile::TempDir;
use whatsleft_redirect::config::Config;
use whatsleft_redirect::routes::app_router;
use whatsleft_redirect::state::AppState;

/// Writes placeholder flyer images into a fresh directory.
pub fn create_test_assets() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let layout = Config::default().flyer;
    std::fs::create_dir_all(dir.path().join("images")).unwrap();

    RgbaImage::from_pixel(680, 240, Rgba([20, 120, 90, 255]))
        .save(dir.path().join(&layout.teaser.file))
        .unwrap();
    RgbaImage::from_pixel(280, 80, Rgba([0, 0, 0, 128]))
        .save(dir.path().join(&layout.logo.file))
        .unwrap();

    dir
}

/// Builds a test server with default settings and the given assets directory.
pub fn create_test_server(assets: &TempDir) -> TestServer {
    let config = Config {
        assets_dir: assets.path().to_path_buf(),
        ..Config::default()
    };

    TestServer::new(app_router(AppState::new(config))).unwrap()
}

/// Decodes the single QR code in `png`, padded with a white quiet zone.
pub fn decode_qr_png(png: &[u8]) -> String {
    let bitmap = image::load_from_memory(png).unwrap().to_luma8();
    let border = 96;
    let size = bitmap.width() + 2 * border;
    let mut padded = GrayImage::from_pixel(size, size, Luma([255]));
    imageops::overlay(&mut padded, &bitmap, i64::from(border), i64::from(border));

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        padded.width() as usize,
        padded.height() as usize,
        |x, y| padded.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1);
    grids[0].decode().unwrap().1
}
