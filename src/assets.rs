use std::collections::HashMap;
use std::fs;
use std::path::Path;

use axum::body::Bytes;
use log::debug;

use crate::error::{HeartError, Result};

pub const LOGO: &str = "logo.png";
pub const BACKGROUND: &str = "heart.jpg";
pub const HIGH_RISK: &str = "high_risk.png";
pub const LOW_RISK: &str = "low_risk.png";

pub const ASSET_FILES: [&str; 4] = [LOGO, BACKGROUND, HIGH_RISK, LOW_RISK];

pub struct Asset {
    pub content_type: &'static str,
    pub bytes: Bytes,
}

/// Images held in memory for the lifetime of the server.
pub struct Assets {
    files: HashMap<&'static str, Asset>,
}

impl Assets {
    /// Reads every required image from `dir`. A single missing file fails the load.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut files = HashMap::new();
        for name in ASSET_FILES {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(HeartError::MissingAsset { path });
            }
            let bytes = fs::read(&path)?;
            debug!("loaded asset {:?} ({} bytes)", path, bytes.len());
            files.insert(
                name,
                Asset {
                    content_type: content_type(name),
                    bytes: Bytes::from(bytes),
                },
            );
        }
        Ok(Assets { files })
    }

    pub fn get(&self, name: &str) -> Option<&Asset> {
        self.files.get(name)
    }
}

fn content_type(name: &str) -> &'static str {
    match Path::new(name).extension().and_then(|ext| ext.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    #[test]
    fn loads_all_images() {
        let dir = tempfile::tempdir().unwrap();
        testutil::write_assets(dir.path());

        let assets = Assets::load(dir.path()).unwrap();
        let background = assets.get(BACKGROUND).unwrap();
        assert_eq!(background.content_type, "image/jpeg");
        assert_eq!(&background.bytes[..], b"fake heart.jpg");
        assert_eq!(assets.get(LOGO).unwrap().content_type, "image/png");
        assert!(assets.get("other.png").is_none());
    }

    #[test]
    fn missing_image_fails_the_load() {
        let dir = tempfile::tempdir().unwrap();
        testutil::write_assets(dir.path());
        fs::remove_file(dir.path().join(LOW_RISK)).unwrap();

        match Assets::load(dir.path()) {
            Err(HeartError::MissingAsset { path }) => assert!(path.ends_with(LOW_RISK)),
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }
}
