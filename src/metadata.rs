//! Gallery image captions.
//!
//! A gallery photo can carry an optional caption from a sidecar text file
//! with the same stem: `gallery/g1.jpg` + `gallery/g1.txt`. Plain text, no
//! special format, the convention photographers already use for album
//! descriptions, applied per image.
//!
//! Captions are resolved during discovery so the manifest carries the final
//! text; the generate stage never touches the content tree for metadata.

use std::path::Path;

/// Read the sidecar `.txt` for an image path.
///
/// Given `content/gallery/g1.jpg`, looks for `content/gallery/g1.txt` and
/// returns its trimmed contents. `None` if the file is missing or empty.
pub fn read_sidecar(image_path: &Path) -> Option<String> {
    let sidecar = image_path.with_extension("txt");
    std::fs::read_to_string(sidecar)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn sidecar_read_and_trimmed() {
        let tmp = TempDir::new().unwrap();
        let img = tmp.path().join("g1.jpg");
        fs::write(&img, "fake image").unwrap();
        fs::write(tmp.path().join("g1.txt"), "  Prize ceremony \n").unwrap();

        assert_eq!(read_sidecar(&img), Some("Prize ceremony".to_string()));
    }

    #[test]
    fn sidecar_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        let img = tmp.path().join("g1.jpg");
        fs::write(&img, "fake image").unwrap();

        assert_eq!(read_sidecar(&img), None);
    }

    #[test]
    fn sidecar_empty_is_none() {
        let tmp = TempDir::new().unwrap();
        let img = tmp.path().join("g1.jpg");
        fs::write(&img, "fake image").unwrap();
        fs::write(tmp.path().join("g1.txt"), "\n  \n").unwrap();

        assert_eq!(read_sidecar(&img), None);
    }
}
