//! Device identifier - 32 lowercase hex characters, persisted to a file

use std::fs;
use std::io;
use std::path::Path;

use rand::RngCore;
use tracing::{info, warn};

pub const DEVICE_ID_LEN: usize = 32;

/// Fresh random identifier
pub fn generate_device_id() -> String {
    let mut bytes = [0u8; DEVICE_ID_LEN / 2];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn validate_device_id(id: &str) -> bool {
    id.len() == DEVICE_ID_LEN && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Read the identifier at `path`, replacing it when missing or malformed
pub fn load_or_create(path: &Path) -> io::Result<String> {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let id = contents.trim();
            if validate_device_id(id) {
                return Ok(id.to_string());
            }
            warn!(path = %path.display(), "Stored device id is malformed, regenerating");
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let id = generate_device_id();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &id)?;
    info!(path = %path.display(), "Generated new device id");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("gesture_shooter_{}_{}", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn generated_ids_are_valid() {
        for _ in 0..20 {
            assert!(validate_device_id(&generate_device_id()));
        }
    }

    #[test]
    fn validation_rejects_bad_ids() {
        assert!(!validate_device_id("abc"));
        assert!(!validate_device_id(&"A".repeat(32)));
        assert!(!validate_device_id(&"g".repeat(32)));
        assert!(validate_device_id(&"0f".repeat(16)));
    }

    #[test]
    fn id_is_persisted_and_reused() {
        let path = temp_path("persist");
        let first = load_or_create(&path).unwrap();
        let second = load_or_create(&path).unwrap();
        assert_eq!(first, second);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn malformed_file_is_replaced() {
        let path = temp_path("malformed");
        fs::write(&path, "not-an-id").unwrap();
        let id = load_or_create(&path).unwrap();
        assert!(validate_device_id(&id));
        assert_eq!(fs::read_to_string(&path).unwrap(), id);
        let _ = fs::remove_file(&path);
    }
}
