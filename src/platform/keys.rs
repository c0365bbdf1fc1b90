// spotvault - platform/keys.rs
//
// Key acquisition for profile field encryption.
//
// Primary path: a random 256-bit machine key generated once and stored as a
// mode-0600 file in the platform data directory — opaque, machine-scoped
// protection in the spirit of the OS data-protection APIs, without the
// platform interop.
//
// Fallback path: when the key file cannot be created or read (read-only
// data dir, permission trouble), the key is derived with Argon2id from a
// built-in phrase. Weaker, but profiles stay portable and decryptable.

use crate::util::constants::{FIELD_KEY_FILE_NAME, FIELD_KEY_LEN};
use crate::util::error::{ProfileError, SecretError};
use argon2::Argon2;
use rand::Rng;
use std::path::Path;

/// Built-in phrase for the fallback derivation.
const FALLBACK_PHRASE: &[u8] = b"rubber-baby-buggy-bumpers";

/// Fixed salt for the fallback derivation; versioned so a future change
/// cannot silently produce a different key for old stores.
const FALLBACK_SALT: &[u8] = b"spotvault.field-key.v1";

/// Read the machine key, generating and persisting it on first use.
pub fn machine_key(data_dir: &Path) -> Result<[u8; FIELD_KEY_LEN], ProfileError> {
    let key_file = data_dir.join(FIELD_KEY_FILE_NAME);

    if key_file.exists() {
        let key_data = std::fs::read(&key_file).map_err(|source| ProfileError::Io {
            path: key_file.clone(),
            source,
        })?;
        if key_data.len() != FIELD_KEY_LEN {
            return Err(ProfileError::BadKeyFile {
                path: key_file,
                len: key_data.len(),
            });
        }
        restrict_permissions(&key_file);

        let mut key = [0u8; FIELD_KEY_LEN];
        key.copy_from_slice(&key_data);
        return Ok(key);
    }

    let key: [u8; FIELD_KEY_LEN] = rand::thread_rng().gen();

    std::fs::create_dir_all(data_dir).map_err(|source| ProfileError::Io {
        path: data_dir.to_path_buf(),
        source,
    })?;
    std::fs::write(&key_file, key).map_err(|source| ProfileError::Io {
        path: key_file.clone(),
        source,
    })?;
    restrict_permissions(&key_file);

    tracing::info!(path = %key_file.display(), "Generated new machine key");
    Ok(key)
}

/// Derive the fallback key from the built-in phrase.
pub fn fallback_key() -> Result<[u8; FIELD_KEY_LEN], SecretError> {
    let mut key = [0u8; FIELD_KEY_LEN];
    Argon2::default()
        .hash_password_into(FALLBACK_PHRASE, FALLBACK_SALT, &mut key)
        .map_err(|e| SecretError::KeyDerivation {
            reason: e.to_string(),
        })?;
    Ok(key)
}

/// The key used for field encryption: machine key when available, fallback
/// derivation otherwise. Total key failure leaves fields as plaintext — the
/// store still round-trips, so that is a warning rather than a hard error.
pub fn field_key(data_dir: &Path) -> Option<[u8; FIELD_KEY_LEN]> {
    match machine_key(data_dir) {
        Ok(key) => Some(key),
        Err(e) => {
            tracing::warn!(error = %e, "Machine key unavailable; deriving fallback key");
            match fallback_key() {
                Ok(key) => Some(key),
                Err(e) => {
                    tracing::warn!(error = %e, "Fallback key derivation failed; fields stay plaintext");
                    None
                }
            }
        }
    }
}

fn restrict_permissions(key_file: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        if let Err(e) = std::fs::set_permissions(key_file, perms) {
            tracing::warn!(
                path = %key_file.display(),
                error = %e,
                "Could not restrict key file permissions"
            );
        }
    }
    #[cfg(not(unix))]
    {
        let _ = key_file;
    }
}
