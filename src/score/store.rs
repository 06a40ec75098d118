use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::cipher::{self, IV_LEN, Iv, Key};
use super::error::ScoreError;

/// Record file name inside the home directory
pub const FILE_NAME: &str = ".snake_highscore";

/// Appended to the score before encryption; a mismatch after decryption
/// means the file was edited or damaged
pub const SIGNATURE: [u8; 32] = [
    238, 6, 209, 233, 120, 88, 33, 91, 96, 64, 93, 58, 209, 114, 161, 242, 120, 156, 47, 203, 114,
    55, 238, 64, 242, 83, 213, 197, 161, 51, 100, 193,
];

const SCORE_LEN: usize = 4;

/// Encrypted single-value high score file
///
/// Layout: `[16-byte IV][AES-256-CBC ciphertext]`, where the plaintext is the
/// big-endian score followed by [`SIGNATURE`].
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
    key: Key,
}

impl ScoreStore {
    /// Store at an explicit path, using the process key
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::with_key(path, *cipher::process_key())
    }

    pub fn with_key(path: impl Into<PathBuf>, key: Key) -> Self {
        Self {
            path: path.into(),
            key,
        }
    }

    /// `~/.snake_highscore`
    pub fn in_home_dir() -> Result<Self, ScoreError> {
        let home = home_dir().ok_or(ScoreError::NoHomeDir)?;
        Ok(Self::at(home.join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored score, or 0 when the file is missing, unreadable or tampered with
    pub fn read(&self) -> u32 {
        match fs::read(&self.path) {
            Ok(bytes) => decode_record(&bytes, &self.key).unwrap_or_else(|| {
                debug!(path = ?self.path, "high score record rejected");
                0
            }),
            Err(err) => {
                debug!(path = ?self.path, %err, "no readable high score record");
                0
            }
        }
    }

    /// Replace the stored score
    pub fn write(&self, value: u32) -> Result<(), ScoreError> {
        let record = encode_record(value, &self.key, &cipher::random_iv());
        fs::write(&self.path, record).map_err(|source| ScoreError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Write `length` if the session may set records and it beats the stored
    /// score. Returns whether a new record was written.
    pub fn submit(&self, length: u32, eligible: bool) -> Result<bool, ScoreError> {
        if !eligible {
            debug!(length, "session not eligible for high score");
            return Ok(false);
        }

        let best = self.read();
        if length <= best {
            return Ok(false);
        }

        self.write(length)?;
        info!(length, previous = best, "new high score");
        Ok(true)
    }
}

/// IV followed by the encrypted score and signature
pub fn encode_record(value: u32, key: &Key, iv: &Iv) -> Vec<u8> {
    let mut plaintext = Vec::with_capacity(SCORE_LEN + SIGNATURE.len());
    plaintext.extend_from_slice(&value.to_be_bytes());
    plaintext.extend_from_slice(&SIGNATURE);

    let ciphertext = cipher::encrypt(&plaintext, key, iv);

    let mut record = Vec::with_capacity(IV_LEN + ciphertext.len());
    record.extend_from_slice(iv);
    record.extend_from_slice(&ciphertext);
    record
}

/// Score held in `record`, if it decrypts and carries the signature
pub fn decode_record(record: &[u8], key: &Key) -> Option<u32> {
    if record.len() < IV_LEN {
        return None;
    }
    let (iv, ciphertext) = record.split_at(IV_LEN);
    let iv: Iv = iv.try_into().ok()?;

    let plaintext = cipher::decrypt(ciphertext, key, &iv)?;
    if plaintext.len() < SCORE_LEN + SIGNATURE.len() || !plaintext.ends_with(&SIGNATURE) {
        return None;
    }

    let score: [u8; SCORE_LEN] = plaintext[..SCORE_LEN].try_into().ok()?;
    Some(u32::from_be_bytes(score))
}

/// `$HOME`, falling back to `$HOMEDRIVE$HOMEPATH`
pub fn home_dir() -> Option<PathBuf> {
    home_dir_from(|name| std::env::var_os(name))
}

fn home_dir_from(var: impl Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    let non_empty = |name: &str| var(name).filter(|value| !value.is_empty());

    if let Some(home) = non_empty("HOME") {
        return Some(PathBuf::from(home));
    }

    match (non_empty("HOMEDRIVE"), non_empty("HOMEPATH")) {
        (Some(drive), Some(path)) => {
            let mut joined = drive;
            joined.push(path);
            Some(PathBuf::from(joined))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ScoreStore {
        ScoreStore::at(dir.path().join(FILE_NAME))
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        for value in [0, 1, u32::MAX] {
            store.write(value).unwrap();
            assert_eq!(store.read(), value);
        }
    }

    #[test]
    fn test_record_layout() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.write(42).unwrap();

        let bytes = fs::read(store.path()).unwrap();
        // 36 bytes of plaintext pad to three blocks
        assert_eq!(bytes.len(), IV_LEN + 48);
    }

    #[test]
    fn test_encode_record_prefixes_iv() {
        let key = [7u8; cipher::KEY_LEN];
        let iv = [9u8; IV_LEN];
        let record = encode_record(5, &key, &iv);

        assert_eq!(&record[..IV_LEN], &iv);
        assert_eq!(record.len(), IV_LEN + 48);
        assert_eq!(decode_record(&record, &key), Some(5));
    }

    #[test]
    fn test_absent_file_reads_zero() {
        let dir = TempDir::new().unwrap();
        let store = ScoreStore::at(dir.path().join("missing").join(FILE_NAME));
        assert_eq!(store.read(), 0);
    }

    #[test]
    fn test_flipped_ciphertext_byte_reads_zero() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.write(1234).unwrap();
        let original = fs::read(store.path()).unwrap();

        for i in IV_LEN..original.len() {
            let mut tampered = original.clone();
            tampered[i] ^= 0x01;
            fs::write(store.path(), &tampered).unwrap();
            assert_eq!(store.read(), 0, "flip at byte {i} went unnoticed");
        }
    }

    #[test]
    fn test_garbage_and_truncation_read_zero() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        fs::write(store.path(), b"not a record").unwrap();
        assert_eq!(store.read(), 0);

        store.write(99).unwrap();
        let bytes = fs::read(store.path()).unwrap();
        fs::write(store.path(), &bytes[..bytes.len() - 16]).unwrap();
        assert_eq!(store.read(), 0);

        fs::write(store.path(), b"").unwrap();
        assert_eq!(store.read(), 0);
    }

    #[test]
    fn test_other_key_reads_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(FILE_NAME);
        ScoreStore::with_key(&path, [7u8; 32]).write(500).unwrap();

        assert_eq!(ScoreStore::with_key(&path, [8u8; 32]).read(), 0);
        assert_eq!(ScoreStore::with_key(&path, [7u8; 32]).read(), 500);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.write(u32::MAX).unwrap();
        store.write(3).unwrap();
        assert_eq!(store.read(), 3);
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let store = ScoreStore::at(dir.path().join("missing").join(FILE_NAME));
        let err = store.write(5).unwrap_err();
        assert!(matches!(err, ScoreError::Write { .. }));
    }

    #[test]
    fn test_submit() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.submit(10, true).unwrap());
        assert_eq!(store.read(), 10);

        assert!(!store.submit(10, true).unwrap());
        assert!(!store.submit(4, true).unwrap());
        assert_eq!(store.read(), 10);

        // Accelerated sessions never set records
        assert!(!store.submit(50, false).unwrap());
        assert_eq!(store.read(), 10);
    }

    fn fake_env(
        pairs: &'static [(&'static str, &'static str)],
    ) -> impl Fn(&str) -> Option<OsString> {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| OsString::from(*value))
        }
    }

    #[test]
    fn test_home_dir_lookup() {
        assert_eq!(
            home_dir_from(fake_env(&[("HOME", "/home/snake"), ("HOMEDRIVE", "C:")])),
            Some(PathBuf::from("/home/snake"))
        );
        assert_eq!(
            home_dir_from(fake_env(&[("HOMEDRIVE", "C:"), ("HOMEPATH", "\\Users\\snake")])),
            Some(PathBuf::from("C:\\Users\\snake"))
        );
        assert_eq!(
            home_dir_from(fake_env(&[("HOME", ""), ("HOMEDRIVE", "C:")])),
            None
        );
        assert_eq!(home_dir_from(fake_env(&[])), None);
    }
}
