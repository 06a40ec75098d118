//! AES-256-CBC with PKCS#7 padding, keyed from the build-seeded stream

use std::sync::OnceLock;

use aes::Aes256;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use rand::{Rng, RngCore};

use crate::rng::key_stream;

type Encryptor = cbc::Encryptor<Aes256>;
type Decryptor = cbc::Decryptor<Aes256>;

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;

pub type Key = [u8; KEY_LEN];
pub type Iv = [u8; IV_LEN];

/// The key shared by every process built from this source
pub fn process_key() -> &'static Key {
    static KEY: OnceLock<Key> = OnceLock::new();
    KEY.get_or_init(|| derive_key(&mut key_stream()))
}

/// Draw a key one byte at a time
pub fn derive_key<R: Rng + ?Sized>(rng: &mut R) -> Key {
    let mut key = [0u8; KEY_LEN];
    for byte in key.iter_mut() {
        *byte = rng.gen_range(0..=u8::MAX);
    }
    key
}

/// Fresh IV from the operating system
pub fn random_iv() -> Iv {
    let mut iv = [0u8; IV_LEN];
    rand::rngs::OsRng.fill_bytes(&mut iv);
    iv
}

pub fn encrypt(plaintext: &[u8], key: &Key, iv: &Iv) -> Vec<u8> {
    Encryptor::new(key.into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// `None` for a truncated ciphertext or bad padding
pub fn decrypt(ciphertext: &[u8], key: &Key, iv: &Iv) -> Option<Vec<u8>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return None;
    }
    Decryptor::new(key.into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .ok()
}
