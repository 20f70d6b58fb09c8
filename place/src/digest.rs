use std::{fs::File, io, path::Path};

use sha2::{Digest, Sha256};

pub fn digest_bytes(data: &[u8]) -> String {
    format!("SHA256:{}", hex::encode(Sha256::digest(data)))
}

/// Content digest of a file, used to tie a placement to the exact file it
/// was written to or read from.
pub fn secure_digest_file<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut f, &mut hasher)?;
    Ok(format!("SHA256:{}", hex::encode(hasher.finalize())))
}
