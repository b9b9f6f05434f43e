//! Remote key layout shared by all backends.

use crate::traits::{RemoteStoreError, RemoteStoreResult};

/// Build the remote key `{folder}/{name}` for a staged file.
pub(crate) fn remote_key(folder: &str, staged_name: &str) -> RemoteStoreResult<String> {
    let folder = folder.trim_matches('/');
    if folder.contains("..") || staged_name.contains("..") || staged_name.contains('/') {
        return Err(RemoteStoreError::InvalidKey(format!(
            "{}/{}",
            folder, staged_name
        )));
    }
    if folder.is_empty() {
        Ok(staged_name.to_string())
    } else {
        Ok(format!("{}/{}", folder, staged_name))
    }
}
