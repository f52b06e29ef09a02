use super::{ObjectStore, SupabaseClient};
use crate::error::BackendError;

impl ObjectStore for SupabaseClient {
    fn upload(&self, key: &str, content_type: &str, bytes: &[u8]) -> Result<String, BackendError> {
        let path = format!("/storage/v1/object/{}/{}", self.bucket(), key);
        self.request("POST", &path)
            .set("Content-Type", content_type)
            .set("x-upsert", "false")
            .send_bytes(bytes)?;

        tracing::info!(key, bytes = bytes.len(), "Image uploaded");
        Ok(self.public_url(key))
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url(),
            self.bucket(),
            key
        )
    }
}
