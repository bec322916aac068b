use std::time::Duration;

use qdrant_client::{config::QdrantConfig, Qdrant};

use super::VectorDbError;

/// Builds a Qdrant client from a URL and verifies the connection.
///
/// Accepts either a bare host:port or a full URL; the REST port 6333 is
/// rewritten to the gRPC port 6334 the client actually speaks.
pub async fn create_qdrant_client(url: &str) -> Result<Qdrant, VectorDbError> {
    let host = match url.split_once("://") {
        Some((_, rest)) => rest.to_string(),
        None => url.to_string(),
    };

    let host = if host.ends_with(":6333") {
        host.replace(":6333", ":6334")
    } else {
        host
    };

    let grpc_url = format!("http://{}", host);
    log::info!("connecting to Qdrant at {}", grpc_url);

    let mut config = QdrantConfig::from_url(&grpc_url);
    config.check_compatibility = false;
    config.timeout = Duration::from_secs(30);
    config.connect_timeout = Duration::from_secs(10);

    let client = Qdrant::new(config).map_err(|e| VectorDbError::Connection(e.to_string()))?;

    match client.list_collections().await {
        Ok(_) => Ok(client),
        Err(e) => {
            log::error!("Qdrant connection test failed: {}", e);
            Err(VectorDbError::Connection(format!(
                "failed to connect to Qdrant at {}: {}",
                grpc_url, e
            )))
        }
    }
}
