use embedscape_core::{Criteria, EmbeddedRecord, FetchError, Record};
use embedscape_embeddings::{failed_request_id, Embedder};

/// Embeds the `criteria` attribute of every record, one provider request per
/// record, in input order.
///
/// Fails on the first provider error; no partial results are returned.
pub fn fetch_embeddings(
    records: Vec<Record>,
    criteria: &str,
    embedder: &dyn Embedder,
) -> Result<Vec<EmbeddedRecord>, FetchError> {
    if records.is_empty() {
        return Err(FetchError::NoData);
    }
    let criteria: Criteria = criteria.parse()?;

    let mut out = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let text = record.attribute(criteria).to_string();
        tracing::debug!(index, id = %record.id, %criteria, "embed record");
        let embedding = embedder
            .embed(std::slice::from_ref(&text))
            .map_err(|err| {
                let message = format!("{err:#}");
                tracing::warn!(
                    index,
                    id = %record.id,
                    request_id = failed_request_id(&err).unwrap_or("-"),
                    error = %message,
                    "embedding request failed"
                );
                FetchError::Provider {
                    index,
                    id: record.id.clone(),
                    message,
                }
            })?
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::MissingEmbedding {
                index,
                id: record.id.clone(),
            })?;
        out.push(EmbeddedRecord { record, embedding });
    }
    Ok(out)
}
