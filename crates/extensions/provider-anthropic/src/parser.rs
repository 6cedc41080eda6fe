//! Response parsing for the Anthropic API.

use replysmith_protocols::error::ProviderError;

use crate::api::ApiResponse;

/// Concatenate the text blocks of a messages response.
pub fn extract_text(body: serde_json::Value) -> Result<String, ProviderError> {
    let response: ApiResponse = serde_json::from_value(body)
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

    let parts: Vec<String> = response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect();

    if parts.is_empty() {
        return Err(ProviderError::InvalidResponse(
            "no text blocks in content".to_string(),
        ));
    }
    Ok(parts.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_joins_text_blocks_only() {
        let body = json!({"content": [
            {"type": "text", "text": "Great "},
            {"type": "tool_use", "id": "t1", "name": "x", "input": {}},
            {"type": "text", "text": "news."}
        ]});
        assert_eq!(extract_text(body).unwrap(), "Great news.");
    }

    #[test]
    fn test_empty_content_is_invalid() {
        let err = extract_text(json!({"content": []})).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));

        let err = extract_text(json!({"content": 42})).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}
