//! Tests for block identity, block types, and the block store
//!
//! The store is the pipeline under construction: an ordered list of block
//! instances whose position is their execution order.

#[cfg(test)]
mod core_tests {
    use crate::core::block::{BlockCategory, BlockInstance, BlockType};
    use crate::core::envelope::EnvelopeKind;
    use crate::core::parameter::ConfigValue;
    use crate::core::store::BlockStore;
    use crate::core::BlockId;
    use crate::error::PipelineError;

    /// Each new BlockId is a random UUID v4.
    #[test]
    fn test_block_id_creation_and_uniqueness() {
        let id1 = BlockId::new();
        let id2 = BlockId::new();
        assert_ne!(id1, id2, "Block IDs should be unique");
    }

    /// BlockIds serialize as bare UUID strings and parse back.
    #[test]
    fn test_block_id_serialization() {
        let id = BlockId::new();

        let json = serde_json::to_string(&id).expect("Failed to serialize BlockId");
        assert_eq!(json, format!("\"{}\"", id));

        let deserialized: BlockId = serde_json::from_str(&json).expect("Failed to deserialize BlockId");
        assert_eq!(id, deserialized);
        assert_eq!(id.to_string().parse::<BlockId>().unwrap(), id);
    }

    /// Block types use their kebab-case identifiers everywhere.
    #[test]
    fn test_block_type_identifiers() {
        for block_type in BlockType::ALL {
            let name = block_type.as_str();
            assert_eq!(name.parse::<BlockType>().unwrap(), block_type);
            assert_eq!(serde_json::to_string(&block_type).unwrap(), format!("\"{}\"", name));
        }
        assert_eq!(BlockType::OutputAudio.as_str(), "output-audio");
        assert_eq!(
            "speaker".parse::<BlockType>(),
            Err(PipelineError::UnknownBlockType("speaker".into()))
        );
    }

    /// Definitions carry the compatibility table.
    #[test]
    fn test_block_type_definitions() {
        let stt = BlockType::Stt.definition();
        assert_eq!(stt.category, BlockCategory::Processing);
        assert_eq!(stt.input_kind, Some(EnvelopeKind::Audio));
        assert_eq!(stt.output_kind, EnvelopeKind::Text);

        let input_text = BlockType::InputText.definition();
        assert!(input_text.is_source());
        assert_eq!(input_text.required_config_keys().collect::<Vec<_>>(), vec!["text"]);

        assert!(BlockType::OutputText.definition().is_sink());
        assert_eq!(BlockCategory::Processing.display_name(), "Processing");
    }

    /// Instances serialize with a `type` field and plain config values.
    #[test]
    fn test_block_instance_serialization() {
        let block = BlockInstance::new(BlockType::Llm)
            .with_config("provider", "ollama")
            .with_config("temperature", 0.7);

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "llm");
        assert_eq!(json["config"]["provider"], "ollama");
        assert_eq!(json["config"]["temperature"], 0.7);

        let back: BlockInstance = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }

    /// Empty values read as absent.
    #[test]
    fn test_block_instance_config_accessors() {
        let block = BlockInstance::new(BlockType::Tts)
            .with_config("format", "")
            .with_config("temperature", "1.5")
            .with_config("reference_audio", ConfigValue::Null);

        assert!(block.config_value("format").is_none());
        assert!(block.config_value("reference_audio").is_none());
        assert_eq!(block.config_number("temperature"), Some(1.5));
        assert_eq!(block.config_str("temperature"), Some("1.5"));
        assert!(block.config_str("missing").is_none());
    }

    // ── Store ───────────────────────────────────────────────────────────────

    #[test]
    fn test_store_add_appends_in_order() {
        let mut store = BlockStore::new();
        let a = store.add_block("input-text").unwrap();
        let b = store.add_block("llm").unwrap();
        let c = store.add_block("output-text").unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.position(a), Some(0));
        assert_eq!(store.position(b), Some(1));
        assert_eq!(store.position(c), Some(2));
        assert!(store.get(b).unwrap().config.is_empty());
        assert_eq!(store.get(b).unwrap().block_type, BlockType::Llm);
    }

    #[test]
    fn test_store_add_unknown_type() {
        let mut store = BlockStore::new();
        assert_eq!(
            store.add_block("video-input"),
            Err(PipelineError::UnknownBlockType("video-input".into()))
        );
        assert!(store.is_empty());
    }

    /// Removing closes the gap.
    #[test]
    fn test_store_remove() {
        let mut store = BlockStore::new();
        let a = store.add_block("input-text").unwrap();
        let b = store.add_block("llm").unwrap();
        let c = store.add_block("output-text").unwrap();

        let removed = store.remove_block(b).unwrap();
        assert_eq!(removed.id, b);
        assert_eq!(store.position(a), Some(0));
        assert_eq!(store.position(c), Some(1));
        assert!(!store.contains(b));

        assert_eq!(store.remove_block(b), Err(PipelineError::NotFound(b)));
    }

    /// Config writes are not validated and overwrite earlier values.
    #[test]
    fn test_store_update_config() {
        let mut store = BlockStore::new();
        let id = store.add_block("llm").unwrap();

        store.update_block_config(id, "provider", "ollama").unwrap();
        store.update_block_config(id, "provider", "openai").unwrap();
        store.update_block_config(id, "not-a-field", 3i64).unwrap();

        let block = store.get(id).unwrap();
        assert_eq!(block.config_str("provider"), Some("openai"));
        assert_eq!(block.config.get("not-a-field"), Some(&ConfigValue::Integer(3)));

        let stranger = BlockId::new();
        assert_eq!(
            store.update_block_config(stranger, "provider", "ollama"),
            Err(PipelineError::NotFound(stranger))
        );
    }

    #[test]
    fn test_store_move() {
        let mut store = BlockStore::new();
        let a = store.add_block("input-text").unwrap();
        let b = store.add_block("llm").unwrap();
        let c = store.add_block("output-text").unwrap();

        store.move_block(c, 0).unwrap();
        let order: Vec<BlockId> = store.iter().map(|b| b.id).collect();
        assert_eq!(order, vec![c, a, b]);

        // Past the end clamps to last
        store.move_block(c, 99).unwrap();
        let order: Vec<BlockId> = store.iter().map(|b| b.id).collect();
        assert_eq!(order, vec![a, b, c]);

        let stranger = BlockId::new();
        assert_eq!(store.move_block(stranger, 0), Err(PipelineError::NotFound(stranger)));
    }

    #[test]
    fn test_store_clear() {
        let mut store = BlockStore::new();
        store.add_block("input-text").unwrap();
        store.add_block("output-text").unwrap();

        store.clear();
        assert!(store.is_empty());
        store.clear();
        assert!(store.is_empty());
    }

    /// Snapshots are detached from later edits.
    #[test]
    fn test_store_snapshot_is_independent() {
        let mut store = BlockStore::new();
        let id = store.add_block("input-text").unwrap();
        store.update_block_config(id, "text", "before").unwrap();

        let snapshot = store.snapshot();
        store.update_block_config(id, "text", "after").unwrap();
        store.add_block("output-text").unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].config_str("text"), Some("before"));
    }
}
