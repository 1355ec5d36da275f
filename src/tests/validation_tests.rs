//! Tests for the pre-flight validator
//!
//! The validator walks a pipeline without calling any service. Its first
//! error must be the error a run would stop at.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::core::block::{BlockInstance, BlockType};
    use crate::core::envelope::EnvelopeKind;
    use crate::error::PipelineError;
    use crate::runtime::{Pipeline, PipelineValidator};
    use crate::tests::mock_services::{collaborators, MockBackend, RecordingSink};

    fn text(value: &str) -> BlockInstance {
        BlockInstance::new(BlockType::InputText).with_config("text", value)
    }

    fn llm() -> BlockInstance {
        BlockInstance::new(BlockType::Llm).with_config("provider", "ollama")
    }

    /// A well-formed voice chain passes without warnings.
    #[test]
    fn test_valid_pipeline() {
        let blocks = vec![
            BlockInstance::new(BlockType::InputFile).with_config("file", "q.wav"),
            BlockInstance::new(BlockType::Stt),
            llm(),
            BlockInstance::new(BlockType::Tts),
            BlockInstance::new(BlockType::OutputAudio),
        ];

        let result = PipelineValidator::validate(&blocks);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert!(result.first_failure().is_none());
    }

    #[test]
    fn test_empty_pipeline_is_invalid() {
        let result = PipelineValidator::validate(&[]);
        assert!(!result.valid);
        assert_eq!(result.first_failure(), Some(&PipelineError::EmptyPipeline));
    }

    /// Every problem is reported, not just the first one.
    #[test]
    fn test_reports_all_errors() {
        let stt = BlockInstance::new(BlockType::Stt);
        let bare_llm = BlockInstance::new(BlockType::Llm);
        let blocks = vec![text("hi"), stt.clone(), bare_llm.clone(), BlockInstance::new(BlockType::OutputAudio)];

        let result = PipelineValidator::validate(&blocks);

        assert!(!result.valid);
        assert_eq!(
            result.failures,
            vec![
                PipelineError::TypeMismatch {
                    block_id: stt.id,
                    expected: EnvelopeKind::Audio,
                    actual: Some(EnvelopeKind::Text),
                },
                PipelineError::MissingConfig {
                    block_id: bare_llm.id,
                    key: "provider".into(),
                },
                PipelineError::TypeMismatch {
                    block_id: blocks[3].id,
                    expected: EnvelopeKind::AudioUrl,
                    actual: Some(EnvelopeKind::Text),
                },
            ]
        );
        assert_eq!(result.errors.len(), 3);
        assert!(result.errors.iter().all(|e| e.suggestion.is_some()));
    }

    /// Out-of-range numbers, unknown choices, and unknown keys are warnings.
    #[test]
    fn test_option_warnings() {
        let tts = BlockInstance::new(BlockType::Tts)
            .with_config("temperature", 9.0)
            .with_config("format", "aiff")
            .with_config("voice", "alto");
        let blocks = vec![text("hi"), tts, BlockInstance::new(BlockType::OutputAudio)];

        let result = PipelineValidator::validate(&blocks);

        assert!(result.valid);
        assert_eq!(result.warnings.len(), 3);
        let messages: Vec<&str> = result.warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("temperature")));
        assert!(messages.iter().any(|m| m.contains("aiff")));
        assert!(messages.iter().any(|m| m.contains("voice")));
    }

    /// Mid-pipeline sources and a missing sink are flagged.
    #[test]
    fn test_shape_warnings() {
        let second = text("b");
        let blocks = vec![text("a"), second.clone(), llm()];

        let result = PipelineValidator::validate(&blocks);

        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
        assert_eq!(result.warnings[0].block_id, Some(second.id));
        assert!(result.warnings[1].message.contains("output block"));
    }

    /// For pipelines that fail before reaching a service, pre-flight finds
    /// the same error the run stops at.
    #[tokio::test]
    async fn test_first_failure_matches_run() {
        let cases: Vec<Vec<(&str, Vec<(&str, &str)>)>> = vec![
            vec![("input-text", vec![("text", "hi")]), ("stt", vec![])],
            vec![("input-text", vec![]), ("output-text", vec![])],
            vec![("input-text", vec![("text", "hi")]), ("llm", vec![]), ("tts", vec![])],
            vec![("tts", vec![]), ("output-audio", vec![])],
            vec![
                ("input-mic", vec![("recording", "r.webm")]),
                ("output-text", vec![]),
            ],
            vec![
                ("input-text", vec![("text", "hi")]),
                ("tts", vec![]),
                ("output-text", vec![]),
            ],
        ];

        for case in cases {
            let backend = Arc::new(MockBackend::new());
            let sink = Arc::new(RecordingSink::default());
            let pipeline = Pipeline::new(collaborators(&backend, &sink));
            for (block_type, config) in &case {
                let id = pipeline.add_block(block_type).unwrap();
                for (key, value) in config {
                    pipeline.update_block_config(id, *key, *value).unwrap();
                }
            }

            let expected = pipeline.validate().first_failure().cloned();
            let outcome = pipeline.execute_pipeline().await;

            assert!(expected.is_some());
            assert_eq!(outcome.error().cloned(), expected, "case {:?}", case);
        }
    }
}
