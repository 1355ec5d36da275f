//! Pipeline validation
//!
//! Two layers: the per-block checks the engine applies right before it
//! dispatches a block, and a pre-flight pass over a whole pipeline that
//! reports every problem at once without calling any collaborator.

use crate::core::block::{BlockDefinition, BlockInstance};
use crate::core::envelope::{DataEnvelope, EnvelopeKind};
use crate::core::BlockId;
use crate::error::PipelineError;

/// Every required key must be present and non-empty
pub fn check_config(block: &BlockInstance, def: &BlockDefinition) -> Result<(), PipelineError> {
    match def
        .required_config_keys()
        .find(|key| block.config_value(key).is_none())
    {
        Some(key) => Err(PipelineError::MissingConfig {
            block_id: block.id,
            key: key.to_string(),
        }),
        None => Ok(()),
    }
}

/// The incoming envelope must match the declared input kind.
///
/// Sources accept anything, including no envelope at all.
pub fn check_input(
    block: &BlockInstance,
    def: &BlockDefinition,
    input: Option<&DataEnvelope>,
) -> Result<(), PipelineError> {
    check_kind(block.id, def, input.map(DataEnvelope::kind))
}

fn check_kind(
    block_id: BlockId,
    def: &BlockDefinition,
    actual: Option<EnvelopeKind>,
) -> Result<(), PipelineError> {
    match def.input_kind {
        None => Ok(()),
        Some(expected) if actual == Some(expected) => Ok(()),
        Some(expected) => Err(PipelineError::TypeMismatch {
            block_id,
            expected,
            actual,
        }),
    }
}

// ── Pre-flight ──────────────────────────────────────────────────────────────

/// A problem found by the pre-flight pass
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Block where the problem was found (if applicable)
    pub block_id: Option<BlockId>,
    pub message: String,
    /// How to fix it
    pub suggestion: Option<String>,
}

/// Pre-flight result
#[derive(Debug, Clone)]
pub struct PipelineValidationResult {
    pub valid: bool,
    /// Problems that would fail a run, the first one being the run's failure
    pub errors: Vec<ValidationIssue>,
    /// The run's underlying errors, in pipeline order
    pub failures: Vec<PipelineError>,
    /// Suspicious but runnable setups
    pub warnings: Vec<ValidationIssue>,
}

impl PipelineValidationResult {
    fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            failures: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn add_error(&mut self, error: PipelineError, suggestion: Option<&str>) {
        self.valid = false;
        self.errors.push(ValidationIssue {
            block_id: error.block_id(),
            message: error.to_string(),
            suggestion: suggestion.map(|s| s.to_string()),
        });
        self.failures.push(error);
    }

    fn add_warning(&mut self, block_id: Option<BlockId>, message: impl Into<String>, suggestion: Option<&str>) {
        self.warnings.push(ValidationIssue {
            block_id,
            message: message.into(),
            suggestion: suggestion.map(|s| s.to_string()),
        });
    }

    /// The error a run of this pipeline would stop at, if any
    pub fn first_failure(&self) -> Option<&PipelineError> {
        self.failures.first()
    }
}

/// Validates a pipeline without executing it
pub struct PipelineValidator;

impl PipelineValidator {
    /// Run every check against the given block sequence
    pub fn validate(blocks: &[BlockInstance]) -> PipelineValidationResult {
        let mut result = PipelineValidationResult::ok();

        if blocks.is_empty() {
            result.add_error(PipelineError::EmptyPipeline, Some("Drag a block onto the canvas"));
            return result;
        }

        Self::check_chain(blocks, &mut result);
        Self::check_options(blocks, &mut result);
        Self::check_shape(blocks, &mut result);

        result
    }

    /// Walk the statically known envelope kinds the way a run would.
    ///
    /// After a failing block the chain continues with that block's declared
    /// output kind, so later problems are still reported.
    fn check_chain(blocks: &[BlockInstance], result: &mut PipelineValidationResult) {
        let mut current: Option<EnvelopeKind> = None;

        for block in blocks {
            let def = block.definition();

            if let Err(err) = check_config(block, def) {
                result.add_error(err, Some("Fill in the block's required settings"));
            }
            if let Err(err) = check_kind(block.id, def, current) {
                result.add_error(
                    err,
                    Some("Insert a block that converts to the expected kind, or reorder the blocks"),
                );
            }

            current = Some(def.output_kind);
        }
    }

    /// Optional and required values that are present but out of range
    fn check_options(blocks: &[BlockInstance], result: &mut PipelineValidationResult) {
        for block in blocks {
            let def = block.definition();
            let mut keys: Vec<&String> = block.config.keys().collect();
            keys.sort();

            for key in keys {
                let Some(value) = block.config_value(key) else {
                    continue;
                };
                match def.field(key) {
                    Some(field) => {
                        if let Some(warning) = field.check(value) {
                            result.add_warning(Some(block.id), warning, None);
                        }
                    }
                    None => result.add_warning(
                        Some(block.id),
                        format!("'{}' is not a setting of {} blocks and will be ignored", key, def.block_type),
                        None,
                    ),
                }
            }
        }
    }

    fn check_shape(blocks: &[BlockInstance], result: &mut PipelineValidationResult) {
        for block in blocks.iter().skip(1) {
            if block.definition().is_source() {
                result.add_warning(
                    Some(block.id),
                    format!("{} block discards the output of the blocks before it", block.block_type),
                    Some("Start a separate pipeline, or remove the earlier blocks"),
                );
            }
        }

        if let Some(last) = blocks.last() {
            if !last.definition().is_sink() {
                result.add_warning(
                    Some(last.id),
                    "Pipeline does not end with an output block; its result will not be shown",
                    Some("Add an Audio Output or Text Output block"),
                );
            }
        }
    }
}
