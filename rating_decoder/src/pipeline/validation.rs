use crate::logging::codes;

/// Check that every code the pipeline can emit is registered and that the
/// render-template table covers every classified category
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    let emitted = [
        codes::system::INITIALIZATION_FAILURE,
        codes::input::FILE_NOT_FOUND,
        codes::input::INVALID_PROGRAM_FORMAT,
        codes::input::PROGRAM_LIMIT_EXCEEDED,
        codes::lexical::INSTRUCTION_TOO_LONG,
        codes::lexical::TOKEN_LIMIT_EXCEEDED,
        codes::variables::MALFORMED_VARIABLE,
        codes::decode::UNEXPECTED_TOKEN_SHAPE,
        codes::decode::SPLIT_LIMIT_EXCEEDED,
        codes::decode::ARGUMENT_LIMIT_EXCEEDED,
        codes::linking::UNRESOLVED_JUMP_TARGET,
        codes::linking::CYCLIC_JUMP,
        codes::linking::LINK_DEPTH_EXCEEDED,
        codes::linking::EXPANSION_LIMIT_EXCEEDED,
        codes::rendering::TEMPLATE_TABLE_INVALID,
    ];
    for code in emitted {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Error code {} not found in metadata registry", code));
        }
    }

    for def in crate::classifier::table::INSTRUCTIONS {
        if let Some(id) = def.category.template() {
            if crate::renderer::template_text(id).is_none() {
                return Err(format!(
                    "Type code {} uses template {} which the template table lacks",
                    def.code, id
                ));
            }
        }
    }

    crate::log_success!(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "codes_checked" => emitted.len(),
        "type_codes" => crate::classifier::table::INSTRUCTIONS.len()
    );

    Ok(())
}
