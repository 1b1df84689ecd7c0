use std::path::Path;

use crate::domain::errors::StrategyResult;
use crate::domain::models::{ErrorRecord, FixCandidate};
use crate::domain::ports::{FixStrategy, StrategyContext, StrategyId};
use crate::services::diagnostics::{is_prettier_output, parse_formatter_target};
use crate::services::taxonomy::confidence;

/// Command used when no file could be identified.
pub const PROJECT_FORMAT_COMMAND: &str = "black .";

/// Formatter invocation for `file`, chosen by extension.
pub fn formatter_command(file: &str) -> Option<String> {
    let ext = Path::new(file).extension()?.to_str()?.to_ascii_lowercase();
    let command = match ext.as_str() {
        "py" | "pyi" => format!("black {file}"),
        "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" | "json" | "css" | "scss" | "less" | "html"
        | "vue" | "yaml" | "yml" | "graphql" | "md" => format!("prettier --write {file}"),
        "rs" => format!("rustfmt {file}"),
        "go" => format!("gofmt -w {file}"),
        _ => return None,
    };
    Some(command)
}

/// Delegates `format-violation` errors to the language's formatter.
#[derive(Debug, Default)]
pub struct FormatterStrategy;

impl FixStrategy for FormatterStrategy {
    fn id(&self) -> StrategyId {
        StrategyId::Formatter
    }

    fn propose(
        &self,
        record: &ErrorRecord,
        ctx: &StrategyContext<'_>,
    ) -> StrategyResult<Option<FixCandidate>> {
        let target = parse_formatter_target(&record.message).or_else(|| record.file.clone());

        let Some(file) = target else {
            return Ok(Some(
                ctx.candidate(record, "Reformat the project", confidence::FORMATTER)
                    .with_command(PROJECT_FORMAT_COMMAND),
            ));
        };
        let command = match formatter_command(&file) {
            Some(command) => command,
            None if is_prettier_output(&record.message) => format!("prettier --write {file}"),
            None => {
                return Ok(Some(
                    ctx.candidate(
                        record,
                        format!("Reformat the project ({file} has no known formatter)"),
                        confidence::FORMATTER,
                    )
                    .with_command(PROJECT_FORMAT_COMMAND),
                ));
            }
        };

        Ok(Some(
            ctx.candidate(record, format!("Reformat {file}"), confidence::FORMATTER)
                .with_target(file)
                .with_command(command),
        ))
    }
}
