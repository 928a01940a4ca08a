use crate::runtime::error::RuntimeError;
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(lox::runtime))]
pub struct RuntimeDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("{label}")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
    message: String,
    label: String,
}

impl RuntimeDiagnostic {
    pub fn from_error(src: NamedSource<String>, err: &RuntimeError) -> Self {
        Self {
            src,
            span: err.span().into(),
            help: help_for(err),
            message: err.to_string(),
            label: err.label(),
        }
    }
}

fn help_for(err: &RuntimeError) -> Option<String> {
    match err {
        RuntimeError::UndefinedVariable { name, .. } => {
            Some(format!("declare `{name}` with `var` before using it"))
        }
        RuntimeError::LeakedSignal { .. } => {
            Some("the program tree is missing a function or loop boundary".into())
        }
        _ => None,
    }
}

/// Renders `err` against its source as plain text for the top-level reporter.
pub fn render_runtime_error(path: &str, source: &str, err: &RuntimeError) -> String {
    let src = NamedSource::new(path, source.to_string());
    let diagnostic = RuntimeDiagnostic::from_error(src, err);
    let mut out = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    if handler.render_report(&mut out, &diagnostic).is_err() {
        return format!("Runtime error: {err}");
    }
    out
}
