use std::path::Path;

use prospector_deploy::DeployError;

use crate::ui::ci::{github_actions_annotation, AnnotationLevel};
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;
use crate::ui::terminal::detect_capabilities;

fn error_file(err: &DeployError) -> Option<&Path> {
    match err {
        DeployError::StateCorrupted { path, .. }
        | DeployError::StateAccess { path, .. }
        | DeployError::LockAccess { path, .. }
        | DeployError::ConfigNotFound { path }
        | DeployError::DirectoryNotFound { path } => Some(path.as_path()),
        DeployError::InvalidConfig { file, .. } => Some(file.as_path()),
        _ => None,
    }
}

fn format_error_with(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    let icon = Icon::Error.colored(supports_color, supports_unicode);
    let message = ColoredText::error(err.to_string()).render(supports_color);
    let mut out = format!("{} {}\n", icon, message);

    for cause in err.chain().skip(1) {
        out.push_str(&format!("  caused by: {}\n", cause));
    }
    out
}

pub fn format_error(err: &anyhow::Error) -> String {
    let caps = detect_capabilities();
    format_error_with(err, caps.supports_color && !caps.is_ci, caps.supports_unicode)
}

/// Report a fatal error on stderr, or as a JSON `error` event on stdout
pub fn print_error(err: &anyhow::Error, json: bool) {
    let file = err
        .downcast_ref::<DeployError>()
        .and_then(error_file)
        .map(|p| p.display().to_string());

    if json {
        let output = serde_json::json!({
            "event": "error",
            "message": err.to_string(),
            "file": file,
        });
        let _ = crate::ui::json::emit(output);
        return;
    }

    let caps = detect_capabilities();
    if caps.is_ci && std::env::var("GITHUB_ACTIONS").is_ok() {
        println!(
            "{}",
            github_actions_annotation(
                AnnotationLevel::Error,
                &err.to_string(),
                file.as_deref(),
                Some("prospector-deploy"),
            )
        );
    }

    eprint!("{}", format_error(err));
}
