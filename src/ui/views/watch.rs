use prospector_deploy::application::WatchEvent;

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;

pub fn render_watch_header(
    root: &str,
    watching: &[String],
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = CommandHeader::new(Icon::Watch, "Prospector Watch");
    header.add("Root", root);
    header.add("Watching", watching.join(", "));
    header.add("Hint", "Press Ctrl+C to stop");
    header.render(supports_color, supports_unicode)
}

pub fn render_watch_event(
    timestamp: &str,
    event: &WatchEvent,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let prefix = format!("[{}]", timestamp);
    let icon = |icon: Icon| icon.colored(supports_color, supports_unicode);

    match event {
        WatchEvent::WatchStarted { watching, .. } => format!(
            "{} {} Watching {} path(s)\n",
            prefix,
            icon(Icon::Watch),
            watching.len()
        ),
        WatchEvent::PathMissing { path } => format!(
            "{} {} Not found, not watched: {}\n",
            prefix,
            icon(Icon::Warning),
            path
        ),
        WatchEvent::FileChanged { path } => {
            format!("{} {} Changed: {}\n", prefix, icon(Icon::Arrow), path)
        }
        WatchEvent::RunStarted { class } => format!(
            "{} {} Running {} evaluation...\n",
            prefix,
            icon(Icon::Progress),
            class
        ),
        WatchEvent::RunFinished {
            class,
            action,
            deployed,
            success,
        } => {
            let mark = match (*deployed, *success) {
                (_, false) => Icon::Error,
                (true, true) => Icon::Deploy,
                (false, true) => Icon::Success,
            };
            format!("{} {} {}: {}\n", prefix, icon(mark), class, action)
        }
        WatchEvent::Contended { holder } => format!(
            "{} {} Skipped, lock held by {}\n",
            prefix,
            icon(Icon::Lock),
            holder.as_deref().unwrap_or("another process")
        ),
        WatchEvent::Error { message } => {
            format!("{} {} Error: {}\n", prefix, icon(Icon::Error), message)
        }
        WatchEvent::Shutdown => format!("\n{} {} Watch stopped.\n", prefix, icon(Icon::Watch)),
    }
}
