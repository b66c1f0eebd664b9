use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use prospector_deploy::application::{WatchEvent, WatchUseCase};
use prospector_deploy::domain::ports::{DeployEventSink, NoopEventSink};
use prospector_deploy::infrastructure::JsonEventSink;
use prospector_deploy::DeployOptions;

use super::project::Project;
use super::Exit;
use crate::ui::context::UiContext;
use crate::ui::views::deploy::ConsoleEventSink;
use crate::ui::views::watch::{render_watch_event, render_watch_header};

pub fn cmd_watch(project: &Project, ui: &UiContext) -> Result<Exit> {
    let use_case = project.deploy_use_case()?;
    let options = project.config.watch_options(&project.root);

    let events: Arc<dyn DeployEventSink> = if ui.json {
        Arc::new(JsonEventSink::stdout("watch"))
    } else if ui.verbose > 0 {
        Arc::new(ConsoleEventSink::new(ui.color, ui.unicode, ui.verbose))
    } else {
        Arc::new(NoopEventSink)
    };

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("installing Ctrl+C handler")?;

    if !ui.json {
        let watching: Vec<String> = options
            .paths
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        print!(
            "{}",
            render_watch_header(
                &project.root.display().to_string(),
                &watching,
                ui.color,
                ui.unicode
            )
        );
    }

    let json = ui.json;
    let (color, unicode) = (ui.color, ui.unicode);
    WatchUseCase::new(options).start(
        running,
        move |event: WatchEvent| {
            if json {
                println!("{}", event.to_json());
                return;
            }
            let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
            let rendered = render_watch_event(&timestamp, &event, color, unicode);
            match event {
                WatchEvent::Error { .. } => eprint!("{rendered}"),
                _ => print!("{rendered}"),
            }
        },
        |class| use_case.run_with_events(&DeployOptions::new(class), events.clone()),
    )?;

    Ok(Exit::Success)
}
