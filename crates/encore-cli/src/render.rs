//! Terminal rendering for scenario playback.
//!
//! No alternate screen or cursor tricks: messages append as they reveal,
//! like a chat log scrolling by. Colors come from the persona palette.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use colored::{Color, Colorize};
use encore_core::{
    BackstageStage, ChatMessage, LiveRun, OrchestratorStatus, RunStatus, Scenario,
    ScenarioLibrary, Side, persona_color,
};
use encore_replay::ReplaySession;
use tokio::time::sleep;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// `encore list`: one line per built-in scenario.
pub(crate) fn list() -> Result<()> {
    let library = ScenarioLibrary::builtin();
    for key in library.keys() {
        let Some(scenario) = library.get(key) else {
            continue;
        };
        println!(
            "{}  {} {}",
            key.bold(),
            scenario.prompt.dimmed(),
            format!("({} runs)", scenario.runs.len()).dimmed()
        );
    }
    Ok(())
}

/// `encore play`: animate one scenario to completion.
pub(crate) async fn play(key: &str, file: Option<&Path>, backstage: bool) -> Result<()> {
    let library = match file {
        Some(path) => {
            let scenario = Scenario::from_json_file(path)
                .with_context(|| format!("loading scenario from {}", path.display()))?;
            let mut library = ScenarioLibrary::new();
            library.insert(key, scenario);
            library
        }
        None => ScenarioLibrary::builtin(),
    };

    let session = ReplaySession::new(library).with_backstage(backstage);
    if !session.play(key).await {
        bail!("unknown scenario '{key}', try `encore list`");
    }

    let mut printed = 0;
    let mut last_typing = None;
    let mut last_stage = BackstageStage::Hidden;
    loop {
        sleep(POLL_INTERVAL).await;

        let visible = session.visible_messages().await;
        for message in &visible[printed..] {
            print_message(message);
        }
        printed = visible.len();

        // One "is typing" line per pending reveal.
        if let Some(typing) = session.typing().await {
            let tag = (typing.sender_label.clone(), printed);
            if last_typing.as_ref() != Some(&tag) {
                let line = format!("{} is typing...", typing.sender_label);
                match typing.side {
                    Side::Left => println!("{}", line.dimmed().italic()),
                    Side::Right => println!("{:>78}", line.dimmed().italic()),
                }
                last_typing = Some(tag);
            }
        }

        let stage = session.backstage_stage().await;
        if stage > last_stage {
            if stage >= BackstageStage::Header && last_stage < BackstageStage::Header {
                print_backstage_header(&session.timer().await);
            }
            if stage >= BackstageStage::Full {
                print_run_table(&session.runs().await);
            }
            last_stage = stage;
        }

        let done = session.status().await == OrchestratorStatus::Done
            && session.fully_revealed().await;
        let settled = if backstage {
            stage >= BackstageStage::Full
        } else {
            true
        };
        if done && settled {
            break;
        }
    }

    session.dispose();
    Ok(())
}

fn print_message(message: &ChatMessage) {
    let color = persona_rgb(message.color_idx);
    let header = format!("[{}] {}", message.avatar, message.sender_label);
    match message.side {
        Side::Left => {
            println!("{}", header.color(color).bold());
            for line in message.content.lines() {
                println!("  {line}");
            }
        }
        Side::Right => {
            println!("{:>78}", header.color(color).bold().to_string());
            for line in message.content.lines() {
                println!("{line:>76}");
            }
        }
    }
    if let Some(full) = &message.full_content {
        println!(
            "{}",
            format!("  [+] truncated; {} chars in full report", full.chars().count()).dimmed()
        );
    }
    println!();
}

fn print_backstage_header(timer: &str) {
    println!();
    println!(
        "{} {}",
        "── backstage ──".color(persona_rgb(encore_core::persona::BACKSTAGE_COLOR_IDX)).bold(),
        format!("orchestrated in {timer}").dimmed()
    );
}

fn print_run_table(runs: &[LiveRun]) {
    for run in runs {
        let status = format!("{:>9}", run.status);
        let status = match run.status {
            RunStatus::Completed => status.green(),
            RunStatus::Error | RunStatus::Timeout => status.red(),
            RunStatus::Running | RunStatus::Paused => status.yellow(),
        };
        println!("  {status}  {:<45} {}", run.task, run.elapsed.dimmed());
    }
    println!();
}

/// Palette hex to a truecolor the terminal can use.
fn persona_rgb(color_idx: i32) -> Color {
    let hex = persona_color(color_idx);
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|part| u8::from_str_radix(part, 16).ok())
            .unwrap_or(255)
    };
    Color::TrueColor {
        r: channel(1..3),
        g: channel(3..5),
        b: channel(5..7),
    }
}
