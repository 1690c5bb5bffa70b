use anyhow::{Context, Result, bail};
use clap::Subcommand;

use drill_core::model::{OperandSource, QuestionOrder, SessionOptions, SettingsDraft};
use services::AppServices;
use services::stats_view::history_items;

use crate::commands::practice;
use crate::format;

#[derive(Debug, Subcommand)]
pub enum TemplateAction {
    /// List saved templates
    List,
    /// Run a saved template
    Start { index: usize },
    /// Delete a saved template
    Remove { index: usize },
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    /// Recent sessions, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Delete a session by the index shown in `history list`
    Remove { index: usize },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        progress_bar: Option<bool>,
        /// Cap on the time counted for one answer, in milliseconds
        #[arg(long, conflicts_with = "no_time_cap")]
        time_cap: Option<u64>,
        /// Count answer times uncapped
        #[arg(long)]
        no_time_cap: bool,
        /// Pause after a correct answer, in milliseconds
        #[arg(long)]
        feedback_delay: Option<u64>,
    },
}

pub async fn template(services: &mut AppServices, action: TemplateAction) -> Result<()> {
    match action {
        TemplateAction::List => {
            let templates = services.store().templates();
            if templates.is_empty() {
                println!("no templates");
            }
            for (index, template) in templates.iter().enumerate() {
                println!("{index:>3}  {:<20} {}", template.name, describe(&template.options));
            }
        }
        TemplateAction::Start { index } => {
            let options = services
                .store()
                .templates()
                .get(index)
                .map(|t| t.options.clone())
                .with_context(|| format!("no template at index {index}"))?;
            practice::run(services, &options).await?;
        }
        TemplateAction::Remove { index } => {
            services.store_mut().remove_template(index)?;
            save(services, "template removed").await;
        }
    }
    Ok(())
}

pub async fn history(services: &mut AppServices, action: HistoryAction) -> Result<()> {
    match action {
        HistoryAction::List { limit } => {
            let items = history_items(services.store().history());
            if items.is_empty() {
                println!("no sessions yet");
            }
            for item in items.into_iter().take(limit) {
                let average = item
                    .average_time_ms
                    .map(format::seconds_f)
                    .unwrap_or_default();
                println!(
                    "{:>3}  {}  {:<12} {:>4} questions  {:>9}  avg {average}",
                    item.index,
                    item.completed_at.format("%Y-%m-%d %H:%M"),
                    item.session_type.to_string(),
                    item.question_count,
                    format::seconds(item.total_time_ms),
                );
            }
        }
        HistoryAction::Remove { index } => {
            services.store_mut().remove_result(index)?;
            save(services, "session removed").await;
        }
    }
    Ok(())
}

pub async fn settings(services: &mut AppServices, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => print_settings(&services.store().settings().to_draft()),
        SettingsAction::Set {
            progress_bar,
            time_cap,
            no_time_cap,
            feedback_delay,
        } => {
            let mut draft = services.store().settings().to_draft();
            if let Some(show) = progress_bar {
                draft.show_progress_bar = show;
            }
            if no_time_cap {
                draft.answer_time_cap_ms = None;
            } else if let Some(cap) = time_cap {
                draft.answer_time_cap_ms = Some(cap);
            }
            if let Some(delay) = feedback_delay {
                draft.feedback_delay_ms = delay;
            }

            let settings = draft.validate()?;
            services.store_mut().set_settings(settings);
            print_settings(&services.store().settings().to_draft());
            save(services, "settings saved").await;
        }
    }
    Ok(())
}

pub fn export(services: &AppServices) -> Result<()> {
    let Some(text) = services.store().export_text() else {
        bail!("data could not be exported");
    };
    println!("{text}");
    Ok(())
}

pub async fn import(services: &mut AppServices, text: &str) -> Result<()> {
    if !services.store_mut().import_text(text) {
        bail!("import rejected: the text is not valid exported data");
    }
    save(services, "data imported").await;
    Ok(())
}

/// Delete all history, templates and settings. Needs `confirmed`.
pub async fn reset(services: &mut AppServices, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("this deletes all sessions, templates and settings; pass --yes to confirm");
    }
    services.store_mut().reset();
    save(services, "all practice data deleted").await;
    Ok(())
}

async fn save(services: &AppServices, done: &str) {
    if services.store().save().await {
        println!("{done}");
    } else {
        eprintln!("warning: changes could not be saved");
    }
}

fn print_settings(draft: &SettingsDraft) {
    println!("progress bar    {}", draft.show_progress_bar);
    match draft.answer_time_cap_ms {
        Some(cap) => println!("time cap        {}", format::seconds(cap)),
        None => println!("time cap        none"),
    }
    println!("feedback delay  {}ms", draft.feedback_delay_ms);
}

fn describe(options: &SessionOptions) -> String {
    let operands = match &options.operands {
        OperandSource::Range(range) => format!("{}..={}", range.min, range.max),
        OperandSource::Pool(pool) => {
            let values: Vec<String> = pool.iter().map(ToString::to_string).collect();
            format!("[{}]", values.join(","))
        }
    };
    let order = match options.order {
        QuestionOrder::All => "all".to_owned(),
        QuestionOrder::AllShuffled => "shuffled".to_owned(),
        QuestionOrder::Random { count } => format!("{count} random"),
    };
    format!("{} {operands} {order}", options.session_type)
}
