use std::time::Duration;

use anyhow::{Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use drill_core::model::{
    DEFAULT_MATRIX_QUESTION_COUNT, DEFAULT_RANDOM_QUESTION_COUNT, OperandRange, OperandSource,
    QuestionOrder, SessionOptions, SessionTemplate, SessionType,
};
use drill_core::stats;
use services::{AnswerOutcome, AppServices};

use crate::format;

/// Ordering choices for custom sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OrderArg {
    /// Every pair in order
    All,
    /// Every pair, shuffled
    Shuffled,
    /// Independent random questions
    Random,
}

#[derive(Debug, Clone, clap::Args)]
pub struct CustomArgs {
    /// Session type, e.g. `add`, `mix`, `sqr`, `matrix-mul`
    #[arg(long = "type")]
    pub session_type: SessionType,

    /// Smallest operand
    #[arg(long, allow_negative_numbers = true, conflicts_with = "pool")]
    pub min: Option<i64>,

    /// Largest operand
    #[arg(long, allow_negative_numbers = true, conflicts_with = "pool")]
    pub max: Option<i64>,

    /// Explicit operands (comma-separated) instead of a range
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub pool: Vec<i64>,

    /// Question ordering (matrix sessions are always random)
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Number of questions for random ordering [default: 20, matrix: 10]
    #[arg(long)]
    pub count: Option<u32>,

    /// Also save these options as a named template
    #[arg(long)]
    pub save_template: Option<String>,
}

/// Options for a custom session, checked against the session limits.
/// Custom sessions never keep a breakdown.
pub fn custom_options(args: &CustomArgs) -> Result<SessionOptions> {
    let operands = if args.pool.is_empty() {
        let range = OperandRange::new(
            args.min.unwrap_or(OperandRange::DEFAULT.min),
            args.max.unwrap_or(OperandRange::DEFAULT.max),
        );
        if range.is_empty() {
            bail!("--min must not exceed --max");
        }
        OperandSource::Range(range)
    } else {
        OperandSource::Pool(args.pool.clone())
    };

    let is_matrix = args.session_type.matrix_operator().is_some();
    let count = args.count.unwrap_or(if is_matrix {
        DEFAULT_MATRIX_QUESTION_COUNT
    } else {
        DEFAULT_RANDOM_QUESTION_COUNT
    });
    let order = match (is_matrix, args.order) {
        (true, _) | (false, Some(OrderArg::Random)) => QuestionOrder::Random { count },
        (false, Some(OrderArg::All)) => QuestionOrder::All,
        (false, Some(OrderArg::Shuffled) | None) => QuestionOrder::AllShuffled,
    };

    let options = SessionOptions {
        session_type: args.session_type,
        operands,
        order,
        is_default: false,
    };
    options.validate()?;
    Ok(options)
}

pub async fn custom(services: &mut AppServices, args: &CustomArgs) -> Result<()> {
    let options = custom_options(args)?;
    if let Some(name) = &args.save_template {
        services
            .store_mut()
            .add_template(SessionTemplate::new(name.clone(), options.clone()));
        if services.store().save().await {
            println!("saved template `{name}`");
        } else {
            eprintln!("warning: template could not be saved");
        }
    }
    run(services, &options).await
}

/// Run one session in the terminal and record it when finished.
pub async fn run(services: &mut AppServices, options: &SessionOptions) -> Result<()> {
    let (practice, store) = services.parts_mut();
    let settings = store.settings().clone();
    let mut session = practice.start(options, store)?;

    println!(
        "{}: {} questions. Type `q` to stop.",
        options.session_type.name(),
        session.total()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(question) = session.current_question().cloned() {
        if settings.show_progress_bar() {
            println!("{}", format::progress_bar(&session.progress()));
        }
        for line in format::question(&question) {
            println!("{line}");
        }

        loop {
            let Some(input) = lines.next_line().await? else {
                println!("session abandoned");
                return Ok(());
            };
            if input.trim().eq_ignore_ascii_case("q") {
                debug!(answered = session.answered(), "session abandoned");
                println!("session abandoned");
                return Ok(());
            }

            let answer = match format::parse_answer(&question, &input) {
                Ok(answer) => answer,
                Err(err) => {
                    println!("{err}");
                    continue;
                }
            };

            match practice.answer_current(&mut session, &answer)? {
                AnswerOutcome::Incorrect => println!("not quite, try again"),
                AnswerOutcome::Correct { elapsed_ms, .. } => {
                    println!("correct ({})", format::seconds(elapsed_ms));
                    tokio::time::sleep(Duration::from_millis(settings.feedback_delay_ms())).await;
                    break;
                }
                AnswerOutcome::AlreadyComplete => break,
            }
        }
    }

    let finished = practice.finish(session, store).await?;
    let results = &finished.results;
    println!();
    println!(
        "done: {} questions in {}",
        results.question_count(),
        format::seconds(results.total_time_ms())
    );
    if let Some(avg) = results.average_time_ms() {
        println!("average {}", format::seconds_f(avg));
    }
    if results.breakdown().is_some() {
        println!("slowest:");
        for item in stats::slowest(results, 3) {
            println!("  {} = {}  {}", item.question, item.question.ans, format::seconds(item.time_ms));
        }
    }
    if !finished.saved {
        eprintln!("warning: results could not be saved");
    }
    Ok(())
}
