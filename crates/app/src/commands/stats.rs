use drill_core::model::{MatrixOperator, OperandRange, SessionResults, SessionType};
use services::stats_view::EXTREMES_SHOWN;
use services::{AppServices, OperatorStats, SessionTypeStats};

use crate::format;

pub fn show(services: &AppServices, session_type: Option<SessionType>, min_samples: usize) {
    let history = services.store().history();
    match session_type {
        None => overview(history),
        Some(ty) => match ty.operator() {
            Some(oper) => operator(&OperatorStats::build(
                history,
                oper,
                OperandRange::DEFAULT,
                min_samples,
            )),
            None => summary(&SessionTypeStats::build(history, ty)),
        },
    }
}

fn overview(history: &[SessionResults]) {
    if history.is_empty() {
        println!("no sessions yet");
        return;
    }
    let types = SessionType::ARITHMETIC
        .into_iter()
        .chain(MatrixOperator::ALL.into_iter().map(SessionType::Matrix));
    for ty in types {
        let view = SessionTypeStats::build(history, ty);
        if view.attempts > 0 {
            summary(&view);
        }
    }
}

fn summary(view: &SessionTypeStats) {
    print!("{:<22} {:>3} sessions", view.session_type.name(), view.attempts);
    if let Some(best) = view.best_total_ms {
        print!("  best {}", format::seconds(best));
    }
    if let Some(avg) = view.latest.as_ref().and_then(SessionResults::average_time_ms) {
        print!("  latest avg {}", format::seconds_f(avg));
    }
    println!();
}

fn operator(view: &OperatorStats) {
    println!("{}: {} sessions", view.oper.name(), view.attempts);
    let Some(latest) = &view.latest else {
        return;
    };
    println!(
        "latest: {} questions in {}",
        latest.question_count(),
        format::seconds(latest.total_time_ms())
    );

    if !view.fastest.is_empty() {
        println!("fastest {EXTREMES_SHOWN}:");
        for item in &view.fastest {
            println!("  {} = {}  {}", item.question, item.question.ans, format::seconds(item.time_ms));
        }
        println!("slowest {EXTREMES_SHOWN}:");
        for item in &view.slowest {
            println!("  {} = {}  {}", item.question, item.question.ans, format::seconds(item.time_ms));
        }
    }

    println!("average seconds per pair (. = not enough sessions):");
    let values = view.range.values();
    let header: Vec<String> = values.iter().map(|v| format!("{v:>5}")).collect();
    println!("    {}", header.join(""));
    for (a, row) in values.iter().zip(&view.averages) {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Some(ms) => format!("{:>5.1}", ms / 1_000.0),
                None => format!("{:>5}", "."),
            })
            .collect();
        println!("{a:>4}{}", cells.join(""));
    }
}
