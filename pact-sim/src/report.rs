//! Human-readable rendering of scenario reports.

use colored::Colorize;

use pact_state::Response;

use crate::scenario::{Expectation, ScenarioReport, StepOutcome, StepReport};

/// Width of banner rules.
const RULE: usize = 70;

/// Print a full report to stdout.
pub fn print_report(report: &ScenarioReport) {
    println!("\n{}", "=".repeat(RULE).bright_blue());
    println!(
        "{}",
        format!("  SCENARIO {}", report.name.to_uppercase())
            .bright_blue()
            .bold()
    );
    println!("{}", "=".repeat(RULE).bright_blue());

    for step in &report.steps {
        print_step(step);
    }

    println!();
    let failures = report.failures();
    if failures.is_empty() {
        println!("{}", "=".repeat(RULE).bright_green());
        println!(
            "{}",
            format!(
                "  ALL {} STEPS PASSED ({} records)",
                report.steps.len(),
                report.records
            )
            .bright_green()
            .bold()
        );
        println!("{}", "=".repeat(RULE).bright_green());
    } else {
        println!("{}", "=".repeat(RULE).bright_red());
        println!(
            "{}",
            format!("  {} OF {} STEPS FAILED", failures.len(), report.steps.len())
                .bright_red()
                .bold()
        );
        println!("{}", "=".repeat(RULE).bright_red());
    }
}

fn print_step(step: &StepReport) {
    let status = if step.passed {
        "OK".bright_green().bold()
    } else {
        "FAIL".bright_red().bold()
    };
    println!(
        "\n{} {} {} t={} {}",
        format!("[{:>3}]", step.index).bright_cyan().bold(),
        status,
        step.caller.bold(),
        step.at,
        call_line(step)
    );
    println!("      {}", outcome_line(&step.outcome));
    if !step.passed {
        let expected = match &step.expected {
            Expectation::Ok => "ok".to_string(),
            Expectation::Rejected(name) => name.clone(),
        };
        println!("      {} {}", "expected".yellow(), expected);
    }
    for event in &step.events {
        println!("      {} {} {}", "->".dimmed(), event.topic.magenta(), event.payload);
    }
}

/// `contract.Function(arg, ...)`, with long arguments shortened.
pub fn call_line(step: &StepReport) -> String {
    let args: Vec<String> = step.args.iter().map(|a| shorten(a)).collect();
    format!("{}.{}({})", step.contract, step.function, args.join(", "))
}

/// One-line summary of a step outcome.
pub fn outcome_line(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Accepted { response } => match response {
            Response::Unit => "accepted".to_string(),
            Response::Id(id) => format!("created {}", id),
            Response::Hash(hash) => format!("hash {}", hash),
            Response::Outcome(outcome) => format!("outcome {:?}", outcome),
            Response::Auction(a) if a.has_bids() => format!(
                "auction {} highest bid {} by {} deadline {}",
                a.auction_id, a.highest_bid, a.highest_bidder, a.deadline
            ),
            Response::Auction(a) => {
                format!("auction {} no bids deadline {}", a.auction_id, a.deadline)
            }
            Response::Game(g) => format!(
                "game {} phase {:?} with {} players",
                g.game_id,
                g.phase,
                g.players.len()
            ),
            Response::Proposal(p) => format!(
                "proposal {} {:?} amount {}",
                p.proposal_id, p.status, p.amount
            ),
        },
        StepOutcome::Rejected { error, message, .. } => {
            format!("rejected {}: {}", error, message)
        }
    }
}

fn shorten(arg: &str) -> String {
    if arg.chars().count() > 20 {
        let head: String = arg.chars().take(12).collect();
        format!("{}..", head)
    } else {
        arg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pact_core::{AuctionRecord, Identity};

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("short"), "short");
        assert_eq!(
            shorten("7e95e9408bf4179ca21d79ba2361078302273095d399a51d26abd2e4243ee65f"),
            "7e95e9408bf4.."
        );
    }

    #[test]
    fn test_outcome_line() {
        let rejected = StepOutcome::Rejected {
            error: "BidTooLow".into(),
            kind: "validation".into(),
            message: "bid 5 does not exceed 10".into(),
        };
        assert_eq!(outcome_line(&rejected), "rejected BidTooLow: bid 5 does not exceed 10");

        let created = StepOutcome::Accepted {
            response: Response::Id("abc".into()),
        };
        assert_eq!(outcome_line(&created), "created abc");
    }

    #[test]
    fn test_auction_line() {
        let mut auction = AuctionRecord::open(
            "a1".into(),
            Identity::from_bytes("seller".as_bytes()),
            1000,
            1020,
        );
        let line = outcome_line(&StepOutcome::Accepted {
            response: Response::Auction(auction.clone()),
        });
        assert_eq!(line, "auction a1 no bids deadline 1020");

        auction.highest_bid = 150;
        auction.highest_bidder = Identity::from_bytes("carol".as_bytes());
        let line = outcome_line(&StepOutcome::Accepted {
            response: Response::Auction(auction),
        });
        assert!(line.starts_with("auction a1 highest bid 150 by "));
    }
}
