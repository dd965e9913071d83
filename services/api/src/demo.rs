use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use clap::Args;
use protocol_review::error::AppError;
use protocol_review::workflows::review::assignment::{
    Clock, ProtocolId, RankedReviewer, ResearchType, ReviewAssignmentService, ReviewStore,
    ReviewerId,
};

use crate::infra::seed_review_store;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Protocol to run the walkthrough against.
    #[arg(long, default_value = "PR-2026-031")]
    pub(crate) protocol: String,
    /// Research type code driving the assignment policy.
    #[arg(long, default_value = "public-health")]
    pub(crate) research_type: String,
    /// Exemption subtype (required when research type is 'exemption').
    #[arg(long)]
    pub(crate) subtype: Option<String>,
    /// Comma-separated keywords matched against reviewer specializations.
    #[arg(long)]
    pub(crate) keywords: Option<String>,
    /// How many days past the deadline the simulated clock jumps.
    #[arg(long, default_value_t = 3)]
    pub(crate) days_late: i64,
}

/// Clock the demo can move forward to show overdue detection without
/// waiting out a real review window.
struct DemoClock {
    now: Mutex<DateTime<Utc>>,
}

impl DemoClock {
    fn starting_now() -> Self {
        Self {
            now: Mutex::new(Utc::now()),
        }
    }

    fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().expect("clock mutex poisoned");
        *guard += by;
    }

    fn current(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

impl Clock for DemoClock {
    fn now(&self) -> DateTime<Utc> {
        self.current()
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        protocol,
        research_type,
        subtype,
        keywords,
        days_late,
    } = args;

    let research = ResearchType::from_codes(&research_type, subtype.as_deref())
        .map_err(|error| AppError::Assignment(error.into()))?;
    let keywords: Vec<String> = keywords
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect();

    let store = seed_review_store();
    let clock = Arc::new(DemoClock::starting_now());
    let service = ReviewAssignmentService::with_clock(store.clone(), clock.clone());
    let protocol = ProtocolId(protocol);

    println!("Reviewer assignment walkthrough for {protocol}");

    println!("\n1. Directory recommendation ({})", research.code());
    let ranked = service
        .recommend(research, &keywords)
        .map_err(AppError::Assignment)?;
    for candidate in ranked.iter().take(5) {
        println!(
            "  - {} ({}) score {:.1} | load {}/{}",
            candidate.reviewer.display_name,
            candidate.reviewer.short_code,
            candidate.score,
            candidate.reviewer.current_load,
            candidate.reviewer.max_load
        );
    }

    let chosen = shortlist(&ranked, required_count(research));

    println!("\n2. Assigning {} reviewers", chosen.len());
    let slots = service
        .assign(&protocol, chosen, research)
        .map_err(AppError::Assignment)?;
    for slot in &slots {
        println!(
            "  - position {} | {} | {} | due {}",
            slot.position,
            slot.reviewer,
            slot.instrument.label(),
            slot.deadline.format("%Y-%m-%d")
        );
    }

    let first = slots.first().expect("policy never yields zero slots");
    let jump = (first.deadline - clock.current()) + Duration::days(days_late);
    clock.advance(jump);
    println!(
        "\n3. Overdue scan, {days_late} day(s) past the deadline (simulated {})",
        clock.current().format("%Y-%m-%d")
    );
    let overdue = service
        .scan_overdue(&protocol)
        .map_err(AppError::Assignment)?;
    for summary in &overdue {
        println!(
            "  - slot {} | {} | {} day(s) overdue",
            summary.slot, summary.reviewer, summary.days_overdue
        );
    }

    let replacement = ranked
        .iter()
        .map(|candidate| &candidate.reviewer)
        .find(|reviewer| reviewer.active && !slots.iter().any(|slot| slot.reviewer == reviewer.id))
        .expect("seeded roster always has a spare reviewer");

    println!(
        "\n4. Reassigning slot {} to {}",
        first.id, replacement.display_name
    );
    let updated = service
        .reassign(
            &protocol,
            &first.id,
            &replacement.id,
            "missed deadline",
            "demo-chair",
        )
        .map_err(AppError::Assignment)?;
    println!(
        "  - now assigned to {} | fresh deadline {}",
        updated.reviewer,
        updated.deadline.format("%Y-%m-%d")
    );
    for id in [&first.reviewer, &replacement.id] {
        if let Ok(Some(profile)) = store.reviewer(id) {
            println!("  - load of {}: {}", profile.display_name, profile.current_load);
        }
    }

    println!("\n5. Reassignment history");
    let history = service
        .reassignment_history(&protocol)
        .map_err(AppError::Assignment)?;
    match serde_json::to_string_pretty(&history) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("  history unavailable: {err}"),
    }

    Ok(())
}

fn required_count(research: ResearchType) -> usize {
    protocol_review::workflows::review::assignment::assignment_policy(research).required_reviewers
}

/// The top-ranked active candidates. Inactive reviewers can sit anywhere in
/// the ranking, so they are skipped over rather than ending the walk.
fn shortlist(ranked: &[RankedReviewer], count: usize) -> Vec<ReviewerId> {
    ranked
        .iter()
        .filter(|candidate| candidate.reviewer.active)
        .take(count)
        .map(|candidate| candidate.reviewer.id.clone())
        .collect()
}
