use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use clap::Args;
use rentmatch::error::AppError;
use rentmatch::matchmaking::history::RequestHistoryImporter;
use rentmatch::matchmaking::requests::{
    LandlordId, MatchmakingService, PolicyConfig, PolicyEngine, RentalRequest, RequestBackend,
    RequestId, RequestLedger, RequestStatus, SendDecision, TenantId,
};

use crate::infra::InMemoryRequestBackend;

#[derive(Args, Debug)]
pub(crate) struct RequestsReportArgs {
    /// Request history CSV export (Request ID, Landlord ID, Tenant ID,
    /// Status, Created At)
    #[arg(long)]
    pub(crate) history_csv: PathBuf,
    /// Landlord whose pending window should be evaluated
    #[arg(long)]
    pub(crate) landlord: String,
    /// Tenant to check eligibility against, and whose countdown to show
    #[arg(long)]
    pub(crate) tenant: Option<String>,
    /// Evaluation instant (RFC 3339; defaults to now)
    #[arg(long, value_parser = parse_instant)]
    pub(crate) at: Option<DateTime<Utc>>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation instant (RFC 3339; defaults to now)
    #[arg(long, value_parser = parse_instant)]
    pub(crate) at: Option<DateTime<Utc>>,
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    rentmatch::matchmaking::requests::parse_created_at(raw)
        .ok_or_else(|| format!("failed to parse '{raw}' as an RFC 3339 timestamp"))
}

pub(crate) fn run_requests_report(args: RequestsReportArgs) -> Result<(), AppError> {
    let RequestsReportArgs {
        history_csv,
        landlord,
        tenant,
        at,
    } = args;

    let now = at.unwrap_or_else(Utc::now);
    let ledger = RequestHistoryImporter::from_path(history_csv)?;
    let engine = PolicyEngine::new(PolicyConfig::default());

    let landlord_id = LandlordId(landlord);
    let mine: Vec<RentalRequest> = ledger
        .requests()
        .iter()
        .filter(|request| request.landlord_id == landlord_id)
        .cloned()
        .collect();

    println!("Request history report (evaluated {now})");
    println!(
        "Landlord {}: {} request(s) on file",
        landlord_id.0,
        mine.len()
    );

    if !ledger.warnings().is_empty() {
        println!("\nDiscarded records");
        for warning in ledger.warnings() {
            println!("- {}: {}", warning.request_id.0, warning.detail);
        }
    }

    let window = engine.landlord_window(&mine, now);
    println!("\nPending window");
    println!("- active pending: {}", window.active_pending_count);
    match window.oldest_pending_at {
        Some(at) => println!("- oldest pending: {at}"),
        None => println!("- oldest pending: none"),
    }
    match window.next_available_at {
        Some(at) => println!("- next slot opens: {at}"),
        None => println!("- next slot opens: now"),
    }

    if let Some(tenant) = tenant {
        let tenant_id = TenantId(tenant);
        let eligibility = engine.eligibility(&mine, &tenant_id, now);
        println!("\nEligibility toward {}", tenant_id.0);
        println!("- {}", eligibility.summary());

        let theirs: Vec<RentalRequest> = ledger
            .requests()
            .iter()
            .filter(|request| request.tenant_id == tenant_id)
            .cloned()
            .collect();
        render_activity(&engine, &theirs, &tenant_id, now);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = args.at.unwrap_or_else(Utc::now);
    let config = PolicyConfig::default();
    let backend = Arc::new(InMemoryRequestBackend::new(config.clone()));
    let service = MatchmakingService::new(backend.clone(), config);

    let landlord = LandlordId("malik-demo".to_string());

    // Start from the dashboard walkthrough: one fresh pending request and
    // one that left the 24h window a while ago.
    backend.insert_unchecked(RentalRequest {
        id: RequestId("req-demo-1".to_string()),
        landlord_id: landlord.clone(),
        tenant_id: TenantId("bhadot-a".to_string()),
        status: RequestStatus::Pending,
        created_at: now - Duration::hours(1),
    });
    backend.insert_unchecked(RentalRequest {
        id: RequestId("req-demo-2".to_string()),
        landlord_id: landlord.clone(),
        tenant_id: TenantId("bhadot-b".to_string()),
        status: RequestStatus::Pending,
        created_at: now - Duration::hours(25),
    });

    println!("Rental matchmaking demo (evaluated {now})");

    let overview = match service.landlord_overview(&landlord, None, now) {
        Ok(overview) => overview,
        Err(err) => {
            println!("  Overview unavailable: {err}");
            return Ok(());
        }
    };
    println!(
        "\nLandlord {} holds {} request(s), {} active pending",
        landlord.0,
        overview.requests.len(),
        overview.window.active_pending_count
    );

    for (tenant, label) in [("bhadot-c", "third"), ("bhadot-d", "fourth")] {
        let tenant_id = TenantId(tenant.to_string());
        match service.send_request(&landlord, &tenant_id, now) {
            Ok(SendDecision::Sent { request }) => {
                println!("- {label} offer to {tenant}: sent as {}", request.id.0);
            }
            Ok(SendDecision::Blocked { eligibility }) => {
                println!("- {label} offer to {tenant}: {}", eligibility.summary());
            }
            Err(err) => {
                println!("- {label} offer to {tenant}: backend rejected ({err})");
            }
        }
    }

    let accepted = match service.decide_request(
        &RequestId("req-demo-1".to_string()),
        RequestStatus::Accepted,
    ) {
        Ok(request) => request,
        Err(err) => {
            println!("  Accept failed: {err}");
            return Ok(());
        }
    };
    println!(
        "\nTenant {} accepted request {}",
        accepted.tenant_id.0, accepted.id.0
    );

    let engine = PolicyEngine::new(PolicyConfig::default());
    match backend.tenant_requests(&accepted.tenant_id) {
        Ok(records) => {
            let theirs = RequestLedger::from_records(records);
            render_activity(&engine, theirs.requests(), &accepted.tenant_id, now);
        }
        Err(err) => println!("  Tenant activity unavailable: {err}"),
    }

    Ok(())
}

fn render_activity(
    engine: &PolicyEngine,
    requests: &[RentalRequest],
    tenant_id: &TenantId,
    now: DateTime<Utc>,
) {
    let view = engine.tenant_activity(requests, true, now);
    println!("\nTenant {} activity", tenant_id.0);
    match (view.acceptance_window, view.countdown) {
        (Some(window), Some(countdown)) => {
            println!("- deactivates at {}", window.deactivation_at);
            println!(
                "- countdown: {}d {:02}h {:02}m {:02}s",
                countdown.days, countdown.hours, countdown.minutes, countdown.seconds
            );
        }
        _ => println!("- no accepted requests, no countdown"),
    }
}
