// system-tests/tests/suites/buyer_collections.rs
// ============================================================================
// Module: Buyer Collections Suite
// Description: End-to-end collection listing and bulk counting scenarios.
// Purpose: Prove listing shape and rate-limit abort during bulk counts.
// Dependencies: system-tests helpers, storecheck-client, storecheck-core
// ============================================================================

//! End-to-end collection scenarios. Bulk counting iterates the listing
//! with a cooperative pause between sub-requests; a rate-limit signal
//! (HTTP 401/429 or the vendor error envelope) aborts further iteration
//! and records a distinguishable marker per remaining collection instead
//! of failing the whole scenario.

use std::cell::RefCell;
use std::thread::sleep;

use storecheck_client::ApiClient;
use storecheck_client::endpoints;
use storecheck_client::models::CollectionCountResponse;
use storecheck_client::models::CollectionsResponse;
use storecheck_client::models::LoginRequest;
use storecheck_client::models::LoginResponse;
use storecheck_client::models::VendorEnvelope;
use storecheck_core::Check;
use storecheck_core::ContextKey;
use storecheck_core::FieldKind;
use storecheck_core::RunContext;
use storecheck_core::StepError;
use storecheck_core::TestPlan;
use storecheck_core::verify;

use crate::helpers::backends;
use crate::helpers::fixtures;
use crate::helpers::harness;
use crate::helpers::readiness::wait_for_backend_ready;
use crate::helpers::timeouts::READINESS_TIMEOUT;

/// Outcome marker for one collection in the bulk counting loop.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CountOutcome {
    /// The backend served a product count.
    Counted(u64),
    /// Counting was aborted by a rate-limit or auth signal.
    Blocked,
}

#[test]
fn collections_listing_is_well_formed() {
    let (router, _state) = backends::buyer_router();
    let handle = harness::spawn_backend("buyer", router)
        .unwrap_or_else(|err| panic!("spawn buyer stub: {err}"));
    wait_for_backend_ready(handle.base_url(), READINESS_TIMEOUT)
        .unwrap_or_else(|err| panic!("buyer stub readiness: {err}"));
    let config = fixtures::suite_config(handle.base_url(), handle.base_url());
    let client = ApiClient::new(&config.buyer)
        .unwrap_or_else(|err| panic!("build buyer client: {err}"));
    let threshold = config.timings.response_time();

    let mut plan = TestPlan::new();
    plan.step("buyer_login", 1, &[], |ctx| {
        let request = LoginRequest {
            phone: config.credentials.phone.clone(),
            otp: config.credentials.one_time_code.clone(),
        };
        let record = client.post_json(endpoints::buyer::LOGIN, &request, None)?;
        verify(endpoints::buyer::LOGIN, &record, &[Check::StatusEquals(200)])?;
        let login: LoginResponse = record.decode(LoginResponse::SCHEMA)?;
        ctx.set(ContextKey::BuyerAppToken, login.access_token);
        Ok(())
    })
    .unwrap_or_else(|err| panic!("register buyer_login: {err}"));

    plan.step("buyer_collections", 2, &["buyer_login"], |ctx| {
        let token = ctx.require(ContextKey::BuyerAppToken)?.to_string();
        let record = client.get(endpoints::buyer::COLLECTIONS, &[], Some(&token))?;
        verify(
            endpoints::buyer::COLLECTIONS,
            &record,
            &[
                Check::StatusEquals(200),
                Check::TimeUnder(threshold),
                Check::FieldType("collections".to_string(), FieldKind::Array),
                Check::ArrayNonEmpty("collections".to_string()),
                Check::FieldPresent("collections.0.name".to_string()),
            ],
        )?;
        let listing: CollectionsResponse = record.decode(CollectionsResponse::SCHEMA)?;
        if listing.collections.iter().any(|collection| collection.name.is_empty()) {
            return Err(StepError::Other("collection with empty name".to_string()));
        }
        Ok(())
    })
    .unwrap_or_else(|err| panic!("register buyer_collections: {err}"));

    let mut ctx = RunContext::new();
    let report = plan.run(&mut ctx);
    assert!(report.all_passed(), "collections plan failed: {:?}", report.outcomes());

    handle.shutdown();
}

#[test]
fn bulk_count_aborts_on_rate_limit_signal() {
    let (router, state) = backends::buyer_router();
    let handle = harness::spawn_backend("buyer", router)
        .unwrap_or_else(|err| panic!("spawn buyer stub: {err}"));
    wait_for_backend_ready(handle.base_url(), READINESS_TIMEOUT)
        .unwrap_or_else(|err| panic!("buyer stub readiness: {err}"));
    let config = fixtures::suite_config(handle.base_url(), handle.base_url());
    let client = ApiClient::new(&config.buyer)
        .unwrap_or_else(|err| panic!("build buyer client: {err}"));
    let pause = config.timings.throttle_pause();

    let outcomes: RefCell<Vec<(String, CountOutcome)>> = RefCell::new(Vec::new());

    let mut plan = TestPlan::new();
    plan.step("buyer_login", 1, &[], |ctx| {
        let request = LoginRequest {
            phone: config.credentials.phone.clone(),
            otp: config.credentials.one_time_code.clone(),
        };
        let record = client.post_json(endpoints::buyer::LOGIN, &request, None)?;
        verify(endpoints::buyer::LOGIN, &record, &[Check::StatusEquals(200)])?;
        let login: LoginResponse = record.decode(LoginResponse::SCHEMA)?;
        ctx.set(ContextKey::BuyerAppToken, login.access_token);
        Ok(())
    })
    .unwrap_or_else(|err| panic!("register buyer_login: {err}"));

    plan.step("collection_counts", 2, &["buyer_login"], |ctx| {
        let token = ctx.require(ContextKey::BuyerAppToken)?.to_string();
        let record = client.get(endpoints::buyer::COLLECTIONS, &[], Some(&token))?;
        verify(endpoints::buyer::COLLECTIONS, &record, &[Check::StatusEquals(200)])?;
        let listing: CollectionsResponse = record.decode(CollectionsResponse::SCHEMA)?;

        let mut limited = false;
        for collection in &listing.collections {
            if limited {
                outcomes.borrow_mut().push((collection.id.clone(), CountOutcome::Blocked));
                continue;
            }
            let path = endpoints::buyer::collection_count(&collection.id);
            let record = client.get(&path, &[], Some(&token))?;
            if record.status == 401 || record.status == 429 {
                limited = true;
                outcomes.borrow_mut().push((collection.id.clone(), CountOutcome::Blocked));
                continue;
            }
            let envelope: VendorEnvelope = record.decode(VendorEnvelope::SCHEMA)?;
            if envelope.signals_error() {
                limited = true;
                outcomes.borrow_mut().push((collection.id.clone(), CountOutcome::Blocked));
                continue;
            }
            let count: CollectionCountResponse =
                record.decode(CollectionCountResponse::SCHEMA)?;
            outcomes
                .borrow_mut()
                .push((collection.id.clone(), CountOutcome::Counted(count.count)));
            // Cooperative self-throttle between sub-requests, not a retry.
            sleep(pause);
        }
        Ok(())
    })
    .unwrap_or_else(|err| panic!("register collection_counts: {err}"));

    let mut ctx = RunContext::new();
    let report = plan.run(&mut ctx);
    assert!(report.all_passed(), "bulk count plan failed: {:?}", report.outcomes());

    let outcomes = outcomes.into_inner();
    assert_eq!(outcomes.len(), 4, "every collection gets a marker");
    assert!(matches!(outcomes[0].1, CountOutcome::Counted(_)));
    assert!(matches!(outcomes[1].1, CountOutcome::Counted(_)));
    assert_eq!(outcomes[2].1, CountOutcome::Blocked);
    assert_eq!(outcomes[3].1, CountOutcome::Blocked);

    // The loop stopped calling after the limit tripped: two successes plus
    // the request that tripped it.
    assert_eq!(state.count_requests(), fixtures::COUNT_REQUESTS_BEFORE_LIMIT + 1);

    handle.shutdown();
}
