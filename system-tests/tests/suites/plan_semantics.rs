// system-tests/tests/suites/plan_semantics.rs
// ============================================================================
// Module: Plan Semantics Suite
// Description: End-to-end dependency and isolation semantics across suites.
// Purpose: Prove skip propagation from a failed login and context isolation.
// Dependencies: system-tests helpers, storecheck-client, storecheck-core
// ============================================================================

//! End-to-end plan semantics: a failed login skips its whole dependent
//! chain with diagnostics naming the failed predecessor, and the admin
//! and buyer suites keep their run contexts fully isolated.

use storecheck_client::ApiClient;
use storecheck_client::endpoints;
use storecheck_client::models::LoginRequest;
use storecheck_client::models::LoginResponse;
use storecheck_core::Check;
use storecheck_core::ContextKey;
use storecheck_core::RunContext;
use storecheck_core::StepState;
use storecheck_core::TestPlan;
use storecheck_core::verify;

use crate::helpers::artifacts::ScenarioArtifacts;
use crate::helpers::backends;
use crate::helpers::fixtures;
use crate::helpers::harness;
use crate::helpers::readiness::wait_for_backend_ready;
use crate::helpers::timeouts::READINESS_TIMEOUT;

#[test]
fn failed_login_skips_catalog_chain_end_to_end() {
    let handle = harness::spawn_backend("admin", backends::admin_router())
        .unwrap_or_else(|err| panic!("spawn admin stub: {err}"));
    wait_for_backend_ready(handle.base_url(), READINESS_TIMEOUT)
        .unwrap_or_else(|err| panic!("admin stub readiness: {err}"));
    let config = fixtures::suite_config(handle.base_url(), handle.base_url());
    let client = ApiClient::new(&config.admin)
        .unwrap_or_else(|err| panic!("build admin client: {err}"));

    let mut plan = TestPlan::new();
    plan.step("admin_login", 1, &[], |ctx| {
        let request = LoginRequest {
            phone: config.credentials.phone.clone(),
            // Deliberately wrong code: the backend rejects with 401.
            otp: "000000".to_string(),
        };
        let record = client.post_json(endpoints::admin::LOGIN, &request, None)?;
        verify(endpoints::admin::LOGIN, &record, &[Check::StatusEquals(200)])?;
        let login: LoginResponse = record.decode(LoginResponse::SCHEMA)?;
        ctx.set(ContextKey::AuthToken, login.access_token);
        Ok(())
    })
    .unwrap_or_else(|err| panic!("register admin_login: {err}"));

    plan.step("catalog_search", 2, &["admin_login"], |_| Ok(()))
        .unwrap_or_else(|err| panic!("register catalog_search: {err}"));
    plan.step("catalog_edit", 3, &["catalog_search"], |_| Ok(()))
        .unwrap_or_else(|err| panic!("register catalog_edit: {err}"));

    let mut ctx = RunContext::new();
    let report = plan.run(&mut ctx);

    let artifacts = ScenarioArtifacts::new("failed_login_chain")
        .unwrap_or_else(|err| panic!("artifact root: {err}"));
    let path = artifacts
        .write_plan_report(&report)
        .unwrap_or_else(|err| panic!("write plan report: {err}"));
    assert!(path.exists());

    assert_eq!(report.state_of("admin_login"), Some(StepState::Failed));
    assert_eq!(report.state_of("catalog_search"), Some(StepState::Skipped));
    assert_eq!(report.state_of("catalog_edit"), Some(StepState::Skipped));

    let login_detail = report.detail_of("admin_login").unwrap_or_default();
    assert!(login_detail.contains("status code"), "failure names the check: {login_detail}");
    assert!(login_detail.contains("401"), "failure names the actual value: {login_detail}");

    let skip_detail = report.detail_of("catalog_search").unwrap_or_default();
    assert!(skip_detail.contains("admin_login"), "skip names the predecessor: {skip_detail}");

    assert!(!ctx.is_set(ContextKey::AuthToken));

    handle.shutdown();
}

#[test]
fn suite_contexts_stay_isolated() {
    let admin_handle = harness::spawn_backend("admin", backends::admin_router())
        .unwrap_or_else(|err| panic!("spawn admin stub: {err}"));
    let (buyer_router, _state) = backends::buyer_router();
    let buyer_handle = harness::spawn_backend("buyer", buyer_router)
        .unwrap_or_else(|err| panic!("spawn buyer stub: {err}"));
    wait_for_backend_ready(admin_handle.base_url(), READINESS_TIMEOUT)
        .unwrap_or_else(|err| panic!("admin stub readiness: {err}"));
    wait_for_backend_ready(buyer_handle.base_url(), READINESS_TIMEOUT)
        .unwrap_or_else(|err| panic!("buyer stub readiness: {err}"));

    let config = fixtures::suite_config(admin_handle.base_url(), buyer_handle.base_url());
    let admin_client = ApiClient::new(&config.admin)
        .unwrap_or_else(|err| panic!("build admin client: {err}"));
    let buyer_client = ApiClient::new(&config.buyer)
        .unwrap_or_else(|err| panic!("build buyer client: {err}"));

    let login_request = LoginRequest {
        phone: config.credentials.phone.clone(),
        otp: config.credentials.one_time_code.clone(),
    };

    // Each suite owns its context: token domains must never mix.
    let mut admin_ctx = RunContext::new();
    let mut admin_plan = TestPlan::new();
    admin_plan
        .step("admin_login", 1, &[], |ctx| {
            let record = admin_client.post_json(endpoints::admin::LOGIN, &login_request, None)?;
            verify(endpoints::admin::LOGIN, &record, &[Check::StatusEquals(200)])?;
            let login: LoginResponse = record.decode(LoginResponse::SCHEMA)?;
            ctx.set(ContextKey::AuthToken, login.access_token);
            Ok(())
        })
        .unwrap_or_else(|err| panic!("register admin_login: {err}"));
    let admin_report = admin_plan.run(&mut admin_ctx);

    let mut buyer_ctx = RunContext::new();
    let mut buyer_plan = TestPlan::new();
    buyer_plan
        .step("buyer_login", 1, &[], |ctx| {
            let record = buyer_client.post_json(endpoints::buyer::LOGIN, &login_request, None)?;
            verify(endpoints::buyer::LOGIN, &record, &[Check::StatusEquals(200)])?;
            let login: LoginResponse = record.decode(LoginResponse::SCHEMA)?;
            ctx.set(ContextKey::BuyerAppToken, login.access_token);
            Ok(())
        })
        .unwrap_or_else(|err| panic!("register buyer_login: {err}"));
    let buyer_report = buyer_plan.run(&mut buyer_ctx);

    assert!(admin_report.all_passed(), "admin login failed: {:?}", admin_report.outcomes());
    assert!(buyer_report.all_passed(), "buyer login failed: {:?}", buyer_report.outcomes());

    assert_eq!(admin_ctx.get(ContextKey::AuthToken), Some(fixtures::ADMIN_ACCESS_TOKEN));
    assert!(!admin_ctx.is_set(ContextKey::BuyerAppToken));
    assert_eq!(buyer_ctx.get(ContextKey::BuyerAppToken), Some(fixtures::BUYER_ACCESS_TOKEN));
    assert!(!buyer_ctx.is_set(ContextKey::AuthToken));

    admin_handle.shutdown();
    buyer_handle.shutdown();
}
