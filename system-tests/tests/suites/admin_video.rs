// system-tests/tests/suites/admin_video.rs
// ============================================================================
// Module: Admin Video Suite
// Description: End-to-end video tagging pipeline against the admin backend.
// Purpose: Prove registration, bounded polling, and final tag listing.
// Dependencies: system-tests helpers, storecheck-client, storecheck-core
// ============================================================================

//! End-to-end video tagging scenario: registration produces the video
//! identifier and title artifacts, the poll step waits through the
//! `processing`/null-tags phase with the cooperative throttle pause, and
//! the listing step reads the final tags.

use std::thread::sleep;

use storecheck_client::ApiClient;
use storecheck_client::endpoints;
use storecheck_client::models::LoginRequest;
use storecheck_client::models::LoginResponse;
use storecheck_client::models::VideoRegisterRequest;
use storecheck_client::models::VideoRegisterResponse;
use storecheck_client::models::VideoTagStatusResponse;
use storecheck_client::models::VideoTagsResponse;
use storecheck_core::Check;
use storecheck_core::ContextKey;
use storecheck_core::RunContext;
use storecheck_core::StepError;
use storecheck_core::TestPlan;
use storecheck_core::verify;

use crate::helpers::backends;
use crate::helpers::fixtures;
use crate::helpers::harness;
use crate::helpers::harness::BackendHandle;
use crate::helpers::readiness::wait_for_backend_ready;
use crate::helpers::timeouts::READINESS_TIMEOUT;

/// Spawns the admin stub and waits until it serves.
fn start_admin() -> BackendHandle {
    let handle = harness::spawn_backend("admin", backends::admin_router())
        .unwrap_or_else(|err| panic!("spawn admin stub: {err}"));
    wait_for_backend_ready(handle.base_url(), READINESS_TIMEOUT)
        .unwrap_or_else(|err| panic!("admin stub readiness: {err}"));
    handle
}

#[test]
fn video_pipeline_polls_until_tags_ready() {
    let handle = start_admin();
    let config = fixtures::suite_config(handle.base_url(), handle.base_url());
    let client = ApiClient::new(&config.admin)
        .unwrap_or_else(|err| panic!("build admin client: {err}"));
    let pause = config.timings.throttle_pause();
    let attempts = config.timings.poll_attempts;

    let mut plan = TestPlan::new();
    plan.step("admin_login", 1, &[], |ctx| {
        let request = LoginRequest {
            phone: config.credentials.phone.clone(),
            otp: config.credentials.one_time_code.clone(),
        };
        let record = client.post_json(endpoints::admin::LOGIN, &request, None)?;
        verify(endpoints::admin::LOGIN, &record, &[Check::StatusEquals(200)])?;
        let login: LoginResponse = record.decode(LoginResponse::SCHEMA)?;
        ctx.set(ContextKey::AuthToken, login.access_token);
        Ok(())
    })
    .unwrap_or_else(|err| panic!("register admin_login: {err}"));

    plan.step("video_register", 2, &["admin_login"], |ctx| {
        let token = ctx.require(ContextKey::AuthToken)?.to_string();
        let request = VideoRegisterRequest {
            title: fixtures::generated_video_title(),
            source_url: "https://cdn.example.test/uploads/lookbook.mp4".to_string(),
        };
        let record = client.post_json(endpoints::admin::VIDEO_REGISTER, &request, Some(&token))?;
        verify(
            endpoints::admin::VIDEO_REGISTER,
            &record,
            &[
                Check::StatusEquals(200),
                Check::FieldPresent("videoId".to_string()),
            ],
        )?;
        let registered: VideoRegisterResponse = record.decode(VideoRegisterResponse::SCHEMA)?;
        ctx.set(ContextKey::VideoId, registered.video_id);
        ctx.set(ContextKey::VideoTitle, request.title);
        Ok(())
    })
    .unwrap_or_else(|err| panic!("register video_register: {err}"));

    plan.step("video_tag_poll", 3, &["video_register"], |ctx| {
        let token = ctx.require(ContextKey::AuthToken)?.to_string();
        let video_id = ctx.get_or(ContextKey::VideoId, fixtures::VIDEO_ID).to_string();
        let path = endpoints::admin::video_tag_status(&video_id);
        for _ in 0 .. attempts {
            let record = client.get(&path, &[], Some(&token))?;
            verify(&path, &record, &[Check::StatusEquals(200)])?;
            let status: VideoTagStatusResponse =
                record.decode(VideoTagStatusResponse::SCHEMA)?;
            if status.is_done() {
                let bundle = status.tags.value().ok_or_else(|| {
                    StepError::Other("pipeline done but tags absent or null".to_string())
                })?;
                if bundle.labels.is_empty() {
                    return Err(StepError::Other("pipeline done with no labels".to_string()));
                }
                return Ok(());
            }
            // While pending the field is an explicit null, never absent.
            if status.tags.is_missing() {
                return Err(StepError::Other(
                    "pending status dropped the tags field entirely".to_string(),
                ));
            }
            sleep(pause);
        }
        Err(StepError::Other(format!("tag pipeline not done after {attempts} polls")))
    })
    .unwrap_or_else(|err| panic!("register video_tag_poll: {err}"));

    plan.step("video_tags", 4, &["video_tag_poll"], |ctx| {
        let token = ctx.require(ContextKey::AuthToken)?.to_string();
        let video_id = ctx.get_or(ContextKey::VideoId, fixtures::VIDEO_ID).to_string();
        let path = endpoints::admin::video_tags(&video_id);
        let record = client.get(&path, &[], Some(&token))?;
        verify(
            &path,
            &record,
            &[
                Check::StatusEquals(200),
                Check::ArrayNonEmpty("data".to_string()),
                Check::FieldPresent("data.0.label".to_string()),
            ],
        )?;
        let tags: VideoTagsResponse = record.decode(VideoTagsResponse::SCHEMA)?;
        if !tags.data.iter().any(|tag| tag.label == "saree") {
            return Err(StepError::Other("expected the saree label in final tags".to_string()));
        }
        Ok(())
    })
    .unwrap_or_else(|err| panic!("register video_tags: {err}"));

    let mut ctx = RunContext::new();
    let report = plan.run(&mut ctx);
    assert!(report.all_passed(), "video pipeline failed: {:?}", report.outcomes());
    assert_eq!(ctx.get(ContextKey::VideoId), Some(fixtures::VIDEO_ID));
    assert!(ctx.is_set(ContextKey::VideoTitle));

    handle.shutdown();
}
