//! Integration tests for resource methods
//!
//! Each method must hit its fixed verb and path with the bearer token and
//! hand back the platform envelope untouched.

mod support;

use pokitdok_infra::{Params, X12File};
use serde_json::{json, Value};
use support::{connected_client, envelope, ACCESS_TOKEN};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

/// Document served for `endpoint`; distinct per path so a misrouted call
/// cannot return another endpoint's envelope.
fn document(endpoint: &str) -> Value {
    envelope(json!({"path": endpoint}))
}

/// Answer `mock` with the endpoint's document, exactly `times` times.
async fn respond(server: &MockServer, mock: MockBuilder, endpoint: &str, times: u64) -> Value {
    let expected = document(endpoint);
    mock.and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(&expected))
        .expect(times)
        .mount(server)
        .await;
    expected
}

/// Expect exactly one authenticated call to `verb endpoint`.
async fn expect_call(server: &MockServer, verb: &str, endpoint: &str) -> Value {
    respond(server, Mock::given(method(verb)).and(path(endpoint)), endpoint, 1).await
}

#[tokio::test]
async fn test_activities_and_pricing() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;
    let none = Params::new();

    let expected = expect_call(&server, "GET", "/api/v4/activities/").await;
    assert_eq!(client.activities(None, &none).await.unwrap().into_value(), expected);

    let expected =
        expect_call(&server, "GET", "/api/v4/activities/5362b5a064da150ef6f2526c").await;
    let result = client.activities(Some("5362b5a064da150ef6f2526c"), &none).await.unwrap();
    assert_eq!(result.into_value(), expected);

    let cash = Mock::given(method("GET"))
        .and(path("/api/v4/prices/cash"))
        .and(query_param("cpt_code", "87799"))
        .and(query_param("zip_code", "32218"));
    let expected = respond(&server, cash, "/api/v4/prices/cash", 1).await;
    let prices = Params::new().with("cpt_code", "87799").with("zip_code", "32218");
    assert_eq!(client.cash_prices(&prices).await.unwrap().into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/prices/insurance").await;
    assert_eq!(client.insurance_prices(&prices).await.unwrap().into_value(), expected);
}

#[tokio::test]
async fn test_claims_endpoints() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    let claim = json!({"trading_partner_id": "MOCKPAYER", "claim": {"total_charge_amount": 60.0}});
    let submit = Mock::given(method("POST")).and(path("/api/v4/claims/")).and(body_json(&claim));
    let expected = respond(&server, submit, "/api/v4/claims/", 1).await;
    assert_eq!(client.claims(&claim).await.unwrap().into_value(), expected);

    let expected = expect_call(&server, "POST", "/api/v4/ccd/").await;
    let ccd = client.ccd(&json!({"ccd": "<ClinicalDocument/>"})).await.unwrap();
    assert_eq!(ccd.into_value(), expected);

    let expected = expect_call(&server, "POST", "/api/v4/claims/status").await;
    let status = client.claims_status(&json!({"trading_partner_id": "MOCKPAYER"})).await.unwrap();
    assert_eq!(status.into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/icd/convert/250.12").await;
    assert_eq!(client.icd_convert("250.12").await.unwrap().into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/mpc/").await;
    let search = client.mpc(None, &Params::new().with("name", "office")).await.unwrap();
    assert_eq!(search.into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/mpc/99213").await;
    let code = client.mpc(Some("99213"), &Params::new()).await.unwrap();
    assert_eq!(code.into_value(), expected);

    let convert = Mock::given(method("POST"))
        .and(path("/api/v4/claims/convert"))
        .and(body_string_contains("filename=\"chiropractic_example.837\""))
        .and(body_string_contains("application/EDI-X12"));
    let expected = respond(&server, convert, "/api/v4/claims/convert", 1).await;
    let x12 = X12File::new("chiropractic_example.837", b"ISA*00*~".to_vec());
    assert_eq!(client.claims_convert(x12).await.unwrap().into_value(), expected);
}

#[tokio::test]
async fn test_eligibility_referrals_authorizations() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;
    let body = json!({"trading_partner_id": "MOCKPAYER"});

    let expected = expect_call(&server, "POST", "/api/v4/eligibility/").await;
    assert_eq!(client.eligibility(&body).await.unwrap().into_value(), expected);

    let expected = expect_call(&server, "POST", "/api/v4/referrals/").await;
    assert_eq!(client.referrals(&body).await.unwrap().into_value(), expected);

    let expected = expect_call(&server, "POST", "/api/v4/authorizations/").await;
    assert_eq!(client.authorizations(&body).await.unwrap().into_value(), expected);
}

#[tokio::test]
async fn test_enrollment_and_files() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;
    let snapshot = "5716b2a30640fd13f0d12a12";

    let expected = expect_call(&server, "POST", "/api/v4/enrollment/").await;
    let enrolled = client.enrollment(&json!({"action": "Change"})).await.unwrap();
    assert_eq!(enrolled.into_value(), expected);

    let upload = |endpoint: &'static str| {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(body_string_contains("name=\"trading_partner_id\""))
            .and(body_string_contains("MOCKPAYER"))
            .and(body_string_contains("name=\"file\""))
    };

    let endpoint = "/api/v4/enrollment/snapshot";
    let expected = respond(&server, upload(endpoint), endpoint, 1).await;
    let result =
        client.enrollment_snapshot("MOCKPAYER", X12File::from_text("ISA*00*~")).await.unwrap();
    assert_eq!(result.into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/enrollment/snapshot").await;
    let listed = client.enrollment_snapshots(None, &Params::new()).await.unwrap();
    assert_eq!(listed.into_value(), expected);

    let endpoint = format!("/api/v4/enrollment/snapshot/{snapshot}");
    let expected = expect_call(&server, "GET", &endpoint).await;
    let single = client.enrollment_snapshots(Some(snapshot), &Params::new()).await.unwrap();
    assert_eq!(single.into_value(), expected);

    let endpoint = format!("/api/v4/enrollment/snapshot/{snapshot}/data");
    let expected = expect_call(&server, "GET", &endpoint).await;
    let data = client.enrollment_snapshot_data(snapshot).await.unwrap();
    assert_eq!(data.into_value(), expected);

    let endpoint = "/api/v4/files/";
    let expected = respond(&server, upload(endpoint), endpoint, 1).await;
    let filed = client.files("MOCKPAYER", X12File::from_text("ISA*00*~")).await.unwrap();
    assert_eq!(filed.into_value(), expected);
}

#[tokio::test]
async fn test_directory_endpoints() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    let expected = expect_call(&server, "GET", "/api/v4/payers/").await;
    assert_eq!(client.payers(&Params::new()).await.unwrap().into_value(), expected);

    let plans = Mock::given(method("GET"))
        .and(path("/api/v4/plans/"))
        .and(query_param("state", "TX"))
        .and(query_param("plan_type", "PPO"));
    let expected = respond(&server, plans, "/api/v4/plans/", 1).await;
    let filters = Params::new().with("state", "TX").with("plan_type", "PPO");
    assert_eq!(client.plans(&filters).await.unwrap().into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/providers/").await;
    let search = client.providers(None, &Params::new().with("specialty", "rheumatology")).await;
    assert_eq!(search.unwrap().into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/providers/1467560003").await;
    let provider = client.providers(Some("1467560003"), &Params::new()).await.unwrap();
    assert_eq!(provider.into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/tradingpartners/").await;
    assert_eq!(client.trading_partners(None).await.unwrap().into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/tradingpartners/aetna").await;
    assert_eq!(client.trading_partners(Some("aetna")).await.unwrap().into_value(), expected);
}

#[tokio::test]
async fn test_scheduling_endpoints() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;
    let scheduler = "967d207f-b024-41cc-8cac-89575a1f6fef";
    let appointment = "ef987691-0a19-447f-814d-f8f3abbf4859";
    let appointment_path = format!("/api/v4/schedule/appointments/{appointment}");

    let expected = expect_call(&server, "GET", "/api/v4/schedule/schedulers/").await;
    assert_eq!(client.schedulers(None).await.unwrap().into_value(), expected);

    let endpoint = format!("/api/v4/schedule/schedulers/{scheduler}");
    let expected = expect_call(&server, "GET", &endpoint).await;
    assert_eq!(client.schedulers(Some(scheduler)).await.unwrap().into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/schedule/appointmenttypes/").await;
    assert_eq!(client.appointment_types(None).await.unwrap().into_value(), expected);

    let expected = expect_call(&server, "POST", "/api/v4/schedule/slots/").await;
    let slots = client.schedule_slots(&json!({"pd_provider_uuid": "b691b7f9"})).await.unwrap();
    assert_eq!(slots.into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/schedule/appointments/").await;
    let filters = Params::new().with("appointment_type", "AT1");
    let search = client.appointments(None, &filters).await.unwrap();
    assert_eq!(search.into_value(), expected);

    let expected = expect_call(&server, "GET", &appointment_path).await;
    let single = client.appointments(Some(appointment), &Params::new()).await.unwrap();
    assert_eq!(single.into_value(), expected);

    let put = Mock::given(method("PUT")).and(path(appointment_path.as_str()));
    let expected = respond(&server, put, &appointment_path, 2).await;
    let booked =
        client.book_appointment(appointment, &json!({"patient": {"uuid": "p1"}})).await.unwrap();
    assert_eq!(booked.into_value(), expected);
    let updated =
        client.update_appointment(appointment, &json!({"description": "moved"})).await.unwrap();
    assert_eq!(updated.into_value(), expected);

    let expected = expect_call(&server, "DELETE", &appointment_path).await;
    assert_eq!(client.cancel_appointment(appointment).await.unwrap().into_value(), expected);
}

#[tokio::test]
async fn test_identity_endpoints() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;
    let identity = "881bc095-2068-43cb-9783-cce630364122";
    let identity_path = format!("/api/v4/identity/{identity}");
    let person = json!({"first_name": "Oscar"});

    let expected = expect_call(&server, "POST", "/api/v4/identity/").await;
    assert_eq!(client.create_identity(&person).await.unwrap().into_value(), expected);

    let expected = expect_call(&server, "PUT", &identity_path).await;
    let updated = client.update_identity(identity, &person).await.unwrap();
    assert_eq!(updated.into_value(), expected);

    let expected = expect_call(&server, "GET", &identity_path).await;
    let single = client.get_identity(Some(identity), &Params::new()).await.unwrap();
    assert_eq!(single.into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/identity/").await;
    let search = client.get_identity(None, &Params::new().with("first_name", "Oscar")).await;
    assert_eq!(search.unwrap().into_value(), expected);

    let expected = expect_call(&server, "GET", &format!("{identity_path}/history")).await;
    let history = client.identity_history(identity, None).await.unwrap();
    assert_eq!(history.into_value(), expected);

    let expected = expect_call(&server, "GET", &format!("{identity_path}/history/1")).await;
    let version = client.identity_history(identity, Some(1)).await.unwrap();
    assert_eq!(version.into_value(), expected);

    let expected = expect_call(&server, "POST", "/api/v4/identity/match").await;
    let matched = client.identity_match(&json!({"match_configuration": []})).await.unwrap();
    assert_eq!(matched.into_value(), expected);
}

#[tokio::test]
async fn test_pharmacy_endpoints() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;
    let member = Params::new()
        .with("trading_partner_id", "medicare_national")
        .with("member_id", "1234567890");

    let expected = expect_call(&server, "GET", "/api/v4/pharmacy/plans").await;
    assert_eq!(client.pharmacy_plans(&member).await.unwrap().into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/pharmacy/formulary").await;
    let formulary = client.pharmacy_formulary(&member.clone().with("ndc", "59310-579-22")).await;
    assert_eq!(formulary.unwrap().into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/pharmacy/drug/cost").await;
    let cost = client.pharmacy_drug_cost(&member.clone().with("drug", "simvastatin")).await;
    assert_eq!(cost.unwrap().into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/pharmacy/network/").await;
    assert_eq!(client.pharmacy_network(None, &member).await.unwrap().into_value(), expected);

    let expected = expect_call(&server, "GET", "/api/v4/pharmacy/network/1427382266").await;
    let pharmacy = client.pharmacy_network(Some("1427382266"), &member).await.unwrap();
    assert_eq!(pharmacy.into_value(), expected);
}

#[tokio::test]
async fn test_path_ids_are_percent_encoded() {
    let server = MockServer::start().await;
    let client = connected_client(&server).await;

    let expected = expect_call(&server, "GET", "/api/v4/providers/a%2Fb").await;
    let provider = client.providers(Some("a/b"), &Params::new()).await.unwrap();

    assert_eq!(provider.into_value(), expected);
}
