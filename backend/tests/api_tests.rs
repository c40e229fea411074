//! HTTP-level tests for the shop-floor API.
//!
//! Every test builds the real route table over an in-memory store. Fixtures
//! are created straight through the shared `Store`; the behaviour under test
//! goes through the HTTP surface.

use actix_web::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::http::StatusCode;
use actix_web::{test, App};
use backend::auth::{AccessTokens, Role};
use backend::sessions::Clock;
use backend::store::Store;
use backend::AppState;
use chrono::{DateTime, Duration, TimeZone, Utc};
use common::model::pallet::{NewPallet, Pallet};
use common::model::task::{NewTask, Task};
use common::model::worker::{NewWorker, Worker};
use common::qr;
use common::requests::BadgeKind;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Calls the app and returns the status with the body parsed as JSON
/// (`Null` for non-JSON bodies).
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let bytes = test::read_body(resp).await;
        let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }};
}

macro_rules! init_app {
    ($state:expr) => {{
        let state = $state.clone();
        test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await
    }};
}

/// Ten minutes per reading, starting on a fixed morning.
struct SteppingClock(Mutex<DateTime<Utc>>);

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut now = self.0.lock().unwrap();
        let current = *now;
        *now += Duration::minutes(10);
        current
    }
}

fn state_with(tokens: AccessTokens) -> AppState {
    let clock = SteppingClock(Mutex::new(
        Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap(),
    ));
    AppState::new(Store::open_in_memory().unwrap(), Arc::new(clock), tokens)
}

fn open_state() -> AppState {
    state_with(AccessTokens::default())
}

fn guarded_state() -> AppState {
    state_with(AccessTokens::new([
        ("adm-token".to_string(), Role::Admin),
        ("chefe-token".to_string(), Role::Chefe),
        ("op-token".to_string(), Role::Funcionario),
    ]))
}

struct Fixture {
    worker: Worker,
    task: Task,
    pallet: Pallet,
}

fn new_pallet() -> NewPallet {
    NewPallet {
        delivery_date: Some("2024-06-20".into()),
        order_ref: Some("OP-31".into()),
        reference: Some("REF-31".into()),
        product_name: Some("Almofada".into()),
        size: Some("45x45".into()),
        button_color: Some("Verde".into()),
        trim_color: Some("Branco".into()),
        needs_packaging: Some(true),
        quantity: Some(60),
        produced_at: Some("2024-06-01T07:30".into()),
        lot_number: Some("L-31".into()),
    }
}

fn fixture(store: &Store) -> Fixture {
    Fixture {
        worker: store
            .create::<Worker>(NewWorker {
                name: Some("Ana".into()),
                is_supervisor: false,
            })
            .unwrap(),
        task: store
            .create::<Task>(NewTask {
                name: Some("Costura".into()),
                section: Some("Confeção".into()),
            })
            .unwrap(),
        pallet: store.create::<Pallet>(new_pallet()).unwrap(),
    }
}

fn scan_body(f: &Fixture) -> Value {
    json!({
        "tarefa_qr": qr::task_payload(&f.task),
        "trabalhador_qr": qr::worker_payload(&f.worker, BadgeKind::Trabalhador),
        "palete_qr": qr::pallet_payload(&f.pallet),
    })
}

// =============================================================================
// Health
// =============================================================================

#[actix_web::test]
async fn health_needs_no_token() {
    let state = guarded_state();
    let app = init_app!(state);

    let (status, body) = send!(app, test::TestRequest::get().uri("/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// =============================================================================
// Work registration
// =============================================================================

#[actix_web::test]
async fn first_scan_starts_and_second_finishes() {
    let state = open_state();
    let f = fixture(&state.store);
    let app = init_app!(state);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/registro_trabalho")
            .set_json(scan_body(&f))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["event"], "started");
    assert_eq!(body["registro"]["secao"], "Confeção");
    assert!(body["registro"]["hora_fim"].is_null());
    let session_id = body["registro"]["id"].clone();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/trabalho")
            .set_json(scan_body(&f))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"], "finished");
    assert_eq!(body["message"], "Tarefa finalizada com sucesso!");
    assert_eq!(body["registro"]["id"], session_id);

    let (status, log) = send!(app, test::TestRequest::get().uri("/registro_trabalho"));
    assert_eq!(status, StatusCode::OK);
    let entries = log.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["trabalhador"]["nome"], "Ana");
    assert_eq!(entries[0]["tarefa"]["nome"], "Costura");
    assert_eq!(entries[0]["palete"]["referencia"], "REF-31");
    assert_eq!(entries[0]["data"], "2024-06-03");
    assert!(!entries[0]["hora_fim"].is_null());
}

#[actix_web::test]
async fn unknown_task_is_not_found_and_writes_nothing() {
    let state = open_state();
    let f = fixture(&state.store);
    let app = init_app!(state);

    let mut body = scan_body(&f);
    body["tarefa_qr"] = json!("ID:does-not-exist;Tarefa:X;Secao:Y");
    let (status, reply) = send!(
        app,
        test::TestRequest::post()
            .uri("/registro_trabalho")
            .set_json(body)
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(reply["details"], "Task with id does-not-exist not found");
    assert!(state.store.sessions().unwrap().is_empty());
}

#[actix_web::test]
async fn missing_or_undecodable_codes_are_bad_requests() {
    let state = open_state();
    let f = fixture(&state.store);
    let app = init_app!(state);

    let mut body = scan_body(&f);
    body.as_object_mut().unwrap().remove("palete_qr");
    let (status, reply) = send!(
        app,
        test::TestRequest::post()
            .uri("/registro_trabalho")
            .set_json(body)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(reply["message"], "Todos os QR Codes são obrigatórios");

    let mut body = scan_body(&f);
    body["trabalhador_qr"] = json!("Tipo:Trabalhador;Nome:Ana");
    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/registro_trabalho")
            .set_json(body)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/registro_trabalho")
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload("not json")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(state.store.sessions().unwrap().is_empty());
}

#[actix_web::test]
async fn task_code_without_section_uses_default() {
    let state = open_state();
    let f = fixture(&state.store);
    let app = init_app!(state);

    let mut body = scan_body(&f);
    body["tarefa_qr"] = json!(format!("ID:{};Tarefa:Costura", f.task.id));
    let (status, reply) = send!(
        app,
        test::TestRequest::post()
            .uri("/registro_trabalho")
            .set_json(body)
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reply["registro"]["secao"], "Default");
}

#[actix_web::test]
async fn hierarchical_view_nests_by_day_pallet_section_task() {
    let state = open_state();
    let f = fixture(&state.store);
    let app = init_app!(state);

    for _ in 0..3 {
        send!(
            app,
            test::TestRequest::post()
                .uri("/registro_trabalho")
                .set_json(scan_body(&f))
        );
    }

    let (status, days) = send!(
        app,
        test::TestRequest::get().uri("/registro_trabalho?formato=hierarquico")
    );
    assert_eq!(status, StatusCode::OK);
    let day = &days[0];
    assert_eq!(day["data"], "2024-06-03");
    let task = &day["paletes"][0]["secoes"][0]["tarefas"][0];
    assert_eq!(day["paletes"][0]["secoes"][0]["secao"], "Confeção");
    assert_eq!(task["tarefa"]["nome"], "Costura");
    let entries = task["registros"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["em_andamento"], false);
    assert_eq!(entries[1]["em_andamento"], true);
}

// =============================================================================
// Entities
// =============================================================================

#[actix_web::test]
async fn created_worker_reply_carries_badge_payloads() {
    let state = open_state();
    let app = init_app!(state);

    let (status, reply) = send!(
        app,
        test::TestRequest::post()
            .uri("/trabalhadores")
            .set_json(json!({ "nome": "Rui", "chefe": true }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let id = reply["id"].as_str().unwrap().to_string();
    assert_eq!(
        reply["qr_code_trabalhador"],
        format!("ID:{id};Tipo:Trabalhador;Nome:Rui")
    );
    assert_eq!(reply["qr_code_chefe"], format!("ID:{id};Tipo:Chefe;Nome:Rui"));

    let (status, worker) = send!(
        app,
        test::TestRequest::get().uri(&format!("/trabalhadores/{id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(worker["nome"], "Rui");
    assert_eq!(worker["chefe"], true);

    let (status, badge) = send!(
        app,
        test::TestRequest::get().uri(&format!("/trabalhadores/{id}/qr?tipo=chefe"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(badge["qr_code"], format!("ID:{id};Tipo:Chefe;Nome:Rui"));
}

#[actix_web::test]
async fn task_creation_accepts_nome_tarefa() {
    let state = open_state();
    let app = init_app!(state);

    let (status, reply) = send!(
        app,
        test::TestRequest::post()
            .uri("/tarefas")
            .set_json(json!({ "nome_tarefa": "Corte", "secao": "Corte e vinco" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let id = reply["tarefa_id"].as_str().unwrap();
    assert_eq!(
        reply["qr_code"],
        format!("ID:{id};Tarefa:Corte;Secao:Corte e vinco")
    );

    let (_, tasks) = send!(app, test::TestRequest::get().uri("/tarefas"));
    assert_eq!(tasks[0]["nome"], "Corte");
}

#[actix_web::test]
async fn invalid_entities_are_rejected() {
    let state = open_state();
    let app = init_app!(state);

    let (status, reply) = send!(
        app,
        test::TestRequest::post()
            .uri("/paletes")
            .set_json(json!({ "op": "OP-1", "numero_lote": "L-1" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let details = reply["details"].as_str().unwrap();
    assert!(details.contains("referencia"));
    assert!(details.contains("quantidade"));

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/trabalhadores")
            .set_json(json!({ "nome": "Ana;Tipo:Chefe" }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, workers) = send!(app, test::TestRequest::get().uri("/trabalhadores"));
    assert_eq!(workers, json!([]));
}

#[actix_web::test]
async fn supervisor_badge_of_plain_worker_is_rejected() {
    let state = open_state();
    let f = fixture(&state.store);
    let app = init_app!(state);

    let (status, _) = send!(
        app,
        test::TestRequest::get().uri(&format!("/trabalhadores/{}/qr?tipo=chefe", f.worker.id))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn deleting_keeps_sessions_in_the_log() {
    let state = open_state();
    let f = fixture(&state.store);
    let app = init_app!(state);

    send!(
        app,
        test::TestRequest::post()
            .uri("/registro_trabalho")
            .set_json(scan_body(&f))
    );

    let uri = format!("/paletes/{}", f.pallet.id);
    let (status, _) = send!(app, test::TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send!(app, test::TestRequest::get().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send!(app, test::TestRequest::delete().uri(&uri));
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, log) = send!(app, test::TestRequest::get().uri("/registro_trabalho"));
    assert_eq!(log[0]["palete"]["id"], f.pallet.id.as_str());
    assert_eq!(log[0]["palete"]["referencia"], "(removido)");

    // The pallet is gone, so scanning its sheet again fails.
    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/registro_trabalho")
            .set_json(scan_body(&f))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Roles
// =============================================================================

#[actix_web::test]
async fn tokens_gate_operations_by_role() {
    let state = guarded_state();
    let f = fixture(&state.store);
    let app = init_app!(state);

    let (status, _) = send!(app, test::TestRequest::get().uri("/tarefas"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/tarefas")
            .insert_header((AUTHORIZATION, "Bearer wrong"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/tarefas")
            .insert_header((AUTHORIZATION, "Bearer op-token"))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/tarefas")
            .insert_header((AUTHORIZATION, "Bearer op-token"))
            .set_json(json!({ "nome": "Corte", "secao": "Corte" }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/registro_trabalho")
            .insert_header((AUTHORIZATION, "Bearer adm-token"))
            .set_json(scan_body(&f))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/registro_trabalho")
            .insert_header((AUTHORIZATION, "Bearer op-token"))
            .set_json(scan_body(&f))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/exportar_registros")
            .insert_header((AUTHORIZATION, "Bearer op-token"))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/trabalhadores")
            .insert_header((AUTHORIZATION, "Bearer chefe-token"))
            .set_json(json!({ "nome": "Rui" }))
    );
    assert_eq!(status, StatusCode::CREATED);
}

// =============================================================================
// Export
// =============================================================================

#[actix_web::test]
async fn export_serves_xlsx_by_default_and_csv_on_request() {
    let state = open_state();
    let f = fixture(&state.store);
    let app = init_app!(state);

    for _ in 0..2 {
        send!(
            app,
            test::TestRequest::post()
                .uri("/registro_trabalho")
                .set_json(scan_body(&f))
        );
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/exportar_registros").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"registros_trabalho.xlsx\""
    );
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..2], b"PK");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/exportar_registros?formato=csv")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("data,referencia,secao"));
    assert_eq!(
        lines[1],
        "2024-06-03,REF-31,Confeção,Costura,Ana,2024-06-03 08:00:00,2024-06-03 08:10:00,10"
    );

    let (status, _) = send!(
        app,
        test::TestRequest::get().uri("/exportar_registros?formato=pdf")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
