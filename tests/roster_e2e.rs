use actix_web::{App, HttpServer, dev::ServerHandle, web};
use roulette_backend::client::{ClientError, DrawController, HttpRosterApi, Roster, RosterApi};
use roulette_backend::config::{ClientConfig, DrawConfig};
use roulette_backend::database::create_memory_pool;
use roulette_backend::handlers;
use roulette_backend::models::UpdatePersonRequest;
use roulette_backend::services::{PersonService, RouletteService};
use std::sync::Arc;

struct TestServer {
    handle: ServerHandle,
    config: ClientConfig,
}

impl TestServer {
    async fn stop(self) {
        self.handle.stop(true).await;
    }
}

async fn spawn_server() -> anyhow::Result<TestServer> {
    let pool = create_memory_pool().await?;
    let person_service = PersonService::new(pool.clone());
    let roulette_service = RouletteService::new(pool, DrawConfig::default());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(person_service.clone()))
            .app_data(web::Data::new(roulette_service.clone()))
            .service(web::scope("/api").configure(handlers::api_config))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))?;
    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    let config = ClientConfig {
        api_base: format!("http://{addr}/api"),
        spin_delay_ms: 0,
        ..ClientConfig::default()
    };
    Ok(TestServer { handle, config })
}

#[actix_web::test]
async fn it_runs_a_draw_against_the_server() -> anyhow::Result<()> {
    let server = spawn_server().await?;
    let roster = Arc::new(Roster::new(HttpRosterApi::new(&server.config)?, &server.config));

    roster.load().await?;
    assert!(roster.snapshot().persons.is_empty());

    let sophie = roster.add("  Sophie Bernard ").await?;
    let michel = roster.add("Michel Moreau").await?;
    assert_eq!(sophie.name, "Sophie Bernard");
    assert!(!sophie.present);

    roster.toggle_presence(michel.id).await?;
    assert_eq!(roster.snapshot().present_count(), 1);

    let mut draw = DrawController::new(Arc::clone(&roster), &server.config);
    let outcome = draw.run().await?;
    assert_eq!(outcome.winner.id, michel.id);
    assert_eq!(outcome.total_participants, 1);
    assert_eq!(outcome.final_rotation, Some(3780.0));
    assert_eq!(roster.snapshot().person(michel.id).map(|p| p.win_count), Some(1));

    roster.load_history().await?;
    let history = roster.snapshot().history;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].person_name, "Michel Moreau");

    roster.reset_all_wins().await?;
    assert!(roster.snapshot().persons.iter().all(|p| p.win_count == 0));

    roster.set_all_presence(true).await?;
    assert_eq!(roster.snapshot().present_count(), 2);

    roster.delete(sophie.id).await?;
    roster.load().await?;
    let ids: Vec<i64> = roster.snapshot().persons.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![michel.id]);

    server.stop().await;
    Ok(())
}

#[actix_web::test]
async fn it_surfaces_server_errors() -> anyhow::Result<()> {
    let server = spawn_server().await?;
    let api = HttpRosterApi::new(&server.config)?;

    match api.spin().await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("No present persons to select from"));
        }
        other => panic!("unexpected spin result: {other:?}"),
    }

    match api.set_presence(404, true).await {
        Err(ClientError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("unexpected presence result: {other:?}"),
    }

    match api.delete_person(404).await {
        Err(ClientError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("unexpected delete result: {other:?}"),
    }

    match api.create_person("   ").await {
        Err(ClientError::Status { status, .. }) => assert_eq!(status, 400),
        other => panic!("unexpected create result: {other:?}"),
    }

    let person = api.create_person("Julie Perrin").await?;
    match api.update_person(person.id, &UpdatePersonRequest::default()).await {
        Err(ClientError::Status { status, .. }) => assert_eq!(status, 400),
        other => panic!("unexpected update result: {other:?}"),
    }

    server.stop().await;
    Ok(())
}
