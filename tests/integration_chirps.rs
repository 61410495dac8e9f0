//! Chirp store integration tests
//!
//! Exercises the façade, the file-backed store and the socket server together.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chirpy::error::Result;
use chirpy::ipc::{ChirpRequest, ChirpResponse, ErrorCode, IpcServer, IpcServerConfig, Methods};
use chirpy::server::ServerContext;
use chirpy::storage::read_snapshot;
use chirpy::{ChirpId, ChirpService, ChirpStore, ChirpyError};
use serde_json::json;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

fn open_service(path: &Path) -> Result<ChirpService<ChirpStore>> {
    Ok(ChirpService::new(Arc::new(ChirpStore::open(path)?)))
}

/// Integration test: the hello/world walkthrough on a fresh store
#[test]
fn test_fresh_store_scenario() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = open_service(&temp_dir.path().join("database.json"))?;

    let hello = service.create("hello")?;
    let world = service.create("world")?;
    assert_eq!((hello.id, hello.body.as_str()), (1, "hello"));
    assert_eq!((world.id, world.body.as_str()), (2, "world"));

    let listed = service.list()?;
    assert_eq!(listed, vec![hello, world]);
    assert!(matches!(service.get(3), Err(ChirpyError::NotFound(3))));

    Ok(())
}

/// Integration test: ids stay above everything persisted after a restart
#[test]
fn test_restart_never_reuses_ids() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("database.json");

    let persisted: Vec<ChirpId> = {
        let service = open_service(&path)?;
        (0..5)
            .map(|i| service.create(&format!("chirp {}", i)).map(|c| c.id))
            .collect::<Result<_>>()?
    };

    let service = open_service(&path)?;
    let next = service.create("after restart")?;
    assert!(persisted.iter().all(|id| next.id > *id));
    assert_eq!(service.list()?.len(), 6);

    Ok(())
}

/// Integration test: reopening leaves records and allocator intact
#[test]
fn test_open_is_idempotent() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("database.json");

    let store = ChirpStore::open(&path)?;
    store.create_record("one")?;
    store.create_record("two")?;
    let before = fs::read(&path)?;
    drop(store);

    let reopened = ChirpStore::open(&path)?;
    let again = ChirpStore::open(&path)?;
    assert_eq!(fs::read(&path)?, before);
    assert_eq!(reopened.next_id()?, 3);
    assert_eq!(again.next_id()?, 3);

    Ok(())
}

/// Integration test: concurrent creates through one service
#[test]
fn test_concurrent_creates_are_linearized() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = Arc::new(open_service(&temp_dir.path().join("database.json"))?);

    let handles: Vec<_> = (0..6)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let mut ids = Vec::new();
                for i in 0..15 {
                    ids.push(service.create(&format!("thread {} chirp {}", t, i)).unwrap().id);
                }
                ids
            })
        })
        .collect();

    let mut all_ids = Vec::new();
    for handle in handles {
        let ids = handle.join().unwrap();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        all_ids.extend(ids);
    }

    all_ids.sort_unstable();
    all_ids.dedup();
    assert_eq!(all_ids.len(), 90);

    let listed: Vec<ChirpId> = service.list()?.iter().map(|c| c.id).collect();
    assert_eq!(listed, all_ids);

    let snapshot = read_snapshot(&temp_dir.path().join("database.json"))?;
    assert_eq!(snapshot.len(), 90);

    Ok(())
}

/// Integration test: readers racing a writer always see a complete document
#[test]
fn test_readers_never_see_partial_writes() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = Arc::new(open_service(&temp_dir.path().join("database.json"))?);

    let writer = {
        let service = Arc::clone(&service);
        thread::spawn(move || {
            for i in 0..40 {
                service.create(&format!("w{}", i)).unwrap();
            }
        })
    };

    let reader = {
        let service = Arc::clone(&service);
        thread::spawn(move || {
            let mut last_len = 0;
            for _ in 0..40 {
                let chirps = service.list().unwrap();
                assert!(chirps.len() >= last_len);
                assert!(chirps.windows(2).all(|w| w[0].id < w[1].id));
                last_len = chirps.len();
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(service.list()?.len(), 40);

    Ok(())
}

/// Integration test: validation boundaries on the façade
#[test]
fn test_length_boundaries() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = open_service(&temp_dir.path().join("database.json"))?;

    assert!(matches!(service.create(""), Err(ChirpyError::Validation(_))));
    assert!(matches!(service.create(&"x".repeat(141)), Err(ChirpyError::Validation(_))));
    assert_eq!(service.create(&"x".repeat(140))?.id, 1);

    Ok(())
}

/// Integration test: a malformed database is a storage error, not a panic
#[test]
fn test_malformed_database() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("database.json");
    fs::write(&path, r#"{"chirps": {"1": {"id": "one"}}}"#)?;

    assert!(matches!(ChirpStore::open(&path), Err(ChirpyError::Storage(_))));
    Ok(())
}

/// Integration test: users get their own id sequence and survive a restart
#[test]
fn test_users_persist_with_their_own_ids() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("database.json");

    {
        let service = open_service(&path)?;
        service.create("first chirp")?;
        assert_eq!(service.create_user("walt@breakingbad.com")?.id, 1);
        assert_eq!(service.create_user("jesse@breakingbad.com")?.id, 2);
        assert!(matches!(service.create_user("  "), Err(ChirpyError::Validation(_))));
    }

    let service = open_service(&path)?;
    assert_eq!(service.create_user("saul@bettercall.com")?.id, 3);
    assert_eq!(service.create("second chirp")?.id, 2);

    let snapshot = read_snapshot(&path)?;
    let emails: Vec<&str> = snapshot.users.values().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["walt@breakingbad.com", "jesse@breakingbad.com", "saul@bettercall.com"]);

    Ok(())
}

async fn send(
    writer: &mut tokio::net::unix::OwnedWriteHalf,
    lines: &mut tokio::io::Lines<BufReader<tokio::net::unix::OwnedReadHalf>>,
    request: ChirpRequest,
) -> ChirpResponse {
    let mut payload = serde_json::to_vec(&request).unwrap();
    payload.push(b'\n');
    writer.write_all(&payload).await.unwrap();
    let line = lines.next_line().await.unwrap().unwrap();
    serde_json::from_str(&line).unwrap()
}

/// Integration test: full request flow over the Unix socket
#[tokio::test]
async fn test_server_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let socket_path = temp_dir.path().join("chirpy.sock");
    let store = ChirpStore::open(temp_dir.path().join("database.json")).unwrap();
    let ctx = Arc::new(ServerContext::from_repository(Arc::new(store)));

    let server = Arc::new(IpcServer::with_config(
        IpcServerConfig::default().with_socket_path(&socket_path),
    ));
    let task = {
        let server = Arc::clone(&server);
        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move { server.run(ctx).await })
    };

    let mut stream = None;
    for _ in 0..200 {
        if let Ok(s) = UnixStream::connect(&socket_path).await {
            stream = Some(s);
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let (reader, mut writer) = stream.expect("server never came up").into_split();
    let mut lines = BufReader::new(reader).lines();

    let created = send(
        &mut writer,
        &mut lines,
        ChirpRequest::new(1, Methods::CHIRPS_CREATE, json!({"body": "hello"})),
    )
    .await;
    assert_eq!(created.result, Some(json!({"id": 1, "body": "hello"})));

    let too_long = send(
        &mut writer,
        &mut lines,
        ChirpRequest::new(2, Methods::CHIRPS_CREATE, json!({"body": "y".repeat(141)})),
    )
    .await;
    assert_eq!(too_long.error.unwrap().code, ErrorCode::VALIDATION_FAILED);

    let listed = send(&mut writer, &mut lines, ChirpRequest::no_params(3, Methods::CHIRPS_LIST)).await;
    assert_eq!(listed.result, Some(json!([{"id": 1, "body": "hello"}])));

    let missing = send(
        &mut writer,
        &mut lines,
        ChirpRequest::new(4, Methods::CHIRPS_GET, json!({"id": 3})),
    )
    .await;
    assert_eq!(missing.id, 4);
    assert_eq!(missing.error.unwrap().code, ErrorCode::CHIRP_NOT_FOUND);

    let metrics = send(&mut writer, &mut lines, ChirpRequest::no_params(5, Methods::METRICS_READ)).await;
    assert_eq!(metrics.result, Some(json!({"hits": 4})));

    send(&mut writer, &mut lines, ChirpRequest::no_params(6, Methods::METRICS_RESET)).await;
    assert_eq!(ctx.hits.read(), 0);

    let user = send(
        &mut writer,
        &mut lines,
        ChirpRequest::new(7, Methods::USERS_CREATE, json!({"email": "walt@breakingbad.com"})),
    )
    .await;
    assert_eq!(user.result, Some(json!({"id": 1, "email": "walt@breakingbad.com"})));

    server.shutdown();
    task.await.unwrap().unwrap();
}
