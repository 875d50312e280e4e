//! Tests for the facades and channel with mock transports.

use std::sync::Arc;

use bridgepack::Value;
use bridgerpc::Operation;
use http::Method;
use http::StatusCode;

use crate::config;
use crate::mock_transport::RecordingFetch;
use crate::remote;
use crate::remote::params::Params;
use crate::transport;
use crate::*;

const ORIGIN: &str = "http://127.0.0.1:8787/__bridge";

fn database(fetch: &Arc<RecordingFetch>) -> Database {
    Database::new(ORIGIN, "DB", fetch.clone()).expect("valid config")
}

fn queue(fetch: &Arc<RecordingFetch>) -> Queue {
    Queue::new(ORIGIN, "JOBS", fetch.clone()).expect("valid config")
}

fn structured(value: &Value) -> Arc<RecordingFetch> {
    Arc::new(RecordingFetch::ok(bridgepack::encode(value).expect("encodable")))
}

// ============================================================================
//  CHANNEL
// ============================================================================

#[tokio::test]
async fn test_dispatch_sets_routing_headers() -> Result<()> {
    let fetch = structured(&Value::Null);
    database(&fetch).exec("select 1").await?;

    let req = fetch.last().await;
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.uri.to_string(), ORIGIN);
    assert_eq!(req.header(bridgerpc::MODULE_HEADER), Some("D1"));
    assert_eq!(req.header(bridgerpc::NAME_HEADER), Some("DB"));
    Ok(())
}

#[tokio::test]
async fn test_queue_uses_queue_module() -> Result<()> {
    let fetch = Arc::new(RecordingFetch::ok(Vec::new()));
    queue(&fetch).send("hello", None).await?;

    let req = fetch.last().await;
    assert_eq!(req.header(bridgerpc::MODULE_HEADER), Some("QUEUE"));
    assert_eq!(req.header(bridgerpc::NAME_HEADER), Some("JOBS"));
    Ok(())
}

#[tokio::test]
async fn test_one_call_one_request() -> Result<()> {
    let fetch = structured(&Value::Null);
    let db = database(&fetch);
    let stmt = db.prepare("select * from users");

    db.all(&stmt).await?;
    db.run(&stmt).await?;
    db.clone().raw(&stmt).await?;

    let ops: Vec<String> = fetch.requests().await.into_iter().map(|r| r.envelope.operation).collect();
    assert_eq!(ops, ["Database.all", "Database.run", "Database.raw"]);
    Ok(())
}

#[tokio::test]
async fn test_raw_response_accessors() -> Result<()> {
    let fetch = Arc::new(RecordingFetch::ok(b"plain".to_vec()));
    let config = BindingConfig::database(ORIGIN, "DB").expect("valid config");
    let channel = Channel::new(config, fetch.clone());

    let res = channel.dispatch(Operation::DatabaseDump, vec![]).await?;
    assert!(res.is_ok());
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text(), "plain");
    assert_eq!(res.bytes(), b"plain");
    assert_eq!(res.value().unwrap_err().kind(), ErrorKind::Codec);
    Ok(())
}

// ============================================================================
//  DATABASE FACADE
// ============================================================================

#[tokio::test]
async fn test_exec_sends_query_and_decodes_result() -> Result<()> {
    let summary = Value::map([("count", Value::Int(2)), ("duration", Value::Float(0.25))]);
    let fetch = structured(&summary);

    let result = database(&fetch).exec("create table t(x); insert into t values (1)").await?;
    assert_eq!(result, summary);

    let req = fetch.last().await;
    assert_eq!(req.envelope.resolve(), Ok(Operation::DatabaseExec));
    assert_eq!(
        req.envelope.parameters,
        vec![Value::from("create table t(x); insert into t values (1)")]
    );
    Ok(())
}

#[tokio::test]
async fn test_dump_returns_raw_bytes() -> Result<()> {
    let file = vec![0x53, 0x51, 0x4c, 0x00, 0xff, 0xfe, 0x80];
    let fetch = Arc::new(RecordingFetch::ok(file.clone()));

    let dumped = database(&fetch).dump().await?;
    assert_eq!(dumped, file);

    let req = fetch.last().await;
    assert_eq!(req.envelope.operation, "Database.dump");
    assert!(req.envelope.parameters.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_batch_preserves_statement_order() -> Result<()> {
    let fetch = structured(&Value::List(vec![]));
    let db = database(&fetch);
    let insert = db.prepare("insert into users (name) values (?)");

    let statements = [
        insert.bind([Value::from("ada")]),
        insert.bind([Value::from("grace")]),
        db.prepare("select count(*) from users"),
    ];
    db.batch(&statements).await?;

    let req = fetch.last().await;
    let expected = vec![
        Value::List(vec![insert.query().into(), Value::List(vec!["ada".into()])]),
        Value::List(vec![insert.query().into(), Value::List(vec!["grace".into()])]),
        Value::List(vec!["select count(*) from users".into(), Value::List(vec![])]),
    ];
    assert_eq!(req.envelope.parameters, expected);
    Ok(())
}

#[tokio::test]
async fn test_batch_sends_one_parameter_per_statement() -> Result<()> {
    let fetch = structured(&Value::List(vec![]));
    let db = database(&fetch);
    let first = db.prepare("a").bind([Value::Int(1)]);
    let second = db.prepare("b");

    db.batch(&[first, second]).await?;

    let req = fetch.last().await;
    assert_eq!(req.envelope.resolve(), Ok(Operation::DatabaseBatch));
    assert_eq!(
        req.envelope.parameters,
        vec![
            Value::List(vec!["a".into(), Value::List(vec![Value::Int(1)])]),
            Value::List(vec!["b".into(), Value::List(vec![])]),
        ]
    );

    db.batch(&[]).await?;
    assert!(fetch.last().await.envelope.parameters.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_first_with_and_without_column() -> Result<()> {
    let fetch = structured(&Value::Int(42));
    let db = database(&fetch);
    let stmt = db.prepare("select age from users where id = ?").bind([Value::Int(7)]);

    assert_eq!(db.first(&stmt, Some("age")).await?, Value::Int(42));
    let with_column = fetch.last().await.envelope.parameters;
    assert_eq!(
        with_column,
        vec![stmt.query().into(), Value::List(vec![Value::Int(7)]), "age".into()]
    );

    db.first(&stmt, None).await?;
    let without_column = fetch.last().await.envelope.parameters;
    assert_eq!(without_column.len(), 2);
    Ok(())
}

// ============================================================================
//  PREPARED STATEMENTS
// ============================================================================

#[test]
fn test_bind_returns_new_statement() {
    let stmt = PreparedStatement::new("select * from t where a = ? and b = ?");
    let bound = stmt.bind([Value::Int(1), Value::Null]);
    let rebound = bound.bind([Value::from("x")]);

    assert!(stmt.params().is_empty());
    assert_eq!(bound.params(), &[Value::Int(1), Value::Null]);
    assert_eq!(rebound.params(), &[Value::from("x")]);
    assert_eq!(rebound.query(), stmt.query());
}

#[test]
fn test_bind_accepts_mixed_parameter_types() {
    let stmt = PreparedStatement::new("insert into blobs values (?, ?, ?)");
    let bound = stmt.bind(vec![
        Value::Bytes(vec![0, 1, 2]),
        Value::Float(1.5),
        Value::Bool(true),
    ]);
    assert_eq!(bound.params().len(), 3);
    assert_eq!(bound.params()[0].as_bytes(), Some(&[0u8, 1, 2][..]));
}

// ============================================================================
//  QUEUE FACADE
// ============================================================================

#[tokio::test]
async fn test_send_without_options_sends_undefined() -> Result<()> {
    let fetch = Arc::new(RecordingFetch::ok(Vec::new()));
    queue(&fetch).send(Value::map([("id", Value::Int(1))]), None).await?;

    let req = fetch.last().await;
    assert_eq!(req.envelope.resolve(), Ok(Operation::QueueSend));
    assert_eq!(req.envelope.parameters.len(), 2);
    assert_eq!(req.envelope.parameters[0], Value::map([("id", Value::Int(1))]));
    assert!(req.envelope.parameters[1].is_undefined());
    Ok(())
}

#[tokio::test]
async fn test_send_with_options() -> Result<()> {
    let fetch = Arc::new(RecordingFetch::ok(Vec::new()));
    let options = SendOptions {
        content_type: Some(ContentType::Json),
        delay_seconds: Some(30),
    };
    queue(&fetch).send("payload", Some(options)).await?;

    let sent = &fetch.last().await.envelope.parameters[1];
    assert_eq!(sent.get("contentType"), Some(&Value::from("json")));
    assert_eq!(sent.get("delaySeconds").and_then(Value::as_i64), Some(30));
    Ok(())
}

#[tokio::test]
async fn test_send_batch_shape() -> Result<()> {
    let fetch = Arc::new(RecordingFetch::ok(Vec::new()));
    let messages = vec![
        MessageSendRequest::new("first"),
        MessageSendRequest::new(Value::Bytes(vec![9, 9])).with_content_type(ContentType::Bytes),
        MessageSendRequest::new("last").with_delay_seconds(5),
    ];
    queue(&fetch).send_batch(messages).await?;

    let req = fetch.last().await;
    assert_eq!(req.envelope.resolve(), Ok(Operation::QueueSendBatch));
    let sent = req.envelope.parameters[0].as_list().expect("a list of messages");
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0], Value::map([("body", "first")]));
    assert_eq!(sent[1].get("contentType"), Some(&Value::from("bytes")));
    assert_eq!(sent[2].get("body"), Some(&Value::from("last")));
    assert_eq!(sent[2].get("delaySeconds").and_then(Value::as_i64), Some(5));
    Ok(())
}

// ============================================================================
//  ERRORS
// ============================================================================

#[tokio::test]
async fn test_remote_error_message_is_verbatim() {
    let message = "D1_ERROR: no such table: users";
    let fetch = Arc::new(RecordingFetch::status(
        StatusCode::INTERNAL_SERVER_ERROR,
        message.as_bytes().to_vec(),
    ));
    let db = database(&fetch);

    let err = db.all(&db.prepare("select * from users")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteOperation);
    assert_eq!(err.to_string(), message);
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.raw_body(), Some(message.as_bytes()));
}

#[tokio::test]
async fn test_remote_error_with_empty_body() {
    let fetch = Arc::new(RecordingFetch::status(StatusCode::BAD_GATEWAY, Vec::new()));

    let err = queue(&fetch).send("x", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteOperation);
    assert_eq!(err.to_string(), "");
    assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
}

#[tokio::test]
async fn test_remote_error_keeps_non_utf8_body() {
    let body = vec![b'b', b'a', b'd', 0xff];
    let fetch = Arc::new(RecordingFetch::status(StatusCode::BAD_REQUEST, body.clone()));

    let err = database(&fetch).dump().await.unwrap_err();
    assert_eq!(err.raw_body(), Some(&body[..]));
    assert!(err.to_string().starts_with("bad"));
}

#[tokio::test]
async fn test_transport_error_propagates() {
    let fetch = Arc::new(RecordingFetch::failing(transport::Error::ConnectionLost(
        "refused".into(),
    )));

    let err = database(&fetch).exec("select 1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(err, Error::Transport(transport::Error::ConnectionLost(_))));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_undecodable_result_is_codec_error() {
    let fetch = Arc::new(RecordingFetch::ok(b"{\"not\":\"bridgepack\"}".to_vec()));

    let err = database(&fetch).exec("select 1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Codec);
}

#[tokio::test]
async fn test_unencodable_parameters_are_codec_error() {
    let fetch = Arc::new(RecordingFetch::ok(Vec::new()));
    let mut body = Value::Null;
    for _ in 0..=bridgepack::MAX_DEPTH {
        body = Value::List(vec![body]);
    }

    let err = queue(&fetch).send(body, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Codec);
    assert!(matches!(err, Error::Codec(bridgepack::Error::RecursionLimitExceeded)));
    assert!(fetch.requests().await.is_empty());
}

#[tokio::test]
async fn test_queue_ignores_success_body() -> Result<()> {
    let fetch = Arc::new(RecordingFetch::ok(b"anything at all".to_vec()));
    queue(&fetch).send("x", None).await
}

// ============================================================================
//  CONFIGURATION
// ============================================================================

#[test]
fn test_config_accepts_http_and_https() {
    assert!(BindingConfig::database("http://localhost:8787", "DB").is_ok());
    assert!(BindingConfig::queue("https://bridge.example.com/path", "JOBS").is_ok());
}

#[test]
fn test_config_rejects_bad_origin() {
    for origin in ["", "not a uri", "ftp://example.com", "/relative/path"] {
        let err = BindingConfig::database(origin, "DB").unwrap_err();
        assert!(matches!(err, config::Error::InvalidOrigin(_)), "{origin:?} gave {err:?}");
    }
}

#[test]
fn test_config_rejects_bad_name() {
    assert_eq!(
        BindingConfig::database(ORIGIN, "").unwrap_err(),
        config::Error::InvalidName(String::new())
    );
    assert!(matches!(
        BindingConfig::queue(ORIGIN, "two\nlines").unwrap_err(),
        config::Error::InvalidName(_)
    ));
}

#[test]
fn test_config_getters() {
    let config = BindingConfig::queue(ORIGIN, "JOBS").expect("valid config");
    assert_eq!(config.kind(), bridgerpc::BindingKind::Queue);
    assert_eq!(config.name(), "JOBS");
    assert_eq!(config.origin().host(), Some("127.0.0.1"));
}

// ============================================================================
//  REMOTE PARAMETERS
// ============================================================================

#[test]
fn test_params_statement_with_nullish_params() -> remote::Result<()> {
    let mut params = Params::new(Operation::DatabaseAll, vec!["select 1".into(), Value::Null]);
    let stmt = params.statement(0)?;
    assert_eq!(stmt.query(), "select 1");
    assert!(stmt.params().is_empty());

    let mut missing = Params::new(Operation::DatabaseAll, vec!["select 2".into()]);
    assert!(missing.statement(0)?.params().is_empty());
    Ok(())
}

#[test]
fn test_params_statements_keep_order() -> remote::Result<()> {
    let pairs = vec![
        Value::List(vec!["a".into(), Value::List(vec![Value::Int(1)])]),
        Value::List(vec!["b".into()]),
    ];
    let statements = Params::new(Operation::DatabaseBatch, pairs).statements()?;

    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].query(), "a");
    assert_eq!(statements[0].params(), &[Value::Int(1)]);
    assert_eq!(statements[1].query(), "b");
    Ok(())
}

#[test]
fn test_params_shape_errors() {
    let mut params = Params::new(Operation::DatabaseExec, vec![Value::Int(3)]);
    let err = params.string(0).unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "Database.exec(): parameter 0 must be a string, found int");

    let mut params = Params::new(
        Operation::DatabaseBatch,
        vec![Value::List(vec!["q".into(), Value::List(vec![])]), "not a pair".into()],
    );
    assert!(matches!(
        params.statements(),
        Err(remote::Error::BadParameter { index: 1, found: "string", .. })
    ));

    let mut params = Params::new(Operation::DatabaseFirst, vec!["q".into(), Value::List(vec![]), Value::Int(1)]);
    assert!(params.statement(0).is_ok());
    assert!(matches!(
        params.optional_string(2),
        Err(remote::Error::BadParameter { index: 2, .. })
    ));
}
